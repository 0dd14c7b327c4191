//! Command-line definition.

use clap::{Parser, Subcommand};

/// Katalog: catalog search configuration, branding and record enrichment
#[derive(Parser, Debug)]
#[command(name = "katalog", version)]
#[command(about = "Library catalog discovery tooling", long_about = None)]
pub struct Cli {
    /// Configuration file path (overrides $KATALOG_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Resolve a brand hint and print the brand
    Brand {
        /// Brand key (the `lib` parameter); omit for the default brand
        hint: Option<String>,
    },

    /// Show the engine parameters a search would send
    Query {
        /// Query terms
        #[arg(default_value = "")]
        q: String,

        /// Search field key
        #[arg(short = 'f', long)]
        field: Option<String>,

        /// Sort label or expression
        #[arg(short, long)]
        sort: Option<String>,

        /// 1-based page
        #[arg(short, long)]
        page: Option<usize>,

        /// Page size
        #[arg(long)]
        per_page: Option<usize>,

        /// Facet filter as FIELD=VALUE (repeatable)
        #[arg(long = "facet", value_name = "FIELD=VALUE")]
        facets: Vec<String>,

        /// Use the advanced-search query parser
        #[arg(long)]
        advanced: bool,
    },

    /// Enrich a record from JSON files and print the result
    Enrich {
        /// JSON object holding the record
        #[arg(short, long)]
        record: String,

        /// JSON array of holdings entries
        #[arg(long)]
        holdings: Option<String>,
    },

    /// Serve the catalog as JSON over HTTP
    Serve {
        /// Listen address (overrides `server.bind`)
        #[arg(short, long)]
        bind: Option<String>,

        /// Records file (overrides `server.records`)
        #[arg(long)]
        records: Option<String>,

        /// Holdings file (overrides `server.holdings`)
        #[arg(long)]
        holdings: Option<String>,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,

    /// Write a default config file
    Init {
        /// Target file (defaults to the resolved path)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a value by dotted key, e.g. `search.page_size`
    Get {
        /// Dotted key
        key: String,
    },

    /// Load and validate the configuration
    Check,
}
