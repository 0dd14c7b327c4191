//! # katalog-cli
//!
//! The `katalog` command-line tool:
//! - configuration file management (`config path|init|get|check`)
//! - brand resolution (`brand`)
//! - query preview (`query`)
//! - offline record enrichment (`enrich`)
//! - a JSON catalog server (`serve`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod logging;

pub use cli::{Cli, Command, ConfigAction};
pub use commands::run;
pub use config::KatalogConfig;
