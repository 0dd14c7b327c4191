//! Handlers for the non-config subcommands.

use std::path::Path;
use std::sync::Arc;

use katalog_brand::{BrandResolver, LibraryBrand};
use katalog_core::{Error, RawRecord, Result};
use katalog_record::{
    CatalogService, EnrichedRecord, HoldingEntry, RecordEnricher, StaticHoldings, router,
};
use katalog_search::{MemoryIndex, QueryBuilder, SearchRequest};

use crate::cli::Command;
use crate::config::KatalogConfig;
use crate::config_handlers::handle_config_command;

// ============================================================================
// Dispatch
// ============================================================================

/// Load the configuration and run startup validation.
fn load_validated(config_path: Option<&str>) -> Result<KatalogConfig> {
    let config = KatalogConfig::load(config_path)?;
    config.validate()?;
    Ok(config)
}

/// Run one subcommand.
///
/// `config` subcommands work on the raw file; every other command loads and
/// validates the configuration first.
///
/// # Errors
///
/// Whatever the subcommand reports.
pub async fn run(command: Command, config_path: Option<&str>) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(config_path, action),
        Command::Brand { hint } => cmd_brand(&load_validated(config_path)?, hint.as_deref()),
        Command::Query {
            q,
            field,
            sort,
            page,
            per_page,
            facets,
            advanced,
        } => {
            let config = load_validated(config_path)?;
            let mut request = SearchRequest::new(q);
            request.search_field = field;
            request.sort = sort;
            request.page = page;
            request.per_page = per_page;
            request.advanced = advanced;
            cmd_query(&config, &apply_facet_args(request, &facets)?)
        }
        Command::Enrich { record, holdings } => cmd_enrich(
            &load_validated(config_path)?,
            Path::new(&record),
            holdings.as_deref().map(Path::new),
        ),
        Command::Serve {
            bind,
            records,
            holdings,
        } => {
            let config = load_validated(config_path)?;
            let options = ServeOptions {
                bind: bind.unwrap_or_else(|| config.server.bind.clone()),
                records: records
                    .map(Into::into)
                    .or_else(|| config.server.records.clone()),
                holdings: holdings
                    .map(Into::into)
                    .or_else(|| config.server.holdings.clone()),
            };
            log::info!("Starting katalog server on {}", options.bind);
            cmd_serve(&config, options).await
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// ============================================================================
// brand
// ============================================================================

/// Resolve a brand hint against the configured table.
///
/// # Errors
///
/// Configuration errors for a bad table; not-found for an unknown hint.
pub fn resolve_brand(config: &KatalogConfig, hint: Option<&str>) -> Result<LibraryBrand> {
    BrandResolver::new(config.brand_table()?).resolve(hint)
}

/// `katalog brand [HINT]`
pub fn cmd_brand(config: &KatalogConfig, hint: Option<&str>) -> Result<()> {
    println!("{}", to_json(&resolve_brand(config, hint)?)?);
    Ok(())
}

// ============================================================================
// query
// ============================================================================

/// Parse `FIELD=VALUE` facet arguments onto a request.
///
/// # Errors
///
/// A configuration error for an argument without `=`.
pub fn apply_facet_args(mut request: SearchRequest, facets: &[String]) -> Result<SearchRequest> {
    for facet in facets {
        let (field, value) = facet
            .split_once('=')
            .ok_or_else(|| Error::config(format!("facet filter '{facet}' is not FIELD=VALUE")))?;
        request = request.with_facet(field, value);
    }
    Ok(request)
}

/// Engine parameters for a request, one `name=value` per line.
///
/// # Errors
///
/// Not-found errors for unknown search fields, sorts or facets.
pub fn query_params(config: &KatalogConfig, request: &SearchRequest) -> Result<Vec<String>> {
    let search = config.search_config()?;
    let query = QueryBuilder::new(&search).build(request)?;
    Ok(query
        .to_params()
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect())
}

/// `katalog query ...`
pub fn cmd_query(config: &KatalogConfig, request: &SearchRequest) -> Result<()> {
    for line in query_params(config, request)? {
        println!("{line}");
    }
    Ok(())
}

// ============================================================================
// enrich
// ============================================================================

/// Enrich a record read from disk.
///
/// # Errors
///
/// I/O or JSON errors reading inputs; a data error for malformed holdings.
pub fn enrich_files(
    config: &KatalogConfig,
    record: &Path,
    holdings: Option<&Path>,
) -> Result<EnrichedRecord> {
    let record: RawRecord = serde_json::from_str(&read_file(record)?)?;
    let holdings: Vec<HoldingEntry> = match holdings {
        Some(path) => serde_json::from_str(&read_file(path)?)?,
        None => Vec::new(),
    };
    RecordEnricher::new(config.record.clone()).enrich(&record, holdings)
}

/// `katalog enrich --record R [--holdings H]`
pub fn cmd_enrich(config: &KatalogConfig, record: &Path, holdings: Option<&Path>) -> Result<()> {
    println!("{}", to_json(&enrich_files(config, record, holdings)?)?);
    Ok(())
}

// ============================================================================
// serve
// ============================================================================

/// Paths and address for `katalog serve`, after CLI overrides.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Listen address.
    pub bind: String,
    /// Records file.
    pub records: Option<std::path::PathBuf>,
    /// Holdings file.
    pub holdings: Option<std::path::PathBuf>,
}

/// Build the catalog service from configuration and data files.
///
/// # Errors
///
/// Configuration errors, or I/O and JSON errors loading the data files.
pub fn build_service(config: &KatalogConfig, options: &ServeOptions) -> Result<CatalogService> {
    let index = match &options.records {
        Some(path) => MemoryIndex::from_json(&read_file(path)?)?,
        None => MemoryIndex::default(),
    };
    let holdings = match &options.holdings {
        Some(path) => StaticHoldings::from_json(&read_file(path)?)?,
        None => StaticHoldings::new(),
    };
    log::info!(
        "Loaded {} records; holdings from {}",
        index.len(),
        options
            .holdings
            .as_deref()
            .map_or_else(|| "nowhere".to_string(), |p| p.display().to_string())
    );

    Ok(CatalogService::new(
        Arc::new(index),
        Arc::new(holdings),
        Arc::new(config.search_config()?),
    )
    .with_enricher(RecordEnricher::new(config.record.clone())))
}

/// `katalog serve`
pub async fn cmd_serve(config: &KatalogConfig, options: ServeOptions) -> Result<()> {
    let service = build_service(config, &options)?;
    let resolver = BrandResolver::new(config.brand_table()?);
    let app = router(service, resolver, config.server.unknown_brand);

    let listener = tokio::net::TcpListener::bind(&options.bind)
        .await
        .map_err(|e| Error::config(format!("cannot bind {}: {e}", options.bind)))?;
    log::info!("Serving catalog on http://{}", options.bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::upstream_with_source("http", "server stopped", e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_file(dir: &tempfile::TempDir, content: &str) -> String {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_run_config_init_then_brand() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml").to_str().unwrap().to_string();

        run(
            Command::Config {
                action: crate::cli::ConfigAction::Init {
                    file: None,
                    force: false,
                },
            },
            Some(&path),
        )
        .await
        .unwrap();

        run(Command::Brand { hint: None }, Some(&path)).await.unwrap();
        let err = run(
            Command::Brand {
                hint: Some("atlantis".to_string()),
            },
            Some(&path),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_run_validates_only_non_config_commands() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = config_file(&dir, "[brands]\ndefault = \"central\"\n");

        run(
            Command::Config {
                action: crate::cli::ConfigAction::Get {
                    key: "brands.default".to_string(),
                },
            },
            Some(&path),
        )
        .await
        .unwrap();

        let err = run(Command::Brand { hint: None }, Some(&path))
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_resolve_brand_default_and_unknown() {
        let config = KatalogConfig::default();
        assert_eq!(resolve_brand(&config, None).unwrap().brand_id, "neos");
        assert!(resolve_brand(&config, Some("atlantis")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_apply_facet_args() {
        let request =
            apply_facet_args(SearchRequest::new("maps"), &["format=Book".to_string()]).unwrap();
        assert_eq!(request.facet_filters["format"], vec!["Book"]);
        assert!(apply_facet_args(SearchRequest::default(), &["format".to_string()]).is_err());
    }

    #[test]
    fn test_query_params_for_fielded_search() {
        let request = SearchRequest::new("prairie").with_search_field("title");
        let params = query_params(&KatalogConfig::default(), &request).unwrap();
        assert!(params.contains(&"q={!qf=$title_qf pf=$title_pf}prairie".to_string()));
        assert!(params.contains(&"spellcheck.dictionary=title".to_string()));
        assert!(params.contains(&"rows=10".to_string()));
    }

    #[test]
    fn test_query_params_unknown_sort() {
        let request = SearchRequest::new("x").with_sort("popularity");
        let err = query_params(&KatalogConfig::default(), &request).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_enrich_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let record = dir.path().join("record.json");
        let holdings = dir.path().join("holdings.json");
        std::fs::write(
            &record,
            r#"{"id": "r1", "subject_t": ["Fiction--Mystery"], "author_addl_t": ["Smith, J."]}"#,
        )
        .unwrap();
        std::fs::write(&holdings, r#"[{"location": "Annex"}, {"location": "main"}]"#).unwrap();

        let enriched = enrich_files(&KatalogConfig::default(), &record, Some(&holdings)).unwrap();
        assert_eq!(enriched.title, "Untitled document");
        assert_eq!(enriched.holdings[0].location.as_deref(), Some("main"));
    }

    #[test]
    fn test_enrich_missing_file() {
        let err = enrich_files(
            &KatalogConfig::default(),
            Path::new("/nonexistent/record.json"),
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), katalog_core::ErrorKind::Io);
    }

    #[tokio::test]
    async fn test_build_service_from_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let records = dir.path().join("records.json");
        std::fs::write(&records, r#"[{"id": "r1", "title_display": "Prairie Fire"}]"#).unwrap();

        let options = ServeOptions {
            bind: "127.0.0.1:0".to_string(),
            records: Some(records),
            holdings: None,
        };
        let config = KatalogConfig::default();
        let service = build_service(&config, &options).unwrap();
        let brand = resolve_brand(&config, None).unwrap();

        let view = service.show(brand, "r1").await.unwrap();
        assert_eq!(view.enriched.title, "Prairie Fire");
    }
}
