//! Log filter for the `katalog` binary.

/// Default `EnvFilter` directives when `RUST_LOG` is unset.
///
/// Targets are the crate module paths (`katalog_cli`, `katalog_record`, ...).
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info,katalog_cli=debug,katalog_record=debug,katalog_brand=info,katalog_search=info"
    }
}
