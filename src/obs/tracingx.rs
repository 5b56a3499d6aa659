use tracing_subscriber::EnvFilter;

/// Nível padrão quando `RUST_LOG` não está definido.
pub const DEFAULT_DIRECTIVE: &str = "info";

pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Commit reportado em spans e no `Resource` OTel (`BASKET_COMMIT_SHA`).
pub fn commit_sha() -> String {
    std::env::var("BASKET_COMMIT_SHA").unwrap_or_else(|_| "unknown".into())
}
