//! Application configuration loaded from environment variables.

/// Checkout configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `DATABASE_URL` — Postgres connection string (no default; in-memory
///   stores are used when unset)
/// - `RECEIPT_SENDER` — from-address on receipt mail (default:
///   `"noreply@marketplace.local"`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub receipt_sender: String,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            receipt_sender: std::env::var("RECEIPT_SENDER")
                .unwrap_or_else(|_| "noreply@marketplace.local".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            receipt_sender: "noreply@marketplace.local".to_string(),
            log_level: "info".to_string(),
        }
    }
}
