//! Configuration module for the tanda backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Payout policy knobs that the spreadsheet variants disagreed on.
///
/// The source history computed the pool as both `contribution * N` and
/// `contribution * (N - 1)`, and compared the per-member payment count
/// against the full roster (beneficiary included). Both choices stay
/// configurable instead of hard-coding one reading.
#[derive(Debug, Clone, Copy)]
pub struct PayoutPolicy {
    /// When true the beneficiary also contributes to their own payout
    /// (pool = contribution * N instead of contribution * (N - 1)).
    pub pool_includes_beneficiary: bool,
    /// When true a turn auto-completes once all N participants confirmed
    /// a payment; when false the beneficiary is not expected to pay
    /// themselves (threshold N - 1).
    pub threshold_includes_beneficiary: bool,
}

impl Default for PayoutPolicy {
    fn default() -> Self {
        Self {
            pool_includes_beneficiary: false,
            threshold_includes_beneficiary: true,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared passphrase gating the API (required in production)
    pub api_passphrase: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Template for the WhatsApp reminder message; `{name}` is replaced
    /// with the participant's name.
    pub reminder_text: String,
    /// Pool and auto-completion arithmetic knobs
    pub policy: PayoutPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_passphrase = env::var("TANDA_API_PSK").ok();

        let db_path = env::var("TANDA_DB_PATH")
            .unwrap_or_else(|_| "./data/tanda.sqlite".to_string())
            .into();

        let bind_addr = env::var("TANDA_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid TANDA_BIND_ADDR format");

        let log_level = env::var("TANDA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let reminder_text = env::var("TANDA_REMINDER_TEXT").unwrap_or_else(|_| {
            "Hola {name}, recuerda tu aporte de la tanda de este mes.".to_string()
        });

        let policy = PayoutPolicy {
            pool_includes_beneficiary: env_flag("TANDA_POOL_INCLUDES_BENEFICIARY", false),
            threshold_includes_beneficiary: env_flag(
                "TANDA_THRESHOLD_INCLUDES_BENEFICIARY",
                true,
            ),
        };

        Self {
            api_passphrase,
            db_path,
            bind_addr,
            log_level,
            reminder_text,
            policy,
        }
    }
}

/// Read a boolean flag from the environment ("1", "true", "yes" are truthy).
fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}
