//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and shared read-only through `AppState`.

use crate::services::suggestions::SuggestionRules;
use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::str::FromStr;

/// Default bcrypt work factor for stored password hashes.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Which document store backs the data-access handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Firestore,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (CORS origin and cookie security)
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Document store to use
    pub storage_backend: StorageBackend,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
    /// Session token lifetime in days
    pub session_ttl_days: i64,
    /// Offset used to decide where calendar days begin and end
    pub local_offset: FixedOffset,
    /// Thresholds for the dashboard suggestion rules
    pub suggestion_rules: SuggestionRules,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Memory,
            // bcrypt's minimum; keeps hashing fast in tests
            bcrypt_cost: 4,
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            local_offset: utc(),
            suggestion_rules: SuggestionRules::default(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Firestore,
        };

        let bcrypt_cost = parse_or("BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        let offset_minutes: i32 = parse_or("LOCAL_UTC_OFFSET_MINUTES", 0)?;
        let local_offset = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or(ConfigError::Invalid("LOCAL_UTC_OFFSET_MINUTES"))?;

        let defaults = SuggestionRules::default();
        let suggestion_rules = SuggestionRules {
            cardio_share: parse_or("SUGGESTION_CARDIO_SHARE", defaults.cardio_share)?,
            strength_share: parse_or("SUGGESTION_STRENGTH_SHARE", defaults.strength_share)?,
            weeks_per_window: parse_or("SUGGESTION_WEEKS_PER_WINDOW", defaults.weeks_per_window)?,
            max_suggestions: defaults.max_suggestions,
        };

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .trim()
            .to_string()
            .into_bytes();
        if jwt_signing_key.is_empty() {
            return Err(ConfigError::Invalid("JWT_SIGNING_KEY"));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage_backend,
            bcrypt_cost,
            session_ttl_days: parse_or("SESSION_TTL_DAYS", DEFAULT_SESSION_TTL_DAYS)?,
            local_offset,
            suggestion_rules,
            jwt_signing_key,
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        !(self.frontend_url.starts_with("http://localhost")
            || self.frontend_url.starts_with("http://127.0.0.1"))
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
