//! Runtime settings
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Unparseable values fall back to their defaults and produce a warning
//! message for the caller to log.

use std::env;

use crate::utils::logger::LogFormat;

pub const ENV_REVALIDATE_ID_ON_UPDATE: &str = "BILLING_REVALIDATE_ID_ON_UPDATE";
pub const ENV_LOG_FORMAT: &str = "BILLING_LOG_FORMAT";
pub const ENV_LOG_FILTER: &str = "RUST_LOG";
pub const ENV_BATCH_MAX_ERRORS: &str = "BILLING_BATCH_MAX_ERRORS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSettings {
    /// Check format and checksum of the identification number when a record
    /// is edited. When off, update validation ignores the field entirely.
    pub revalidate_id_on_update: bool,
    pub log_format: LogFormat,
    pub log_filter: String,
    /// Stop a batch after this many invalid records.
    pub batch_max_errors: Option<usize>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            revalidate_id_on_update: true,
            log_format: LogFormat::Text,
            log_filter: "info".to_string(),
            batch_max_errors: None,
        }
    }
}

impl ValidationSettings {
    /// Loads `.env` (if present) and reads settings from the environment.
    ///
    /// Runs before logging is configured, so fallbacks are returned as
    /// warnings for the caller to log once a subscriber is installed.
    pub fn from_env() -> (Self, Vec<String>) {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let revalidate_id_on_update = match lookup(ENV_REVALIDATE_ID_ON_UPDATE) {
            None => defaults.revalidate_id_on_update,
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "invalid {} value {:?}, using {}",
                    ENV_REVALIDATE_ID_ON_UPDATE, raw, defaults.revalidate_id_on_update
                ));
                defaults.revalidate_id_on_update
            }),
        };

        let log_format = match lookup(ENV_LOG_FORMAT) {
            None => defaults.log_format,
            Some(raw) => LogFormat::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!("invalid {} value {:?}, using text", ENV_LOG_FORMAT, raw));
                defaults.log_format
            }),
        };

        let log_filter = lookup(ENV_LOG_FILTER)
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| defaults.log_filter.clone());

        let batch_max_errors = lookup(ENV_BATCH_MAX_ERRORS).and_then(|raw| {
            match raw.trim().parse::<usize>() {
                Ok(0) | Err(_) => {
                    warnings.push(format!(
                        "invalid {} value {:?}, batch size is unlimited",
                        ENV_BATCH_MAX_ERRORS, raw
                    ));
                    None
                }
                Ok(max) => Some(max),
            }
        });

        let settings = Self {
            revalidate_id_on_update,
            log_format,
            log_filter,
            batch_max_errors,
        };
        (settings, warnings)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
