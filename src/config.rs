//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

const DEFAULT_REPORT_SECRET: &str = "cardiocheck-report-secret-change-in-production";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Path to the serialized classifier (`.json` or `.onnx`)
    pub model_path: PathBuf,

    /// HMAC secret for report tokens
    pub report_secret: String,

    /// Report token lifetime in minutes
    pub report_token_ttl_minutes: i64,

    /// Reject report downloads that carry no signed token
    pub require_signed_reports: bool,

    /// Environment (development, production)
    pub environment: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            model_path: PathBuf::from("models/heart_disease_model.json"),
            report_secret: DEFAULT_REPORT_SECRET.to_string(),
            report_token_ttl_minutes: 60,
            require_signed_reports: false,
            environment: "development".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            report_secret: env::var("REPORT_SECRET")
                .unwrap_or(defaults.report_secret),

            report_token_ttl_minutes: env::var("REPORT_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(defaults.report_token_ttl_minutes),

            require_signed_reports: env::var("REQUIRE_SIGNED_REPORTS")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.require_signed_reports),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or(defaults.log_format),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// True while the built-in development secret is in use
    pub fn uses_default_secret(&self) -> bool {
        self.report_secret == DEFAULT_REPORT_SECRET
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
