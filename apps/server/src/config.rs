use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use dtjournal_core::codec::CompressOptions;
use dtjournal_core::constants::{
    DEFAULT_IMAGE_MAX_HEIGHT, DEFAULT_IMAGE_MAX_WIDTH, DEFAULT_IMAGE_QUALITY,
    DEFAULT_STORAGE_QUOTA_BYTES,
};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Total byte budget of the store, `0` disables it
    pub storage_quota_bytes: u64,
    /// Zone used to decide "today"; process-local when unset
    pub timezone: Option<Tz>,
    pub image: CompressOptions,
    pub static_dir: String,
}

/// Parses `key`, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("DTJ_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid DTJ_LISTEN_ADDR")?;
        let db_path = std::env::var("DTJ_DB_PATH").unwrap_or_else(|_| "./db/journal.db".into());
        let cors_allow = std::env::var("DTJ_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("DTJ_REQUEST_TIMEOUT_MS", 30000);
        let storage_quota_bytes = env_or("DTJ_STORAGE_QUOTA_BYTES", DEFAULT_STORAGE_QUOTA_BYTES);
        let timezone = std::env::var("DTJ_TIMEZONE")
            .ok()
            .filter(|tz| !tz.trim().is_empty())
            .and_then(|tz| match tz.trim().parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::warn!("Unknown DTJ_TIMEZONE {:?}, using local time", tz);
                    None
                }
            });
        let image = CompressOptions {
            max_width: env_or("DTJ_IMAGE_MAX_WIDTH", DEFAULT_IMAGE_MAX_WIDTH).max(1),
            max_height: env_or("DTJ_IMAGE_MAX_HEIGHT", DEFAULT_IMAGE_MAX_HEIGHT).max(1),
            quality: env_or("DTJ_IMAGE_QUALITY", DEFAULT_IMAGE_QUALITY),
        };
        let static_dir = std::env::var("DTJ_STATIC_DIR").unwrap_or_else(|_| "dist".into());
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            storage_quota_bytes,
            timezone,
            image,
            static_dir,
        })
    }
}
