use std::sync::Arc;

use crate::config::Config;
use chrono::NaiveDate;
use chrono_tz::Tz;
use dtjournal_core::codec::CompressOptions;
use dtjournal_core::journal::{JournalService, JournalServiceTrait};
use dtjournal_core::utils::time_utils::journal_today;
use dtjournal_storage_sqlite::{db, KeyValueRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub journal_service: Arc<dyn JournalServiceTrait>,
    pub kv_repository: Arc<KeyValueRepository>,
    pub image_options: CompressOptions,
    pub timezone: Option<Tz>,
}

impl AppState {
    /// Today's journal date in the configured zone.
    pub fn today(&self) -> NaiveDate {
        journal_today(self.timezone)
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("DTJ_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&db::get_db_path(&config.db_path))?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let kv_repository = Arc::new(
        KeyValueRepository::new(pool.clone(), writer).with_quota(config.storage_quota_bytes),
    );
    let journal_service: Arc<dyn JournalServiceTrait> =
        Arc::new(JournalService::new(kv_repository.clone()));

    let records = journal_service.load_all();
    tracing::info!(
        "Journal ready: {} day records, quota {} bytes",
        records.len(),
        config.storage_quota_bytes
    );

    Ok(Arc::new(AppState {
        journal_service,
        kv_repository,
        image_options: config.image,
        timezone: config.timezone,
    }))
}
