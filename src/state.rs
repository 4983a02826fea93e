use std::sync::Arc;

use sqlx::SqlitePool;
use time::{Date, OffsetDateTime};

use crate::config::AppConfig;
use crate::db;
use crate::timings::{services::local_now, AladhanGateway, TimingsGateway};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub timings: Arc<dyn TimingsGateway>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;

        // Real aladhan.com client
        let timings = Arc::new(AladhanGateway::new(&config.timings)?) as Arc<dyn TimingsGateway>;

        Ok(Self {
            db,
            config,
            timings,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        timings: Arc<dyn TimingsGateway>,
    ) -> Self {
        Self {
            db,
            config,
            timings,
        }
    }

    /// Wall-clock time in the configured local offset.
    pub fn now(&self) -> OffsetDateTime {
        local_now(self.config.utc_offset())
    }

    pub fn today(&self) -> Date {
        self.now().date()
    }
}
