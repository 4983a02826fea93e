use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::services::{normalize_hhmm, PrayerTimes};
use crate::config::TimingsConfig;

/// Why timings could not be produced. Callers treat every variant the same
/// way; the reason only matters for logs.
#[derive(Debug, Error)]
pub enum Unavailable {
    #[error("no region set")]
    NoRegion,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait TimingsGateway: Send + Sync {
    async fn fetch_timings(&self, region: &str) -> Result<PrayerTimes, Unavailable>;
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    data: ApiData,
}

#[derive(Debug, Deserialize)]
struct ApiData {
    timings: ApiTimings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiTimings {
    fajr: String,
    dhuhr: String,
    asr: String,
    maghrib: String,
    isha: String,
}

impl TryFrom<ApiTimings> for PrayerTimes {
    type Error = Unavailable;

    fn try_from(t: ApiTimings) -> Result<Self, Self::Error> {
        let field = |name: &str, raw: &str| {
            normalize_hhmm(raw)
                .ok_or_else(|| Unavailable::Malformed(format!("{name} = {raw:?} is not HH:MM")))
        };
        Ok(Self {
            fajr: field("Fajr", &t.fajr)?,
            dhuhr: field("Dhuhr", &t.dhuhr)?,
            asr: field("Asr", &t.asr)?,
            maghrib: field("Maghrib", &t.maghrib)?,
            isha: field("Isha", &t.isha)?,
        })
    }
}

/// Client for the aladhan.com `timingsByCity` endpoint.
#[derive(Debug, Clone)]
pub struct AladhanGateway {
    client: Client,
    base_url: String,
    country: String,
    method: String,
}

impl AladhanGateway {
    pub fn new(cfg: &TimingsConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout())
            .user_agent(concat!("namoz-tracker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            country: cfg.country.clone(),
            method: cfg.method.to_string(),
        })
    }

    async fn request(&self, region: &str) -> Result<PrayerTimes, Unavailable> {
        let url = format!("{}/timingsByCity", self.base_url);
        debug!(%url, region, "requesting prayer timings");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("city", region),
                ("country", self.country.as_str()),
                ("method", self.method.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Unavailable::Status(status.as_u16()));
        }

        let body: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| Unavailable::Malformed(e.to_string()))?;
        body.data.timings.try_into()
    }
}

#[async_trait]
impl TimingsGateway for AladhanGateway {
    #[instrument(skip(self))]
    async fn fetch_timings(&self, region: &str) -> Result<PrayerTimes, Unavailable> {
        if region.trim().is_empty() {
            return Err(Unavailable::NoRegion);
        }
        let result = self.request(region.trim()).await;
        if let Err(e) = &result {
            warn!(error = %e, region, "prayer timings unavailable");
        }
        result
    }
}
