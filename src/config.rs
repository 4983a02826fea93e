use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use time::UtcOffset;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimingsConfig {
    pub api_url: String,
    pub country: String,
    pub method: u8,
    pub timeout_secs: u64,
}

impl TimingsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub timings: TimingsConfig,
    /// Hours east of UTC used to decide "today" and "now".
    pub utc_offset_hours: i8,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://namoz.db?mode=rwc".into());
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "namoz-tracker".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "namoz-tracker-web".into()),
            ttl_minutes: env_parse("SESSION_TTL_MINUTES").unwrap_or(60 * 24 * 7),
            cookie_secure: env_parse("COOKIE_SECURE").unwrap_or(false),
        };
        let timings = TimingsConfig {
            api_url: std::env::var("TIMINGS_API_URL")
                .unwrap_or_else(|_| "https://api.aladhan.com/v1".into()),
            country: std::env::var("TIMINGS_COUNTRY").unwrap_or_else(|_| "Uzbekistan".into()),
            method: env_parse("TIMINGS_METHOD").unwrap_or(2),
            timeout_secs: env_parse("TIMINGS_TIMEOUT_SECS").unwrap_or(10),
        };
        let utc_offset_hours = env_parse("UTC_OFFSET_HOURS").unwrap_or(5);
        Ok(Self {
            database_url,
            session,
            timings,
            utc_offset_hours,
        })
    }

    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(offset: i8) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            session: SessionConfig {
                secret: "s".into(),
                issuer: "i".into(),
                audience: "a".into(),
                ttl_minutes: 5,
                cookie_secure: false,
            },
            timings: TimingsConfig {
                api_url: "http://localhost".into(),
                country: "Uzbekistan".into(),
                method: 2,
                timeout_secs: 3,
            },
            utc_offset_hours: offset,
        }
    }

    #[test]
    fn utc_offset_uses_configured_hours() {
        assert_eq!(sample(5).utc_offset().whole_hours(), 5);
        assert_eq!(sample(-3).utc_offset().whole_hours(), -3);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        assert_eq!(sample(30).utc_offset(), UtcOffset::UTC);
    }

    #[test]
    fn timings_timeout_is_in_seconds() {
        assert_eq!(sample(0).timings.timeout(), Duration::from_secs(3));
    }
}
