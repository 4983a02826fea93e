use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

use super::services::DayFlags;

/// One user's prayers for one calendar day.
#[derive(Debug, Clone, FromRow)]
pub struct PrayerRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day: Date,
    pub fajr: bool,
    pub dhuhr: bool,
    pub asr: bool,
    pub maghrib: bool,
    pub isha: bool,
}

impl PrayerRecord {
    pub fn flags(&self) -> DayFlags {
        DayFlags {
            fajr: self.fajr,
            dhuhr: self.dhuhr,
            asr: self.asr,
            maghrib: self.maghrib,
            isha: self.isha,
        }
    }
}
