use serde::{Deserialize, Serialize};

use super::repo_types::PrayerRecord;
use super::services::{DayFlags, PrayerName, RangeSummary};
use crate::timings::PrayerTimes;

/// JSON body of `GET /dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub region: Option<String>,
    pub prayer_times: Option<PrayerTimes>,
    pub today_prayer: DayFlags,
}

#[derive(Debug, Serialize)]
pub struct PendingPrayer {
    pub prayer: PrayerName,
    pub label: &'static str,
    pub time: String,
}

/// JSON body of `GET /mark-prayer`.
#[derive(Debug, Serialize)]
pub struct MarkPrayerResponse {
    pub current_time: String,
    pub available: Vec<PendingPrayer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeForm {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordView {
    pub date: String,
    #[serde(flatten)]
    pub flags: DayFlags,
}

impl From<&PrayerRecord> for RecordView {
    fn from(r: &PrayerRecord) -> Self {
        Self {
            date: r.day.to_string(),
            flags: r.flags(),
        }
    }
}

/// JSON body of `POST /prayer-analysis`.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub prayers: Vec<RecordView>,
    pub summary: RangeSummary,
}
