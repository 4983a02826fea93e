use serde::Serialize;
use time::{macros::format_description, OffsetDateTime, UtcOffset};

use crate::prayers::services::PrayerName;

/// Daily prayer times as zero-padded 24-hour "HH:MM" strings.
///
/// Serialized with the Uzbek prayer labels as keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrayerTimes {
    #[serde(rename = "Bomdod")]
    pub fajr: String,
    #[serde(rename = "Peshin")]
    pub dhuhr: String,
    #[serde(rename = "Asr")]
    pub asr: String,
    #[serde(rename = "Shom")]
    pub maghrib: String,
    #[serde(rename = "Xufton")]
    pub isha: String,
}

impl PrayerTimes {
    pub fn get(&self, p: PrayerName) -> &str {
        match p {
            PrayerName::Fajr => &self.fajr,
            PrayerName::Dhuhr => &self.dhuhr,
            PrayerName::Asr => &self.asr,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isha => &self.isha,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrayerName, &str)> + '_ {
        PrayerName::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

/// Prayers whose time is at or before `now`.
///
/// Both sides are zero-padded "HH:MM", so string order is time order.
pub fn filter_available(times: &PrayerTimes, now: &str) -> Vec<(PrayerName, String)> {
    times
        .iter()
        .filter(|(_, t)| *t <= now)
        .map(|(p, t)| (p, t.to_string()))
        .collect()
}

/// Extracts the leading "HH:MM" from an API value such as `"05:12 (+05)"`.
pub fn normalize_hhmm(raw: &str) -> Option<String> {
    let head = raw.split_whitespace().next()?;
    let (h, m) = head.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hour: u8 = h.parse().ok()?;
    let minute: u8 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(format!("{hour:02}:{minute:02}"))
}

pub fn local_now(offset: UtcOffset) -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(offset)
}

pub fn hhmm(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| format!("{:02}:{:02}", at.hour(), at.minute()))
}
