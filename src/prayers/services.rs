use serde::{Deserialize, Serialize};
use tracing::warn;

/// The five daily prayers, in the order they fall during the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// Column name and canonical key.
    pub fn key(self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    /// Uzbek name used by the forms and the dashboard JSON.
    pub fn label(self) -> &'static str {
        match self {
            PrayerName::Fajr => "Bomdod",
            PrayerName::Dhuhr => "Peshin",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Shom",
            PrayerName::Isha => "Xufton",
        }
    }

    /// Accepts either the label or the key, ignoring case.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(raw) || p.key().eq_ignore_ascii_case(raw))
    }
}

/// Set of prayers asserted as performed in one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrayerSet(u8);

impl PrayerSet {
    fn bit(p: PrayerName) -> u8 {
        1 << (p as u8)
    }

    pub fn insert(&mut self, p: PrayerName) {
        self.0 |= Self::bit(p);
    }

    pub fn contains(&self, p: PrayerName) -> bool {
        self.0 & Self::bit(p) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Builds a set from submitted form values; unknown names are dropped.
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Self::default();
        for raw in names {
            match PrayerName::parse(raw) {
                Some(p) => set.insert(p),
                None => warn!(prayer = %raw, "ignoring unknown prayer name"),
            }
        }
        set
    }
}

impl FromIterator<PrayerName> for PrayerSet {
    fn from_iter<T: IntoIterator<Item = PrayerName>>(iter: T) -> Self {
        let mut set = Self::default();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

/// The five flags of one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFlags {
    pub fajr: bool,
    pub dhuhr: bool,
    pub asr: bool,
    pub maghrib: bool,
    pub isha: bool,
}

impl DayFlags {
    pub fn get(&self, p: PrayerName) -> bool {
        match p {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }

    pub fn set(&mut self, p: PrayerName, value: bool) {
        match p {
            PrayerName::Fajr => self.fajr = value,
            PrayerName::Dhuhr => self.dhuhr = value,
            PrayerName::Asr => self.asr = value,
            PrayerName::Maghrib => self.maghrib = value,
            PrayerName::Isha => self.isha = value,
        }
    }

    pub fn from_set(set: PrayerSet) -> Self {
        let mut flags = Self::default();
        for p in PrayerName::ALL {
            flags.set(p, set.contains(p));
        }
        flags
    }

    pub fn count(&self) -> usize {
        PrayerName::ALL.into_iter().filter(|p| self.get(*p)).count()
    }
}

/// How newly asserted prayers combine with what is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Asserted flags become true; everything else keeps its value.
    Union,
    /// The stored flags become exactly the asserted set.
    Replace,
}

pub fn reconcile(existing: Option<DayFlags>, asserted: PrayerSet, policy: MergePolicy) -> DayFlags {
    match (existing, policy) {
        (Some(mut flags), MergePolicy::Union) => {
            for p in PrayerName::ALL.into_iter().filter(|p| asserted.contains(*p)) {
                flags.set(p, true);
            }
            flags
        }
        (Some(_), MergePolicy::Replace) | (None, _) => DayFlags::from_set(asserted),
    }
}

/// Per-prayer totals over a list of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub days: usize,
    pub fajr: usize,
    pub dhuhr: usize,
    pub asr: usize,
    pub maghrib: usize,
    pub isha: usize,
}

impl RangeSummary {
    pub fn get(&self, p: PrayerName) -> usize {
        match p {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }
}

pub fn summarize<I>(days: I) -> RangeSummary
where
    I: IntoIterator<Item = DayFlags>,
{
    days.into_iter().fold(RangeSummary::default(), |mut acc, d| {
        acc.days += 1;
        acc.fajr += usize::from(d.fajr);
        acc.dhuhr += usize::from(d.dhuhr);
        acc.asr += usize::from(d.asr);
        acc.maghrib += usize::from(d.maghrib);
        acc.isha += usize::from(d.isha);
        acc
    })
}
