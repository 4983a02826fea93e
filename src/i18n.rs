//! Static string table for the two supported interface languages.

use crate::{flash::Notice, prayers::services::PrayerName};

/// Cities offered as region suggestions. Not enforced: the timings API
/// accepts any locality name.
pub const REGIONS: [&str; 11] = [
    "Toshkent",
    "Samarqand",
    "Buxoro",
    "Xiva",
    "Namangan",
    "Andijon",
    "Farg‘ona",
    "Qo‘qon",
    "Navoiy",
    "Qarshi",
    "Jizzax",
];

pub const DEFAULT_REGION: &str = "Toshkent";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Uz,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Uz, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Uz => "uz",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Stored preference, falling back to the default for unknown values.
    pub fn resolve(stored: Option<&str>) -> Self {
        stored.and_then(Self::from_code).unwrap_or_default()
    }
}

/// Page captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Login,
    Register,
    Logout,
    Username,
    Email,
    Password,
    Region,
    Language,
    Save,
    Dashboard,
    MarkPrayer,
    PrayerAnalysis,
    Settings,
    PrayerTimes,
    TodayPrayers,
    TimingsUnavailable,
    NothingToMark,
    StartDate,
    EndDate,
    Show,
    Date,
    RecordedDays,
    CurrentTime,
}

pub fn text(lang: Language, key: Text) -> &'static str {
    match (lang, key) {
        (Language::Uz, Text::Login) => "Kirish",
        (Language::Uz, Text::Register) => "Ro‘yxatdan o‘tish",
        (Language::Uz, Text::Logout) => "Chiqish",
        (Language::Uz, Text::Username) => "Foydalanuvchi nomi",
        (Language::Uz, Text::Email) => "Email",
        (Language::Uz, Text::Password) => "Parol",
        (Language::Uz, Text::Region) => "Hudud",
        (Language::Uz, Text::Language) => "Til",
        (Language::Uz, Text::Save) => "Saqlash",
        (Language::Uz, Text::Dashboard) => "Bosh sahifa",
        (Language::Uz, Text::MarkPrayer) => "Namozni belgilash",
        (Language::Uz, Text::PrayerAnalysis) => "Namoz tahlili",
        (Language::Uz, Text::Settings) => "Sozlamalar",
        (Language::Uz, Text::PrayerTimes) => "Namoz vaqtlari",
        (Language::Uz, Text::TodayPrayers) => "Bugungi namozlar",
        (Language::Uz, Text::TimingsUnavailable) => "Namoz vaqtlari mavjud emas",
        (Language::Uz, Text::NothingToMark) => "Hozircha belgilanadigan namoz yo‘q",
        (Language::Uz, Text::StartDate) => "Boshlanish sanasi",
        (Language::Uz, Text::EndDate) => "Tugash sanasi",
        (Language::Uz, Text::Show) => "Ko‘rsatish",
        (Language::Uz, Text::Date) => "Sana",
        (Language::Uz, Text::RecordedDays) => "Yozilgan kunlar",
        (Language::Uz, Text::CurrentTime) => "Hozirgi vaqt",
        (Language::En, Text::Login) => "Log in",
        (Language::En, Text::Register) => "Register",
        (Language::En, Text::Logout) => "Log out",
        (Language::En, Text::Username) => "Username",
        (Language::En, Text::Email) => "Email",
        (Language::En, Text::Password) => "Password",
        (Language::En, Text::Region) => "Region",
        (Language::En, Text::Language) => "Language",
        (Language::En, Text::Save) => "Save",
        (Language::En, Text::Dashboard) => "Dashboard",
        (Language::En, Text::MarkPrayer) => "Mark prayers",
        (Language::En, Text::PrayerAnalysis) => "Prayer analysis",
        (Language::En, Text::Settings) => "Settings",
        (Language::En, Text::PrayerTimes) => "Prayer times",
        (Language::En, Text::TodayPrayers) => "Today's prayers",
        (Language::En, Text::TimingsUnavailable) => "Prayer times are unavailable",
        (Language::En, Text::NothingToMark) => "Nothing to mark yet",
        (Language::En, Text::StartDate) => "Start date",
        (Language::En, Text::EndDate) => "End date",
        (Language::En, Text::Show) => "Show",
        (Language::En, Text::Date) => "Date",
        (Language::En, Text::RecordedDays) => "Recorded days",
        (Language::En, Text::CurrentTime) => "Current time",
    }
}

pub fn notice(lang: Language, n: Notice) -> &'static str {
    match (lang, n) {
        (Language::Uz, Notice::Registered) => {
            "Ro‘yxatdan muvaffaqiyatli o‘tdingiz! Endi tizimga kiring."
        }
        (Language::Uz, Notice::LoggedIn) => "Tizimga muvaffaqiyatli kirdingiz!",
        (Language::Uz, Notice::LoggedOut) => "Tizimdan chiqdingiz!",
        (Language::Uz, Notice::PrayerMarked) => "Namoz belgilandi!",
        (Language::Uz, Notice::PrayersSaved) => "Namozlar muvaffaqiyatli saqlandi!",
        (Language::Uz, Notice::SettingsSaved) => "Muvaffaqiyatli saqlandi!",
        (Language::Uz, Notice::DuplicateUsername) => "Bu foydalanuvchi nomi allaqachon mavjud!",
        (Language::Uz, Notice::DuplicateEmail) => "Bu email allaqachon ishlatilgan!",
        (Language::Uz, Notice::InvalidCredentials) => "Login yoki parol noto‘g‘ri!",
        (Language::Uz, Notice::LoginRequired) => "Iltimos, avval tizimga kiring.",
        (Language::Uz, Notice::TimingsUnavailable) => {
            "Namoz vaqtlari yuklanmadi, iltimos qayta urinib ko‘ring!"
        }
        (Language::Uz, Notice::InvalidDate) => "Sana YYYY-MM-DD ko‘rinishida bo‘lishi kerak.",
        (Language::Uz, Notice::InvalidInput) => "Maydonlar to‘g‘ri to‘ldirilmagan.",
        (Language::Uz, Notice::UnsupportedLanguage) => "Bu til qo‘llab-quvvatlanmaydi.",
        (Language::En, Notice::Registered) => "Registration successful! Please log in.",
        (Language::En, Notice::LoggedIn) => "Logged in successfully!",
        (Language::En, Notice::LoggedOut) => "You have been logged out.",
        (Language::En, Notice::PrayerMarked) => "Prayers marked!",
        (Language::En, Notice::PrayersSaved) => "Prayers saved!",
        (Language::En, Notice::SettingsSaved) => "Settings saved!",
        (Language::En, Notice::DuplicateUsername) => "This username is already taken!",
        (Language::En, Notice::DuplicateEmail) => "This email is already registered!",
        (Language::En, Notice::InvalidCredentials) => "Invalid email or password!",
        (Language::En, Notice::LoginRequired) => "Please log in first.",
        (Language::En, Notice::TimingsUnavailable) => {
            "Prayer times could not be loaded, please try again!"
        }
        (Language::En, Notice::InvalidDate) => "Dates must be in YYYY-MM-DD format.",
        (Language::En, Notice::InvalidInput) => "Please fill in the form correctly.",
        (Language::En, Notice::UnsupportedLanguage) => "This language is not supported.",
    }
}

pub fn prayer(lang: Language, p: PrayerName) -> &'static str {
    match (lang, p) {
        (Language::Uz, _) => p.label(),
        (Language::En, PrayerName::Fajr) => "Fajr",
        (Language::En, PrayerName::Dhuhr) => "Dhuhr",
        (Language::En, PrayerName::Asr) => "Asr",
        (Language::En, PrayerName::Maghrib) => "Maghrib",
        (Language::En, PrayerName::Isha) => "Isha",
    }
}
