//! Transient notices carried across a redirect in a short-lived cookie.
//!
//! The cookie holds only a notice code; the text is looked up in the
//! string table when the next page is rendered.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Danger,
}

impl Level {
    pub fn css_class(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Registered,
    LoggedIn,
    LoggedOut,
    PrayerMarked,
    PrayersSaved,
    SettingsSaved,
    DuplicateUsername,
    DuplicateEmail,
    InvalidCredentials,
    LoginRequired,
    TimingsUnavailable,
    InvalidDate,
    InvalidInput,
    UnsupportedLanguage,
}

const ALL: [Notice; 14] = [
    Notice::Registered,
    Notice::LoggedIn,
    Notice::LoggedOut,
    Notice::PrayerMarked,
    Notice::PrayersSaved,
    Notice::SettingsSaved,
    Notice::DuplicateUsername,
    Notice::DuplicateEmail,
    Notice::InvalidCredentials,
    Notice::LoginRequired,
    Notice::TimingsUnavailable,
    Notice::InvalidDate,
    Notice::InvalidInput,
    Notice::UnsupportedLanguage,
];

impl Notice {
    pub fn code(self) -> &'static str {
        match self {
            Notice::Registered => "registered",
            Notice::LoggedIn => "logged_in",
            Notice::LoggedOut => "logged_out",
            Notice::PrayerMarked => "prayer_marked",
            Notice::PrayersSaved => "prayers_saved",
            Notice::SettingsSaved => "settings_saved",
            Notice::DuplicateUsername => "duplicate_username",
            Notice::DuplicateEmail => "duplicate_email",
            Notice::InvalidCredentials => "invalid_credentials",
            Notice::LoginRequired => "login_required",
            Notice::TimingsUnavailable => "timings_unavailable",
            Notice::InvalidDate => "invalid_date",
            Notice::InvalidInput => "invalid_input",
            Notice::UnsupportedLanguage => "unsupported_language",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        ALL.into_iter().find(|n| n.code() == code)
    }

    pub fn level(self) -> Level {
        match self {
            Notice::Registered
            | Notice::LoggedIn
            | Notice::PrayerMarked
            | Notice::PrayersSaved
            | Notice::SettingsSaved => Level::Success,
            Notice::LoggedOut | Notice::LoginRequired => Level::Info,
            _ => Level::Danger,
        }
    }
}

pub fn notice_cookie(notice: Notice) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, notice.code()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_cookie() -> Cookie<'static> {
    let mut c = Cookie::build((FLASH_COOKIE, "")).path("/").build();
    c.make_removal();
    c
}

/// Finds a cookie value by name across every `Cookie` header of a request.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

pub fn append_cookie(res: &mut Response, cookie: &Cookie<'_>) {
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(v) => {
            res.headers_mut().append(header::SET_COOKIE, v);
        }
        Err(e) => tracing::error!(error = %e, name = cookie.name(), "cookie is not a valid header"),
    }
}

/// 303 redirect that also sets the given cookies.
pub fn see_other(to: &str, cookies: &[Cookie<'_>]) -> Response {
    let mut res = Redirect::to(to).into_response();
    for c in cookies {
        append_cookie(&mut res, c);
    }
    res
}

pub fn redirect_with(to: &str, notice: Notice) -> Response {
    see_other(to, &[notice_cookie(notice)])
}

/// Notice left by the previous response, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flash(pub Option<Notice>);

impl Flash {
    /// Drops the cookie once the notice has been shown.
    pub fn consume(&self, res: &mut Response) {
        if self.0.is_some() {
            append_cookie(res, &clear_cookie());
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Flash(
            read_cookie(&parts.headers, FLASH_COOKIE).and_then(|code| Notice::from_code(&code)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn codes_round_trip_for_every_notice() {
        for n in ALL {
            assert_eq!(Notice::from_code(n.code()), Some(n));
        }
        assert_eq!(Notice::from_code("nope"), None);
    }

    #[test]
    fn failures_are_danger_level() {
        assert_eq!(Notice::TimingsUnavailable.level(), Level::Danger);
        assert_eq!(Notice::DuplicateEmail.level(), Level::Danger);
        assert_eq!(Notice::PrayerMarked.level(), Level::Success);
        assert_eq!(Notice::LoggedOut.level(), Level::Info);
    }

    #[test]
    fn reads_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session=abc; flash=invalid_date"),
        );
        assert_eq!(read_cookie(&headers, "flash").as_deref(), Some("invalid_date"));
        assert_eq!(read_cookie(&headers, "session").as_deref(), Some("abc"));
        assert_eq!(read_cookie(&headers, "other"), None);
    }

    #[test]
    fn redirect_sets_location_and_notice() {
        let res = redirect_with("/dashboard", Notice::TimingsUnavailable);
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/dashboard");
        let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("flash=timings_unavailable"));
    }
}
