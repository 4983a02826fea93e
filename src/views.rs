//! Server-rendered pages. Plain strings; every dynamic value goes through
//! [`escape`].

use std::fmt::Write;

use axum::{
    http::{header, HeaderMap},
    response::Html,
};
use time::Date;

use crate::auth::repo_types::User;
use crate::flash::Notice;
use crate::i18n::{self, Language, Text, REGIONS};
use crate::prayers::{
    repo_types::PrayerRecord,
    services::{DayFlags, PrayerName, RangeSummary},
};
use crate::timings::PrayerTimes;

/// Whether the client asked for JSON instead of a page.
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("application/json"))
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(
    lang: Language,
    title: Text,
    notice: Option<Notice>,
    signed_in: bool,
    body: &str,
) -> Html<String> {
    let t = |k: Text| i18n::text(lang, k);
    let nav = if signed_in {
        [
            ("/dashboard", Text::Dashboard),
            ("/mark-prayer", Text::MarkPrayer),
            ("/prayer-analysis", Text::PrayerAnalysis),
            ("/settings", Text::Settings),
            ("/logout", Text::Logout),
        ]
        .iter()
        .map(|(href, k)| format!(r#"<a href="{href}">{}</a>"#, t(*k)))
        .collect::<Vec<_>>()
        .join(" | ")
    } else {
        format!(
            r#"<a href="/login">{}</a> | <a href="/register">{}</a>"#,
            t(Text::Login),
            t(Text::Register),
        )
    };
    let alert = notice
        .map(|n| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                n.level().css_class(),
                escape(i18n::notice(lang, n))
            )
        })
        .unwrap_or_default();
    Html(format!(
        r#"<!doctype html>
<html lang="{code}">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav>{nav}</nav>
{alert}
<h1>{title}</h1>
{body}
</body>
</html>"#,
        code = lang.code(),
        title = escape(t(title)),
    ))
}

fn region_options(selected: Option<&str>) -> String {
    REGIONS.iter().fold(String::new(), |mut out, r| {
        let sel = if Some(*r) == selected { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{0}"{sel}>{0}</option>"#, escape(r));
        out
    })
}

pub fn login_page(lang: Language, notice: Option<Notice>) -> Html<String> {
    let t = |k| i18n::text(lang, k);
    let body = format!(
        r#"<form method="post" action="/login">
<label>{} <input type="email" name="email" required></label>
<label>{} <input type="password" name="password" required></label>
<button type="submit">{}</button>
</form>"#,
        t(Text::Email),
        t(Text::Password),
        t(Text::Login),
    );
    layout(lang, Text::Login, notice, false, &body)
}

pub fn register_page(lang: Language, notice: Option<Notice>) -> Html<String> {
    let t = |k| i18n::text(lang, k);
    let body = format!(
        r#"<form method="post" action="/register">
<label>{} <input name="username" required></label>
<label>{} <input type="email" name="email" required></label>
<label>{} <input type="password" name="password" required></label>
<label>{} <select name="region">{}</select></label>
<button type="submit">{}</button>
</form>"#,
        t(Text::Username),
        t(Text::Email),
        t(Text::Password),
        t(Text::Region),
        region_options(Some(i18n::DEFAULT_REGION)),
        t(Text::Register),
    );
    layout(lang, Text::Register, notice, false, &body)
}

pub fn dashboard_page(
    lang: Language,
    notice: Option<Notice>,
    user: &User,
    times: Option<&PrayerTimes>,
    today: DayFlags,
) -> Html<String> {
    let t = |k| i18n::text(lang, k);
    let mut body = format!(
        "<p>{}: {}</p>\n<h2>{}</h2>\n",
        t(Text::Region),
        escape(user.region.as_deref().unwrap_or("-")),
        t(Text::PrayerTimes),
    );
    match times {
        Some(times) => {
            body.push_str("<table>\n");
            for (p, at) in times.iter() {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td>{}</td></tr>",
                    i18n::prayer(lang, p),
                    escape(at)
                );
            }
            body.push_str("</table>\n");
        }
        None => {
            let _ = writeln!(body, "<p>{}</p>", t(Text::TimingsUnavailable));
        }
    }

    let _ = writeln!(body, r#"<h2>{}</h2>"#, t(Text::TodayPrayers));
    body.push_str(r#"<form method="post" action="/save-prayer">"#);
    for p in PrayerName::ALL {
        let checked = if today.get(p) { " checked" } else { "" };
        let _ = write!(
            body,
            r#"<label><input type="checkbox" name="prayer" value="{}"{checked}> {}</label>"#,
            p.label(),
            i18n::prayer(lang, p),
        );
    }
    let _ = write!(body, r#"<button type="submit">{}</button></form>"#, t(Text::Save));
    layout(lang, Text::Dashboard, notice, true, &body)
}

pub fn mark_prayer_page(
    lang: Language,
    notice: Option<Notice>,
    now: &str,
    pending: &[(PrayerName, String)],
) -> Html<String> {
    let t = |k| i18n::text(lang, k);
    let mut body = format!("<p>{}: {}</p>\n", t(Text::CurrentTime), escape(now));
    if pending.is_empty() {
        let _ = writeln!(body, "<p>{}</p>", t(Text::NothingToMark));
    } else {
        body.push_str(r#"<form method="post" action="/mark-prayer">"#);
        for (p, at) in pending {
            let _ = write!(
                body,
                r#"<label><input type="checkbox" name="prayer" value="{}"> {} ({})</label>"#,
                p.label(),
                i18n::prayer(lang, *p),
                escape(at),
            );
        }
        let _ = write!(body, r#"<button type="submit">{}</button></form>"#, t(Text::Save));
    }
    layout(lang, Text::MarkPrayer, notice, true, &body)
}

pub fn analysis_page(
    lang: Language,
    notice: Option<Notice>,
    range: Option<(Date, Date)>,
    records: &[PrayerRecord],
    summary: &RangeSummary,
) -> Html<String> {
    let t = |k| i18n::text(lang, k);
    let (start, end) = range
        .map(|(s, e)| (s.to_string(), e.to_string()))
        .unwrap_or_default();
    let mut body = format!(
        r#"<form method="post" action="/prayer-analysis">
<label>{} <input type="date" name="start_date" value="{}"></label>
<label>{} <input type="date" name="end_date" value="{}"></label>
<button type="submit">{}</button>
</form>
"#,
        t(Text::StartDate),
        escape(&start),
        t(Text::EndDate),
        escape(&end),
        t(Text::Show),
    );

    if range.is_some() {
        let _ = write!(body, "<table>\n<tr><th>{}</th>", t(Text::Date));
        for p in PrayerName::ALL {
            let _ = write!(body, "<th>{}</th>", i18n::prayer(lang, p));
        }
        body.push_str("</tr>\n");
        for r in records {
            let flags = r.flags();
            let _ = write!(body, "<tr><td>{}</td>", r.day);
            for p in PrayerName::ALL {
                body.push_str(if flags.get(p) { "<td>✓</td>" } else { "<td>✗</td>" });
            }
            body.push_str("</tr>\n");
        }
        let _ = write!(body, "<tr><th>{} {}</th>", t(Text::RecordedDays), summary.days);
        for p in PrayerName::ALL {
            let _ = write!(body, "<th>{}</th>", summary.get(p));
        }
        body.push_str("</tr>\n</table>\n");
    }
    layout(lang, Text::PrayerAnalysis, notice, true, &body)
}

pub fn settings_page(lang: Language, notice: Option<Notice>, user: &User) -> Html<String> {
    let t = |k| i18n::text(lang, k);
    let languages = Language::ALL.iter().fold(String::new(), |mut out, l| {
        let sel = if *l == lang { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{0}"{sel}>{0}</option>"#, l.code());
        out
    });
    let body = format!(
        r#"<form method="post" action="/settings">
<label>{} <input name="region" list="regions" value="{}"></label>
<datalist id="regions">{}</datalist>
<label>{} <select name="language">{}</select></label>
<button type="submit">{}</button>
</form>"#,
        t(Text::Region),
        escape(user.region.as_deref().unwrap_or_default()),
        region_options(user.region.as_deref()),
        t(Text::Language),
        languages,
        t(Text::Save),
    );
    layout(lang, Text::Settings, notice, true, &body)
}
