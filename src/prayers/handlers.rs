use axum::{
    extract::{Form, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use time::{macros::format_description, Date};
use tracing::{info, instrument, warn};

use super::dto::{
    AnalysisResponse, DashboardResponse, MarkPrayerResponse, PendingPrayer, RangeForm, RecordView,
};
use super::repo_types::PrayerRecord;
use super::services::{summarize, MergePolicy, PrayerSet};
use crate::{
    auth::{repo_types::User, session::CurrentUser},
    error::{AppError, AppResult},
    flash::{self, Flash, Notice},
    i18n::{self, Language},
    state::AppState,
    timings::{filter_available, services::hhmm, PrayerTimes, Unavailable},
    views,
};

pub fn prayer_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/mark-prayer", get(mark_prayer_form).post(mark_prayer))
        .route("/save-prayer", post(save_prayer))
        .route("/prayer-analysis", get(analysis_form).post(analysis))
}

async fn timings_for(state: &AppState, user: &User) -> Result<PrayerTimes, Unavailable> {
    match user.region.as_deref() {
        Some(region) => state.timings.fetch_timings(region).await,
        None => Err(Unavailable::NoRegion),
    }
}

fn language(user: &User) -> Language {
    Language::resolve(user.language.as_deref())
}

/// Values of the repeated `prayer` form field.
fn asserted_prayers(fields: &[(String, String)]) -> PrayerSet {
    PrayerSet::from_names(
        fields
            .iter()
            .filter(|(k, _)| k == "prayer")
            .map(|(_, v)| v.as_str()),
    )
}

fn parse_day(raw: &str) -> AppResult<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        warn!(value = %raw, error = %e, "invalid date");
        AppError::invalid(Notice::InvalidDate, "/prayer-analysis")
    })
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    headers: HeaderMap,
) -> AppResult<Response> {
    let times = timings_for(&state, &user).await.ok();
    let today = PrayerRecord::get_for_date(&state.db, user.id, state.today())
        .await?
        .map(|r| r.flags())
        .unwrap_or_default();

    if views::wants_json(&headers) {
        return Ok(Json(DashboardResponse {
            region: user.region.clone(),
            prayer_times: times,
            today_prayer: today,
        })
        .into_response());
    }

    let lang = language(&user);
    let mut res =
        views::dashboard_page(lang, flash.0, &user, times.as_ref(), today).into_response();
    flash.consume(&mut res);
    Ok(res)
}

/// Prayers whose time has passed today and are not marked yet.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn mark_prayer_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    headers: HeaderMap,
) -> AppResult<Response> {
    let times = timings_for(&state, &user)
        .await
        .map_err(|_| AppError::TimingsUnavailable)?;
    let now = state.now();
    let current_time = hhmm(now);
    let today = PrayerRecord::get_for_date(&state.db, user.id, now.date())
        .await?
        .map(|r| r.flags())
        .unwrap_or_default();

    let pending: Vec<_> = filter_available(&times, &current_time)
        .into_iter()
        .filter(|(p, _)| !today.get(*p))
        .collect();

    if views::wants_json(&headers) {
        let lang = language(&user);
        return Ok(Json(MarkPrayerResponse {
            current_time,
            available: pending
                .into_iter()
                .map(|(prayer, time)| PendingPrayer {
                    prayer,
                    label: i18n::prayer(lang, prayer),
                    time,
                })
                .collect(),
        })
        .into_response());
    }

    let mut res =
        views::mark_prayer_page(language(&user), flash.0, &current_time, &pending).into_response();
    flash.consume(&mut res);
    Ok(res)
}

/// Marks prayers for today; previously marked ones stay marked.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn mark_prayer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    timings_for(&state, &user)
        .await
        .map_err(|_| AppError::TimingsUnavailable)?;

    let asserted = asserted_prayers(&fields);
    let record = PrayerRecord::upsert_day(
        &state.db,
        user.id,
        state.today(),
        asserted,
        MergePolicy::Union,
    )
    .await?;

    info!(day = %record.day, marked = record.flags().count(), "prayers marked");
    Ok(flash::redirect_with("/dashboard", Notice::PrayerMarked))
}

/// Stores today's flags exactly as submitted.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn save_prayer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let asserted = asserted_prayers(&fields);
    let record = PrayerRecord::upsert_day(
        &state.db,
        user.id,
        state.today(),
        asserted,
        MergePolicy::Replace,
    )
    .await?;

    info!(day = %record.day, marked = record.flags().count(), "prayers saved");
    Ok(flash::redirect_with("/dashboard", Notice::PrayersSaved))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn analysis_form(CurrentUser(user): CurrentUser, flash: Flash) -> Response {
    let mut res = views::analysis_page(language(&user), flash.0, None, &[], &Default::default())
        .into_response();
    flash.consume(&mut res);
    res
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn analysis(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    headers: HeaderMap,
    Form(form): Form<RangeForm>,
) -> AppResult<Response> {
    let start = form.start_date.as_deref().filter(|s| !s.trim().is_empty());
    let end = form.end_date.as_deref().filter(|s| !s.trim().is_empty());

    let range = match (start, end) {
        (Some(s), Some(e)) => Some((parse_day(s)?, parse_day(e)?)),
        _ => None,
    };

    let records = match range {
        Some((s, e)) => PrayerRecord::get_range(&state.db, user.id, s, e).await?,
        None => Vec::new(),
    };
    let summary = summarize(records.iter().map(PrayerRecord::flags));

    if views::wants_json(&headers) {
        return Ok(Json(AnalysisResponse {
            start_date: range.map(|(s, _)| s.to_string()),
            end_date: range.map(|(_, e)| e.to_string()),
            prayers: records.iter().map(RecordView::from).collect(),
            summary,
        })
        .into_response());
    }

    let mut res = views::analysis_page(language(&user), flash.0, range, &records, &summary)
        .into_response();
    flash.consume(&mut res);
    Ok(res)
}
