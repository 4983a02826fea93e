use axum::{
    extract::{Form, FromRef, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm, SettingsForm},
        services,
        session::{logout_cookie, CurrentUser, SessionKeys},
    },
    error::AppResult,
    flash::{self, Flash, Notice},
    i18n::Language,
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/settings", get(settings_form).post(save_settings))
}

pub async fn index() -> Redirect {
    Redirect::to("/login")
}

pub async fn register_form(flash: Flash) -> Response {
    let mut res = views::register_page(Language::default(), flash.0).into_response();
    flash.consume(&mut res);
    res
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    services::register(
        &state.db,
        &form.username,
        &form.email,
        &form.password,
        form.region.as_deref(),
    )
    .await?;
    Ok(flash::redirect_with("/login", Notice::Registered))
}

pub async fn login_form(flash: Flash) -> Response {
    let mut res = views::login_page(Language::default(), flash.0).into_response();
    flash.consume(&mut res);
    res
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let user = services::authenticate(&state.db, &form.email, &form.password).await?;
    let session = SessionKeys::from_ref(&state).login_cookie(user.id)?;
    Ok(flash::see_other(
        "/dashboard",
        &[session, flash::notice_cookie(Notice::LoggedIn)],
    ))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(CurrentUser(user): CurrentUser) -> Response {
    info!("user logged out");
    flash::see_other(
        "/login",
        &[logout_cookie(), flash::notice_cookie(Notice::LoggedOut)],
    )
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn settings_form(CurrentUser(user): CurrentUser, flash: Flash) -> Response {
    let lang = Language::resolve(user.language.as_deref());
    let mut res = views::settings_page(lang, flash.0, &user).into_response();
    flash.consume(&mut res);
    res
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn save_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<SettingsForm>,
) -> AppResult<Response> {
    services::update_profile(
        &state.db,
        user.id,
        form.region.as_deref(),
        form.language.as_deref(),
    )
    .await?;
    Ok(flash::redirect_with("/settings", Notice::SettingsSaved))
}
