//! Cookie-borne sessions.
//!
//! A session is a signed JWT stored in the `session` cookie. Anonymous
//! requests to protected routes are rejected with a redirect to `/login`
//! before any handler code runs.

use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::config::SessionConfig;
use crate::error::AppError;
use crate::flash::read_cookie;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Upper bound on the configured session lifetime (one year).
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Session token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
    pub cookie_secure: bool,
}

impl From<&SessionConfig> for SessionKeys {
    fn from(cfg: &SessionConfig) -> Self {
        let minutes = cfg.ttl_minutes.clamp(1, MAX_TTL_MINUTES).unsigned_abs();
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs(minutes * 60),
            cookie_secure: cfg.cookie_secure,
        }
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        SessionKeys::from(&state.config.session)
    }
}

impl SessionKeys {
    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "session verified");
        Ok(data.claims)
    }

    /// Cookie that establishes the session for `user_id`.
    pub fn login_cookie(&self, user_id: Uuid) -> anyhow::Result<Cookie<'static>> {
        let token = self.sign(user_id)?;
        Ok(Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.ttl.as_secs() as i64))
            .build())
    }
}

pub fn logout_cookie() -> Cookie<'static> {
    let mut c = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    c.make_removal();
    c
}

/// The logged-in user. Anonymous callers are redirected to `/login`.
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = read_cookie(&parts.headers, SESSION_COOKIE)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthenticated)?;

        let claims = match SessionKeys::from_ref(&state).verify(&token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired session");
                return Err(AppError::Unauthenticated);
            }
        };

        match User::find_by_id(&state.db, claims.sub).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(user_id = %claims.sub, "session for missing user");
                Err(AppError::Unauthenticated)
            }
        }
    }
}
