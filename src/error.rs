use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::flash::{self, Notice};

/// Errors surfaced at the request boundary.
///
/// Domain variants turn into a notice plus a redirect; infrastructure
/// variants become a plain 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("username already taken")]
    DuplicateUsername,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("prayer timings unavailable")]
    TimingsUnavailable,

    #[error("invalid input: {notice:?}")]
    Validation { notice: Notice, back: &'static str },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid(notice: Notice, back: &'static str) -> Self {
        AppError::Validation { notice, back }
    }

    /// Where the user is sent, and what they are told, for domain errors.
    pub fn redirect(&self) -> Option<(&'static str, Notice)> {
        match self {
            AppError::DuplicateUsername => Some(("/register", Notice::DuplicateUsername)),
            AppError::DuplicateEmail => Some(("/register", Notice::DuplicateEmail)),
            AppError::InvalidCredentials => Some(("/login", Notice::InvalidCredentials)),
            AppError::Unauthenticated => Some(("/login", Notice::LoginRequired)),
            AppError::TimingsUnavailable => Some(("/dashboard", Notice::TimingsUnavailable)),
            AppError::Validation { notice, back } => Some((back, *notice)),
            AppError::Database(_) | AppError::Internal(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.redirect() {
            Some((to, notice)) => flash::redirect_with(to, notice),
            None => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
