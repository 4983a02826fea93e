use serde::Deserialize;

/// Body of `POST /register`. Missing fields deserialize empty and are
/// rejected by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub region: Option<String>,
}

/// Body of `POST /login`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body of `POST /settings`. Blank fields leave the stored value alone.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub region: Option<String>,
    pub language: Option<String>,
}
