//! Process-wide configuration, extracted from the environment via figment.

use std::sync::LazyLock;

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;

/// Shipped fallback for `SECRET_KEY`. Startup logs a warning when it is
/// still in use; sessions signed with it are forgeable.
pub const DEFAULT_SECRET_KEY: &str = "replace_this_with_a_strong_secret";

/// Environment-driven settings. Field names map 1:1 to variable names
/// (`SECRET_KEY`, `DATABASE_URL`, `DEFAULT_ADMIN_USER`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Secret the session and flash cookies are keyed from.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Connection string for the relational store. Required; absence is
    /// reported when the store is first opened, not at extraction time.
    pub database_url: Option<String>,

    /// Credentials seeded by the bootstrap when the admin table is empty.
    #[serde(default = "default_admin_user")]
    pub default_admin_user: String,
    #[serde(default = "default_admin_pw")]
    pub default_admin_pw: String,

    /// Credentials written by `/reset_admin`.
    #[serde(default = "default_reset_user")]
    pub reset_admin_user: String,
    #[serde(default = "default_reset_pw")]
    pub reset_admin_pw: String,

    /// Gate for `/reset_admin`; the route answers 404 while this is unset.
    pub reset_admin_token: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, figment::Error> {
        Figment::new().merge(Env::raw()).extract()
    }
}

pub static CONFIG: LazyLock<AppConfig> =
    LazyLock::new(|| AppConfig::from_env().expect("invalid environment configuration"));

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

fn default_admin_user() -> String {
    "admin".to_string()
}

fn default_admin_pw() -> String {
    "admin123".to_string()
}

fn default_reset_user() -> String {
    "RBADMINS".to_string()
}

fn default_reset_pw() -> String {
    "RB_ADMINS_03".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_loglevel() -> String {
    "info".to_string()
}
