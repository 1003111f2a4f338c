/*
 * Responsibility
 * - 環境変数の読み込み (APP_KIND, JWT_SECRET, PORT, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::services::auth::{DEFAULT_EXPIRY_SECONDS, MAX_EXPIRY_SECONDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Which of the three backends this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Blog,
    Shop,
    Travel,
}

impl AppKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Shop => "shop",
            Self::Travel => "travel",
        }
    }
}

impl FromStr for AppKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blog" => Ok(Self::Blog),
            "shop" => Ok(Self::Shop),
            "travel" => Ok(Self::Travel),
            _ => Err(ConfigError::Invalid("APP_KIND")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_kind: AppKind,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub jwt_secret: String,
    // Token lifetime (seconds)
    pub jwt_expire_seconds: i64,
}

// The secret stays out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_kind", &self.app_kind)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_expire_seconds", &self.jwt_expire_seconds)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_kind: AppKind = lookup("APP_KIND")
            .ok_or(ConfigError::Missing("APP_KIND"))?
            .parse()?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        // Required. There is no default secret.
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expire_seconds = match lookup("JWT_EXPIRE") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|v| (1..=MAX_EXPIRY_SECONDS).contains(v))
                .ok_or(ConfigError::Invalid("JWT_EXPIRE"))?,
            None => DEFAULT_EXPIRY_SECONDS,
        };

        Ok(Self {
            addr,
            app_kind,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            jwt_expire_seconds,
        })
    }
}
