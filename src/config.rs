/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, JWT secret, HTTP limits など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide settings. The access secret is only printable as a length.
#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub jwt_access_secret: String,
    pub access_token_leeway_seconds: u64,
    pub expose_verify_errors: bool,
    pub mirror_legacy_headers: bool,

    pub http_body_limit_bytes: usize,
    pub http_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_access_secret_len", &self.jwt_access_secret.len())
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .field("expose_verify_errors", &self.expose_verify_errors)
            .field("mirror_legacy_headers", &self.mirror_legacy_headers)
            .field("http_body_limit_bytes", &self.http_body_limit_bytes)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        // The secret must be usable before the first request arrives.
        let jwt_access_secret = std::env::var("JWT_ACCESS_SECRET")
            .map_err(|_| ConfigError::Missing("JWT_ACCESS_SECRET"))?;
        if jwt_access_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_ACCESS_SECRET"));
        }

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let expose_verify_errors = parse_flag(
            std::env::var("AUTH_EXPOSE_VERIFY_ERRORS").ok().as_deref(),
            true,
        )
        .ok_or(ConfigError::Invalid("AUTH_EXPOSE_VERIFY_ERRORS"))?;

        let mirror_legacy_headers = parse_flag(
            std::env::var("AUTH_MIRROR_LEGACY_HEADERS").ok().as_deref(),
            true,
        )
        .ok_or(ConfigError::Invalid("AUTH_MIRROR_LEGACY_HEADERS"))?;

        let http_body_limit_bytes = std::env::var("HTTP_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let http_timeout_seconds = std::env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_access_secret,
            access_token_leeway_seconds,
            expose_verify_errors,
            mirror_legacy_headers,
            http_body_limit_bytes,
            http_timeout_seconds,
        })
    }
}

/// `None` means the value was present but not a recognizable boolean.
fn parse_flag(raw: Option<&str>, default: bool) -> Option<bool> {
    let Some(raw) = raw else {
        return Some(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
