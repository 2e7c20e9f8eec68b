//! Process settings read from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/wine_shop";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MEDIA_URL: &str = "/media/";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// HS256 secret shared with the identity provider that issues bearer tokens.
    pub jwt_secret: String,
    pub media_url: String,
    /// Scheme and host used for absolute links; falls back to the request `Host`.
    pub public_base_url: Option<String>,
    /// Catalog fixture applied at startup when the catalog is empty.
    pub seed_path: Option<PathBuf>,
    pub body_limit_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::MissingSetting("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidSetting {
                name: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidSetting {
                name: "DB_MAX_CONNECTIONS",
                reason: format!("not a number: {}", v),
            })?,
            None => 5,
        };
        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidSetting {
                name: "BODY_LIMIT_BYTES",
                reason: format!("not a number: {}", v),
            })?,
            None => DEFAULT_BODY_LIMIT,
        };

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            max_connections,
            jwt_secret,
            media_url: get("MEDIA_URL").unwrap_or_else(|| DEFAULT_MEDIA_URL.into()),
            public_base_url: get("PUBLIC_BASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            seed_path: get("SEED_PATH").map(PathBuf::from),
            body_limit_bytes,
        })
    }
}

/// Connection URL with any password in the userinfo replaced.
fn redact_url_password(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
        return url.to_string();
    };
    let authority_end = url[scheme_end..]
        .find(['/', '?'])
        .map(|i| scheme_end + i)
        .unwrap_or(url.len());
    let Some(at) = url[scheme_end..authority_end].rfind('@').map(|i| scheme_end + i) else {
        return url.to_string();
    };
    match url[scheme_end..at].find(':').map(|i| scheme_end + i) {
        Some(colon) => format!("{}:<redacted>{}", &url[..colon], &url[at..]),
        None => url.to_string(),
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &redact_url_password(&self.database_url))
            .field("bind_addr", &self.bind_addr)
            .field("max_connections", &self.max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("media_url", &self.media_url)
            .field("public_base_url", &self.public_base_url)
            .field("seed_path", &self.seed_path)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .finish()
    }
}
