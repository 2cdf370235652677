use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    /// session token lifetime in seconds
    pub session_ttl: i64,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_signup_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    /// front-end origin used to build verification links
    pub app_base_url: String,
    /// origin uploaded files are served from
    pub public_base_url: String,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub log_dir: String,
    pub mail_from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:5000".to_string())?,
            database_url: var_or("DATABASE_URL", "sqlite://dayflow.db".to_string())?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            session_ttl: var_or("SESSION_TTL_SECS", 8 * 60 * 60)?,

            rate_login_per_min: var_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_signup_per_min: var_or("RATE_SIGNUP_PER_MIN", 30)?,
            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: var_or("API_PREFIX", "/api".to_string())?,
            app_base_url: var_or("APP_BASE_URL", "http://localhost:3000".to_string())?,
            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:5000".to_string())?,
            upload_dir: var_or("UPLOAD_DIR", "uploads".to_string())?,
            max_upload_bytes: var_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            log_dir: var_or("LOG_DIR", "logs".to_string())?,
            mail_from: var_or(
                "MAIL_FROM",
                "\"Dayflow System\" <sys@dayflow.com>".to_string(),
            )?,
        })
    }
}

/// Reads `key`, falling back to `default` when it is unset.
fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_uses_default() {
        let ttl: i64 = var_or("DAYFLOW_TEST_UNSET_TTL", 42).unwrap();
        assert_eq!(ttl, 42);
    }

    #[test]
    fn unparsable_variable_is_an_error() {
        // SAFETY: the variable name is unique to this test
        unsafe { env::set_var("DAYFLOW_TEST_BAD_RATE", "lots") };
        let parsed: Result<u32> = var_or("DAYFLOW_TEST_BAD_RATE", 10);
        assert!(parsed.is_err());
    }
}
