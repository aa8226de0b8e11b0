use std::time::Duration;

use url::Url;

use crate::errors::AppError;
use crate::state::SessionContext;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: Url,
    pub request_timeout: Duration,
    pub user_email: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let backend_url = Url::parse(&backend_url)?;

        let timeout_secs = match lookup("BACKEND_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("BACKEND_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            backend_url,
            request_timeout: Duration::from_secs(timeout_secs),
            user_email: lookup("USER_EMAIL").filter(|e| !e.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !matches!(self.backend_url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "BACKEND_URL must be http or https, got {}",
                self.backend_url.scheme()
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::Config("BACKEND_TIMEOUT_SECS must be positive".to_string()));
        }
        Ok(())
    }

    pub fn session(&self) -> Option<SessionContext> {
        self.user_email.clone().map(SessionContext::new)
    }
}
