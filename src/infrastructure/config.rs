use anyhow::{Result, bail};
use std::env;

/// Flagged development fallback; startup refuses it in production.
const DEV_JWT_SECRET: &str = "veranda_dev_secret_do_not_deploy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub jwt_secret: String,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_days: i64,
}

impl AppConfig {
    /// Load configuration from the environment. A missing `JWT_SECRET` is a
    /// hard startup error in production; in development it falls back to a
    /// clearly-flagged default with a loud warning.
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                if environment == Environment::Production {
                    bail!("JWT_SECRET must be set in a production environment");
                }
                tracing::warn!(
                    "JWT_SECRET not set; using the flagged development default. \
                     Do not deploy this configuration."
                );
                DEV_JWT_SECRET.to_string()
            }
        };

        let access_token_expiry_secs = env::var("JWT_ACCESS_EXPIRY_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        let refresh_token_expiry_days = env::var("REFRESH_TOKEN_EXPIRY_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            environment,
            jwt_secret,
            access_token_expiry_secs,
            refresh_token_expiry_days,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Config used by unit and integration tests
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Development,
            jwt_secret: "test_secret_not_for_deployment".to_string(),
            access_token_expiry_secs: 3600,
            refresh_token_expiry_days: 30,
        }
    }
}
