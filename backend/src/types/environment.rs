//! Environment configuration for different deployment stages

use std::env;

use thiserror::Error;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8001;

/// Errors raised while reading the deployment environment
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnvironmentError {
    /// `APP_ENV` holds an unknown stage
    #[error("Invalid environment: {0}")]
    InvalidStage(String),

    /// `PORT` is not a valid port number
    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// Defaults to development when unset.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentError::InvalidStage` if `APP_ENV` contains an invalid value
    pub fn from_env() -> Result<Self, EnvironmentError> {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(EnvironmentError::InvalidStage(env)),
        }
    }

    /// Whether logs are emitted as JSON
    ///
    /// Production and staging ship logs to an aggregator, development
    /// prints human-readable lines.
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Port the HTTP server binds to, from `PORT`
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentError::InvalidPort` if `PORT` is not a valid port number
    pub fn port() -> Result<u16, EnvironmentError> {
        env::var("PORT").map_or(Ok(DEFAULT_PORT), |port| {
            port.trim()
                .parse()
                .map_err(|_| EnvironmentError::InvalidPort(port))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        // Test development (default)
        env::remove_var("APP_ENV");
        assert_eq!(Environment::from_env(), Ok(Environment::Development));

        // Test explicit development
        env::set_var("APP_ENV", "development");
        assert_eq!(Environment::from_env(), Ok(Environment::Development));

        // Test staging
        env::set_var("APP_ENV", "staging");
        assert_eq!(Environment::from_env(), Ok(Environment::Staging));

        // Test production, case and whitespace insensitive
        env::set_var("APP_ENV", " Production ");
        assert_eq!(Environment::from_env(), Ok(Environment::Production));

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        assert_eq!(
            Environment::from_env(),
            Err(EnvironmentError::InvalidStage("invalid".to_string()))
        );
        env::remove_var("APP_ENV");
    }

    #[test]
    fn test_json_logs() {
        assert!(Environment::Production.json_logs());
        assert!(Environment::Staging.json_logs());
        assert!(!Environment::Development.json_logs());
    }

    #[test]
    #[serial]
    fn test_port() {
        env::remove_var("PORT");
        assert_eq!(Environment::port(), Ok(DEFAULT_PORT));

        env::set_var("PORT", "9090");
        assert_eq!(Environment::port(), Ok(9090));

        env::set_var("PORT", "not-a-port");
        assert_eq!(
            Environment::port(),
            Err(EnvironmentError::InvalidPort("not-a-port".to_string()))
        );

        env::remove_var("PORT");
    }
}
