//! Bucket routing configuration sourced from the process environment

use std::env::{self, VarError};

use thiserror::Error;
use tracing::{info, warn};

/// Provider URL prefix used to build public object URLs
pub const PROVIDER_URL_VAR: &str = "STORAGE_URL";
/// Path of the provider credentials file
pub const CREDENTIALS_FILE_VAR: &str = "STORAGE_CREDENTIALS_FILE";
/// Private bucket identifier
pub const PRIVATE_BUCKET_VAR: &str = "STORAGE_BUCKET_PRIVATE";
/// Public bucket identifier
pub const PUBLIC_BUCKET_VAR: &str = "STORAGE_BUCKET_PUBLIC";
/// Comma-separated private folder list
pub const PRIVATE_FOLDERS_VAR: &str = "PRIVATE_FOLDERS";
/// Comma-separated public folder list
pub const PUBLIC_FOLDERS_VAR: &str = "PUBLIC_FOLDERS";

/// Errors raised while reading the configuration from the environment
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    /// Variable is set but its value is not valid unicode
    #[error("Environment variable {name} is not valid unicode")]
    NotUnicode {
        /// Name of the offending variable
        name: &'static str,
    },
}

/// Ordered list of folder patterns
///
/// Entries are kept verbatim, in configuration order. Membership is tested
/// with [`crate::classifier::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderList(Vec<String>);

impl FolderList {
    /// Parses a comma-separated list. Empty entries are dropped, nothing
    /// else is trimmed or normalized.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .filter(|entry| !entry.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Configured patterns
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Whether no pattern is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FolderList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Immutable bucket routing configuration
///
/// Built once at startup and shared by reference with every resolver call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketConfig {
    /// URL prefix prepended to `public_bucket/object` for public objects
    pub provider_url: String,
    /// Credential reference handed to the storage provider
    pub credentials_file: String,
    /// Bucket for access-controlled objects
    pub private_bucket: String,
    /// Bucket for directly addressable objects
    pub public_bucket: String,
    /// Folders routed to the private bucket
    pub private_folders: FolderList,
    /// Folders routed to the public bucket
    pub public_folders: FolderList,
}

/// Outcome of loading the configuration from the environment
#[derive(Debug)]
pub enum ConfigLoad {
    /// Every variable was read successfully. Unset variables are empty.
    Loaded(BucketConfig),
    /// Reading failed and the zero-value configuration is used instead
    Defaulted {
        /// Zero-value configuration
        config: BucketConfig,
        /// Reason the environment could not be read
        error: ConfigLoadError,
    },
}

impl ConfigLoad {
    /// Whether the zero-value fallback was taken
    #[must_use]
    pub const fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted { .. })
    }

    /// Returns the configuration to run with, logging the fallback if taken
    #[must_use]
    pub fn into_config(self) -> BucketConfig {
        match self {
            Self::Loaded(config) => config,
            Self::Defaulted { config, error } => {
                warn!("Failed to load bucket configuration, continuing with empty values: {error}");
                config
            }
        }
    }
}

impl BucketConfig {
    /// Loads the configuration from the environment
    ///
    /// Never fails: a read error yields [`ConfigLoad::Defaulted`].
    #[must_use]
    pub fn from_env() -> ConfigLoad {
        match Self::try_from_env() {
            Ok(config) => {
                info!(
                    private_bucket = %config.private_bucket,
                    public_bucket = %config.public_bucket,
                    private_folders = config.private_folders.entries().len(),
                    public_folders = config.public_folders.entries().len(),
                    "Loaded bucket configuration"
                );
                ConfigLoad::Loaded(config)
            }
            Err(error) => ConfigLoad::Defaulted {
                config: Self::default(),
                error,
            },
        }
    }

    /// Loads the configuration from the environment, failing on the first
    /// unreadable variable
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError::NotUnicode` if a variable holds invalid unicode
    pub fn try_from_env() -> Result<Self, ConfigLoadError> {
        Ok(Self {
            provider_url: read_var(PROVIDER_URL_VAR)?,
            credentials_file: read_var(CREDENTIALS_FILE_VAR)?,
            private_bucket: read_var(PRIVATE_BUCKET_VAR)?,
            public_bucket: read_var(PUBLIC_BUCKET_VAR)?,
            private_folders: FolderList::parse(&read_var(PRIVATE_FOLDERS_VAR)?),
            public_folders: FolderList::parse(&read_var(PUBLIC_FOLDERS_VAR)?),
        })
    }
}

fn read_var(name: &'static str) -> Result<String, ConfigLoadError> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Ok(String::new()),
        Err(VarError::NotUnicode(_)) => Err(ConfigLoadError::NotUnicode { name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    const ALL_VARS: [&str; 6] = [
        PROVIDER_URL_VAR,
        CREDENTIALS_FILE_VAR,
        PRIVATE_BUCKET_VAR,
        PUBLIC_BUCKET_VAR,
        PRIVATE_FOLDERS_VAR,
        PUBLIC_FOLDERS_VAR,
    ];

    fn clear_env() {
        for name in ALL_VARS {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_folder_list_parse() {
        let list = FolderList::parse("secure,kyc/documents,,invoices ");
        assert_eq!(list.entries(), ["secure", "kyc/documents", "invoices "]);

        assert!(FolderList::parse("").is_empty());
        assert!(FolderList::parse(",,").is_empty());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_all_fields() {
        clear_env();
        env::set_var(PROVIDER_URL_VAR, "https://storage.example.com/");
        env::set_var(CREDENTIALS_FILE_VAR, "/etc/storage/credentials.json");
        env::set_var(PRIVATE_BUCKET_VAR, "acme-private");
        env::set_var(PUBLIC_BUCKET_VAR, "acme-public");
        env::set_var(PRIVATE_FOLDERS_VAR, "secure,kyc");
        env::set_var(PUBLIC_FOLDERS_VAR, "assets");

        let load = BucketConfig::from_env();
        assert!(!load.is_defaulted());
        assert_eq!(
            load.into_config(),
            BucketConfig {
                provider_url: "https://storage.example.com/".to_string(),
                credentials_file: "/etc/storage/credentials.json".to_string(),
                private_bucket: "acme-private".to_string(),
                public_bucket: "acme-public".to_string(),
                private_folders: ["secure", "kyc"].into_iter().collect(),
                public_folders: ["assets"].into_iter().collect(),
            }
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_vars_are_empty() {
        clear_env();

        let load = BucketConfig::from_env();
        assert!(!load.is_defaulted());
        assert_eq!(load.into_config(), BucketConfig::default());
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_from_env_invalid_unicode_falls_back_to_defaults() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        clear_env();
        env::set_var(PRIVATE_BUCKET_VAR, "acme-private");
        env::set_var(PUBLIC_FOLDERS_VAR, OsString::from_vec(vec![0x61, 0xff, 0x62]));

        let load = BucketConfig::from_env();
        match &load {
            ConfigLoad::Defaulted { error, .. } => assert!(matches!(
                error,
                ConfigLoadError::NotUnicode {
                    name: PUBLIC_FOLDERS_VAR
                }
            )),
            ConfigLoad::Loaded(_) => panic!("expected defaulted configuration"),
        }
        assert_eq!(load.into_config(), BucketConfig::default());

        clear_env();
    }
}
