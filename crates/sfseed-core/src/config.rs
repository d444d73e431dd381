//! # Configuration File Parser
//!
//! Reads and parses `sfseed.toml`, the optional user configuration file that
//! supplies connection details and generation defaults without CLI flags.
//! Supports:
//!
//! - `[salesforce]`: instance URL, username, sandbox flag, API version
//! - `[generate]`: default row count, seed, base time, reference handling,
//!   sample size, default-id table path
//! - `[fields."<Object>.<Field>"]`: fixed value lists that replace generation
//!   for a field
//!
//! Secrets (password, security token, access token) are never read from this
//! file; the CLI takes them from the environment.
//!
//! Example `sfseed.toml`:
//!
//! ```toml
//! [salesforce]
//! username = "qa@acme.com.uat"
//! sandbox = true
//! api_version = "59.0"
//!
//! [generate]
//! rows = 200
//! seed = 42
//! base_time = "2025-01-01T00:00:00"
//! references = true
//! sample_size = 50
//! default_ids = "default_ids.csv"
//!
//! [fields."Opportunity.StageName"]
//! values = ["Prospecting", "Closed Won"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SfSeedError};
use crate::generate::parse_base_time;
use crate::object_generator::GenerateOptions;
use crate::salesforce::{DEFAULT_API_VERSION, LOGIN_URL, SANDBOX_LOGIN_URL};
use crate::schema::introspect::validate_object_name;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "sfseed.toml";

/// Top-level sfseed.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SfSeedConfig {
    pub salesforce: SalesforceConfig,
    pub generate: GenerateConfig,
    /// Per-field overrides, keyed by "Object.Field".
    pub fields: BTreeMap<String, FieldOverride>,

    /// Directory containing sfseed.toml; relative paths resolve against it.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

/// Org connection settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SalesforceConfig {
    /// Instance URL for session-token authentication.
    pub instance_url: Option<String>,
    pub username: Option<String>,
    /// Log in through test.salesforce.com.
    pub sandbox: Option<bool>,
    pub api_version: Option<String>,
    /// Explicit login host, e.g. a My Domain URL. Wins over `sandbox`.
    pub login_url: Option<String>,
}

/// Default generation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub rows: Option<usize>,
    /// Fixed random seed for deterministic generation.
    pub seed: Option<u64>,
    /// Anchor for temporal values, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
    pub base_time: Option<String>,
    /// Populate required reference fields.
    pub references: Option<bool>,
    /// Identifiers sampled per reference target.
    pub sample_size: Option<usize>,
    /// Path to the default-id CSV.
    pub default_ids: Option<String>,
    pub skip_unsupported: Option<bool>,
}

/// Fixed values for one field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldOverride {
    pub values: Vec<String>,
}

/// Read and parse sfseed.toml from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed or fails validation.
pub fn read_config(dir: &Path) -> Result<Option<SfSeedConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| SfSeedError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let mut config = parse_config(&content).map_err(|e| match e {
        SfSeedError::Config { message } => SfSeedError::Config {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })?;
    config.config_dir = Some(std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));

    Ok(Some(config))
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<SfSeedConfig> {
    let config: SfSeedConfig = toml::from_str(content).map_err(|e| SfSeedError::Config {
        message: format!("Failed to parse config: {}", e),
    })?;
    config.validate()?;
    Ok(config)
}

impl SfSeedConfig {
    /// Reject values serde accepts but generation cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.generate.rows == Some(0) {
            return Err(SfSeedError::Config {
                message: "generate.rows must be a positive integer".to_string(),
            });
        }
        if self.generate.sample_size == Some(0) {
            return Err(SfSeedError::Config {
                message: "generate.sample_size must be a positive integer".to_string(),
            });
        }

        if let Some(raw) = &self.generate.base_time {
            parse_base_time(raw).map_err(|_| SfSeedError::Config {
                message: format!(
                    "generate.base_time '{}' is not YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
                    raw
                ),
            })?;
        }

        for (key, field) in &self.fields {
            let (object, name) = split_field_key(key).ok_or_else(|| SfSeedError::Config {
                message: format!(
                    "[fields.\"{}\"] is not in 'Object.Field' format",
                    key
                ),
            })?;
            if validate_object_name(object).is_err() || validate_object_name(name).is_err() {
                return Err(SfSeedError::Config {
                    message: format!(
                        "[fields.\"{}\"] does not name a valid object and field",
                        key
                    ),
                });
            }
            if field.values.is_empty() {
                return Err(SfSeedError::Config {
                    message: format!(
                        "[fields.\"{}\"] has an empty values list. \
                         Add at least one value or remove the entry.",
                        key
                    ),
                });
            }
        }
        Ok(())
    }

    /// Parsed `generate.base_time`, if set.
    pub fn base_time(&self) -> Result<Option<chrono::NaiveDateTime>> {
        self.generate
            .base_time
            .as_deref()
            .map(parse_base_time)
            .transpose()
    }

    /// `"Object.Field"` -> fixed values.
    pub fn field_overrides(&self) -> BTreeMap<String, Vec<String>> {
        self.fields
            .iter()
            .map(|(key, field)| (key.clone(), field.values.clone()))
            .collect()
    }

    /// Orchestrator options derived from `[generate]` and `[fields]`.
    pub fn generate_options(&self) -> GenerateOptions {
        let defaults = GenerateOptions::default();
        GenerateOptions {
            sample_size: self.generate.sample_size.unwrap_or(defaults.sample_size),
            skip_unsupported: self
                .generate
                .skip_unsupported
                .unwrap_or(defaults.skip_unsupported),
            field_overrides: self.field_overrides(),
        }
    }

    /// Default-id table path, resolved against the config directory.
    pub fn default_ids_path(&self) -> Option<PathBuf> {
        let raw = self.generate.default_ids.as_ref()?;
        let path = PathBuf::from(raw);
        match &self.config_dir {
            Some(dir) if path.is_relative() => Some(dir.join(path)),
            _ => Some(path),
        }
    }

    /// Login host: explicit `login_url`, else sandbox or production.
    pub fn login_url(&self) -> String {
        if let Some(url) = &self.salesforce.login_url {
            return url.trim_end_matches('/').to_string();
        }
        if self.salesforce.sandbox.unwrap_or(false) {
            SANDBOX_LOGIN_URL.to_string()
        } else {
            LOGIN_URL.to_string()
        }
    }

    pub fn api_version(&self) -> &str {
        self.salesforce
            .api_version
            .as_deref()
            .unwrap_or(DEFAULT_API_VERSION)
    }
}

fn split_field_key(key: &str) -> Option<(&str, &str)> {
    let (object, field) = key.split_once('.')?;
    if object.is_empty() || field.is_empty() {
        None
    } else {
        Some((object, field))
    }
}
