use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::persistence::PersistenceConfig;
use crate::store::MissingTargetPolicy;
use crate::validation::DEFAULT_IMEI_LENGTH;

pub const CONFIG_FILE_STEM: &str = "refurb-tracker";
pub const ENV_PREFIX: &str = "REFURB";

/// Main configuration structure for the refurbishment tracker
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RefurbConfig {
    /// Snapshot file settings
    pub storage: StorageConfig,
    /// Logging and metrics
    pub observability: ObservabilityConfig,
    /// Workflow and store behavior
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path of the JSON snapshot
    pub state_file: String,
    /// When false, nothing is read from or written to disk
    pub enable_persistence: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Default filter when RUST_LOG is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Enable metrics collection
    pub metrics_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Fail updates and deletes that target unknown ids
    pub strict_updates: bool,
    /// Digits required in a submitted IMEI
    pub imei_length: usize,
}

impl Default for RefurbConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                state_file: ".refurb-tracker/state.json".to_string(),
                enable_persistence: true,
            },
            observability: ObservabilityConfig {
                log_level: "warn".to_string(),
                json_logs: false,
                metrics_enabled: true,
            },
            workflow: WorkflowConfig {
                strict_updates: false,
                imei_length: DEFAULT_IMEI_LENGTH,
            },
        }
    }
}

impl RefurbConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (refurb-tracker.toml)
    /// 3. Environment variables (REFURB_SECTION__KEY)
    pub fn load() -> Result<Self> {
        let file = Path::new(CONFIG_FILE_STEM).with_extension("toml");
        Self::build(file.exists().then_some(file.as_path()))
    }

    /// Load defaults, then `path`, then the environment
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(Some(path.as_ref()))
    }

    fn build(file: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to read configuration sources")?;
        let refurb_config: RefurbConfig = config
            .try_deserialize()
            .context("Invalid configuration values")?;
        Ok(refurb_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    pub fn persistence_config(&self) -> PersistenceConfig {
        PersistenceConfig {
            enabled: self.storage.enable_persistence,
            state_file: PathBuf::from(&self.storage.state_file),
        }
    }

    pub fn store_policy(&self) -> MissingTargetPolicy {
        if self.workflow.strict_updates {
            MissingTargetPolicy::Reject
        } else {
            MissingTargetPolicy::Ignore
        }
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<RefurbConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = RefurbConfig::load_env_file();
        RefurbConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static RefurbConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
