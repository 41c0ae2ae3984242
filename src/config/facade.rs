//! Configuration loader facade.

use super::merge::merge_policy;
use super::sources::{env, global_file};
use super::PlannerConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file when `--config` is absent.
pub const CONFIG_PATH_ENV: &str = "LESSONPLAN_CONFIG";

/// Loads and validates [`PlannerConfig`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with every layer applied.
    ///
    /// Precedence (lowest to highest): defaults, global file, explicit file,
    /// `LESSONPLAN__*` variables, provider credential variables.
    pub fn load(explicit: Option<&Path>) -> Result<PlannerConfig, ApiError> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;

        if let Some(path) = &explicit {
            if !path.exists() {
                return Err(ApiError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!(config_path = %path.display(), "Loading explicit configuration");
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        builder = env::add_to_builder(builder)?;
        builder = env::apply_credentials(builder)?;

        let config: PlannerConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load defaults plus a single file, ignoring the environment.
    pub fn load_from_file(path: &Path) -> Result<PlannerConfig, ApiError> {
        let config: PlannerConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        Self::validated(config)
    }

    fn validated(config: PlannerConfig) -> Result<PlannerConfig, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(config)
    }
}
