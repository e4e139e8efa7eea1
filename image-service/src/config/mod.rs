use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default request body limit for uploads (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub max_upload_bytes: usize,
}

impl ImageConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";
        let default_limit = DEFAULT_MAX_UPLOAD_BYTES.to_string();

        Ok(ImageConfig {
            common: common_config,
            storage: StorageConfig {
                upload_dir: get_env("STORAGE_UPLOAD_DIR", Some("uploads"), is_prod)?,
                max_upload_bytes: get_env(
                    "STORAGE_MAX_UPLOAD_BYTES",
                    Some(&default_limit),
                    is_prod,
                )?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "STORAGE_MAX_UPLOAD_BYTES must be a byte count: {}",
                        e
                    ))
                })?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
