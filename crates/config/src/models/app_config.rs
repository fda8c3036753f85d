use std::path::Path;

use anyhow::Result;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use super::{DatabaseConfig, DispatcherConfig, LogConfig};
use crate::validation::ConfigValidator;
use crate::ConfigResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else {
            let default_paths = [
                "config/notifier.toml",
                "notifier.toml",
                "/etc/fuel-notifier/config.toml",
            ];

            for path in &default_paths {
                if Path::new(path).exists() {
                    builder = builder.add_source(File::new(path, FileFormat::Toml));
                    break;
                }
            }
        }

        // 环境变量覆盖文件配置，如 NOTIFIER__DATABASE__URL
        builder = builder.add_source(Environment::with_prefix("NOTIFIER").separator("__"));

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config
            .validate()
            .map_err(|e| anyhow::anyhow!("配置校验失败: {e}"))?;

        Ok(app_config)
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.database.validate()?;
        self.dispatcher.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dispatcher.poll_interval_seconds, 10);
        assert_eq!(config.logging.level, "info");
    }
}
