use crate::{ConfigError, ConfigResult};

/// 配置项校验接口
pub trait ConfigValidator {
    fn validate(&self) -> ConfigResult<()>;
}

/// 通用校验工具
pub struct ValidationUtils;

impl ValidationUtils {
    pub fn validate_not_empty(value: &str, field: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{field} must not be empty")));
        }
        Ok(())
    }

    pub fn validate_count(value: usize, field: &str) -> ConfigResult<()> {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{field} must be greater than zero"
            )));
        }
        Ok(())
    }

    pub fn validate_timeout_seconds(value: u64, field: &str) -> ConfigResult<()> {
        if value == 0 || value > 3600 {
            return Err(ConfigError::Validation(format!(
                "{field} must be between 1 and 3600 seconds"
            )));
        }
        Ok(())
    }
}
