use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};
use crate::ConfigResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    pub enabled: bool,
    /// 扫描未通知订单的间隔（秒）
    pub poll_interval_seconds: u64,
    /// 单轮扫描处理的最大订单数
    pub batch_size: i64,
    /// 写入载荷metadata块的来源系统标识
    pub source_system: String,
    /// contact_fanout目标未自带端点时使用的消息网关URL
    pub contact_gateway_url: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_seconds: 10,
            batch_size: 50,
            source_system: "fuel-notifier".to_string(),
            contact_gateway_url: String::new(),
        }
    }
}

impl ConfigValidator for DispatcherConfig {
    fn validate(&self) -> ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.source_system, "dispatcher.source_system")?;
        ValidationUtils::validate_timeout_seconds(
            self.poll_interval_seconds,
            "dispatcher.poll_interval_seconds",
        )?;
        ValidationUtils::validate_count(self.batch_size as usize, "dispatcher.batch_size")?;
        Ok(())
    }
}
