use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::target::EventType;

/// 单次物理投递的解析结果地址
#[derive(Debug, Clone, PartialEq)]
pub enum RecipientAddress {
    /// generic/sophia集成：目标配置中的单一URL
    Url(String),
    /// contact_fanout集成：每个选中联系人一个网关地址
    Contact {
        contact_id: i64,
        address: String,
        name: String,
    },
}

impl RecipientAddress {
    /// 写入投递日志的地址描述
    pub fn as_log_string(&self) -> String {
        match self {
            RecipientAddress::Url(url) => url.clone(),
            RecipientAddress::Contact { address, name, .. } => format!("{name} <{address}>"),
        }
    }
}

/// 单次尝试的内存结果，用于重试决策与日志行构建。
/// status_code为0表示未收到任何HTTP响应（传输层失败）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub status_code: u16,
    pub body: String,
}

impl DeliveryOutcome {
    pub fn responded(status_code: u16, body: String) -> Self {
        Self {
            success: (200..300).contains(&status_code),
            status_code,
            body,
        }
    }

    pub fn transport_failure(error: String) -> Self {
        Self {
            success: false,
            status_code: 0,
            body: error,
        }
    }
}

/// 投递日志行：每次物理尝试（含重试）写一行，只追加，不更新不删除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub id: i64,
    pub target_id: i64,
    pub recipient: String,
    pub station_id: Option<i64>,
    pub order_id: Option<i64>,
    pub event_type: EventType,
    pub success: bool,
    pub status_code: i32,
    pub request_body: String,
    pub response_body: String,
    pub created_at: DateTime<Utc>,
}

impl DeliveryAttempt {
    pub fn from_outcome(
        target_id: i64,
        recipient: &str,
        event_type: EventType,
        request_body: &str,
        outcome: &DeliveryOutcome,
    ) -> Self {
        Self {
            id: 0, // 将由数据库生成
            target_id,
            recipient: recipient.to_string(),
            station_id: None,
            order_id: None,
            event_type,
            success: outcome.success,
            status_code: i32::from(outcome.status_code),
            request_body: request_body.to_string(),
            response_body: outcome.body.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn with_station(mut self, station_id: Option<i64>) -> Self {
        self.station_id = station_id;
        self
    }

    pub fn with_order(mut self, order_id: Option<i64>) -> Self {
        self.order_id = order_id;
        self
    }
}

/// 一次逻辑通知（可能扇出到多个收件方）的汇总结果。
/// 扇出采用部分成功策略：任一收件方成功即视为整体送达
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub target_id: i64,
    pub event_type: EventType,
    pub succeeded_count: usize,
    pub failed_count: usize,
    pub attempt_count: u32,
}

impl DispatchReport {
    pub fn overall_success(&self) -> bool {
        self.succeeded_count > 0
    }
}
