use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 检测到储罐积水时产生的巡检告警事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionAlert {
    pub id: i64,
    pub description: String,
    pub severity: String,
    pub readings: Vec<WaterReading>,
}

/// 单个储罐的积水读数，线上字段采用葡语命名（下游系统约定）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterReading {
    #[serde(rename = "cliente")]
    pub client: String,
    #[serde(rename = "unidade")]
    pub unit: String,
    #[serde(rename = "tanque")]
    pub tank: String,
    #[serde(rename = "produto")]
    pub product: String,
    #[serde(rename = "quantidade_agua")]
    pub water_quantity: f64,
    #[serde(rename = "data_medicao")]
    pub measured_at: DateTime<Utc>,
}
