use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{NotifierError, NotifierResult};

/// 通知事件类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    #[serde(rename = "order_placed")]
    OrderPlaced,
    #[serde(rename = "inspection_alert")]
    InspectionAlert,
    #[serde(rename = "sophia_ai_order")]
    SophiaAiOrder,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::OrderPlaced => "order_placed",
            EventType::InspectionAlert => "inspection_alert",
            EventType::SophiaAiOrder => "sophia_ai_order",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order_placed" => Ok(EventType::OrderPlaced),
            "inspection_alert" => Ok(EventType::InspectionAlert),
            "sophia_ai_order" => Ok(EventType::SophiaAiOrder),
            _ => Err(format!("Invalid event type: {s}")),
        }
    }
}

impl sqlx::Type<sqlx::Sqlite> for EventType {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <str as sqlx::Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for EventType {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for EventType {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as sqlx::Encode<sqlx::Sqlite>>::encode(self.as_str(), buf)
    }
}

/// 集成类型，决定收件方的解析方式与载荷形态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntegrationKind {
    /// 单一HTTP端点
    #[serde(rename = "generic")]
    Generic,
    /// 按联系人扇出到消息网关
    #[serde(rename = "contact_fanout")]
    ContactFanout,
    /// Sophia采购AI，接收聚合后的订单载荷
    #[serde(rename = "sophia")]
    Sophia,
}

impl IntegrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::Generic => "generic",
            IntegrationKind::ContactFanout => "contact_fanout",
            IntegrationKind::Sophia => "sophia",
        }
    }
}

impl std::str::FromStr for IntegrationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(IntegrationKind::Generic),
            "contact_fanout" => Ok(IntegrationKind::ContactFanout),
            "sophia" => Ok(IntegrationKind::Sophia),
            _ => Err(format!("Invalid integration kind: {s}")),
        }
    }
}

/// 认证描述符，投递时换算成Authorization头
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthDescriptor {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Post,
    Put,
    Patch,
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Get => "GET",
        }
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "GET" => Ok(HttpMethod::Get),
            _ => Err(format!("Invalid http method: {s}")),
        }
    }
}

/// 上游配置存在三种历史编码：id数组、id到布尔值的映射、内嵌联系人对象数组。
/// 三种编码在此统一归一化，不允许歧义泄漏到解析边界之外。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecipientSelection {
    Ids(Vec<i64>),
    Flags(IndexMap<String, bool>),
    Contacts(Vec<SelectedContact>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedContact {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Default for RecipientSelection {
    fn default() -> Self {
        RecipientSelection::Ids(Vec::new())
    }
}

impl RecipientSelection {
    /// 归一化为联系人ID列表，保持输入顺序
    pub fn normalize(&self) -> Vec<i64> {
        match self {
            RecipientSelection::Ids(ids) => ids.clone(),
            RecipientSelection::Flags(flags) => flags
                .iter()
                .filter(|(_, selected)| **selected)
                .filter_map(|(id, _)| id.parse::<i64>().ok())
                .collect(),
            RecipientSelection::Contacts(contacts) => contacts.iter().map(|c| c.id).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalize().is_empty()
    }
}

/// 通知目标：一个已配置的投递终点及其投递策略。
/// 由配置存储持有，对本子系统只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTarget {
    pub id: i64,
    pub name: String,
    pub event_type: EventType,
    pub integration_kind: IntegrationKind,
    pub endpoint_url: Option<String>,
    pub headers: HashMap<String, String>,
    pub auth: AuthDescriptor,
    pub http_method: HttpMethod,
    pub timeout_seconds: u64,
    pub max_attempts: u32,
    pub retry_delay_seconds: u64,
    pub recipients: RecipientSelection,
    pub enabled: bool,
}

impl NotificationTarget {
    pub fn new(name: &str, event_type: EventType, integration_kind: IntegrationKind) -> Self {
        Self {
            id: 0, // 将由数据库生成
            name: name.to_string(),
            event_type,
            integration_kind,
            endpoint_url: None,
            headers: HashMap::new(),
            auth: AuthDescriptor::None,
            http_method: HttpMethod::Post,
            timeout_seconds: 30,
            max_attempts: 3,
            retry_delay_seconds: 5,
            recipients: RecipientSelection::default(),
            enabled: true,
        }
    }

    /// 校验配置不变量：generic/sophia必须有端点URL，contact_fanout必须有非空收件人
    pub fn validate(&self) -> NotifierResult<()> {
        match self.integration_kind {
            IntegrationKind::Generic | IntegrationKind::Sophia => {
                match &self.endpoint_url {
                    Some(url) if !url.trim().is_empty() => Ok(()),
                    _ => Err(NotifierError::config_error(format!(
                        "通知目标 {} 缺少端点URL",
                        self.name
                    ))),
                }
            }
            IntegrationKind::ContactFanout => {
                if self.recipients.is_empty() {
                    Err(NotifierError::config_error(format!(
                        "通知目标 {} 未选择任何收件联系人",
                        self.name
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_id_list() {
        let selection = RecipientSelection::Ids(vec![3, 9]);
        assert_eq!(selection.normalize(), vec![3, 9]);
    }

    #[test]
    fn test_normalize_flag_map_keeps_input_order() {
        let raw = r#"{ "9": true, "3": true, "12": false }"#;
        let selection: RecipientSelection = serde_json::from_str(raw).unwrap();
        assert_eq!(selection.normalize(), vec![9, 3]);
    }

    #[test]
    fn test_normalize_embedded_contacts() {
        let raw = r#"[{ "id": 5, "name": "Carlos", "phone": "+5511999990000" }]"#;
        let selection: RecipientSelection = serde_json::from_str(raw).unwrap();
        assert_eq!(selection.normalize(), vec![5]);
    }

    #[test]
    fn test_validate_generic_requires_url() {
        let mut target =
            NotificationTarget::new("webhook", EventType::OrderPlaced, IntegrationKind::Generic);
        assert!(target.validate().is_err());

        target.endpoint_url = Some("https://example.com/hook".to_string());
        assert!(target.validate().is_ok());
    }

    #[test]
    fn test_validate_fanout_requires_recipients() {
        let mut target = NotificationTarget::new(
            "sms",
            EventType::InspectionAlert,
            IntegrationKind::ContactFanout,
        );
        assert!(target.validate().is_err());

        target.recipients = RecipientSelection::Ids(vec![1]);
        assert!(target.validate().is_ok());
    }
}
