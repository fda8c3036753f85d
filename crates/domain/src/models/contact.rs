use serde::{Deserialize, Serialize};

/// 联系人目录条目，扇出投递的收件方来源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Contact {
    /// 是否具备可用的投递地址（消息网关要求电话号码）
    pub fn has_deliverable_address(&self) -> bool {
        self.phone
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}
