use serde::{Deserialize, Serialize};

/// 加油站（订单的目的实体），元数据来自主数据存储
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub cnpj: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
}

impl Station {
    /// 占位实体：聚合遇到孤儿订单（站点查找未命中）时使用，
    /// 保证聚合不因此失败、订单不被丢弃
    pub fn unidentified(id: i64) -> Self {
        Self {
            id,
            name: format!("Posto não identificado ({id})"),
            cnpj: None,
            address: None,
            city: None,
            state: None,
            phone: None,
        }
    }
}
