//! 数据访问层接口定义
//!
//! 订单、站点、联系人与通知目标均由看板系统的其余部分维护，
//! 本子系统只读消费（订单仅回写notified标志）。
//! 投递日志是本子系统唯一持有写入权的持久化状态：只追加，每次物理尝试一行。

use async_trait::async_trait;

use crate::errors::NotifierResult;
use crate::models::{
    Contact, DeliveryAttempt, EventType, NotificationTarget, OrderRecord, Station,
};

/// 订单仓储接口
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<OrderRecord>>;

    /// 获取尚未通知的订单，按创建时间升序
    async fn get_unnotified(&self, limit: Option<i64>) -> NotifierResult<Vec<OrderRecord>>;

    /// 回写notified标志。除此之外订单对本子系统不可变
    async fn mark_notified(&self, order_ids: &[i64]) -> NotifierResult<()>;
}

/// 站点仓储接口（聚合时解析订单的目的实体元数据）
#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<Station>>;

    async fn get_by_ids(&self, ids: &[i64]) -> NotifierResult<Vec<Station>>;
}

/// 联系人目录接口（contact_fanout收件方解析）
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<Contact>>;

    async fn get_by_ids(&self, ids: &[i64]) -> NotifierResult<Vec<Contact>>;
}

/// 通知目标配置读取接口
#[async_trait]
pub trait NotificationTargetRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<NotificationTarget>>;

    /// 按事件类型获取全部已启用的目标
    async fn get_by_event_type(
        &self,
        event_type: EventType,
    ) -> NotifierResult<Vec<NotificationTarget>>;

    async fn list(&self) -> NotifierResult<Vec<NotificationTarget>>;
}

/// 投递日志接口
///
/// record必须容忍并发追加；调用方（分发服务）将写入失败作为
/// 尽力而为处理，不得因日志失败取消或回滚所描述的投递。
#[async_trait]
pub trait DeliveryLogRepository: Send + Sync {
    async fn record(&self, attempt: &DeliveryAttempt) -> NotifierResult<DeliveryAttempt>;

    async fn get_by_target(&self, target_id: i64, limit: i64) -> NotifierResult<Vec<DeliveryAttempt>>;

    async fn count_for_order(&self, order_id: i64) -> NotifierResult<i64>;
}
