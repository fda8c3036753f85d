use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum NotifierError {
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("通知目标不存在: id={id}")]
    TargetNotFound { id: i64 },
    #[error("订单不存在: id={id}")]
    OrderNotFound { id: i64 },
    #[error("网络传输失败: {0}")]
    Transport(String),
    #[error("远端拒绝请求: HTTP {status}")]
    RemoteRejection { status: u16 },
    #[error("数据库操作失败: {0}")]
    DatabaseOperation(String),
    #[error("数据序列化错误: {0}")]
    Serialization(String),
    #[error("系统内部错误: {0}")]
    Internal(String),
}

pub type NotifierResult<T> = Result<T, NotifierError>;

impl NotifierError {
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn transport_error<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }
    pub fn database_error<S: Into<String>>(msg: S) -> Self {
        Self::DatabaseOperation(msg.into())
    }
    pub fn target_not_found(id: i64) -> Self {
        Self::TargetNotFound { id }
    }
    /// 传输失败与远端拒绝均可重试；配置错误在任何投递前终止整个分发
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NotifierError::Transport(_) | NotifierError::RemoteRejection { .. }
        )
    }
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NotifierError::Configuration(_) | NotifierError::Internal(_)
        )
    }
}

impl From<sqlx::Error> for NotifierError {
    fn from(err: sqlx::Error) -> Self {
        NotifierError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        NotifierError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for NotifierError {
    fn from(err: anyhow::Error) -> Self {
        NotifierError::Internal(err.to_string())
    }
}
