use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use notifier_config::DatabaseConfig;
use notifier_domain::{NotifierError, NotifierResult};

/// 建表语句在连接时执行，幂等；生产部署中这些表由看板系统的
/// 迁移流程维护，这里的定义保证独立运行与测试环境可用
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS stations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    cnpj TEXT,
    address TEXT,
    city TEXT,
    state TEXT,
    phone TEXT
);

CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT,
    email TEXT
);

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station_id INTEGER NOT NULL,
    tank_id INTEGER NOT NULL,
    product_type TEXT NOT NULL,
    quantity REAL NOT NULL,
    status TEXT NOT NULL,
    scheduled_date TEXT,
    notes TEXT,
    notified INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notification_targets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    event_type TEXT NOT NULL,
    integration_kind TEXT NOT NULL,
    endpoint_url TEXT,
    headers TEXT NOT NULL DEFAULT '{}',
    auth TEXT NOT NULL DEFAULT '{"type":"none"}',
    http_method TEXT NOT NULL DEFAULT 'POST',
    timeout_seconds INTEGER NOT NULL DEFAULT 30,
    max_attempts INTEGER NOT NULL DEFAULT 3,
    retry_delay_seconds INTEGER NOT NULL DEFAULT 5,
    recipients TEXT NOT NULL DEFAULT '[]',
    enabled INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS delivery_attempts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    target_id INTEGER NOT NULL,
    recipient TEXT NOT NULL,
    station_id INTEGER,
    order_id INTEGER,
    event_type TEXT NOT NULL,
    success INTEGER NOT NULL,
    status_code INTEGER NOT NULL,
    request_body TEXT NOT NULL,
    response_body TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_notified ON orders (notified, created_at);
CREATE INDEX IF NOT EXISTS idx_targets_event_type ON notification_targets (event_type, enabled);
CREATE INDEX IF NOT EXISTS idx_delivery_attempts_target ON delivery_attempts (target_id, created_at);
CREATE INDEX IF NOT EXISTS idx_delivery_attempts_order ON delivery_attempts (order_id);
"#;

pub struct DatabaseManager;

impl DatabaseManager {
    /// 创建连接池并初始化表结构
    pub async fn connect(config: &DatabaseConfig) -> NotifierResult<SqlitePool> {
        let options = config
            .url
            .parse::<SqliteConnectOptions>()
            .map_err(|e| NotifierError::config_error(format!("无效的数据库URL: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .connect_with(options)
            .await?;

        Self::initialize_schema(&pool).await?;

        info!("数据库连接池已就绪: {}", config.url);
        Ok(pool)
    }

    pub async fn initialize_schema(pool: &SqlitePool) -> NotifierResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
        Ok(())
    }
}
