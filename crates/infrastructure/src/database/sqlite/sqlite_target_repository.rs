use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use notifier_domain::models::{EventType, NotificationTarget};
use notifier_domain::repositories::NotificationTargetRepository;
use notifier_domain::{NotifierError, NotifierResult};

const TARGET_COLUMNS: &str = "id, name, event_type, integration_kind, endpoint_url, headers,
    auth, http_method, timeout_seconds, max_attempts, retry_delay_seconds, recipients, enabled";

pub struct SqliteTargetRepository {
    pool: SqlitePool,
}

impl SqliteTargetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// headers/auth/recipients以JSON文本列存储，在此反序列化
    fn row_to_target(row: &sqlx::sqlite::SqliteRow) -> NotifierResult<NotificationTarget> {
        let headers: String = row.try_get("headers")?;
        let auth: String = row.try_get("auth")?;
        let recipients: String = row.try_get("recipients")?;
        let integration_kind: String = row.try_get("integration_kind")?;
        let http_method: String = row.try_get("http_method")?;
        let timeout_seconds: i64 = row.try_get("timeout_seconds")?;
        let max_attempts: i64 = row.try_get("max_attempts")?;
        let retry_delay_seconds: i64 = row.try_get("retry_delay_seconds")?;

        Ok(NotificationTarget {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            event_type: row.try_get("event_type")?,
            integration_kind: integration_kind
                .parse()
                .map_err(NotifierError::DatabaseOperation)?,
            endpoint_url: row.try_get("endpoint_url")?,
            headers: serde_json::from_str(&headers)?,
            auth: serde_json::from_str(&auth)?,
            http_method: http_method.parse().map_err(NotifierError::DatabaseOperation)?,
            timeout_seconds: timeout_seconds.max(0) as u64,
            max_attempts: max_attempts.max(0) as u32,
            retry_delay_seconds: retry_delay_seconds.max(0) as u64,
            recipients: serde_json::from_str(&recipients)?,
            enabled: row.try_get("enabled")?,
        })
    }
}

#[async_trait]
impl NotificationTargetRepository for SqliteTargetRepository {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<NotificationTarget>> {
        let sql = format!("SELECT {TARGET_COLUMNS} FROM notification_targets WHERE id = $1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_target(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_event_type(
        &self,
        event_type: EventType,
    ) -> NotifierResult<Vec<NotificationTarget>> {
        let sql = format!(
            "SELECT {TARGET_COLUMNS} FROM notification_targets
             WHERE event_type = $1 AND enabled = 1 ORDER BY id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(event_type)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_target).collect()
    }

    async fn list(&self) -> NotifierResult<Vec<NotificationTarget>> {
        let sql = format!("SELECT {TARGET_COLUMNS} FROM notification_targets ORDER BY id ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(Self::row_to_target).collect()
    }
}
