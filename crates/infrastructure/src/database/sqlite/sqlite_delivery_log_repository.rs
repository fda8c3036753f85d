use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use notifier_domain::models::DeliveryAttempt;
use notifier_domain::repositories::DeliveryLogRepository;
use notifier_domain::NotifierResult;

/// 投递日志仓库：只追加。行在插入后不再更新或删除，
/// SQLite在行级保证并发追加的原子性
pub struct SqliteDeliveryLogRepository {
    pool: SqlitePool,
}

impl SqliteDeliveryLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_attempt(row: &sqlx::sqlite::SqliteRow) -> NotifierResult<DeliveryAttempt> {
        Ok(DeliveryAttempt {
            id: row.try_get("id")?,
            target_id: row.try_get("target_id")?,
            recipient: row.try_get("recipient")?,
            station_id: row.try_get("station_id")?,
            order_id: row.try_get("order_id")?,
            event_type: row.try_get("event_type")?,
            success: row.try_get("success")?,
            status_code: row.try_get("status_code")?,
            request_body: row.try_get("request_body")?,
            response_body: row.try_get("response_body")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl DeliveryLogRepository for SqliteDeliveryLogRepository {
    async fn record(&self, attempt: &DeliveryAttempt) -> NotifierResult<DeliveryAttempt> {
        let row = sqlx::query(
            r#"
            INSERT INTO delivery_attempts (target_id, recipient, station_id, order_id,
                                           event_type, success, status_code,
                                           request_body, response_body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, target_id, recipient, station_id, order_id, event_type,
                      success, status_code, request_body, response_body, created_at
            "#,
        )
        .bind(attempt.target_id)
        .bind(&attempt.recipient)
        .bind(attempt.station_id)
        .bind(attempt.order_id)
        .bind(attempt.event_type)
        .bind(attempt.success)
        .bind(attempt.status_code)
        .bind(&attempt.request_body)
        .bind(&attempt.response_body)
        .bind(attempt.created_at)
        .fetch_one(&self.pool)
        .await?;

        let recorded = Self::row_to_attempt(&row)?;
        debug!(
            "投递日志已记录: 目标 {} 收件方 {} HTTP {}",
            recorded.target_id, recorded.recipient, recorded.status_code
        );
        Ok(recorded)
    }

    async fn get_by_target(
        &self,
        target_id: i64,
        limit: i64,
    ) -> NotifierResult<Vec<DeliveryAttempt>> {
        let rows = sqlx::query(
            "SELECT id, target_id, recipient, station_id, order_id, event_type,
                    success, status_code, request_body, response_body, created_at
             FROM delivery_attempts WHERE target_id = $1
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(target_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_attempt).collect()
    }

    async fn count_for_order(&self, order_id: i64) -> NotifierResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM delivery_attempts WHERE order_id = $1")
                .bind(order_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
