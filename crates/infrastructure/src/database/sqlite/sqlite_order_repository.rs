use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use notifier_domain::models::OrderRecord;
use notifier_domain::repositories::OrderRepository;
use notifier_domain::{NotifierError, NotifierResult};

pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_order(row: &sqlx::sqlite::SqliteRow) -> NotifierResult<OrderRecord> {
        Ok(OrderRecord {
            id: row.try_get("id")?,
            station_id: row.try_get("station_id")?,
            tank_id: row.try_get("tank_id")?,
            product_type: row.try_get("product_type")?,
            quantity: row.try_get("quantity")?,
            status: row.try_get("status")?,
            scheduled_date: row.try_get("scheduled_date")?,
            notes: row.try_get("notes")?,
            notified: row.try_get("notified")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<OrderRecord>> {
        let row = sqlx::query(
            "SELECT id, station_id, tank_id, product_type, quantity, status,
                    scheduled_date, notes, notified, created_at
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_order(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_unnotified(&self, limit: Option<i64>) -> NotifierResult<Vec<OrderRecord>> {
        // SQLite中LIMIT -1表示不限制
        let rows = sqlx::query(
            "SELECT id, station_id, tank_id, product_type, quantity, status,
                    scheduled_date, notes, notified, created_at
             FROM orders WHERE notified = 0 ORDER BY created_at ASC, id ASC LIMIT $1",
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_order).collect()
    }

    async fn mark_notified(&self, order_ids: &[i64]) -> NotifierResult<()> {
        let mut tx = self.pool.begin().await?;
        for id in order_ids {
            let result = sqlx::query("UPDATE orders SET notified = 1 WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(NotifierError::OrderNotFound { id: *id });
            }
        }
        tx.commit().await?;

        debug!("已回写 {} 个订单的notified标志", order_ids.len());
        Ok(())
    }
}
