use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use notifier_domain::models::Contact;
use notifier_domain::repositories::ContactDirectory;
use notifier_domain::NotifierResult;

pub struct SqliteContactDirectory {
    pool: SqlitePool,
}

impl SqliteContactDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_contact(row: &sqlx::sqlite::SqliteRow) -> NotifierResult<Contact> {
        Ok(Contact {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
        })
    }
}

#[async_trait]
impl ContactDirectory for SqliteContactDirectory {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<Contact>> {
        let row = sqlx::query("SELECT id, name, phone, email FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_contact(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_ids(&self, ids: &[i64]) -> NotifierResult<Vec<Contact>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT id, name, phone, email FROM contacts WHERE id IN ({placeholders})");

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_contact).collect()
    }
}
