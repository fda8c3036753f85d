use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use notifier_domain::models::Station;
use notifier_domain::repositories::StationRepository;
use notifier_domain::NotifierResult;

pub struct SqliteStationRepository {
    pool: SqlitePool,
}

impl SqliteStationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_station(row: &sqlx::sqlite::SqliteRow) -> NotifierResult<Station> {
        Ok(Station {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            cnpj: row.try_get("cnpj")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            phone: row.try_get("phone")?,
        })
    }
}

#[async_trait]
impl StationRepository for SqliteStationRepository {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<Station>> {
        let row = sqlx::query(
            "SELECT id, name, cnpj, address, city, state, phone FROM stations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_station(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_ids(&self, ids: &[i64]) -> NotifierResult<Vec<Station>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, cnpj, address, city, state, phone
             FROM stations WHERE id IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_station).collect()
    }
}
