use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{Cat, StoredCat};

/// Errors from writing a batch of cats.
#[derive(Error, Debug)]
pub enum UpsertError {
    #[error("cat at position {position} has no external id")]
    MissingExternalId { position: usize },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct CatRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct CatRow {
    id: i64,
    external_id: String,
    name: Option<String>,
    breed: Option<String>,
    color: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<CatRow> for StoredCat {
    fn from(row: CatRow) -> Self {
        StoredCat {
            id: row.id,
            external_id: row.external_id,
            name: row.name,
            breed: row.breed,
            color: row.color,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl CatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts new cats and updates `name`, `breed` and `color` of cats whose
    /// `external_id` already exists. Returns one row id per input cat, in
    /// input order.
    ///
    /// The batch is applied in a single transaction: either every cat is
    /// written or none is. A repeated external id within the batch is written
    /// once with its last occurrence's values, and every occurrence gets that
    /// row's id.
    pub async fn upsert(&self, cats: &[Cat]) -> Result<Vec<i64>, UpsertError> {
        if let Some(position) = cats.iter().position(|c| c.external_id.is_empty()) {
            return Err(UpsertError::MissingExternalId { position });
        }

        let (batch, slots) = collapse_duplicates(cats);
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        let mut written = Vec::with_capacity(batch.len());

        for cat in &batch {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO cats (external_id, name, breed, color, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(external_id) DO UPDATE SET
                    name = excluded.name,
                    breed = excluded.breed,
                    color = excluded.color,
                    updated_at = excluded.updated_at
                RETURNING id
                "#,
            )
            .bind(&cat.external_id)
            .bind(&cat.name)
            .bind(&cat.breed)
            .bind(&cat.color)
            .bind(&now)
            .bind(&now)
            .fetch_one(&mut *tx)
            .await?;

            written.push(id);
        }

        tx.commit().await?;

        tracing::debug!(
            received = cats.len(),
            written = written.len(),
            "upserted cat batch"
        );

        Ok(slots.into_iter().map(|slot| written[slot]).collect())
    }

    pub async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<StoredCat>, sqlx::Error> {
        let row: Option<CatRow> = sqlx::query_as("SELECT * FROM cats WHERE external_id = ?")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(StoredCat::from))
    }

    pub async fn list(&self) -> Result<Vec<StoredCat>, sqlx::Error> {
        let rows: Vec<CatRow> = sqlx::query_as("SELECT * FROM cats ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(StoredCat::from).collect())
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cats")
            .fetch_one(&self.pool)
            .await
    }
}

/// Keeps one entry per external id: the last one seen, at the position of
/// the first. The second vector maps each input cat to its entry.
fn collapse_duplicates(cats: &[Cat]) -> (Vec<&Cat>, Vec<usize>) {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(cats.len());
    let mut unique: Vec<&Cat> = Vec::with_capacity(cats.len());
    let mut slots = Vec::with_capacity(cats.len());

    for cat in cats {
        match positions.get(cat.external_id.as_str()) {
            Some(&i) => {
                unique[i] = cat;
                slots.push(i);
            }
            None => {
                positions.insert(cat.external_id.as_str(), unique.len());
                slots.push(unique.len());
                unique.push(cat);
            }
        }
    }

    (unique, slots)
}
