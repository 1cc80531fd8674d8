//! Named on/off switches stored in the `feature_flags` table.
//!
//! Creating a flag and reading it are separate steps: [`FeatureFlags::ensure`]
//! registers a flag (disabled) if it does not exist yet, and
//! [`FeatureFlags::is_enabled`] only ever reads. Unknown flags read as
//! disabled.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlagError {
    #[error("feature flag name cannot be empty")]
    EmptyName,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureFlag {
    pub name: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct FlagRow {
    name: String,
    enabled: bool,
    created_at: String,
    updated_at: String,
}

impl From<FlagRow> for FeatureFlag {
    fn from(row: FlagRow) -> Self {
        let parse = |value: &str| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now())
        };
        FeatureFlag {
            created_at: parse(&row.created_at),
            updated_at: parse(&row.updated_at),
            name: row.name,
            enabled: row.enabled,
        }
    }
}

#[derive(Clone)]
pub struct FeatureFlags {
    pool: SqlitePool,
}

impl FeatureFlags {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers `name` as a disabled flag unless it already exists.
    ///
    /// Safe to call repeatedly and from concurrent callers. Returns the
    /// flag's current state.
    pub async fn ensure(&self, name: &str) -> Result<bool, FlagError> {
        let name = validate(name)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO feature_flags (name, enabled, created_at, updated_at)
            VALUES (?, 0, ?, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.is_enabled(name).await
    }

    /// Reads a flag without creating it.
    pub async fn is_enabled(&self, name: &str) -> Result<bool, FlagError> {
        let enabled: Option<bool> =
            sqlx::query_scalar("SELECT enabled FROM feature_flags WHERE name = ?")
                .bind(name.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(enabled.unwrap_or(false))
    }

    /// Turns a flag on or off, creating it if needed.
    pub async fn set(&self, name: &str, enabled: bool) -> Result<(), FlagError> {
        let name = validate(name)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO feature_flags (name, enabled, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                enabled = excluded.enabled,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(name)
        .bind(enabled)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!(flag = name, enabled, "feature flag updated");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<FeatureFlag>, FlagError> {
        let rows: Vec<FlagRow> = sqlx::query_as(
            "SELECT name, enabled, created_at, updated_at FROM feature_flags ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeatureFlag::from).collect())
    }
}

fn validate(name: &str) -> Result<&str, FlagError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FlagError::EmptyName);
    }
    Ok(name)
}
