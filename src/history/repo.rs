use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppError,
    history::repo_types::{HistoryAction, HistoryEntry},
};

/// Append-only log of summarization actions. Entries are global, not per user.
#[async_trait]
pub trait HistoryLog: Send + Sync {
    async fn record(
        &self,
        action: HistoryAction,
        filename: &str,
        summary: &str,
    ) -> Result<HistoryEntry, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct PgHistoryLog {
    db: PgPool,
}

impl PgHistoryLog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryLog for PgHistoryLog {
    async fn record(
        &self,
        action: HistoryAction,
        filename: &str,
        summary: &str,
    ) -> Result<HistoryEntry, AppError> {
        let entry = sqlx::query_as::<_, HistoryEntry>(
            r#"
            INSERT INTO history (action, filename, summary)
            VALUES ($1, $2, $3)
            RETURNING id, action, filename, summary, "timestamp"
            "#,
        )
        .bind(action.as_str())
        .bind(filename)
        .bind(summary)
        .fetch_one(&self.db)
        .await
        .context("insert history entry")?;
        Ok(entry)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM history"#)
            .fetch_one(&self.db)
            .await
            .context("count history")?;
        Ok(count)
    }
}
