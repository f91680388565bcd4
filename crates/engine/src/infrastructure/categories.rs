//! SQLite-backed category list.
//!
//! The relational store is an external collaborator: the taxonomy it holds
//! is maintained independently of the `category` field values in the
//! document store, and the two are not guaranteed to be in sync. This
//! adapter only reads.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{CategoryReader, RepoError};
use ordnance_domain::Category;

/// SQLite implementation of the read-only category list.
pub struct SqliteCategoryReader {
    pool: SqlitePool,
}

impl SqliteCategoryReader {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("categories", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                name TEXT PRIMARY KEY
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("categories", e))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CategoryReader for SqliteCategoryReader {
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let rows = sqlx::query("SELECT name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("categories", e))?;

        Ok(rows
            .into_iter()
            .map(|row| Category::new(row.get::<String, _>("name")))
            .collect())
    }
}
