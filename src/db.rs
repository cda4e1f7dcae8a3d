use sqlx::AnyPool;

use crate::models::Paste;

/// Idempotent schema for the paste table, applied at startup. Timestamps are
/// assigned by the store at insertion.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS paste (
    id TEXT PRIMARY KEY NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Connect to a database by URL.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            pool: AnyPool::connect(url).await?,
        })
    }

    /// Create the paste table if it does not exist yet.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Get a paste by key. Absence is an expected outcome, not an error.
    pub async fn get_paste(&self, id: &str) -> crate::AppResult<Option<Paste>> {
        let paste = sqlx::query_as::<_, Paste>(
            "SELECT id, content, created_at FROM paste WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(paste)
    }

    /// Insert a paste. The primary key makes the write conditional on the
    /// id being absent: a duplicate surfaces as `ApiError::Conflict` instead
    /// of overwriting.
    pub async fn insert_paste(&self, id: &str, content: &str) -> crate::AppResult<Paste> {
        let paste = sqlx::query_as::<_, Paste>(
            "INSERT INTO paste (id, content) VALUES (?, ?) RETURNING id, content, created_at",
        )
        .bind(id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(paste)
    }
}

#[cfg(test)]
impl Database {
    /// In-memory SQLite. Capped to a single connection, otherwise every pool
    /// checkout would see its own empty database.
    pub(crate) async fn connect_in_memory() -> Self {
        use sqlx::any::AnyPoolOptions;

        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let db = Database { pool };
        db.migrate().await.expect("migrate in-memory sqlite");
        db
    }
}
