use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySql, Pool};
use tracing::info;

/// Thin pass-through over a MySQL pool for test setup and verification
/// queries. All real work happens in sqlx.
pub struct MySqlHelper {
    pool: Pool<MySql>,
}

impl MySqlHelper {
    pub async fn connect(dsn: &str) -> Result<Self, sqlx::Error> {
        let pool = Pool::<MySql>::connect(dsn).await?;
        info!("mysql pool connected");
        Ok(MySqlHelper { pool })
    }

    pub fn pool(&self) -> &Pool<MySql> {
        &self.pool
    }

    pub async fn fetch_all<T>(&self, sql: &str) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        sqlx::query_as::<_, T>(sql).fetch_all(&self.pool).await
    }

    pub async fn fetch_optional<T>(&self, sql: &str) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        sqlx::query_as::<_, T>(sql).fetch_optional(&self.pool).await
    }

    /// Rows affected by an INSERT/UPDATE/DELETE.
    pub async fn execute(&self, sql: &str) -> Result<u64, sqlx::Error> {
        let done = sqlx::query(sql).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    /// Scalar count query, e.g. `SELECT COUNT(*) FROM majors WHERE ...`.
    pub async fn count(&self, sql: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(sql).fetch_one(&self.pool).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("mysql pool closed");
    }
}
