use async_trait::async_trait;
use burrow_core::error::StorageError;
use burrow_core::repository::{InsertOutcome, ReadRepository, Repository, Result, UrlRecord};
use burrow_core::{ShortCode, TargetUrl};
use jiff::Timestamp;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use typed_builder::TypedBuilder;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection settings for [`SqliteRepository::connect`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SqliteSettings {
    /// Database URL, e.g. `sqlite://burrow.db`. The file is created if missing.
    #[builder(setter(into))]
    url: String,
    #[builder(default = 8)]
    max_connections: u32,
    /// How long to wait for a free pooled connection.
    #[builder(default = Duration::from_secs(2))]
    acquire_timeout: Duration,
    /// How long SQLite waits on a locked database before giving up.
    #[builder(default = Duration::from_secs(2))]
    busy_timeout: Duration,
}

/// SQLite implementation of the repository contract.
///
/// Layout: one `short_urls` table keyed by `short_code` with a unique index
/// on `target_url`. Both uniqueness rules are enforced by SQLite, so an
/// insert is a single `INSERT OR IGNORE` statement and is atomic even across
/// processes sharing the file. `created_at` is stored as unix milliseconds.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing connection pool.
    ///
    /// The schema is not touched; call [`SqliteRepository::migrate`] first
    /// if the database may be fresh.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database and applies the schema.
    pub async fn connect(settings: &SqliteSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(settings.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        info!(url = %settings.url, "sqlite repository ready");
        Ok(repository)
    }

    /// Applies pending schema migrations. Safe to run repeatedly.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Operation(format!("migration failed: {e}")))
    }

    /// Closes every pooled connection, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_created_at(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", millis))
    })
}

fn row_to_record(row: SqliteRow) -> Result<UrlRecord> {
    let code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let target: String = row.try_get("target_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(UrlRecord {
        code: ShortCode::new_unchecked(code),
        target: TargetUrl::new_unchecked(target),
        created_at: parse_created_at(created_at)?,
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        sqlx::Error::Database(ref db) if is_busy(db.code().as_deref()) => {
            StorageError::Timeout(message)
        }
        _ => StorageError::Query(message),
    }
}

// SQLITE_BUSY (5) and SQLITE_LOCKED (6), possibly as extended codes.
fn is_busy(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|c| matches!(c & 0xff, 5 | 6))
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        sqlx::query(
            r#"
            SELECT short_code, target_url, created_at
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .map(row_to_record)
        .transpose()
    }

    async fn get_by_target(&self, target: &TargetUrl) -> Result<Option<UrlRecord>> {
        sqlx::query(
            r#"
            SELECT short_code, target_url, created_at
            FROM short_urls
            WHERE target_url = ?
            LIMIT 1
            "#,
        )
        .bind(target.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .map(row_to_record)
        .transpose()
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert_if_absent(&self, record: UrlRecord) -> Result<InsertOutcome> {
        // Stored precision is milliseconds; hand back exactly what a later read returns.
        let created_at = parse_created_at(record.created_at.as_millisecond())?;
        let record = UrlRecord {
            created_at,
            ..record
        };

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO short_urls (short_code, target_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(record.code.as_str())
        .bind(record.target.as_str())
        .bind(created_at.as_millisecond())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 1 {
            return Ok(InsertOutcome::Inserted(record));
        }

        // Rows are never removed, so whichever constraint fired is still visible.
        match self.get_by_target(&record.target).await? {
            Some(existing) => Ok(InsertOutcome::DuplicateTarget(existing)),
            None => Ok(InsertOutcome::CodeTaken),
        }
    }
}
