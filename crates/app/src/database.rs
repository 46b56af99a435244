//! Database connection management

use std::time::Duration;

use sqlx::{
    Executor, PgPool, Postgres, Row, Transaction,
    migrate::{MigrateError, Migrator},
    postgres::{PgPoolOptions, PgRow},
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// `PostgreSQL` SQLSTATE raised when `statement_timeout` cancels a query.
const QUERY_CANCELED: &str = "57014";

/// Pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Connection string
    pub url: String,

    /// Upper bound on pooled connections
    pub max_connections: u32,

    /// How long to wait for a free connection
    pub acquire_timeout: Duration,

    /// Server-side per-statement limit
    pub statement_timeout: Duration,
}

impl DatabaseSettings {
    /// Defaults for one-off CLI use.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired in time.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL` with bounded acquire and statement times.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let statement_timeout = statement_timeout_sql(settings.statement_timeout);

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .after_connect(move |conn, _meta| {
            let statement_timeout = statement_timeout.clone();

            Box::pin(async move {
                conn.execute(statement_timeout.as_str()).await?;

                Ok(())
            })
        })
        .connect(&settings.url)
        .await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error when a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Whether the error is a pool or statement timeout.
pub fn is_timeout(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db) => db.code().as_deref() == Some(QUERY_CANCELED),
        _ => false,
    }
}

/// Read a non-negative `BIGINT` amount column.
pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Read a non-negative `INTEGER` quantity column.
pub(crate) fn try_get_quantity(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let quantity_i32: i32 = row.try_get(col)?;

    u32::try_from(quantity_i32).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Convert an amount for binding to a `BIGINT` column.
pub(crate) fn amount_to_db(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(format!("{col}: {e}").into()))
}

/// Convert a quantity for binding to an `INTEGER` column.
pub(crate) fn quantity_to_db(quantity: u32, col: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(format!("{col}: {e}").into()))
}

/// Parse a `TEXT` enum column.
pub(crate) fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(col)?;

    raw.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

fn statement_timeout_sql(timeout: Duration) -> String {
    format!("SET statement_timeout = {}", timeout.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_timeout_is_in_milliseconds() {
        assert_eq!(
            statement_timeout_sql(Duration::from_secs(2)),
            "SET statement_timeout = 2000"
        );
    }

    #[test]
    fn oversized_amount_is_rejected() {
        assert!(amount_to_db(u64::MAX, "price").is_err());
        assert!(matches!(amount_to_db(1_500, "price"), Ok(1_500)));
    }

    #[test]
    fn pool_timeout_is_a_timeout() {
        assert!(is_timeout(&sqlx::Error::PoolTimedOut));
        assert!(!is_timeout(&sqlx::Error::RowNotFound));
    }
}
