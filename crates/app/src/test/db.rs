//! Database test utilities and shared infrastructure

use std::error::Error;

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, TestcontainersError, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use testresult::TestResult;
use tokio::sync::{OnceCell, mpsc};
use tracing::warn;
use uuid::Uuid;

use crate::database;

const USER: &str = "dukkan_test";
const PASSWORD: &str = "dukkan_test_password";

/// Shared PostgreSQL container that starts once and is reused across all tests
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> =
    Lazy::new(OnceCell::new);

/// Names of databases waiting to be dropped
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn start_postgres() -> Result<ContainerAsync<PostgresImage>, TestcontainersError> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(USER)
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
}

/// Connection string for `database` inside the shared container.
async fn database_url(database: &str) -> Result<String, TestcontainersError> {
    let container = POSTGRES_CONTAINER.get_or_try_init(start_postgres).await?;
    let port = container.get_host_port_ipv4(5432).await?;

    let host = std::env::var("TESTCONTAINERS_HOST_OVERRIDE")
        .unwrap_or_else(|_| "localhost".to_owned());

    Ok(format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}"))
}

fn spawn_cleanup() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                warn!(%error, database = %name, "failed to drop test database");
            }
        }
    });

    sender
}

async fn drop_database(name: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut conn = PgConnection::connect(&database_url("postgres").await?).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await?;

    Ok(())
}

/// A freshly migrated database of its own for one test.
///
/// Services commit normally; isolation comes from every test getting a new
/// database. The database is dropped in the background once the `TestDb` goes
/// out of scope.
#[derive(Debug)]
pub(crate) struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub(crate) async fn new() -> TestResult<Self> {
        CLEANUP_SENDER
            .get_or_init(|| async { spawn_cleanup() })
            .await;

        let name = format!("dukkan_test_{}", Uuid::now_v7().simple());

        let mut admin = PgConnection::connect(&database_url("postgres").await?).await?;

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await?;

        admin.close().await?;

        let pool = PgPool::connect(&database_url(&name).await?).await?;

        database::migrate(&pool).await?;

        Ok(Self { pool, name })
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get()
            && sender.send(self.name.clone()).is_err()
        {
            warn!(database = %self.name, "cleanup task is gone, leaving test database");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrated_database_accepts_queries() -> TestResult {
        let db = TestDb::new().await?;

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db.pool())
            .await?;

        assert_eq!(users, 0);

        Ok(())
    }

    #[tokio::test]
    async fn each_test_gets_its_own_database() -> TestResult {
        let first = TestDb::new().await?;
        let second = TestDb::new().await?;

        assert_ne!(first.name, second.name);

        sqlx::query("INSERT INTO users (uuid, role) VALUES ($1, 'customer')")
            .bind(Uuid::now_v7())
            .execute(first.pool())
            .await?;

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(second.pool())
            .await?;

        assert_eq!(users, 0);

        Ok(())
    }
}
