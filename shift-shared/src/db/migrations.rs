/// Schema migrations for the document table
///
/// The SQL files in `shift-shared/migrations/` are embedded at compile time.
///
/// ```no_run
/// use shift_shared::db::migrations::{ensure_database_exists, migration_status, run_migrations};
/// use shift_shared::db::pool::{create_pool, PoolConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = std::env::var("DATABASE_URL")?;
/// ensure_database_exists(&url).await?;
///
/// let pool = create_pool(PoolConfig::new(url)).await?;
/// run_migrations(&pool).await?;
/// assert_eq!(migration_status(&pool).await?.pending, 0);
/// # Ok(())
/// # }
/// ```

use sqlx::migrate::{MigrateDatabase, MigrateError, Migrator};
use sqlx::postgres::PgPool;
use sqlx::Postgres;
use tracing::info;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: usize,

    /// Embedded migrations not yet applied
    pub pending: usize,

    pub latest_version: Option<i64>,
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!(migrations = MIGRATOR.iter().count(), "Document schema up to date");
    Ok(())
}

/// Compares the embedded migrations with `_sqlx_migrations`
pub async fn migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let tracked: bool = sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await?;

    let applied: Vec<i64> = if tracked {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(pool)
            .await?
    } else {
        Vec::new()
    };

    let pending = MIGRATOR
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .count();

    Ok(MigrationStatus {
        applied: applied.len(),
        pending,
        latest_version: applied.last().copied(),
    })
}

/// Creates the database in `database_url` when missing; for local setups
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Creating database");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}
