/// Database layer for Shift
///
/// Connection pooling and schema migrations for the PostgreSQL document
/// store. The store itself lives in [`crate::store::postgres`].
///
/// # Example
///
/// ```no_run
/// use shift_shared::db::pool::{create_pool, PoolConfig};
/// use shift_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(PoolConfig::new(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
