/// PostgreSQL-backed document store
///
/// All collections share one `documents` table keyed by `(collection, id)`
/// with the fields held in a JSONB column. Updates merge with `data || patch`
/// and equality queries compare `data -> field` against a JSONB value.
///
/// Change notification spans processes: every write is announced locally and
/// through `pg_notify` on [`CHANGE_CHANNEL`], tagged with this instance's
/// origin id. A background listener forwards announcements from other
/// instances into the local change feed and ignores its own.
///
/// # Example
///
/// ```no_run
/// use shift_shared::db::pool::{create_pool, PoolConfig};
/// use shift_shared::store::{DocumentStore, PgDocumentStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(PoolConfig::new(std::env::var("DATABASE_URL")?)).await?;
///
/// let store = PgDocumentStore::connect(pool).await?;
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use super::{CollectionPath, Document, DocumentStore, Fields, StoreError, CHANGE_FEED_CAPACITY};
use crate::db::pool;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::{PgListener, PgPool};
use sqlx::types::Json;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Notification channel used for cross-process change announcements
pub const CHANGE_CHANNEL: &str = "document_changes";

/// Delay before retrying after the listener connection drops
const LISTENER_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize, Deserialize)]
struct ChangeNotice {
    origin: String,
    path: String,
}

pub struct PgDocumentStore {
    pool: PgPool,
    origin: String,
    changes: broadcast::Sender<CollectionPath>,
    shutdown: CancellationToken,
}

impl PgDocumentStore {
    /// Wraps a pool and starts listening for changes made by other instances
    ///
    /// # Errors
    ///
    /// Fails if the listener connection cannot be established.
    pub async fn connect(pool: PgPool) -> Result<Self, StoreError> {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        let origin = Uuid::new_v4().simple().to_string();
        let shutdown = CancellationToken::new();

        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;

        tokio::spawn(forward_notifications(
            listener,
            origin.clone(),
            changes.clone(),
            shutdown.clone(),
        ));

        info!(origin = %origin, "Document store connected to PostgreSQL");

        Ok(Self {
            pool,
            origin,
            changes,
            shutdown,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Stops the change listener
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    async fn publish(&self, path: &CollectionPath) {
        let _ = self.changes.send(path.clone());

        let notice = ChangeNotice {
            origin: self.origin.clone(),
            path: path.to_string(),
        };
        let payload = match serde_json::to_string(&notice) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to encode change notice");
                return;
            }
        };

        // The write already succeeded; a lost notification only delays other instances.
        if let Err(e) = sqlx::query("SELECT pg_notify($1, $2)")
            .bind(CHANGE_CHANNEL)
            .bind(payload)
            .execute(&self.pool)
            .await
        {
            warn!(path = %path, error = %e, "Failed to announce document change");
        }
    }
}

impl Drop for PgDocumentStore {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn forward_notifications(
    mut listener: PgListener,
    origin: String,
    changes: broadcast::Sender<CollectionPath>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("Change listener stopped");
                return;
            }
            received = listener.recv() => match received {
                Ok(notification) => {
                    match serde_json::from_str::<ChangeNotice>(notification.payload()) {
                        Ok(notice) if notice.origin == origin => {}
                        Ok(notice) => match CollectionPath::parse(&notice.path) {
                            Ok(path) => {
                                let _ = changes.send(path);
                            }
                            Err(e) => warn!(error = %e, "Ignoring change notice with bad path"),
                        },
                        Err(e) => warn!(error = %e, "Ignoring malformed change notice"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Change listener connection lost, retrying");
                    tokio::time::sleep(LISTENER_RETRY_DELAY).await;
                }
            }
        }
    }
}

fn into_document(id: String, data: Json<Value>) -> Result<Document, StoreError> {
    match data.0 {
        Value::Object(fields) => Ok(Document { id, fields }),
        other => Err(StoreError::Serialization(serde::de::Error::custom(format!(
            "document {} is not an object: {}",
            id, other
        )))),
    }
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(db_err.message().to_string())
        }
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(path.as_str())
            .bind(&id)
            .bind(Json(Value::Object(fields)))
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        debug!(path = %path, id = %id, "Document added");
        self.publish(path).await;
        Ok(id)
    }

    async fn set(&self, path: &CollectionPath, id: &str, fields: Fields) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(path.as_str())
        .bind(id)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        self.publish(path).await;
        Ok(())
    }

    async fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, (String, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(path.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, data)| into_document(id, data)).transpose()
    }

    async fn update(&self, path: &CollectionPath, id: &str, fields: Fields) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(path.as_str())
        .bind(id)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                path: path.to_string(),
                id: id.to_string(),
            });
        }

        debug!(path = %path, id = %id, "Document updated");
        self.publish(path).await;
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(path.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            debug!(path = %path, id = %id, "Document deleted");
            self.publish(path).await;
        }
        Ok(removed)
    }

    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY seq",
        )
        .bind(path.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, data)| into_document(id, data))
            .collect()
    }

    async fn find_where(
        &self,
        path: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Json<Value>)>(
            r#"
            SELECT id, data FROM documents
            WHERE collection = $1 AND data -> $2 = $3
            ORDER BY seq
            "#,
        )
        .bind(path.as_str())
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, data)| into_document(id, data))
            .collect()
    }

    fn changes(&self) -> broadcast::Receiver<CollectionPath> {
        self.changes.subscribe()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
