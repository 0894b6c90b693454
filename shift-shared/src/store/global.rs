/// Process-wide store handle
///
/// The server installs its store exactly once at startup and builds its
/// application state from [`handle`]. Reading before initialization is an
/// error rather than a silent default.

use super::{DocumentStore, StoreError};
use std::sync::{Arc, OnceLock};
use tracing::info;

static STORE: OnceLock<Arc<dyn DocumentStore>> = OnceLock::new();

/// Installs the process-wide store
///
/// # Errors
///
/// Returns [`StoreError::AlreadyInitialized`] on a second call; the first
/// store stays installed.
pub fn init(store: Arc<dyn DocumentStore>) -> Result<(), StoreError> {
    let backend = store.backend();
    STORE
        .set(store)
        .map_err(|_| StoreError::AlreadyInitialized)?;

    info!(backend, "Document store initialized");
    Ok(())
}

/// Returns the process-wide store
///
/// # Errors
///
/// Returns [`StoreError::NotInitialized`] before [`init`] has run.
pub fn handle() -> Result<Arc<dyn DocumentStore>, StoreError> {
    STORE.get().cloned().ok_or(StoreError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    // One test owns the global so ordering between tests cannot matter
    #[test]
    fn test_init_once_lifecycle() {
        assert!(matches!(handle(), Err(StoreError::NotInitialized)));

        init(Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(handle().unwrap().backend(), "memory");

        let second = init(Arc::new(MemoryStore::new()));
        assert!(matches!(second, Err(StoreError::AlreadyInitialized)));
    }
}
