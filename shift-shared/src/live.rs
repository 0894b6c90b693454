//! Live collection subscriptions
//!
//! A [`LiveCollection`] keeps the full snapshot of one collection current.
//! It reads the collection once, then re-reads it every time the store
//! announces a write to that path, publishing each new snapshot on a
//! `tokio::sync::watch` channel together with loading and error flags.
//!
//! The subscription task is owned by the `LiveCollection`: changing the path
//! cancels the previous task before the next one starts, and dropping the
//! value cancels it outright.
//!
//! # Example
//!
//! ```no_run
//! use shift_shared::live::LiveCollection;
//! use shift_shared::models::employee::Employee;
//! use shift_shared::store::{CollectionPath, MemoryStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let employees: LiveCollection<Employee> =
//!     LiveCollection::subscribe(store, Some(CollectionPath::employees("cpn_1")?));
//!
//! let state = employees.ready().await;
//! println!("{} employees", state.data.unwrap_or_default().len());
//! # Ok(())
//! # }
//! ```

use crate::store::{decode_records, CollectionPath, Document, DocumentStore, Record, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Snapshot of a subscribed collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionState<T> {
    /// Latest records, `None` until the first snapshot arrives
    pub data: Option<Vec<Record<T>>>,

    /// True until the first snapshot or error for the current path
    pub loading: bool,

    /// Message of the most recent failure, cleared by the next snapshot
    pub error: Option<String>,
}

impl<T> CollectionState<T> {
    /// State for "no path yet": empty and not loading
    pub fn idle() -> Self {
        Self {
            data: Some(Vec::new()),
            loading: false,
            error: None,
        }
    }

    /// State while waiting for the first snapshot of a path
    pub fn pending() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    /// Records of the latest snapshot, empty when none has arrived
    pub fn records(&self) -> &[Record<T>] {
        self.data.as_deref().unwrap_or(&[])
    }
}

struct Subscription {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Subscription {
    fn stop(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// A self-refreshing view of one collection
pub struct LiveCollection<T> {
    store: Arc<dyn DocumentStore>,
    path: Option<CollectionPath>,
    state: Arc<watch::Sender<CollectionState<T>>>,
    subscription: Option<Subscription>,
}

impl<T> LiveCollection<T>
where
    T: DeserializeOwned + PartialEq + Clone + Send + Sync + 'static,
{
    /// Subscribes to `path`, or stays idle when there is no path
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(store: Arc<dyn DocumentStore>, path: Option<CollectionPath>) -> Self {
        let (state, _) = watch::channel(CollectionState::idle());
        let mut live = Self {
            store,
            path: None,
            state: Arc::new(state),
            subscription: None,
        };
        live.start(path);
        live
    }

    /// The currently subscribed path
    pub fn path(&self) -> Option<&CollectionPath> {
        self.path.as_ref()
    }

    /// Re-targets the subscription
    ///
    /// Setting the path it already has does nothing. Otherwise the previous
    /// subscription is cancelled before the new one begins, so snapshots of
    /// the old path are never published afterwards.
    pub fn set_path(&mut self, path: Option<CollectionPath>) {
        if path == self.path {
            return;
        }
        self.stop();
        self.start(path);
    }

    /// Current state
    pub fn state(&self) -> CollectionState<T> {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn watch(&self) -> watch::Receiver<CollectionState<T>> {
        self.state.subscribe()
    }

    /// Waits until the current path has delivered a snapshot or an error
    pub async fn ready(&self) -> CollectionState<T> {
        let mut rx = self.watch();
        let ready = match rx.wait_for(|s| !s.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        ready
    }

    /// Stops listening; the last state stays readable
    pub fn unsubscribe(&mut self) {
        self.stop();
        self.path = None;
    }

    fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.stop();
        }
    }

    fn start(&mut self, path: Option<CollectionPath>) {
        self.path = path.clone();

        let Some(path) = path else {
            self.state.send_replace(CollectionState::idle());
            return;
        };

        self.state.send_replace(CollectionState::pending());

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_subscription(
            self.store.clone(),
            path,
            self.state.clone(),
            cancel.clone(),
        ));

        self.subscription = Some(Subscription { cancel, handle });
    }
}

impl<T> Drop for LiveCollection<T> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.stop();
        }
    }
}

async fn run_subscription<T>(
    store: Arc<dyn DocumentStore>,
    path: CollectionPath,
    state: Arc<watch::Sender<CollectionState<T>>>,
    cancel: CancellationToken,
) where
    T: DeserializeOwned + PartialEq + Clone + Send + Sync + 'static,
{
    // Listen before the first read so no write can slip between them
    let mut changes = store.changes();
    debug!(path = %path, "Subscription started");

    loop {
        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = store.list(&path) => result,
        };
        publish(&state, &cancel, &path, snapshot);

        if !wait_for_change(&mut changes, &path, &cancel).await {
            if !cancel.is_cancelled() {
                let closed = Err(StoreError::Unavailable("change feed closed".to_string()));
                publish(&state, &cancel, &path, closed);
            }
            break;
        }
    }

    debug!(path = %path, "Subscription ended");
}

/// Returns true when `path` changed, false when the subscription should end
async fn wait_for_change(
    changes: &mut broadcast::Receiver<CollectionPath>,
    path: &CollectionPath,
    cancel: &CancellationToken,
) -> bool {
    loop {
        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            received = changes.recv() => received,
        };

        match received {
            Ok(changed) if &changed == path => return true,
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(path = %path, skipped, "Change feed lagged, re-reading collection");
                return true;
            }
            Err(broadcast::error::RecvError::Closed) => return false,
        }
    }
}

fn publish<T>(
    state: &watch::Sender<CollectionState<T>>,
    cancel: &CancellationToken,
    path: &CollectionPath,
    snapshot: Result<Vec<Document>, StoreError>,
) where
    T: DeserializeOwned + PartialEq,
{
    let update = snapshot.map(|docs| decode_records::<T>(path, docs));

    state.send_if_modified(|current| {
        // Checked under the channel lock: a cancelled task never overwrites
        // the state of the subscription that replaced it.
        if cancel.is_cancelled() {
            return false;
        }

        match update {
            Ok(records) => {
                if !current.loading
                    && current.error.is_none()
                    && current.data.as_ref() == Some(&records)
                {
                    return false;
                }
                *current = CollectionState {
                    data: Some(records),
                    loading: false,
                    error: None,
                };
                true
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Subscription read failed");
                current.loading = false;
                current.error = Some(e.to_string());
                true
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{to_fields, DocumentStore, Fields, MemoryStore};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::time::timeout;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        name: String,
    }

    async fn wait_for<T, F>(live: &LiveCollection<T>, predicate: F) -> CollectionState<T>
    where
        T: DeserializeOwned + PartialEq + Clone + Send + Sync + 'static,
        F: FnMut(&CollectionState<T>) -> bool,
    {
        let mut rx = live.watch();
        let state = timeout(Duration::from_secs(2), rx.wait_for(predicate))
            .await
            .expect("timed out waiting for state")
            .expect("state channel closed");
        state.clone()
    }

    #[tokio::test]
    async fn test_no_path_is_idle() {
        let store = Arc::new(MemoryStore::new());
        let live: LiveCollection<Item> = LiveCollection::subscribe(store, None);

        assert_eq!(live.state(), CollectionState::idle());
        assert!(live.path().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_and_updates() {
        let store = Arc::new(MemoryStore::new());
        let path = CollectionPath::employees("cpn_1").unwrap();
        store
            .add(&path, to_fields(&json!({ "name": "Ada" })).unwrap())
            .await
            .unwrap();

        let live: LiveCollection<Item> = LiveCollection::subscribe(store.clone(), Some(path.clone()));
        let first = live.ready().await;
        assert_eq!(first.records().len(), 1);
        assert_eq!(first.records()[0].data.name, "Ada");

        store
            .add(&path, to_fields(&json!({ "name": "Grace" })).unwrap())
            .await
            .unwrap();

        let second = wait_for(&live, |s| s.records().len() == 2).await;
        assert_eq!(second.records()[1].data.name, "Grace");
        assert!(!second.loading);
    }

    #[tokio::test]
    async fn test_undecodable_documents_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let path = CollectionPath::locations("cpn_1").unwrap();
        store
            .add(&path, to_fields(&json!({ "name": 42 })).unwrap())
            .await
            .unwrap();
        store
            .add(&path, to_fields(&json!({ "name": "Main" })).unwrap())
            .await
            .unwrap();

        let live: LiveCollection<Item> = LiveCollection::subscribe(store, Some(path));
        let state = live.ready().await;
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.records()[0].data.name, "Main");
    }

    #[tokio::test]
    async fn test_set_path_switches_collections() {
        let store = Arc::new(MemoryStore::new());
        let one = CollectionPath::employees("cpn_1").unwrap();
        let two = CollectionPath::employees("cpn_2").unwrap();
        store
            .add(&two, to_fields(&json!({ "name": "Linus" })).unwrap())
            .await
            .unwrap();

        let mut live: LiveCollection<Item> = LiveCollection::subscribe(store.clone(), None);
        live.set_path(Some(one.clone()));
        let state = live.ready().await;
        assert!(state.records().is_empty());

        live.set_path(Some(two.clone()));
        let state = live.ready().await;
        assert_eq!(state.records().len(), 1);

        // Writes to the old path no longer reach this subscription
        store
            .add(&one, to_fields(&json!({ "name": "Ada" })).unwrap())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(live.state().records()[0].data.name, "Linus");
    }

    #[tokio::test]
    async fn test_same_path_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let path = CollectionPath::employees("cpn_1").unwrap();

        let mut live: LiveCollection<Item> = LiveCollection::subscribe(store, Some(path.clone()));
        live.ready().await;
        live.set_path(Some(path));

        // A restart would have flipped back to loading
        assert!(!live.state().loading);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_updates() {
        let store = Arc::new(MemoryStore::new());
        let path = CollectionPath::employees("cpn_1").unwrap();

        let mut live: LiveCollection<Item> = LiveCollection::subscribe(store.clone(), Some(path.clone()));
        live.ready().await;
        live.unsubscribe();

        store
            .add(&path, to_fields(&json!({ "name": "Ada" })).unwrap())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(live.state().records().is_empty());
    }

    struct BrokenStore {
        changes: broadcast::Sender<CollectionPath>,
    }

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn add(&self, _: &CollectionPath, _: Fields) -> Result<String, StoreError> {
            Err(StoreError::Conflict("read only".to_string()))
        }
        async fn set(&self, _: &CollectionPath, _: &str, _: Fields) -> Result<(), StoreError> {
            Err(StoreError::Conflict("read only".to_string()))
        }
        async fn get(&self, _: &CollectionPath, _: &str) -> Result<Option<Document>, StoreError> {
            Ok(None)
        }
        async fn update(&self, _: &CollectionPath, _: &str, _: Fields) -> Result<(), StoreError> {
            Err(StoreError::Conflict("read only".to_string()))
        }
        async fn delete(&self, _: &CollectionPath, _: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn list(&self, _: &CollectionPath) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Conflict("permission denied".to_string()))
        }
        async fn find_where(
            &self,
            _: &CollectionPath,
            _: &str,
            _: &Value,
        ) -> Result<Vec<Document>, StoreError> {
            Ok(Vec::new())
        }
        fn changes(&self) -> broadcast::Receiver<CollectionPath> {
            self.changes.subscribe()
        }
        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_read_failure_sets_error() {
        let (changes, _) = broadcast::channel(4);
        let store = Arc::new(BrokenStore { changes });
        let path = CollectionPath::employees("cpn_1").unwrap();

        let live: LiveCollection<Item> = LiveCollection::subscribe(store, Some(path));
        let state = live.ready().await;

        assert!(!state.loading);
        assert!(state.data.is_none());
        assert!(state.error.unwrap().contains("permission denied"));
    }
}
