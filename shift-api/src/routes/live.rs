/// Live collection stream (SSE)
///
/// ```text
/// GET /v1/live/:collection      collection = employees | locations | timeOffRequests
/// ```
///
/// The first event is the current snapshot; a new `snapshot` event follows
/// every change to the collection. Each event carries the whole state:
///
/// ```text
/// event: snapshot
/// data: {"data":[{"id":"...","name":"Ada Lovelace",...}],"loading":false,"error":null}
/// ```
///
/// Callers without a company receive one empty, non-loading snapshot.
///
/// # Example
///
/// ```bash
/// curl -N -H "Authorization: Bearer <token>" http://localhost:8080/v1/live/employees
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    tenant::CurrentTenant,
};
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{BoxStream, StreamExt};
use serde::{de::DeserializeOwned, Serialize};
use shift_shared::live::LiveCollection;
use shift_shared::models::{employee::Employee, location::Location, time_off::TimeOffRequest};
use shift_shared::store::{CollectionPath, DocumentStore, TenantCollection};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

type EventStream = BoxStream<'static, Result<Event, Infallible>>;

fn snapshots<T>(store: Arc<dyn DocumentStore>, path: Option<CollectionPath>) -> EventStream
where
    T: DeserializeOwned + Serialize + PartialEq + Clone + Send + Sync + 'static,
{
    let live: LiveCollection<T> = LiveCollection::subscribe(store, path);
    let updates = WatchStream::new(live.watch());

    // The stream owns the subscription; a client disconnect drops both.
    updates
        .map(move |state| {
            let _subscription = &live;
            Ok(Event::default()
                .event("snapshot")
                .json_data(&state)
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Failed to encode snapshot");
                    Event::default().event("error").data("encoding failed")
                }))
        })
        .boxed()
}

pub async fn live_collection(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Path(collection): Path<String>,
) -> ApiResult<Sse<EventStream>> {
    let kind = TenantCollection::from_str(&collection)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown collection: {}", collection)))?;

    let path = tenant
        .id()
        .map(|company_id| CollectionPath::tenant(company_id, kind))
        .transpose()?;

    debug!(collection = kind.as_str(), path = ?path, "Live stream opened");

    let store = state.store.clone();
    let stream = match kind {
        TenantCollection::Employees => snapshots::<Employee>(store, path),
        TenantCollection::Locations => snapshots::<Location>(store, path),
        TenantCollection::TimeOffRequests => snapshots::<TimeOffRequest>(store, path),
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
