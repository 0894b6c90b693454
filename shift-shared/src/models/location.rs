/// Location model
///
/// Sites a company operates, stored in `companies/{companyId}/locations`.

use crate::store::{decode_records, to_fields, CollectionPath, DocumentStore, Record, StoreError};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
}

impl Location {
    pub async fn create(
        store: &dyn DocumentStore,
        company_id: &str,
        location: Location,
    ) -> Result<Record<Self>, StoreError> {
        let path = CollectionPath::locations(company_id)?;
        let id = store.add(&path, to_fields(&location)?).await?;

        info!(company_id, location_id = %id, "Location added");
        Ok(Record { id, data: location })
    }

    pub async fn update(
        store: &dyn DocumentStore,
        company_id: &str,
        id: &str,
        location: Location,
    ) -> Result<(), StoreError> {
        let path = CollectionPath::locations(company_id)?;
        store.update(&path, id, to_fields(&location)?).await?;

        info!(company_id, location_id = %id, "Location updated");
        Ok(())
    }

    pub async fn delete(store: &dyn DocumentStore, company_id: &str, id: &str) -> Result<bool, StoreError> {
        let path = CollectionPath::locations(company_id)?;
        let removed = store.delete(&path, id).await?;

        if removed {
            info!(company_id, location_id = %id, "Location removed");
        }
        Ok(removed)
    }

    pub async fn list(store: &dyn DocumentStore, company_id: &str) -> Result<Vec<Record<Self>>, StoreError> {
        let path = CollectionPath::locations(company_id)?;
        let docs = store.list(&path).await?;
        Ok(decode_records(&path, docs))
    }
}
