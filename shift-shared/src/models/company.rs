/// Company model
///
/// A company is the tenant: employees, locations and time-off requests live
/// in subcollections of its document. Each company records the user that
/// owns it in `ownerUid`, which is how a signed-in user finds their tenant.

use crate::store::{decode_records, to_fields, CollectionPath, DocumentStore, Record, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Subscription tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanyPlan {
    #[default]
    Free,
    Starter,
    Pro,
    Business,
}

impl CompanyPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyPlan::Free => "Free",
            CompanyPlan::Starter => "Starter",
            CompanyPlan::Pro => "Pro",
            CompanyPlan::Business => "Business",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Free" => Some(CompanyPlan::Free),
            "Starter" => Some(CompanyPlan::Starter),
            "Pro" => Some(CompanyPlan::Pro),
            "Business" => Some(CompanyPlan::Business),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,

    /// Id of the user that owns this company
    pub owner_uid: String,

    #[serde(default)]
    pub plan: CompanyPlan,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Headcount bracket chosen at signup, e.g. "1-10"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for creating a company
#[derive(Debug, Clone, Default)]
pub struct CreateCompany {
    pub name: String,
    pub owner_uid: String,
    pub plan: CompanyPlan,
    pub org_number: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<String>,
    pub phone: Option<String>,
}

impl Company {
    /// Creates a company owned by `data.owner_uid`
    pub async fn create(store: &dyn DocumentStore, data: CreateCompany) -> Result<Record<Self>, StoreError> {
        let company = Company {
            name: data.name,
            owner_uid: data.owner_uid,
            plan: data.plan,
            org_number: data.org_number,
            industry: data.industry,
            employee_count: data.employee_count,
            phone: data.phone,
            created_at: Some(Utc::now()),
        };

        let id = store
            .add(&CollectionPath::companies(), to_fields(&company)?)
            .await?;

        info!(company_id = %id, owner_uid = %company.owner_uid, plan = company.plan.as_str(), "Company created");

        Ok(Record { id, data: company })
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Record<Self>>, StoreError> {
        match store.get(&CollectionPath::companies(), id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// All companies owned by a user, in creation order
    pub async fn find_by_owner(
        store: &dyn DocumentStore,
        owner_uid: &str,
    ) -> Result<Vec<Record<Self>>, StoreError> {
        let path = CollectionPath::companies();
        let docs = store
            .find_where(&path, "ownerUid", &Value::String(owner_uid.to_string()))
            .await?;
        Ok(decode_records(&path, docs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_plan_round_trip() {
        for plan in [
            CompanyPlan::Free,
            CompanyPlan::Starter,
            CompanyPlan::Pro,
            CompanyPlan::Business,
        ] {
            assert_eq!(CompanyPlan::from_str(plan.as_str()), Some(plan));
        }
        assert_eq!(CompanyPlan::from_str("Enterprise"), None);
    }

    #[test]
    fn test_plan_defaults_to_free_when_missing() {
        let company: Company =
            serde_json::from_value(serde_json::json!({ "name": "Bean There", "ownerUid": "u1" })).unwrap();
        assert_eq!(company.plan, CompanyPlan::Free);
    }

    #[tokio::test]
    async fn test_create_and_find_by_owner() {
        let store = MemoryStore::new();
        let created = Company::create(
            &store,
            CreateCompany {
                name: "Bean There".to_string(),
                owner_uid: "u1".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let owned = Company::find_by_owner(&store, "u1").await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, created.id);

        assert!(Company::find_by_owner(&store, "u2").await.unwrap().is_empty());
        assert!(Company::find_by_id(&store, &created.id).await.unwrap().is_some());
    }
}
