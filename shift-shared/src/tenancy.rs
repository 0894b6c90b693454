//! Tenant resolution
//!
//! A signed-in user acts on the company whose `ownerUid` is their user id.
//! Zero matches means the user has not set up a company yet; that is an
//! empty state, not an error. More than one match is ambiguous and is also
//! treated as "no tenant" so nothing is read from or written to the wrong
//! company.

use crate::models::company::Company;
use crate::store::{DocumentStore, Record, StoreError};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TenantResolution {
    Resolved { company: Record<Company> },
    NoCompany,
    Ambiguous { count: usize },
}

impl TenantResolution {
    pub fn company(&self) -> Option<&Record<Company>> {
        match self {
            TenantResolution::Resolved { company } => Some(company),
            _ => None,
        }
    }

    /// Id of the resolved company, if exactly one was found
    pub fn tenant_id(&self) -> Option<&str> {
        self.company().map(|c| c.id.as_str())
    }

    pub fn is_resolved(&self) -> bool {
        self.company().is_some()
    }
}

/// Finds the company owned by `user_id`
pub async fn resolve_tenant(store: &dyn DocumentStore, user_id: &str) -> Result<TenantResolution, StoreError> {
    let mut owned = Company::find_by_owner(store, user_id).await?;

    let resolution = match owned.len() {
        0 => TenantResolution::NoCompany,
        1 => TenantResolution::Resolved {
            company: owned.remove(0),
        },
        count => {
            warn!(user_id, count, "User owns several companies, refusing to pick one");
            TenantResolution::Ambiguous { count }
        }
    };

    debug!(user_id, tenant_id = ?resolution.tenant_id(), "Tenant resolved");
    Ok(resolution)
}
