/// API route handlers, one module per resource

pub mod auth;
pub mod employees;
pub mod health;
pub mod live;
pub mod locations;
pub mod me;
pub mod schedule;
pub mod suggestions;
pub mod swaps;
pub mod time_off;

use serde::Serialize;

/// Envelope for tenant-scoped lists
///
/// Without a resolved company `items` is empty and `tenantResolved` is
/// false; clients render that as the "set up your company" state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub tenant_resolved: bool,
    pub items: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(tenant_resolved: bool, items: Vec<T>) -> Self {
        Self {
            tenant_resolved,
            items,
        }
    }

    pub fn unresolved() -> Self {
        Self::new(false, Vec::new())
    }
}
