/// Collection paths
///
/// A path is a slash-separated sequence with an odd number of non-empty
/// segments: `companies` names a root collection, `companies/{id}/employees`
/// names a subcollection owned by one company document.

use super::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated collection path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Parses and validates a path
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] for empty segments or an even
    /// segment count (which would address a document, not a collection).
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let segments: Vec<&str> = raw.split('/').collect();

        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(StoreError::InvalidPath(format!("empty segment in '{}'", raw)));
        }

        if segments.len() % 2 == 0 {
            return Err(StoreError::InvalidPath(format!(
                "'{}' addresses a document, not a collection",
                raw
            )));
        }

        Ok(Self(raw.to_string()))
    }

    /// Root collection of companies
    pub fn companies() -> Self {
        Self("companies".to_string())
    }

    /// Root collection of user credentials
    pub fn users() -> Self {
        Self("users".to_string())
    }

    /// A subcollection owned by one company
    pub fn tenant(company_id: &str, collection: TenantCollection) -> Result<Self, StoreError> {
        Self::parse(&format!("companies/{}/{}", company_id, collection.as_str()))
    }

    pub fn employees(company_id: &str) -> Result<Self, StoreError> {
        Self::tenant(company_id, TenantCollection::Employees)
    }

    pub fn locations(company_id: &str) -> Result<Self, StoreError> {
        Self::tenant(company_id, TenantCollection::Locations)
    }

    pub fn time_off_requests(company_id: &str) -> Result<Self, StoreError> {
        Self::tenant(company_id, TenantCollection::TimeOffRequests)
    }

    /// Final segment, the collection's own name
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CollectionPath {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CollectionPath> for String {
    fn from(path: CollectionPath) -> Self {
        path.0
    }
}

/// Collections that live under a company document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenantCollection {
    #[serde(rename = "employees")]
    Employees,

    #[serde(rename = "locations")]
    Locations,

    #[serde(rename = "timeOffRequests")]
    TimeOffRequests,
}

impl TenantCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantCollection::Employees => "employees",
            TenantCollection::Locations => "locations",
            TenantCollection::TimeOffRequests => "timeOffRequests",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "employees" => Some(TenantCollection::Employees),
            "locations" => Some(TenantCollection::Locations),
            "timeOffRequests" => Some(TenantCollection::TimeOffRequests),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_collections() {
        assert!(CollectionPath::parse("companies").is_ok());
        assert!(CollectionPath::parse("companies/cpn_1/employees").is_ok());
    }

    #[test]
    fn test_parse_rejects_documents_and_blanks() {
        assert!(CollectionPath::parse("").is_err());
        assert!(CollectionPath::parse("companies/cpn_1").is_err());
        assert!(CollectionPath::parse("companies//employees").is_err());
        assert!(CollectionPath::parse("/companies").is_err());
    }

    #[test]
    fn test_tenant_paths() {
        let path = CollectionPath::time_off_requests("cpn_1").unwrap();
        assert_eq!(path.as_str(), "companies/cpn_1/timeOffRequests");
        assert_eq!(path.name(), "timeOffRequests");

        assert!(CollectionPath::employees("").is_err());
        assert!(CollectionPath::employees("a/b").is_err());
    }

    #[test]
    fn test_tenant_collection_round_trip() {
        for kind in [
            TenantCollection::Employees,
            TenantCollection::Locations,
            TenantCollection::TimeOffRequests,
        ] {
            assert_eq!(TenantCollection::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(TenantCollection::from_str("shifts"), None);
    }
}
