/// Employee model
///
/// Employees live in `companies/{companyId}/employees`. The avatar is
/// assigned once at creation from a random image seed; edits only ever touch
/// name, email and role.

use crate::store::{decode_records, to_fields, CollectionPath, DocumentStore, Record, StoreError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeRole {
    Manager,
    Cashier,
    Barista,
    Chef,
}

impl EmployeeRole {
    pub const ALL: [EmployeeRole; 4] = [
        EmployeeRole::Manager,
        EmployeeRole::Cashier,
        EmployeeRole::Barista,
        EmployeeRole::Chef,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Manager => "Manager",
            EmployeeRole::Cashier => "Cashier",
            EmployeeRole::Barista => "Barista",
            EmployeeRole::Chef => "Chef",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
    pub avatar_url: String,
}

/// The editable part of an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDetails {
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
}

/// Placeholder avatar for a seed
pub fn avatar_url(seed: u32) -> String {
    format!("https://picsum.photos/seed/{}/100/100", seed)
}

impl Employee {
    /// Adds an employee to a company with a freshly generated avatar
    pub async fn create(
        store: &dyn DocumentStore,
        company_id: &str,
        details: EmployeeDetails,
    ) -> Result<Record<Self>, StoreError> {
        let path = CollectionPath::employees(company_id)?;
        let seed: u32 = rand::thread_rng().gen_range(0..1000);

        let employee = Employee {
            name: details.name,
            email: details.email,
            role: details.role,
            avatar_url: avatar_url(seed),
        };

        let id = store.add(&path, to_fields(&employee)?).await?;
        info!(company_id, employee_id = %id, role = employee.role.as_str(), "Employee added");

        Ok(Record { id, data: employee })
    }

    /// Replaces name, email and role; the avatar is left as it was
    pub async fn update(
        store: &dyn DocumentStore,
        company_id: &str,
        id: &str,
        details: EmployeeDetails,
    ) -> Result<(), StoreError> {
        let path = CollectionPath::employees(company_id)?;
        store.update(&path, id, to_fields(&details)?).await?;

        info!(company_id, employee_id = %id, "Employee updated");
        Ok(())
    }

    /// Removes an employee, returning whether it existed
    pub async fn delete(store: &dyn DocumentStore, company_id: &str, id: &str) -> Result<bool, StoreError> {
        let path = CollectionPath::employees(company_id)?;
        let removed = store.delete(&path, id).await?;

        if removed {
            info!(company_id, employee_id = %id, "Employee removed");
        }
        Ok(removed)
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        company_id: &str,
        id: &str,
    ) -> Result<Option<Record<Self>>, StoreError> {
        let path = CollectionPath::employees(company_id)?;
        match store.get(&path, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn list(store: &dyn DocumentStore, company_id: &str) -> Result<Vec<Record<Self>>, StoreError> {
        let path = CollectionPath::employees(company_id)?;
        let docs = store.list(&path).await?;
        Ok(decode_records(&path, docs))
    }
}

/// Looks an employee up by id in an already loaded snapshot
pub fn find_in<'a>(employees: &'a [Record<Employee>], id: &str) -> Option<&'a Record<Employee>> {
    employees.iter().find(|e| e.id == id)
}
