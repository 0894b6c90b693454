//! Company management screen
//!
//! [`CompanyDashboard`] composes the pieces of the company page: it resolves
//! the signed-in user's tenant, keeps live employee and location lists for
//! that tenant, tracks which dialog is open, and routes form submissions and
//! delete confirmations to the matching store mutation.
//!
//! Every mutation ends with a notification. On success the dialog closes; on
//! failure it stays open with the form values intact so the user can retry.
//!
//! # Example
//!
//! ```no_run
//! use shift_shared::dashboard::{CompanyDashboard, DialogState};
//! use shift_shared::forms::EmployeeForm;
//! use shift_shared::store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut page = CompanyDashboard::mount(Arc::new(MemoryStore::new()), "user_1").await?;
//!
//! page.open(DialogState::AddEmployee);
//! page.employee_form().set_values(EmployeeForm {
//!     name: "Ada Lovelace".to_string(),
//!     email: "ada@example.com".to_string(),
//!     role: "Manager".to_string(),
//! });
//! page.submit_employee().await?;
//!
//! for note in page.take_notifications() {
//!     println!("{}: {}", note.title, note.description);
//! }
//! # Ok(())
//! # }
//! ```

use crate::forms::{EmployeeForm, FieldErrors, LocationForm, RecordForm, SubmitError};
use crate::live::{CollectionState, LiveCollection};
use crate::models::employee::Employee;
use crate::models::location::Location;
use crate::store::{CollectionPath, DocumentStore, Record, StoreError};
use crate::tenancy::{resolve_tenant, TenantResolution};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// The modal currently shown, with the record it acts on
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DialogState {
    #[default]
    None,
    AddEmployee,
    EditEmployee(Record<Employee>),
    DeleteEmployee(Record<Employee>),
    AddLocation,
    EditLocation(Record<Location>),
    DeleteLocation(Record<Location>),
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        !matches!(self, DialogState::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message shown after a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn success(title: &str, description: String) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.to_string(),
            description,
        }
    }

    fn error(description: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("No company is associated with this account")]
    NoTenant,

    #[error("The open dialog does not accept this action")]
    WrongDialog,

    #[error("A submission is already in progress")]
    InFlight,

    #[error("Validation failed")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SubmitError<StoreError>> for MutationError {
    fn from(err: SubmitError<StoreError>) -> Self {
        match err {
            SubmitError::InFlight => MutationError::InFlight,
            SubmitError::Invalid(errors) => MutationError::Invalid(errors),
            SubmitError::Failed(e) => MutationError::Store(e),
        }
    }
}

enum Outcome {
    Added(String),
    Updated(String),
}

pub struct CompanyDashboard {
    store: Arc<dyn DocumentStore>,
    user_id: String,
    tenant: TenantResolution,
    employees: LiveCollection<Employee>,
    locations: LiveCollection<Location>,
    dialog: DialogState,
    employee_form: RecordForm<EmployeeForm>,
    location_form: RecordForm<LocationForm>,
    notifications: VecDeque<Notification>,
}

fn tenant_paths(
    tenant: &TenantResolution,
) -> Result<(Option<CollectionPath>, Option<CollectionPath>), StoreError> {
    match tenant.tenant_id() {
        Some(id) => Ok((
            Some(CollectionPath::employees(id)?),
            Some(CollectionPath::locations(id)?),
        )),
        None => Ok((None, None)),
    }
}

impl CompanyDashboard {
    /// Resolves the user's company and subscribes to its collections
    ///
    /// Without a company the lists stay empty and not loading.
    pub async fn mount(store: Arc<dyn DocumentStore>, user_id: &str) -> Result<Self, StoreError> {
        let tenant = resolve_tenant(store.as_ref(), user_id).await?;
        let (employees_path, locations_path) = tenant_paths(&tenant)?;

        Ok(Self {
            employees: LiveCollection::subscribe(store.clone(), employees_path),
            locations: LiveCollection::subscribe(store.clone(), locations_path),
            store,
            user_id: user_id.to_string(),
            tenant,
            dialog: DialogState::None,
            employee_form: RecordForm::new(EmployeeForm::default()),
            location_form: RecordForm::new(LocationForm::default()),
            notifications: VecDeque::new(),
        })
    }

    /// Re-resolves the tenant, e.g. after the user created their company
    pub async fn refresh_tenant(&mut self) -> Result<(), StoreError> {
        let tenant = resolve_tenant(self.store.as_ref(), &self.user_id).await?;
        let (employees_path, locations_path) = tenant_paths(&tenant)?;

        self.employees.set_path(employees_path);
        self.locations.set_path(locations_path);
        self.tenant = tenant;
        Ok(())
    }

    pub fn tenant(&self) -> &TenantResolution {
        &self.tenant
    }

    pub fn employees(&self) -> CollectionState<Employee> {
        self.employees.state()
    }

    pub fn locations(&self) -> CollectionState<Location> {
        self.locations.state()
    }

    pub fn employee_list(&self) -> &LiveCollection<Employee> {
        &self.employees
    }

    pub fn location_list(&self) -> &LiveCollection<Location> {
        &self.locations
    }

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    pub fn employee_form(&self) -> &RecordForm<EmployeeForm> {
        &self.employee_form
    }

    pub fn location_form(&self) -> &RecordForm<LocationForm> {
        &self.location_form
    }

    /// Shows a dialog, replacing whichever one was open
    ///
    /// Add dialogs start from blank values, edit dialogs from the record.
    pub fn open(&mut self, dialog: DialogState) {
        match &dialog {
            DialogState::AddEmployee => self.employee_form.set_values(EmployeeForm::default()),
            DialogState::EditEmployee(record) => {
                self.employee_form.set_values(EmployeeForm::from_record(record))
            }
            DialogState::AddLocation => self.location_form.set_values(LocationForm::default()),
            DialogState::EditLocation(record) => {
                self.location_form.set_values(LocationForm::from_record(record))
            }
            _ => {}
        }

        debug!(dialog = ?dialog, "Dialog opened");
        self.dialog = dialog;
    }

    pub fn close(&mut self) {
        self.dialog = DialogState::None;
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn tenant_id(&self) -> Result<String, MutationError> {
        self.tenant
            .tenant_id()
            .map(str::to_string)
            .ok_or(MutationError::NoTenant)
    }

    fn finish(&mut self, result: Result<Notification, MutationError>, failure: &str) -> Result<(), MutationError> {
        match result {
            Ok(notification) => {
                self.notifications.push_back(notification);
                self.close();
                Ok(())
            }
            Err(MutationError::Store(e)) => {
                warn!(error = %e, "Mutation failed");
                self.notifications.push_back(Notification::error(failure));
                Err(MutationError::Store(e))
            }
            // Validation errors are shown on the form itself
            Err(other) => Err(other),
        }
    }

    /// Submits the employee form for the open Add or Edit dialog
    pub async fn submit_employee(&mut self) -> Result<(), MutationError> {
        let target = match &self.dialog {
            DialogState::AddEmployee => None,
            DialogState::EditEmployee(record) => Some(record.id.clone()),
            _ => return Err(MutationError::WrongDialog),
        };
        let tenant_id = self.tenant_id()?;
        let store = self.store.clone();
        let editing = target.is_some();

        let result = self
            .employee_form
            .submit(|details| async move {
                match target {
                    None => Employee::create(store.as_ref(), &tenant_id, details)
                        .await
                        .map(|record| Outcome::Added(record.data.name)),
                    Some(id) => {
                        let name = details.name.clone();
                        Employee::update(store.as_ref(), &tenant_id, &id, details)
                            .await
                            .map(|_| Outcome::Updated(name))
                    }
                }
            })
            .await
            .map_err(MutationError::from)
            .map(|outcome| match outcome {
                Outcome::Added(name) => Notification::success(
                    "Employee Added",
                    format!("{} has been added to your company.", name),
                ),
                Outcome::Updated(name) => Notification::success(
                    "Employee Updated",
                    format!("{}'s details have been updated.", name),
                ),
            });

        let failure = if editing {
            "Could not update employee. Please try again."
        } else {
            "Could not add employee. Please try again."
        };
        self.finish(result, failure)
    }

    /// Submits the location form for the open Add or Edit dialog
    pub async fn submit_location(&mut self) -> Result<(), MutationError> {
        let target = match &self.dialog {
            DialogState::AddLocation => None,
            DialogState::EditLocation(record) => Some(record.id.clone()),
            _ => return Err(MutationError::WrongDialog),
        };
        let tenant_id = self.tenant_id()?;
        let store = self.store.clone();
        let editing = target.is_some();

        let result = self
            .location_form
            .submit(|location| async move {
                let name = location.name.clone();
                match target {
                    None => Location::create(store.as_ref(), &tenant_id, location)
                        .await
                        .map(|_| Outcome::Added(name)),
                    Some(id) => Location::update(store.as_ref(), &tenant_id, &id, location)
                        .await
                        .map(|_| Outcome::Updated(name)),
                }
            })
            .await
            .map_err(MutationError::from)
            .map(|outcome| match outcome {
                Outcome::Added(name) => Notification::success(
                    "Location Added",
                    format!("{} has been added to your locations.", name),
                ),
                Outcome::Updated(name) => Notification::success(
                    "Location Updated",
                    format!("{} has been updated.", name),
                ),
            });

        let failure = if editing {
            "Could not update location. Please try again."
        } else {
            "Could not add location. Please try again."
        };
        self.finish(result, failure)
    }

    /// Carries out the delete the open confirmation dialog asks about
    pub async fn confirm_delete(&mut self) -> Result<(), MutationError> {
        let tenant_id = self.tenant_id()?;

        match self.dialog.clone() {
            DialogState::DeleteEmployee(record) => {
                let result = Employee::delete(self.store.as_ref(), &tenant_id, &record.id)
                    .await
                    .map_err(MutationError::from)
                    .map(|_| {
                        Notification::success(
                            "Employee Removed",
                            format!("{} has been removed from your company.", record.data.name),
                        )
                    });
                self.finish(result, "Could not remove employee. Please try again.")
            }
            DialogState::DeleteLocation(record) => {
                let result = Location::delete(self.store.as_ref(), &tenant_id, &record.id)
                    .await
                    .map_err(MutationError::from)
                    .map(|_| {
                        Notification::success(
                            "Location Removed",
                            format!("{} has been removed.", record.data.name),
                        )
                    });
                self.finish(result, "Could not remove location. Please try again.")
            }
            _ => Err(MutationError::WrongDialog),
        }
    }
}
