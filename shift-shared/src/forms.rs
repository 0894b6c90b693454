//! Record forms
//!
//! A form holds the raw values a user typed for one record kind, validates
//! them with `validator` rules, and hands the parsed result to a submit
//! handler. Validation failures are kept on the form per field and the
//! values are left as typed. A form accepts one submission at a time.
//!
//! # Example
//!
//! ```no_run
//! use shift_shared::forms::{EmployeeForm, RecordForm, SubmitError};
//!
//! # async fn example() {
//! let form = RecordForm::new(EmployeeForm {
//!     name: "Ada Lovelace".to_string(),
//!     email: "not-an-email".to_string(),
//!     role: "Manager".to_string(),
//! });
//!
//! let result = form
//!     .submit(|details| async move { Ok::<_, std::convert::Infallible>(details) })
//!     .await;
//!
//! assert!(matches!(result, Err(SubmitError::Invalid(_))));
//! assert_eq!(form.errors()["email"], vec!["Please enter a valid email address."]);
//! # }
//! ```

use crate::models::employee::{Employee, EmployeeDetails, EmployeeRole};
use crate::models::location::Location;
use crate::store::Record;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use validator::{Validate, ValidationError, ValidationErrors};

/// Messages per field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Flattens `validator` output into per-field messages
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Values that can be validated and parsed into a record payload
pub trait FormInput: Clone + Send {
    type Output;

    fn parse(&self) -> Result<Self::Output, FieldErrors>;
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if EmployeeRole::from_str(role).is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("role");
    error.message = Some(Cow::Borrowed("Please select a valid role."));
    Err(error)
}

/// Employee add/edit form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EmployeeForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    /// One of Manager, Cashier, Barista, Chef; empty until chosen
    #[validate(custom(function = "validate_role"))]
    #[serde(default)]
    pub role: String,
}

impl EmployeeForm {
    /// Prefilled values for editing an existing employee
    pub fn from_record(employee: &Record<Employee>) -> Self {
        Self {
            name: employee.data.name.clone(),
            email: employee.data.email.clone(),
            role: employee.data.role.as_str().to_string(),
        }
    }
}

impl FormInput for EmployeeForm {
    type Output = EmployeeDetails;

    fn parse(&self) -> Result<EmployeeDetails, FieldErrors> {
        self.validate().map_err(|e| field_errors(&e))?;

        let role = EmployeeRole::from_str(&self.role).ok_or_else(|| {
            BTreeMap::from([("role".to_string(), vec!["Please select a valid role.".to_string()])])
        })?;

        Ok(EmployeeDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            role,
        })
    }
}

/// Location add/edit form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct LocationForm {
    #[validate(length(min = 2, message = "Location name must be at least 2 characters."))]
    pub name: String,

    #[validate(length(min = 5, message = "Address must be at least 5 characters."))]
    pub address: String,
}

impl LocationForm {
    pub fn from_record(location: &Record<Location>) -> Self {
        Self {
            name: location.data.name.clone(),
            address: location.data.address.clone(),
        }
    }
}

impl FormInput for LocationForm {
    type Output = Location;

    fn parse(&self) -> Result<Location, FieldErrors> {
        self.validate().map_err(|e| field_errors(&e))?;

        Ok(Location {
            name: self.name.clone(),
            address: self.address.clone(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError<E> {
    #[error("A submission is already in progress")]
    InFlight,

    #[error("Validation failed for {} field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("Submission failed: {0}")]
    Failed(E),
}

struct FormState<V> {
    values: V,
    errors: FieldErrors,
}

/// Clears the in-flight flag when the submission ends, however it ends
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Stateful form around one set of values
pub struct RecordForm<V> {
    state: Mutex<FormState<V>>,
    submitting: AtomicBool,
}

impl<V: FormInput> RecordForm<V> {
    pub fn new(values: V) -> Self {
        Self {
            state: Mutex::new(FormState {
                values,
                errors: FieldErrors::new(),
            }),
            submitting: AtomicBool::new(false),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FormState<V>) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state)
    }

    pub fn values(&self) -> V {
        self.with_state(|s| s.values.clone())
    }

    pub fn set_values(&self, values: V) {
        self.with_state(|s| s.values = values);
    }

    /// Errors from the last rejected submission
    pub fn errors(&self) -> FieldErrors {
        self.with_state(|s| s.errors.clone())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Validates the current values and, if they pass, runs `on_submit`
    ///
    /// `on_submit` is never called with invalid values. While it runs,
    /// further calls return [`SubmitError::InFlight`].
    pub async fn submit<F, Fut, T, E>(&self, on_submit: F) -> Result<T, SubmitError<E>>
    where
        F: FnOnce(V::Output) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::InFlight);
        }
        let _guard = SubmittingGuard(&self.submitting);

        let parsed = self.with_state(|s| {
            let parsed = s.values.parse();
            s.errors = match &parsed {
                Ok(_) => FieldErrors::new(),
                Err(errors) => errors.clone(),
            };
            parsed
        });

        let output = parsed.map_err(SubmitError::Invalid)?;
        on_submit(output).await.map_err(SubmitError::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn employee_form(name: &str, email: &str, role: &str) -> EmployeeForm {
        EmployeeForm {
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_employee_form_rules() {
        assert!(employee_form("Ada Lovelace", "ada@example.com", "Manager").parse().is_ok());

        let errors = employee_form("A", "ada@example.com", "Manager").parse().unwrap_err();
        assert_eq!(errors["name"], vec!["Name must be at least 2 characters."]);

        let errors = employee_form("Ada", "not-an-email", "Manager").parse().unwrap_err();
        assert_eq!(errors["email"], vec!["Please enter a valid email address."]);

        let errors = employee_form("Ada", "ada@example.com", "Janitor").parse().unwrap_err();
        assert_eq!(errors["role"], vec!["Please select a valid role."]);

        let errors = EmployeeForm::default().parse().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_location_form_rules() {
        let ok = LocationForm {
            name: "Harbour".to_string(),
            address: "1 Quay St".to_string(),
        };
        assert_eq!(ok.parse().unwrap().name, "Harbour");

        let bad = LocationForm {
            name: "H".to_string(),
            address: "Quay".to_string(),
        };
        let errors = bad.parse().unwrap_err();
        assert_eq!(errors["name"], vec!["Location name must be at least 2 characters."]);
        assert_eq!(errors["address"], vec!["Address must be at least 5 characters."]);
    }

    #[tokio::test]
    async fn test_invalid_submit_keeps_values_and_skips_handler() {
        let form = RecordForm::new(employee_form("Ada", "not-an-email", "Manager"));
        let mut called = false;

        let result = form
            .submit(|_| {
                called = true;
                async { Ok::<_, Infallible>(()) }
            })
            .await;

        assert!(matches!(result, Err(SubmitError::Invalid(_))));
        assert!(!called);
        assert_eq!(form.values().email, "not-an-email");
        assert!(form.errors().contains_key("email"));
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_valid_submit_clears_errors() {
        let form = RecordForm::new(employee_form("A", "ada@example.com", "Chef"));
        let _ = form.submit(|_| async { Ok::<_, Infallible>(()) }).await;
        assert!(!form.errors().is_empty());

        form.set_values(employee_form("Ada", "ada@example.com", "Chef"));
        let details = form
            .submit(|details| async move { Ok::<_, Infallible>(details) })
            .await
            .unwrap();

        assert_eq!(details.role, EmployeeRole::Chef);
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_in_flight() {
        let form = Arc::new(RecordForm::new(employee_form("Ada", "ada@example.com", "Chef")));
        let release = Arc::new(Notify::new());
        let started = Arc::new(Notify::new());

        let first = {
            let form = form.clone();
            let release = release.clone();
            let started = started.clone();
            tokio::spawn(async move {
                form.submit(|_| async move {
                    started.notify_one();
                    release.notified().await;
                    Ok::<_, Infallible>(())
                })
                .await
            })
        };

        started.notified().await;
        assert!(form.is_submitting());

        let second = form.submit(|_| async { Ok::<_, Infallible>(()) }).await;
        assert!(matches!(second, Err(SubmitError::InFlight)));

        release.notify_one();
        first.await.unwrap().unwrap();
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_failed_handler_resets_flag() {
        let form = RecordForm::new(LocationForm {
            name: "Harbour".to_string(),
            address: "1 Quay St".to_string(),
        });

        let result = form.submit(|_| async { Err::<(), _>("store offline") }).await;
        assert!(matches!(result, Err(SubmitError::Failed("store offline"))));
        assert!(!form.is_submitting());
    }
}
