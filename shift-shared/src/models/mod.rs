/// Records stored by the scheduling application
///
/// Each model is a plain serde struct stored as a document, with associated
/// async functions for the reads and writes the application performs. Field
/// names are camelCase in storage and on the wire.
///
/// # Models
///
/// - `company`: the tenant, owned by one user
/// - `employee`: staff members of a company
/// - `location`: sites of a company
/// - `shift`: scheduled work blocks (sample data)
/// - `time_off`: leave requests
/// - `swap`: shift swap requests (sample data)
/// - `user`: login credentials
///
/// # Example
///
/// ```no_run
/// use shift_shared::models::employee::{Employee, EmployeeDetails, EmployeeRole};
/// use shift_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), shift_shared::store::StoreError> {
/// let store = MemoryStore::new();
///
/// let details = EmployeeDetails {
///     name: "Ada Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     role: EmployeeRole::Manager,
/// };
///
/// let employee = Employee::create(&store, "cpn_1", details).await?;
/// println!("Created employee {}", employee.id);
/// # Ok(())
/// # }
/// ```

pub mod company;
pub mod employee;
pub mod location;
pub mod shift;
pub mod swap;
pub mod time_off;
pub mod user;
