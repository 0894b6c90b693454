//! Time-off views: the pending queue and leave balances

use crate::models::employee::{find_in, Employee};
use crate::models::time_off::{LeaveType, RequestStatus, TimeOffRequest};
use crate::store::Record;
use serde::Serialize;

/// A pending request with its employee, when the employee is known
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingRequest {
    pub request: Record<TimeOffRequest>,
    pub employee: Option<Record<Employee>>,
}

/// Pending requests in stored order
pub fn pending_requests(
    requests: &[Record<TimeOffRequest>],
    employees: &[Record<Employee>],
) -> Vec<PendingRequest> {
    requests
        .iter()
        .filter(|r| r.data.status == RequestStatus::Pending)
        .map(|r| PendingRequest {
            request: r.clone(),
            employee: find_in(employees, &r.data.employee_id).cloned(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    #[serde(rename = "type")]
    pub kind: LeaveType,
    pub used_days: u32,
    pub allowance_days: u32,
}

impl LeaveBalance {
    pub fn remaining_days(&self) -> u32 {
        self.allowance_days.saturating_sub(self.used_days)
    }
}

/// Approved days per leave type, for one employee or for everyone
pub fn balances(requests: &[Record<TimeOffRequest>], employee_id: Option<&str>) -> Vec<LeaveBalance> {
    LeaveType::ALL
        .iter()
        .map(|kind| {
            let used_days = requests
                .iter()
                .map(|r| &r.data)
                .filter(|r| r.kind == *kind && r.status == RequestStatus::Approved)
                .filter(|r| employee_id.map_or(true, |id| r.employee_id == id))
                .map(TimeOffRequest::days)
                .sum();

            LeaveBalance {
                kind: *kind,
                used_days,
                allowance_days: kind.allowance_days(),
            }
        })
        .collect()
}
