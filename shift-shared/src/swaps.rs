//! Shift swap board
//!
//! Splits swap requests into those offered to an employee and those the
//! employee raised, each joined to the shift and the two employees.

use crate::models::employee::{find_in, Employee};
use crate::models::shift::Shift;
use crate::models::swap::SwapRequest;
use crate::store::Record;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapView {
    pub request: SwapRequest,
    pub shift: Option<Shift>,
    pub from: Option<Record<Employee>>,
    pub to: Option<Record<Employee>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapBoard {
    pub incoming: Vec<SwapView>,
    pub outgoing: Vec<SwapView>,
}

fn view(request: &SwapRequest, shifts: &[Shift], employees: &[Record<Employee>]) -> SwapView {
    SwapView {
        request: request.clone(),
        shift: shifts.iter().find(|s| s.id == request.shift_id).cloned(),
        from: find_in(employees, &request.from_employee_id).cloned(),
        to: find_in(employees, &request.to_employee_id).cloned(),
    }
}

impl SwapBoard {
    pub fn build(
        employee_id: &str,
        requests: &[SwapRequest],
        shifts: &[Shift],
        employees: &[Record<Employee>],
    ) -> Self {
        Self {
            incoming: SwapRequest::incoming(requests, employee_id)
                .into_iter()
                .map(|r| view(r, shifts, employees))
                .collect(),
            outgoing: SwapRequest::outgoing(requests, employee_id)
                .into_iter()
                .map(|r| view(r, shifts, employees))
                .collect(),
        }
    }
}
