//! Built-in week of shifts and swap requests
//!
//! Shifts and swaps are not stored yet; the schedule and swap screens read
//! this fixed data. Employee ids here are the sample roster's ids ("1" to
//! "5") and only resolve to names when a company's employees use them.

use crate::models::employee::EmployeeRole;
use crate::models::shift::{Shift, Weekday};
use crate::models::swap::SwapRequest;
use crate::models::time_off::RequestStatus;

fn shift(id: &str, employee_id: &str, day: Weekday, start: &str, end: &str, role: EmployeeRole, color: &str) -> Shift {
    Shift {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        role,
        color: color.to_string(),
    }
}

pub fn shifts() -> Vec<Shift> {
    use EmployeeRole::*;
    use Weekday::*;

    vec![
        shift("s1", "1", Mon, "09:00", "17:00", Manager, "bg-blue-200"),
        shift("s2", "2", Mon, "07:00", "15:00", Barista, "bg-green-200"),
        shift("s3", "3", Tue, "12:00", "20:00", Cashier, "bg-yellow-200"),
        shift("s4", "4", Wed, "10:00", "18:00", Chef, "bg-red-200"),
        shift("s5", "2", Thu, "07:00", "15:00", Barista, "bg-green-200"),
        shift("s6", "3", Fri, "12:00", "20:00", Cashier, "bg-yellow-200"),
        shift("s7", "4", Sat, "10:00", "18:00", Chef, "bg-red-200"),
        shift("s8", "5", Thu, "13:00", "21:00", Barista, "bg-purple-200"),
        shift("s9", "5", Sun, "08:00", "16:00", Barista, "bg-purple-200"),
    ]
}

pub fn swap_requests() -> Vec<SwapRequest> {
    vec![
        SwapRequest {
            id: "sw1".to_string(),
            from_employee_id: "2".to_string(),
            to_employee_id: "5".to_string(),
            shift_id: "s5".to_string(),
            status: RequestStatus::Pending,
        },
        SwapRequest {
            id: "sw2".to_string(),
            from_employee_id: "3".to_string(),
            to_employee_id: "2".to_string(),
            shift_id: "s6".to_string(),
            status: RequestStatus::Approved,
        },
    ]
}

/// Looks a sample shift up by id
pub fn shift_by_id(id: &str) -> Option<Shift> {
    shifts().into_iter().find(|s| s.id == id)
}
