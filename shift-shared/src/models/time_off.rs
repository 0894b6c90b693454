/// Time-off request model
///
/// Requests live in `companies/{companyId}/timeOffRequests`. Dates are
/// calendar dates ("YYYY-MM-DD"), both ends inclusive.

use crate::store::{decode_records, CollectionPath, DocumentStore, Record, StoreError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    Vacation,
    #[serde(rename = "Sick Leave")]
    SickLeave,
    Personal,
}

impl LeaveType {
    pub const ALL: [LeaveType; 3] = [LeaveType::Vacation, LeaveType::SickLeave, LeaveType::Personal];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "Vacation",
            LeaveType::SickLeave => "Sick Leave",
            LeaveType::Personal => "Personal",
        }
    }

    /// Yearly allowance in days
    pub fn allowance_days(&self) -> u32 {
        match self {
            LeaveType::Vacation => 20,
            LeaveType::SickLeave => 10,
            LeaveType::Personal => 5,
        }
    }
}

/// Decision state shared by time-off and swap requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Denied => "Denied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffRequest {
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: LeaveType,
    pub status: RequestStatus,
}

impl TimeOffRequest {
    /// Days covered, counting both ends; zero if the range is reversed
    pub fn days(&self) -> u32 {
        let span = (self.end_date - self.start_date).num_days();
        if span < 0 {
            0
        } else {
            span as u32 + 1
        }
    }

    pub async fn list(store: &dyn DocumentStore, company_id: &str) -> Result<Vec<Record<Self>>, StoreError> {
        let path = CollectionPath::time_off_requests(company_id)?;
        let docs = store.list(&path).await?;
        Ok(decode_records(&path, docs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_wire_format() {
        let request: TimeOffRequest = serde_json::from_value(json!({
            "employeeId": "3",
            "startDate": "2024-08-12",
            "endDate": "2024-08-14",
            "type": "Sick Leave",
            "status": "Pending"
        }))
        .unwrap();

        assert_eq!(request.kind, LeaveType::SickLeave);
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.days(), 3);
    }

    #[test]
    fn test_reversed_range_has_no_days() {
        let request = TimeOffRequest {
            employee_id: "1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 12).unwrap(),
            kind: LeaveType::Vacation,
            status: RequestStatus::Approved,
        };
        assert_eq!(request.days(), 0);
    }

    #[test]
    fn test_allowances() {
        assert_eq!(LeaveType::Vacation.allowance_days(), 20);
        assert_eq!(LeaveType::SickLeave.allowance_days(), 10);
        assert_eq!(LeaveType::Personal.allowance_days(), 5);
    }
}
