/// Shift swap request model

use super::time_off::RequestStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: String,
    pub from_employee_id: String,
    pub to_employee_id: String,
    pub shift_id: String,
    pub status: RequestStatus,
}

impl SwapRequest {
    /// Requests offered to `employee_id`
    pub fn incoming<'a>(requests: &'a [SwapRequest], employee_id: &str) -> Vec<&'a SwapRequest> {
        requests
            .iter()
            .filter(|r| r.to_employee_id == employee_id)
            .collect()
    }

    /// Requests raised by `employee_id`
    pub fn outgoing<'a>(requests: &'a [SwapRequest], employee_id: &str) -> Vec<&'a SwapRequest> {
        requests
            .iter()
            .filter(|r| r.from_employee_id == employee_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    #[test]
    fn test_incoming_and_outgoing() {
        let requests = sample::swap_requests();

        let incoming = SwapRequest::incoming(&requests, "2");
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].id, "sw2");

        let outgoing = SwapRequest::outgoing(&requests, "2");
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].id, "sw1");

        assert!(SwapRequest::incoming(&requests, "9").is_empty());
    }
}
