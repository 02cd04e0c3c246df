use serde::{Deserialize, Serialize};

/// Result code reported when every queried service is up.
pub const STATUS_HEALTHY: i32 = 1;

/// Body of the status endpoint's answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub result: i32,
}
