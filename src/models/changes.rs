use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Long-poll parameters for store changes
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ChangesQuery {
    /// Last revision the client has seen
    #[serde(default)]
    pub since: u64,
    /// Seconds to wait for a newer revision (capped at 60)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangesResponse {
    pub revision: u64,
    pub changed: bool,
}
