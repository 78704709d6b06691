/// HTTP endpoint paths for the ledger API.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const OPERATIONS: &str = "/v1/operations";
    pub const INVOKE: &str = "/v1/invoke/:operation";
    pub const QUERY: &str = "/v1/query/:operation";
}

/// Version of the operation set and its argument conventions.
pub const API_VERSION: u32 = 1;

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub api_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            api_version: API_VERSION,
        }
    }
}

/// Body of an invoke or query call.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallRequest {
    #[serde(default)]
    pub args: Vec<String>,
}
