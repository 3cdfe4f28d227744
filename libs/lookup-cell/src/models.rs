use serde::{Deserialize, Serialize};

/// Composite identity of a branch-service association. Value equality makes
/// this usable as a map key without the string-concatenation keys it
/// replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchServiceKey {
    pub branch_id: i64,
    pub service_id: i64,
}

impl BranchServiceKey {
    pub fn new(branch_id: i64, service_id: i64) -> Self {
        Self {
            branch_id,
            service_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBranchRequest {
    pub name: String,
    pub address: Option<String>,
    pub district: String,
    pub province: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDistrictRequest {
    pub name: String,
    pub province: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBranchServiceRequest {
    pub branch_id: i64,
    pub service_id: i64,
}

/// Association record enriched with the names a client would otherwise have
/// to join for itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchServiceView {
    pub id: i64,
    pub branch_id: i64,
    pub service_id: i64,
    pub branch_name: Option<String>,
    pub service_name: Option<String>,
    pub district: Option<String>,
}
