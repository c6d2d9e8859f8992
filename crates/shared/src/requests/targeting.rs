use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Select the opposing actor for a user's ship attacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTargetRequest {
    pub target_id: Uuid,
}
