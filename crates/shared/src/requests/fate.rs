use serde::{Deserialize, Serialize};

/// Spend a fate point to re-roll a previous check.
///
/// `formula` is the re-executable formula returned with the original roll,
/// e.g. "3d6 + 3 + 2 + 1 + 0".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FateRerollRequest {
    pub label: String,
    pub formula: String,
}
