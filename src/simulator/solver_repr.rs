use serde::{Deserialize, Serialize};

/// The on-disk form of a scenario solver entry: its ID, its registered
/// type name, and the remaining keys as the type's own configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverRepr {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub config: serde_yaml::Value,
}
