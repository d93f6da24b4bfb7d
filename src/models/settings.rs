use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    /// Categories scoring below this percentage get a recommendation.
    pub recommendation_threshold: f64,
    pub recommendation_display_limit: usize,
    pub default_notify_percent: u8,
    pub updated_at: String,
}
