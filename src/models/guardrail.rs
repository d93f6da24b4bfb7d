use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailPeriod {
    Weekly,
    #[default]
    Monthly,
}

impl GuardrailPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardrailPeriod::Weekly => "weekly",
            GuardrailPeriod::Monthly => "monthly",
        }
    }
}

impl fmt::Display for GuardrailPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailLimit {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub period: GuardrailPeriod,
    pub notify_at_percent: u8,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailCreateInput {
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub period: GuardrailPeriod,
    #[serde(default)]
    pub notify_at_percent: Option<u8>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailUpdateInput {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub period: Option<GuardrailPeriod>,
    #[serde(default)]
    pub notify_at_percent: Option<u8>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl GuardrailUpdateInput {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount.is_none()
            && self.period.is_none()
            && self.notify_at_percent.is_none()
            && self.enabled.is_none()
    }
}

/// Spending observed in one category for the current period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailState {
    Ok,
    Warning,
    Exceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailStatus {
    pub limit: GuardrailLimit,
    pub spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub state: GuardrailState,
}
