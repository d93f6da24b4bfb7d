use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scored categories in table order. The declaration order doubles as the
/// tie-break order for recommendations, so do not reorder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WellnessCategory {
    Savings,
    Debt,
    EmergencyFund,
    Budget,
    Income,
    Investments,
    Goals,
}

impl WellnessCategory {
    pub const ALL: [WellnessCategory; 7] = [
        WellnessCategory::Savings,
        WellnessCategory::Debt,
        WellnessCategory::EmergencyFund,
        WellnessCategory::Budget,
        WellnessCategory::Income,
        WellnessCategory::Investments,
        WellnessCategory::Goals,
    ];

    pub fn max_score(self) -> f64 {
        match self {
            WellnessCategory::Savings => 20.0,
            WellnessCategory::Debt => 20.0,
            WellnessCategory::EmergencyFund => 15.0,
            WellnessCategory::Budget => 15.0,
            WellnessCategory::Income => 10.0,
            WellnessCategory::Investments => 10.0,
            WellnessCategory::Goals => 10.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WellnessCategory::Savings => "savings",
            WellnessCategory::Debt => "debt",
            WellnessCategory::EmergencyFund => "emergencyFund",
            WellnessCategory::Budget => "budget",
            WellnessCategory::Income => "income",
            WellnessCategory::Investments => "investments",
            WellnessCategory::Goals => "goals",
        }
    }
}

impl fmt::Display for WellnessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: WellnessCategory,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
}

impl CategoryScore {
    /// Clamps `score` into `0..=max_score` for `category`.
    pub fn new(category: WellnessCategory, score: f64) -> Self {
        let max_score = category.max_score();
        let score = if score.is_finite() {
            score.clamp(0.0, max_score)
        } else {
            0.0
        };
        Self {
            category,
            score,
            max_score,
            percentage: 100.0 * score / max_score,
        }
    }
}

/// Serialized with its display label; the snake_case form is what history rows store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WellnessStatus {
    #[serde(rename = "At Risk", alias = "at_risk")]
    AtRisk,
    #[serde(rename = "Improving", alias = "improving")]
    Improving,
    #[serde(rename = "Stable", alias = "stable")]
    Stable,
    #[serde(rename = "Excellent", alias = "excellent")]
    Excellent,
}

impl WellnessStatus {
    /// 0–40 at risk, 41–60 improving, 61–80 stable, 81–100 excellent.
    pub fn from_score(total_score: u8) -> Self {
        match total_score {
            0..=40 => WellnessStatus::AtRisk,
            41..=60 => WellnessStatus::Improving,
            61..=80 => WellnessStatus::Stable,
            _ => WellnessStatus::Excellent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WellnessStatus::AtRisk => "at_risk",
            WellnessStatus::Improving => "improving",
            WellnessStatus::Stable => "stable",
            WellnessStatus::Excellent => "excellent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WellnessStatus::AtRisk => "At Risk",
            WellnessStatus::Improving => "Improving",
            WellnessStatus::Stable => "Stable",
            WellnessStatus::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for WellnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for WellnessStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "at_risk" => Ok(WellnessStatus::AtRisk),
            "improving" => Ok(WellnessStatus::Improving),
            "stable" => Ok(WellnessStatus::Stable),
            "excellent" => Ok(WellnessStatus::Excellent),
            other => Err(format!("unsupported wellness status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WellnessGrade {
    A,
    B,
    C,
    D,
    F,
}

impl WellnessGrade {
    pub fn from_score(total_score: u8) -> Self {
        match total_score {
            90.. => WellnessGrade::A,
            80..=89 => WellnessGrade::B,
            70..=79 => WellnessGrade::C,
            60..=69 => WellnessGrade::D,
            _ => WellnessGrade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WellnessGrade::A => "A",
            WellnessGrade::B => "B",
            WellnessGrade::C => "C",
            WellnessGrade::D => "D",
            WellnessGrade::F => "F",
        }
    }
}

impl fmt::Display for WellnessGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WellnessGrade {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "A" => Ok(WellnessGrade::A),
            "B" => Ok(WellnessGrade::B),
            "C" => Ok(WellnessGrade::C),
            "D" => Ok(WellnessGrade::D),
            "F" => Ok(WellnessGrade::F),
            other => Err(format!("unsupported wellness grade: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: WellnessCategory,
    pub priority: RecommendationPriority,
    pub title: String,
    pub description: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessResult {
    pub total_score: u8,
    pub status: WellnessStatus,
    pub grade: WellnessGrade,
    pub category_scores: BTreeMap<WellnessCategory, CategoryScore>,
    pub recommendations: Vec<Recommendation>,
    pub timestamp: String,
}

/// What the scorecard shows up front plus how many are behind "show more".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    pub visible: Vec<Recommendation>,
    pub hidden_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessScoreRecord {
    pub id: i64,
    pub user_id: String,
    pub calculated_at: String,
    pub total_score: u8,
    pub status: WellnessStatus,
    pub grade: WellnessGrade,
    pub result: WellnessResult,
}
