use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::models::snapshot::FinancialSnapshot;
use crate::models::wellness::{
    CategoryScore, WellnessCategory, WellnessGrade, WellnessResult, WellnessStatus,
};
use crate::services::category_scorers;
use crate::services::recommendation_service::{self, DEFAULT_RECOMMENDATION_THRESHOLD};

/// `round(Σ score)` clamped to 0..=100; max scores already carry the weights.
pub fn total_score(scores: &[CategoryScore]) -> u8 {
    let sum: f64 = scores.iter().map(|score| score.score).sum();
    sum.round().clamp(0.0, 100.0) as u8
}

/// Pure scoring engine: snapshot in, result out.
#[derive(Debug, Clone, Copy)]
pub struct WellnessEngine {
    recommendation_threshold: f64,
}

impl Default for WellnessEngine {
    fn default() -> Self {
        Self {
            recommendation_threshold: DEFAULT_RECOMMENDATION_THRESHOLD,
        }
    }
}

impl WellnessEngine {
    pub fn new(recommendation_threshold: f64) -> Self {
        let recommendation_threshold = if recommendation_threshold.is_finite() {
            recommendation_threshold.clamp(0.0, 100.0)
        } else {
            DEFAULT_RECOMMENDATION_THRESHOLD
        };
        Self {
            recommendation_threshold,
        }
    }

    pub fn recommendation_threshold(&self) -> f64 {
        self.recommendation_threshold
    }

    pub fn calculate(&self, snapshot: &FinancialSnapshot) -> WellnessResult {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.calculate_at(snapshot, timestamp)
    }

    /// Same as [`calculate`](Self::calculate) with a caller-supplied timestamp.
    pub fn calculate_at(&self, snapshot: &FinancialSnapshot, timestamp: String) -> WellnessResult {
        let scores = category_scorers::score_all(snapshot);
        let total_score = total_score(&scores);
        let recommendations =
            recommendation_service::generate(&scores, self.recommendation_threshold);

        debug!(
            target: "app::wellness",
            total_score,
            recommendations = recommendations.len(),
            "wellness score calculated"
        );

        let category_scores: BTreeMap<WellnessCategory, CategoryScore> = scores
            .into_iter()
            .map(|score| (score.category, score))
            .collect();

        WellnessResult {
            total_score,
            status: WellnessStatus::from_score(total_score),
            grade: WellnessGrade::from_score(total_score),
            category_scores,
            recommendations,
            timestamp,
        }
    }
}
