use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::db::repositories::wellness_score_repository::WellnessScoreRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::snapshot::FinancialSnapshot;
use crate::models::wellness::{RecommendationView, WellnessResult, WellnessScoreRecord};
use crate::services::financial_data_service::{FinancialDataService, SnapshotSource};
use crate::services::recommendation_service;
use crate::services::score_aggregator::WellnessEngine;
use crate::services::settings_service::SettingsService;
use crate::utils::keys::validate_user_id;

const MAX_HISTORY_LIMIT: usize = 365;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWellnessScore {
    pub result: WellnessResult,
    pub source: SnapshotSource,
    pub display: RecommendationView,
}

/// Scores users' snapshots and keeps a history of results.
pub struct WellnessScoreService {
    db: DbPool,
    financial_data: Arc<FinancialDataService>,
    settings: Arc<SettingsService>,
}

impl WellnessScoreService {
    pub fn new(
        db: DbPool,
        financial_data: Arc<FinancialDataService>,
        settings: Arc<SettingsService>,
    ) -> Self {
        Self {
            db,
            financial_data,
            settings,
        }
    }

    fn engine(&self) -> AppResult<WellnessEngine> {
        let settings = self.settings.get()?;
        Ok(WellnessEngine::new(settings.recommendation_threshold))
    }

    /// Scores an ad-hoc snapshot without touching history.
    pub fn calculate(&self, snapshot: &FinancialSnapshot) -> AppResult<WellnessResult> {
        Ok(self.engine()?.calculate(snapshot))
    }

    /// Scores the user's stored snapshot (or sample data) and records the result.
    pub fn score_user(&self, user_id: &str) -> AppResult<UserWellnessScore> {
        let user_id = validate_user_id(user_id)?;
        let settings = self.settings.get()?;
        let (snapshot, source) = self.financial_data.load_or_sample(user_id)?;

        let result = WellnessEngine::new(settings.recommendation_threshold).calculate(&snapshot);

        // history is best-effort
        if let Err(err) = self
            .db
            .with_connection(|conn| WellnessScoreRepository::insert(conn, user_id, &result))
        {
            error!(
                target: "app::wellness",
                user_id,
                error = %err,
                "failed to record wellness score history"
            );
        }

        info!(
            target: "app::wellness",
            user_id,
            total_score = result.total_score,
            status = result.status.as_str(),
            "user wellness score calculated"
        );

        let display = recommendation_service::display_view(
            &result.recommendations,
            settings.recommendation_display_limit,
        );

        Ok(UserWellnessScore {
            result,
            source,
            display,
        })
    }

    pub fn latest(&self, user_id: &str) -> AppResult<Option<WellnessScoreRecord>> {
        let user_id = validate_user_id(user_id)?;
        self.db
            .with_connection(|conn| WellnessScoreRepository::find_latest(conn, user_id))
    }

    /// Newest first; `limit` is capped at one year of daily scores.
    pub fn history(&self, user_id: &str, limit: usize) -> AppResult<Vec<WellnessScoreRecord>> {
        let user_id = validate_user_id(user_id)?;
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        self.db
            .with_connection(|conn| WellnessScoreRepository::list_recent(conn, user_id, limit))
    }

    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> AppResult<usize> {
        let cutoff = cutoff.to_rfc3339_opts(SecondsFormat::Millis, true);
        let deleted = self
            .db
            .with_connection(|conn| WellnessScoreRepository::delete_before(conn, &cutoff))?;
        info!(target: "app::wellness", deleted, %cutoff, "pruned wellness score history");
        Ok(deleted)
    }
}
