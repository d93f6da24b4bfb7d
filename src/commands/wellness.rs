use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::snapshot::FinancialSnapshot;
use crate::models::wellness::{WellnessResult, WellnessScoreRecord};
use crate::services::wellness_score_service::UserWellnessScore;

use super::{run, AppState, CommandResult};

const DEFAULT_HISTORY_LIMIT: usize = 30;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessHistoryPayload {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Scores the given snapshot without persisting anything.
pub fn wellness_score_calculate(
    state: &AppState,
    snapshot: FinancialSnapshot,
) -> CommandResult<WellnessResult> {
    run(|| state.wellness().calculate(&snapshot))
}

pub fn wellness_score_user(state: &AppState, user_id: &str) -> CommandResult<UserWellnessScore> {
    run(|| state.wellness().score_user(user_id))
}

pub fn wellness_latest(
    state: &AppState,
    user_id: &str,
) -> CommandResult<Option<WellnessScoreRecord>> {
    run(|| state.wellness().latest(user_id))
}

pub fn wellness_history(
    state: &AppState,
    user_id: &str,
    payload: WellnessHistoryPayload,
) -> CommandResult<Vec<WellnessScoreRecord>> {
    let limit = payload.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    run(|| state.wellness().history(user_id, limit))
}

/// `cutoff` must be an RFC 3339 timestamp.
pub fn wellness_history_prune(state: &AppState, cutoff: &str) -> CommandResult<usize> {
    run(|| {
        let cutoff = DateTime::parse_from_rfc3339(cutoff)
            .map_err(|err| AppError::validation(format!("invalid cutoff timestamp: {err}")))?
            .with_timezone(&Utc);
        state.wellness().prune_before(cutoff)
    })
}

pub fn financial_data_get(
    state: &AppState,
    user_id: &str,
) -> CommandResult<Option<FinancialSnapshot>> {
    run(|| state.financial_data().get(user_id))
}

pub fn financial_data_save(
    state: &AppState,
    user_id: &str,
    snapshot: FinancialSnapshot,
) -> CommandResult<()> {
    run(|| state.financial_data().save(user_id, &snapshot))
}

pub fn financial_data_delete(state: &AppState, user_id: &str) -> CommandResult<bool> {
    run(|| state.financial_data().delete(user_id))
}
