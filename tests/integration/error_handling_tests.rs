// Error handling and edge case tests

use stackr_finance_lib::db::store::{KeyValueStore, SqliteKeyValueStore};
use stackr_finance_lib::db::DbPool;
use stackr_finance_lib::error::AppError;
use stackr_finance_lib::models::guardrail::{GuardrailCreateInput, GuardrailUpdateInput};
use stackr_finance_lib::models::snapshot::FinancialSnapshot;
use stackr_finance_lib::services::financial_data_service::SnapshotSource;
use stackr_finance_lib::services::settings_service::SettingsUpdateInput;
use stackr_finance_lib::commands::AppState;
use stackr_finance_lib::utils::keys::{guardrails_key, snapshot_key};
use tempfile::tempdir;

fn setup_test_environment() -> (AppState, SqliteKeyValueStore, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    let raw_store = SqliteKeyValueStore::new(pool.clone());
    (AppState::new(pool), raw_store, dir)
}

#[test]
fn test_invalid_user_ids_are_rejected_everywhere() {
    let (state, _store, _dir) = setup_test_environment();
    let long_id = "x".repeat(129);

    for user_id in ["", "   ", "../etc", "user id", "ユーザー", long_id.as_str()] {
        assert!(
            matches!(state.wellness().score_user(user_id), Err(AppError::Validation { .. })),
            "score_user accepted {user_id:?}"
        );
        assert!(
            matches!(state.guardrails().list(user_id), Err(AppError::Validation { .. })),
            "list accepted {user_id:?}"
        );
        assert!(
            matches!(
                state.financial_data().save(user_id, &FinancialSnapshot::default()),
                Err(AppError::Validation { .. })
            ),
            "save accepted {user_id:?}"
        );
    }
}

#[test]
fn test_corrupt_snapshot_falls_back_to_sample_data() {
    let (state, store, _dir) = setup_test_environment();
    store
        .put(&snapshot_key("user-1"), "{not json")
        .expect("write corrupt snapshot");

    assert!(matches!(
        state.financial_data().get("user-1"),
        Err(AppError::Serialization(_))
    ));

    let scored = state.wellness().score_user("user-1").expect("score user");
    assert_eq!(scored.source, SnapshotSource::Sample);
    assert_eq!(scored.result.total_score, 66);
}

#[test]
fn test_corrupt_guardrails_are_reported_not_overwritten() {
    let (state, store, _dir) = setup_test_environment();
    store
        .put(&guardrails_key("user-1"), "[{\"id\": 7}]")
        .expect("write corrupt guardrails");

    assert!(state.guardrails().list("user-1").is_err());
    let add = state.guardrails().add(
        "user-1",
        GuardrailCreateInput {
            category: "Dining".to_string(),
            amount: 50.0,
            ..Default::default()
        },
    );
    assert!(add.is_err());
    assert_eq!(
        store.get(&guardrails_key("user-1")).expect("raw value").as_deref(),
        Some("[{\"id\": 7}]")
    );
}

#[test]
fn test_missing_guardrail_is_not_found() {
    let (state, _store, _dir) = setup_test_environment();

    let error = state
        .guardrails()
        .update(
            "user-1",
            "does-not-exist",
            GuardrailUpdateInput {
                amount: Some(10.0),
                ..Default::default()
            },
        )
        .expect_err("update of unknown id");
    assert!(error.is_not_found());
    assert!(state
        .guardrails()
        .delete("user-1", "does-not-exist")
        .expect_err("delete of unknown id")
        .is_not_found());
}

#[test]
fn test_invalid_settings_leave_stored_values_untouched() {
    let (state, _store, _dir) = setup_test_environment();
    let before = state.settings().get().expect("settings");

    for input in [
        SettingsUpdateInput {
            recommendation_threshold: Some(150.0),
            ..Default::default()
        },
        SettingsUpdateInput {
            recommendation_threshold: Some(f64::NAN),
            ..Default::default()
        },
        SettingsUpdateInput {
            recommendation_display_limit: Some(0),
            ..Default::default()
        },
        SettingsUpdateInput {
            recommendation_display_limit: Some(8),
            ..Default::default()
        },
        SettingsUpdateInput {
            recommendation_threshold: Some(50.0),
            default_notify_percent: Some(0),
            ..Default::default()
        },
    ] {
        assert!(matches!(
            state.settings().update(input),
            Err(AppError::Validation { .. })
        ));
    }

    let after = state.settings().get().expect("settings");
    assert_eq!(after.recommendation_threshold, before.recommendation_threshold);
    assert_eq!(after.recommendation_display_limit, before.recommendation_display_limit);
    assert_eq!(after.default_notify_percent, before.default_notify_percent);
}

#[test]
fn test_zero_income_snapshot_scores_without_error() {
    let (state, _store, _dir) = setup_test_environment();
    let mut snapshot = FinancialSnapshot::default();
    snapshot.debt.total_debt = 20_000.0;
    snapshot.debt.monthly_payments = 400.0;

    let result = state.wellness().calculate(&snapshot).expect("calculate");
    assert!(result.total_score <= 100);
}
