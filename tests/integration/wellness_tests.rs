// Wellness score engine end-to-end tests

use stackr_finance_lib::db::DbPool;
use stackr_finance_lib::models::snapshot::FinancialSnapshot;
use stackr_finance_lib::models::wellness::{
    RecommendationPriority, WellnessCategory, WellnessGrade, WellnessStatus,
};
use stackr_finance_lib::services::category_scorers::debt_to_income_ratio;
use stackr_finance_lib::services::score_aggregator::WellnessEngine;
use stackr_finance_lib::services::settings_service::SettingsUpdateInput;
use stackr_finance_lib::commands::AppState;
use tempfile::tempdir;

fn example_snapshot() -> FinancialSnapshot {
    serde_json::from_str(
        r#"{
            "income": { "monthlyIncome": 4000 },
            "savingsData": { "rate": 15, "totalSavings": 8000 },
            "debtData": { "totalDebt": 15000, "monthlyPayments": 500, "monthlyIncome": 4000 },
            "emergencyFund": { "months": 2 },
            "investmentData": {
                "growthRate": 5,
                "diversification": 6,
                "monthlyContributions": 200,
                "totalInvestments": 12000
            },
            "goals": [{ "progress": 66.7 }, { "progress": 24 }]
        }"#,
    )
    .expect("example snapshot parses")
}

fn setup_state() -> (AppState, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    (AppState::new(pool), dir)
}

#[test]
fn test_example_snapshot_lands_in_documented_bands() {
    let snapshot = example_snapshot();
    assert_eq!(debt_to_income_ratio(&snapshot), 0.125);

    let result = WellnessEngine::default().calculate(&snapshot);

    let debt = &result.category_scores[&WellnessCategory::Debt];
    assert_eq!(debt.score, 17.0);
    assert_eq!(debt.max_score, 20.0);

    let emergency = &result.category_scores[&WellnessCategory::EmergencyFund];
    assert_eq!(emergency.score, 7.0);
    assert_eq!(emergency.max_score, 15.0);

    assert_eq!(result.total_score, 63);
    assert_eq!(result.status, WellnessStatus::Stable);
    assert_eq!(result.grade, WellnessGrade::D);
}

#[test]
fn test_recommendations_put_weakest_categories_first() {
    let result = WellnessEngine::default().calculate(&example_snapshot());

    let categories: Vec<WellnessCategory> = result
        .recommendations
        .iter()
        .map(|recommendation| recommendation.category)
        .collect();
    assert_eq!(
        categories,
        vec![
            WellnessCategory::Income,
            WellnessCategory::Goals,
            WellnessCategory::EmergencyFund,
            WellnessCategory::Budget,
        ]
    );

    let percentages: Vec<f64> = categories
        .iter()
        .map(|category| result.category_scores[category].percentage)
        .collect();
    assert!(percentages.windows(2).all(|pair| pair[0] <= pair[1]));

    assert_eq!(result.recommendations[0].priority, RecommendationPriority::High);
    assert_eq!(result.recommendations[3].priority, RecommendationPriority::Medium);
}

#[test]
fn test_scores_stay_within_bounds_for_extreme_input() {
    let snapshot: FinancialSnapshot = serde_json::from_str(
        r#"{
            "savings": { "rate": 900 },
            "debt": { "totalDebt": -5, "monthlyPayments": 1e12 },
            "emergencyFund": { "months": -3 },
            "investments": { "diversification": 400, "growthRate": -80 },
            "goals": [
                { "progress": 100, "targetDate": "2030-01-01", "plan": ["save"] },
                { "progress": 100, "targetDate": "2030-01-01", "plan": ["save"] },
                { "progress": 100, "targetDate": "2030-01-01", "plan": ["save"] },
                { "progress": 100, "targetDate": "2030-01-01", "plan": ["save"] }
            ]
        }"#,
    )
    .expect("snapshot parses");

    let result = WellnessEngine::default().calculate(&snapshot);
    assert!(result.total_score <= 100);
    for score in result.category_scores.values() {
        assert!(score.score >= 0.0 && score.score <= score.max_score);
        assert!(score.percentage >= 0.0 && score.percentage <= 100.0);
    }
}

#[test]
fn test_empty_snapshot_uses_fallbacks() {
    let result = WellnessEngine::default().calculate(&FinancialSnapshot::default());

    assert_eq!(result.category_scores.len(), 7);
    assert_eq!(result.total_score, 32);
    assert_eq!(result.status, WellnessStatus::AtRisk);
    assert_eq!(result.grade, WellnessGrade::F);
}

#[test]
fn test_scoring_is_idempotent_apart_from_timestamp() {
    let engine = WellnessEngine::default();
    let snapshot = example_snapshot();

    let first = engine.calculate_at(&snapshot, "2026-01-01T00:00:00.000Z".to_string());
    let second = engine.calculate_at(&snapshot, "2026-01-01T00:00:00.000Z".to_string());
    assert_eq!(first, second);

    let later = engine.calculate(&snapshot);
    assert_eq!(later.total_score, first.total_score);
    assert_eq!(later.category_scores, first.category_scores);
    assert_eq!(later.recommendations, first.recommendations);
}

#[test]
fn test_status_and_grade_bands_cover_every_score() {
    for score in 0..=100u8 {
        let status = WellnessStatus::from_score(score);
        let expected = match score {
            0..=40 => WellnessStatus::AtRisk,
            41..=60 => WellnessStatus::Improving,
            61..=80 => WellnessStatus::Stable,
            _ => WellnessStatus::Excellent,
        };
        assert_eq!(status, expected, "score {score}");

        let grade = WellnessGrade::from_score(score);
        let expected = match score {
            90..=100 => WellnessGrade::A,
            80..=89 => WellnessGrade::B,
            70..=79 => WellnessGrade::C,
            60..=69 => WellnessGrade::D,
            _ => WellnessGrade::F,
        };
        assert_eq!(grade, expected, "score {score}");
    }
}

#[test]
fn test_stored_snapshot_is_scored_and_recorded() {
    let (state, _dir) = setup_state();
    state
        .financial_data()
        .save("user-42", &example_snapshot())
        .expect("save snapshot");

    let scored = state.wellness().score_user("user-42").expect("score user");
    assert_eq!(scored.result.total_score, 63);
    assert_eq!(scored.display.visible.len(), 3);
    assert_eq!(scored.display.hidden_count, 1);

    let latest = state
        .wellness()
        .latest("user-42")
        .expect("latest")
        .expect("history row");
    assert_eq!(latest.user_id, "user-42");
    assert_eq!(latest.status, WellnessStatus::Stable);
    assert_eq!(latest.result, scored.result);
}

#[test]
fn test_threshold_setting_changes_recommendation_set() {
    let (state, _dir) = setup_state();
    state
        .settings()
        .update(SettingsUpdateInput {
            recommendation_threshold: Some(35.0),
            recommendation_display_limit: Some(7),
            ..Default::default()
        })
        .expect("update settings");

    let result = state
        .wellness()
        .calculate(&example_snapshot())
        .expect("calculate");
    let categories: Vec<WellnessCategory> = result
        .recommendations
        .iter()
        .map(|recommendation| recommendation.category)
        .collect();
    assert_eq!(categories, vec![WellnessCategory::Income]);
}

#[test]
fn test_fractional_scores_survive_history_storage() {
    let (state, _dir) = setup_state();

    for total in [3usize, 7, 11] {
        let categories: Vec<serde_json::Value> = (0..total)
            .map(|index| {
                serde_json::json!({
                    "name": format!("category-{index}"),
                    "budgeted": 100,
                    "spent": if index == 0 { 80 } else { 130 },
                    "discretionary": index % 2 == 1
                })
            })
            .collect();
        let snapshot: FinancialSnapshot =
            serde_json::from_value(serde_json::json!({ "budget": { "categories": categories } }))
                .expect("budget snapshot parses");

        let user_id = format!("budget-{total}");
        state
            .financial_data()
            .save(&user_id, &snapshot)
            .expect("save snapshot");
        let scored = state.wellness().score_user(&user_id).expect("score user");
        let budget = &scored.result.category_scores[&WellnessCategory::Budget];
        assert_ne!(budget.score.fract(), 0.0, "adherence for {total} categories");

        let latest = state
            .wellness()
            .latest(&user_id)
            .expect("latest")
            .expect("history row");
        assert_eq!(latest.result, scored.result, "{total} categories");
    }
}
