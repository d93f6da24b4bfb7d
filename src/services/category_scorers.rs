//! Category scorers for the wellness score engine.
//!
//! Each scorer is a total function over a [`FinancialSnapshot`]: missing data
//! and zero denominators map to fixed fallback scores, never to an error. The
//! returned [`CategoryScore`] is always clamped into `0..=max_score`.

use std::collections::HashSet;

use crate::models::snapshot::FinancialSnapshot;
use crate::models::wellness::{CategoryScore, WellnessCategory};

/// Savings score when the rate is zero, negative or missing.
pub const SAVINGS_FLOOR_SCORE: f64 = 2.0;
/// Debt score when the snapshot carries no debt at all.
pub const NO_DEBT_SCORE: f64 = 20.0;
/// Budget score when no category has a positive budget.
pub const BUDGET_FALLBACK_SCORE: f64 = 7.0;
/// Allocation points awarded when no allocation is recorded.
pub const ALLOCATION_FALLBACK_POINTS: f64 = 2.0;

const DEFAULT_NEEDS_TARGET: f64 = 50.0;
const DEFAULT_SAVINGS_TARGET: f64 = 20.0;
const DEFAULT_INVESTMENTS_TARGET: f64 = 10.0;

const HIGH_INTEREST_DEBT: [&str; 4] = ["credit_card", "payday", "personal", "store_card"];
const HIGH_INTEREST_PENALTY: f64 = 2.0;

/// (upper ratio bound inclusive, score)
const DEBT_RATIO_BANDS: [(f64, f64); 4] = [(0.10, 20.0), (0.20, 17.0), (0.36, 12.0), (0.50, 7.0)];
const DEBT_RATIO_BOTTOM_SCORE: f64 = 3.0;

/// Score by number of distinct asset classes; index 5 covers five or more.
const DIVERSITY_TABLE: [f64; 6] = [0.0, 2.0, 4.0, 6.0, 7.0, 8.0];

/// Scores every category in table order.
pub fn score_all(snapshot: &FinancialSnapshot) -> Vec<CategoryScore> {
    WellnessCategory::ALL
        .iter()
        .map(|category| score_category(*category, snapshot))
        .collect()
}

pub fn score_category(category: WellnessCategory, snapshot: &FinancialSnapshot) -> CategoryScore {
    let raw = match category {
        WellnessCategory::Savings => score_savings(snapshot),
        WellnessCategory::Debt => score_debt(snapshot),
        WellnessCategory::EmergencyFund => score_emergency_fund(snapshot),
        WellnessCategory::Budget => score_budget(snapshot),
        WellnessCategory::Income => score_income(snapshot),
        WellnessCategory::Investments => score_investments(snapshot),
        WellnessCategory::Goals => score_goals(snapshot),
    };
    CategoryScore::new(category, raw)
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn score_savings(snapshot: &FinancialSnapshot) -> f64 {
    let rate = finite(snapshot.savings.rate);
    if rate >= 20.0 {
        20.0
    } else if rate >= 15.0 {
        17.0
    } else if rate >= 10.0 {
        13.0
    } else if rate >= 5.0 {
        9.0
    } else if rate > 0.0 {
        5.0
    } else {
        SAVINGS_FLOOR_SCORE
    }
}

/// Monthly payments over monthly income, income clamped to at least 1.
pub fn debt_to_income_ratio(snapshot: &FinancialSnapshot) -> f64 {
    let payments = finite(snapshot.debt.monthly_payments).max(0.0);
    let income = snapshot.monthly_income().max(1.0);
    payments / income
}

pub fn score_debt(snapshot: &FinancialSnapshot) -> f64 {
    let debt = &snapshot.debt;
    if finite(debt.total_debt) <= 0.0 && finite(debt.monthly_payments) <= 0.0 {
        return NO_DEBT_SCORE;
    }

    let ratio = debt_to_income_ratio(snapshot);
    let base = DEBT_RATIO_BANDS
        .iter()
        .find(|(bound, _)| ratio <= *bound)
        .map(|(_, score)| *score)
        .unwrap_or(DEBT_RATIO_BOTTOM_SCORE);

    if high_interest_share(snapshot) > 0.5 {
        (base - HIGH_INTEREST_PENALTY).max(1.0)
    } else {
        base
    }
}

fn high_interest_share(snapshot: &FinancialSnapshot) -> f64 {
    let mut total = 0.0;
    let mut high_interest = 0.0;
    for entry in &snapshot.debt.debt_types {
        let amount = finite(entry.amount).max(0.0);
        total += amount;
        let kind = entry.kind.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if HIGH_INTEREST_DEBT.contains(&kind.as_str()) {
            high_interest += amount;
        }
    }
    if total <= 0.0 {
        0.0
    } else {
        high_interest / total
    }
}

pub fn score_emergency_fund(snapshot: &FinancialSnapshot) -> f64 {
    let months = finite(snapshot.emergency_fund.months);
    if months >= 6.0 {
        15.0
    } else if months >= 3.0 {
        11.0
    } else if months >= 1.0 {
        7.0
    } else if months > 0.0 {
        3.0
    } else {
        0.0
    }
}

pub fn score_budget(snapshot: &FinancialSnapshot) -> f64 {
    let budgeted: Vec<_> = snapshot
        .budget
        .categories
        .iter()
        .filter(|category| finite(category.budgeted) > 0.0)
        .collect();
    if budgeted.is_empty() {
        return BUDGET_FALLBACK_SCORE;
    }

    let within = budgeted
        .iter()
        .filter(|category| finite(category.spent) <= category.budgeted)
        .count();
    let adherence_points = 10.0 * within as f64 / budgeted.len() as f64;

    let (discretionary, total) = snapshot
        .budget
        .categories
        .iter()
        .fold((0.0, 0.0), |(discretionary, total), category| {
            let spent = finite(category.spent).max(0.0);
            if category.discretionary {
                (discretionary + spent, total + spent)
            } else {
                (discretionary, total + spent)
            }
        });
    let ratio = if total > 0.0 { discretionary / total } else { 0.0 };
    let control_points = if ratio <= 0.2 {
        5.0
    } else if ratio <= 0.3 {
        4.0
    } else if ratio <= 0.4 {
        3.0
    } else if ratio <= 0.5 {
        2.0
    } else {
        1.0
    };

    adherence_points + control_points
}

pub fn score_income(snapshot: &FinancialSnapshot) -> f64 {
    let sources = snapshot
        .income
        .sources
        .iter()
        .filter(|source| finite(source.amount) > 0.0)
        .count();
    let source_points = match sources {
        0 => 1.0,
        1 => 3.0,
        2 => 4.0,
        _ => 5.0,
    };

    source_points + allocation_points(snapshot)
}

fn allocation_points(snapshot: &FinancialSnapshot) -> f64 {
    let allocation = &snapshot.income.allocation;
    let needs = finite(allocation.needs);
    let savings = finite(allocation.savings);
    let investments = finite(allocation.investments);
    if needs == 0.0 && savings == 0.0 && investments == 0.0 {
        return ALLOCATION_FALLBACK_POINTS;
    }

    let needs_target = allocation
        .needs_target
        .map(finite)
        .unwrap_or(DEFAULT_NEEDS_TARGET);
    let savings_target = allocation
        .savings_target
        .map(finite)
        .unwrap_or(DEFAULT_SAVINGS_TARGET);
    let investments_target = allocation
        .investments_target
        .map(finite)
        .unwrap_or(DEFAULT_INVESTMENTS_TARGET);

    let mut points = 0.0;
    if needs <= needs_target {
        points += 2.0;
    } else if needs <= needs_target + 10.0 {
        points += 1.0;
    }
    if savings >= savings_target {
        points += 2.0;
    } else if savings >= savings_target / 2.0 {
        points += 1.0;
    }
    if investments >= investments_target {
        points += 1.0;
    }
    points
}

/// Distinct named asset classes, or half the 0..=10 diversification rating.
pub fn asset_class_count(snapshot: &FinancialSnapshot) -> usize {
    let investments = &snapshot.investments;
    let named: HashSet<String> = investments
        .asset_classes
        .iter()
        .map(|class| class.trim().to_ascii_lowercase())
        .filter(|class| !class.is_empty())
        .collect();
    if !named.is_empty() {
        return named.len();
    }

    let rating = finite(investments.diversification).clamp(0.0, 10.0);
    (rating / 2.0).round() as usize
}

pub fn score_investments(snapshot: &FinancialSnapshot) -> f64 {
    let investments = &snapshot.investments;
    let classes = asset_class_count(snapshot).min(DIVERSITY_TABLE.len() - 1);
    let mut score = DIVERSITY_TABLE[classes];
    if finite(investments.monthly_contributions) > 0.0 {
        score += 1.0;
    }
    if finite(investments.growth_rate) >= 5.0 {
        score += 1.0;
    }
    score
}

pub fn score_goals(snapshot: &FinancialSnapshot) -> f64 {
    let goals = &snapshot.goals;
    let count = goals.len().min(3);
    let in_progress = goals
        .iter()
        .filter(|goal| finite(goal.progress) > 0.0)
        .count()
        .min(3);
    let planned = goals
        .iter()
        .filter(|goal| goal.has_plan_and_deadline())
        .count()
        .min(2);

    count as f64 + in_progress as f64 + 2.0 * planned as f64
}
