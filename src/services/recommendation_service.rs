//! Canned recommendations keyed by category and score tier.

use crate::models::wellness::{
    CategoryScore, Recommendation, RecommendationPriority, RecommendationView, WellnessCategory,
};

pub const DEFAULT_RECOMMENDATION_THRESHOLD: f64 = 70.0;
pub const DEFAULT_DISPLAY_LIMIT: usize = 3;

const CRITICAL_CEILING: f64 = 40.0;
const MODERATE_CEILING: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationTier {
    Critical,
    Moderate,
    Optimize,
}

impl RecommendationTier {
    /// ≤ 40% critical, ≤ 70% moderate, otherwise optimize.
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage <= CRITICAL_CEILING {
            RecommendationTier::Critical
        } else if percentage <= MODERATE_CEILING {
            RecommendationTier::Moderate
        } else {
            RecommendationTier::Optimize
        }
    }

    pub fn priority(self) -> RecommendationPriority {
        match self {
            RecommendationTier::Critical => RecommendationPriority::High,
            RecommendationTier::Moderate => RecommendationPriority::Medium,
            RecommendationTier::Optimize => RecommendationPriority::Low,
        }
    }
}

struct Template {
    title: &'static str,
    description: &'static str,
    actions: &'static [&'static str],
}

fn template(category: WellnessCategory, tier: RecommendationTier) -> Template {
    use RecommendationTier::{Critical, Moderate, Optimize};
    use WellnessCategory::*;

    match (category, tier) {
        (Savings, Critical) => Template {
            title: "Start an automatic savings habit",
            description: "You are saving little or nothing each month, which leaves no room for surprises.",
            actions: &[
                "Set up an automatic transfer of at least 5% of each paycheck",
                "Open a separate high-yield savings account",
                "Review subscriptions and redirect one to savings",
            ],
        },
        (Savings, Moderate) => Template {
            title: "Raise your savings rate",
            description: "Your savings rate is below the 15-20% range that builds long-term security.",
            actions: &[
                "Increase your automatic transfer by 1-2% this month",
                "Save windfalls such as raises and refunds",
                "Track progress toward a 20% savings rate",
            ],
        },
        (Savings, Optimize) => Template {
            title: "Put your savings to work",
            description: "Your savings rate is healthy; make sure the money is earning its keep.",
            actions: &[
                "Compare savings account yields",
                "Move surplus savings into goal-specific accounts",
            ],
        },
        (Debt, Critical) => Template {
            title: "Bring debt payments under control",
            description: "Debt payments take a large share of your income.",
            actions: &[
                "List every debt with its balance and interest rate",
                "Pay down the highest-interest balance first",
                "Contact lenders about hardship or consolidation options",
            ],
        },
        (Debt, Moderate) => Template {
            title: "Lower your debt-to-income ratio",
            description: "Your debt load is manageable but limits how much you can save.",
            actions: &[
                "Add a fixed extra payment to your highest-rate debt",
                "Avoid new balances on credit cards",
                "Consider refinancing high-interest loans",
            ],
        },
        (Debt, Optimize) => Template {
            title: "Stay ahead of your debt",
            description: "Your debt ratio is in good shape.",
            actions: &[
                "Keep payments on autopay to avoid late fees",
                "Check whether early payoff beats investing at current rates",
            ],
        },
        (EmergencyFund, Critical) => Template {
            title: "Build a starter emergency fund",
            description: "You have less than one month of expenses set aside.",
            actions: &[
                "Set a first target of one month of essential expenses",
                "Keep the fund in an easily accessible account",
                "Pause extra investing until the starter fund is in place",
            ],
        },
        (EmergencyFund, Moderate) => Template {
            title: "Grow your emergency fund to three months",
            description: "Your emergency fund covers some expenses but not a typical job search.",
            actions: &[
                "Raise the target to three months of expenses",
                "Direct a fixed monthly amount to the fund",
            ],
        },
        (EmergencyFund, Optimize) => Template {
            title: "Round out your safety net",
            description: "Your emergency fund is solid; six months gives full coverage.",
            actions: &[
                "Extend the fund toward six months of expenses",
                "Re-check the target when your expenses change",
            ],
        },
        (Budget, Critical) => Template {
            title: "Get spending back inside your budget",
            description: "Most budget categories are overspent or discretionary spending dominates.",
            actions: &[
                "Pick the two most overspent categories and set hard limits",
                "Enable guardrail alerts for discretionary categories",
                "Review every transaction at the end of each week",
            ],
        },
        (Budget, Moderate) => Template {
            title: "Tighten budget adherence",
            description: "Some categories regularly run over budget.",
            actions: &[
                "Adjust budgets that are consistently unrealistic",
                "Set a guardrail at 80% for overspent categories",
            ],
        },
        (Budget, Optimize) => Template {
            title: "Fine-tune your budget",
            description: "You mostly stay on budget.",
            actions: &[
                "Move leftover category money to savings each month",
                "Review discretionary categories quarterly",
            ],
        },
        (Income, Critical) => Template {
            title: "Stabilize and allocate your income",
            description: "Your income relies on a single source and has no clear allocation.",
            actions: &[
                "Record every income source in your profile",
                "Adopt a needs/savings/investments split such as 50/20/10",
                "Explore one additional income stream",
            ],
        },
        (Income, Moderate) => Template {
            title: "Align your income allocation with your targets",
            description: "Your allocation drifts from your needs, savings and investment targets.",
            actions: &[
                "Reduce fixed needs toward your target share",
                "Route any allocation surplus to savings first",
            ],
        },
        (Income, Optimize) => Template {
            title: "Diversify your income further",
            description: "Your income allocation is on target.",
            actions: &[
                "Review your targets once a year",
                "Grow secondary income sources",
            ],
        },
        (Investments, Critical) => Template {
            title: "Begin investing consistently",
            description: "You hold few or no diversified investments.",
            actions: &[
                "Start a small monthly contribution to a broad index fund",
                "Use any employer retirement match available to you",
                "Learn the basics of asset allocation",
            ],
        },
        (Investments, Moderate) => Template {
            title: "Diversify your portfolio",
            description: "Your investments are concentrated in a few asset classes.",
            actions: &[
                "Add at least one new asset class such as bonds or international stocks",
                "Automate monthly contributions",
            ],
        },
        (Investments, Optimize) => Template {
            title: "Rebalance and keep contributing",
            description: "Your portfolio is reasonably diversified.",
            actions: &[
                "Rebalance to your target allocation once a year",
                "Increase contributions when your income rises",
            ],
        },
        (Goals, Critical) => Template {
            title: "Set concrete financial goals",
            description: "You have few goals with little progress or no plan.",
            actions: &[
                "Write down up to three financial goals",
                "Give each goal a target date",
                "Break each goal into monthly steps",
            ],
        },
        (Goals, Moderate) => Template {
            title: "Add plans and deadlines to your goals",
            description: "Your goals need target dates and step-by-step plans to stay on track.",
            actions: &[
                "Attach a target date to every goal",
                "List the next three steps for each goal",
            ],
        },
        (Goals, Optimize) => Template {
            title: "Keep your goals moving",
            description: "Your goals are well defined.",
            actions: &[
                "Review goal progress monthly",
                "Celebrate milestones and set the next goal",
            ],
        },
    }
}

/// Recommendation for one scored category, using its percentage tier.
pub fn recommendation_for(score: &CategoryScore) -> Recommendation {
    let tier = RecommendationTier::for_percentage(score.percentage);
    let template = template(score.category, tier);
    Recommendation {
        category: score.category,
        priority: tier.priority(),
        title: template.title.to_string(),
        description: template.description.to_string(),
        actions: template.actions.iter().map(|action| action.to_string()).collect(),
    }
}

/// Recommendations for categories strictly below `threshold` percent, worst first.
///
/// `scores` must be in category table order; equal percentages keep that order.
pub fn generate(scores: &[CategoryScore], threshold: f64) -> Vec<Recommendation> {
    let mut selected: Vec<&CategoryScore> = scores
        .iter()
        .filter(|score| score.percentage < threshold)
        .collect();
    selected.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
    selected.into_iter().map(recommendation_for).collect()
}

/// Splits recommendations into the first `limit` and a "show more" count.
pub fn display_view(recommendations: &[Recommendation], limit: usize) -> RecommendationView {
    let visible: Vec<Recommendation> = recommendations.iter().take(limit).cloned().collect();
    RecommendationView {
        hidden_count: recommendations.len() - visible.len(),
        visible,
    }
}
