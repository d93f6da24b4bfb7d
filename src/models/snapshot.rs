//! Financial snapshot fed to the wellness score engine.
//!
//! Every section is optional on the wire; missing sections deserialize to
//! their zero/empty defaults and the scorers fall back to fixed scores.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialSnapshot {
    pub income: IncomeData,
    #[serde(alias = "savingsData")]
    pub savings: SavingsData,
    #[serde(alias = "debtData")]
    pub debt: DebtData,
    pub emergency_fund: EmergencyFundData,
    #[serde(alias = "investmentData")]
    pub investments: InvestmentData,
    pub goals: Vec<FinancialGoal>,
    pub budget: BudgetData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeData {
    pub monthly_income: f64,
    pub sources: Vec<IncomeSource>,
    pub allocation: IncomeAllocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub frequency: IncomeFrequency,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeFrequency {
    Weekly,
    Biweekly,
    Annually,
    #[default]
    #[serde(other)]
    Monthly,
}

impl IncomeFrequency {
    /// Multiplier converting one payment into a monthly amount.
    pub fn monthly_factor(self) -> f64 {
        match self {
            IncomeFrequency::Weekly => 52.0 / 12.0,
            IncomeFrequency::Biweekly => 26.0 / 12.0,
            IncomeFrequency::Monthly => 1.0,
            IncomeFrequency::Annually => 1.0 / 12.0,
        }
    }
}

/// Percent split of income. Targets default to 50/20/10 when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeAllocation {
    pub needs: f64,
    pub savings: f64,
    pub investments: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investments_target: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavingsData {
    pub rate: f64,
    pub total_savings: f64,
    pub monthly_income: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DebtData {
    pub total_debt: f64,
    pub monthly_payments: f64,
    pub monthly_income: f64,
    pub debt_types: Vec<DebtEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyFundData {
    pub months: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestmentData {
    pub growth_rate: f64,
    /// 0..=10 scale.
    pub diversification: f64,
    pub monthly_contributions: f64,
    pub total_investments: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub asset_classes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialGoal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Percent complete.
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<String>>,
}

impl FinancialGoal {
    pub fn has_plan_and_deadline(&self) -> bool {
        let has_date = self
            .target_date
            .as_deref()
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);
        let has_plan = self
            .plan
            .as_ref()
            .map(|steps| steps.iter().any(|step| !step.trim().is_empty()))
            .unwrap_or(false);
        has_date && has_plan
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetData {
    pub categories: Vec<BudgetCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetCategory {
    pub name: String,
    pub budgeted: f64,
    pub spent: f64,
    pub discretionary: bool,
}

impl FinancialSnapshot {
    /// Monthly income as seen by the scorers: the first positive value among the
    /// debt, savings and income sections, then the summed income sources.
    pub fn monthly_income(&self) -> f64 {
        [
            self.debt.monthly_income,
            self.savings.monthly_income,
            self.income.monthly_income,
        ]
        .into_iter()
        .find(|value| value.is_finite() && *value > 0.0)
        .unwrap_or_else(|| {
            let total: f64 = self
                .income
                .sources
                .iter()
                .filter(|source| source.amount.is_finite() && source.amount > 0.0)
                .map(|source| source.amount * source.frequency.monthly_factor())
                .sum();
            total.max(0.0)
        })
    }

    /// Fixed dataset used when a user's stored snapshot cannot be loaded.
    pub fn sample() -> Self {
        Self {
            income: IncomeData {
                monthly_income: 4000.0,
                sources: vec![
                    IncomeSource {
                        name: "Salary".to_string(),
                        amount: 3600.0,
                        frequency: IncomeFrequency::Monthly,
                    },
                    IncomeSource {
                        name: "Freelance".to_string(),
                        amount: 400.0,
                        frequency: IncomeFrequency::Monthly,
                    },
                ],
                allocation: IncomeAllocation {
                    needs: 55.0,
                    savings: 15.0,
                    investments: 5.0,
                    needs_target: Some(50.0),
                    savings_target: Some(20.0),
                    investments_target: Some(10.0),
                },
            },
            savings: SavingsData {
                rate: 15.0,
                total_savings: 8000.0,
                monthly_income: 4000.0,
            },
            debt: DebtData {
                total_debt: 15000.0,
                monthly_payments: 500.0,
                monthly_income: 4000.0,
                debt_types: vec![
                    DebtEntry {
                        kind: "student_loan".to_string(),
                        amount: 10000.0,
                    },
                    DebtEntry {
                        kind: "credit_card".to_string(),
                        amount: 5000.0,
                    },
                ],
            },
            emergency_fund: EmergencyFundData { months: 2.0 },
            investments: InvestmentData {
                growth_rate: 5.0,
                diversification: 6.0,
                monthly_contributions: 200.0,
                total_investments: 12000.0,
                asset_classes: Vec::new(),
            },
            goals: vec![
                FinancialGoal {
                    name: Some("Emergency fund".to_string()),
                    progress: 66.7,
                    target_date: None,
                    plan: None,
                },
                FinancialGoal {
                    name: Some("House down payment".to_string()),
                    progress: 24.0,
                    target_date: None,
                    plan: None,
                },
            ],
            budget: BudgetData::default(),
        }
    }
}
