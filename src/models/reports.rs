use serde::{Deserialize, Serialize};

use super::charts::{ChartPoint, MonthlyPoint};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryVariance {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    /// `limit - spent`; negative when the category is over budget.
    pub variance: f64,
    pub percent_used: f64,
    pub over_budget: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub total_saved: f64,
    pub total_target: f64,
    pub active_goals: usize,
    pub completed_goals: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceReport {
    pub month: u32,
    pub year: i32,
    pub has_budget: bool,
    pub planned_income: f64,
    pub actual_income: f64,
    pub income_variance: f64,
    pub total_budgeted: f64,
    pub total_spent: f64,
    pub spending_variance: f64,
    pub categories: Vec<CategoryVariance>,
    pub unbudgeted_spending: Vec<ChartPoint>,
    pub spending_by_category: Vec<ChartPoint>,
    pub monthly_trend: Vec<MonthlyPoint>,
    pub savings: SavingsSummary,
}
