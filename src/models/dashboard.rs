use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::charts::{ChartPoint, MonthlyPoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    pub kind: TransactionKind,
    pub id: u64,
    /// Category for expenses, source for incomes.
    pub label: String,
    pub description: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: u64,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub remaining: f64,
    pub percentage: f64,
    pub completed: bool,
    pub target_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub budget_id: u64,
    pub total_limit: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub month: u32,
    pub year: i32,
    pub total_income: f64,
    pub total_expenses: f64,
    pub savings: f64,
    pub savings_rate: f64,
    pub expenses_by_category: Vec<ChartPoint>,
    pub monthly_trend: Vec<MonthlyPoint>,
    pub recent_transactions: Vec<RecentTransaction>,
    pub goals: Vec<GoalProgress>,
    pub budget: Option<BudgetStatus>,
}
