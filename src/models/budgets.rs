use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BudgetCategory {
    pub category: String,
    pub limit: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: u64,
    pub user_id: u64,
    pub month: u32,
    pub year: i32,
    pub total_income: f64,
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
    #[serde(deserialize_with = "dates::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn total_limit(&self) -> f64 {
        self.categories.iter().map(|line| line.limit).sum()
    }

    pub fn covers(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub user_id: u64,
    pub month: u32,
    pub year: i32,
    pub total_income: f64,
    pub categories: Vec<BudgetCategory>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_income: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<BudgetCategory>>,
}
