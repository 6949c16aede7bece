use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates;

pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "Food",
    "Transportation",
    "Housing",
    "Utilities",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Education",
    "Personal Care",
    "Other",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: u64,
    pub user_id: u64,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "dates::calendar_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<RecurringFrequency>,
}

impl Expense {
    /// The frequency only counts for recurring expenses.
    pub fn frequency(&self) -> Option<RecurringFrequency> {
        if self.is_recurring {
            self.recurring_frequency
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub user_id: u64,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<RecurringFrequency>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<RecurringFrequency>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expense_deserializes_timestamp_dates() {
        let expense: Expense = serde_json::from_value(json!({
            "id": 3,
            "userId": 1,
            "amount": 42.5,
            "category": "Food",
            "description": "Lunch",
            "date": "2024-05-02T00:00:00.000Z",
            "isRecurring": true,
            "recurringFrequency": "weekly"
        }))
        .unwrap();

        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(expense.frequency(), Some(RecurringFrequency::Weekly));
    }

    #[test]
    fn test_frequency_ignored_when_not_recurring() {
        let expense: Expense = serde_json::from_value(json!({
            "id": 4,
            "userId": 1,
            "amount": 10.0,
            "category": "Other",
            "description": "",
            "date": "2024-05-02",
            "isRecurring": false,
            "recurringFrequency": "monthly"
        }))
        .unwrap();

        assert_eq!(expense.frequency(), None);
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ExpensePatch {
            amount: Some(99.0),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "amount": 99.0 }));
    }
}
