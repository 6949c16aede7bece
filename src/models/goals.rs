use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::dates;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(deserialize_with = "dates::calendar_date")]
    pub target_date: NaiveDate,
    #[serde(deserialize_with = "dates::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Progress in percent, capped at 100. A zero target reports 0.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }

        (self.current_amount / self.target_amount * 100.0).min(100.0)
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Amount after a contribution of `delta`, kept within `0..=target`.
    pub fn contributed(&self, delta: f64) -> f64 {
        (self.current_amount + delta)
            .min(self.target_amount)
            .max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub user_id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target_amount: f64, current_amount: f64) -> Goal {
        Goal {
            id: 1,
            user_id: 1,
            title: "Emergency fund".to_string(),
            description: None,
            target_amount,
            current_amount,
            target_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(goal(1000.0, 250.0).progress_percentage(), 25.0);
        assert_eq!(goal(1000.0, 1500.0).progress_percentage(), 100.0);
        assert_eq!(goal(0.0, 50.0).progress_percentage(), 0.0);
    }

    #[test]
    fn test_completion() {
        assert!(goal(1000.0, 1000.0).is_completed());
        assert!(goal(1000.0, 1200.0).is_completed());
        assert!(!goal(1000.0, 999.99).is_completed());
        assert!(goal(0.0, 0.0).is_completed());
    }

    #[test]
    fn test_contributed_stays_within_bounds() {
        let goal = goal(1000.0, 900.0);

        assert_eq!(goal.contributed(50.0), 950.0);
        assert_eq!(goal.contributed(500.0), 1000.0);
        assert_eq!(goal.contributed(-2000.0), 0.0);
    }
}
