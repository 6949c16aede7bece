//! Pure aggregation behind the dashboard and the variance report.
//!
//! Nothing here touches the store: callers fetch a user's records first and
//! hand them over as a [`UserData`].

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{
    budgets::Budget,
    charts::{ChartPoint, MonthlyPoint},
    dashboard::{BudgetStatus, Dashboard, GoalProgress, RecentTransaction, TransactionKind},
    dates::{in_month, month_label, shift_month},
    expenses::Expense,
    goals::Goal,
    incomes::Income,
    reports::{CategoryVariance, SavingsSummary, VarianceReport},
};

pub const MAX_TREND_MONTHS: u32 = 120;

#[derive(Clone, Debug, Default)]
pub struct UserData {
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
}

#[derive(Clone, Copy, Debug)]
pub struct DashboardOptions {
    pub trend_months: u32,
    pub recent_transactions: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            trend_months: 6,
            recent_transactions: 5,
        }
    }
}

pub fn expenses_in_month(expenses: &[Expense], year: i32, month: u32) -> Vec<&Expense> {
    expenses
        .iter()
        .filter(|expense| in_month(expense.date, year, month))
        .collect()
}

pub fn incomes_in_month(incomes: &[Income], year: i32, month: u32) -> Vec<&Income> {
    incomes
        .iter()
        .filter(|income| in_month(income.date, year, month))
        .collect()
}

pub fn total_expenses(expenses: &[Expense], year: i32, month: u32) -> f64 {
    expenses_in_month(expenses, year, month)
        .iter()
        .map(|expense| expense.amount)
        .sum()
}

pub fn total_income(incomes: &[Income], year: i32, month: u32) -> f64 {
    incomes_in_month(incomes, year, month)
        .iter()
        .map(|income| income.amount)
        .sum()
}

/// Savings as a share of income, in percent. Zero income yields 0.
pub fn savings_rate(income: f64, expenses: f64) -> f64 {
    if income <= 0.0 {
        return 0.0;
    }

    (income - expenses) * 100.0 / income
}

/// Spending per category, largest first. Ties keep first-seen order.
pub fn category_totals(expenses: &[&Expense]) -> Vec<ChartPoint> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for expense in expenses {
        let category = expense.category.as_str();
        if !totals.contains_key(category) {
            order.push(category);
        }
        *totals.entry(category).or_insert(0.0) += expense.amount;
    }

    let mut series: Vec<ChartPoint> = order
        .into_iter()
        .map(|category| ChartPoint::new(category, totals[category]))
        .collect();
    series.sort_by(|a, b| b.value.total_cmp(&a.value));

    series
}

/// Charts never render empty: an empty series becomes a single placeholder.
pub fn with_placeholder(series: Vec<ChartPoint>) -> Vec<ChartPoint> {
    if series.is_empty() {
        vec![ChartPoint::no_data()]
    } else {
        series
    }
}

/// Income and expenses per month for the `months` months ending with
/// `(end_year, end_month)`, oldest first. The window always holds at least
/// the end month and at most [`MAX_TREND_MONTHS`].
pub fn monthly_trend(
    expenses: &[Expense],
    incomes: &[Income],
    end_year: i32,
    end_month: u32,
    months: u32,
) -> Vec<MonthlyPoint> {
    let months = months.clamp(1, MAX_TREND_MONTHS) as i32;

    (0..months)
        .rev()
        .map(|offset| {
            let (year, month) = shift_month(end_year, end_month, -offset);
            let income = total_income(incomes, year, month);
            let spent = total_expenses(expenses, year, month);

            MonthlyPoint {
                year,
                month,
                label: month_label(year, month),
                income,
                expenses: spent,
                savings: income - spent,
            }
        })
        .collect()
}

/// Latest expenses and incomes together, newest first.
pub fn recent_transactions(
    expenses: &[Expense],
    incomes: &[Income],
    count: usize,
) -> Vec<RecentTransaction> {
    let mut transactions: Vec<RecentTransaction> = expenses
        .iter()
        .map(|expense| RecentTransaction {
            kind: TransactionKind::Expense,
            id: expense.id,
            label: expense.category.clone(),
            description: Some(expense.description.clone()).filter(|d| !d.is_empty()),
            amount: expense.amount,
            date: expense.date,
        })
        .chain(incomes.iter().map(|income| RecentTransaction {
            kind: TransactionKind::Income,
            id: income.id,
            label: income.source.clone(),
            description: income.description.clone(),
            amount: income.amount,
            date: income.date,
        }))
        .collect();

    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    transactions.truncate(count);

    transactions
}

pub fn goal_progress(goals: &[Goal]) -> Vec<GoalProgress> {
    goals
        .iter()
        .map(|goal| GoalProgress {
            goal_id: goal.id,
            title: goal.title.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            remaining: goal.remaining(),
            percentage: goal.progress_percentage(),
            completed: goal.is_completed(),
            target_date: goal.target_date,
        })
        .collect()
}

pub fn savings_summary(goals: &[Goal]) -> SavingsSummary {
    let completed_goals = goals.iter().filter(|goal| goal.is_completed()).count();

    SavingsSummary {
        total_saved: goals.iter().map(|goal| goal.current_amount).sum(),
        total_target: goals.iter().map(|goal| goal.target_amount).sum(),
        active_goals: goals.len() - completed_goals,
        completed_goals,
    }
}

pub fn budget_for(budgets: &[Budget], year: i32, month: u32) -> Option<&Budget> {
    budgets.iter().find(|budget| budget.covers(month, year))
}

fn percent_used(spent: f64, limit: f64) -> f64 {
    if limit > 0.0 {
        spent * 100.0 / limit
    } else if spent > 0.0 {
        100.0
    } else {
        0.0
    }
}

fn same_category(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Budgeted vs actual spending per budget line.
pub fn budget_variance(budget: &Budget, expenses: &[&Expense]) -> Vec<CategoryVariance> {
    budget
        .categories
        .iter()
        .map(|line| {
            let spent: f64 = expenses
                .iter()
                .filter(|expense| same_category(&expense.category, &line.category))
                .map(|expense| expense.amount)
                .sum();

            CategoryVariance {
                category: line.category.clone(),
                limit: line.limit,
                spent,
                variance: line.limit - spent,
                percent_used: percent_used(spent, line.limit),
                over_budget: spent > line.limit,
            }
        })
        .collect()
}

/// Spending in categories the budget has no line for.
pub fn unbudgeted_spending(budget: Option<&Budget>, expenses: &[&Expense]) -> Vec<ChartPoint> {
    let uncovered: Vec<&Expense> = expenses
        .iter()
        .copied()
        .filter(|expense| match budget {
            Some(budget) => !budget
                .categories
                .iter()
                .any(|line| same_category(&line.category, &expense.category)),
            None => true,
        })
        .collect();

    category_totals(&uncovered)
}

pub fn budget_status(budget: &Budget, expenses: &[&Expense]) -> BudgetStatus {
    let total_limit = budget.total_limit();
    let total_spent: f64 = expenses.iter().map(|expense| expense.amount).sum();

    BudgetStatus {
        budget_id: budget.id,
        total_limit,
        total_spent,
        remaining: total_limit - total_spent,
        percent_used: percent_used(total_spent, total_limit),
    }
}

pub fn build_dashboard(data: &UserData, today: NaiveDate, options: DashboardOptions) -> Dashboard {
    let (year, month) = (today.year(), today.month());
    let month_expenses = expenses_in_month(&data.expenses, year, month);

    let total_income = total_income(&data.incomes, year, month);
    let total_expenses = total_expenses(&data.expenses, year, month);

    Dashboard {
        month,
        year,
        total_income,
        total_expenses,
        savings: total_income - total_expenses,
        savings_rate: savings_rate(total_income, total_expenses),
        expenses_by_category: with_placeholder(category_totals(&month_expenses)),
        monthly_trend: monthly_trend(
            &data.expenses,
            &data.incomes,
            year,
            month,
            options.trend_months,
        ),
        recent_transactions: recent_transactions(
            &data.expenses,
            &data.incomes,
            options.recent_transactions,
        ),
        goals: goal_progress(&data.goals),
        budget: budget_for(&data.budgets, year, month)
            .map(|budget| budget_status(budget, &month_expenses)),
    }
}

pub fn build_variance_report(
    data: &UserData,
    year: i32,
    month: u32,
    trend_months: u32,
) -> VarianceReport {
    let month_expenses = expenses_in_month(&data.expenses, year, month);
    let budget = budget_for(&data.budgets, year, month);

    let actual_income = total_income(&data.incomes, year, month);
    let total_spent = total_expenses(&data.expenses, year, month);
    let planned_income = budget.map(|budget| budget.total_income).unwrap_or(0.0);
    let total_budgeted = budget.map(Budget::total_limit).unwrap_or(0.0);

    VarianceReport {
        month,
        year,
        has_budget: budget.is_some(),
        planned_income,
        actual_income,
        income_variance: actual_income - planned_income,
        total_budgeted,
        total_spent,
        spending_variance: total_budgeted - total_spent,
        categories: budget
            .map(|budget| budget_variance(budget, &month_expenses))
            .unwrap_or_default(),
        unbudgeted_spending: with_placeholder(unbudgeted_spending(budget, &month_expenses)),
        spending_by_category: with_placeholder(category_totals(&month_expenses)),
        monthly_trend: monthly_trend(&data.expenses, &data.incomes, year, month, trend_months),
        savings: savings_summary(&data.goals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::budgets::BudgetCategory;
    use chrono::Utc;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn expense(id: u64, amount: f64, category: &str, date: NaiveDate) -> Expense {
        Expense {
            id,
            user_id: 1,
            amount,
            category: category.to_string(),
            description: String::new(),
            date,
            is_recurring: false,
            recurring_frequency: None,
        }
    }

    fn income(id: u64, amount: f64, date: NaiveDate) -> Income {
        Income {
            id,
            user_id: 1,
            amount,
            source: "Salary".to_string(),
            description: None,
            date,
        }
    }

    fn budget(year: i32, month: u32, lines: &[(&str, f64)]) -> Budget {
        Budget {
            id: 1,
            user_id: 1,
            month,
            year,
            total_income: 5000.0,
            categories: lines
                .iter()
                .map(|(category, limit)| BudgetCategory {
                    category: category.to_string(),
                    limit: *limit,
                })
                .collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_dashboard_totals_for_current_month() {
        let today = date(2024, 3, 20);
        let data = UserData {
            expenses: vec![
                expense(1, 150.0, "Food", date(2024, 3, 2)),
                expense(2, 200.0, "Food", date(2024, 3, 10)),
                expense(3, 999.0, "Food", date(2024, 2, 28)),
            ],
            incomes: vec![income(1, 5000.0, date(2024, 3, 1))],
            ..Default::default()
        };

        let dashboard = build_dashboard(&data, today, DashboardOptions::default());

        assert_eq!(dashboard.total_expenses, 350.0);
        assert_eq!(dashboard.total_income, 5000.0);
        assert_eq!(dashboard.savings, 4650.0);
        assert_eq!(dashboard.savings_rate, 93.0);
        assert_eq!(dashboard.expenses_by_category, vec![ChartPoint::new("Food", 350.0)]);
        assert!(dashboard.budget.is_none());
    }

    #[test]
    fn test_savings_may_be_negative() {
        let today = date(2024, 3, 20);
        let data = UserData {
            expenses: vec![expense(1, 700.0, "Housing", date(2024, 3, 2))],
            incomes: vec![income(1, 500.0, date(2024, 3, 1))],
            ..Default::default()
        };

        let dashboard = build_dashboard(&data, today, DashboardOptions::default());

        assert_eq!(dashboard.savings, -200.0);
        assert!(dashboard.savings_rate < 0.0);
    }

    #[test]
    fn test_empty_charts_get_placeholder() {
        let dashboard = build_dashboard(
            &UserData::default(),
            date(2024, 3, 20),
            DashboardOptions::default(),
        );

        assert_eq!(dashboard.expenses_by_category, vec![ChartPoint::no_data()]);
        assert!(dashboard.expenses_by_category[0].is_placeholder());
        assert_eq!(dashboard.savings_rate, 0.0);
        assert!(dashboard.recent_transactions.is_empty());
    }

    #[test]
    fn test_category_totals_sorted_by_amount() {
        let expenses = vec![
            expense(1, 20.0, "Food", date(2024, 3, 1)),
            expense(2, 90.0, "Housing", date(2024, 3, 1)),
            expense(3, 30.0, "Food", date(2024, 3, 1)),
        ];
        let refs: Vec<&Expense> = expenses.iter().collect();

        assert_eq!(
            category_totals(&refs),
            vec![
                ChartPoint::new("Housing", 90.0),
                ChartPoint::new("Food", 50.0)
            ]
        );
    }

    #[test]
    fn test_monthly_trend_covers_trailing_window() {
        let expenses = vec![
            expense(1, 100.0, "Food", date(2023, 12, 5)),
            expense(2, 40.0, "Food", date(2024, 2, 5)),
            expense(3, 75.0, "Food", date(2023, 9, 5)),
        ];
        let incomes = vec![income(1, 1000.0, date(2024, 1, 1))];

        let trend = monthly_trend(&expenses, &incomes, 2024, 2, 3);

        let months: Vec<(i32, u32)> = trend.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(months, vec![(2023, 12), (2024, 1), (2024, 2)]);
        assert_eq!(trend[0].expenses, 100.0);
        assert_eq!(trend[1].income, 1000.0);
        assert_eq!(trend[1].savings, 1000.0);
        assert_eq!(trend[2].expenses, 40.0);
        assert_eq!(trend[0].label, "Dec 2023");
    }

    #[test]
    fn test_monthly_trend_window_is_clamped() {
        let single = monthly_trend(&[], &[], 2024, 2, 0);
        assert_eq!(single.len(), 1);
        assert_eq!((single[0].year, single[0].month), (2024, 2));

        let capped = monthly_trend(&[], &[], 2024, 2, u32::MAX);
        assert_eq!(capped.len(), MAX_TREND_MONTHS as usize);
        assert_eq!(capped.last().map(|p| (p.year, p.month)), Some((2024, 2)));
    }

    #[test]
    fn test_recent_transactions_newest_first() {
        let expenses = vec![
            expense(1, 10.0, "Food", date(2024, 3, 1)),
            expense(2, 20.0, "Food", date(2024, 3, 9)),
        ];
        let incomes = vec![income(1, 1000.0, date(2024, 3, 5))];

        let recent = recent_transactions(&expenses, &incomes, 2);

        assert_eq!(recent.len(), 2);
        assert_eq!((recent[0].kind, recent[0].id), (TransactionKind::Expense, 2));
        assert_eq!((recent[1].kind, recent[1].id), (TransactionKind::Income, 1));
    }

    #[test]
    fn test_variance_report_compares_budget_with_spending() {
        let data = UserData {
            expenses: vec![
                expense(1, 450.0, "Food", date(2024, 1, 3)),
                expense(2, 80.0, "transportation", date(2024, 1, 4)),
                expense(3, 60.0, "Shopping", date(2024, 1, 5)),
                expense(4, 500.0, "Food", date(2023, 12, 5)),
            ],
            incomes: vec![income(1, 4800.0, date(2024, 1, 1))],
            budgets: vec![budget(2024, 1, &[("Food", 400.0), ("Transportation", 150.0)])],
            goals: Vec::new(),
        };

        let report = build_variance_report(&data, 2024, 1, 6);

        assert!(report.has_budget);
        assert_eq!(report.planned_income, 5000.0);
        assert_eq!(report.actual_income, 4800.0);
        assert_eq!(report.income_variance, -200.0);
        assert_eq!(report.total_budgeted, 550.0);
        assert_eq!(report.total_spent, 590.0);
        assert_eq!(report.spending_variance, -40.0);

        let food = &report.categories[0];
        assert_eq!(food.spent, 450.0);
        assert_eq!(food.variance, -50.0);
        assert!(food.over_budget);
        assert_eq!(food.percent_used, 112.5);

        let transport = &report.categories[1];
        assert_eq!(transport.spent, 80.0);
        assert!(!transport.over_budget);

        assert_eq!(report.unbudgeted_spending, vec![ChartPoint::new("Shopping", 60.0)]);
        assert_eq!(report.monthly_trend.len(), 6);
    }

    #[test]
    fn test_variance_report_without_budget() {
        let data = UserData {
            expenses: vec![expense(1, 45.0, "Food", date(2024, 1, 3))],
            ..Default::default()
        };

        let report = build_variance_report(&data, 2024, 1, 3);

        assert!(!report.has_budget);
        assert!(report.categories.is_empty());
        assert_eq!(report.total_budgeted, 0.0);
        assert_eq!(report.unbudgeted_spending, vec![ChartPoint::new("Food", 45.0)]);
    }

    #[test]
    fn test_savings_summary_counts_completed_goals() {
        let goal = |id: u64, target: f64, current: f64| Goal {
            id,
            user_id: 1,
            title: format!("Goal {}", id),
            description: None,
            target_amount: target,
            current_amount: current,
            target_date: date(2025, 1, 1),
            created_at: Utc::now(),
        };

        let summary = savings_summary(&[goal(1, 1000.0, 1000.0), goal(2, 500.0, 100.0)]);

        assert_eq!(summary.completed_goals, 1);
        assert_eq!(summary.active_goals, 1);
        assert_eq!(summary.total_saved, 1100.0);
        assert_eq!(summary.total_target, 1500.0);
    }
}
