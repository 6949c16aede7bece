use anyhow::anyhow;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::{Collection, MockStore};
use crate::models::{
    budgets::{BudgetCategory, NewBudget},
    dates::shift_month,
    expenses::{NewExpense, RecurringFrequency},
    goals::NewGoal,
    incomes::NewIncome,
    users::NewUser,
};

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";

const DEMO_USER_ID: u64 = 1;

pub fn seed(store: &MockStore, today: NaiveDate) -> Result<(), anyhow::Error> {
    let created_at = Utc::now();
    let (year, month) = (today.year(), today.month());
    let (previous_year, previous_month) = shift_month(year, month, -1);

    let this_month = |day: u32| day_of(year, month, day);
    let last_month = |day: u32| day_of(previous_year, previous_month, day);

    insert(
        store,
        Collection::Users,
        &NewUser {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            created_at,
        },
    )?;

    let expenses = [
        (150.0, "Food", "Groceries", this_month(2)?, None),
        (60.0, "Transportation", "Transit pass", this_month(3)?, None),
        (120.0, "Utilities", "Electricity", this_month(5)?, Some(RecurringFrequency::Monthly)),
        (45.0, "Entertainment", "Cinema", this_month(8)?, None),
        (1200.0, "Housing", "Rent", last_month(1)?, Some(RecurringFrequency::Monthly)),
        (320.0, "Food", "Groceries", last_month(12)?, None),
        (89.99, "Shopping", "Running shoes", last_month(20)?, None),
    ];
    for (amount, category, description, date, frequency) in expenses {
        insert(
            store,
            Collection::Expenses,
            &NewExpense {
                user_id: DEMO_USER_ID,
                amount,
                category: category.to_string(),
                description: description.to_string(),
                date,
                is_recurring: frequency.is_some(),
                recurring_frequency: frequency,
            },
        )?;
    }

    let incomes = [
        (5000.0, "Salary", Some("Monthly salary"), this_month(1)?),
        (5000.0, "Salary", Some("Monthly salary"), last_month(1)?),
        (800.0, "Freelance", None, last_month(18)?),
    ];
    for (amount, source, description, date) in incomes {
        insert(
            store,
            Collection::Incomes,
            &NewIncome {
                user_id: DEMO_USER_ID,
                amount,
                source: source.to_string(),
                description: description.map(str::to_string),
                date,
            },
        )?;
    }

    let limits = [
        ("Food", 400.0),
        ("Transportation", 150.0),
        ("Housing", 1200.0),
        ("Utilities", 200.0),
        ("Entertainment", 100.0),
    ];
    insert(
        store,
        Collection::Budgets,
        &NewBudget {
            user_id: DEMO_USER_ID,
            month,
            year,
            total_income: 5000.0,
            categories: limits
                .iter()
                .map(|(category, limit)| BudgetCategory {
                    category: category.to_string(),
                    limit: *limit,
                })
                .collect(),
            created_at,
        },
    )?;

    let goals = [
        (
            "Emergency fund",
            Some("Six months of expenses"),
            10000.0,
            2500.0,
            today + Duration::days(365),
        ),
        ("Summer vacation", None, 3000.0, 3000.0, today + Duration::days(90)),
    ];
    for (title, description, target_amount, current_amount, target_date) in goals {
        insert(
            store,
            Collection::Goals,
            &NewGoal {
                user_id: DEMO_USER_ID,
                title: title.to_string(),
                description: description.map(str::to_string),
                target_amount,
                current_amount,
                target_date,
                created_at,
            },
        )?;
    }

    Ok(())
}

fn insert<T: Serialize>(
    store: &MockStore,
    collection: Collection,
    record: &T,
) -> Result<(), anyhow::Error> {
    store.insert(collection, serde_json::to_value(record)?);
    Ok(())
}

fn day_of(year: i32, month: u32, day: u32) -> Result<NaiveDate, anyhow::Error> {
    NaiveDate::from_ymd_opt(year, month, day.min(28))
        .ok_or_else(|| anyhow!("Invalid fixture date {}-{}-{}", year, month, day))
}
