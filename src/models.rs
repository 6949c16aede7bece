pub mod budgets;
pub mod charts;
pub mod dashboard;
pub mod dates;
pub mod expenses;
pub mod goals;
pub mod incomes;
pub mod reports;
pub mod users;
