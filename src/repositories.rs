pub mod api;
pub mod budgets;
pub mod expenses;
pub mod goals;
pub mod incomes;
pub mod users;
