use crate::models::expenses::{Expense, ExpensePatch, NewExpense};
use crate::store::Collection;

use super::api::ApiClient;

#[derive(Clone)]
pub struct ExpenseRepository {
    api: ApiClient,
}

impl ExpenseRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_expenses_by_user(&self, user_id: u64) -> Result<Vec<Expense>, anyhow::Error> {
        self.api
            .list(Collection::Expenses, &[("userId", user_id.to_string())])
            .await
    }

    /// Filtering by category happens on the backend via the `category`
    /// query parameter.
    pub async fn get_expenses_by_category(
        &self,
        user_id: u64,
        category: &str,
    ) -> Result<Vec<Expense>, anyhow::Error> {
        self.api
            .list(
                Collection::Expenses,
                &[
                    ("userId", user_id.to_string()),
                    ("category", category.to_string()),
                ],
            )
            .await
    }

    pub async fn get_expense(&self, id: u64) -> Result<Option<Expense>, anyhow::Error> {
        self.api.get(Collection::Expenses, id).await
    }

    pub async fn insert_expense(&self, expense: &NewExpense) -> Result<Expense, anyhow::Error> {
        self.api.create(Collection::Expenses, expense).await
    }

    pub async fn update_expense(
        &self,
        id: u64,
        patch: &ExpensePatch,
    ) -> Result<Option<Expense>, anyhow::Error> {
        self.api.update(Collection::Expenses, id, patch).await
    }

    pub async fn delete_expense(&self, id: u64) -> Result<bool, anyhow::Error> {
        self.api.delete(Collection::Expenses, id).await
    }
}
