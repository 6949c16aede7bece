use crate::models::budgets::{Budget, BudgetPatch, NewBudget};
use crate::store::Collection;

use super::api::ApiClient;

#[derive(Clone)]
pub struct BudgetRepository {
    api: ApiClient,
}

impl BudgetRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_budgets_by_user(&self, user_id: u64) -> Result<Vec<Budget>, anyhow::Error> {
        self.api
            .list(Collection::Budgets, &[("userId", user_id.to_string())])
            .await
    }

    pub async fn get_budget(&self, id: u64) -> Result<Option<Budget>, anyhow::Error> {
        self.api.get(Collection::Budgets, id).await
    }

    pub async fn insert_budget(&self, budget: &NewBudget) -> Result<Budget, anyhow::Error> {
        self.api.create(Collection::Budgets, budget).await
    }

    pub async fn update_budget(
        &self,
        id: u64,
        patch: &BudgetPatch,
    ) -> Result<Option<Budget>, anyhow::Error> {
        self.api.update(Collection::Budgets, id, patch).await
    }

    pub async fn delete_budget(&self, id: u64) -> Result<bool, anyhow::Error> {
        self.api.delete(Collection::Budgets, id).await
    }
}
