use crate::models::incomes::{Income, IncomePatch, NewIncome};
use crate::store::Collection;

use super::api::ApiClient;

#[derive(Clone)]
pub struct IncomeRepository {
    api: ApiClient,
}

impl IncomeRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_incomes_by_user(&self, user_id: u64) -> Result<Vec<Income>, anyhow::Error> {
        self.api
            .list(Collection::Incomes, &[("userId", user_id.to_string())])
            .await
    }

    pub async fn get_income(&self, id: u64) -> Result<Option<Income>, anyhow::Error> {
        self.api.get(Collection::Incomes, id).await
    }

    pub async fn insert_income(&self, income: &NewIncome) -> Result<Income, anyhow::Error> {
        self.api.create(Collection::Incomes, income).await
    }

    pub async fn update_income(
        &self,
        id: u64,
        patch: &IncomePatch,
    ) -> Result<Option<Income>, anyhow::Error> {
        self.api.update(Collection::Incomes, id, patch).await
    }

    pub async fn delete_income(&self, id: u64) -> Result<bool, anyhow::Error> {
        self.api.delete(Collection::Incomes, id).await
    }
}
