use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{check_positive, RequestHandler, Service, ServiceError};
use crate::models::{
    dates::in_month,
    incomes::{Income, IncomePatch, NewIncome},
};
use crate::repositories::{api::ApiClient, incomes::IncomeRepository};

pub enum IncomeRequest {
    ListByUser {
        user_id: u64,
        response: oneshot::Sender<Result<Vec<Income>, ServiceError>>,
    },
    ListByMonth {
        user_id: u64,
        month: u32,
        year: i32,
        response: oneshot::Sender<Result<Vec<Income>, ServiceError>>,
    },
    Get {
        id: u64,
        response: oneshot::Sender<Result<Option<Income>, ServiceError>>,
    },
    Create {
        income: NewIncome,
        response: oneshot::Sender<Result<Income, ServiceError>>,
    },
    Update {
        id: u64,
        patch: IncomePatch,
        response: oneshot::Sender<Result<Income, ServiceError>>,
    },
    Delete {
        id: u64,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct IncomeRequestHandler {
    repository: IncomeRepository,
}

impl IncomeRequestHandler {
    pub fn new(api: ApiClient) -> Self {
        let repository = IncomeRepository::new(api);

        IncomeRequestHandler { repository }
    }

    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Income>, ServiceError> {
        match self.repository.get_incomes_by_user(user_id).await {
            Ok(incomes) => Ok(incomes),
            Err(e) => {
                log::error!("Could not load incomes for user {}: {}", user_id, e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn list_by_month(
        &self,
        user_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Vec<Income>, ServiceError> {
        let incomes = self.list_by_user(user_id).await?;

        Ok(incomes
            .into_iter()
            .filter(|income| in_month(income.date, year, month))
            .collect())
    }

    pub async fn get(&self, id: u64) -> Result<Option<Income>, ServiceError> {
        self.repository
            .get_income(id)
            .await
            .map_err(|e| ServiceError::Repository("IncomeService".to_string(), e.to_string()))
    }

    pub async fn create(&self, income: NewIncome) -> Result<Income, ServiceError> {
        check_positive("amount", income.amount)?;

        let income = self
            .repository
            .insert_income(&income)
            .await
            .map_err(|e| ServiceError::Repository("IncomeService".to_string(), e.to_string()))?;

        log::info!("Recorded income {} for user {}.", income.id, income.user_id);
        Ok(income)
    }

    pub async fn update(&self, id: u64, patch: IncomePatch) -> Result<Income, ServiceError> {
        if let Some(amount) = patch.amount {
            check_positive("amount", amount)?;
        }

        self.repository
            .update_income(id, &patch)
            .await
            .map_err(|e| ServiceError::Repository("IncomeService".to_string(), e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("Income {}", id)))
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let deleted = self
            .repository
            .delete_income(id)
            .await
            .map_err(|e| ServiceError::Repository("IncomeService".to_string(), e.to_string()))?;

        if deleted {
            Ok(())
        } else {
            Err(ServiceError::NotFound(format!("Income {}", id)))
        }
    }
}

#[async_trait]
impl RequestHandler<IncomeRequest> for IncomeRequestHandler {
    async fn handle_request(&self, request: IncomeRequest) {
        match request {
            IncomeRequest::ListByUser { user_id, response } => {
                let incomes = self.list_by_user(user_id).await;
                let _ = response.send(incomes);
            }
            IncomeRequest::ListByMonth {
                user_id,
                month,
                year,
                response,
            } => {
                let incomes = self.list_by_month(user_id, month, year).await;
                let _ = response.send(incomes);
            }
            IncomeRequest::Get { id, response } => {
                let income = self.get(id).await;
                let _ = response.send(income);
            }
            IncomeRequest::Create { income, response } => {
                let income = self.create(income).await;
                let _ = response.send(income);
            }
            IncomeRequest::Update {
                id,
                patch,
                response,
            } => {
                let income = self.update(id, patch).await;
                let _ = response.send(income);
            }
            IncomeRequest::Delete { id, response } => {
                let result = self.delete(id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct IncomeService;

impl IncomeService {
    pub fn new() -> Self {
        IncomeService {}
    }
}

#[async_trait]
impl Service<IncomeRequest, IncomeRequestHandler> for IncomeService {}
