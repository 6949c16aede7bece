use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{check_month, check_non_negative, RequestHandler, Service, ServiceError};
use crate::models::budgets::{Budget, BudgetCategory, BudgetPatch, NewBudget};
use crate::repositories::{api::ApiClient, budgets::BudgetRepository};

pub enum BudgetRequest {
    ListByUser {
        user_id: u64,
        response: oneshot::Sender<Result<Vec<Budget>, ServiceError>>,
    },
    GetByMonth {
        user_id: u64,
        month: u32,
        year: i32,
        response: oneshot::Sender<Result<Option<Budget>, ServiceError>>,
    },
    Get {
        id: u64,
        response: oneshot::Sender<Result<Option<Budget>, ServiceError>>,
    },
    Create {
        budget: NewBudget,
        response: oneshot::Sender<Result<Budget, ServiceError>>,
    },
    Update {
        id: u64,
        patch: BudgetPatch,
        response: oneshot::Sender<Result<Budget, ServiceError>>,
    },
    Delete {
        id: u64,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct BudgetRequestHandler {
    repository: BudgetRepository,
}

impl BudgetRequestHandler {
    pub fn new(api: ApiClient) -> Self {
        let repository = BudgetRepository::new(api);

        BudgetRequestHandler { repository }
    }

    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Budget>, ServiceError> {
        match self.repository.get_budgets_by_user(user_id).await {
            Ok(budgets) => Ok(budgets),
            Err(e) => {
                log::error!("Could not load budgets for user {}: {}", user_id, e);
                Ok(Vec::new())
            }
        }
    }

    /// The user's budget for a month, or `None` when there is none. Only the
    /// first match counts if several exist.
    pub async fn get_by_month(
        &self,
        user_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>, ServiceError> {
        let budgets = self.list_by_user(user_id).await?;

        Ok(budgets
            .into_iter()
            .find(|budget| budget.covers(month, year)))
    }

    pub async fn get(&self, id: u64) -> Result<Option<Budget>, ServiceError> {
        self.repository
            .get_budget(id)
            .await
            .map_err(|e| ServiceError::Repository("BudgetService".to_string(), e.to_string()))
    }

    pub async fn create(&self, budget: NewBudget) -> Result<Budget, ServiceError> {
        check_month(budget.month)?;
        check_non_negative("totalIncome", budget.total_income)?;
        check_limits(&budget.categories)?;

        let budget = self
            .repository
            .insert_budget(&budget)
            .await
            .map_err(|e| ServiceError::Repository("BudgetService".to_string(), e.to_string()))?;

        log::info!(
            "Created budget {} for {}/{} (user {}).",
            budget.id,
            budget.month,
            budget.year,
            budget.user_id
        );
        Ok(budget)
    }

    pub async fn update(&self, id: u64, patch: BudgetPatch) -> Result<Budget, ServiceError> {
        if let Some(month) = patch.month {
            check_month(month)?;
        }
        if let Some(total_income) = patch.total_income {
            check_non_negative("totalIncome", total_income)?;
        }
        if let Some(categories) = &patch.categories {
            check_limits(categories)?;
        }

        self.repository
            .update_budget(id, &patch)
            .await
            .map_err(|e| ServiceError::Repository("BudgetService".to_string(), e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("Budget {}", id)))
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        match self.repository.delete_budget(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ServiceError::NotFound(format!("Budget {}", id))),
            Err(e) => Err(ServiceError::Repository(
                "BudgetService".to_string(),
                e.to_string(),
            )),
        }
    }
}

fn check_limits(categories: &[BudgetCategory]) -> Result<(), ServiceError> {
    categories
        .iter()
        .try_for_each(|line| check_non_negative(&format!("{} limit", line.category), line.limit))
}

#[async_trait]
impl RequestHandler<BudgetRequest> for BudgetRequestHandler {
    async fn handle_request(&self, request: BudgetRequest) {
        match request {
            BudgetRequest::ListByUser { user_id, response } => {
                let budgets = self.list_by_user(user_id).await;
                let _ = response.send(budgets);
            }
            BudgetRequest::GetByMonth {
                user_id,
                month,
                year,
                response,
            } => {
                let budget = self.get_by_month(user_id, month, year).await;
                let _ = response.send(budget);
            }
            BudgetRequest::Get { id, response } => {
                let budget = self.get(id).await;
                let _ = response.send(budget);
            }
            BudgetRequest::Create { budget, response } => {
                let budget = self.create(budget).await;
                let _ = response.send(budget);
            }
            BudgetRequest::Update {
                id,
                patch,
                response,
            } => {
                let budget = self.update(id, patch).await;
                let _ = response.send(budget);
            }
            BudgetRequest::Delete { id, response } => {
                let result = self.delete(id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct BudgetService;

impl BudgetService {
    pub fn new() -> Self {
        BudgetService {}
    }
}

#[async_trait]
impl Service<BudgetRequest, BudgetRequestHandler> for BudgetService {}
