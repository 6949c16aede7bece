use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::oneshot;

use super::{check_positive, RequestHandler, Service, ServiceError};
use crate::models::expenses::{Expense, ExpensePatch, NewExpense};
use crate::repositories::{api::ApiClient, expenses::ExpenseRepository};

pub enum ExpenseRequest {
    ListByUser {
        user_id: u64,
        response: oneshot::Sender<Result<Vec<Expense>, ServiceError>>,
    },
    ListByCategory {
        user_id: u64,
        category: String,
        response: oneshot::Sender<Result<Vec<Expense>, ServiceError>>,
    },
    ListInRange {
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        response: oneshot::Sender<Result<Vec<Expense>, ServiceError>>,
    },
    Get {
        id: u64,
        response: oneshot::Sender<Result<Option<Expense>, ServiceError>>,
    },
    Create {
        expense: NewExpense,
        response: oneshot::Sender<Result<Expense, ServiceError>>,
    },
    Update {
        id: u64,
        patch: ExpensePatch,
        response: oneshot::Sender<Result<Expense, ServiceError>>,
    },
    Delete {
        id: u64,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct ExpenseRequestHandler {
    repository: ExpenseRepository,
}

impl ExpenseRequestHandler {
    pub fn new(api: ApiClient) -> Self {
        let repository = ExpenseRepository::new(api);

        ExpenseRequestHandler { repository }
    }

    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Expense>, ServiceError> {
        match self.repository.get_expenses_by_user(user_id).await {
            Ok(expenses) => Ok(expenses),
            Err(e) => {
                log::error!("Could not load expenses for user {}: {}", user_id, e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn list_by_category(
        &self,
        user_id: u64,
        category: &str,
    ) -> Result<Vec<Expense>, ServiceError> {
        match self
            .repository
            .get_expenses_by_category(user_id, category)
            .await
        {
            Ok(expenses) => Ok(expenses),
            Err(e) => {
                log::error!(
                    "Could not load {} expenses for user {}: {}",
                    category,
                    user_id,
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Expenses dated within `start..=end`.
    pub async fn list_in_range(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>, ServiceError> {
        let expenses = self.list_by_user(user_id).await?;

        Ok(expenses
            .into_iter()
            .filter(|expense| expense.date >= start && expense.date <= end)
            .collect())
    }

    pub async fn get(&self, id: u64) -> Result<Option<Expense>, ServiceError> {
        self.repository
            .get_expense(id)
            .await
            .map_err(|e| ServiceError::Repository("ExpenseService".to_string(), e.to_string()))
    }

    pub async fn create(&self, expense: NewExpense) -> Result<Expense, ServiceError> {
        check_positive("amount", expense.amount)?;

        let expense = self
            .repository
            .insert_expense(&expense)
            .await
            .map_err(|e| ServiceError::Repository("ExpenseService".to_string(), e.to_string()))?;

        log::info!("Created expense {} for user {}.", expense.id, expense.user_id);
        Ok(expense)
    }

    pub async fn update(&self, id: u64, patch: ExpensePatch) -> Result<Expense, ServiceError> {
        if let Some(amount) = patch.amount {
            check_positive("amount", amount)?;
        }

        self.repository
            .update_expense(id, &patch)
            .await
            .map_err(|e| ServiceError::Repository("ExpenseService".to_string(), e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {}", id)))
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let deleted = self
            .repository
            .delete_expense(id)
            .await
            .map_err(|e| ServiceError::Repository("ExpenseService".to_string(), e.to_string()))?;

        if !deleted {
            return Err(ServiceError::NotFound(format!("Expense {}", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl RequestHandler<ExpenseRequest> for ExpenseRequestHandler {
    async fn handle_request(&self, request: ExpenseRequest) {
        match request {
            ExpenseRequest::ListByUser { user_id, response } => {
                let expenses = self.list_by_user(user_id).await;
                let _ = response.send(expenses);
            }
            ExpenseRequest::ListByCategory {
                user_id,
                category,
                response,
            } => {
                let expenses = self.list_by_category(user_id, &category).await;
                let _ = response.send(expenses);
            }
            ExpenseRequest::ListInRange {
                user_id,
                start,
                end,
                response,
            } => {
                let expenses = self.list_in_range(user_id, start, end).await;
                let _ = response.send(expenses);
            }
            ExpenseRequest::Get { id, response } => {
                let expense = self.get(id).await;
                let _ = response.send(expense);
            }
            ExpenseRequest::Create { expense, response } => {
                let expense = self.create(expense).await;
                let _ = response.send(expense);
            }
            ExpenseRequest::Update {
                id,
                patch,
                response,
            } => {
                let expense = self.update(id, patch).await;
                let _ = response.send(expense);
            }
            ExpenseRequest::Delete { id, response } => {
                let result = self.delete(id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct ExpenseService;

impl ExpenseService {
    pub fn new() -> Self {
        ExpenseService {}
    }
}

#[async_trait]
impl Service<ExpenseRequest, ExpenseRequestHandler> for ExpenseService {}
