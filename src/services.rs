use async_trait::async_trait;
use futures_util::future::try_join4;
use tokio::sync::{mpsc, oneshot};

use crate::analytics::{DashboardOptions, UserData};
use crate::repositories::api::ApiClient;
use crate::server::MockBackend;
use crate::session::SessionState;
use crate::settings::Settings;

pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod expenses;
pub mod goals;
pub mod incomes;
pub mod reports;

use auth::AuthRequest;
use budgets::BudgetRequest;
use dashboard::DashboardRequest;
use expenses::ExpenseRequest;
use goals::GoalRequest;
use incomes::IncomeRequest;
use reports::ReportRequest;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("An account with the email {0} already exists.")]
    DuplicateEmail(String),
    #[error("Repository error: {0} - {1}")]
    Repository(String, String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
}

/// Rejects amounts that are not finite or not above zero.
pub(crate) fn check_positive(field: &str, value: f64) -> Result<(), ServiceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(format!(
            "{} must be a positive amount, got {}",
            field, value
        )))
    }
}

pub(crate) fn check_non_negative(field: &str, value: f64) -> Result<(), ServiceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(format!(
            "{} must be zero or more, got {}",
            field, value
        )))
    }
}

pub(crate) fn check_month(month: u32) -> Result<(), ServiceError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(format!("Invalid month {}", month)))
    }
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

/// Sends a request built around a fresh reply channel and waits for the
/// answer. A closed channel on either side is a communication error.
pub async fn request<R, T>(
    channel: &mpsc::Sender<R>,
    service: &str,
    build: impl FnOnce(oneshot::Sender<Result<T, ServiceError>>) -> R,
) -> Result<T, ServiceError> {
    let (response_tx, response_rx) = oneshot::channel();

    channel
        .send(build(response_tx))
        .await
        .map_err(|e| ServiceError::Communication(service.to_string(), e.to_string()))?;

    response_rx
        .await
        .map_err(|e| ServiceError::Communication(service.to_string(), e.to_string()))?
}

/// Senders for the four per-entity query services.
#[derive(Clone)]
pub struct QueryChannels {
    pub expenses: mpsc::Sender<ExpenseRequest>,
    pub incomes: mpsc::Sender<IncomeRequest>,
    pub budgets: mpsc::Sender<BudgetRequest>,
    pub goals: mpsc::Sender<GoalRequest>,
}

impl QueryChannels {
    /// Queries all four services concurrently. Fails as a whole if any of
    /// them fails.
    pub async fn fetch_user_data(&self, user_id: u64) -> Result<UserData, ServiceError> {
        let (expenses, incomes, budgets, goals) = try_join4(
            request(&self.expenses, "ExpenseService", |response| {
                ExpenseRequest::ListByUser { user_id, response }
            }),
            request(&self.incomes, "IncomeService", |response| {
                IncomeRequest::ListByUser { user_id, response }
            }),
            request(&self.budgets, "BudgetService", |response| {
                BudgetRequest::ListByUser { user_id, response }
            }),
            request(&self.goals, "GoalService", |response| GoalRequest::ListByUser {
                user_id,
                response,
            }),
        )
        .await?;

        Ok(UserData {
            expenses,
            incomes,
            budgets,
            goals,
        })
    }
}

#[derive(Clone)]
pub struct ServiceChannels {
    pub auth: mpsc::Sender<AuthRequest>,
    pub queries: QueryChannels,
    pub dashboard: mpsc::Sender<DashboardRequest>,
    pub reports: mpsc::Sender<ReportRequest>,
}

pub async fn start_services(
    settings: &Settings,
    backend: MockBackend,
    session: SessionState,
) -> Result<ServiceChannels, anyhow::Error> {
    let capacity = settings.services.channel_capacity.max(1);
    let api = ApiClient::new(backend);

    let (auth_tx, mut auth_rx) = mpsc::channel(capacity);
    let (expense_tx, mut expense_rx) = mpsc::channel(capacity);
    let (income_tx, mut income_rx) = mpsc::channel(capacity);
    let (budget_tx, mut budget_rx) = mpsc::channel(capacity);
    let (goal_tx, mut goal_rx) = mpsc::channel(capacity);
    let (dashboard_tx, mut dashboard_rx) = mpsc::channel(capacity);
    let (report_tx, mut report_rx) = mpsc::channel(capacity);

    let mut auth_service = auth::AuthService::new();
    let mut expense_service = expenses::ExpenseService::new();
    let mut income_service = incomes::IncomeService::new();
    let mut budget_service = budgets::BudgetService::new();
    let mut goal_service = goals::GoalService::new();
    let mut dashboard_service = dashboard::DashboardService::new();
    let mut report_service = reports::ReportService::new();

    log::info!("Starting auth service.");
    let auth_handler = auth::AuthRequestHandler::new(api.clone(), session);
    tokio::spawn(async move {
        auth_service.run(auth_handler, &mut auth_rx).await;
    });

    log::info!("Starting expense service.");
    let expense_handler = expenses::ExpenseRequestHandler::new(api.clone());
    tokio::spawn(async move {
        expense_service.run(expense_handler, &mut expense_rx).await;
    });

    log::info!("Starting income service.");
    let income_handler = incomes::IncomeRequestHandler::new(api.clone());
    tokio::spawn(async move {
        income_service.run(income_handler, &mut income_rx).await;
    });

    log::info!("Starting budget service.");
    let budget_handler = budgets::BudgetRequestHandler::new(api.clone());
    tokio::spawn(async move {
        budget_service.run(budget_handler, &mut budget_rx).await;
    });

    log::info!("Starting goal service.");
    let goal_handler = goals::GoalRequestHandler::new(api);
    tokio::spawn(async move {
        goal_service.run(goal_handler, &mut goal_rx).await;
    });

    let queries = QueryChannels {
        expenses: expense_tx,
        incomes: income_tx,
        budgets: budget_tx,
        goals: goal_tx,
    };

    log::info!("Starting dashboard service.");
    let dashboard_handler = dashboard::DashboardRequestHandler::new(
        queries.clone(),
        DashboardOptions {
            trend_months: settings.dashboard.trend_months,
            recent_transactions: settings.dashboard.recent_transactions,
        },
    );
    tokio::spawn(async move {
        dashboard_service
            .run(dashboard_handler, &mut dashboard_rx)
            .await;
    });

    log::info!("Starting report service.");
    let report_handler =
        reports::ReportRequestHandler::new(queries.clone(), settings.dashboard.trend_months);
    tokio::spawn(async move {
        report_service.run(report_handler, &mut report_rx).await;
    });

    log::info!("Started services.");
    Ok(ServiceChannels {
        auth: auth_tx,
        queries,
        dashboard: dashboard_tx,
        reports: report_tx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;
    use chrono::NaiveDate;

    #[test]
    fn test_amount_checks_reject_non_finite_values() {
        assert!(check_positive("amount", 12.5).is_ok());
        assert!(check_positive("amount", 0.0).is_err());
        assert!(check_positive("amount", -3.0).is_err());
        assert!(check_positive("amount", f64::NAN).is_err());
        assert!(check_positive("amount", f64::INFINITY).is_err());

        assert!(check_non_negative("currentAmount", 0.0).is_ok());
        assert!(check_non_negative("currentAmount", -0.01).is_err());
        assert!(matches!(
            check_non_negative("currentAmount", f64::NAN),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_month_check() {
        assert!(check_month(1).is_ok());
        assert!(check_month(12).is_ok());
        assert!(check_month(0).is_err());
        assert!(check_month(13).is_err());
    }

    #[tokio::test]
    async fn test_closed_service_fails_the_whole_aggregation() {
        let api = ApiClient::new(MockBackend::new(MockStore::empty()));

        let (expense_tx, mut expense_rx) = mpsc::channel(8);
        let (income_tx, mut income_rx) = mpsc::channel(8);
        let (budget_tx, budget_rx) = mpsc::channel(8);
        let (goal_tx, mut goal_rx) = mpsc::channel(8);
        drop(budget_rx);

        let expense_handler = expenses::ExpenseRequestHandler::new(api.clone());
        tokio::spawn(async move {
            expenses::ExpenseService::new()
                .run(expense_handler, &mut expense_rx)
                .await;
        });
        let income_handler = incomes::IncomeRequestHandler::new(api.clone());
        tokio::spawn(async move {
            incomes::IncomeService::new()
                .run(income_handler, &mut income_rx)
                .await;
        });
        let goal_handler = goals::GoalRequestHandler::new(api);
        tokio::spawn(async move {
            goals::GoalService::new().run(goal_handler, &mut goal_rx).await;
        });

        let handler = dashboard::DashboardRequestHandler::new(
            QueryChannels {
                expenses: expense_tx,
                incomes: income_tx,
                budgets: budget_tx,
                goals: goal_tx,
            },
            DashboardOptions::default(),
        );

        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let result = handler.build(1, today).await;

        assert!(matches!(
            result,
            Err(ServiceError::Communication(service, _)) if service == "BudgetService"
        ));
    }
}
