use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::oneshot;

use super::{QueryChannels, RequestHandler, Service, ServiceError};
use crate::analytics::{self, DashboardOptions};
use crate::models::dashboard::Dashboard;

pub enum DashboardRequest {
    Build {
        user_id: u64,
        today: NaiveDate,
        response: oneshot::Sender<Result<Dashboard, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct DashboardRequestHandler {
    queries: QueryChannels,
    options: DashboardOptions,
}

impl DashboardRequestHandler {
    pub fn new(queries: QueryChannels, options: DashboardOptions) -> Self {
        DashboardRequestHandler { queries, options }
    }

    /// Recomputed from scratch on every call.
    pub async fn build(&self, user_id: u64, today: NaiveDate) -> Result<Dashboard, ServiceError> {
        let data = self.queries.fetch_user_data(user_id).await?;

        Ok(analytics::build_dashboard(&data, today, self.options))
    }
}

#[async_trait]
impl RequestHandler<DashboardRequest> for DashboardRequestHandler {
    async fn handle_request(&self, request: DashboardRequest) {
        match request {
            DashboardRequest::Build {
                user_id,
                today,
                response,
            } => {
                let dashboard = self.build(user_id, today).await;
                if let Err(e) = &dashboard {
                    log::error!("Dashboard for user {} failed: {}", user_id, e);
                }
                let _ = response.send(dashboard);
            }
        }
    }
}

pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        DashboardService {}
    }
}

#[async_trait]
impl Service<DashboardRequest, DashboardRequestHandler> for DashboardService {}
