use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{check_month, QueryChannels, RequestHandler, Service, ServiceError};
use crate::analytics;
use crate::models::reports::VarianceReport;

pub enum ReportRequest {
    Variance {
        user_id: u64,
        month: u32,
        year: i32,
        response: oneshot::Sender<Result<VarianceReport, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct ReportRequestHandler {
    queries: QueryChannels,
    trend_months: u32,
}

impl ReportRequestHandler {
    pub fn new(queries: QueryChannels, trend_months: u32) -> Self {
        ReportRequestHandler {
            queries,
            trend_months,
        }
    }

    pub async fn variance(
        &self,
        user_id: u64,
        month: u32,
        year: i32,
    ) -> Result<VarianceReport, ServiceError> {
        check_month(month)?;

        let data = self.queries.fetch_user_data(user_id).await?;

        Ok(analytics::build_variance_report(
            &data,
            year,
            month,
            self.trend_months,
        ))
    }
}

#[async_trait]
impl RequestHandler<ReportRequest> for ReportRequestHandler {
    async fn handle_request(&self, request: ReportRequest) {
        match request {
            ReportRequest::Variance {
                user_id,
                month,
                year,
                response,
            } => {
                let report = self.variance(user_id, month, year).await;
                if let Err(e) = &report {
                    log::error!("Variance report for user {} failed: {}", user_id, e);
                }
                let _ = response.send(report);
            }
        }
    }
}

pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        ReportService {}
    }
}

#[async_trait]
impl Service<ReportRequest, ReportRequestHandler> for ReportService {}
