use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{check_non_negative, RequestHandler, Service, ServiceError};
use crate::models::goals::{Goal, GoalPatch, NewGoal};
use crate::repositories::{api::ApiClient, goals::GoalRepository};

pub enum GoalRequest {
    ListByUser {
        user_id: u64,
        response: oneshot::Sender<Result<Vec<Goal>, ServiceError>>,
    },
    ListActive {
        user_id: u64,
        response: oneshot::Sender<Result<Vec<Goal>, ServiceError>>,
    },
    Get {
        id: u64,
        response: oneshot::Sender<Result<Option<Goal>, ServiceError>>,
    },
    Create {
        goal: NewGoal,
        response: oneshot::Sender<Result<Goal, ServiceError>>,
    },
    Update {
        id: u64,
        patch: GoalPatch,
        response: oneshot::Sender<Result<Goal, ServiceError>>,
    },
    UpdateProgress {
        id: u64,
        amount: f64,
        response: oneshot::Sender<Result<Goal, ServiceError>>,
    },
    Delete {
        id: u64,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct GoalRequestHandler {
    repository: GoalRepository,
}

impl GoalRequestHandler {
    pub fn new(api: ApiClient) -> Self {
        let repository = GoalRepository::new(api);

        GoalRequestHandler { repository }
    }

    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Goal>, ServiceError> {
        match self.repository.get_goals_by_user(user_id).await {
            Ok(goals) => Ok(goals),
            Err(e) => {
                log::error!("Could not load goals for user {}: {}", user_id, e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn list_active(&self, user_id: u64) -> Result<Vec<Goal>, ServiceError> {
        let goals = self.list_by_user(user_id).await?;

        Ok(goals.into_iter().filter(|goal| !goal.is_completed()).collect())
    }

    pub async fn get(&self, id: u64) -> Result<Option<Goal>, ServiceError> {
        self.repository
            .get_goal(id)
            .await
            .map_err(|e| ServiceError::Repository("GoalService".to_string(), e.to_string()))
    }

    pub async fn create(&self, goal: NewGoal) -> Result<Goal, ServiceError> {
        check_non_negative("targetAmount", goal.target_amount)?;
        check_non_negative("currentAmount", goal.current_amount)?;

        let goal = self
            .repository
            .insert_goal(&goal)
            .await
            .map_err(|e| ServiceError::Repository("GoalService".to_string(), e.to_string()))?;

        log::info!("Created goal {} for user {}.", goal.id, goal.user_id);
        Ok(goal)
    }

    pub async fn update(&self, id: u64, patch: GoalPatch) -> Result<Goal, ServiceError> {
        if let Some(target_amount) = patch.target_amount {
            check_non_negative("targetAmount", target_amount)?;
        }
        if let Some(current_amount) = patch.current_amount {
            check_non_negative("currentAmount", current_amount)?;
        }

        self.repository
            .update_goal(id, &patch)
            .await
            .map_err(|e| ServiceError::Repository("GoalService".to_string(), e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("Goal {}", id)))
    }

    /// Adds `amount` (negative to withdraw) to the saved amount. The result
    /// is kept between zero and the target, then written in one update.
    pub async fn update_progress(&self, id: u64, amount: f64) -> Result<Goal, ServiceError> {
        if !amount.is_finite() {
            return Err(ServiceError::InvalidInput(format!(
                "Contribution must be a finite amount, got {}",
                amount
            )));
        }

        let goal = self
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Goal {}", id)))?;

        let current_amount = goal.contributed(amount);
        log::debug!(
            "Goal {} progress {} -> {}.",
            id,
            goal.current_amount,
            current_amount
        );

        self.update(
            id,
            GoalPatch {
                current_amount: Some(current_amount),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let deleted = self
            .repository
            .delete_goal(id)
            .await
            .map_err(|e| ServiceError::Repository("GoalService".to_string(), e.to_string()))?;

        if !deleted {
            return Err(ServiceError::NotFound(format!("Goal {}", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl RequestHandler<GoalRequest> for GoalRequestHandler {
    async fn handle_request(&self, request: GoalRequest) {
        match request {
            GoalRequest::ListByUser { user_id, response } => {
                let goals = self.list_by_user(user_id).await;
                let _ = response.send(goals);
            }
            GoalRequest::ListActive { user_id, response } => {
                let goals = self.list_active(user_id).await;
                let _ = response.send(goals);
            }
            GoalRequest::Get { id, response } => {
                let goal = self.get(id).await;
                let _ = response.send(goal);
            }
            GoalRequest::Create { goal, response } => {
                let goal = self.create(goal).await;
                let _ = response.send(goal);
            }
            GoalRequest::Update {
                id,
                patch,
                response,
            } => {
                let goal = self.update(id, patch).await;
                let _ = response.send(goal);
            }
            GoalRequest::UpdateProgress {
                id,
                amount,
                response,
            } => {
                let goal = self.update_progress(id, amount).await;
                let _ = response.send(goal);
            }
            GoalRequest::Delete { id, response } => {
                let result = self.delete(id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct GoalService;

impl GoalService {
    pub fn new() -> Self {
        GoalService {}
    }
}

#[async_trait]
impl Service<GoalRequest, GoalRequestHandler> for GoalService {}
