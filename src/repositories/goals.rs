use crate::models::goals::{Goal, GoalPatch, NewGoal};
use crate::store::Collection;

use super::api::ApiClient;

#[derive(Clone)]
pub struct GoalRepository {
    api: ApiClient,
}

impl GoalRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_goals_by_user(&self, user_id: u64) -> Result<Vec<Goal>, anyhow::Error> {
        self.api
            .list(Collection::Goals, &[("userId", user_id.to_string())])
            .await
    }

    pub async fn get_goal(&self, id: u64) -> Result<Option<Goal>, anyhow::Error> {
        self.api.get(Collection::Goals, id).await
    }

    pub async fn insert_goal(&self, goal: &NewGoal) -> Result<Goal, anyhow::Error> {
        self.api.create(Collection::Goals, goal).await
    }

    pub async fn update_goal(
        &self,
        id: u64,
        patch: &GoalPatch,
    ) -> Result<Option<Goal>, anyhow::Error> {
        self.api.update(Collection::Goals, id, patch).await
    }

    pub async fn delete_goal(&self, id: u64) -> Result<bool, anyhow::Error> {
        self.api.delete(Collection::Goals, id).await
    }
}
