use crate::models::users;
use crate::store::Collection;

use super::api::ApiClient;

#[derive(Clone)]
pub struct UserRepository {
    api: ApiClient,
}

impl UserRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_users(&self) -> Result<Vec<users::User>, anyhow::Error> {
        self.api.list(Collection::Users, &[]).await
    }

    pub async fn get_user_by_id(&self, id: u64) -> Result<Option<users::User>, anyhow::Error> {
        self.api.get(Collection::Users, id).await
    }

    pub async fn insert_user(&self, user: &users::NewUser) -> Result<users::User, anyhow::Error> {
        self.api.create(Collection::Users, user).await
    }
}
