use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::users::{Registration, User};
use crate::repositories::{api::ApiClient, users::UserRepository};
use crate::session::SessionState;

pub enum AuthRequest {
    Login {
        email: String,
        password: String,
        response: oneshot::Sender<Result<Option<User>, ServiceError>>,
    },
    Register {
        registration: Registration,
        response: oneshot::Sender<Result<User, ServiceError>>,
    },
    Logout {
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
    CurrentUser {
        response: oneshot::Sender<Result<Option<User>, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct AuthRequestHandler {
    repository: UserRepository,
    session: SessionState,
}

impl AuthRequestHandler {
    pub fn new(api: ApiClient, session: SessionState) -> Self {
        let repository = UserRepository::new(api);

        AuthRequestHandler {
            repository,
            session,
        }
    }

    /// Signs in when exactly one user matches the email (case-insensitive,
    /// trimmed) and the password. Bad credentials yield `Ok(None)` and clear
    /// the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>, ServiceError> {
        let users = match self.repository.get_users().await {
            Ok(users) => users,
            Err(e) => {
                log::error!("Could not load users for login: {}", e);
                Vec::new()
            }
        };

        let mut matches = users
            .into_iter()
            .filter(|user| user.email_matches(email) && user.password == password);

        match (matches.next(), matches.next()) {
            (Some(user), None) => {
                log::info!("User {} signed in.", user.id);
                self.session.set(Some(user.clone()));
                Ok(Some(user))
            }
            _ => {
                log::info!("Rejected sign-in attempt.");
                self.session.clear();
                Ok(None)
            }
        }
    }

    /// Creates an account. Does not sign the new user in.
    pub async fn register(&self, registration: Registration) -> Result<User, ServiceError> {
        let users = self
            .repository
            .get_users()
            .await
            .map_err(|e| ServiceError::Repository("AuthService".to_string(), e.to_string()))?;

        if users
            .iter()
            .any(|user| user.email_matches(&registration.email))
        {
            return Err(ServiceError::DuplicateEmail(
                registration.email.trim().to_string(),
            ));
        }

        let new_user = registration.into_new_user(Utc::now());
        let user = self
            .repository
            .insert_user(&new_user)
            .await
            .map_err(|e| ServiceError::Repository("AuthService".to_string(), e.to_string()))?;

        log::info!("Registered user {}.", user.id);
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.clear();
        log::info!("Signed out.");
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current()
    }
}

#[async_trait]
impl RequestHandler<AuthRequest> for AuthRequestHandler {
    async fn handle_request(&self, request: AuthRequest) {
        match request {
            AuthRequest::Login {
                email,
                password,
                response,
            } => {
                let user = self.login(&email, &password).await;
                let _ = response.send(user);
            }
            AuthRequest::Register {
                registration,
                response,
            } => {
                let user = self.register(registration).await;
                let _ = response.send(user);
            }
            AuthRequest::Logout { response } => {
                self.logout();
                let _ = response.send(Ok(()));
            }
            AuthRequest::CurrentUser { response } => {
                let _ = response.send(Ok(self.current_user()));
            }
        }
    }
}

pub struct AuthService;

impl AuthService {
    pub fn new() -> Self {
        AuthService {}
    }
}

#[async_trait]
impl Service<AuthRequest, AuthRequestHandler> for AuthService {}
