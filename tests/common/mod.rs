#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use finance_tracker::models::users::NewUser;
use finance_tracker::repositories::api::ApiClient;
use finance_tracker::server::MockBackend;
use finance_tracker::services::{self, ServiceChannels};
use finance_tracker::session::{LocalStorage, MemoryStorage, SessionState};
use finance_tracker::settings::Settings;
use finance_tracker::store::{Collection, MockStore};

pub struct TestApp {
    pub store: MockStore,
    pub api: ApiClient,
    pub storage: Arc<dyn LocalStorage>,
    pub session: SessionState,
    pub channels: ServiceChannels,
}

pub async fn spawn_app(store: MockStore) -> TestApp {
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
    let session = SessionState::new(storage.clone());
    let backend = MockBackend::new(store.clone());

    let channels = services::start_services(&Settings::default(), backend.clone(), session.clone())
        .await
        .unwrap();

    TestApp {
        store,
        api: ApiClient::new(backend),
        storage,
        session,
        channels,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn insert_user(store: &MockStore, email: &str, password: &str) -> u64 {
    let user = NewUser {
        email: email.to_string(),
        password: password.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        created_at: Utc::now(),
    };

    let record = store.insert(Collection::Users, serde_json::to_value(&user).unwrap());
    record["id"].as_u64().unwrap()
}
