use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::store::{Collection, MockStore};

#[derive(Clone)]
struct AppState {
    store: MockStore,
}

type JsonResponse = (StatusCode, Json<Value>);

pub fn routes(store: MockStore) -> Router {
    let app_state = AppState { store };

    Router::new()
        .route("/{collection}", get(list_records).post(create_record))
        .route(
            "/{collection}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

async fn list_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(filters): Query<Vec<(String, String)>>,
) -> JsonResponse {
    let Some(collection) = Collection::from_name(&collection) else {
        return unknown_collection(&collection);
    };

    let records: Vec<Value> = state
        .store
        .list(collection, &filters)
        .into_iter()
        .map(Value::Object)
        .collect();

    (StatusCode::OK, Json(Value::Array(records)))
}

async fn create_record(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> JsonResponse {
    let Some(collection) = Collection::from_name(&collection) else {
        return unknown_collection(&collection);
    };

    let record = state.store.insert(collection, body);
    (StatusCode::CREATED, Json(Value::Object(record)))
}

async fn get_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> JsonResponse {
    let Some((collection, id)) = resolve(&collection, &id) else {
        return not_found(&collection, &id);
    };

    match state.store.get(collection, id) {
        Some(record) => (StatusCode::OK, Json(Value::Object(record))),
        None => not_found(collection.name(), &id.to_string()),
    }
}

async fn update_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> JsonResponse {
    let Some((collection, id)) = resolve(&collection, &id) else {
        return not_found(&collection, &id);
    };

    match state.store.update(collection, id, body) {
        Some(record) => (StatusCode::OK, Json(Value::Object(record))),
        None => not_found(collection.name(), &id.to_string()),
    }
}

async fn delete_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> JsonResponse {
    let Some((collection, id)) = resolve(&collection, &id) else {
        return not_found(&collection, &id);
    };

    match state.store.remove(collection, id) {
        Some(record) => (StatusCode::OK, Json(Value::Object(record))),
        None => not_found(collection.name(), &id.to_string()),
    }
}

fn resolve(collection: &str, id: &str) -> Option<(Collection, u64)> {
    let collection = Collection::from_name(collection)?;
    let id = id.parse().ok()?;

    Some((collection, id))
}

fn not_found(collection: &str, id: &str) -> JsonResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "details": format!("No record {} in {}", id, collection)
        })),
    )
}

fn unknown_collection(collection: &str) -> JsonResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "details": format!("Unknown collection {}", collection)
        })),
    )
}
