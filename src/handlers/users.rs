use axum::{
    extract::{Path, State},
    response::Response,
};
use reqwest::Method;
use std::time::Duration;
use tracing::{error, info};

use crate::handlers::outcome_response;
use crate::state::AppState;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn list_users(State(state): State<AppState>) -> Response {
    info!("Fetching users from backend");

    let outcome = state
        .backend
        .call(Method::GET, "/api/users", None, FETCH_TIMEOUT)
        .await;
    if let Err(failure) = &outcome {
        error!(error = %failure, "Error fetching users");
    }

    outcome_response(outcome, "Failed to fetch users", None)
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!(user_id = %id, "Fetching user from backend");

    let outcome = state
        .backend
        .call(Method::GET, &format!("/api/users/{id}"), None, FETCH_TIMEOUT)
        .await;
    if let Err(failure) = &outcome {
        error!(user_id = %id, error = %failure, "Error fetching user");
    }

    outcome_response(outcome, "Failed to fetch user", Some("User not found"))
}
