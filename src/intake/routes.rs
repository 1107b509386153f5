//! REST endpoints for the lead intake wizard.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::flow::LeadIntakeFlow;
use super::model::ContactDetails;
use super::registry::IntakeRegistry;
use crate::error::IntakeError;

/// Shared state for intake routes.
#[derive(Clone)]
pub struct IntakeRouteState {
    pub registry: Arc<IntakeRegistry>,
}

fn error_response(e: &IntakeError) -> Response {
    let status = match e {
        IntakeError::NotFound(_) => StatusCode::NOT_FOUND,
        IntakeError::WrongStep { .. } => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
}

fn flow_response(result: Result<LeadIntakeFlow, IntakeError>) -> Response {
    match result {
        Ok(flow) => Json(flow_json(&flow)).into_response(),
        Err(e) => error_response(&e),
    }
}

fn flow_json(flow: &LeadIntakeFlow) -> serde_json::Value {
    serde_json::json!({
        "id": flow.id,
        "step": flow.step(),
        "step_number": flow.step().number(),
        "headline": flow.step().headline(),
        "record": flow.record(),
    })
}

/// POST /api/leads
async fn start_flow(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    let flow = state.registry.start().await;
    (StatusCode::CREATED, Json(flow_json(&flow)))
}

/// GET /api/leads/{id}
async fn get_flow(State(state): State<IntakeRouteState>, Path(id): Path<Uuid>) -> Response {
    flow_response(state.registry.get(id).await.ok_or(IntakeError::NotFound(id)))
}

#[derive(Deserialize)]
struct AddressRequest {
    #[serde(default)]
    address: String,
}

/// POST /api/leads/{id}/address
async fn submit_address(
    State(state): State<IntakeRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddressRequest>,
) -> Response {
    flow_response(state.registry.submit_address(id, &body.address).await)
}

#[derive(Deserialize)]
struct PropertyTypeRequest {
    property_type: String,
}

/// POST /api/leads/{id}/property-type
async fn set_property_type(
    State(state): State<IntakeRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PropertyTypeRequest>,
) -> Response {
    match body.property_type.parse() {
        Ok(property_type) => flow_response(state.registry.set_property_type(id, property_type).await),
        Err(e) => error_response(&e),
    }
}

#[derive(Deserialize)]
struct TimelineRequest {
    timeline: String,
}

/// POST /api/leads/{id}/timeline
async fn select_timeline(
    State(state): State<IntakeRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TimelineRequest>,
) -> Response {
    match body.timeline.parse() {
        Ok(timeline) => flow_response(state.registry.select_timeline(id, timeline).await),
        Err(e) => error_response(&e),
    }
}

/// POST /api/leads/{id}/submit
///
/// Returns `202 Accepted` immediately; poll the flow to observe `success`.
async fn submit(
    State(state): State<IntakeRouteState>,
    Path(id): Path<Uuid>,
    Json(contact): Json<ContactDetails>,
) -> Response {
    match state.registry.submit(id, &contact).await {
        Ok(_handle) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({"id": id, "step": "submitting"})),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /api/leads/{id}/reset
async fn reset(State(state): State<IntakeRouteState>, Path(id): Path<Uuid>) -> Response {
    flow_response(state.registry.reset(id).await)
}

/// DELETE /api/leads/{id}
///
/// Drops the flow and cancels any pending submission.
async fn discard(State(state): State<IntakeRouteState>, Path(id): Path<Uuid>) -> Response {
    match state.registry.remove(id).await {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error_response(&IntakeError::NotFound(id)),
    }
}

/// Build the intake REST routes.
pub fn intake_routes(state: IntakeRouteState) -> Router {
    Router::new()
        .route("/api/leads", post(start_flow))
        .route("/api/leads/{id}", get(get_flow).delete(discard))
        .route("/api/leads/{id}/address", post(submit_address))
        .route("/api/leads/{id}/property-type", post(set_property_type))
        .route("/api/leads/{id}/timeline", post(select_timeline))
        .route("/api/leads/{id}/submit", post(submit))
        .route("/api/leads/{id}/reset", post(reset))
        .with_state(state)
}
