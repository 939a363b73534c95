use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{TicketRepository, TicketRepositoryError, TicketService, TicketServiceError, TicketSubmission};

/// Router builder exposing the support-ticket endpoints.
pub fn ticket_router<T>(service: Arc<TicketService<T>>) -> Router
where
    T: TicketRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/tickets",
            post(submit_handler::<T>).get(list_handler::<T>),
        )
        .route("/api/v1/tickets/:id/response", post(respond_handler::<T>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    pub(crate) username: Option<String>,
    #[serde(default)]
    pub(crate) open_only: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RespondBody {
    pub(crate) response: String,
}

pub(crate) async fn submit_handler<T>(
    State(service): State<Arc<TicketService<T>>>,
    axum::Json(submission): axum::Json<TicketSubmission>,
) -> Response
where
    T: TicketRepository + 'static,
{
    match service.open(submission, Local::now().naive_local()) {
        Ok(ticket) => (StatusCode::CREATED, axum::Json(ticket)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_handler<T>(
    State(service): State<Arc<TicketService<T>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    T: TicketRepository + 'static,
{
    let tickets = match (params.username.as_deref(), params.open_only) {
        (Some(username), _) => service.list_for(username),
        (None, true) => service.open_queue(),
        (None, false) => service.list(),
    };

    match tickets {
        Ok(tickets) => (StatusCode::OK, axum::Json(tickets)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn respond_handler<T>(
    State(service): State<Arc<TicketService<T>>>,
    Path(id): Path<Uuid>,
    axum::Json(body): axum::Json<RespondBody>,
) -> Response
where
    T: TicketRepository + 'static,
{
    match service.respond(&id, &body.response, Local::now().naive_local()) {
        Ok(ticket) => (StatusCode::OK, axum::Json(ticket)).into_response(),
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: TicketServiceError) -> Response {
    let status = match &err {
        TicketServiceError::Repository(TicketRepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TicketServiceError::Repository(TicketRepositoryError::Conflict) => StatusCode::CONFLICT,
        TicketServiceError::Repository(TicketRepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
