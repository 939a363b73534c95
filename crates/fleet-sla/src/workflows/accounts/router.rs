use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::notify::EmailNotifier;

use super::domain::{NewAccount, UserAccount};
use super::password::PasswordHasher;
use super::repository::{AccountRepositoryError, UserRepository};
use super::service::{AccountService, AccountServiceError};

/// Router builder exposing the account lifecycle endpoints.
pub fn account_router<U, H, N>(service: Arc<AccountService<U, H, N>>) -> Router
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    N: EmailNotifier + 'static,
{
    Router::new()
        .route("/api/v1/accounts/register", post(register_handler::<U, H, N>))
        .route("/api/v1/accounts/login", post(login_handler::<U, H, N>))
        .route(
            "/api/v1/accounts/:username/approve",
            post(approve_handler::<U, H, N>),
        )
        .route(
            "/api/v1/accounts/password/forgot",
            post(forgot_handler::<U, H, N>),
        )
        .route(
            "/api/v1/accounts/password/reset",
            post(reset_handler::<U, H, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApproveRequest {
    pub(crate) base_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForgotRequest {
    pub(crate) identifier: String,
    pub(crate) base_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResetRequest {
    pub(crate) token: String,
    pub(crate) new_password: String,
}

/// Account representation safe for API responses: no hash, no token.
#[derive(Debug, Serialize)]
pub(crate) struct AccountView {
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) role: &'static str,
    pub(crate) status: &'static str,
}

impl AccountView {
    fn from_account(account: &UserAccount) -> Self {
        Self {
            username: account.username.clone(),
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            role: account.role.label(),
            status: account.status.label(),
        }
    }
}

pub(crate) async fn register_handler<U, H, N>(
    State(service): State<Arc<AccountService<U, H, N>>>,
    axum::Json(form): axum::Json<NewAccount>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    N: EmailNotifier + 'static,
{
    match service.register(form, Local::now().naive_local()) {
        Ok(account) => {
            (StatusCode::CREATED, axum::Json(AccountView::from_account(&account))).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn login_handler<U, H, N>(
    State(service): State<Arc<AccountService<U, H, N>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    N: EmailNotifier + 'static,
{
    match service.login(&request.username, &request.password, Local::now().naive_local()) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn approve_handler<U, H, N>(
    State(service): State<Arc<AccountService<U, H, N>>>,
    Path(username): Path<String>,
    axum::Json(request): axum::Json<ApproveRequest>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    N: EmailNotifier + 'static,
{
    match service.approve(&username, &request.base_url, Local::now().naive_local()) {
        Ok(account) => {
            (StatusCode::OK, axum::Json(AccountView::from_account(&account))).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn forgot_handler<U, H, N>(
    State(service): State<Arc<AccountService<U, H, N>>>,
    axum::Json(request): axum::Json<ForgotRequest>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    N: EmailNotifier + 'static,
{
    match service.forgot_password(
        &request.identifier,
        &request.base_url,
        Local::now().naive_local(),
    ) {
        Ok(()) => {
            let payload = json!({ "status": "reset link sent if the account exists" });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn reset_handler<U, H, N>(
    State(service): State<Arc<AccountService<U, H, N>>>,
    axum::Json(request): axum::Json<ResetRequest>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    N: EmailNotifier + 'static,
{
    match service.reset_password(
        &request.token,
        &request.new_password,
        Local::now().naive_local(),
    ) {
        Ok(account) => {
            (StatusCode::OK, axum::Json(AccountView::from_account(&account))).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: AccountServiceError) -> Response {
    let status = match &err {
        AccountServiceError::PolicyViolations(_)
        | AccountServiceError::InvalidCurrentPassword
        | AccountServiceError::TokenInvalid
        | AccountServiceError::TokenExpired => StatusCode::UNPROCESSABLE_ENTITY,
        AccountServiceError::Repository(AccountRepositoryError::Conflict) => StatusCode::CONFLICT,
        AccountServiceError::Repository(AccountRepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AccountServiceError::Repository(AccountRepositoryError::Unavailable(_))
        | AccountServiceError::Notify(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
