use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fleet_sla::assistant::{context_summary, SupportCounts};
use fleet_sla::workflows::accounts::{account_router, AccountService, Sha256PasswordHasher};
use fleet_sla::workflows::analysis::{
    analysis_router, AnalysisService, DashboardFilter, DashboardSummary,
};
use fleet_sla::workflows::support::{ticket_router, TicketService};
use serde_json::json;

use crate::infra::{
    AppState, InMemoryAnalysisRepository, InMemoryDeletionQueue, InMemoryDocumentStore,
    InMemoryTicketRepository, InMemoryUserRepository, RecordingEmailNotifier,
};

pub(crate) type Analyses =
    AnalysisService<InMemoryAnalysisRepository, InMemoryDeletionQueue, InMemoryDocumentStore>;
pub(crate) type Accounts =
    AccountService<InMemoryUserRepository, Sha256PasswordHasher, RecordingEmailNotifier>;
pub(crate) type Tickets = TicketService<InMemoryTicketRepository>;

/// Shared handles for the endpoints that cut across workflows.
#[derive(Clone)]
pub(crate) struct ServiceHandles {
    pub(crate) analyses: Arc<Analyses>,
    pub(crate) accounts: Arc<Accounts>,
    pub(crate) tickets: Arc<Tickets>,
}

pub(crate) fn with_service_routes(handles: ServiceHandles) -> axum::Router {
    let cross_cutting = axum::Router::new()
        .route(
            "/api/v1/sla/report/export",
            axum::routing::get(report_export_endpoint),
        )
        .route(
            "/api/v1/sla/dashboard",
            axum::routing::post(dashboard_endpoint),
        )
        .route(
            "/api/v1/assistant/context",
            axum::routing::get(assistant_context_endpoint),
        )
        .with_state(handles.clone());

    analysis_router(handles.analyses.clone())
        .merge(account_router(handles.accounts.clone()))
        .merge(ticket_router(handles.tickets.clone()))
        .merge(cross_cutting)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn report_export_endpoint(
    State(handles): State<ServiceHandles>,
) -> impl IntoResponse {
    match handles.analyses.export_report_csv(None) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sla-report.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn dashboard_endpoint(
    State(handles): State<ServiceHandles>,
    Json(filter): Json<DashboardFilter>,
) -> Result<Json<DashboardSummary>, (StatusCode, Json<serde_json::Value>)> {
    handles.analyses.dashboard(&filter).map(Json).map_err(|err| {
        let payload = json!({ "error": err.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(payload))
    })
}

pub(crate) async fn assistant_context_endpoint(
    State(handles): State<ServiceHandles>,
) -> impl IntoResponse {
    let records = handles.analyses.records().unwrap_or_default();
    let total_users = handles.accounts.list().map(|users| users.len()).unwrap_or(0);
    let pending_users = handles
        .accounts
        .pending()
        .map(|users| users.len())
        .unwrap_or(0);
    let open_tickets = handles
        .tickets
        .open_queue()
        .map(|tickets| tickets.len())
        .unwrap_or(0);

    let summary = context_summary(
        &records,
        SupportCounts {
            total_users,
            pending_users,
            open_tickets,
        },
    );

    Json(json!({ "context": summary }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fleet_sla::config::AccountPolicyConfig;
    use fleet_sla::workflows::analysis::{SimpleSubmission, SlaThresholds};
    use rust_decimal::Decimal;

    fn handles() -> ServiceHandles {
        let analyses = Arc::new(AnalysisService::new(
            Arc::new(InMemoryAnalysisRepository::default()),
            Arc::new(InMemoryDeletionQueue::default()),
            Arc::new(InMemoryDocumentStore::default()),
            SlaThresholds::standard(),
        ));
        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(Sha256PasswordHasher),
            Arc::new(RecordingEmailNotifier::default()),
            AccountPolicyConfig {
                password_expiry_days: 90,
                reset_token_ttl_minutes: 30,
            },
        ));
        let tickets = Arc::new(TicketService::new(Arc::new(
            InMemoryTicketRepository::default(),
        )));

        ServiceHandles {
            analyses,
            accounts,
            tickets,
        }
    }

    fn sample_submission() -> SimpleSubmission {
        SimpleSubmission {
            client: "Transportes Andrade".to_string(),
            plate: "ABC1D23".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
            holidays: 0,
            service: "Corrective".to_string(),
            monthly_fee: Decimal::from(3000),
        }
    }

    #[tokio::test]
    async fn report_export_returns_csv_with_recorded_rows() {
        let handles = handles();
        let recorded_at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
            .expect("valid time");
        handles
            .analyses
            .record_simple("maria.souza", sample_submission(), recorded_at)
            .expect("analysis records");

        let response = report_export_endpoint(State(handles)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/csv")
        );
    }

    #[tokio::test]
    async fn dashboard_endpoint_aggregates_records() {
        let handles = handles();
        let recorded_at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
            .expect("valid time");
        handles
            .analyses
            .record_simple("maria.souza", sample_submission(), recorded_at)
            .expect("analysis records");

        let Json(summary) = dashboard_endpoint(
            State(handles),
            Json(DashboardFilter::default()),
        )
        .await
        .expect("dashboard builds");

        assert_eq!(summary.total_analyses, 1);
        assert_eq!(summary.simple_count, 1);
    }

    #[tokio::test]
    async fn assistant_context_reports_counts() {
        let handles = handles();
        let response = assistant_context_endpoint(State(handles)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
