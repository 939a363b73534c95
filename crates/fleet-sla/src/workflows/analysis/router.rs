use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::domain::{AnalysisId, PartItem};
use super::repository::{
    AnalysisRepository, DeletionRequestRepository, DocumentStore, RepositoryError,
};
use super::scenario::ScenarioSet;
use super::service::{
    AnalysisService, AnalysisServiceError, ScenarioSubmission, SimpleSubmission,
};

/// Router builder exposing HTTP endpoints for SLA evaluation, comparison,
/// and the audit-record surface.
pub fn analysis_router<R, Q, D>(service: Arc<AnalysisService<R, Q, D>>) -> Router
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    Router::new()
        .route("/api/v1/sla/evaluations", post(evaluate_handler::<R, Q, D>))
        .route("/api/v1/sla/comparisons", post(compare_handler::<R, Q, D>))
        .route("/api/v1/sla/analyses", get(list_handler::<R, Q, D>))
        .route(
            "/api/v1/sla/analyses/:protocol",
            get(status_handler::<R, Q, D>),
        )
        .route(
            "/api/v1/sla/analyses/:protocol/deletion-requests",
            post(request_deletion_handler::<R, Q, D>),
        )
        .route(
            "/api/v1/sla/deletion-requests",
            get(deletion_queue_handler::<R, Q, D>),
        )
        .route(
            "/api/v1/sla/deletion-requests/:id/review",
            post(review_deletion_handler::<R, Q, D>),
        )
        .route(
            "/api/v1/sla/deletion-requests/:id",
            delete(dismiss_deletion_handler::<R, Q, D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    pub(crate) recorded_by: String,
    pub(crate) client: String,
    pub(crate) plate: String,
    pub(crate) entry_date: NaiveDate,
    pub(crate) exit_date: NaiveDate,
    #[serde(default)]
    pub(crate) holidays: u32,
    pub(crate) service: String,
    pub(crate) monthly_fee: Decimal,
    #[serde(default)]
    pub(crate) recorded_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScenarioRequest {
    pub(crate) client: String,
    pub(crate) plate: String,
    pub(crate) entry_date: NaiveDate,
    pub(crate) exit_date: NaiveDate,
    #[serde(default)]
    pub(crate) holidays: u32,
    pub(crate) service: String,
    pub(crate) monthly_fee: Decimal,
    #[serde(default)]
    pub(crate) parts: Vec<PartItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComparisonRequest {
    pub(crate) recorded_by: String,
    pub(crate) scenarios: Vec<ScenarioRequest>,
    #[serde(default)]
    pub(crate) recorded_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    pub(crate) recorded_by: Option<String>,
    #[serde(default)]
    pub(crate) document_base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeletionRequestBody {
    pub(crate) requested_by: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewBody {
    pub(crate) approve: bool,
    pub(crate) reviewed_by: String,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

pub(crate) async fn evaluate_handler<R, Q, D>(
    State(service): State<Arc<AnalysisService<R, Q, D>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    let recorded_at = request
        .recorded_at
        .unwrap_or_else(|| Local::now().naive_local());
    let submission = SimpleSubmission {
        client: request.client,
        plate: request.plate,
        entry_date: request.entry_date,
        exit_date: request.exit_date,
        holidays: request.holidays,
        service: request.service,
        monthly_fee: request.monthly_fee,
    };

    match service.record_simple(&request.recorded_by, submission, recorded_at) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn compare_handler<R, Q, D>(
    State(service): State<Arc<AnalysisService<R, Q, D>>>,
    axum::Json(request): axum::Json<ComparisonRequest>,
) -> Response
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    let recorded_at = request
        .recorded_at
        .unwrap_or_else(|| Local::now().naive_local());

    let mut session = ScenarioSet::new();
    for scenario in request.scenarios {
        let submission = ScenarioSubmission {
            client: scenario.client,
            plate: scenario.plate,
            entry_date: scenario.entry_date,
            exit_date: scenario.exit_date,
            holidays: scenario.holidays,
            service: scenario.service,
            monthly_fee: scenario.monthly_fee,
            parts: scenario.parts,
        };
        match service.build_scenario(submission) {
            Ok(scenario) => session.add(scenario),
            Err(err) => return service_error_response(err),
        }
    }

    match service.record_comparison(&request.recorded_by, &session, recorded_at) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_handler<R, Q, D>(
    State(service): State<Arc<AnalysisService<R, Q, D>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    let base_url = params.document_base_url.as_deref();
    let lines = match params.recorded_by.as_deref() {
        Some(username) => service.report_lines_for(username, base_url),
        None => service.report_lines(base_url),
    };

    match lines {
        Ok(lines) => (StatusCode::OK, axum::Json(lines)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn status_handler<R, Q, D>(
    State(service): State<Arc<AnalysisService<R, Q, D>>>,
    Path(protocol): Path<String>,
) -> Response
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    let Some(id) = parse_protocol(&protocol) else {
        return protocol_error_response(&protocol);
    };

    match service.fetch(&id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "analysis not found", "protocol": protocol });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn request_deletion_handler<R, Q, D>(
    State(service): State<Arc<AnalysisService<R, Q, D>>>,
    Path(protocol): Path<String>,
    axum::Json(body): axum::Json<DeletionRequestBody>,
) -> Response
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    let Some(id) = parse_protocol(&protocol) else {
        return protocol_error_response(&protocol);
    };

    match service.request_deletion(&id, &body.requested_by, Local::now().naive_local()) {
        Ok(request) => (StatusCode::ACCEPTED, axum::Json(request)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn deletion_queue_handler<R, Q, D>(
    State(service): State<Arc<AnalysisService<R, Q, D>>>,
) -> Response
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    match service.deletion_requests() {
        Ok(requests) => (StatusCode::OK, axum::Json(requests)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn review_deletion_handler<R, Q, D>(
    State(service): State<Arc<AnalysisService<R, Q, D>>>,
    Path(id): Path<Uuid>,
    axum::Json(body): axum::Json<ReviewBody>,
) -> Response
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    match service.review_deletion(
        &id,
        body.approve,
        &body.reviewed_by,
        body.notes,
        Local::now().naive_local(),
    ) {
        Ok(request) => (StatusCode::OK, axum::Json(request)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn dismiss_deletion_handler<R, Q, D>(
    State(service): State<Arc<AnalysisService<R, Q, D>>>,
    Path(id): Path<Uuid>,
) -> Response
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    match service.dismiss_rejected(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => service_error_response(err),
    }
}

fn parse_protocol(raw: &str) -> Option<AnalysisId> {
    raw.parse::<Uuid>().ok().map(AnalysisId)
}

fn protocol_error_response(raw: &str) -> Response {
    let payload = json!({ "error": "protocol must be a UUID", "protocol": raw });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn service_error_response(err: AnalysisServiceError) -> Response {
    let status = match &err {
        AnalysisServiceError::InvalidDateRange { .. }
        | AnalysisServiceError::NegativeMonthlyFee
        | AnalysisServiceError::NegativePartCost { .. }
        | AnalysisServiceError::NotEnoughScenarios { .. }
        | AnalysisServiceError::AlreadyReviewed { .. }
        | AnalysisServiceError::NotDismissable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AnalysisServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AnalysisServiceError::Repository(RepositoryError::Unavailable(_))
        | AnalysisServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::analysis::evaluation::SlaThresholds;
    use crate::workflows::analysis::repository::{
        AnalysisRecord, DeletionRequest, DocumentStoreError,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryAnalyses {
        records: Mutex<Vec<AnalysisRecord>>,
    }

    impl AnalysisRepository for MemoryAnalyses {
        fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
            self.records.lock().expect("mutex poisoned").push(record.clone());
            Ok(record)
        }

        fn attach_document(&self, _id: &AnalysisId, _path: &str) -> Result<(), RepositoryError> {
            Ok(())
        }

        fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
            let guard = self.records.lock().expect("mutex poisoned");
            Ok(guard.iter().find(|stored| stored.protocol == *id).cloned())
        }

        fn list(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
            Ok(self.records.lock().expect("mutex poisoned").clone())
        }

        fn list_for(&self, username: &str) -> Result<Vec<AnalysisRecord>, RepositoryError> {
            Ok(self
                .list()?
                .into_iter()
                .filter(|record| record.recorded_by == username)
                .collect())
        }

        fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("mutex poisoned");
            guard.retain(|stored| stored.protocol != *id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryDeletions {
        requests: Mutex<Vec<DeletionRequest>>,
    }

    impl DeletionRequestRepository for MemoryDeletions {
        fn insert(&self, request: DeletionRequest) -> Result<DeletionRequest, RepositoryError> {
            self.requests.lock().expect("mutex poisoned").push(request.clone());
            Ok(request)
        }

        fn fetch(&self, id: &Uuid) -> Result<Option<DeletionRequest>, RepositoryError> {
            let guard = self.requests.lock().expect("mutex poisoned");
            Ok(guard.iter().find(|stored| stored.id == *id).cloned())
        }

        fn update(&self, _request: DeletionRequest) -> Result<(), RepositoryError> {
            Ok(())
        }

        fn remove(&self, _id: &Uuid) -> Result<(), RepositoryError> {
            Ok(())
        }

        fn list(&self) -> Result<Vec<DeletionRequest>, RepositoryError> {
            Ok(self.requests.lock().expect("mutex poisoned").clone())
        }
    }

    #[derive(Default)]
    struct NullDocuments;

    impl DocumentStore for NullDocuments {
        fn put(&self, _name: &str, _bytes: Vec<u8>) -> Result<(), DocumentStoreError> {
            Ok(())
        }

        fn remove(&self, _name: &str) -> Result<(), DocumentStoreError> {
            Ok(())
        }
    }

    type Service = AnalysisService<MemoryAnalyses, MemoryDeletions, NullDocuments>;

    fn service() -> Arc<Service> {
        Arc::new(AnalysisService::new(
            Arc::new(MemoryAnalyses::default()),
            Arc::new(MemoryDeletions::default()),
            Arc::new(NullDocuments),
            SlaThresholds::standard(),
        ))
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
    }

    fn scenario_request(fee: i64) -> ScenarioRequest {
        ScenarioRequest {
            client: "Transportes Andrade".to_string(),
            plate: "ABC1D23".to_string(),
            entry_date: date(1),
            exit_date: date(10),
            holidays: 0,
            service: "Corrective".to_string(),
            monthly_fee: Decimal::from(fee),
            parts: Vec::new(),
        }
    }

    #[tokio::test]
    async fn evaluation_endpoint_persists_and_returns_the_view() {
        let request = EvaluationRequest {
            recorded_by: "maria.souza".to_string(),
            client: "Transportes Andrade".to_string(),
            plate: "ABC1D23".to_string(),
            entry_date: date(1),
            exit_date: date(10),
            holidays: 0,
            service: "Corrective".to_string(),
            monthly_fee: Decimal::from(3000),
            recorded_at: None,
        };

        let response =
            evaluate_handler(State(service()), axum::Json(request)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn comparison_endpoint_rejects_single_scenario_sets() {
        let request = ComparisonRequest {
            recorded_by: "maria.souza".to_string(),
            scenarios: vec![scenario_request(3000)],
            recorded_at: None,
        };

        let response = compare_handler(State(service()), axum::Json(request)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn comparison_endpoint_records_two_scenarios() {
        let request = ComparisonRequest {
            recorded_by: "maria.souza".to_string(),
            scenarios: vec![scenario_request(3000), scenario_request(2800)],
            recorded_at: None,
        };

        let response = compare_handler(State(service()), axum::Json(request)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn status_endpoint_requires_a_uuid_protocol() {
        let response =
            status_handler(State(service()), Path("not-a-uuid".to_string())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = status_handler(
            State(service()),
            Path(Uuid::new_v4().to_string()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
