use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use fleet_sla::config::AppConfig;
use fleet_sla::error::AppError;
use fleet_sla::telemetry;
use fleet_sla::workflows::accounts::{AccountService, Sha256PasswordHasher, SuperadminSeed};
use fleet_sla::workflows::analysis::{AnalysisService, SlaThresholds};
use fleet_sla::workflows::support::TicketService;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAnalysisRepository, InMemoryDeletionQueue, InMemoryDocumentStore,
    InMemoryTicketRepository, InMemoryUserRepository, RecordingEmailNotifier,
};
use crate::routes::{with_service_routes, ServiceHandles};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

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
        config.accounts.clone(),
    ));
    let tickets = Arc::new(TicketService::new(Arc::new(
        InMemoryTicketRepository::default(),
    )));

    accounts.bootstrap_superadmin(
        SuperadminSeed {
            username: args.superadmin_username.clone(),
            full_name: "Fleet SLA Superadmin".to_string(),
            employee_id: "00000000".to_string(),
            email: args.superadmin_email.clone(),
            initial_password: None,
        },
        Local::now().naive_local(),
    )?;

    let handles = ServiceHandles {
        analyses,
        accounts,
        tickets,
    };

    let app = with_service_routes(handles)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "fleet SLA service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
