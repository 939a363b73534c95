//! Fleet-maintenance SLA analysis: the evaluation and ranking core plus the
//! audit-record surface built around it.
//!
//! The core stays pure. [`evaluation::SlaEvaluator`] and [`scenario::rank`]
//! take and return plain value types; persistence, documents, and review
//! workflows live behind the repository traits wired into
//! [`service::AnalysisService`].

pub mod calendar;
pub mod domain;
pub mod evaluation;
pub mod report;
pub mod repository;
pub mod router;
pub mod scenario;
pub mod service;

pub use domain::{AnalysisId, PartItem, ServiceType, SlaStatus};
pub use evaluation::{SlaEvaluation, SlaEvaluator, SlaThresholds};
pub use report::{DashboardFilter, DashboardSummary, KindFilter, ReportLine};
pub use repository::{
    Analysis, AnalysisRecord, AnalysisRepository, AnalysisStatusView, DeletionRequest,
    DeletionRequestRepository, DeletionStatus, DocumentStore, DocumentStoreError,
    RepositoryError, SimpleSlaAnalysis,
};
pub use router::analysis_router;
pub use scenario::{rank, Ranking, Scenario, ScenarioComparison, ScenarioSet};
pub use service::{AnalysisService, AnalysisServiceError, ScenarioSubmission, SimpleSubmission};
