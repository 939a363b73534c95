use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::AnalysisId;
use super::evaluation::SlaEvaluation;
use super::scenario::ScenarioComparison;

/// The two persisted analysis shapes. Always one of these variants, never an
/// open-ended map: report extraction and rendering match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Analysis {
    Simple(SimpleSlaAnalysis),
    Comparison(ScenarioComparison),
}

impl Analysis {
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Analysis::Simple(_) => "simple_sla",
            Analysis::Comparison(_) => "scenario_comparison",
        }
    }

    pub fn client(&self) -> &str {
        match self {
            Analysis::Simple(simple) => &simple.client,
            Analysis::Comparison(comparison) => &comparison.best().client,
        }
    }

    pub fn plate(&self) -> &str {
        match self {
            Analysis::Simple(simple) => &simple.plate,
            Analysis::Comparison(comparison) => &comparison.best().plate,
        }
    }

    pub fn service(&self) -> &str {
        match self {
            Analysis::Simple(simple) => &simple.evaluation.service,
            Analysis::Comparison(comparison) => &comparison.best().evaluation.service,
        }
    }

    /// Billable figure for report listings: the discounted fee for a simple
    /// analysis, the winning scenario's final total for a comparison.
    pub fn final_total(&self) -> Decimal {
        match self {
            Analysis::Simple(simple) => simple.evaluation.discounted_fee(),
            Analysis::Comparison(comparison) => comparison.best().final_total,
        }
    }

    /// Savings spread, defined only for comparisons and only when reportable.
    pub fn savings(&self) -> Option<Decimal> {
        match self {
            Analysis::Simple(_) => None,
            Analysis::Comparison(comparison) => comparison.recompute_savings(),
        }
    }
}

/// Single-vehicle SLA check persisted from the simple calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleSlaAnalysis {
    pub client: String,
    pub plate: String,
    pub evaluation: SlaEvaluation,
}

/// Audit record wrapping an analysis with its protocol identity. The computed
/// figures never change after insertion; the only permitted update is the
/// report document pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub protocol: AnalysisId,
    pub recorded_by: String,
    pub recorded_at: NaiveDateTime,
    pub document_path: Option<String>,
    pub analysis: Analysis,
}

/// Storage abstraction so the service module can be exercised in isolation.
/// Listings are ordered newest-first.
pub trait AnalysisRepository: Send + Sync {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError>;
    fn attach_document(&self, id: &AnalysisId, path: &str) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<AnalysisRecord>, RepositoryError>;
    fn list_for(&self, username: &str) -> Result<Vec<AnalysisRecord>, RepositoryError>;
    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Review state of a deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionStatus {
    Pending,
    Approved,
    Rejected,
}

impl DeletionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DeletionStatus::Pending => "pending",
            DeletionStatus::Approved => "approved",
            DeletionStatus::Rejected => "rejected",
        }
    }
}

/// A user's request to remove a persisted analysis, reviewed by a superadmin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionRequest {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub analysis_id: AnalysisId,
    pub document_path: Option<String>,
    pub requested_by: String,
    pub status: DeletionStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<NaiveDateTime>,
    pub review_notes: Option<String>,
}

/// Queue of deletion requests awaiting review. Listings are newest-first.
pub trait DeletionRequestRepository: Send + Sync {
    fn insert(&self, request: DeletionRequest) -> Result<DeletionRequest, RepositoryError>;
    fn fetch(&self, id: &Uuid) -> Result<Option<DeletionRequest>, RepositoryError>;
    fn update(&self, request: DeletionRequest) -> Result<(), RepositoryError>;
    fn remove(&self, id: &Uuid) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<DeletionRequest>, RepositoryError>;
}

/// Blob storage seam for rendered report documents.
pub trait DocumentStore: Send + Sync {
    fn put(&self, name: &str, bytes: Vec<u8>) -> Result<(), DocumentStoreError>;
    fn remove(&self, name: &str) -> Result<(), DocumentStoreError>;
}

/// Document storage dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("document storage unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a stored analysis for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStatusView {
    pub protocol: AnalysisId,
    pub kind: &'static str,
    pub client: String,
    pub plate: String,
    pub service: String,
    pub final_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<Decimal>,
    pub recorded_by: String,
    pub recorded_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_path: Option<String>,
}

impl AnalysisRecord {
    pub fn status_view(&self) -> AnalysisStatusView {
        AnalysisStatusView {
            protocol: self.protocol,
            kind: self.analysis.kind_label(),
            client: self.analysis.client().to_string(),
            plate: self.analysis.plate().to_string(),
            service: self.analysis.service().to_string(),
            final_total: self.analysis.final_total(),
            savings: self.analysis.savings(),
            recorded_by: self.recorded_by.clone(),
            recorded_at: self.recorded_at,
            document_path: self.document_path.clone(),
        }
    }
}
