use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use super::domain::{AnalysisId, PartItem};
use super::evaluation::{SlaEvaluator, SlaThresholds};
use super::report::{build_dashboard, export_csv, render_analysis_document};
use super::report::{DashboardFilter, DashboardSummary, ExportError, ReportLine};
use super::repository::{
    Analysis, AnalysisRecord, AnalysisRepository, DeletionRequest, DeletionRequestRepository,
    DeletionStatus, DocumentStore, RepositoryError, SimpleSlaAnalysis,
};
use super::scenario::{Scenario, ScenarioSet};

/// Inputs collected by the simple calculator form.
#[derive(Debug, Clone)]
pub struct SimpleSubmission {
    pub client: String,
    pub plate: String,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub holidays: u32,
    pub service: String,
    pub monthly_fee: Decimal,
}

/// Inputs collected for one scenario of a comparison session.
#[derive(Debug, Clone)]
pub struct ScenarioSubmission {
    pub client: String,
    pub plate: String,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub holidays: u32,
    pub service: String,
    pub monthly_fee: Decimal,
    pub parts: Vec<PartItem>,
}

/// Service composing the evaluator, audit repository, deletion queue, and
/// document store. The form-boundary preconditions (date ordering,
/// non-negative money) are enforced here so the evaluator below stays total.
pub struct AnalysisService<R, Q, D> {
    repository: Arc<R>,
    deletions: Arc<Q>,
    documents: Arc<D>,
    evaluator: SlaEvaluator,
}

impl<R, Q, D> AnalysisService<R, Q, D>
where
    R: AnalysisRepository + 'static,
    Q: DeletionRequestRepository + 'static,
    D: DocumentStore + 'static,
{
    pub fn new(
        repository: Arc<R>,
        deletions: Arc<Q>,
        documents: Arc<D>,
        thresholds: SlaThresholds,
    ) -> Self {
        Self {
            repository,
            deletions,
            documents,
            evaluator: SlaEvaluator::new(thresholds),
        }
    }

    /// Runs the simple calculator and persists the outcome as an audit
    /// record with a fresh protocol.
    pub fn record_simple(
        &self,
        recorded_by: &str,
        submission: SimpleSubmission,
        recorded_at: NaiveDateTime,
    ) -> Result<AnalysisRecord, AnalysisServiceError> {
        validate_window(submission.entry_date, submission.exit_date)?;
        validate_fee(submission.monthly_fee)?;

        let evaluation = self.evaluator.evaluate(
            submission.entry_date,
            submission.exit_date,
            submission.holidays,
            &submission.service,
            submission.monthly_fee,
        );

        let analysis = Analysis::Simple(SimpleSlaAnalysis {
            client: submission.client,
            plate: submission.plate,
            evaluation,
        });

        self.persist(recorded_by, analysis, recorded_at)
    }

    /// Validates and evaluates one scenario for an in-progress comparison
    /// session. The scenario is returned to the caller's session state, not
    /// persisted.
    pub fn build_scenario(
        &self,
        submission: ScenarioSubmission,
    ) -> Result<Scenario, AnalysisServiceError> {
        validate_window(submission.entry_date, submission.exit_date)?;
        validate_fee(submission.monthly_fee)?;
        if let Some(part) = submission
            .parts
            .iter()
            .find(|part| part.cost < Decimal::ZERO)
        {
            return Err(AnalysisServiceError::NegativePartCost {
                part: part.name.clone(),
            });
        }

        let evaluation = self.evaluator.evaluate(
            submission.entry_date,
            submission.exit_date,
            submission.holidays,
            &submission.service,
            submission.monthly_fee,
        );

        Ok(Scenario::assemble(
            submission.client,
            submission.plate,
            evaluation,
            submission.parts,
        ))
    }

    /// Finalizes a comparison session into one atomic audit record. The
    /// compare action is gated at two scenarios.
    pub fn record_comparison(
        &self,
        recorded_by: &str,
        session: &ScenarioSet,
        recorded_at: NaiveDateTime,
    ) -> Result<AnalysisRecord, AnalysisServiceError> {
        if session.len() < 2 {
            return Err(AnalysisServiceError::NotEnoughScenarios {
                provided: session.len(),
            });
        }

        let comparison = session
            .finalize()
            .expect("session with two or more scenarios finalizes");

        self.persist(recorded_by, Analysis::Comparison(comparison), recorded_at)
    }

    fn persist(
        &self,
        recorded_by: &str,
        analysis: Analysis,
        recorded_at: NaiveDateTime,
    ) -> Result<AnalysisRecord, AnalysisServiceError> {
        let protocol = AnalysisId::generate();
        let record = AnalysisRecord {
            protocol,
            recorded_by: recorded_by.to_string(),
            recorded_at,
            document_path: None,
            analysis,
        };

        // The record is the source of truth; the rendered document follows
        // and only ever updates the pointer, never the figures.
        let mut stored = self.repository.insert(record)?;
        let document_name = format!(
            "{}_{}_{}.txt",
            stored.analysis.kind_label(),
            recorded_by,
            protocol
        );
        let document = render_analysis_document(&stored);
        match self.documents.put(&document_name, document) {
            Ok(()) => {
                self.repository.attach_document(&protocol, &document_name)?;
                stored.document_path = Some(document_name);
            }
            Err(err) => warn!(%protocol, "report document upload failed: {err}"),
        }

        Ok(stored)
    }

    pub fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, AnalysisServiceError> {
        Ok(self.repository.fetch(id)?)
    }

    /// Full record listing, newest-first.
    pub fn records(&self) -> Result<Vec<AnalysisRecord>, AnalysisServiceError> {
        Ok(self.repository.list()?)
    }

    /// Flattened report rows over all records, newest-first.
    pub fn report_lines(
        &self,
        document_base_url: Option<&str>,
    ) -> Result<Vec<ReportLine>, AnalysisServiceError> {
        let records = self.repository.list()?;
        Ok(records
            .iter()
            .map(|record| ReportLine::from_record(record, document_base_url))
            .collect())
    }

    /// Report rows restricted to one user's own history.
    pub fn report_lines_for(
        &self,
        username: &str,
        document_base_url: Option<&str>,
    ) -> Result<Vec<ReportLine>, AnalysisServiceError> {
        let records = self.repository.list_for(username)?;
        Ok(records
            .iter()
            .map(|record| ReportLine::from_record(record, document_base_url))
            .collect())
    }

    pub fn export_report_csv(
        &self,
        document_base_url: Option<&str>,
    ) -> Result<String, AnalysisServiceError> {
        let lines = self.report_lines(document_base_url)?;
        Ok(export_csv(&lines)?)
    }

    pub fn dashboard(
        &self,
        filter: &DashboardFilter,
    ) -> Result<DashboardSummary, AnalysisServiceError> {
        let records = self.repository.list()?;
        Ok(build_dashboard(&records, filter))
    }

    /// Files a deletion request for review. The analysis must exist.
    pub fn request_deletion(
        &self,
        analysis_id: &AnalysisId,
        requested_by: &str,
        now: NaiveDateTime,
    ) -> Result<DeletionRequest, AnalysisServiceError> {
        let record = self
            .repository
            .fetch(analysis_id)?
            .ok_or(RepositoryError::NotFound)?;

        let request = DeletionRequest {
            id: Uuid::new_v4(),
            created_at: now,
            analysis_id: record.protocol,
            document_path: record.document_path,
            requested_by: requested_by.to_string(),
            status: DeletionStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
        };

        Ok(self.deletions.insert(request)?)
    }

    /// Approves or rejects a pending request. Approval deletes the analysis
    /// and its report document; the request itself is retained as audit.
    pub fn review_deletion(
        &self,
        request_id: &Uuid,
        approve: bool,
        reviewed_by: &str,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> Result<DeletionRequest, AnalysisServiceError> {
        let mut request = self
            .deletions
            .fetch(request_id)?
            .ok_or(RepositoryError::NotFound)?;

        if request.status != DeletionStatus::Pending {
            return Err(AnalysisServiceError::AlreadyReviewed {
                status: request.status,
            });
        }

        if approve {
            self.repository.delete(&request.analysis_id)?;
            if let Some(path) = &request.document_path {
                if let Err(err) = self.documents.remove(path) {
                    warn!(
                        document = %path,
                        "report document removal failed (may already be gone): {err}"
                    );
                }
            }
            request.status = DeletionStatus::Approved;
            request.review_notes = None;
        } else {
            request.status = DeletionStatus::Rejected;
            request.review_notes = notes;
        }
        request.reviewed_by = Some(reviewed_by.to_string());
        request.reviewed_at = Some(now);

        self.deletions.update(request.clone())?;
        Ok(request)
    }

    /// Removes a rejected request once the requesting user has seen the
    /// outcome.
    pub fn dismiss_rejected(&self, request_id: &Uuid) -> Result<(), AnalysisServiceError> {
        let request = self
            .deletions
            .fetch(request_id)?
            .ok_or(RepositoryError::NotFound)?;

        if request.status != DeletionStatus::Rejected {
            return Err(AnalysisServiceError::NotDismissable {
                status: request.status,
            });
        }

        Ok(self.deletions.remove(request_id)?)
    }

    pub fn deletion_requests(&self) -> Result<Vec<DeletionRequest>, AnalysisServiceError> {
        Ok(self.deletions.list()?)
    }
}

fn validate_window(entry: NaiveDate, exit: NaiveDate) -> Result<(), AnalysisServiceError> {
    if exit <= entry {
        return Err(AnalysisServiceError::InvalidDateRange { entry, exit });
    }
    Ok(())
}

fn validate_fee(monthly_fee: Decimal) -> Result<(), AnalysisServiceError> {
    if monthly_fee < Decimal::ZERO {
        return Err(AnalysisServiceError::NegativeMonthlyFee);
    }
    Ok(())
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("exit date {exit} must be after entry date {entry}")]
    InvalidDateRange { entry: NaiveDate, exit: NaiveDate },
    #[error("monthly fee must not be negative")]
    NegativeMonthlyFee,
    #[error("part '{part}' has a negative cost")]
    NegativePartCost { part: String },
    #[error("a comparison needs at least 2 scenarios, got {provided}")]
    NotEnoughScenarios { provided: usize },
    #[error("deletion request was already reviewed ({})", .status.label())]
    AlreadyReviewed { status: DeletionStatus },
    #[error("only rejected requests can be dismissed ({})", .status.label())]
    NotDismissable { status: DeletionStatus },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
