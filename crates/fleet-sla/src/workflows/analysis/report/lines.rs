use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use super::super::domain::AnalysisId;
use super::super::repository::AnalysisRecord;

/// One flattened report row, shared by the listing endpoints and the CSV
/// export. Monetary fields stay decimal; formatting happens at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
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
    pub document_link: Option<String>,
}

impl ReportLine {
    /// Flattens a stored record. `document_base_url`, when present, turns the
    /// stored document path into a downloadable link.
    pub fn from_record(record: &AnalysisRecord, document_base_url: Option<&str>) -> Self {
        let document_link = record.document_path.as_deref().map(|path| match document_base_url {
            Some(base) => format!("{}/documents/{}", base.trim_end_matches('/'), path),
            None => path.to_string(),
        });

        Self {
            protocol: record.protocol,
            kind: record.analysis.kind_label(),
            client: record.analysis.client().to_string(),
            plate: record.analysis.plate().to_string(),
            service: record.analysis.service().to_string(),
            final_total: record.analysis.final_total(),
            savings: record.analysis.savings(),
            recorded_by: record.recorded_by.clone(),
            recorded_at: record.recorded_at,
            document_link,
        }
    }
}
