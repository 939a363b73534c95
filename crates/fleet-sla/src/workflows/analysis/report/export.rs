use crate::money::format_brl;

use super::super::repository::{Analysis, AnalysisRecord};
use super::lines::ReportLine;

/// Error raised while serializing the report export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

const CSV_HEADERS: [&str; 9] = [
    "Protocol",
    "Client",
    "Plate",
    "Service",
    "Final value",
    "Savings",
    "User",
    "Recorded at",
    "Document",
];

/// Serializes report lines to CSV, money in BRL display format. The savings
/// column is left empty when absent, never rendered as a zero amount.
pub fn export_csv(lines: &[ReportLine]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for line in lines {
        writer.write_record([
            line.protocol.to_string(),
            line.client.clone(),
            line.plate.clone(),
            line.service.clone(),
            format_brl(line.final_total),
            line.savings.map(format_brl).unwrap_or_default(),
            line.recorded_by.clone(),
            line.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            line.document_link.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8(bytes).expect("csv writer emits utf-8"))
}

/// Renders the printable report for one analysis record. This is the content
/// handed to the document-rendering collaborator; the protocol tag on the
/// first line ties the artifact back to the audit record.
pub fn render_analysis_document(record: &AnalysisRecord) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&format!("Protocol: {}\n", record.protocol));

    match &record.analysis {
        Analysis::Simple(simple) => {
            out.push_str("SLA result - fleet maintenance\n\n");
            out.push_str(&format!("Client: {}\n", simple.client));
            out.push_str(&format!("Plate: {}\n", simple.plate));
            out.push_str(&format!("Service type: {}\n", simple.evaluation.service));
            out.push_str(&format!(
                "Maintenance business days: {} days\n",
                simple.evaluation.business_days
            ));
            out.push_str(&format!(
                "SLA allowance: {} days\n",
                simple.evaluation.threshold_days
            ));
            out.push_str(&format!(
                "Days beyond SLA: {} days\n",
                simple.evaluation.excess_days
            ));
            out.push_str(&format!(
                "Monthly fee: {}\n",
                format_brl(simple.evaluation.monthly_fee)
            ));
            out.push_str(&format!(
                "Discount amount: {}\n",
                format_brl(simple.evaluation.discount)
            ));
            out.push_str(&format!("Status: {}\n", simple.evaluation.status.label()));
        }
        Analysis::Comparison(comparison) => {
            out.push_str("Scenario comparison report - fleet maintenance SLA\n\n");
            for (index, scenario) in comparison.scenarios.iter().enumerate() {
                out.push_str(&format!("Scenario {}\n", index + 1));
                out.push_str(&format!("  Client: {}\n", scenario.client));
                out.push_str(&format!("  Plate: {}\n", scenario.plate));
                out.push_str(&format!("  Service: {}\n", scenario.evaluation.service));
                out.push_str(&format!(
                    "  Entry: {}  Exit: {}\n",
                    scenario.evaluation.entry_date.format("%d/%m/%Y"),
                    scenario.evaluation.exit_date.format("%d/%m/%Y")
                ));
                out.push_str(&format!(
                    "  Business days: {}  SLA: {}  Excess: {}\n",
                    scenario.evaluation.business_days,
                    scenario.evaluation.threshold_days,
                    scenario.evaluation.excess_days
                ));
                out.push_str(&format!(
                    "  Monthly fee: {}  Discount: {}\n",
                    format_brl(scenario.evaluation.monthly_fee),
                    format_brl(scenario.evaluation.discount)
                ));
                for part in &scenario.parts {
                    out.push_str(&format!(
                        "  - {}: {}\n",
                        part.name,
                        format_brl(part.cost)
                    ));
                }
                out.push_str(&format!(
                    "  Final total: {}\n\n",
                    format_brl(scenario.final_total)
                ));
            }

            let best = comparison.best();
            out.push_str("Best scenario (lowest final cost)\n");
            out.push_str(&format!("  Service: {}\n", best.evaluation.service));
            out.push_str(&format!("  Plate: {}\n", best.plate));
            out.push_str(&format!("  Final total: {}\n", format_brl(best.final_total)));
            if let Some(savings) = comparison.recompute_savings() {
                out.push_str(&format!("  Savings vs. most expensive: {}\n", format_brl(savings)));
            }
        }
    }

    out.into_bytes()
}
