//! Context block for the external generative-AI assistant.
//!
//! The chat integration itself is a collaborator outside this crate; it only
//! needs a textual summary of application state to ground its answers. This
//! module builds that summary from data the caller already loaded.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::money::format_brl;
use crate::workflows::analysis::{Analysis, AnalysisRecord};

/// Activity figures from the account and ticket stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportCounts {
    pub total_users: usize,
    pub pending_users: usize,
    pub open_tickets: usize,
}

/// Renders the assistant context: analysis history totals, per-user
/// activity, and support queue counts.
pub fn context_summary(records: &[AnalysisRecord], support: SupportCounts) -> String {
    let mut lines = vec!["Application context data:".to_string()];

    lines.push("--- Context: analysis history summary ---".to_string());
    if records.is_empty() {
        lines.push("- (analysis history is empty)".to_string());
    } else {
        let mut total_savings = Decimal::ZERO;
        let mut comparisons = 0usize;
        let mut simple = 0usize;
        let mut by_user: BTreeMap<&str, usize> = BTreeMap::new();

        for record in records {
            match &record.analysis {
                Analysis::Simple(_) => simple += 1,
                Analysis::Comparison(_) => comparisons += 1,
            }
            if let Some(savings) = record.analysis.savings() {
                total_savings += savings;
            }
            *by_user.entry(record.recorded_by.as_str()).or_default() += 1;
        }

        lines.push(format!(
            "- Total savings generated (all time): {}",
            format_brl(total_savings)
        ));
        lines.push(format!("- Scenario comparison analyses: {comparisons}"));
        lines.push(format!("- Simple SLA analyses: {simple}"));
        lines.push("- Activity by user (total analyses):".to_string());
        for (user, count) in by_user {
            lines.push(format!("  - {user}: {count} analyses"));
        }
    }

    lines.push("--- Context: users and support ---".to_string());
    lines.push(format!("- Registered users: {}", support.total_users));
    lines.push(format!(
        "- Users pending approval: {}",
        support.pending_users
    ));
    lines.push(format!("- Open support tickets: {}", support.open_tickets));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::analysis::{
        AnalysisId, Scenario, ScenarioSet, SimpleSlaAnalysis, SlaEvaluator, SlaThresholds,
    };
    use chrono::NaiveDate;

    fn record(by: &str, analysis: Analysis) -> AnalysisRecord {
        AnalysisRecord {
            protocol: AnalysisId::generate(),
            recorded_by: by.to_string(),
            recorded_at: NaiveDate::from_ymd_opt(2024, 4, 2)
                .expect("valid date")
                .and_hms_opt(8, 30, 0)
                .expect("valid time"),
            document_path: None,
            analysis,
        }
    }

    #[test]
    fn summary_covers_history_and_support_queues() {
        let evaluator = SlaEvaluator::new(SlaThresholds::standard());
        let date = |d| NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date");

        let simple = record(
            "maria.souza",
            Analysis::Simple(SimpleSlaAnalysis {
                client: "Transportes Andrade".to_string(),
                plate: "ABC1D23".to_string(),
                evaluation: evaluator.evaluate(date(1), date(2), 0, "Preventive", 1000.into()),
            }),
        );

        let mut set = ScenarioSet::new();
        for fee in [1000i64, 850] {
            let evaluation = evaluator.evaluate(date(1), date(2), 0, "Preventive", fee.into());
            set.add(Scenario::assemble("Viação Norte", "XYZ9A87", evaluation, Vec::new()));
        }
        let comparison = record(
            "joao.lima",
            Analysis::Comparison(set.finalize().expect("two scenarios")),
        );

        let summary = context_summary(
            &[simple, comparison],
            SupportCounts {
                total_users: 5,
                pending_users: 2,
                open_tickets: 1,
            },
        );

        assert!(summary.contains("Total savings generated (all time): R$150,00"));
        assert!(summary.contains("Scenario comparison analyses: 1"));
        assert!(summary.contains("Simple SLA analyses: 1"));
        assert!(summary.contains("maria.souza: 1 analyses"));
        assert!(summary.contains("Users pending approval: 2"));
        assert!(summary.contains("Open support tickets: 1"));
    }

    #[test]
    fn empty_history_is_reported_as_such() {
        let summary = context_summary(&[], SupportCounts::default());
        assert!(summary.contains("analysis history is empty"));
    }
}
