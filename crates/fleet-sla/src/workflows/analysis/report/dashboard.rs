use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::super::repository::{Analysis, AnalysisRecord};

/// Restricts a dashboard build to one analysis kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFilter {
    SimpleSla,
    ScenarioComparison,
}

impl KindFilter {
    fn matches(self, analysis: &Analysis) -> bool {
        match (self, analysis) {
            (KindFilter::SimpleSla, Analysis::Simple(_)) => true,
            (KindFilter::ScenarioComparison, Analysis::Comparison(_)) => true,
            _ => false,
        }
    }
}

/// Optional year/month/kind restriction over the record set. `None` fields
/// mean "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DashboardFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub kind: Option<KindFilter>,
}

impl DashboardFilter {
    fn matches(&self, record: &AnalysisRecord) -> bool {
        let recorded = record.recorded_at.date();
        if self.year.is_some_and(|year| recorded.year() != year) {
            return false;
        }
        if self.month.is_some_and(|month| recorded.month() != month) {
            return false;
        }
        if let Some(kind) = self.kind {
            return kind.matches(&record.analysis);
        }
        true
    }

    /// Historical series are only meaningful without a period restriction.
    fn unrestricted_period(&self) -> bool {
        self.year.is_none() && self.month.is_none()
    }
}

/// Per-user activity count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserActivity {
    pub username: String,
    pub analyses: usize,
}

/// One month of the historical series, keyed `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyEntry {
    pub month: String,
    pub analyses: usize,
    pub savings: Decimal,
}

/// Aggregated view backing the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_savings: Decimal,
    pub total_analyses: usize,
    pub comparison_count: usize,
    pub simple_count: usize,
    pub by_user: Vec<UserActivity>,
    /// Present only when the filter leaves the period unrestricted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly: Option<Vec<MonthlyEntry>>,
}

/// Builds the dashboard aggregation over the record set. Savings contribute
/// only where defined (comparisons with a positive spread).
pub fn build_dashboard(records: &[AnalysisRecord], filter: &DashboardFilter) -> DashboardSummary {
    let mut total_savings = Decimal::ZERO;
    let mut comparison_count = 0usize;
    let mut simple_count = 0usize;
    let mut by_user: BTreeMap<String, usize> = BTreeMap::new();

    for record in records.iter().filter(|record| filter.matches(record)) {
        match &record.analysis {
            Analysis::Simple(_) => simple_count += 1,
            Analysis::Comparison(_) => comparison_count += 1,
        }
        if let Some(savings) = record.analysis.savings() {
            total_savings += savings;
        }
        *by_user.entry(record.recorded_by.clone()).or_default() += 1;
    }

    let mut by_user: Vec<UserActivity> = by_user
        .into_iter()
        .map(|(username, analyses)| UserActivity { username, analyses })
        .collect();
    by_user.sort_by(|a, b| b.analyses.cmp(&a.analyses).then(a.username.cmp(&b.username)));

    let monthly = filter.unrestricted_period().then(|| {
        let mut months: BTreeMap<String, MonthlyEntry> = BTreeMap::new();
        for record in records.iter().filter(|record| filter.matches(record)) {
            let key = record.recorded_at.format("%Y-%m").to_string();
            let entry = months.entry(key.clone()).or_insert_with(|| MonthlyEntry {
                month: key,
                analyses: 0,
                savings: Decimal::ZERO,
            });
            entry.analyses += 1;
            if let Some(savings) = record.analysis.savings() {
                entry.savings += savings;
            }
        }
        months.into_values().collect()
    });

    DashboardSummary {
        total_savings,
        total_analyses: comparison_count + simple_count,
        comparison_count,
        simple_count,
        by_user,
        monthly,
    }
}
