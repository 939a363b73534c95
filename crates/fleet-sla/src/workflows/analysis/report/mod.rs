mod dashboard;
mod export;
mod lines;

pub use dashboard::{
    build_dashboard, DashboardFilter, DashboardSummary, KindFilter, MonthlyEntry, UserActivity,
};
pub use export::{export_csv, render_analysis_document, ExportError};
pub use lines::ReportLine;
