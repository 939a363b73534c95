use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use fleet_sla::error::AppError;
use fleet_sla::money::format_brl;
use fleet_sla::workflows::analysis::report::render_analysis_document;
use fleet_sla::workflows::analysis::{
    AnalysisService, DashboardFilter, PartItem, ScenarioSet, ScenarioSubmission,
    SimpleSubmission, SlaEvaluator, SlaThresholds,
};

use crate::infra::{InMemoryAnalysisRepository, InMemoryDeletionQueue, InMemoryDocumentStore};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Maintenance entry date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) entry: NaiveDate,
    /// Maintenance exit date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) exit: NaiveDate,
    /// Holidays falling inside the window
    #[arg(long, default_value_t = 0)]
    pub(crate) holidays: u32,
    /// Service label (Preventive, Corrective, Preventive + Corrective, Engine)
    #[arg(long)]
    pub(crate) service: String,
    /// Monthly fee for the contract line, e.g. 3000.00
    #[arg(long)]
    pub(crate) monthly_fee: rust_decimal::Decimal,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Maintenance entry date for the demo window (YYYY-MM-DD). Defaults to
    /// the most recent Monday.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) entry: Option<NaiveDate>,
}

/// Offline calculator: evaluates one window and prints the outcome.
pub(crate) fn run_sla_evaluation(args: EvaluateArgs) -> Result<(), AppError> {
    let evaluator = SlaEvaluator::new(SlaThresholds::standard());
    let outcome = evaluator.evaluate(
        args.entry,
        args.exit,
        args.holidays,
        &args.service,
        args.monthly_fee,
    );

    println!("SLA evaluation");
    println!("  Service: {}", outcome.service);
    println!(
        "  Window: {} to {} ({} holidays)",
        outcome.entry_date, outcome.exit_date, outcome.holidays
    );
    println!("  Business days: {}", outcome.business_days);
    println!("  SLA allowance: {} days", outcome.threshold_days);
    println!("  Excess days: {}", outcome.excess_days);
    println!("  Monthly fee: {}", format_brl(outcome.monthly_fee));
    println!("  Discount: {}", format_brl(outcome.discount));
    println!("  Status: {}", outcome.status.label());

    Ok(())
}

/// End-to-end walkthrough: records a simple analysis and a three-scenario
/// comparison, then prints the rendered report, CSV export, and dashboard.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let entry = args.entry.unwrap_or_else(|| {
        let today = Local::now().date_naive();
        today - chrono::Duration::days(i64::from(today.weekday().num_days_from_monday()))
    });
    let recorded_at = Local::now().naive_local();

    let service = AnalysisService::new(
        Arc::new(InMemoryAnalysisRepository::default()),
        Arc::new(InMemoryDeletionQueue::default()),
        Arc::new(InMemoryDocumentStore::default()),
        SlaThresholds::standard(),
    );

    println!("Fleet SLA demo\n");

    let simple = service.record_simple(
        "demo.user",
        SimpleSubmission {
            client: "Transportes Andrade".to_string(),
            plate: "ABC1D23".to_string(),
            entry_date: entry,
            exit_date: entry + chrono::Duration::days(9),
            holidays: 0,
            service: "Corrective".to_string(),
            monthly_fee: 3000.into(),
        },
        recorded_at,
    )?;
    println!("{}", String::from_utf8_lossy(&render_analysis_document(&simple)));

    let mut session = ScenarioSet::new();
    for (label, fee, parts) in [
        ("Corrective", 3000i64, Vec::new()),
        ("Preventive", 2800, Vec::new()),
        (
            "Engine",
            3200,
            vec![PartItem {
                name: "Turbocharger".to_string(),
                cost: 450.into(),
            }],
        ),
    ] {
        let scenario = service.build_scenario(ScenarioSubmission {
            client: "Transportes Andrade".to_string(),
            plate: "ABC1D23".to_string(),
            entry_date: entry,
            exit_date: entry + chrono::Duration::days(9),
            holidays: 1,
            service: label.to_string(),
            monthly_fee: fee.into(),
            parts,
        })?;
        session.add(scenario);
    }

    let comparison = service.record_comparison("demo.user", &session, recorded_at)?;
    println!(
        "{}",
        String::from_utf8_lossy(&render_analysis_document(&comparison))
    );

    println!("Report export (CSV)\n{}", service.export_report_csv(None)?);

    let dashboard = service.dashboard(&DashboardFilter::default())?;
    println!("Dashboard");
    println!("  Analyses: {}", dashboard.total_analyses);
    println!("  Savings generated: {}", format_brl(dashboard.total_savings));

    Ok(())
}
