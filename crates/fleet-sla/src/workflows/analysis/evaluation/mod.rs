mod config;
mod rules;

pub use config::SlaThresholds;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calendar;
use super::domain::SlaStatus;

/// Stateless evaluator applying the contracted thresholds to one maintenance
/// window.
///
/// The evaluator never rejects numeric input: inverted ranges, oversized
/// holiday counts, and unknown service labels all degrade to the clamped
/// values described on [`SlaEvaluation`]. Date ordering is validated at the
/// form boundary, before this type is reached.
#[derive(Debug, Clone, Default)]
pub struct SlaEvaluator {
    thresholds: SlaThresholds,
}

impl SlaEvaluator {
    pub fn new(thresholds: SlaThresholds) -> Self {
        Self { thresholds }
    }

    pub fn evaluate(
        &self,
        entry_date: NaiveDate,
        exit_date: NaiveDate,
        holidays: u32,
        service_label: &str,
        monthly_fee: Decimal,
    ) -> SlaEvaluation {
        let raw = calendar::maintenance_business_days(entry_date, exit_date);
        let business_days = rules::net_business_days(raw, holidays);
        let threshold_days = self.thresholds.threshold_for(service_label);
        let excess_days = rules::excess_days(business_days, threshold_days);
        let discount = rules::pro_rated_discount(monthly_fee, excess_days);
        let status = if business_days <= threshold_days {
            SlaStatus::WithinSla
        } else {
            SlaStatus::OutOfSla
        };

        SlaEvaluation {
            entry_date,
            exit_date,
            holidays,
            service: service_label.to_string(),
            monthly_fee,
            business_days,
            threshold_days,
            excess_days,
            discount,
            status,
        }
    }
}

/// Immutable outcome of one SLA evaluation.
///
/// `business_days` counts weekdays over the window with both endpoints
/// inclusive, minus holidays, never negative. `discount` pro-rates the
/// monthly fee over a fixed 30-day month for each excess day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaEvaluation {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub holidays: u32,
    pub service: String,
    pub monthly_fee: Decimal,
    pub business_days: u32,
    pub threshold_days: u32,
    pub excess_days: u32,
    pub discount: Decimal,
    pub status: SlaStatus,
}

impl SlaEvaluation {
    /// Monthly fee net of the SLA discount.
    pub fn discounted_fee(&self) -> Decimal {
        self.monthly_fee - self.discount
    }
}
