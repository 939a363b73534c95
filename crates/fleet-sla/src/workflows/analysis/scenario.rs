use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::PartItem;
use super::evaluation::SlaEvaluation;

/// One fully evaluated maintenance scenario under comparison: the SLA outcome
/// plus itemized extra-part costs and the resulting final total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub client: String,
    pub plate: String,
    pub evaluation: SlaEvaluation,
    pub parts: Vec<PartItem>,
    pub parts_total: Decimal,
    pub final_total: Decimal,
}

impl Scenario {
    /// Assembles a scenario from an evaluation and its part line items.
    /// `final_total = (monthly_fee - discount) + parts_total`.
    pub fn assemble(
        client: impl Into<String>,
        plate: impl Into<String>,
        evaluation: SlaEvaluation,
        parts: Vec<PartItem>,
    ) -> Self {
        let parts_total: Decimal = parts.iter().map(|part| part.cost).sum();
        let final_total = evaluation.discounted_fee() + parts_total;

        Self {
            client: client.into(),
            plate: plate.into(),
            evaluation,
            parts,
            parts_total,
            final_total,
        }
    }
}

/// Session-scoped working state for one comparison: scenarios accumulate
/// through repeated submissions and are discarded on reset. Only the
/// finalized comparison is ever persisted.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    pub fn reset(&mut self) {
        self.scenarios.clear();
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Finalizes the set into a persistable comparison. Callers gate the
    /// compare action at two or more scenarios; an empty set yields `None`.
    pub fn finalize(&self) -> Option<ScenarioComparison> {
        let ranking = rank(&self.scenarios)?;
        Some(ScenarioComparison {
            scenarios: self.scenarios.clone(),
            best_index: ranking.best_index,
            savings: ranking.savings,
        })
    }
}

/// Outcome of ranking a scenario sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranking {
    /// Index of the cheapest scenario; ties resolve to the first occurrence.
    pub best_index: usize,
    /// `max - min` of the final totals, present only with two or more
    /// scenarios and a strictly positive spread. Never present-but-zero:
    /// downstream display renders nothing rather than `R$0,00`.
    pub savings: Option<Decimal>,
}

/// Ranks scenarios by final total. Returns `None` for an empty sequence;
/// callers must gate the compare action before invoking.
pub fn rank(scenarios: &[Scenario]) -> Option<Ranking> {
    let first = scenarios.first()?;

    let mut best_index = 0;
    let mut min = first.final_total;
    let mut max = first.final_total;
    for (index, scenario) in scenarios.iter().enumerate().skip(1) {
        if scenario.final_total < min {
            min = scenario.final_total;
            best_index = index;
        }
        if scenario.final_total > max {
            max = scenario.final_total;
        }
    }

    let spread = max - min;
    let savings = (scenarios.len() >= 2 && spread > Decimal::ZERO).then_some(spread);

    Some(Ranking {
        best_index,
        savings,
    })
}

/// Finalized comparison persisted as a single atomic record: every scenario,
/// the winning index, and the savings spread when reportable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenarios: Vec<Scenario>,
    pub best_index: usize,
    pub savings: Option<Decimal>,
}

impl ScenarioComparison {
    pub fn best(&self) -> &Scenario {
        &self.scenarios[self.best_index]
    }

    /// Recomputes the savings spread from the stored totals, in decimal
    /// arithmetic. Mirrors the ranking rule: absent below two scenarios or
    /// when the spread is zero.
    pub fn recompute_savings(&self) -> Option<Decimal> {
        rank(&self.scenarios)?.savings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::analysis::evaluation::{SlaEvaluator, SlaThresholds};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn scenario_with_total(fee: i64, parts: i64) -> Scenario {
        let evaluator = SlaEvaluator::new(SlaThresholds::standard());
        let evaluation = evaluator.evaluate(
            date(2024, 1, 1),
            date(2024, 1, 2),
            0,
            "Preventive",
            Decimal::from(fee),
        );
        let parts = if parts > 0 {
            vec![PartItem {
                name: "Brake pads".to_string(),
                cost: Decimal::from(parts),
            }]
        } else {
            Vec::new()
        };
        Scenario::assemble("Transportes Andrade", "ABC1D23", evaluation, parts)
    }

    #[test]
    fn final_total_combines_discounted_fee_and_parts() {
        let scenario = scenario_with_total(3000, 250);
        assert_eq!(scenario.parts_total, Decimal::from(250));
        assert_eq!(scenario.final_total, Decimal::from(3250));
    }

    #[test]
    fn best_is_the_minimum_total() {
        let scenarios = vec![
            scenario_with_total(1000, 0),
            scenario_with_total(850, 0),
            scenario_with_total(1200, 0),
        ];

        let ranking = rank(&scenarios).expect("non-empty");
        assert_eq!(ranking.best_index, 1);
        assert_eq!(ranking.savings, Some(Decimal::from(350)));
    }

    #[test]
    fn ranking_is_invariant_under_permutation() {
        let mut scenarios = vec![
            scenario_with_total(1000, 0),
            scenario_with_total(850, 0),
            scenario_with_total(1200, 0),
        ];

        let baseline = rank(&scenarios).expect("non-empty");
        let baseline_best = scenarios[baseline.best_index].final_total;
        scenarios.rotate_left(1);
        let rotated = rank(&scenarios).expect("non-empty");

        assert_eq!(baseline_best, Decimal::from(850));
        assert_eq!(scenarios[rotated.best_index].final_total, baseline_best);
        assert_eq!(baseline.savings, rotated.savings);
    }

    #[test]
    fn ties_resolve_to_the_first_occurrence() {
        let scenarios = vec![scenario_with_total(900, 0), scenario_with_total(900, 0)];

        let ranking = rank(&scenarios).expect("non-empty");
        assert_eq!(ranking.best_index, 0);
        assert_eq!(ranking.savings, None);
    }

    #[test]
    fn single_scenario_reports_no_savings() {
        let scenarios = vec![scenario_with_total(900, 0)];
        let ranking = rank(&scenarios).expect("non-empty");
        assert_eq!(ranking.savings, None);
    }

    #[test]
    fn empty_sequence_yields_none() {
        assert!(rank(&[]).is_none());
        assert!(ScenarioSet::new().finalize().is_none());
    }

    #[test]
    fn finalize_preserves_insertion_order_and_winner() {
        let mut set = ScenarioSet::new();
        set.add(scenario_with_total(1000, 0));
        set.add(scenario_with_total(850, 0));
        set.add(scenario_with_total(1200, 0));

        let comparison = set.finalize().expect("two or more scenarios");
        assert_eq!(comparison.scenarios.len(), 3);
        assert_eq!(comparison.best().final_total, Decimal::from(850));
        assert_eq!(comparison.savings, Some(Decimal::from(350)));
        assert_eq!(comparison.recompute_savings(), Some(Decimal::from(350)));
    }

    #[test]
    fn reset_discards_session_state() {
        let mut set = ScenarioSet::new();
        set.add(scenario_with_total(1000, 0));
        set.reset();
        assert!(set.is_empty());
    }
}
