use std::collections::BTreeMap;

use super::super::domain::ServiceType;

/// Read-only mapping from service label to SLA allowance in business days.
///
/// Labels outside the mapping resolve to zero days, the maximally strict
/// allowance. That fallback is part of the contract, not an error path.
#[derive(Debug, Clone)]
pub struct SlaThresholds {
    thresholds: BTreeMap<String, u32>,
}

impl SlaThresholds {
    /// The contracted catalog: Preventive 2, Corrective 3,
    /// Preventive + Corrective 5, Engine 15.
    pub fn standard() -> Self {
        let thresholds = ServiceType::ordered()
            .into_iter()
            .map(|service| (service.label().to_string(), service.threshold_days()))
            .collect();
        Self { thresholds }
    }

    pub fn threshold_for(&self, service_label: &str) -> u32 {
        self.thresholds.get(service_label).copied().unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn with_threshold(mut self, label: &str, days: u32) -> Self {
        self.thresholds.insert(label.to_string(), days);
        self
    }
}

impl Default for SlaThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_matches_contract() {
        let thresholds = SlaThresholds::standard();
        assert_eq!(thresholds.threshold_for("Preventive"), 2);
        assert_eq!(thresholds.threshold_for("Corrective"), 3);
        assert_eq!(thresholds.threshold_for("Preventive + Corrective"), 5);
        assert_eq!(thresholds.threshold_for("Engine"), 15);
    }

    #[test]
    fn unknown_label_resolves_to_zero_days() {
        let thresholds = SlaThresholds::standard();
        assert_eq!(thresholds.threshold_for("Bodywork"), 0);
    }
}
