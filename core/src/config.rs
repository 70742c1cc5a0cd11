use crate::{
    calendar::YearRange,
    error::{GenError, GenResult},
    types::Amount,
};
use serde::{Deserialize, Serialize};

/// Trigger-evaluation probabilities for every anomaly rule.
///
/// These are the odds that a rule fires *when it is evaluated*. Rules
/// behind an earlier rule in a first-fire-wins pipeline are evaluated
/// less often, and the late document passes (temporal, round-amount)
/// add flags on top, so none of these are output-label rates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnomalyProbabilities {
    // ── Account pipeline ───────────────────────────
    pub suspicious_email: f64,
    pub invalid_phone: f64,
    pub suspicious_registration: f64,
    pub suspicious_identifier: f64,

    // ── Document pipeline ──────────────────────────
    pub suspicious_amount: f64,
    pub suspicious_bank_identifier: f64,
    pub date_inconsistency: f64,
    /// Coin-flip for swapping a flagged document's payer identifier.
    pub suspicious_payer: f64,

    // ── Late document passes ───────────────────────
    pub duplicate: f64,
    pub temporal: f64,
    pub round_amount: f64,
}

impl Default for AnomalyProbabilities {
    fn default() -> Self {
        Self {
            suspicious_email: 0.15,
            invalid_phone: 0.10,
            suspicious_registration: 0.08,
            suspicious_identifier: 0.07,
            suspicious_amount: 0.12,
            suspicious_bank_identifier: 0.08,
            date_inconsistency: 0.07,
            suspicious_payer: 0.5,
            duplicate: 0.06,
            temporal: 0.8,
            round_amount: 0.4,
        }
    }
}

impl AnomalyProbabilities {
    /// Every trigger disabled. The resulting dataset carries no fraud labels.
    pub fn zero() -> Self {
        Self {
            suspicious_email: 0.0,
            invalid_phone: 0.0,
            suspicious_registration: 0.0,
            suspicious_identifier: 0.0,
            suspicious_amount: 0.0,
            suspicious_bank_identifier: 0.0,
            date_inconsistency: 0.0,
            suspicious_payer: 0.0,
            duplicate: 0.0,
            temporal: 0.0,
            round_amount: 0.0,
        }
    }

    /// Name/value pairs in table order, for validation and reporting.
    pub fn entries(&self) -> [(&'static str, f64); 11] {
        [
            ("suspicious_email", self.suspicious_email),
            ("invalid_phone", self.invalid_phone),
            ("suspicious_registration", self.suspicious_registration),
            ("suspicious_identifier", self.suspicious_identifier),
            ("suspicious_amount", self.suspicious_amount),
            ("suspicious_bank_identifier", self.suspicious_bank_identifier),
            ("date_inconsistency", self.date_inconsistency),
            ("suspicious_payer", self.suspicious_payer),
            ("duplicate", self.duplicate),
            ("temporal", self.temporal),
            ("round_amount", self.round_amount),
        ]
    }
}

/// Relative weights for the paid / pending / overdue status draw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatusWeights {
    pub paid: f64,
    pub pending: f64,
    pub overdue: f64,
}

impl Default for StatusWeights {
    fn default() -> Self {
        Self {
            paid: 0.7,
            pending: 0.2,
            overdue: 0.1,
        }
    }
}

impl StatusWeights {
    pub fn as_array(&self) -> [f64; 3] {
        [self.paid, self.pending, self.overdue]
    }
}

/// Inclusive range for the baseline (non-anomalous) document amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AmountRange {
    pub min: Amount,
    pub max: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub account_count: usize,
    pub document_count: usize,
    pub seed: u64,
    /// Id given to the first generated document. Lets a new batch
    /// continue the id sequence of a dataset that is already loaded.
    pub first_document_id: u64,
    pub registration_years: YearRange,
    pub issue_years: YearRange,
    pub baseline_amount: AmountRange,
    pub status_weights: StatusWeights,
    pub probabilities: AnomalyProbabilities,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            account_count: 1000,
            document_count: 1500,
            seed: 42,
            first_document_id: 1,
            registration_years: YearRange::new(2020, 2025),
            issue_years: YearRange::new(2023, 2025),
            baseline_amount: AmountRange {
                min: Amount::from_major(50.0),
                max: Amount::from_major(5000.0),
            },
            status_weights: StatusWeights::default(),
            probabilities: AnomalyProbabilities::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Small population with default odds. Used by tests.
    pub fn default_test() -> Self {
        Self {
            account_count: 50,
            document_count: 120,
            seed: 12345,
            ..Self::default()
        }
    }

    pub fn with_probabilities(mut self, probabilities: AnomalyProbabilities) -> Self {
        self.probabilities = probabilities;
        self
    }

    /// Fail fast on anything that would make generation meaningless.
    pub fn validate(&self) -> GenResult<()> {
        if self.account_count == 0 {
            return Err(GenError::invalid("account_count", "must be positive"));
        }
        if self.document_count == 0 {
            return Err(GenError::invalid("document_count", "must be positive"));
        }
        if self.first_document_id == 0 {
            return Err(GenError::invalid("first_document_id", "ids start at 1"));
        }
        // Each primary document can bring one duplicate; every id issued
        // must stay representable as a SQLite INTEGER.
        let last_id = (self.document_count as u64)
            .checked_mul(2)
            .and_then(|n| n.checked_add(self.first_document_id));
        if !last_id.is_some_and(|id| id <= i64::MAX as u64) {
            return Err(GenError::invalid(
                "first_document_id",
                format!(
                    "{} leaves no room for {} documents and their duplicates",
                    self.first_document_id, self.document_count
                ),
            ));
        }

        for (name, years) in [
            ("registration_years", self.registration_years),
            ("issue_years", self.issue_years),
        ] {
            if years.start > years.end {
                return Err(GenError::invalid(
                    name,
                    format!("start {} is after end {}", years.start, years.end),
                ));
            }
            if years.start < 1 || years.end > 9999 {
                return Err(GenError::invalid(name, "years must lie in 1..=9999"));
            }
        }

        if self.baseline_amount.min > self.baseline_amount.max {
            return Err(GenError::invalid(
                "baseline_amount",
                format!(
                    "min {} is above max {}",
                    self.baseline_amount.min, self.baseline_amount.max
                ),
            ));
        }

        let weights = self.status_weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(GenError::invalid("status_weights", "weights must be non-negative"));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(GenError::invalid("status_weights", "weights must not all be zero"));
        }

        for (name, p) in self.probabilities.entries() {
            if !(0.0..=1.0).contains(&p) {
                return Err(GenError::invalid(
                    format!("probabilities.{name}"),
                    format!("{p} is outside [0, 1]"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GeneratorConfig::default().validate().unwrap();
        GeneratorConfig::default_test().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "seed": 7, "probabilities": { "duplicate": 1.0 } }"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.account_count, 1000);
        assert_eq!(config.probabilities.duplicate, 1.0);
        assert_eq!(config.probabilities.suspicious_email, 0.15);
    }

    #[test]
    fn id_sequence_must_fit_the_store() {
        let mut config = GeneratorConfig {
            document_count: 10,
            ..GeneratorConfig::default_test()
        };
        config.first_document_id = i64::MAX as u64 - 20;
        config.validate().unwrap();

        config.first_document_id = i64::MAX as u64 - 19;
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidParameter { ref name, .. }) if name == "first_document_id"
        ));

        config.first_document_id = u64::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_probability_is_rejected() {
        let mut config = GeneratorConfig::default_test();
        config.probabilities.temporal = f64::NAN;
        assert!(config.validate().is_err());
    }
}
