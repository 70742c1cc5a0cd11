//! Weak signal: a clean document whose total has no cents.

use crate::{document::Document, rng::GenRng};

/// Flag `document` with `probability` when it is still clean and its
/// amount is a whole number. Returns true when the flag was set.
pub fn apply_round_amount(document: &mut Document, probability: f64, rng: &mut GenRng) -> bool {
    if document.anomaly_flag || !document.amount.is_whole() {
        return false;
    }
    if !rng.chance(probability) {
        return false;
    }
    document.anomaly_flag = true;
    true
}
