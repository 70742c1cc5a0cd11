//! Duplicate document injection.
//!
//! A duplicate references the same account, is issued 1-72 hours after
//! the original, gets the next id from the context counter and is
//! always flagged. Its amount follows one of four strategies.

use crate::{
    calendar::plus_hours,
    context::GenContext,
    document::Document,
    error::GenResult,
    trace::TraceEvent,
};
use serde::{Deserialize, Serialize};

pub const SHIFT_HOURS: (i64, i64) = (1, 72);
pub const JITTER_FACTOR: (f64, f64) = (0.95, 1.05);
pub const SPLIT_FRACTION: (f64, f64) = (0.3, 0.7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStrategy {
    /// Same amount as the original.
    Identical,
    /// Original amount ±5%.
    Jittered,
    /// Duplicate takes 30-70% of the original; the original keeps the rest.
    Split,
    /// Original amount rounded to a whole unit.
    Rounded,
}

impl DuplicateStrategy {
    pub const ALL: [DuplicateStrategy; 4] = [Self::Identical, Self::Jittered, Self::Split, Self::Rounded];
}

/// With `probability`, build a duplicate of `original`.
///
/// `original` must still be pending: the split strategy reduces its
/// amount in place.
pub fn maybe_duplicate(
    original: &mut Document,
    probability: f64,
    ctx: &mut GenContext,
) -> GenResult<Option<Document>> {
    if !ctx.rng.chance(probability) {
        return Ok(None);
    }

    let duplicate_id = ctx.next_document_id()?;
    let shift = ctx.rng.range_inclusive(SHIFT_HOURS.0, SHIFT_HOURS.1);
    let strategy = *ctx.rng.pick(&DuplicateStrategy::ALL);

    let amount = match strategy {
        DuplicateStrategy::Identical => original.amount,
        DuplicateStrategy::Jittered => original
            .amount
            .scale(ctx.rng.uniform(JITTER_FACTOR.0, JITTER_FACTOR.1)),
        DuplicateStrategy::Split => {
            let part = original
                .amount
                .scale(ctx.rng.uniform(SPLIT_FRACTION.0, SPLIT_FRACTION.1));
            original.amount = original.amount.saturating_sub(part);
            part
        }
        DuplicateStrategy::Rounded => original.amount.rounded_to_unit(),
    };

    ctx.trace.record(TraceEvent::DuplicateInjected {
        original_id: original.id,
        duplicate_id,
        strategy,
    });

    Ok(Some(Document {
        id: duplicate_id,
        issued_at: plus_hours(original.issued_at, shift),
        amount,
        anomaly_flag: true,
        ..original.clone()
    }))
}
