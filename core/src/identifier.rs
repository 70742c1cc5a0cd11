//! Collision-free VAT-style identifier allocation.
//!
//! RULE: every string handed out by an allocator is unique for the
//! lifetime of the run. Rewritten identifiers stay reserved, so an
//! identifier that was replaced is never handed out again either.

use crate::{
    error::{GenError, GenResult},
    rng::GenRng,
};
use std::collections::HashSet;

pub const IDENTIFIER_PREFIX: &str = "VAT";

/// Bounds of the nine-digit numeric body.
const BODY_MIN: i64 = 100_000_000;
const BODY_MAX: i64 = 999_999_999;

/// Rejection-sampling budget per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Trailing digits written by the suspicious-identifier account rule.
pub const SUSPICIOUS_SUFFIXES: [&str; 5] = ["000", "999", "123", "111", "222"];

/// Leading digits of synthesized suspicious payer identifiers.
pub const SUSPICIOUS_PAYER_HEADS: [&str; 3] = ["000", "123", "999"];

pub struct IdentifierAllocator {
    used: HashSet<String>,
    max_attempts: u32,
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self {
            used: HashSet::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.used.contains(identifier)
    }

    /// A fresh `VAT#########` identifier.
    pub fn allocate(&mut self, rng: &mut GenRng) -> GenResult<String> {
        self.claim(rng, |rng| {
            format!("{IDENTIFIER_PREFIX}{}", rng.range_inclusive(BODY_MIN, BODY_MAX))
        })
    }

    /// Rewrite the last three digits of `current` to a suspicious suffix.
    ///
    /// The first candidate keeps the original leading digits. If that
    /// collides, the leading digits are redrawn.
    pub fn rewrite_suffix(&mut self, rng: &mut GenRng, current: &str) -> GenResult<String> {
        let head: String = current
            .strip_prefix(IDENTIFIER_PREFIX)
            .map(|body| body.chars().take(6).collect())
            .unwrap_or_default();
        let mut first = true;
        self.claim(rng, |rng| {
            let suffix = rng.pick(&SUSPICIOUS_SUFFIXES);
            if first && head.len() == 6 {
                first = false;
                format!("{IDENTIFIER_PREFIX}{head}{suffix}")
            } else {
                format!("{IDENTIFIER_PREFIX}{}{suffix}", rng.range_inclusive(100_000, 999_999))
            }
        })
    }

    /// A templated suspicious payer such as `VAT000482913`.
    pub fn allocate_suspicious_payer(&mut self, rng: &mut GenRng) -> GenResult<String> {
        self.claim(rng, |rng| {
            let head = rng.pick(&SUSPICIOUS_PAYER_HEADS);
            format!("{IDENTIFIER_PREFIX}{head}{}", rng.digits(6))
        })
    }

    /// Draw candidates until one is unused, within the attempt budget.
    fn claim<F>(&mut self, rng: &mut GenRng, mut draw: F) -> GenResult<String>
    where
        F: FnMut(&mut GenRng) -> String,
    {
        for _ in 0..self.max_attempts {
            let candidate = draw(rng);
            if self.used.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        log::error!(
            "identifier allocator: no free identifier after {} draws ({} in use)",
            self.max_attempts,
            self.used.len()
        );
        Err(GenError::IdentifierExhausted {
            attempts: self.max_attempts,
        })
    }
}
