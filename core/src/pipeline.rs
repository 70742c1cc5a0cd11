//! First-fire-wins trigger pipelines.
//!
//! A pipeline is an ordered list of rules. The runner rolls each rule's
//! probability in order; the first rule that fires mutates the target
//! and the runner stops. Later rules are only evaluated when every
//! earlier rule missed, so a rule's effective rate is its probability
//! times the miss rate of everything ahead of it.

use crate::{context::GenContext, error::GenResult};
use std::fmt::Debug;

/// Mutation applied when a rule fires.
pub type ApplyFn<T> = fn(&mut T, &mut GenContext) -> GenResult<()>;

pub struct TriggerRule<T, K> {
    pub kind: K,
    pub probability: f64,
    apply: ApplyFn<T>,
}

pub struct TriggerPipeline<T, K> {
    pub name: &'static str,
    rules: Vec<TriggerRule<T, K>>,
}

impl<T, K: Copy + Debug> TriggerPipeline<T, K> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    /// Append a rule. Evaluation order is insertion order.
    pub fn rule(mut self, kind: K, probability: f64, apply: ApplyFn<T>) -> Self {
        self.rules.push(TriggerRule {
            kind,
            probability,
            apply,
        });
        self
    }

    pub fn kinds(&self) -> Vec<K> {
        self.rules.iter().map(|r| r.kind).collect()
    }

    /// Run the rules against `target`. Returns the kind of the rule that
    /// fired, or `None` when every rule missed.
    pub fn run(&self, target: &mut T, ctx: &mut GenContext) -> GenResult<Option<K>> {
        for rule in &self.rules {
            if ctx.rng.chance(rule.probability) {
                (rule.apply)(target, ctx)?;
                log::debug!("{} pipeline: {:?} fired", self.name, rule.kind);
                return Ok(Some(rule.kind));
            }
        }
        Ok(None)
    }

    /// Probability that each rule is the one that fires.
    pub fn effective_probabilities(&self) -> Vec<(K, f64)> {
        let mut all_missed = 1.0;
        self.rules
            .iter()
            .map(|r| {
                let effective = all_missed * r.probability;
                all_missed *= 1.0 - r.probability;
                (r.kind, effective)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_a(t: &mut Vec<char>, _: &mut GenContext) -> GenResult<()> {
        t.push('a');
        Ok(())
    }

    fn push_b(t: &mut Vec<char>, _: &mut GenContext) -> GenResult<()> {
        t.push('b');
        Ok(())
    }

    #[test]
    fn first_certain_rule_wins_and_stops() {
        let pipeline = TriggerPipeline::new("test")
            .rule(1u8, 1.0, push_a)
            .rule(2u8, 1.0, push_b);
        let mut ctx = GenContext::new(9, 1);
        let mut target = Vec::new();

        assert_eq!(pipeline.run(&mut target, &mut ctx).unwrap(), Some(1));
        assert_eq!(target, vec!['a']);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let pipeline = TriggerPipeline::new("test")
            .rule(1u8, 0.0, push_a)
            .rule(2u8, 1.0, push_b);
        let mut ctx = GenContext::new(9, 1);
        let mut target = Vec::new();

        assert_eq!(pipeline.run(&mut target, &mut ctx).unwrap(), Some(2));
        assert_eq!(target, vec!['b']);
    }

    #[test]
    fn effective_rates_condition_on_earlier_misses() {
        let pipeline = TriggerPipeline::new("test")
            .rule(1u8, 0.5, push_a)
            .rule(2u8, 0.5, push_b);
        let rates = pipeline.effective_probabilities();
        assert_eq!(rates, vec![(1, 0.5), (2, 0.25)]);
    }

    #[test]
    fn empirical_rates_match_effective_rates() {
        let pipeline = TriggerPipeline::new("test")
            .rule(1u8, 0.3, push_a)
            .rule(2u8, 0.3, push_b);
        let mut ctx = GenContext::new(2024, 1);
        let trials = 20_000;
        let mut second = 0;
        for _ in 0..trials {
            if pipeline.run(&mut Vec::new(), &mut ctx).unwrap() == Some(2) {
                second += 1;
            }
        }
        let observed = second as f64 / trials as f64;
        // 0.7 * 0.3 = 0.21
        assert!((observed - 0.21).abs() < 0.02, "observed {observed}");
    }
}
