//! The mutation trace: every change an anomaly stage applies.
//!
//! RULE: a stage that sets an anomaly flag records exactly one event
//! naming the entity and the pattern. The flags can then be re-derived
//! from the trace alone, independent of the records themselves.

use crate::{
    account::AccountPattern,
    document::DocumentPattern,
    duplicate::DuplicateStrategy,
    types::{AccountId, DocumentId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    // ── Account pipeline ───────────────────────────
    AccountPattern {
        account_id: AccountId,
        pattern: AccountPattern,
    },

    // ── Document pipeline ──────────────────────────
    DocumentPattern {
        document_id: DocumentId,
        pattern: DocumentPattern,
    },
    /// Payer swapped for a synthesized identifier. Does not flag.
    PayerSubstituted {
        document_id: DocumentId,
        payer_identifier: String,
    },

    // ── Late document passes ───────────────────────
    DuplicateInjected {
        original_id: DocumentId,
        duplicate_id: DocumentId,
        strategy: DuplicateStrategy,
    },
    TemporalBurst {
        account_id: AccountId,
        document_id: DocumentId,
    },
    RoundAmount {
        document_id: DocumentId,
    },
}

impl TraceEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            TraceEvent::AccountPattern { .. } => "account_pattern",
            TraceEvent::DocumentPattern { .. } => "document_pattern",
            TraceEvent::PayerSubstituted { .. } => "payer_substituted",
            TraceEvent::DuplicateInjected { .. } => "duplicate_injected",
            TraceEvent::TemporalBurst { .. } => "temporal_burst",
            TraceEvent::RoundAmount { .. } => "round_amount",
        }
    }

    /// Stable pattern name for the tally, `None` for non-flagging events.
    pub fn pattern_name(&self) -> Option<&'static str> {
        match self {
            TraceEvent::AccountPattern { pattern, .. } => Some(pattern.name()),
            TraceEvent::DocumentPattern { pattern, .. } => Some(pattern.name()),
            TraceEvent::PayerSubstituted { .. } => None,
            TraceEvent::DuplicateInjected { .. } => Some("duplicate_document"),
            TraceEvent::TemporalBurst { .. } => Some("temporal_pattern"),
            TraceEvent::RoundAmount { .. } => Some("round_amount"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MutationTrace {
    events: Vec<TraceEvent>,
}

impl MutationTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: TraceEvent) {
        log::debug!("trace: {event:?}");
        self.events.push(event);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn flagged_accounts(&self) -> BTreeSet<AccountId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::AccountPattern { account_id, .. } => Some(*account_id),
                _ => None,
            })
            .collect()
    }

    pub fn flagged_documents(&self) -> BTreeSet<DocumentId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::DocumentPattern { document_id, .. }
                | TraceEvent::TemporalBurst { document_id, .. }
                | TraceEvent::RoundAmount { document_id } => Some(*document_id),
                TraceEvent::DuplicateInjected { duplicate_id, .. } => Some(*duplicate_id),
                TraceEvent::AccountPattern { .. } | TraceEvent::PayerSubstituted { .. } => None,
            })
            .collect()
    }

    /// Count of applied patterns by name, in name order.
    pub fn tally(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for name in self.events.iter().filter_map(TraceEvent::pattern_name) {
            *counts.entry(name).or_insert(0) += 1;
        }
        counts
    }
}
