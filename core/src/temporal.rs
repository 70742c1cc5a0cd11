//! Per-account trailing windows for rapid-fire submission detection.
//!
//! Each account keeps its last three emitted documents in insertion
//! order (duplicates included). When a new document completes a window
//! whose two consecutive gaps are both under two hours, the newest
//! document may be flagged.

use crate::{
    calendar::hours_between,
    document::Document,
    rng::GenRng,
    types::{AccountId, DocumentId, Timestamp},
};
use std::collections::{HashMap, VecDeque};

pub const WINDOW_SIZE: usize = 3;

/// Both gaps must be strictly below this.
pub const BURST_GAP_HOURS: f64 = 2.0;

#[derive(Debug, Clone, Default)]
pub struct RecentWindow {
    entries: VecDeque<(DocumentId, Timestamp)>,
}

impl RecentWindow {
    pub fn push(&mut self, document_id: DocumentId, issued_at: Timestamp) {
        if self.entries.len() == WINDOW_SIZE {
            self.entries.pop_front();
        }
        self.entries.push_back((document_id, issued_at));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn document_ids(&self) -> Vec<DocumentId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Absolute gaps 1→2 and 2→3, once the window is full.
    pub fn gaps(&self) -> Option<[f64; 2]> {
        if self.entries.len() < WINDOW_SIZE {
            return None;
        }
        let t: Vec<Timestamp> = self.entries.iter().map(|(_, ts)| *ts).collect();
        Some([hours_between(t[0], t[1]), hours_between(t[1], t[2])])
    }

    pub fn is_burst(&self) -> bool {
        self.gaps()
            .is_some_and(|gaps| gaps.iter().all(|g| *g < BURST_GAP_HOURS))
    }
}

#[derive(Debug, Default)]
pub struct TemporalCorrelator {
    windows: HashMap<AccountId, RecentWindow>,
}

impl TemporalCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self, account_id: AccountId) -> Option<&RecentWindow> {
        self.windows.get(&account_id)
    }

    /// Append `document` to its account's window and evaluate the burst
    /// rule. The probability is rolled whenever the window is a burst;
    /// the flag is only set on a document that is still clean.
    ///
    /// Returns true when this call set the flag.
    pub fn observe(&mut self, document: &mut Document, probability: f64, rng: &mut GenRng) -> bool {
        let window = self.windows.entry(document.account_id).or_default();
        window.push(document.id, document.issued_at);

        if !window.is_burst() || !rng.chance(probability) {
            return false;
        }
        if document.anomaly_flag {
            return false;
        }
        document.anomaly_flag = true;
        true
    }
}
