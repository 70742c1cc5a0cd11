//! Rapid-fire submission windows.

use chrono::{NaiveDate, NaiveDateTime};
use fraudgen_core::{
    document::{Document, DocumentStatus},
    rng::GenRng,
    temporal::TemporalCorrelator,
    types::Amount,
};

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 14)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn document(id: u64, account_id: u64, issued_at: NaiveDateTime) -> Document {
    Document {
        id,
        account_id,
        issued_at,
        amount: Amount::from_cents(42_017),
        counterparty_name: "Coastal Freight Ltd".into(),
        bank_identifier: "GB82WEST12345698765432".into(),
        status: DocumentStatus::Pending,
        due_at: issued_at,
        payer_identifier: "VAT123456789".into(),
        anomaly_flag: false,
    }
}

fn observe_all(docs: &mut [Document], p: f64) -> Vec<bool> {
    let mut windows = TemporalCorrelator::new();
    let mut rng = GenRng::new(9);
    docs.iter_mut()
        .map(|d| windows.observe(d, p, &mut rng))
        .collect()
}

#[test]
fn third_document_in_a_burst_is_flagged() {
    let mut docs = vec![
        document(1, 7, at(10, 0)),
        document(2, 7, at(11, 0)),
        document(3, 7, at(12, 30)),
    ];
    let fired = observe_all(&mut docs, 1.0);
    assert_eq!(fired, vec![false, false, true]);
    assert!(!docs[0].anomaly_flag);
    assert!(!docs[1].anomaly_flag);
    assert!(docs[2].anomaly_flag);
}

#[test]
fn a_wide_gap_breaks_the_burst() {
    let mut docs = vec![
        document(1, 7, at(10, 0)),
        document(2, 7, at(11, 0)),
        document(3, 7, at(13, 0)),
    ];
    assert_eq!(observe_all(&mut docs, 1.0), vec![false, false, false]);
}

#[test]
fn windows_are_kept_per_account() {
    let mut docs = vec![
        document(1, 1, at(10, 0)),
        document(2, 2, at(10, 30)),
        document(3, 1, at(11, 0)),
        document(4, 2, at(11, 30)),
        document(5, 1, at(11, 45)),
    ];
    assert_eq!(
        observe_all(&mut docs, 1.0),
        vec![false, false, false, false, true]
    );
}

#[test]
fn gaps_are_absolute_in_insertion_order() {
    // A backdated document still counts toward the burst.
    let mut docs = vec![
        document(1, 3, at(12, 0)),
        document(2, 3, at(11, 0)),
        document(3, 3, at(12, 30)),
    ];
    assert_eq!(observe_all(&mut docs, 1.0), vec![false, false, true]);
}

#[test]
fn already_flagged_documents_are_left_alone() {
    let mut docs = vec![
        document(1, 5, at(9, 0)),
        document(2, 5, at(9, 10)),
        document(3, 5, at(9, 20)),
    ];
    docs[2].anomaly_flag = true;
    assert_eq!(observe_all(&mut docs, 1.0), vec![false, false, false]);
    assert!(docs[2].anomaly_flag);
}

#[test]
fn window_slides_to_the_last_three() {
    let mut windows = TemporalCorrelator::new();
    let mut rng = GenRng::new(1);
    for (id, hour) in [(1, 0), (2, 5), (3, 10), (4, 15)] {
        let mut d = document(id, 8, at(hour, 0));
        windows.observe(&mut d, 0.0, &mut rng);
    }
    assert_eq!(windows.window(8).unwrap().document_ids(), vec![2, 3, 4]);
    assert!(windows.window(9).is_none());
}

#[test]
fn zero_probability_never_flags() {
    let mut docs = vec![
        document(1, 7, at(10, 0)),
        document(2, 7, at(10, 5)),
        document(3, 7, at(10, 10)),
    ];
    assert_eq!(observe_all(&mut docs, 0.0), vec![false, false, false]);
}
