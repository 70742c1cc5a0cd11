//! Document stream and the document anomaly pipeline.
//!
//! EXECUTION ORDER per primary document (fixed, never reordered):
//!   1. Synthesize ordinary fields
//!   2. Document pipeline: amount → bank identifier → due-date inversion
//!   3. Payer identifier (suspicious coin-flip only for flagged documents)
//!   4. Append to the pending batch, observe in the trailing window
//!   5. Duplicate injection; the duplicate is appended and observed too
//!   6. Round-amount pass over the batch
//!   7. Freeze the batch into the output
//!
//! RULE: records are only mutated while they sit in the pending batch.
//! Once frozen into the output they are never touched again.

use crate::{
    account::Account,
    calendar::{minus_days, plus_days, random_timestamp},
    config::{AnomalyProbabilities, GeneratorConfig},
    context::GenContext,
    duplicate::maybe_duplicate,
    error::GenResult,
    name_generator::NameGenerator,
    pipeline::TriggerPipeline,
    round_amount::apply_round_amount,
    trace::TraceEvent,
    types::{timestamp_format, AccountId, Amount, DocumentId, Timestamp},
};
use serde::{Deserialize, Serialize};

// ── Templates ────────────────────────────────────────────────────────────────

/// Structuring band just around the 10k reporting threshold, in cents.
pub const THRESHOLD_BAND: (i64, i64) = (990_000, 1_010_000);
pub const EXTREME_BAND: (i64, i64) = (1_500_000, 2_500_000);
pub const MICRO_BAND: (i64, i64) = (100, 1_000);
pub const REPEATED_DIGIT_AMOUNTS: [i64; 5] = [111_111, 222_222, 333_333, 444_444, 555_555];
pub const CHARM_PRICE_AMOUNTS: [i64; 5] = [9_999, 19_999, 29_999, 39_999, 49_999];

pub const INVALID_COUNTRY_CODES: [&str; 4] = ["XX", "YY", "ZZ", "00"];
pub const INVALID_CHECK_DIGITS: [&str; 3] = ["00", "99", "01"];

/// Ordinary due dates fall this many days after issue.
pub const DUE_AFTER_DAYS: (i64, i64) = (14, 60);
/// Inverted due dates fall this many days before issue.
pub const DUE_BEFORE_DAYS: (i64, i64) = (1, 60);

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Paid,
    Pending,
    Overdue,
}

impl DocumentStatus {
    /// Same order as `StatusWeights::as_array`.
    pub const ALL: [DocumentStatus; 3] = [Self::Paid, Self::Pending, Self::Overdue];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub account_id: AccountId,
    #[serde(with = "timestamp_format")]
    pub issued_at: Timestamp,
    pub amount: Amount,
    pub counterparty_name: String,
    pub bank_identifier: String,
    pub status: DocumentStatus,
    #[serde(with = "timestamp_format")]
    pub due_at: Timestamp,
    pub payer_identifier: String,
    pub anomaly_flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentPattern {
    SuspiciousAmount,
    SuspiciousBankIdentifier,
    DateInconsistency,
}

impl DocumentPattern {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SuspiciousAmount => "suspicious_amount",
            Self::SuspiciousBankIdentifier => "suspicious_bank_identifier",
            Self::DateInconsistency => "date_inconsistency",
        }
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

pub fn document_pipeline(p: &AnomalyProbabilities) -> TriggerPipeline<Document, DocumentPattern> {
    TriggerPipeline::new("document")
        .rule(DocumentPattern::SuspiciousAmount, p.suspicious_amount, rewrite_amount)
        .rule(
            DocumentPattern::SuspiciousBankIdentifier,
            p.suspicious_bank_identifier,
            rewrite_bank_identifier,
        )
        .rule(
            DocumentPattern::DateInconsistency,
            p.date_inconsistency,
            invert_due_date,
        )
}

fn rewrite_amount(document: &mut Document, ctx: &mut GenContext) -> GenResult<()> {
    let rng = &mut ctx.rng;
    let cents = match rng.next_u64_below(5) {
        0 => rng.range_inclusive(THRESHOLD_BAND.0, THRESHOLD_BAND.1),
        1 => rng.range_inclusive(EXTREME_BAND.0, EXTREME_BAND.1),
        2 => rng.range_inclusive(MICRO_BAND.0, MICRO_BAND.1),
        3 => *rng.pick(&REPEATED_DIGIT_AMOUNTS),
        _ => *rng.pick(&CHARM_PRICE_AMOUNTS),
    };
    document.amount = Amount::from_cents(cents);
    Ok(())
}

fn rewrite_bank_identifier(document: &mut Document, ctx: &mut GenContext) -> GenResult<()> {
    let rng = &mut ctx.rng;
    let country = rng.pick(&INVALID_COUNTRY_CODES);
    let check = rng.pick(&INVALID_CHECK_DIGITS);
    document.bank_identifier = format!("{country}{check}{}", rng.digits(20));
    Ok(())
}

fn invert_due_date(document: &mut Document, ctx: &mut GenContext) -> GenResult<()> {
    let days = ctx.rng.range_inclusive(DUE_BEFORE_DAYS.0, DUE_BEFORE_DAYS.1);
    document.due_at = minus_days(document.issued_at, days);
    Ok(())
}

// ── Generation ───────────────────────────────────────────────────────────────

/// Ordinary fields only. The payer is left empty until the pipeline
/// has decided whether the document is flagged.
pub fn synthesize_document(
    id: DocumentId,
    accounts: &[Account],
    config: &GeneratorConfig,
    ctx: &mut GenContext,
) -> GenResult<Document> {
    let rng = &mut ctx.rng;
    let account_id = rng.next_u64_below(accounts.len() as u64) + 1;
    let issued_at = random_timestamp(rng, config.issue_years)?;
    let amount = Amount::from_cents(rng.range_inclusive(
        config.baseline_amount.min.cents(),
        config.baseline_amount.max.cents(),
    ));
    let counterparty_name = NameGenerator::generate_company_name(rng);
    let bank_identifier = NameGenerator::generate_iban(rng);
    let status = DocumentStatus::ALL[rng.weighted_index(&config.status_weights.as_array())];
    let due_at = plus_days(
        issued_at,
        rng.range_inclusive(DUE_AFTER_DAYS.0, DUE_AFTER_DAYS.1),
    );

    Ok(Document {
        id,
        account_id,
        issued_at,
        amount,
        counterparty_name,
        bank_identifier,
        status,
        due_at,
        payer_identifier: String::new(),
        anomaly_flag: false,
    })
}

/// Steps 1-3: one primary document with its pipeline verdict and payer.
fn primary_document(
    accounts: &[Account],
    pipeline: &TriggerPipeline<Document, DocumentPattern>,
    config: &GeneratorConfig,
    ctx: &mut GenContext,
) -> GenResult<Document> {
    let id = ctx.next_document_id()?;
    let mut document = synthesize_document(id, accounts, config, ctx)?;

    if let Some(pattern) = pipeline.run(&mut document, ctx)? {
        document.anomaly_flag = true;
        ctx.trace.record(TraceEvent::DocumentPattern {
            document_id: id,
            pattern,
        });
    }

    if document.anomaly_flag && ctx.rng.chance(config.probabilities.suspicious_payer) {
        let payer = ctx.identifiers.allocate_suspicious_payer(&mut ctx.rng)?;
        ctx.trace.record(TraceEvent::PayerSubstituted {
            document_id: id,
            payer_identifier: payer.clone(),
        });
        document.payer_identifier = payer;
    } else {
        document.payer_identifier = ctx.rng.pick(accounts).identifier.clone();
    }
    Ok(document)
}

/// Documents still open to mutation.
#[derive(Default)]
struct PendingBatch {
    records: Vec<Document>,
}

impl PendingBatch {
    /// Append and run the temporal rule against the new record.
    fn append(&mut self, mut document: Document, probability: f64, ctx: &mut GenContext) {
        if ctx.windows.observe(&mut document, probability, &mut ctx.rng) {
            ctx.trace.record(TraceEvent::TemporalBurst {
                account_id: document.account_id,
                document_id: document.id,
            });
        }
        self.records.push(document);
    }
}

/// Steps 4-7: observe the primary, add its duplicate, run the
/// round-amount pass and hand back the frozen records.
fn emit_batch(
    primary: Document,
    p: &AnomalyProbabilities,
    ctx: &mut GenContext,
) -> GenResult<Vec<Document>> {
    let mut batch = PendingBatch::default();

    batch.append(primary, p.temporal, ctx);
    let duplicate = match batch.records.last_mut() {
        Some(original) => maybe_duplicate(original, p.duplicate, ctx)?,
        None => None,
    };
    if let Some(duplicate) = duplicate {
        batch.append(duplicate, p.temporal, ctx);
    }

    for document in &mut batch.records {
        if apply_round_amount(document, p.round_amount, &mut ctx.rng) {
            ctx.trace.record(TraceEvent::RoundAmount {
                document_id: document.id,
            });
        }
    }
    Ok(batch.records)
}

/// Generate `document_count` primary documents plus their duplicates.
pub fn generate_documents(
    accounts: &[Account],
    config: &GeneratorConfig,
    ctx: &mut GenContext,
) -> GenResult<Vec<Document>> {
    let p = &config.probabilities;
    let pipeline = document_pipeline(p);
    let mut output = Vec::with_capacity(config.document_count + config.document_count / 8);

    for _ in 0..config.document_count {
        let primary = primary_document(accounts, &pipeline, config, ctx)?;
        output.extend(emit_batch(primary, p, ctx)?);
    }

    let duplicates = output.len() - config.document_count;
    let flagged = output.iter().filter(|d| d.anomaly_flag).count();
    log::info!(
        "documents: emitted {} documents ({duplicates} duplicates), {flagged} flagged",
        output.len()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{account::generate_accounts, name_generator::iban_checksum_valid};

    fn run(p: AnomalyProbabilities) -> Vec<Document> {
        let config = GeneratorConfig::default_test().with_probabilities(p);
        let mut ctx = GenContext::from_config(&config);
        let accounts = generate_accounts(&config, &mut ctx).unwrap();
        generate_documents(&accounts, &config, &mut ctx).unwrap()
    }

    #[test]
    fn clean_documents_have_valid_ibans_and_later_due_dates() {
        for d in run(AnomalyProbabilities::zero()) {
            assert!(!d.anomaly_flag);
            assert!(iban_checksum_valid(&d.bank_identifier), "{}", d.bank_identifier);
            let days = (d.due_at - d.issued_at).num_days();
            assert!((DUE_AFTER_DAYS.0..=DUE_AFTER_DAYS.1).contains(&days));
        }
    }

    #[test]
    fn inverted_due_dates_precede_issue() {
        let docs = run(AnomalyProbabilities {
            date_inconsistency: 1.0,
            ..AnomalyProbabilities::zero()
        });
        for d in docs {
            assert!(d.anomaly_flag);
            assert!(d.due_at < d.issued_at);
            let days = (d.issued_at - d.due_at).num_days();
            assert!((DUE_BEFORE_DAYS.0..=DUE_BEFORE_DAYS.1).contains(&days));
        }
    }

    #[test]
    fn amount_rule_preempts_later_rules() {
        let docs = run(AnomalyProbabilities {
            suspicious_amount: 1.0,
            suspicious_bank_identifier: 1.0,
            date_inconsistency: 1.0,
            ..AnomalyProbabilities::zero()
        });
        for d in docs {
            assert!(d.anomaly_flag);
            assert!(iban_checksum_valid(&d.bank_identifier));
            assert!(d.due_at > d.issued_at);
        }
    }

    #[test]
    fn bank_identifier_rewrites_fail_checksum() {
        let docs = run(AnomalyProbabilities {
            suspicious_bank_identifier: 1.0,
            ..AnomalyProbabilities::zero()
        });
        for d in docs {
            assert!(INVALID_COUNTRY_CODES.contains(&&d.bank_identifier[..2]));
            assert!(INVALID_CHECK_DIGITS.contains(&&d.bank_identifier[2..4]));
            assert!(!iban_checksum_valid(&d.bank_identifier));
        }
    }

    fn primary_at(ctx: &mut GenContext, account_id: AccountId, hour: u32, minute: u32) -> Document {
        let issued_at = chrono::NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        Document {
            id: ctx.next_document_id().unwrap(),
            account_id,
            issued_at,
            amount: Amount::from_cents(73_419),
            counterparty_name: "Northern Printing Ltd".into(),
            bank_identifier: "GB82WEST12345698765432".into(),
            status: DocumentStatus::Pending,
            due_at: plus_days(issued_at, 30),
            payer_identifier: "VAT123456789".into(),
            anomaly_flag: false,
        }
    }

    #[test]
    fn burst_in_the_stream_flags_the_third_document() {
        let p = AnomalyProbabilities {
            temporal: 1.0,
            ..AnomalyProbabilities::zero()
        };
        let mut ctx = GenContext::new(21, 1);
        let mut emitted = Vec::new();
        for (hour, minute) in [(9, 0), (10, 0), (11, 30)] {
            let primary = primary_at(&mut ctx, 4, hour, minute);
            emitted.extend(emit_batch(primary, &p, &mut ctx).unwrap());
        }

        let flags: Vec<bool> = emitted.iter().map(|d| d.anomaly_flag).collect();
        assert_eq!(flags, vec![false, false, true]);
        assert_eq!(
            ctx.trace.events(),
            &[TraceEvent::TemporalBurst {
                account_id: 4,
                document_id: 3,
            }]
        );
    }

    #[test]
    fn spread_out_documents_are_not_a_burst() {
        let p = AnomalyProbabilities {
            temporal: 1.0,
            ..AnomalyProbabilities::zero()
        };
        let mut ctx = GenContext::new(21, 1);
        for (hour, minute) in [(9, 0), (10, 0), (12, 0)] {
            let primary = primary_at(&mut ctx, 4, hour, minute);
            emit_batch(primary, &p, &mut ctx).unwrap();
        }
        assert!(ctx.trace.is_empty());
    }

    #[test]
    fn whole_amounts_in_the_stream_get_round_amount_events() {
        let mut config = GeneratorConfig::default_test().with_probabilities(AnomalyProbabilities {
            round_amount: 1.0,
            ..AnomalyProbabilities::zero()
        });
        config.baseline_amount = crate::config::AmountRange {
            min: Amount::from_major(1200.0),
            max: Amount::from_major(1200.0),
        };
        let mut ctx = GenContext::from_config(&config);
        let accounts = generate_accounts(&config, &mut ctx).unwrap();
        let docs = generate_documents(&accounts, &config, &mut ctx).unwrap();

        assert!(docs.iter().all(|d| d.anomaly_flag));
        for d in &docs {
            assert!(ctx
                .trace
                .events()
                .contains(&TraceEvent::RoundAmount { document_id: d.id }));
        }
    }

    #[test]
    fn fractional_amounts_never_get_round_amount_events() {
        let mut config = GeneratorConfig::default_test().with_probabilities(AnomalyProbabilities {
            round_amount: 1.0,
            ..AnomalyProbabilities::zero()
        });
        config.baseline_amount = crate::config::AmountRange {
            min: Amount::from_cents(120_001),
            max: Amount::from_cents(120_001),
        };
        let mut ctx = GenContext::from_config(&config);
        let accounts = generate_accounts(&config, &mut ctx).unwrap();
        let docs = generate_documents(&accounts, &config, &mut ctx).unwrap();
        assert!(docs.iter().all(|d| !d.anomaly_flag));
    }

    #[test]
    fn status_weights_can_pin_a_status() {
        let mut config = GeneratorConfig::default_test();
        config.status_weights = crate::config::StatusWeights {
            paid: 0.0,
            pending: 0.0,
            overdue: 1.0,
        };
        let mut ctx = GenContext::from_config(&config);
        let accounts = generate_accounts(&config, &mut ctx).unwrap();
        let docs = generate_documents(&accounts, &config, &mut ctx).unwrap();
        assert!(docs.iter().all(|d| d.status == DocumentStatus::Overdue));
    }
}
