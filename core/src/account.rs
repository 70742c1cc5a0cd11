//! Account population and the account anomaly pipeline.
//!
//! Every account is synthesized with ordinary fields and then run once
//! through a first-fire-wins pipeline of four rewrites:
//!   1. suspicious email
//!   2. invalid phone
//!   3. off-hours registration time
//!   4. suspicious identifier suffix
//!
//! At most one rewrite applies. Any rewrite flags the account.

use crate::{
    calendar::{random_timestamp, with_hour_minute},
    config::{AnomalyProbabilities, GeneratorConfig},
    context::GenContext,
    error::GenResult,
    name_generator::NameGenerator,
    pipeline::TriggerPipeline,
    trace::TraceEvent,
    types::{timestamp_format, AccountId, Timestamp},
};
use serde::{Deserialize, Serialize};

// ── Templates ────────────────────────────────────────────────────────────────

/// Domains only the suspicious-email templates use.
pub const THROWAWAY_DOMAINS: [&str; 3] = ["freemail.com", "examplemail.com", "tempmail.net"];
pub const HANDLE_SUFFIXES: [&str; 3] = ["123", "999", "007"];

/// Fixed placeholder numbers. A sixth template zeroes the last five
/// digits of the holder's real number.
pub const PLACEHOLDER_PHONES: [&str; 5] = [
    "0000000000",
    "1234567890",
    "+00 000 000 0000",
    "123-456-7890",
    "999-999-9999",
];

/// Off-hours registration band, inclusive.
pub const OFF_HOURS: (u32, u32) = (2, 4);

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "timestamp_format")]
    pub registered_at: Timestamp,
    pub identifier: String,
    pub anomaly_flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountPattern {
    SuspiciousEmail,
    InvalidPhone,
    SuspiciousRegistration,
    SuspiciousIdentifier,
}

impl AccountPattern {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SuspiciousEmail => "suspicious_email",
            Self::InvalidPhone => "invalid_phone",
            Self::SuspiciousRegistration => "suspicious_registration",
            Self::SuspiciousIdentifier => "suspicious_identifier",
        }
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

pub fn account_pipeline(p: &AnomalyProbabilities) -> TriggerPipeline<Account, AccountPattern> {
    TriggerPipeline::new("account")
        .rule(AccountPattern::SuspiciousEmail, p.suspicious_email, rewrite_email)
        .rule(AccountPattern::InvalidPhone, p.invalid_phone, rewrite_phone)
        .rule(
            AccountPattern::SuspiciousRegistration,
            p.suspicious_registration,
            rewrite_registration,
        )
        .rule(
            AccountPattern::SuspiciousIdentifier,
            p.suspicious_identifier,
            rewrite_identifier,
        )
}

fn rewrite_email(account: &mut Account, ctx: &mut GenContext) -> GenResult<()> {
    let rng = &mut ctx.rng;
    account.email = match rng.next_u64_below(5) {
        0 => {
            let first = NameGenerator::generate_first_name(rng).to_lowercase();
            format!("{first}{}@gmail.com", rng.range_inclusive(1000, 9999))
        }
        1 => {
            let handle: String = account
                .display_name
                .split_whitespace()
                .collect::<String>()
                .to_lowercase();
            format!("{handle}{}@mail.com", rng.pick(&HANDLE_SUFFIXES))
        }
        2 => {
            let a = NameGenerator::generate_word(rng);
            let b = NameGenerator::generate_word(rng);
            format!("{a}{b}@{}", rng.pick(&THROWAWAY_DOMAINS))
        }
        3 => {
            let first = NameGenerator::generate_first_name(rng).to_lowercase();
            let number = rng.range_inclusive(100, 999);
            format!("{first}.{number}@{}", NameGenerator::generate_domain_name(rng))
        }
        _ => {
            let a = NameGenerator::generate_word(rng);
            let b = NameGenerator::generate_word(rng);
            format!("{a}.{b}{}@gmail.com", rng.range_inclusive(1, 99))
        }
    };
    Ok(())
}

fn rewrite_phone(account: &mut Account, ctx: &mut GenContext) -> GenResult<()> {
    let pick = ctx.rng.next_u64_below(PLACEHOLDER_PHONES.len() as u64 + 1) as usize;
    account.phone = match PLACEHOLDER_PHONES.get(pick) {
        Some(placeholder) => placeholder.to_string(),
        None => {
            let keep = account.phone.len().saturating_sub(5);
            format!("{}00000", &account.phone[..keep])
        }
    };
    Ok(())
}

fn rewrite_registration(account: &mut Account, ctx: &mut GenContext) -> GenResult<()> {
    let hour = ctx.rng.range_inclusive(OFF_HOURS.0 as i64, OFF_HOURS.1 as i64) as u32;
    let minute = ctx.rng.range_inclusive(0, 59) as u32;
    account.registered_at = with_hour_minute(account.registered_at, hour, minute);
    Ok(())
}

fn rewrite_identifier(account: &mut Account, ctx: &mut GenContext) -> GenResult<()> {
    account.identifier = ctx
        .identifiers
        .rewrite_suffix(&mut ctx.rng, &account.identifier)?;
    Ok(())
}

// ── Generation ───────────────────────────────────────────────────────────────

/// Ordinary fields only; the pipeline has not run yet.
pub fn synthesize_account(
    id: AccountId,
    config: &GeneratorConfig,
    ctx: &mut GenContext,
) -> GenResult<Account> {
    let display_name = NameGenerator::generate_full_name(&mut ctx.rng);
    let email = NameGenerator::generate_email(&mut ctx.rng, &display_name);
    let phone = NameGenerator::generate_phone_number(&mut ctx.rng);
    let registered_at = random_timestamp(&mut ctx.rng, config.registration_years)?;
    let identifier = ctx.identifiers.allocate(&mut ctx.rng)?;

    Ok(Account {
        id,
        display_name,
        email,
        phone,
        registered_at,
        identifier,
        anomaly_flag: false,
    })
}

/// Build the full population with ids 1..=account_count.
pub fn generate_accounts(config: &GeneratorConfig, ctx: &mut GenContext) -> GenResult<Vec<Account>> {
    let pipeline = account_pipeline(&config.probabilities);
    let mut accounts = Vec::with_capacity(config.account_count);

    for i in 0..config.account_count {
        let id = i as AccountId + 1;
        let mut account = synthesize_account(id, config, ctx)?;
        if let Some(pattern) = pipeline.run(&mut account, ctx)? {
            account.anomaly_flag = true;
            ctx.trace.record(TraceEvent::AccountPattern {
                account_id: id,
                pattern,
            });
        }
        accounts.push(account);
    }

    let flagged = accounts.iter().filter(|a| a.anomaly_flag).count();
    log::info!(
        "accounts: built {} accounts, {flagged} flagged",
        accounts.len()
    );
    Ok(accounts)
}
