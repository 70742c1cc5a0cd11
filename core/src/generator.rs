//! The dataset generator: drives one run end to end.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Validate parameters
//!   2. Account population + account pipeline
//!   3. Document stream (pipeline, duplicates, temporal, round-amount)
//!   4. Label aggregation
//!
//! RULES:
//!   - All randomness flows through the context's single GenRng.
//!   - All mutable state lives in the GenContext.
//!   - Every applied mutation is recorded in the mutation trace.

use crate::{
    account::{generate_accounts, Account},
    config::GeneratorConfig,
    context::GenContext,
    document::{generate_documents, Document},
    error::GenResult,
    label::{aggregate, OutputRow},
    trace::MutationTrace,
};
use std::collections::BTreeMap;

/// Everything one run produces.
pub struct Dataset {
    pub accounts: Vec<Account>,
    pub documents: Vec<Document>,
    pub rows: Vec<OutputRow>,
    pub trace: MutationTrace,
}

impl Dataset {
    pub fn fraud_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_fraud()).count()
    }

    pub fn flagged_account_count(&self) -> usize {
        self.accounts.iter().filter(|a| a.anomaly_flag).count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.tally().get("duplicate_document").copied().unwrap_or(0)
    }

    /// Applied patterns by name.
    pub fn tally(&self) -> BTreeMap<&'static str, usize> {
        self.trace.tally()
    }
}

pub struct DatasetGenerator {
    config: GeneratorConfig,
}

impl DatasetGenerator {
    /// Rejects invalid parameters before any generation work starts.
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self) -> GenResult<Dataset> {
        let config = &self.config;
        log::info!(
            "generator: seed={} accounts={} documents={}",
            config.seed,
            config.account_count,
            config.document_count
        );

        let mut ctx = GenContext::from_config(config);
        let accounts = generate_accounts(config, &mut ctx)?;
        let documents = generate_documents(&accounts, config, &mut ctx)?;
        let rows = aggregate(&accounts, &documents)?;

        let dataset = Dataset {
            accounts,
            documents,
            rows,
            trace: ctx.trace,
        };
        log::info!(
            "generator: {} rows, {} labeled fraud",
            dataset.rows.len(),
            dataset.fraud_count()
        );
        Ok(dataset)
    }
}

/// Validate and generate in one call.
pub fn generate(config: GeneratorConfig) -> GenResult<Dataset> {
    DatasetGenerator::new(config)?.generate()
}
