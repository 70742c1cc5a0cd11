//! SQLite persistence for generated datasets.
//!
//! RULE: Only store.rs talks to the database.
//! The generator never touches SQL; the runner hands finished output here.

use crate::{
    config::GeneratorConfig,
    error::GenResult,
    label::OutputRow,
    trace::MutationTrace,
    types::format_timestamp,
};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, config: &GeneratorConfig, version: &str) -> GenResult<()> {
        let config_json = serde_json::to_string(config)?;
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, account_count, document_count, config_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run_id,
                config.seed as i64,
                version,
                config.account_count as i64,
                config.document_count as i64,
                config_json,
            ],
        )?;
        Ok(())
    }

    // ── Rows ───────────────────────────────────────────────────

    pub fn insert_rows(&self, run_id: &str, rows: &[OutputRow]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO dataset_row (
                    run_id, invoice_id, user_id, user_name, email, phone_number,
                    registration_date, vat_number, invoice_date, total_amount_cents,
                    supplier_iban, supplier_name, status, due_date, supplier_tax_id, fraud)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            )?;
            for row in rows {
                stmt.execute(params![
                    run_id,
                    row.document_id as i64,
                    row.account_id as i64,
                    row.display_name,
                    row.email,
                    row.phone,
                    format_timestamp(&row.registered_at),
                    row.identifier,
                    format_timestamp(&row.issued_at),
                    row.amount.cents(),
                    row.bank_identifier,
                    row.counterparty_name,
                    row.status.as_str(),
                    format_timestamp(&row.due_at),
                    row.payer_identifier,
                    row.fraud,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("store: wrote {} rows for run {run_id}", rows.len());
        Ok(())
    }

    pub fn row_count(&self, run_id: &str) -> GenResult<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM dataset_row WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }

    pub fn fraud_count(&self, run_id: &str) -> GenResult<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM dataset_row WHERE run_id = ?1 AND fraud = 1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }

    // ── Mutation trace ─────────────────────────────────────────

    pub fn insert_trace(&self, run_id: &str, trace: &MutationTrace) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO mutation_trace (run_id, seq, event_type, pattern, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (seq, event) in trace.events().iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    seq as i64,
                    event.event_type(),
                    event.pattern_name(),
                    serde_json::to_string(event)?,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Applied patterns by name, read back from the stored trace.
    pub fn pattern_counts(&self, run_id: &str) -> GenResult<BTreeMap<String, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT pattern, COUNT(*) FROM mutation_trace
             WHERE run_id = ?1 AND pattern IS NOT NULL
             GROUP BY pattern ORDER BY pattern ASC",
        )?;
        let counts = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(counts)
    }
}
