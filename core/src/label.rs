//! Label aggregation: one flattened, labeled row per document.
//!
//! RULE: rows are built only from frozen documents, so every late flag
//! (duplicate, temporal, round-amount) is already visible here.
//! `fraud = account.anomaly_flag || document.anomaly_flag`.

use crate::{
    account::Account,
    document::{Document, DocumentStatus},
    error::{GenError, GenResult},
    types::{format_timestamp, timestamp_format, AccountId, Amount, DocumentId, Timestamp},
};
use serde::{Deserialize, Serialize};

/// Column names in output order. These are the names the graph loader
/// and the classifier read, so they are not renamed with the fields.
pub const COLUMNS: [&str; 15] = [
    "user_id",
    "user_name",
    "email",
    "phone_number",
    "registration_date",
    "vat_number",
    "invoice_id",
    "invoice_date",
    "total_amount",
    "supplier_iban",
    "supplier_name",
    "status",
    "due_date",
    "supplier_tax_id",
    "fraud",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "user_id")]
    pub account_id: AccountId,
    #[serde(rename = "user_name")]
    pub display_name: String,
    pub email: String,
    #[serde(rename = "phone_number")]
    pub phone: String,
    #[serde(rename = "registration_date", with = "timestamp_format")]
    pub registered_at: Timestamp,
    #[serde(rename = "vat_number")]
    pub identifier: String,
    #[serde(rename = "invoice_id")]
    pub document_id: DocumentId,
    #[serde(rename = "invoice_date", with = "timestamp_format")]
    pub issued_at: Timestamp,
    #[serde(rename = "total_amount")]
    pub amount: Amount,
    #[serde(rename = "supplier_iban")]
    pub bank_identifier: String,
    #[serde(rename = "supplier_name")]
    pub counterparty_name: String,
    pub status: DocumentStatus,
    #[serde(rename = "due_date", with = "timestamp_format")]
    pub due_at: Timestamp,
    #[serde(rename = "supplier_tax_id")]
    pub payer_identifier: String,
    pub fraud: u8,
}

impl OutputRow {
    pub fn is_fraud(&self) -> bool {
        self.fraud == 1
    }

    /// Textual cells in `COLUMNS` order.
    pub fn cells(&self) -> [String; 15] {
        [
            self.account_id.to_string(),
            self.display_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            format_timestamp(&self.registered_at),
            self.identifier.clone(),
            self.document_id.to_string(),
            format_timestamp(&self.issued_at),
            self.amount.to_string(),
            self.bank_identifier.clone(),
            self.counterparty_name.clone(),
            self.status.as_str().to_string(),
            format_timestamp(&self.due_at),
            self.payer_identifier.clone(),
            self.fraud.to_string(),
        ]
    }
}

pub fn label_row(account: &Account, document: &Document) -> OutputRow {
    let fraud = account.anomaly_flag || document.anomaly_flag;
    OutputRow {
        account_id: account.id,
        display_name: account.display_name.clone(),
        email: account.email.clone(),
        phone: account.phone.clone(),
        registered_at: account.registered_at,
        identifier: account.identifier.clone(),
        document_id: document.id,
        issued_at: document.issued_at,
        amount: document.amount,
        bank_identifier: document.bank_identifier.clone(),
        counterparty_name: document.counterparty_name.clone(),
        status: document.status,
        due_at: document.due_at,
        payer_identifier: document.payer_identifier.clone(),
        fraud: u8::from(fraud),
    }
}

/// Account ids are dense from 1, so the lookup is positional; the id
/// is still checked so a bad reference can never join the wrong row.
fn account_for<'a>(accounts: &'a [Account], document: &Document) -> GenResult<&'a Account> {
    (document.account_id as usize)
        .checked_sub(1)
        .and_then(|index| accounts.get(index))
        .filter(|a| a.id == document.account_id)
        .ok_or_else(|| GenError::DanglingReference {
            document_id: document.id,
            account_id: document.account_id,
        })
}

pub fn aggregate(accounts: &[Account], documents: &[Document]) -> GenResult<Vec<OutputRow>> {
    documents
        .iter()
        .map(|document| Ok(label_row(account_for(accounts, document)?, document)))
        .collect()
}
