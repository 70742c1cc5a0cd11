use crate::types::{AccountId, DocumentId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Identifier space exhausted after {attempts} draws")]
    IdentifierExhausted { attempts: u32 },

    #[error("Document {document_id} references missing account {account_id}")]
    DanglingReference {
        document_id: DocumentId,
        account_id: AccountId,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type GenResult<T> = Result<T, GenError>;
