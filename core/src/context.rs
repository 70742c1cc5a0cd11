//! The generation context: all mutable state of one run.
//!
//! RULE: no stage keeps state of its own. The RNG stream, the
//! identifier used-set, the per-account trailing windows, the document
//! id counter and the mutation trace all live here and are threaded
//! through every stage by `&mut`.

use crate::{
    config::GeneratorConfig,
    error::{GenError, GenResult},
    identifier::IdentifierAllocator,
    rng::GenRng,
    temporal::TemporalCorrelator,
    trace::MutationTrace,
    types::DocumentId,
};

pub struct GenContext {
    pub rng: GenRng,
    pub identifiers: IdentifierAllocator,
    pub windows: TemporalCorrelator,
    pub trace: MutationTrace,
    next_document_id: DocumentId,
}

impl GenContext {
    pub fn new(seed: u64, first_document_id: DocumentId) -> Self {
        Self {
            rng: GenRng::new(seed),
            identifiers: IdentifierAllocator::new(),
            windows: TemporalCorrelator::new(),
            trace: MutationTrace::new(),
            next_document_id: first_document_id,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.seed, config.first_document_id)
    }

    /// Issue the next document id. Ids never depend on how many
    /// documents have been emitted, so filtering or sharding cannot
    /// produce collisions.
    pub fn next_document_id(&mut self) -> GenResult<DocumentId> {
        let id = self.next_document_id;
        self.next_document_id = id
            .checked_add(1)
            .ok_or_else(|| GenError::invalid("first_document_id", "document id sequence overflowed"))?;
        Ok(id)
    }

    pub fn peek_document_id(&self) -> DocumentId {
        self.next_document_id
    }
}
