//! CONCEPT の永続化
//!
//! インポーターはこのモジュールのトレイト越しにストアへアクセスする。
//! 1回のインポートは1つの [`UnitOfWork`] の中で実行され、
//! `commit()` されずに drop された場合は全ての書き込みが破棄される。

#[cfg(test)]
mod memory;
mod sqlite;

#[cfg(test)]
pub use memory::InMemoryConceptStore;
pub use sqlite::SqliteConceptStore;

use crate::concept::{Concept, ConceptId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Concept already exists: {0}")]
    DuplicateConcept(ConceptId),

    #[error("Concept not found: {0}")]
    ConceptNotFound(ConceptId),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Lookup and write access keyed by `concept_id`.
pub trait ConceptRepository {
    fn find_by_concept_id(&self, id: &ConceptId) -> Result<Option<Concept>>;

    /// Insert a concept whose id is not stored yet.
    fn create(&mut self, concept: &Concept) -> Result<()>;

    /// Overwrite every mutable field of an existing concept.
    fn update(&mut self, concept: &Concept) -> Result<()>;

    /// Create or update by `concept_id`. The flag is `true` when the
    /// concept was created.
    fn upsert(&mut self, concept: Concept) -> Result<(Concept, bool)> {
        match self.find_by_concept_id(&concept.concept_id)? {
            Some(_) => {
                self.update(&concept)?;
                Ok((concept, false))
            }
            None => {
                self.create(&concept)?;
                Ok((concept, true))
            }
        }
    }
}

/// A repository scoped to one transaction.
///
/// Dropping it without `commit()` rolls back.
pub trait UnitOfWork: ConceptRepository {
    fn commit(self: Box<Self>) -> Result<()>;
}

/// A store that can open units of work.
pub trait ConceptStore {
    fn begin(&mut self) -> Result<Box<dyn UnitOfWork + '_>>;
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
