use super::{ConceptRepository, ConceptStore, Result, StoreError, UnitOfWork};
use crate::concept::{Concept, ConceptId};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS concept (
    concept_id       TEXT PRIMARY KEY NOT NULL,
    concept_code     TEXT NOT NULL,
    concept_name     TEXT NOT NULL,
    standard_concept TEXT NOT NULL,
    valid_start_date TEXT NOT NULL,
    valid_end_date   TEXT NOT NULL,
    invalid_reason   TEXT NOT NULL
);
";

const SELECT_BY_ID: &str = "SELECT concept_id, concept_code, concept_name, standard_concept,
        valid_start_date, valid_end_date, invalid_reason
   FROM concept WHERE concept_id = ?1";

const INSERT: &str = "INSERT INTO concept (concept_id, concept_code, concept_name,
        standard_concept, valid_start_date, valid_end_date, invalid_reason)
 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const UPDATE: &str = "UPDATE concept SET concept_code = ?2, concept_name = ?3,
        standard_concept = ?4, valid_start_date = ?5, valid_end_date = ?6,
        invalid_reason = ?7
  WHERE concept_id = ?1";

/// SQLite-backed `concept` table.
///
/// The table is created on open when it does not exist yet.
pub struct SqliteConceptStore {
    conn: Connection,
}

impl SqliteConceptStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of stored concepts
    #[cfg(test)]
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM concept", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Autocommit access outside a unit of work
#[cfg(test)]
impl ConceptRepository for SqliteConceptStore {
    fn find_by_concept_id(&self, id: &ConceptId) -> Result<Option<Concept>> {
        find(&self.conn, id)
    }

    fn create(&mut self, concept: &Concept) -> Result<()> {
        insert(&self.conn, concept)
    }

    fn update(&mut self, concept: &Concept) -> Result<()> {
        update(&self.conn, concept)
    }
}

impl ConceptStore for SqliteConceptStore {
    fn begin(&mut self) -> Result<Box<dyn UnitOfWork + '_>> {
        let tx = self.conn.transaction()?;
        Ok(Box::new(SqliteUnit { tx }))
    }
}

/// Wraps a rusqlite transaction, which rolls back when dropped.
struct SqliteUnit<'c> {
    tx: Transaction<'c>,
}

impl ConceptRepository for SqliteUnit<'_> {
    fn find_by_concept_id(&self, id: &ConceptId) -> Result<Option<Concept>> {
        find(&self.tx, id)
    }

    fn create(&mut self, concept: &Concept) -> Result<()> {
        insert(&self.tx, concept)
    }

    fn update(&mut self, concept: &Concept) -> Result<()> {
        update(&self.tx, concept)
    }
}

impl UnitOfWork for SqliteUnit<'_> {
    fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

fn find(conn: &Connection, id: &ConceptId) -> Result<Option<Concept>> {
    let mut stmt = conn.prepare_cached(SELECT_BY_ID)?;
    let concept = stmt
        .query_row(params![id.as_str()], concept_from_row)
        .optional()?;
    Ok(concept)
}

fn insert(conn: &Connection, concept: &Concept) -> Result<()> {
    let mut stmt = conn.prepare_cached(INSERT)?;
    match stmt.execute(params![
        concept.concept_id.as_str(),
        concept.concept_code,
        concept.concept_name,
        concept.standard_concept,
        concept.valid_start_date,
        concept.valid_end_date,
        concept.invalid_reason,
    ]) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::DuplicateConcept(concept.concept_id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

fn update(conn: &Connection, concept: &Concept) -> Result<()> {
    let mut stmt = conn.prepare_cached(UPDATE)?;
    let changed = stmt.execute(params![
        concept.concept_id.as_str(),
        concept.concept_code,
        concept.concept_name,
        concept.standard_concept,
        concept.valid_start_date,
        concept.valid_end_date,
        concept.invalid_reason,
    ])?;

    if changed == 0 {
        return Err(StoreError::ConceptNotFound(concept.concept_id.clone()));
    }
    Ok(())
}

fn concept_from_row(row: &Row<'_>) -> rusqlite::Result<Concept> {
    Ok(Concept {
        concept_id: ConceptId::new(row.get::<_, String>(0)?),
        concept_code: row.get(1)?,
        concept_name: row.get(2)?,
        standard_concept: row.get(3)?,
        valid_start_date: row.get(4)?,
        valid_end_date: row.get(5)?,
        invalid_reason: row.get(6)?,
    })
}
