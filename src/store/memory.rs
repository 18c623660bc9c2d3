use super::{ConceptRepository, ConceptStore, Result, StoreError, UnitOfWork};
use crate::concept::{Concept, ConceptId};
use std::collections::BTreeMap;

/// Map-backed store for tests.
///
/// A unit of work stages its writes on a copy of the map and swaps it in
/// on commit.
#[derive(Debug, Default)]
pub struct InMemoryConceptStore {
    concepts: BTreeMap<ConceptId, Concept>,
    begun: usize,
    committed: usize,
}

impl InMemoryConceptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ConceptId) -> Option<&Concept> {
        self.concepts.get(id)
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Number of units of work opened so far
    pub fn transactions_begun(&self) -> usize {
        self.begun
    }

    /// Number of units of work committed so far
    pub fn transactions_committed(&self) -> usize {
        self.committed
    }
}

impl ConceptRepository for InMemoryConceptStore {
    fn find_by_concept_id(&self, id: &ConceptId) -> Result<Option<Concept>> {
        Ok(self.concepts.get(id).cloned())
    }

    fn create(&mut self, concept: &Concept) -> Result<()> {
        create_in(&mut self.concepts, concept)
    }

    fn update(&mut self, concept: &Concept) -> Result<()> {
        update_in(&mut self.concepts, concept)
    }
}

impl ConceptStore for InMemoryConceptStore {
    fn begin(&mut self) -> Result<Box<dyn UnitOfWork + '_>> {
        self.begun += 1;
        let staged = self.concepts.clone();
        Ok(Box::new(InMemoryUnit {
            store: self,
            staged,
        }))
    }
}

struct InMemoryUnit<'a> {
    store: &'a mut InMemoryConceptStore,
    staged: BTreeMap<ConceptId, Concept>,
}

impl ConceptRepository for InMemoryUnit<'_> {
    fn find_by_concept_id(&self, id: &ConceptId) -> Result<Option<Concept>> {
        Ok(self.staged.get(id).cloned())
    }

    fn create(&mut self, concept: &Concept) -> Result<()> {
        create_in(&mut self.staged, concept)
    }

    fn update(&mut self, concept: &Concept) -> Result<()> {
        update_in(&mut self.staged, concept)
    }
}

impl UnitOfWork for InMemoryUnit<'_> {
    fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryUnit { store, staged } = *self;
        store.concepts = staged;
        store.committed += 1;
        Ok(())
    }
}

fn create_in(map: &mut BTreeMap<ConceptId, Concept>, concept: &Concept) -> Result<()> {
    if map.contains_key(&concept.concept_id) {
        return Err(StoreError::DuplicateConcept(concept.concept_id.clone()));
    }
    map.insert(concept.concept_id.clone(), concept.clone());
    Ok(())
}

fn update_in(map: &mut BTreeMap<ConceptId, Concept>, concept: &Concept) -> Result<()> {
    match map.get_mut(&concept.concept_id) {
        Some(existing) => {
            *existing = concept.clone();
            Ok(())
        }
        None => Err(StoreError::ConceptNotFound(concept.concept_id.clone())),
    }
}
