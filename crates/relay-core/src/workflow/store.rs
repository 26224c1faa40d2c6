//! Phase Result Store — the generated text of each phase, keyed by phase.

use crate::workflow::schema::PhaseId;

/// Write-once mapping from [`PhaseId`] to generated text.
///
/// Keys are fixed at compile time, so the store is a slot per phase rather
/// than a map. Iteration always follows execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseResults {
    slots: [Option<String>; 5],
}

impl PhaseResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the output of `id`. A phase is populated exactly once; a second
    /// insert leaves the store untouched and hands the rejected text back.
    pub fn insert(&mut self, id: PhaseId, text: String) -> Result<(), String> {
        let slot = &mut self.slots[id.index()];
        if slot.is_some() {
            return Err(text);
        }
        *slot = Some(text);
        Ok(())
    }

    pub fn get(&self, id: PhaseId) -> Option<&str> {
        self.slots[id.index()].as_deref()
    }

    pub fn contains(&self, id: PhaseId) -> bool {
        self.slots[id.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` once all five phases have output.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Populated store keys, in execution order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.iter().map(|(id, _)| id.key()).collect()
    }

    /// Populated phases and their text, in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (PhaseId, &str)> + '_ {
        PhaseId::ALL
            .into_iter()
            .filter_map(move |id| self.get(id).map(|text| (id, text)))
    }
}
