//! In-memory note collection.
//!
//! Storage order is insertion order with the newest entry first. Every
//! mutator returns whether it changed anything; an unknown id is a no-op.

use chrono::Utc;
use log::{debug, trace, warn};

use crate::{Note, NotePatch};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotesStore {
    notes: Vec<Note>,
}

impl NotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store over an already ordered collection, e.g. after rehydration
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Inserts `note` at the front. Duplicate ids are accepted.
    pub fn add(&mut self, note: Note) {
        if self.get(&note.id).is_some() {
            warn!("Adding note with duplicate id: {}", note.id);
        }
        trace!("Adding note: {}", note.id);
        self.notes.insert(0, note);
    }

    /// Adds each note in turn, so the last one in the batch ends up first.
    pub fn import(&mut self, notes: Vec<Note>) -> usize {
        let count = notes.len();
        for note in notes {
            self.add(note);
        }
        debug!("Imported {} notes", count);
        count
    }

    pub fn update(&mut self, id: &str, patch: NotePatch) -> bool {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => note.apply(patch, Utc::now()),
            None => {
                debug!("Update skipped, note not found: {}", id);
                false
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        let removed = self.notes.len() != before;
        if !removed {
            debug!("Delete skipped, note not found: {}", id);
        }
        removed
    }

    pub fn toggle_pin(&mut self, id: &str) -> bool {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.is_pinned = !note.is_pinned;
                true
            }
            None => {
                debug!("Pin toggle skipped, note not found: {}", id);
                false
            }
        }
    }
}
