use serde_json::Value;
use tracing::debug;

use crate::editor::ingest::{normalize, IngestReport};
use crate::models::resume::{
    Collection, EducationEntry, Entry, EntryField, EntryId, ExperienceEntry, ResumeDocument,
    ScalarField,
};

/// The mutable resume document plus its id allocator.
///
/// All content mutation goes through these operations. Each returns whether the
/// document actually changed; operations aimed at a missing entry or index are
/// silent no-ops because editor UIs routinely act on stale references.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    doc: ResumeDocument,
    /// Next id handed out by `add_entry`. Only ever grows, so removed ids are never reused.
    next_id: EntryId,
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new(ResumeDocument::starter())
    }
}

impl DocumentModel {
    pub fn new(doc: ResumeDocument) -> Self {
        let next_id = doc.max_entry_id().map_or(0, |max| max + 1);
        Self { doc, next_id }
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.doc
    }

    pub fn set_field(&mut self, field: ScalarField, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.doc.scalar_mut(field);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Appends a placeholder entry at the end of `collection` and returns its id.
    pub fn add_entry(&mut self, collection: Collection) -> EntryId {
        let id = self.allocate_id();
        match collection {
            Collection::Experience => self.doc.experience.push(ExperienceEntry::placeholder(id)),
            Collection::Education => self.doc.education.push(EducationEntry::placeholder(id)),
            Collection::Projects => self
                .doc
                .projects
                .push(ExperienceEntry::project_placeholder(id)),
        }
        id
    }

    /// Replaces one field of the entry with `id`.
    ///
    /// No-op when the id is absent or `field` does not exist on entries of `collection`.
    pub fn update_entry(
        &mut self,
        collection: Collection,
        id: EntryId,
        field: EntryField,
        value: impl Into<String>,
    ) -> bool {
        let value = value.into();
        let changed = match collection {
            Collection::Experience => update_in(&mut self.doc.experience, id, field, value),
            Collection::Education => update_in(&mut self.doc.education, id, field, value),
            Collection::Projects => update_in(&mut self.doc.projects, id, field, value),
        };
        if !changed {
            debug!(
                collection = collection.as_str(),
                id,
                ?field,
                "update_entry left document unchanged"
            );
        }
        changed
    }

    /// Filters out the entry with `id`; the remaining entries keep their ids and order.
    pub fn remove_entry(&mut self, collection: Collection, id: EntryId) -> bool {
        let removed = match collection {
            Collection::Experience => remove_from(&mut self.doc.experience, id),
            Collection::Education => remove_from(&mut self.doc.education, id),
            Collection::Projects => remove_from(&mut self.doc.projects, id),
        };
        if !removed {
            debug!(collection = collection.as_str(), id, "remove_entry: no such entry");
        }
        removed
    }

    /// Appends a placeholder skill and returns its index.
    pub fn add_skill(&mut self) -> usize {
        self.doc.skills.push("New Skill".to_string());
        self.doc.skills.len() - 1
    }

    pub fn replace_skill(&mut self, index: usize, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.doc.skills.get_mut(index) {
            Some(skill) if *skill != value => {
                *skill = value;
                true
            }
            _ => false,
        }
    }

    pub fn remove_skill(&mut self, index: usize) -> bool {
        if index < self.doc.skills.len() {
            self.doc.skills.remove(index);
            true
        } else {
            false
        }
    }

    /// Replaces the whole document with the normalized form of `data`.
    ///
    /// This discards any in-progress edits; loads never merge with prior state.
    /// Ids are derived from position, and the allocator moves past both the new ids
    /// and every id issued before, so nothing handed out in this session is reused.
    pub fn load_from(&mut self, data: &Value) -> IngestReport {
        let (doc, report) = normalize(data);
        if !report.is_clean() {
            debug!(?report, "normalized partial resume data");
        }
        let floor = doc.max_entry_id().map_or(0, |max| max + 1);
        self.next_id = self.next_id.max(floor);
        self.doc = doc;
        report
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn update_in<E: Entry>(entries: &mut [E], id: EntryId, field: EntryField, value: String) -> bool {
    let Some(slot) = entries
        .iter_mut()
        .find(|e| e.id() == id)
        .and_then(|e| e.field_mut(field))
    else {
        return false;
    };
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn remove_from<E: Entry>(entries: &mut Vec<E>, id: EntryId) -> bool {
    let before = entries.len();
    entries.retain(|e| e.id() != id);
    entries.len() != before
}
