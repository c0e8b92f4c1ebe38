use std::collections::HashMap;
use std::thread;

use crate::api::{created_id, CourseBackend};
use crate::course::{ItemId, Section, SectionDraft, SectionId};
use crate::editor::{move_entry, EditorError, ReorderOutcome, SaveState};

/// Most section requests in flight at once, one thread each.
pub const MAX_PARALLEL_FETCHES: usize = 8;

/// Fetches sections concurrently, at most [`MAX_PARALLEL_FETCHES`] at a time.
/// A section that fails to load is logged and left out; the rest keep the
/// order of `ids`.
pub fn fetch_sections<B>(backend: &B, ids: &[SectionId]) -> Vec<Section>
where
    B: CourseBackend + Sync,
{
    ids.chunks(MAX_PARALLEL_FETCHES)
        .flat_map(|batch| fetch_batch(backend, batch))
        .collect()
}

fn fetch_batch<B>(backend: &B, ids: &[SectionId]) -> Vec<Section>
where
    B: CourseBackend + Sync,
{
    thread::scope(|scope| {
        let handles: Vec<_> = ids
            .iter()
            .map(|&id| scope.spawn(move || (id, backend.fetch_section(id))))
            .collect();

        handles
            .into_iter()
            .filter_map(|handle| match handle.join() {
                Ok((_, Ok(section))) => Some(section),
                Ok((id, Err(e))) => {
                    tracing::warn!("skipping section {}: {}", id, e);
                    None
                }
                Err(_) => {
                    tracing::warn!("section fetch panicked");
                    None
                }
            })
            .collect()
    })
}

/// Editing state of one activity's sections.
pub struct ActivityEditor<B> {
    backend: B,
    activity_id: ItemId,
    sections: Vec<Section>,
    unsaved: HashMap<SectionId, String>,
}

impl<B: CourseBackend + Sync> ActivityEditor<B> {
    pub fn open(backend: B, activity_id: ItemId, section_ids: &[SectionId]) -> Self {
        let sections = fetch_sections(&backend, section_ids);
        tracing::info!(
            "opened activity {} with {}/{} sections",
            activity_id,
            sections.len(),
            section_ids.len()
        );

        Self {
            backend,
            activity_id,
            sections,
            unsaved: HashMap::new(),
        }
    }
}

impl<B: CourseBackend> ActivityEditor<B> {
    pub fn activity_id(&self) -> ItemId {
        self.activity_id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn is_unsaved(&self, id: SectionId) -> bool {
        self.unsaved.contains_key(&id)
    }

    fn section_index(&self, id: SectionId) -> Result<usize, EditorError> {
        self.sections
            .iter()
            .position(|s| s.id == id)
            .ok_or(EditorError::SectionNotFound(id))
    }

    /// Creates a section and appends it once the backend returned it.
    pub fn add_section(&mut self, draft: SectionDraft) -> Result<SectionId, EditorError> {
        let body = self.backend.add_section(self.activity_id, &draft)?;
        let id = created_id(&body).ok_or(EditorError::MissingCreated("section"))?;
        let section = self.backend.fetch_section(id)?;
        self.sections.push(section);

        tracing::info!("added section {} to activity {}", id, self.activity_id);
        Ok(id)
    }

    /// Replaces the section body locally, then saves it. A failed save is
    /// reported and remembered, never rolled back.
    pub fn update_section(
        &mut self,
        id: SectionId,
        draft: SectionDraft,
    ) -> Result<SaveState, EditorError> {
        let index = self.section_index(id)?;
        let section = &mut self.sections[index];
        section.section_type = draft.section_type;
        section.mcq = draft.mcq.clone();
        section.code = draft.code.clone();

        match self.backend.update_section(id, &draft) {
            Ok(_) => {
                self.unsaved.remove(&id);
                Ok(SaveState::Saved)
            }
            Err(e) => {
                tracing::error!("failed to save section {}, keeping local value: {}", id, e);
                let reason = e.to_string();
                self.unsaved.insert(id, reason.clone());
                Ok(SaveState::Unsaved(reason))
            }
        }
    }

    pub fn remove_section(&mut self, id: SectionId) -> Result<(), EditorError> {
        let index = self.section_index(id)?;
        self.backend.delete_section(id)?;
        self.sections.remove(index);
        self.unsaved.remove(&id);
        Ok(())
    }

    pub fn reorder_sections(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<ReorderOutcome, EditorError> {
        let snapshot = self.sections.clone();
        move_entry(&mut self.sections, from, to)?;
        if from == to {
            return Ok(ReorderOutcome::Confirmed);
        }

        let order: Vec<SectionId> = self.sections.iter().map(|s| s.id).collect();
        match self.backend.reorder_sections(self.activity_id, &order) {
            Ok(_) => Ok(ReorderOutcome::Confirmed),
            Err(e) => {
                tracing::warn!(
                    "section reorder in activity {} rejected, restoring order: {}",
                    self.activity_id,
                    e
                );
                self.sections = snapshot;
                Ok(ReorderOutcome::RolledBack(e))
            }
        }
    }
}
