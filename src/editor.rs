//! In-memory course structure editing against the backend.
//!
//! [`CourseEditor`] owns the chapter/item list shown in the sidebar together
//! with the current [`Selection`]. Every structural change goes through one of
//! its actions, which decide whether the local list changes before or after
//! the backend has confirmed.

mod actions;
mod reorder;

use std::collections::HashMap;

use thiserror::Error;

use crate::api::{CourseBackend, RequestError};
use crate::course::{assign_serial_ids, Chapter, ChapterId, CourseId, ItemKey, SectionId};
use crate::selection::{resolve_selection, Resolved, Selection};

pub use reorder::{move_entry, ItemPosition, ReorderOutcome};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("chapter {0} not found")]
    ChapterNotFound(ChapterId),

    #[error("item {key:?} not found in chapter {chapter_id}")]
    ItemNotFound { chapter_id: ChapterId, key: ItemKey },

    #[error("section {0} not found")]
    SectionNotFound(SectionId),

    #[error("index {index} out of bounds for {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("backend did not return the created {0}")]
    MissingCreated(&'static str),
}

/// Something that can be edited and saved on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Chapter(ChapterId),
    Item(ChapterId, ItemKey),
    Section(SectionId),
}

/// Result of an optimistic save. The local value is kept either way.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveState {
    Saved,
    /// the backend rejected the save, the reason is what users get to see
    Unsaved(String),
}

impl SaveState {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveState::Saved)
    }
}

pub struct CourseEditor<B> {
    backend: B,
    course_id: CourseId,
    chapters: Vec<Chapter>,
    selection: Option<Selection>,
    unsaved: HashMap<Entity, String>,
}

impl<B: CourseBackend> CourseEditor<B> {
    /// Fetches the course and numbers every chapter's items.
    pub fn load(backend: B, course_id: CourseId) -> Result<Self, RequestError> {
        let course = backend.fetch_course(course_id)?;
        tracing::info!(
            "loaded course {} with {} chapters",
            course_id,
            course.chapters.len()
        );
        Ok(Self::from_chapters(backend, course_id, course.chapters))
    }
}

impl<B> CourseEditor<B> {
    pub fn from_chapters(backend: B, course_id: CourseId, mut chapters: Vec<Chapter>) -> Self {
        for chapter in chapters.iter_mut() {
            assign_serial_ids(&mut chapter.items);
        }

        Self {
            backend,
            course_id,
            chapters,
            selection: None,
            unsaved: HashMap::new(),
        }
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, id: ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// What the editor panel should show for the current selection.
    pub fn resolved(&self) -> Resolved<'_> {
        resolve_selection(self.selection.as_ref(), &self.chapters)
    }

    pub fn is_unsaved(&self, entity: &Entity) -> bool {
        self.unsaved.contains_key(entity)
    }

    /// Entities whose last save failed, with the reason.
    pub fn unsaved(&self) -> impl Iterator<Item = (&Entity, &str)> {
        self.unsaved.iter().map(|(e, reason)| (e, reason.as_str()))
    }

    fn chapter_index(&self, id: ChapterId) -> Result<usize, EditorError> {
        self.chapters
            .iter()
            .position(|c| c.id == id)
            .ok_or(EditorError::ChapterNotFound(id))
    }

    fn item_index(&self, chapter_index: usize, key: ItemKey) -> Result<usize, EditorError> {
        let chapter = &self.chapters[chapter_index];
        chapter
            .items
            .iter()
            .position(|i| key.matches(i))
            .ok_or(EditorError::ItemNotFound {
                chapter_id: chapter.id,
                key,
            })
    }

    fn record_save(&mut self, entity: Entity, result: Result<String, RequestError>) -> SaveState {
        match result {
            Ok(_) => {
                self.unsaved.remove(&entity);
                SaveState::Saved
            }
            Err(e) => {
                tracing::error!("failed to save {:?}, keeping local value: {}", entity, e);
                let reason = e.to_string();
                self.unsaved.insert(entity, reason.clone());
                SaveState::Unsaved(reason)
            }
        }
    }
}
