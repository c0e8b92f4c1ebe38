use super::{CourseEditor, EditorError, Entity, SaveState};
use crate::api::CourseBackend;
use crate::course::{
    assign_serial_ids, ChapterDraft, ChapterId, ChapterPatch, ItemDraft, ItemKey, ItemPatch,
};
use crate::ruleset::RulesetField;
use crate::selection::Selection;

impl<B: CourseBackend> CourseEditor<B> {
    /// Creates a chapter, reloads the course's chapters and selects the last
    /// one, which the backend appends as the new chapter.
    pub fn add_chapter(&mut self, draft: ChapterDraft) -> Result<ChapterId, EditorError> {
        self.backend.add_chapter(self.course_id, &draft)?;

        let course = self.backend.fetch_course(self.course_id)?;
        let mut chapters = course.chapters;
        for chapter in chapters.iter_mut() {
            assign_serial_ids(&mut chapter.items);
        }
        self.chapters = chapters;

        let id = self
            .chapters
            .last()
            .map(|c| c.id)
            .ok_or(EditorError::MissingCreated("chapter"))?;
        self.selection = Some(Selection::Chapter(id));

        tracing::info!("added chapter {} to course {}", id, self.course_id);
        Ok(id)
    }

    /// Adds a placeholder chapter named after its position.
    pub fn add_default_chapter(&mut self) -> Result<ChapterId, EditorError> {
        self.add_chapter(ChapterDraft::numbered(self.chapters.len() + 1))
    }

    /// Deletes a chapter. Local state only changes once the backend agreed.
    pub fn remove_chapter(&mut self, id: ChapterId) -> Result<(), EditorError> {
        self.chapter_index(id)?;
        self.backend.delete_chapter(id)?;

        self.chapters.retain(|c| c.id != id);
        self.unsaved.retain(|entity, _| match entity {
            Entity::Chapter(chapter_id) | Entity::Item(chapter_id, _) => *chapter_id != id,
            Entity::Section(_) => true,
        });
        if self.selection.is_some_and(|s| s.chapter_id() == id) {
            self.selection = None;
        }

        tracing::info!("removed chapter {}", id);
        Ok(())
    }

    /// Applies the patch locally, then saves the chapter. A failed save is
    /// reported and remembered, never rolled back.
    pub fn update_chapter(
        &mut self,
        id: ChapterId,
        patch: &ChapterPatch,
    ) -> Result<SaveState, EditorError> {
        let index = self.chapter_index(id)?;
        let chapter = &mut self.chapters[index];
        chapter.apply_patch(patch);
        let draft = chapter.draft();

        let result = self.backend.update_chapter(id, &draft);
        Ok(self.record_save(Entity::Chapter(id), result))
    }

    /// Reloads one chapter's items from the backend and renumbers them.
    pub fn reload_chapter(&mut self, id: ChapterId) -> Result<(), EditorError> {
        let index = self.chapter_index(id)?;
        let mut fetched = self.backend.fetch_chapter(id)?;
        assign_serial_ids(&mut fetched.items);
        self.chapters[index].items = fetched.items;
        Ok(())
    }

    /// Creates a lesson or activity, reloads the chapter's items and selects
    /// the last one, which the backend appends as the new item.
    pub fn add_item(
        &mut self,
        chapter_id: ChapterId,
        draft: ItemDraft,
    ) -> Result<ItemKey, EditorError> {
        self.chapter_index(chapter_id)?;
        self.backend.add_item(chapter_id, &draft)?;
        self.reload_chapter(chapter_id)?;

        let key = self
            .chapter(chapter_id)
            .and_then(|c| c.items.last())
            .and_then(|i| i.key())
            .ok_or(EditorError::MissingCreated("item"))?;
        self.selection = Some(Selection::Item { chapter_id, key });

        tracing::info!("added {:?} to chapter {}", key, chapter_id);
        Ok(key)
    }

    /// Deletes an item. When it was selected, the selection moves up to its
    /// chapter.
    pub fn remove_item(&mut self, chapter_id: ChapterId, key: ItemKey) -> Result<(), EditorError> {
        let chapter_index = self.chapter_index(chapter_id)?;
        let item_index = self.item_index(chapter_index, key)?;

        let item = &self.chapters[chapter_index].items[item_index];
        if let Some(id) = item.id {
            self.backend.delete_item(item.item_type, id)?;
        }

        let removed = self.chapters[chapter_index].items.remove(item_index);
        if let Some(removed_key) = removed.key() {
            self.unsaved.remove(&Entity::Item(chapter_id, removed_key));
        }
        if let Some(Selection::Item {
            chapter_id: selected_chapter,
            key: selected,
        }) = self.selection
        {
            if selected_chapter == chapter_id && selected.matches(&removed) {
                self.selection = Some(Selection::Chapter(chapter_id));
            }
        }

        tracing::info!("removed {:?} from chapter {}", key, chapter_id);
        Ok(())
    }

    /// Applies the patch locally, then saves the item. A failed save is
    /// reported and remembered, never rolled back.
    pub fn update_item(
        &mut self,
        chapter_id: ChapterId,
        key: ItemKey,
        patch: &ItemPatch,
    ) -> Result<SaveState, EditorError> {
        let chapter_index = self.chapter_index(chapter_id)?;
        let item_index = self.item_index(chapter_index, key)?;
        self.chapters[chapter_index].items[item_index].apply_patch(patch);

        Ok(self.save_item(chapter_index, item_index))
    }

    /// Changes one field of an activity's ruleset and saves the item.
    pub fn update_item_ruleset(
        &mut self,
        chapter_id: ChapterId,
        key: ItemKey,
        field: RulesetField,
    ) -> Result<SaveState, EditorError> {
        let chapter_index = self.chapter_index(chapter_id)?;
        let item_index = self.item_index(chapter_index, key)?;
        self.chapters[chapter_index].items[item_index].update_ruleset(field);

        Ok(self.save_item(chapter_index, item_index))
    }

    fn save_item(&mut self, chapter_index: usize, item_index: usize) -> SaveState {
        let chapter_id = self.chapters[chapter_index].id;
        let item = &self.chapters[chapter_index].items[item_index];
        let Some(entity_key) = item.key() else {
            return SaveState::Unsaved(String::from("item has no id yet"));
        };
        let entity = Entity::Item(chapter_id, entity_key);

        match item.id {
            Some(id) => {
                let result = self.backend.update_item(item.item_type, id, &item.draft());
                self.record_save(entity, result)
            }
            None => {
                let reason = String::from("item has not been created on the server yet");
                self.unsaved.insert(entity, reason.clone());
                SaveState::Unsaved(reason)
            }
        }
    }
}
