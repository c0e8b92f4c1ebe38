use super::{CourseEditor, EditorError};
use crate::api::{CourseBackend, RequestError};
use crate::course::{assign_serial_ids, ChapterId, Item, ItemId, ItemKey};
use crate::selection::Selection;

/// How a drag-and-drop reorder ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome {
    /// the backend accepted the new order, the optimistic state stands
    Confirmed,
    /// the backend rejected it and the pre-drag order was restored
    RolledBack(RequestError),
    /// a cross-chapter move was only half accepted, both chapters were
    /// reloaded from the backend
    Reconciled(RequestError),
}

impl ReorderOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ReorderOutcome::Confirmed)
    }
}

/// Where an item sits, or should land, during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPosition {
    pub chapter_id: ChapterId,
    pub index: usize,
}

impl ItemPosition {
    pub fn new(chapter_id: ChapterId, index: usize) -> Self {
        Self { chapter_id, index }
    }
}

/// Removes the entry at `from` and inserts it at `to`.
pub fn move_entry<T>(list: &mut Vec<T>, from: usize, to: usize) -> Result<(), EditorError> {
    let len = list.len();
    for index in [from, to] {
        if index >= len {
            return Err(EditorError::IndexOutOfBounds { index, len });
        }
    }

    let entry = list.remove(from);
    list.insert(to, entry);
    Ok(())
}

fn item_ids(items: &[Item]) -> Vec<ItemId> {
    items.iter().filter_map(|i| i.id).collect()
}

impl<B: CourseBackend> CourseEditor<B> {
    /// Moves a chapter and sends the complete new chapter order. The previous
    /// order comes back if the backend refuses it.
    pub fn reorder_chapters(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<ReorderOutcome, EditorError> {
        let snapshot = self.chapters.clone();
        move_entry(&mut self.chapters, from, to)?;
        if from == to {
            return Ok(ReorderOutcome::Confirmed);
        }

        let order: Vec<ChapterId> = self.chapters.iter().map(|c| c.id).collect();
        match self.backend.reorder_chapters(self.course_id, &order) {
            Ok(_) => Ok(ReorderOutcome::Confirmed),
            Err(e) => {
                tracing::warn!("chapter reorder rejected, restoring order: {}", e);
                self.chapters = snapshot;
                Ok(ReorderOutcome::RolledBack(e))
            }
        }
    }

    /// Moves an item inside its chapter or into another one.
    ///
    /// A cross-chapter move sends the destination's order first, then the
    /// source's. If the first call fails nothing changed on the backend and
    /// both chapters are restored. If only the second one fails, both
    /// chapters are reloaded, since the backend already holds half the move.
    pub fn move_item(
        &mut self,
        from: ItemPosition,
        to: ItemPosition,
    ) -> Result<ReorderOutcome, EditorError> {
        if from.chapter_id == to.chapter_id {
            return self.reorder_within(from.chapter_id, from.index, to.index);
        }

        let source = self.chapter_index(from.chapter_id)?;
        let destination = self.chapter_index(to.chapter_id)?;

        let source_len = self.chapters[source].items.len();
        if from.index >= source_len {
            return Err(EditorError::IndexOutOfBounds {
                index: from.index,
                len: source_len,
            });
        }
        let destination_len = self.chapters[destination].items.len();
        if to.index > destination_len {
            return Err(EditorError::IndexOutOfBounds {
                index: to.index,
                len: destination_len,
            });
        }

        let source_snapshot = self.chapters[source].items.clone();
        let destination_snapshot = self.chapters[destination].items.clone();
        let selection_snapshot = self.selection;

        let item = self.chapters[source].items.remove(from.index);
        self.chapters[destination].items.insert(to.index, item);
        self.renumber_after_move(from, to);

        let destination_order = item_ids(&self.chapters[destination].items);
        if let Err(e) = self.backend.reorder_items(to.chapter_id, &destination_order) {
            tracing::warn!("item move rejected, restoring both chapters: {}", e);
            self.chapters[source].items = source_snapshot;
            self.chapters[destination].items = destination_snapshot;
            self.selection = selection_snapshot;
            return Ok(ReorderOutcome::RolledBack(e));
        }

        let source_order = item_ids(&self.chapters[source].items);
        if let Err(e) = self.backend.reorder_items(from.chapter_id, &source_order) {
            tracing::warn!(
                "item move only half applied, reloading chapters {} and {}: {}",
                from.chapter_id,
                to.chapter_id,
                e
            );
            let reloaded = self
                .backend
                .fetch_chapter(from.chapter_id)
                .and_then(|s| Ok((s, self.backend.fetch_chapter(to.chapter_id)?)));

            return Ok(match reloaded {
                Ok((mut fetched_source, mut fetched_destination)) => {
                    assign_serial_ids(&mut fetched_source.items);
                    assign_serial_ids(&mut fetched_destination.items);
                    self.chapters[source].items = fetched_source.items;
                    self.chapters[destination].items = fetched_destination.items;
                    ReorderOutcome::Reconciled(e)
                }
                Err(reload_error) => {
                    tracing::warn!(
                        "could not reload chapters, restoring both: {}",
                        reload_error
                    );
                    self.chapters[source].items = source_snapshot;
                    self.chapters[destination].items = destination_snapshot;
                    self.selection = selection_snapshot;
                    ReorderOutcome::RolledBack(e)
                }
            });
        }

        Ok(ReorderOutcome::Confirmed)
    }

    fn reorder_within(
        &mut self,
        chapter_id: ChapterId,
        from: usize,
        to: usize,
    ) -> Result<ReorderOutcome, EditorError> {
        let index = self.chapter_index(chapter_id)?;
        let snapshot = self.chapters[index].items.clone();
        let selection_snapshot = self.selection;
        move_entry(&mut self.chapters[index].items, from, to)?;
        if from == to {
            return Ok(ReorderOutcome::Confirmed);
        }
        self.renumber_after_move(
            ItemPosition::new(chapter_id, from),
            ItemPosition::new(chapter_id, to),
        );

        let order = item_ids(&self.chapters[index].items);
        match self.backend.reorder_items(chapter_id, &order) {
            Ok(_) => Ok(ReorderOutcome::Confirmed),
            Err(e) => {
                tracing::warn!(
                    "item reorder in chapter {} rejected, restoring order: {}",
                    chapter_id,
                    e
                );
                self.chapters[index].items = snapshot;
                self.selection = selection_snapshot;
                Ok(ReorderOutcome::RolledBack(e))
            }
        }
    }

    /// Serials are positional, so the chapters involved are renumbered after
    /// every move. A selected item stays selected: it is located before the
    /// renumbering and then re-keyed, by server id when it has one.
    fn renumber_after_move(&mut self, from: ItemPosition, to: ItemPosition) {
        let selected = match self.selection {
            Some(Selection::Item { chapter_id, key }) => {
                self.locate_after_move(chapter_id, key, from, to)
            }
            _ => None,
        };

        for chapter in self
            .chapters
            .iter_mut()
            .filter(|c| c.id == from.chapter_id || c.id == to.chapter_id)
        {
            assign_serial_ids(&mut chapter.items);
        }

        if let Some((chapter_id, index)) = selected {
            let key = self
                .chapter(chapter_id)
                .and_then(|c| c.items.get(index))
                .and_then(|item| item.key());
            if let Some(key) = key {
                self.selection = Some(Selection::Item { chapter_id, key });
            }
        }
    }

    /// Chapter and index of the item `key` pointed at before the move from
    /// `from` to `to`. Serials are still the pre-move ones here, and the moved
    /// item carries its serial from the source chapter.
    fn locate_after_move(
        &self,
        chapter_id: ChapterId,
        key: ItemKey,
        from: ItemPosition,
        to: ItemPosition,
    ) -> Option<(ChapterId, usize)> {
        if chapter_id != from.chapter_id && chapter_id != to.chapter_id {
            return None;
        }

        let moved = self.chapter(to.chapter_id)?.items.get(to.index)?;
        if chapter_id == from.chapter_id && key.matches(moved) {
            return Some((to.chapter_id, to.index));
        }

        self.chapter(chapter_id)?
            .items
            .iter()
            .enumerate()
            .filter(|(index, _)| chapter_id != to.chapter_id || *index != to.index)
            .find(|(_, item)| key.matches(item))
            .map(|(index, _)| (chapter_id, index))
    }
}
