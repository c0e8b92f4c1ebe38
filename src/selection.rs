use crate::course::{Chapter, ChapterId, Item, ItemKey, SerialId};

/// What the sidebar currently targets. `None` at the call sites means
/// nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Chapter(ChapterId),
    Item { chapter_id: ChapterId, key: ItemKey },
}

impl Selection {
    pub fn chapter(id: ChapterId) -> Self {
        Selection::Chapter(id)
    }

    pub fn item(chapter_id: ChapterId, key: ItemKey) -> Self {
        Selection::Item { chapter_id, key }
    }

    /// Selection addressed by positional serial, e.g. `L1`.
    pub fn item_by_serial(chapter_id: ChapterId, serial: SerialId) -> Self {
        Selection::Item {
            chapter_id,
            key: ItemKey::Pending(serial),
        }
    }

    pub fn chapter_id(&self) -> ChapterId {
        match *self {
            Selection::Chapter(id) => id,
            Selection::Item { chapter_id, .. } => chapter_id,
        }
    }

    /// Looks the selection up in the current chapter list. A selection that no
    /// longer points at anything resolves to [`Resolved::Empty`].
    pub fn resolve<'a>(&self, chapters: &'a [Chapter]) -> Resolved<'a> {
        let Some(chapter) = chapters.iter().find(|c| c.id == self.chapter_id()) else {
            return Resolved::Empty;
        };

        match self {
            Selection::Chapter(_) => Resolved::Chapter(chapter),
            Selection::Item { key, .. } => match chapter.items.iter().find(|i| key.matches(i)) {
                Some(item) => Resolved::Item { chapter, item },
                None => Resolved::Empty,
            },
        }
    }
}

/// Which editor panel to show for a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Chapter(&'a Chapter),
    Item {
        chapter: &'a Chapter,
        item: &'a Item,
    },
    Empty,
}

impl Resolved<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Resolved::Empty)
    }
}

/// Same as [`Selection::resolve`] but for an optional selection.
pub fn resolve_selection<'a>(selection: Option<&Selection>, chapters: &'a [Chapter]) -> Resolved<'a> {
    selection.map_or(Resolved::Empty, |s| s.resolve(chapters))
}
