mod chapter;
mod item;
mod section;
mod serial;

pub use chapter::{Chapter, ChapterDraft, ChapterId, ChapterPatch, Course, CourseId};
pub use item::{Item, ItemDraft, ItemId, ItemPatch, ItemType};
pub use section::{
    CodeSection, McqSection, Question, Section, SectionDraft, SectionId, SectionType, TestCase,
};
pub use serial::{assign_serial_ids, ItemKey, ParseSerialError, SerialId};
