use crate::course::{
    Chapter, ChapterDraft, ChapterId, Course, CourseId, ItemDraft, ItemId, ItemType, Section,
    SectionDraft, SectionId,
};

use super::RequestError;

/// The REST endpoints the editors depend on.
///
/// [`ApiClient`](super::ApiClient) talks to the real backend; tests swap in an
/// in-memory double. Acknowledgement bodies are returned as plain text.
pub trait CourseBackend {
    /// `GET /course/{courseId}`, chapters include their items
    fn fetch_course(&self, course_id: CourseId) -> Result<Course, RequestError>;

    /// `GET /chapter/{chapterId}`
    fn fetch_chapter(&self, chapter_id: ChapterId) -> Result<Chapter, RequestError>;

    /// `POST /course/{courseId}/chapter`
    fn add_chapter(&self, course_id: CourseId, draft: &ChapterDraft)
        -> Result<String, RequestError>;

    /// `PUT /chapter/{chapterId}`
    fn update_chapter(
        &self,
        chapter_id: ChapterId,
        draft: &ChapterDraft,
    ) -> Result<String, RequestError>;

    /// `DELETE /chapter/{chapterId}`
    fn delete_chapter(&self, chapter_id: ChapterId) -> Result<String, RequestError>;

    /// `PATCH /course/{courseId}` with the full ordered list of chapter ids
    fn reorder_chapters(
        &self,
        course_id: CourseId,
        order: &[ChapterId],
    ) -> Result<String, RequestError>;

    /// `POST /chapter/{chapterId}/{lesson|activity}`
    fn add_item(&self, chapter_id: ChapterId, draft: &ItemDraft) -> Result<String, RequestError>;

    /// `PUT /{lesson|activity}/{itemId}`
    fn update_item(
        &self,
        item_type: ItemType,
        item_id: ItemId,
        draft: &ItemDraft,
    ) -> Result<String, RequestError>;

    /// `DELETE /{lesson|activity}/{itemId}`
    fn delete_item(&self, item_type: ItemType, item_id: ItemId) -> Result<String, RequestError>;

    /// `PATCH /chapter/{chapterId}` with the full ordered list of item ids
    fn reorder_items(&self, chapter_id: ChapterId, order: &[ItemId])
        -> Result<String, RequestError>;

    /// `GET /section/{sectionId}`
    fn fetch_section(&self, section_id: SectionId) -> Result<Section, RequestError>;

    /// `POST /section/{activityId}`
    fn add_section(&self, activity_id: ItemId, draft: &SectionDraft)
        -> Result<String, RequestError>;

    /// `PUT /section/{sectionId}`
    fn update_section(
        &self,
        section_id: SectionId,
        draft: &SectionDraft,
    ) -> Result<String, RequestError>;

    /// `DELETE /section/{sectionId}`
    fn delete_section(&self, section_id: SectionId) -> Result<String, RequestError>;

    /// `PATCH /activity/{activityId}` with the full ordered list of section ids
    fn reorder_sections(
        &self,
        activity_id: ItemId,
        order: &[SectionId],
    ) -> Result<String, RequestError>;
}

impl<B: CourseBackend + ?Sized> CourseBackend for &B {
    fn fetch_course(&self, course_id: CourseId) -> Result<Course, RequestError> {
        (**self).fetch_course(course_id)
    }

    fn fetch_chapter(&self, chapter_id: ChapterId) -> Result<Chapter, RequestError> {
        (**self).fetch_chapter(chapter_id)
    }

    fn add_chapter(
        &self,
        course_id: CourseId,
        draft: &ChapterDraft,
    ) -> Result<String, RequestError> {
        (**self).add_chapter(course_id, draft)
    }

    fn update_chapter(
        &self,
        chapter_id: ChapterId,
        draft: &ChapterDraft,
    ) -> Result<String, RequestError> {
        (**self).update_chapter(chapter_id, draft)
    }

    fn delete_chapter(&self, chapter_id: ChapterId) -> Result<String, RequestError> {
        (**self).delete_chapter(chapter_id)
    }

    fn reorder_chapters(
        &self,
        course_id: CourseId,
        order: &[ChapterId],
    ) -> Result<String, RequestError> {
        (**self).reorder_chapters(course_id, order)
    }

    fn add_item(&self, chapter_id: ChapterId, draft: &ItemDraft) -> Result<String, RequestError> {
        (**self).add_item(chapter_id, draft)
    }

    fn update_item(
        &self,
        item_type: ItemType,
        item_id: ItemId,
        draft: &ItemDraft,
    ) -> Result<String, RequestError> {
        (**self).update_item(item_type, item_id, draft)
    }

    fn delete_item(&self, item_type: ItemType, item_id: ItemId) -> Result<String, RequestError> {
        (**self).delete_item(item_type, item_id)
    }

    fn reorder_items(
        &self,
        chapter_id: ChapterId,
        order: &[ItemId],
    ) -> Result<String, RequestError> {
        (**self).reorder_items(chapter_id, order)
    }

    fn fetch_section(&self, section_id: SectionId) -> Result<Section, RequestError> {
        (**self).fetch_section(section_id)
    }

    fn add_section(
        &self,
        activity_id: ItemId,
        draft: &SectionDraft,
    ) -> Result<String, RequestError> {
        (**self).add_section(activity_id, draft)
    }

    fn update_section(
        &self,
        section_id: SectionId,
        draft: &SectionDraft,
    ) -> Result<String, RequestError> {
        (**self).update_section(section_id, draft)
    }

    fn delete_section(&self, section_id: SectionId) -> Result<String, RequestError> {
        (**self).delete_section(section_id)
    }

    fn reorder_sections(
        &self,
        activity_id: ItemId,
        order: &[SectionId],
    ) -> Result<String, RequestError> {
        (**self).reorder_sections(activity_id, order)
    }
}
