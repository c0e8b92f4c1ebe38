use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use super::{ApiConfig, CourseBackend, RequestError};
use crate::course::{
    Chapter, ChapterDraft, ChapterId, Course, CourseId, ItemDraft, ItemId, ItemType, Section,
    SectionDraft, SectionId,
};

/// Blocking HTTP client for the Quark backend.
pub struct ApiClient {
    config: ApiConfig,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        Self { config, agent }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.config.token = token;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let request = self.agent.request(method, &url);
        match self.config.token {
            Some(ref token) => request.set("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.request("GET", path)
            .call()?
            .into_json()
            .map_err(|e| RequestError::Decode(e.to_string()))
    }

    fn send_text<B: Serialize>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<String, RequestError> {
        self.request(method, path)
            .set("Content-Type", "application/json")
            .send_json(body)?
            .into_string()
            .map_err(|e| RequestError::Decode(e.to_string()))
    }

    fn call_text(&self, method: &str, path: &str) -> Result<String, RequestError> {
        self.request(method, path)
            .call()?
            .into_string()
            .map_err(|e| RequestError::Decode(e.to_string()))
    }
}

impl CourseBackend for ApiClient {
    fn fetch_course(&self, course_id: CourseId) -> Result<Course, RequestError> {
        self.get_json(&format!("/course/{}", course_id))
    }

    fn fetch_chapter(&self, chapter_id: ChapterId) -> Result<Chapter, RequestError> {
        self.get_json(&format!("/chapter/{}", chapter_id))
    }

    fn add_chapter(
        &self,
        course_id: CourseId,
        draft: &ChapterDraft,
    ) -> Result<String, RequestError> {
        self.send_text("POST", &format!("/course/{}/chapter", course_id), draft)
    }

    fn update_chapter(
        &self,
        chapter_id: ChapterId,
        draft: &ChapterDraft,
    ) -> Result<String, RequestError> {
        self.send_text("PUT", &format!("/chapter/{}", chapter_id), draft)
    }

    fn delete_chapter(&self, chapter_id: ChapterId) -> Result<String, RequestError> {
        self.call_text("DELETE", &format!("/chapter/{}", chapter_id))
    }

    fn reorder_chapters(
        &self,
        course_id: CourseId,
        order: &[ChapterId],
    ) -> Result<String, RequestError> {
        self.send_text("PATCH", &format!("/course/{}", course_id), &order)
    }

    fn add_item(&self, chapter_id: ChapterId, draft: &ItemDraft) -> Result<String, RequestError> {
        let path = format!(
            "/chapter/{}/{}",
            chapter_id,
            draft.item_type.path_segment()
        );
        self.send_text("POST", &path, draft)
    }

    fn update_item(
        &self,
        item_type: ItemType,
        item_id: ItemId,
        draft: &ItemDraft,
    ) -> Result<String, RequestError> {
        let path = format!("/{}/{}", item_type.path_segment(), item_id);
        self.send_text("PUT", &path, draft)
    }

    fn delete_item(&self, item_type: ItemType, item_id: ItemId) -> Result<String, RequestError> {
        self.call_text("DELETE", &format!("/{}/{}", item_type.path_segment(), item_id))
    }

    fn reorder_items(
        &self,
        chapter_id: ChapterId,
        order: &[ItemId],
    ) -> Result<String, RequestError> {
        self.send_text("PATCH", &format!("/chapter/{}", chapter_id), &order)
    }

    fn fetch_section(&self, section_id: SectionId) -> Result<Section, RequestError> {
        self.get_json(&format!("/section/{}", section_id))
    }

    fn add_section(
        &self,
        activity_id: ItemId,
        draft: &SectionDraft,
    ) -> Result<String, RequestError> {
        self.send_text("POST", &format!("/section/{}", activity_id), draft)
    }

    fn update_section(
        &self,
        section_id: SectionId,
        draft: &SectionDraft,
    ) -> Result<String, RequestError> {
        self.send_text("PUT", &format!("/section/{}", section_id), draft)
    }

    fn delete_section(&self, section_id: SectionId) -> Result<String, RequestError> {
        self.call_text("DELETE", &format!("/section/{}", section_id))
    }

    fn reorder_sections(
        &self,
        activity_id: ItemId,
        order: &[SectionId],
    ) -> Result<String, RequestError> {
        self.send_text("PATCH", &format!("/activity/{}", activity_id), &order)
    }
}
