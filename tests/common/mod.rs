#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use quark::api::{CourseBackend, RequestError};
use quark::course::{
    Chapter, ChapterDraft, ChapterId, Course, CourseId, Item, ItemDraft, ItemId, ItemType,
    McqSection, Section, SectionDraft, SectionId, SectionType,
};

/// In-memory backend that keeps its own copy of the course, records every
/// call and fails the endpoints it is told to.
pub struct MockBackend {
    state: Mutex<State>,
}

pub struct State {
    pub course: Course,
    pub sections: HashMap<SectionId, Section>,
    pub calls: Vec<String>,
    failures: Vec<(&'static str, Option<i64>)>,
    next_id: i64,
}

impl MockBackend {
    pub fn new(course: Course) -> Self {
        Self {
            state: Mutex::new(State {
                course,
                sections: HashMap::new(),
                calls: Vec::new(),
                failures: Vec::new(),
                next_id: 100,
            }),
        }
    }

    pub fn with_next_id(self, next_id: i64) -> Self {
        self.state().next_id = next_id;
        self
    }

    pub fn with_sections(self, sections: Vec<Section>) -> Self {
        self.state().sections = sections.into_iter().map(|s| (s.id, s)).collect();
        self
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Makes `endpoint` fail, for one id or for all of them.
    pub fn fail(&self, endpoint: &'static str, id: Option<i64>) {
        self.state().failures.push((endpoint, id));
    }

    pub fn recover(&self) {
        self.state().failures.clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.split(' ').next() == Some(endpoint))
            .collect()
    }

    pub fn server_chapter_ids(&self) -> Vec<ChapterId> {
        self.state().course.chapters.iter().map(|c| c.id).collect()
    }

    pub fn server_item_ids(&self, chapter_id: ChapterId) -> Vec<ItemId> {
        self.state()
            .course
            .chapters
            .iter()
            .find(|c| c.id == chapter_id)
            .map(|c| c.items.iter().filter_map(|i| i.id).collect())
            .unwrap_or_default()
    }

    fn call(&self, endpoint: &'static str, id: i64, detail: String) -> Result<MutexGuard<'_, State>, RequestError> {
        let mut state = self.state();
        state.calls.push(format!("{} {}{}", endpoint, id, detail));

        let failing = state
            .failures
            .iter()
            .any(|(e, failing_id)| *e == endpoint && failing_id.map_or(true, |f| f == id));
        if failing {
            return Err(RequestError::Server {
                status: 500,
                body: format!("{} failed", endpoint),
            });
        }
        Ok(state)
    }
}

impl State {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn chapter_mut(&mut self, id: ChapterId) -> Result<&mut Chapter, RequestError> {
        self.course
            .chapters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(not_found)
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut Item, RequestError> {
        self.course
            .chapters
            .iter_mut()
            .flat_map(|c| c.items.iter_mut())
            .find(|i| i.id == Some(id))
            .ok_or_else(not_found)
    }
}

fn not_found() -> RequestError {
    RequestError::Server {
        status: 404,
        body: String::from("Not found"),
    }
}

fn ids<T: std::fmt::Debug>(order: &[T]) -> String {
    format!(" {:?}", order)
}

impl CourseBackend for MockBackend {
    fn fetch_course(&self, course_id: CourseId) -> Result<Course, RequestError> {
        let state = self.call("fetch_course", course_id, String::new())?;
        Ok(state.course.clone())
    }

    fn fetch_chapter(&self, chapter_id: ChapterId) -> Result<Chapter, RequestError> {
        let mut state = self.call("fetch_chapter", chapter_id, String::new())?;
        Ok(state.chapter_mut(chapter_id)?.clone())
    }

    fn add_chapter(&self, course_id: CourseId, draft: &ChapterDraft) -> Result<String, RequestError> {
        let mut state = self.call("add_chapter", course_id, format!(" {}", draft.name))?;
        let id = state.next_id();
        let idx = state.course.chapters.len() as u32;
        let mut chapter = Chapter::new(id, &draft.name);
        chapter.idx = idx;
        chapter.description = draft.description.clone();
        chapter.icon = draft.icon.clone();
        state.course.chapters.push(chapter);
        Ok(id.to_string())
    }

    fn update_chapter(&self, chapter_id: ChapterId, draft: &ChapterDraft) -> Result<String, RequestError> {
        let mut state = self.call("update_chapter", chapter_id, format!(" {}", draft.name))?;
        let chapter = state.chapter_mut(chapter_id)?;
        chapter.name = draft.name.clone();
        chapter.description = draft.description.clone();
        chapter.icon = draft.icon.clone();
        Ok(String::from("Chapter updated"))
    }

    fn delete_chapter(&self, chapter_id: ChapterId) -> Result<String, RequestError> {
        let mut state = self.call("delete_chapter", chapter_id, String::new())?;
        state.course.chapters.retain(|c| c.id != chapter_id);
        Ok(String::from("Chapter deleted"))
    }

    fn reorder_chapters(&self, course_id: CourseId, order: &[ChapterId]) -> Result<String, RequestError> {
        let mut state = self.call("reorder_chapters", course_id, ids(order))?;
        let mut chapters = std::mem::take(&mut state.course.chapters);
        for (idx, id) in order.iter().enumerate() {
            if let Some(pos) = chapters.iter().position(|c| c.id == *id) {
                let mut chapter = chapters.remove(pos);
                chapter.idx = idx as u32;
                state.course.chapters.push(chapter);
            }
        }
        Ok(String::from("Chapters reordered"))
    }

    fn add_item(&self, chapter_id: ChapterId, draft: &ItemDraft) -> Result<String, RequestError> {
        let mut state = self.call("add_item", chapter_id, format!(" {}", draft.name))?;
        let id = state.next_id();
        let chapter = state.chapter_mut(chapter_id)?;
        let mut item = Item::new(Some(id), draft.item_type, draft.name.clone());
        item.idx = chapter.items.len() as u32;
        item.ruleset = draft.ruleset.clone().map(serde_json::Value::String);
        chapter.items.push(item);
        Ok(id.to_string())
    }

    fn update_item(&self, item_type: ItemType, item_id: ItemId, draft: &ItemDraft) -> Result<String, RequestError> {
        let mut state = self.call(
            "update_item",
            item_id,
            format!(" {} {}", item_type.path_segment(), draft.name),
        )?;
        let item = state.item_mut(item_id)?;
        item.name = draft.name.clone();
        item.description = draft.description.clone();
        item.icon = draft.icon.clone();
        item.finish_message = draft.finish_message.clone();
        item.ruleset = draft.ruleset.clone().map(serde_json::Value::String);
        Ok(String::from("Item updated"))
    }

    fn delete_item(&self, item_type: ItemType, item_id: ItemId) -> Result<String, RequestError> {
        let mut state = self.call("delete_item", item_id, format!(" {}", item_type.path_segment()))?;
        for chapter in state.course.chapters.iter_mut() {
            chapter.items.retain(|i| i.id != Some(item_id));
        }
        Ok(String::from("Item deleted"))
    }

    fn reorder_items(&self, chapter_id: ChapterId, order: &[ItemId]) -> Result<String, RequestError> {
        let mut state = self.call("reorder_items", chapter_id, ids(order))?;
        state.chapter_mut(chapter_id)?;

        let mut moved = Vec::new();
        for id in order {
            let item = state
                .course
                .chapters
                .iter()
                .flat_map(|c| c.items.iter())
                .find(|i| i.id == Some(*id))
                .cloned()
                .ok_or_else(not_found)?;
            moved.push(item);
        }
        for chapter in state.course.chapters.iter_mut() {
            chapter.items.retain(|i| !i.id.is_some_and(|id| order.contains(&id)));
        }
        state.chapter_mut(chapter_id)?.items = moved;
        Ok(String::from("Items reordered"))
    }

    fn fetch_section(&self, section_id: SectionId) -> Result<Section, RequestError> {
        let state = self.call("fetch_section", section_id, String::new())?;
        state.sections.get(&section_id).cloned().ok_or_else(not_found)
    }

    fn add_section(&self, activity_id: ItemId, draft: &SectionDraft) -> Result<String, RequestError> {
        let mut state = self.call("add_section", activity_id, String::new())?;
        let id = state.next_id();
        state.sections.insert(
            id,
            Section {
                id,
                section_type: draft.section_type,
                mcq: draft.mcq.clone(),
                code: draft.code.clone(),
            },
        );
        Ok(format!(r#"{{"id":{}}}"#, id))
    }

    fn update_section(&self, section_id: SectionId, draft: &SectionDraft) -> Result<String, RequestError> {
        let mut state = self.call("update_section", section_id, String::new())?;
        let section = state.sections.get_mut(&section_id).ok_or_else(not_found)?;
        section.section_type = draft.section_type;
        section.mcq = draft.mcq.clone();
        section.code = draft.code.clone();
        Ok(String::from("Section updated"))
    }

    fn delete_section(&self, section_id: SectionId) -> Result<String, RequestError> {
        let mut state = self.call("delete_section", section_id, String::new())?;
        state.sections.remove(&section_id);
        Ok(String::from("Section deleted"))
    }

    fn reorder_sections(&self, activity_id: ItemId, order: &[SectionId]) -> Result<String, RequestError> {
        self.call("reorder_sections", activity_id, ids(order))?;
        Ok(String::from("Sections reordered"))
    }
}

pub fn item(id: ItemId, item_type: ItemType, name: &str) -> Item {
    Item::new(Some(id), item_type, name.to_string())
}

/// Chapters 5, 6 and 7 of course 1:
/// `5: [L50, A51, L52]`, `6: [L60, A61]`, `7: []`.
pub fn sample_course() -> Course {
    let mut basics = Chapter::new(5, "Basics");
    basics.items = vec![
        item(50, ItemType::Lesson, "Variables"),
        item(51, ItemType::Activity, "Quiz"),
        item(52, ItemType::Lesson, "Loops"),
    ];

    let mut control = Chapter::new(6, "Control flow");
    control.idx = 1;
    control.items = vec![
        item(60, ItemType::Lesson, "If"),
        item(61, ItemType::Activity, "Practice"),
    ];

    let mut wrap_up = Chapter::new(7, "Wrap-up");
    wrap_up.idx = 2;

    Course {
        id: 1,
        name: "Rust 101".into(),
        description: String::new(),
        chapters: vec![basics, control, wrap_up],
    }
}

pub fn mcq_section(id: SectionId, instructions: &str) -> Section {
    Section {
        id,
        section_type: SectionType::Mcq,
        mcq: Some(McqSection {
            instructions: instructions.to_string(),
            questions: Vec::new(),
        }),
        code: None,
    }
}
