use serde::{Deserialize, Serialize};

use super::item::Item;

pub type ChapterId = i64;
pub type CourseId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// An ordered container of items within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,

    /// server-side sort order, the client never computes it
    #[serde(default)]
    pub idx: u32,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub items: Vec<Item>,
}

impl Chapter {
    pub fn new(id: ChapterId, name: &str) -> Self {
        Self {
            id,
            idx: 0,
            name: name.to_string(),
            description: String::new(),
            icon: String::new(),
            items: Vec::new(),
        }
    }

    pub fn apply_patch(&mut self, patch: &ChapterPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(ref icon) = patch.icon {
            self.icon = icon.clone();
        }
    }

    pub fn draft(&self) -> ChapterDraft {
        ChapterDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Body of `POST /course/{id}/chapter` and `PUT /chapter/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterDraft {
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl ChapterDraft {
    /// Placeholder for the `n`th chapter of a course.
    pub fn numbered(n: usize) -> Self {
        Self {
            name: format!("Chapter {}: New Module", n),
            description: String::new(),
            icon: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}
