use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::section::SectionId;
use super::serial::{ItemKey, SerialId};
use crate::ruleset::{parse_ruleset, Ruleset, RulesetField};

pub type ItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemType {
    Lesson,
    Activity,
}

impl ItemType {
    /// Path segment used by the item endpoints (`/lesson/..`, `/activity/..`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            ItemType::Lesson => "lesson",
            ItemType::Activity => "activity",
        }
    }
}

/// A lesson or activity inside a chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// server id, `None` until the item has been persisted
    #[serde(default)]
    pub id: Option<ItemId>,

    pub item_type: ItemType,

    /// server-side sort order, array position is what gets rendered
    #[serde(default)]
    pub idx: u32,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_message: Option<String>,

    /// raw ruleset as stored by the backend, either a JSON string or an object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<Value>,

    /// section ids of an activity, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionId>,

    #[serde(skip)]
    pub ui_serial_id: Option<SerialId>,
}

impl Item {
    pub fn new(id: Option<ItemId>, item_type: ItemType, name: String) -> Self {
        Self {
            id,
            item_type,
            idx: 0,
            name,
            description: String::new(),
            icon: String::new(),
            finish_message: None,
            ruleset: None,
            sections: Vec::new(),
            ui_serial_id: None,
        }
    }

    pub fn key(&self) -> Option<ItemKey> {
        match (self.id, self.ui_serial_id) {
            (Some(id), _) => Some(ItemKey::Identified(id)),
            (None, Some(serial)) => Some(ItemKey::Pending(serial)),
            (None, None) => None,
        }
    }

    pub fn ruleset(&self) -> Ruleset {
        parse_ruleset(self.ruleset.as_ref())
    }

    /// Changes one ruleset field and stores the whole ruleset back as a JSON string.
    pub fn update_ruleset(&mut self, field: RulesetField) {
        let mut ruleset = self.ruleset();
        ruleset.update(field);
        self.ruleset = Some(Value::String(ruleset.to_json()));
    }

    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(ref icon) = patch.icon {
            self.icon = icon.clone();
        }
        if let Some(ref finish_message) = patch.finish_message {
            self.finish_message = Some(finish_message.clone());
        }
    }

    /// Request body for create/update calls.
    pub fn draft(&self) -> ItemDraft {
        ItemDraft {
            item_type: self.item_type,
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            finish_message: self.finish_message.clone(),
            ruleset: match self.item_type {
                ItemType::Activity => self.ruleset.as_ref().map(ruleset_string),
                ItemType::Lesson => None,
            },
        }
    }
}

fn ruleset_string(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Body of `POST /chapter/{id}/{lesson|activity}` and `PUT /{lesson|activity}/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    #[serde(skip)]
    pub item_type: ItemType,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<String>,
}

impl ItemDraft {
    pub fn lesson(name: &str) -> Self {
        Self::new(ItemType::Lesson, name)
    }

    pub fn activity(name: &str) -> Self {
        let mut draft = Self::new(ItemType::Activity, name);
        draft.ruleset = Some(Ruleset::default().to_json());
        draft
    }

    fn new(item_type: ItemType, name: &str) -> Self {
        Self {
            item_type,
            name: name.to_string(),
            description: String::new(),
            icon: String::new(),
            finish_message: None,
            ruleset: None,
        }
    }
}

/// Field-level edit of an item's metadata; `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub finish_message: Option<String>,
}
