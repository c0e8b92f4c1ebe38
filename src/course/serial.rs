use std::{fmt, str::FromStr, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::{Item, ItemId, ItemType};

/// Client-only item label of the form `L<n>` / `A<n>`.
///
/// Serials are positional: they are recomputed from scratch every time a
/// chapter's items are (re)loaded or reordered, numbered 1-based per item type
/// in display order. A rejected reorder restores the previous ones. They must
/// never be sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialId {
    pub kind: ItemType,
    pub n: u32,
}

impl SerialId {
    pub fn new(kind: ItemType, n: u32) -> Self {
        Self { kind, n }
    }
}

impl fmt::Display for SerialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ItemType::Lesson => 'L',
            ItemType::Activity => 'A',
        };
        write!(f, "{}{}", prefix, self.n)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("'{0}' is not a serial id, expected L<n> or A<n>")]
pub struct ParseSerialError(String);

fn serial_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([LA])([1-9][0-9]*)$").unwrap())
}

impl FromStr for SerialId {
    type Err = ParseSerialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = serial_regex()
            .captures(s)
            .ok_or_else(|| ParseSerialError(s.to_string()))?;

        let kind = if &caps[1] == "L" {
            ItemType::Lesson
        } else {
            ItemType::Activity
        };
        let n = caps[2]
            .parse::<u32>()
            .map_err(|_| ParseSerialError(s.to_string()))?;

        Ok(SerialId { kind, n })
    }
}

impl Serialize for SerialId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SerialId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How an item is addressed by the selection model.
///
/// Persisted items are keyed by their server id, which survives reloads.
/// Items that have no server id yet fall back to their positional serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Identified(ItemId),
    Pending(SerialId),
}

impl ItemKey {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            ItemKey::Identified(id) => item.id == Some(*id),
            ItemKey::Pending(serial) => item.ui_serial_id == Some(*serial),
        }
    }
}

impl From<SerialId> for ItemKey {
    fn from(serial: SerialId) -> Self {
        ItemKey::Pending(serial)
    }
}

/// Numbers items `L1, L2, ..` / `A1, A2, ..` in display order.
pub fn assign_serial_ids(items: &mut [Item]) {
    let mut lessons = 0;
    let mut activities = 0;

    for item in items.iter_mut() {
        let counter = match item.item_type {
            ItemType::Lesson => &mut lessons,
            ItemType::Activity => &mut activities,
        };
        *counter += 1;
        item.ui_serial_id = Some(SerialId::new(item.item_type, *counter));
    }
}
