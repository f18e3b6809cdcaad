//! Change records and the append-only change log.

use crate::objects::{DrawingObject, ObjectId};
use kurbo::Point;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Destination coordinates for a move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for Destination {
    fn from(point: Point) -> Self {
        Self { x: point.x, y: point.y }
    }
}

/// One move target within a batch move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub id: ObjectId,
    pub destination: Destination,
}

impl MoveEntry {
    pub fn new(id: impl Into<ObjectId>, destination: Point) -> Self {
        Self { id: id.into(), destination: destination.into() }
    }
}

/// A property assignment carried by an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUpdate {
    /// Property name, e.g. `stroke` or `strokeWidth`.
    pub prop: String,
    /// Raw value; strings and numbers both occur on the wire.
    pub new_value: Value,
}

/// Update payload: the ids it touches plus the assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSpec {
    pub ids: Vec<ObjectId>,
    pub update: PropertyUpdate,
}

/// One immutable entry of the drawing change log.
///
/// Wire format: `{ "action": "create"|"move"|"update"|"delete", "data": ... }`.
/// Batched move/update/delete payloads let one multi-select gesture land as
/// a single log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "lowercase")]
pub enum Change {
    Create(DrawingObject),
    Move(Vec<MoveEntry>),
    Update(UpdateSpec),
    Delete(Vec<ObjectId>),
}

impl Change {
    /// Build an update change for a batch of ids.
    pub fn update(ids: Vec<ObjectId>, prop: impl Into<String>, new_value: Value) -> Self {
        Change::Update(UpdateSpec {
            ids,
            update: PropertyUpdate { prop: prop.into(), new_value },
        })
    }

    /// Parse one persisted entry.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// The full persisted history of a drawing: ordered, append-only, never
/// mutated or truncated.
///
/// Entries are kept in their serialized form, so a malformed record loaded
/// from the host survives verbatim in the log and is simply skipped at
/// replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLog {
    entries: Vec<String>,
}

impl ChangeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a log from already-serialized entries (host persistence).
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Append one change to the log tail, returning the serialized entry.
    /// No semantic validation happens here; conflicts are resolved at
    /// replay.
    pub fn append(&mut self, change: &Change) -> Option<&str> {
        match serde_json::to_string(change) {
            Ok(entry) => {
                self.entries.push(entry);
                self.entries.last().map(String::as_str)
            }
            Err(err) => {
                warn!("dropping unserializable change: {err}");
                None
            }
        }
    }

    /// Append an already-serialized entry as-is.
    pub fn push_raw(&mut self, entry: String) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entries starting at `watermark`.
    pub fn entries_from(&self, watermark: usize) -> &[String] {
        &self.entries[watermark.min(self.entries.len())..]
    }

    /// All raw entries in append order.
    pub fn iter_raw(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
