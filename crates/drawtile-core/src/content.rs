//! Drawing content facade: the single-writer owner of one tile's model.

use crate::changes::{Change, ChangeLog, MoveEntry};
use crate::engine::ReconstructionEngine;
use crate::export::{
    self, DRAWING_DOCUMENT_TYPE, DrawingDocument, ExportOptions, ImportError,
};
use crate::geometry::SelectionBox;
use crate::objects::{DrawingObject, ObjectId};
use crate::resolver::{ImageUrlResolver, ResolveHints};
use crate::selection::Selection;
use crate::toolbar::ToolbarSettings;
use kurbo::Point;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Host persistence collaborator: receives every serialized change that
/// lands in the log.
pub trait ChangeSink {
    fn append(&mut self, entry: &str);
}

/// Persisted form of a drawing tile: the full change history.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContentModel {
    #[serde(rename = "type")]
    kind: String,
    changes: Vec<String>,
}

/// One drawing tile's model: the append-only log, the live objects
/// reconstructed from it, and the ephemeral selection scoping batch edits.
///
/// A single instance is the only writer of its log. Appending is the sole
/// mutation; every typed operation below is an append plus an incremental
/// replay of the new suffix.
#[derive(Default)]
pub struct DrawingContent {
    log: ChangeLog,
    engine: ReconstructionEngine,
    selection: Selection,
    toolbar: ToolbarSettings,
    sink: Option<Box<dyn ChangeSink>>,
}

impl DrawingContent {
    /// Create an empty drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a drawing from persisted change entries.
    pub fn from_changes(entries: Vec<String>) -> Self {
        let mut content = Self { log: ChangeLog::from_entries(entries), ..Self::default() };
        content.engine.sync(&content.log);
        content
    }

    /// Parse the persisted content form `{ "type": "Drawing", "changes": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        let model: ContentModel = serde_json::from_str(json)?;
        if model.kind != DRAWING_DOCUMENT_TYPE {
            return Err(ImportError::WrongType(model.kind));
        }
        Ok(Self::from_changes(model.changes))
    }

    /// Serialize the full change history for the host.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let model = ContentModel {
            kind: DRAWING_DOCUMENT_TYPE.to_string(),
            changes: self.log.iter_raw().map(str::to_string).collect(),
        };
        serde_json::to_string(&model)
    }

    /// Attach the host persistence collaborator.
    pub fn set_change_sink(&mut self, sink: Box<dyn ChangeSink>) {
        self.sink = Some(sink);
    }

    /// Append one change to the log and fold it into the live objects.
    /// This is the sole mutator; there is no in-place edit or reordering
    /// of existing entries.
    pub fn apply_change(&mut self, change: Change) {
        if let Some(entry) = self.log.append(&change) {
            if let Some(sink) = self.sink.as_mut() {
                sink.append(entry);
            }
        }
        let deleted = self.engine.sync(&self.log);
        for id in &deleted {
            self.selection.remove(id);
        }
    }

    /// Append a Create, assigning a fresh id when the data lacks one.
    /// Returns the object's id.
    pub fn create_object(&mut self, mut data: DrawingObject) -> ObjectId {
        let id = data.ensure_id().to_string();
        self.apply_change(Change::Create(data));
        id
    }

    /// [`Self::create_object`] with the current toolbar style stamped on.
    pub fn create_styled_object(&mut self, mut data: DrawingObject) -> ObjectId {
        self.toolbar.apply_to(&mut data);
        self.create_object(data)
    }

    /// Append one Move covering a whole drag gesture.
    pub fn move_objects(&mut self, entries: Vec<MoveEntry>) {
        self.apply_change(Change::Move(entries));
    }

    /// Append one Update for a batch of ids.
    pub fn update_objects(&mut self, ids: Vec<ObjectId>, prop: &str, value: Value) {
        self.apply_change(Change::update(ids, prop, value));
    }

    /// Append one Delete, then drop the ids from the selection.
    pub fn delete_objects(&mut self, ids: Vec<ObjectId>) {
        self.apply_change(Change::Delete(ids.clone()));
        for id in &ids {
            self.selection.remove(id);
        }
    }

    /// Delete everything currently selected.
    pub fn delete_selected(&mut self) {
        let ids = self.selection.to_vec();
        if !ids.is_empty() {
            self.delete_objects(ids);
        }
    }

    /// The full change log.
    pub fn change_log(&self) -> &ChangeLog {
        &self.log
    }

    /// Live objects in creation order.
    pub fn live_objects(&self) -> impl Iterator<Item = &Arc<DrawingObject>> {
        self.engine.live_objects()
    }

    /// Get one live object.
    pub fn object(&self, id: &str) -> Option<&Arc<DrawingObject>> {
        self.engine.object(id)
    }

    /// Live ids in creation order.
    pub fn object_ids(&self) -> &[ObjectId] {
        self.engine.live_ids()
    }

    pub fn len(&self) -> usize {
        self.engine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// The current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the selection wholesale.
    pub fn set_selection(&mut self, ids: Vec<ObjectId>) {
        self.selection.replace(ids);
    }

    /// Close a drag-selection: replace (or, additively, augment) the
    /// selection with every live object whose `in_selection` test passes.
    pub fn select_in_box(&mut self, selection_box: SelectionBox, additive: bool) {
        let hits: Vec<ObjectId> = self
            .engine
            .live_objects()
            .filter(|object| object.in_selection(&selection_box))
            .map(|object| object.id().to_string())
            .collect();
        if additive {
            for id in hits {
                self.selection.add(id);
            }
        } else {
            self.selection.replace(hits);
        }
    }

    /// Topmost live object at a point (later-created objects draw on top).
    pub fn object_at(&self, point: Point, tolerance: f64) -> Option<&Arc<DrawingObject>> {
        self.engine
            .live_ids()
            .iter()
            .rev()
            .filter_map(|id| self.engine.object(id))
            .find(|object| object.hit_test(point, tolerance))
    }

    /// Current toolbar settings.
    pub fn toolbar(&self) -> &ToolbarSettings {
        &self.toolbar
    }

    /// Change one toolbar setting. While the selection is non-empty the
    /// same assignment is also appended as an Update for the selected ids.
    pub fn set_toolbar_setting(&mut self, prop: &str, value: Value) -> bool {
        if !self.toolbar.set(prop, &value) {
            return false;
        }
        if !self.selection.is_empty() {
            let ids = self.selection.to_vec();
            self.apply_change(Change::update(ids, prop, value));
        }
        true
    }

    /// Fold the log into the canonical export document.
    pub fn export_document(&self, options: &ExportOptions<'_>) -> DrawingDocument {
        export::export_document(&self.log, options)
    }

    /// Replace this drawing with an imported canonical document: the log
    /// becomes a fresh create-only baseline.
    pub fn import_document(&mut self, json: &str) -> Result<(), ImportError> {
        let changes = export::import_document(json)?;
        self.log = ChangeLog::new();
        self.engine.reset();
        self.selection.clear();
        for change in changes {
            self.apply_change(change);
        }
        Ok(())
    }

    /// Resolve the display url of every pending image through the external
    /// store. Failures keep the placeholder and are not log errors; a
    /// resolution arriving after its object was deleted is a no-op.
    /// Returns the number of objects patched.
    pub async fn resolve_images(&mut self, resolver: &dyn ImageUrlResolver) -> usize {
        let mut patched = 0;
        for url in self.engine.pending_image_urls() {
            let hints = self.image_hints(&url);
            match resolver.resolve(&url, hints).await {
                Ok(resolved) => {
                    patched += self.engine.apply_resolved_image(&url, &resolved.display_url);
                }
                Err(err) => debug!("image resolution failed for {url}: {err}"),
            }
        }
        patched
    }

    /// Sizing hints from the first live image holding this url.
    fn image_hints(&self, url: &str) -> ResolveHints {
        self.engine
            .live_objects()
            .filter_map(|object| object.as_image())
            .find(|image| image.url == url)
            .map(|image| ResolveHints { width: Some(image.width), height: Some(image.height) })
            .unwrap_or_default()
    }
}
