//! Deterministic replay of the change log into live objects.

use crate::changes::{Change, ChangeLog, MoveEntry, UpdateSpec};
use crate::objects::{DrawingObject, ObjectId};
use kurbo::Point;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Replays a [`ChangeLog`] into an indexed collection of live objects.
///
/// The engine keeps a watermark (count of applied entries), so newly
/// appended changes replay incrementally instead of from scratch. Every
/// mutation installs a fresh record for the touched id; `Arc`s handed out
/// earlier keep observing the state they were taken from, which keeps
/// rendering reads safe while the log advances.
///
/// Replay favors forward progress over validation: a malformed entry, a
/// duplicate create or a dangling reference is logged and skipped, never
/// fatal.
#[derive(Debug, Clone, Default)]
pub struct ReconstructionEngine {
    objects: HashMap<ObjectId, Arc<DrawingObject>>,
    /// Live ids in creation order (export order, hit-test priority).
    order: Vec<ObjectId>,
    /// Number of log entries already folded into the live set.
    watermark: usize,
}

impl ReconstructionEngine {
    /// Create an engine with no applied history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of log entries already applied.
    pub fn watermark(&self) -> usize {
        self.watermark
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live ids in creation order.
    pub fn live_ids(&self) -> &[ObjectId] {
        &self.order
    }

    /// Get one live object.
    pub fn object(&self, id: &str) -> Option<&Arc<DrawingObject>> {
        self.objects.get(id)
    }

    /// Live objects in creation order.
    pub fn live_objects(&self) -> impl Iterator<Item = &Arc<DrawingObject>> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Drop all live state and rewind the watermark (full reload).
    pub fn reset(&mut self) {
        self.objects.clear();
        self.order.clear();
        self.watermark = 0;
    }

    /// Replay the log suffix past the watermark, returning the ids deleted
    /// by the new entries (the caller prunes its selection with them).
    pub fn sync(&mut self, log: &ChangeLog) -> Vec<ObjectId> {
        let mut deleted = Vec::new();
        for raw in log.entries_from(self.watermark) {
            match Change::parse(raw) {
                Ok(change) => self.apply(&change, &mut deleted),
                Err(err) => warn!("skipping unparseable log entry: {err}"),
            }
            self.watermark += 1;
        }
        deleted
    }

    fn apply(&mut self, change: &Change, deleted: &mut Vec<ObjectId>) {
        match change {
            Change::Create(data) => self.apply_create(data),
            Change::Move(entries) => self.apply_move(entries),
            Change::Update(spec) => self.apply_update(spec),
            Change::Delete(ids) => {
                for id in ids {
                    if self.remove(id) {
                        deleted.push(id.clone());
                    }
                }
            }
        }
    }

    fn apply_create(&mut self, data: &DrawingObject) {
        let id = data.id();
        if id.is_empty() {
            warn!("skipping {} create without an id", data.object_type());
            return;
        }
        if self.objects.contains_key(id) {
            // First create wins.
            warn!("duplicate create for {id}; keeping the existing object");
            return;
        }
        self.order.push(id.to_string());
        self.objects.insert(id.to_string(), Arc::new(data.clone()));
    }

    fn apply_move(&mut self, entries: &[MoveEntry]) {
        for entry in entries {
            let Some(existing) = self.objects.get_mut(&entry.id) else {
                debug!("ignoring move for unknown id {}", entry.id);
                continue;
            };
            let mut updated = DrawingObject::clone(existing);
            updated.set_position(Point::new(entry.destination.x, entry.destination.y));
            *existing = Arc::new(updated);
        }
    }

    fn apply_update(&mut self, spec: &UpdateSpec) {
        for id in &spec.ids {
            let Some(existing) = self.objects.get_mut(id) else {
                debug!("ignoring update for unknown id {id}");
                continue;
            };
            let mut updated = DrawingObject::clone(existing);
            if updated.set_property(&spec.update.prop, &spec.update.new_value) {
                *existing = Arc::new(updated);
            } else {
                debug!("object {id} has no property {:?}", spec.update.prop);
            }
        }
    }

    fn remove(&mut self, id: &str) -> bool {
        if self.objects.remove(id).is_none() {
            debug!("ignoring delete for unknown id {id}");
            return false;
        }
        self.order.retain(|live| live != id);
        true
    }

    /// Stored urls of live images still waiting for display resolution,
    /// deduplicated, in creation order.
    pub fn pending_image_urls(&self) -> Vec<String> {
        let mut urls = Vec::new();
        for object in self.live_objects() {
            if let Some(image) = object.as_image() {
                if image.is_pending() && !urls.iter().any(|u| u == &image.url) {
                    urls.push(image.url.clone());
                }
            }
        }
        urls
    }

    /// Patch the display url of every live image whose stored url matches.
    ///
    /// This is a cache fill, not a semantic edit: nothing is appended to
    /// the log. Applying the same resolution twice is a no-op, and so is a
    /// resolution arriving after the image was deleted. Returns the number
    /// of objects patched.
    pub fn apply_resolved_image(&mut self, url: &str, display_url: &str) -> usize {
        let mut patched = 0;
        for id in &self.order {
            let Some(existing) = self.objects.get_mut(id) else {
                continue;
            };
            let Some(image) = existing.as_image() else {
                continue;
            };
            if image.url != url || image.resolved_url.as_deref() == Some(display_url) {
                continue;
            }
            let mut updated = DrawingObject::clone(existing);
            if let Some(image) = updated.as_image_mut() {
                image.apply_resolution(display_url);
            }
            *existing = Arc::new(updated);
            patched += 1;
        }
        patched
    }
}
