//! Ephemeral selection state.

use crate::objects::ObjectId;

/// The set of currently selected object ids.
///
/// Selection scopes batch moves/updates/deletes but lives outside the
/// change log: it is instance state, never serialized. Insertion order is
/// preserved so batch changes land in a predictable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ObjectId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn to_vec(&self) -> Vec<ObjectId> {
        self.ids.clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Add an id; already-selected ids are kept once.
    pub fn add(&mut self, id: ObjectId) {
        if !self.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|s| s != id);
    }

    /// Toggle membership of one id.
    pub fn toggle(&mut self, id: ObjectId) {
        if self.contains(&id) {
            self.remove(&id);
        } else {
            self.ids.push(id);
        }
    }

    /// Replace the whole selection.
    pub fn replace(&mut self, ids: Vec<ObjectId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedupes() {
        let mut sel = Selection::new();
        sel.add("a".to_string());
        sel.add("b".to_string());
        sel.add("a".to_string());
        assert_eq!(sel.ids(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_toggle() {
        let mut sel = Selection::new();
        sel.toggle("a".to_string());
        assert!(sel.contains("a"));
        sel.toggle("a".to_string());
        assert!(!sel.contains("a"));
    }

    #[test]
    fn test_replace_and_clear() {
        let mut sel = Selection::new();
        sel.add("a".to_string());
        sel.replace(vec!["b".to_string(), "c".to_string(), "b".to_string()]);
        assert_eq!(sel.ids(), ["b".to_string(), "c".to_string()]);
        sel.clear();
        assert!(sel.is_empty());
    }
}
