//! Selection Controller.
//!
//! Tracks the selected shape ids in insertion order plus the "last selected"
//! id, the member single-target operations act on.
//!
//! # Invariants
//!
//! - Ids are unique.
//! - `last` is `None` or a current member.

use serde::Serialize;

use crate::registry::ShapeRegistry;
use crate::shapes::ShapeId;

/// Direction of keyboard navigation across the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    ids: Vec<ShapeId>,
    last: Option<ShapeId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn last(&self) -> Option<&ShapeId> {
        self.last.as_ref()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_last(&self, id: &ShapeId) -> bool {
        self.last.as_ref() == Some(id)
    }

    /// Selects `id`, clearing the others first unless `additive`.
    pub fn select_shape(&mut self, id: ShapeId, additive: bool) {
        if !additive {
            self.ids.clear();
        }
        if !self.ids.contains(&id) {
            self.ids.push(id.clone());
        }
        self.last = Some(id);
    }

    /// Removes `id`; a removed `last` falls back to the most recently added
    /// remaining member. Returns whether `id` was selected.
    pub fn deselect_shape(&mut self, id: &ShapeId) -> bool {
        let Some(pos) = self.ids.iter().position(|s| s == id) else {
            return false;
        };
        self.ids.remove(pos);
        if self.last.as_ref() == Some(id) {
            self.last = self.ids.last().cloned();
        }
        true
    }

    pub fn deselect_all(&mut self) {
        self.ids.clear();
        self.last = None;
    }

    /// Adds every interactive shape of the registry.
    pub fn select_all(&mut self, registry: &ShapeRegistry) {
        let mut added = None;
        for id in registry.interactive_ids() {
            if !self.ids.contains(&id) {
                self.ids.push(id.clone());
            }
            added = Some(id);
        }
        if added.is_some() {
            self.last = added;
        }
    }

    /// Click semantics for the shape under the pointer.
    ///
    /// Empty space deselects everything. With the modifier, a click toggles
    /// membership; without it, a click selects the shape alone, or
    /// deselects it when it already is the single selection.
    pub fn click(&mut self, hit: Option<ShapeId>, additive: bool) {
        let Some(id) = hit else {
            self.deselect_all();
            return;
        };
        if additive {
            if !self.deselect_shape(&id) {
                self.select_shape(id, true);
            }
        } else if self.ids.len() == 1 && self.ids[0] == id {
            self.deselect_all();
        } else {
            self.select_shape(id, false);
        }
    }

    /// Moves `last` through the selection, wrapping at the ends.
    ///
    /// Only meaningful with two or more members; membership never changes.
    /// Returns whether `last` moved.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let len = self.ids.len();
        if len < 2 {
            return false;
        }
        let next = match self
            .last
            .as_ref()
            .and_then(|last| self.ids.iter().position(|s| s == last))
        {
            Some(pos) => match direction {
                Direction::Next => (pos + 1) % len,
                Direction::Previous => (pos + len - 1) % len,
            },
            None => match direction {
                Direction::Next => 0,
                Direction::Previous => len - 1,
            },
        };
        self.last = Some(self.ids[next].clone());
        true
    }

    /// Drops ids that no longer name interactive shapes.
    ///
    /// Returns the dropped ids.
    pub fn retain_present(&mut self, registry: &ShapeRegistry) -> Vec<ShapeId> {
        let mut dropped = Vec::new();
        self.ids.retain(|id| {
            let keep = registry.is_interactive(id);
            if !keep {
                dropped.push(id.clone());
            }
            keep
        });
        if self.last.as_ref().is_some_and(|last| !self.ids.contains(last)) {
            self.last = self.ids.last().cloned();
        }
        dropped
    }

    /// Removes the given ids, e.g. after a confirmed remote delete.
    pub fn remove_ids(&mut self, ids: &[ShapeId]) {
        for id in ids {
            self.deselect_shape(id);
        }
    }
}
