//! Shape Registry: the live list of rendered annotation shapes.

use std::collections::HashSet;

use crate::shapes::{Shape, ShapeGeometry, ShapeId};

/// Ordered list of shapes, user and system alike.
///
/// Order is the rendering engine's draw order and is what the reconciler
/// reports as `StyleUpdate::index`. Every mutation bumps `generation`.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
    generation: u64,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            generation: 1,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.generation += 1;
        self.shapes.iter_mut()
    }

    /// Replaces every shape.
    pub fn replace(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.generation += 1;
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.has_id(id))
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        let shape = self.shapes.iter_mut().find(|s| s.has_id(id))?;
        self.generation += 1;
        Some(shape)
    }

    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.has_id(id))
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Whether `id` names a shape that may be hovered or selected.
    pub fn is_interactive(&self, id: &ShapeId) -> bool {
        self.get(id).is_some_and(Shape::is_interactive)
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
        self.generation += 1;
    }

    /// Replaces the shape with the same id in place, or appends it.
    pub fn upsert(&mut self, shape: Shape) {
        let existing = shape
            .id
            .as_ref()
            .and_then(|id| self.shapes.iter().position(|s| s.has_id(id)));
        match existing {
            Some(index) => self.shapes[index] = shape,
            None => self.shapes.push(shape),
        }
        self.generation += 1;
    }

    /// Removes every shape whose id is in `ids` in a single pass.
    ///
    /// Returns the ids that were actually present.
    pub fn remove_ids(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let wanted: HashSet<&ShapeId> = ids.iter().collect();
        let mut removed = Vec::new();
        self.shapes.retain(|shape| match &shape.id {
            Some(id) if wanted.contains(id) => {
                removed.push(id.clone());
                false
            }
            _ => true,
        });
        if !removed.is_empty() {
            self.generation += 1;
        }
        removed
    }

    /// Drops every user shape, keeping engine overlays.
    pub fn clear_user_shapes(&mut self) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.is_system_shape);
        self.generation += 1;
        before - self.shapes.len()
    }

    /// Replaces the geometry of one shape, returning the previous geometry.
    pub fn set_geometry(&mut self, id: &ShapeId, geometry: ShapeGeometry) -> Option<ShapeGeometry> {
        let shape = self.get_mut(id)?;
        Some(std::mem::replace(&mut shape.geometry, geometry))
    }

    /// Ids of every interactive shape, in registry order.
    pub fn interactive_ids(&self) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| s.is_interactive())
            .filter_map(|s| s.id.clone())
            .collect()
    }

    pub fn system_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_system_shape)
    }
}
