//! Deletion/Update Synchronizer.
//!
//! Every operation runs in two phases: the remote calls are awaited without
//! holding any borrow of the engine, then the engine is borrowed once to
//! apply the outcome. A registry replacement that lands in between simply
//! wins; removing or patching ids that are gone is a no-op.

use std::cell::RefCell;
use std::sync::Arc;

use chartkit_annotations::{
    AnnotationEngine, DrawingRecord, EngineCommand, RenderEngineAdapter, Shape, ShapeGeometry,
    ShapeId,
};
use chartkit_core::{EventBus, SyncError};
use futures::future::join_all;

use crate::backend::DrawingBackend;
use crate::wire::ShapeProperties;

/// Outcome of a batch delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchDeleteReport {
    pub deleted: Vec<ShapeId>,
    pub failed: Vec<(ShapeId, SyncError)>,
}

impl BatchDeleteReport {
    pub fn total(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// User-facing one-liner, e.g. "1 failed out of 3".
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("Deleted {} of {}", self.deleted.len(), self.total())
        } else {
            format!("{} failed out of {}", self.failed.len(), self.total())
        }
    }
}

pub struct Synchronizer<B: DrawingBackend + ?Sized> {
    backend: Arc<B>,
}

impl<B: DrawingBackend + ?Sized> Clone for Synchronizer<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

fn bus_of<E: RenderEngineAdapter>(engine: &RefCell<AnnotationEngine<E>>) -> Arc<EventBus> {
    engine.borrow().bus().clone()
}

fn surface(bus: &EventBus, operation: &str, err: &SyncError) {
    tracing::error!("{} failed: {}", operation, err);
    bus.sync_failed(operation, err);
}

impl<B: DrawingBackend + ?Sized> Synchronizer<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Deletes one drawing; the registry is only touched on success.
    pub async fn delete_one<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
        id: &ShapeId,
    ) -> Result<(), SyncError> {
        let bus = bus_of(engine);
        if !engine.borrow().registry().contains(id) {
            let err = SyncError::UnknownShape { id: id.to_string() };
            surface(&bus, "delete", &err);
            return Err(err);
        }

        if let Err(err) = self.backend.delete_drawing(symbol, id.as_str()).await {
            surface(&bus, "delete", &err);
            return Err(err);
        }

        engine.borrow_mut().remove_shapes(std::slice::from_ref(id));
        tracing::info!("Deleted drawing {} on {}", id, symbol);
        bus.drawing_deleted(symbol, id);
        Ok(())
    }

    /// Deletes every id concurrently, then applies all outcomes at once.
    ///
    /// Only accepted ids leave the registry; the selection is cleared
    /// regardless of failures.
    pub async fn delete_batch<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
        ids: &[ShapeId],
    ) -> BatchDeleteReport {
        let bus = bus_of(engine);
        let outcomes = join_all(ids.iter().map(|id| async move {
            (id.clone(), self.backend.delete_drawing(symbol, id.as_str()).await)
        }))
        .await;

        let mut report = BatchDeleteReport::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.deleted.push(id),
                Err(err) => report.failed.push((id, err)),
            }
        }

        engine.borrow_mut().remove_and_deselect_all(&report.deleted);

        if report.is_complete() {
            tracing::info!("Deleted {} drawings on {}", report.deleted.len(), symbol);
        } else {
            for (id, err) in &report.failed {
                tracing::warn!("Delete of {} on {} failed: {}", id, symbol, err);
            }
            bus.sync_failed("delete", report.summary());
        }
        bus.batch_deleted(symbol, report.deleted.len(), report.failed.len());
        report
    }

    /// Deletes the current selection.
    pub async fn delete_selected<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
    ) -> BatchDeleteReport {
        let ids = engine.borrow().selected_ids();
        if ids.is_empty() {
            return BatchDeleteReport::default();
        }
        self.delete_batch(engine, symbol, &ids).await
    }

    /// Runs the asynchronous half of a key command.
    pub async fn execute<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
        command: EngineCommand,
    ) -> Option<BatchDeleteReport> {
        match command {
            EngineCommand::DeleteSelected => Some(self.delete_selected(engine, symbol).await),
            _ => None,
        }
    }

    /// Deletes every drawing of `symbol`; on success all local state goes.
    pub async fn delete_all<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
    ) -> Result<(), SyncError> {
        let bus = bus_of(engine);
        if let Err(err) = self.backend.delete_all_drawings(symbol).await {
            surface(&bus, "delete all", &err);
            return Err(err);
        }
        engine.borrow_mut().clear_all_shapes();
        tracing::info!("Deleted all drawings on {}", symbol);
        bus.all_deleted(symbol);
        Ok(())
    }

    /// Persists new endpoints; the in-memory geometry changes on success only.
    pub async fn update_geometry<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
        id: &ShapeId,
        geometry: ShapeGeometry,
    ) -> Result<(), SyncError> {
        let bus = bus_of(engine);
        let record = match self.shape_for(engine, id) {
            Ok(mut shape) => {
                shape.geometry = geometry;
                DrawingRecord::from_shape(&shape)
            }
            Err(err) => {
                surface(&bus, "update", &err);
                return Err(err);
            }
        };

        if let Err(err) = self.backend.update_drawing(symbol, id.as_str(), &record).await {
            surface(&bus, "update", &err);
            return Err(err);
        }

        let patched = engine.borrow_mut().patch_geometry(id, geometry).is_some();
        self.updated(&bus, symbol, id, patched);
        Ok(())
    }

    /// Persists merged properties through the drawing update endpoint.
    pub async fn update_properties<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
        id: &ShapeId,
        properties: ShapeProperties,
    ) -> Result<(), SyncError> {
        let bus = bus_of(engine);
        let record = match self.shape_for(engine, id) {
            Ok(shape) => {
                let mut record = DrawingRecord::from_shape(&shape);
                record.properties.extend(properties.to_map());
                if properties.resolution.is_some() {
                    record.resolution = properties.resolution.clone();
                }
                record
            }
            Err(err) => {
                surface(&bus, "update", &err);
                return Err(err);
            }
        };

        if let Err(err) = self.backend.update_drawing(symbol, id.as_str(), &record).await {
            surface(&bus, "update", &err);
            return Err(err);
        }

        let patched = engine
            .borrow_mut()
            .patch_properties(id, properties.to_map(), properties.resolution);
        self.updated(&bus, symbol, id, patched);
        Ok(())
    }

    /// Saves non-geometric metadata through the properties endpoint.
    pub async fn save_properties<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
        id: &ShapeId,
        properties: ShapeProperties,
    ) -> Result<(), SyncError> {
        let bus = bus_of(engine);
        if let Err(err) = self.backend.save_shape_properties(symbol, id.as_str(), &properties).await {
            surface(&bus, "save properties", &err);
            return Err(err);
        }
        let patched = engine
            .borrow_mut()
            .patch_properties(id, properties.to_map(), properties.resolution);
        self.updated(&bus, symbol, id, patched);
        Ok(())
    }

    /// Fetches metadata and caches it on the local shape.
    pub async fn fetch_properties<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        symbol: &str,
        id: &ShapeId,
    ) -> Result<ShapeProperties, SyncError> {
        let bus = bus_of(engine);
        let properties = match self.backend.get_shape_properties(symbol, id.as_str()).await {
            Ok(properties) => properties,
            Err(err) => {
                surface(&bus, "load properties", &err);
                return Err(err);
            }
        };
        engine
            .borrow_mut()
            .patch_properties(id, properties.to_map(), properties.resolution.clone());
        Ok(properties)
    }

    /// Snapshot of a shape, taken before any await.
    fn shape_for<E: RenderEngineAdapter>(
        &self,
        engine: &RefCell<AnnotationEngine<E>>,
        id: &ShapeId,
    ) -> Result<Shape, SyncError> {
        engine
            .borrow()
            .registry()
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::UnknownShape { id: id.to_string() })
    }

    /// `patched` is false when the shape left the registry during the call.
    fn updated(&self, bus: &EventBus, symbol: &str, id: &ShapeId, patched: bool) {
        if !patched {
            tracing::debug!("Drawing {} on {} updated remotely but no longer present", id, symbol);
            return;
        }
        tracing::info!("Updated drawing {} on {}", id, symbol);
        bus.drawing_updated(symbol, id);
    }
}
