use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chartkit_annotations::{
    AnnotationEngine, AxisSpec, DrawingRecord, EngineSettings, Shape, SnapshotEngine,
};
use chartkit_core::{EventBus, SyncError, DEFAULT_JOURNAL_CAPACITY};
use chartkit_sync::{DrawingBackend, ShapeProperties};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Scripted in-memory backend recording every call.
#[derive(Default)]
pub struct FakeBackend {
    rejected: Mutex<HashSet<String>>,
    offline: Mutex<bool>,
    update_gate: Mutex<Option<Arc<Notify>>>,
    pub calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<DrawingRecord>>,
    pub properties: Mutex<HashMap<String, ShapeProperties>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reject(&self, id: &str) {
        self.rejected.lock().insert(id.to_string());
    }

    pub fn go_offline(&self) {
        *self.offline.lock() = true;
    }

    /// Holds every update until the returned gate is notified.
    pub fn gate_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock() = Some(gate.clone());
        gate
    }

    fn check(&self, call: String, symbol: &str, id: &str) -> Result<(), SyncError> {
        self.calls.lock().push(call);
        if *self.offline.lock() {
            return Err(SyncError::Http {
                reason: "connection refused".to_string(),
            });
        }
        if self.rejected.lock().contains(id) {
            return Err(SyncError::Rejected {
                symbol: symbol.to_string(),
                id: id.to_string(),
                message: "drawing not found".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DrawingBackend for FakeBackend {
    async fn delete_drawing(&self, symbol: &str, id: &str) -> Result<(), SyncError> {
        // Yield so that concurrent deletes interleave.
        tokio::task::yield_now().await;
        self.check(format!("DELETE /delete_drawing/{symbol}/{id}"), symbol, id)
    }

    async fn delete_all_drawings(&self, symbol: &str) -> Result<(), SyncError> {
        self.check(format!("DELETE /delete_all_drawings/{symbol}"), symbol, "*")
    }

    async fn update_drawing(&self, symbol: &str, id: &str, record: &DrawingRecord) -> Result<(), SyncError> {
        self.check(format!("PUT /update_drawing/{symbol}/{id}"), symbol, id)?;
        let gate = self.update_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.updates.lock().push(record.clone());
        Ok(())
    }

    async fn save_shape_properties(
        &self,
        symbol: &str,
        id: &str,
        properties: &ShapeProperties,
    ) -> Result<(), SyncError> {
        self.check(format!("POST /save_shape_properties/{symbol}/{id}"), symbol, id)?;
        self.properties.lock().insert(id.to_string(), properties.clone());
        Ok(())
    }

    async fn get_shape_properties(&self, symbol: &str, id: &str) -> Result<ShapeProperties, SyncError> {
        self.check(format!("GET /get_shape_properties/{symbol}/{id}"), symbol, id)?;
        Ok(self.properties.lock().get(id).cloned().unwrap_or_default())
    }
}

/// Engine with shapes A, B and C, all selected, with an event journal.
pub fn engine_abc() -> RefCell<AnnotationEngine<SnapshotEngine>> {
    let bus = Arc::new(EventBus::with_journal(DEFAULT_JOURNAL_CAPACITY));
    let render = SnapshotEngine::with_axes(vec![
        AxisSpec::x("x", 0, 0.0, 400.0, (0.0, 400.0)).anchored_to("y"),
        AxisSpec::y("y", 0, 0.0, 400.0, (0.0, 400.0)),
    ]);
    let mut engine = AnnotationEngine::with_bus(render, EngineSettings::default(), bus);
    engine.replace_shapes(vec![
        Shape::line("A", 0.0, 100.0, 400.0, 100.0),
        Shape::line("B", 0.0, 200.0, 400.0, 200.0),
        Shape::line("C", 0.0, 300.0, 400.0, 300.0),
    ]);
    engine.select_all();
    RefCell::new(engine)
}
