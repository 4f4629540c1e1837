use chartkit_annotations::{AxisValue, ShapeGeometry, ShapeId};
use chartkit_core::{AnnotationEvent, SyncError, SyncEvent};
use chartkit_sync::{ShapeProperties, Synchronizer};

use super::fake_backend::{engine_abc, FakeBackend};

#[tokio::test]
async fn test_update_geometry_patches_on_success() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();
    let geometry = ShapeGeometry::line(1_000.0, 150.0, 3_000.0, 250.0);

    sync.update_geometry(&engine, "BTCUSDT", &ShapeId::from("A"), geometry)
        .await
        .expect("update");

    let updates = backend.updates.lock();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].start_time, AxisValue::Number(1.0));
    assert_eq!(updates[0].end_price, 250.0);
    assert_eq!(updates[0].subplot_name, "main");

    let engine = engine.borrow();
    let shape = engine.registry().get(&ShapeId::from("A")).expect("A");
    assert_eq!(shape.geometry, geometry);
}

#[tokio::test]
async fn test_update_geometry_failure_keeps_prior_value() {
    let backend = FakeBackend::new();
    backend.reject("A");
    let sync = Synchronizer::new(backend);
    let engine = engine_abc();

    let result = sync
        .update_geometry(&engine, "BTCUSDT", &ShapeId::from("A"), ShapeGeometry::line(0.0, 0.0, 1.0, 1.0))
        .await;
    assert!(matches!(result, Err(SyncError::Rejected { .. })));

    let engine = engine.borrow();
    let shape = engine.registry().get(&ShapeId::from("A")).expect("A");
    assert_eq!(shape.geometry, ShapeGeometry::line(0.0, 100.0, 400.0, 100.0));
}

#[tokio::test]
async fn test_properties_round_trip() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();
    let id = ShapeId::from("B");

    let properties = ShapeProperties {
        alert_enabled: Some(true),
        amount: Some(0.25),
        resolution: Some("4h".to_string()),
        ..Default::default()
    };
    sync.save_properties(&engine, "BTCUSDT", &id, properties.clone())
        .await
        .expect("save");

    {
        let engine = engine.borrow();
        let shape = engine.registry().get(&id).expect("B");
        assert_eq!(shape.meta.properties["alert_enabled"], true);
        assert_eq!(shape.meta.resolution.as_deref(), Some("4h"));
    }

    let fetched = sync.fetch_properties(&engine, "BTCUSDT", &id).await.expect("fetch");
    assert_eq!(fetched, properties);
}

#[tokio::test]
async fn test_update_properties_goes_through_update_endpoint() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();

    let properties = ShapeProperties {
        amount: Some(2.0),
        ..Default::default()
    };
    sync.update_properties(&engine, "BTCUSDT", &ShapeId::from("C"), properties)
        .await
        .expect("update");

    assert_eq!(backend.calls.lock()[0], "PUT /update_drawing/BTCUSDT/C");
    assert_eq!(backend.updates.lock()[0].properties["amount"], 2.0);
}

#[tokio::test]
async fn test_update_unknown_shape() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();

    let result = sync
        .update_geometry(&engine, "BTCUSDT", &ShapeId::from("nope"), ShapeGeometry::line(0.0, 0.0, 1.0, 1.0))
        .await;
    assert!(matches!(result, Err(SyncError::UnknownShape { .. })));
    assert!(backend.calls.lock().is_empty());
}

#[tokio::test]
async fn test_update_of_shape_removed_in_flight_is_silent() {
    let backend = FakeBackend::new();
    let gate = backend.gate_updates();
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();
    let id = ShapeId::from("A");

    let update = sync.update_geometry(&engine, "BTCUSDT", &id, ShapeGeometry::line(0.0, 0.0, 1.0, 1.0));
    let remove = async {
        engine.borrow_mut().remove_shapes(&[id.clone()]);
        gate.notify_one();
    };
    let (result, ()) = tokio::join!(update, remove);

    assert!(result.is_ok());
    assert_eq!(backend.updates.lock().len(), 1);
    let engine = engine.borrow();
    assert!(!engine.registry().contains(&id));
    assert!(!engine
        .bus()
        .journal()
        .iter()
        .any(|e| matches!(e, AnnotationEvent::Sync(SyncEvent::Updated { .. }))));
}
