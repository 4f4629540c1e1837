use chartkit_annotations::{EngineCommand, ShapeId};
use chartkit_core::{AnnotationEvent, ErrorEvent, SelectionEvent, SyncError, SyncEvent};
use chartkit_sync::Synchronizer;

use super::fake_backend::{engine_abc, FakeBackend};

#[tokio::test]
async fn test_partial_batch_failure() {
    let backend = FakeBackend::new();
    backend.reject("B");
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();

    let ids = engine.borrow().selected_ids();
    let report = sync.delete_batch(&engine, "BTCUSDT", &ids).await;

    assert_eq!(report.summary(), "1 failed out of 3");
    assert_eq!(report.deleted, vec![ShapeId::from("A"), ShapeId::from("C")]);
    assert_eq!(report.failed_count(), 1);
    assert!(matches!(report.failed[0].1, SyncError::Rejected { .. }));

    let engine = engine.borrow();
    assert_eq!(engine.registry().interactive_ids(), vec![ShapeId::from("B")]);
    assert!(engine.selection().is_empty());
    assert_eq!(backend.calls.lock().len(), 3);

    let journal = engine.bus().journal();
    assert!(journal.contains(&AnnotationEvent::Sync(SyncEvent::BatchDeleted {
        symbol: "BTCUSDT".to_string(),
        succeeded: 2,
        failed: 1,
    })));
    assert!(journal.contains(&AnnotationEvent::Error(ErrorEvent::SyncFailed {
        operation: "delete".to_string(),
        message: "1 failed out of 3".to_string(),
    })));
}

#[tokio::test]
async fn test_batch_removal_is_one_registry_update() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend);
    let engine = engine_abc();

    let report = sync.delete_selected(&engine, "BTCUSDT").await;
    assert!(report.is_complete());

    let engine = engine.borrow();
    let removals: Vec<_> = engine
        .bus()
        .journal()
        .into_iter()
        .filter(|e| matches!(e, AnnotationEvent::Registry(chartkit_core::RegistryEvent::Removed { .. })))
        .collect();
    assert_eq!(removals.len(), 1);
    assert!(engine.registry().is_empty());
}

#[tokio::test]
async fn test_batch_delete_restyles_once() {
    let backend = FakeBackend::new();
    backend.reject("B");
    let sync = Synchronizer::new(backend);
    let engine = engine_abc();
    engine.borrow_mut().render_engine_mut().take_batches();
    engine.borrow().bus().clear_journal();

    let ids = engine.borrow().selected_ids();
    sync.delete_batch(&engine, "BTCUSDT", &ids).await;

    let engine = engine.borrow();
    assert_eq!(engine.render_engine().batches().len(), 1);
    let selections: Vec<_> = engine
        .bus()
        .journal()
        .into_iter()
        .filter(|e| matches!(e, AnnotationEvent::Selection(_)))
        .collect();
    assert_eq!(
        selections,
        vec![AnnotationEvent::Selection(SelectionEvent::Changed {
            ids: Vec::new(),
            active: None,
        })]
    );
}

#[tokio::test]
async fn test_delete_one_failure_leaves_registry() {
    let backend = FakeBackend::new();
    backend.go_offline();
    let sync = Synchronizer::new(backend);
    let engine = engine_abc();

    let err = sync
        .delete_one(&engine, "BTCUSDT", &ShapeId::from("A"))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Http { .. }));
    assert_eq!(engine.borrow().registry().len(), 3);
    assert_eq!(engine.borrow().selection().len(), 3);
}

#[tokio::test]
async fn test_delete_one_success_clears_selection_member() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();

    sync.delete_one(&engine, "BTCUSDT", &ShapeId::from("C"))
        .await
        .expect("delete");

    let engine = engine.borrow();
    assert!(!engine.registry().contains(&ShapeId::from("C")));
    assert_eq!(engine.selection().ids(), &[ShapeId::from("A"), ShapeId::from("B")]);
    assert_eq!(engine.selection().last(), Some(&ShapeId::from("B")));
    assert_eq!(backend.calls.lock()[0], "DELETE /delete_drawing/BTCUSDT/C");
}

#[tokio::test]
async fn test_delete_unknown_shape_skips_network() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();

    let err = sync
        .delete_one(&engine, "BTCUSDT", &ShapeId::from("Z"))
        .await
        .unwrap_err();
    assert_eq!(err, SyncError::UnknownShape { id: "Z".to_string() });
    assert!(backend.calls.lock().is_empty());
}

#[tokio::test]
async fn test_delete_all() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend.clone());
    let engine = engine_abc();

    sync.delete_all(&engine, "BTCUSDT").await.expect("delete all");
    assert!(engine.borrow().registry().is_empty());
    assert!(engine.borrow().selection().is_empty());

    let engine = engine_abc();
    backend.go_offline();
    assert!(sync.delete_all(&engine, "BTCUSDT").await.is_err());
    assert_eq!(engine.borrow().registry().len(), 3);
}

#[tokio::test]
async fn test_delete_key_runs_batch() {
    let backend = FakeBackend::new();
    let sync = Synchronizer::new(backend);
    let engine = engine_abc();

    let report = sync
        .execute(&engine, "BTCUSDT", EngineCommand::DeleteSelected)
        .await
        .expect("delete report");
    assert_eq!(report.summary(), "Deleted 3 of 3");
    assert!(sync
        .execute(&engine, "BTCUSDT", EngineCommand::SelectAll)
        .await
        .is_none());

    // Nothing selected: no network calls, empty report.
    let report = sync.delete_selected(&engine, "BTCUSDT").await;
    assert_eq!(report.total(), 0);
}
