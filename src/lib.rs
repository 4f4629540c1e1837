//! # ChartKit
//!
//! Interactive annotation engine for multi-subplot financial charts:
//! hover and selection of user drawings, keyboard navigation, and
//! reconciliation with a remote drawing store.
//!
//! ## Architecture
//!
//! 1. **chartkit-core** - errors, geometry primitives, event bus
//! 2. **chartkit-annotations** - axis mapping, hit-testing, hover/selection
//!    state, visual reconciliation, push-channel drawings
//! 3. **chartkit-sync** - remote delete/update of drawings
//! 4. **chartkit-settings** - configuration files
//!
//! The host owns the rendering engine and hands it to an
//! [`AnnotationEngine`] through the [`RenderEngineAdapter`] trait.

pub use chartkit_annotations as annotations;
pub use chartkit_core as core;
pub use chartkit_settings as settings;
pub use chartkit_sync as sync;

pub use chartkit_core::{
    AnnotationEvent, AxisError, CategorySet, DrawingsError, Error, EventBus, EventCategory,
    Result, SyncError,
};

pub use chartkit_annotations::{
    AnnotationEngine, AxisRef, AxisSpec, ContainerRect, DrawingsMessage, EngineCommand,
    EngineSettings, KeyInput, Modifiers, PointerEvent, RenderEngineAdapter, SelectionSummary,
    Shape, ShapeGeometry, ShapeId, SnapshotEngine, StyleBatch, VisualTheme,
};

pub use chartkit_sync::{BatchDeleteReport, DrawingBackend, HttpBackend, HttpBackendConfig, Synchronizer};

pub use chartkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Honours `RUST_LOG`, defaulting to INFO. Fails if a global subscriber is
/// already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("ChartKit {} logging initialised", VERSION);
    Ok(())
}
