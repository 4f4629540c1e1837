//! # ChartKit Annotations
//!
//! Interactive annotation engine for multi-subplot financial charts.
//!
//! A pointer sample flows through the [`DragGuard`], the subplot
//! [`locator`], the [`HitTester`], then into the [`HoverController`] or the
//! [`SelectionState`], and finally through the [`VisualStateReconciler`],
//! which hands the rendering engine one [`StyleBatch`] per pass.
//!
//! The rendering engine itself is reached only through
//! [`RenderEngineAdapter`]; [`SnapshotEngine`] is a self-contained
//! implementation of it.

pub mod axis;
pub mod drag_guard;
pub mod drawings;
pub mod engine;
pub mod hover;
pub mod input;
pub mod locator;
pub mod reconciler;
pub mod registry;
pub mod selection;
pub mod shapes;
pub mod snapshot;
pub mod state;
pub mod style;
pub mod throttle;
pub mod transform;

pub use axis::{AxisDirection, AxisId, AxisKind, AxisRef, AxisSpec, AxisValue, RenderEngineAdapter, SubplotAxisPair};
pub use drag_guard::DragGuard;
pub use drawings::{DrawingRecord, DrawingsMessage, SubplotDirectory, MAIN_SUBPLOT};
pub use engine::{ActiveShape, AnnotationEngine, DrawingsOutcome, EngineSettings, SelectionSummary, HELP_TEXT};
pub use hit_test::{Hit, HitMode, HitTester, HitThresholds};
pub use hover::HoverController;
pub use input::{command_for, ContainerRect, EngineCommand, Key, KeyInput, Modifiers, PointerEvent, PointerKind, PointerTarget};
pub use reconciler::{Reconciliation, VisualStateReconciler};
pub use registry::ShapeRegistry;
pub use selection::{Direction, SelectionState};
pub use shapes::{DashStyle, LineStyle, MarkerStyle, Shape, ShapeClass, ShapeGeometry, ShapeId, ShapeMeta};
pub use snapshot::SnapshotEngine;
pub use state::AnnotationEngineState;
pub use style::{StrokeStyle, StyleBatch, StyleUpdate, VisualState, VisualTheme};
pub use throttle::PointerThrottle;
pub use transform::CoordinateAdapter;
