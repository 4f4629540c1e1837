//! # ChartKit Core
//!
//! Core types, errors, and utilities shared by the ChartKit crates.
//! Provides the geometry primitives used by hit-testing, the error
//! hierarchy surfaced by the annotation engine and the synchronizer,
//! and the event bus the engine reports state changes through.

pub mod error;
pub mod event_bus;
pub mod geometry;

pub use error::{AxisError, DrawingsError, Error, Result, SyncError};

pub use event_bus::{
    AnnotationEvent, CategorySet, Envelope, ErrorEvent, EventBus, EventCategory, HoverEvent,
    ListenerId, RegistryEvent, SelectionEvent, SyncEvent, DEFAULT_JOURNAL_CAPACITY,
};

pub use geometry::{segment_distance_sq, DataPoint, PixelPoint};
