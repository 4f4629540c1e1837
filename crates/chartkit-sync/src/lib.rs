//! # ChartKit Sync
//!
//! Deletion/Update Synchronizer for annotation shapes.
//!
//! Remote calls go through a [`DrawingBackend`]; [`HttpBackend`] talks to the
//! drawing service over JSON. The [`Synchronizer`] awaits every remote
//! outcome before it touches the engine's registry, so a batch of concurrent
//! deletes is applied in a single registry update.

pub mod backend;
pub mod http;
pub mod synchronizer;
pub mod wire;

pub use backend::DrawingBackend;
pub use http::{HttpBackend, HttpBackendConfig};
pub use synchronizer::{BatchDeleteReport, Synchronizer};
pub use wire::{PropertiesResponse, ShapeProperties, Status, StatusResponse};
