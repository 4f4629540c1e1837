//! # Event Bus Module
//!
//! Publish/subscribe channel through which the annotation engine reports
//! hover, selection, registry and sync changes to the surrounding page.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chartkit_core::event_bus::{EventBus, EventCategory};
//!
//! let bus = EventBus::with_journal(64);
//! let listener = bus.listen(EventCategory::Selection, |event| {
//!     tracing::info!("{}", event.description())
//! });
//! bus.selection_changed(vec!["a".into()], Some("a".into()));
//! bus.unlisten(listener);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
