//! Event type definitions for the event bus.
//!
//! Events are what the surrounding page observes of the annotation engine:
//! hover changes feed the side info panel, selection changes feed the
//! selection counter and the single-target panels, sync events feed status
//! toasts. Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

/// Root event enum for all annotation events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationEvent {
    /// Hover state transitions
    Hover(HoverEvent),
    /// Selection state transitions
    Selection(SelectionEvent),
    /// Shape registry mutations
    Registry(RegistryEvent),
    /// Remote persistence outcomes
    Sync(SyncEvent),
    /// User-facing errors
    Error(ErrorEvent),
}

impl AnnotationEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AnnotationEvent::Hover(_) => EventCategory::Hover,
            AnnotationEvent::Selection(_) => EventCategory::Selection,
            AnnotationEvent::Registry(_) => EventCategory::Registry,
            AnnotationEvent::Sync(_) => EventCategory::Sync,
            AnnotationEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AnnotationEvent::Hover(e) => e.description(),
            AnnotationEvent::Selection(e) => e.description(),
            AnnotationEvent::Registry(e) => e.description(),
            AnnotationEvent::Sync(e) => e.description(),
            AnnotationEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Hover events.
    Hover,
    /// Selection events.
    Selection,
    /// Registry events.
    Registry,
    /// Sync events.
    Sync,
    /// Error events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Hover => write!(f, "Hover"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Registry => write!(f, "Registry"),
            EventCategory::Sync => write!(f, "Sync"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Hover events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HoverEvent {
    /// The pointer now rests on a shape.
    Entered {
        /// Id of the hovered shape.
        id: String,
    },
    /// The hover state was cleared.
    Cleared {
        /// Id of the shape that was hovered before.
        previous: Option<String>,
    },
}

impl HoverEvent {
    fn description(&self) -> String {
        match self {
            HoverEvent::Entered { id } => format!("Hovering {}", id),
            HoverEvent::Cleared { previous: Some(id) } => format!("Hover left {}", id),
            HoverEvent::Cleared { previous: None } => "Hover cleared".to_string(),
        }
    }
}

/// Selection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The selected set or the active member changed.
    Changed {
        /// Selected ids in insertion order.
        ids: Vec<String>,
        /// The active ("last selected") id.
        active: Option<String>,
    },
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::Changed { ids, active } => match active {
                Some(active) => format!("{} selected, active {}", ids.len(), active),
                None => format!("{} selected", ids.len()),
            },
        }
    }
}

/// Registry events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// The whole registry was replaced.
    Replaced {
        /// Number of shapes in the new registry.
        shape_count: usize,
    },
    /// Shapes were removed in one batch.
    Removed {
        /// Removed ids.
        ids: Vec<String>,
    },
    /// A shape was patched in place.
    Patched {
        /// Patched id.
        id: String,
    },
    /// Every shape was cleared.
    Cleared,
}

impl RegistryEvent {
    fn description(&self) -> String {
        match self {
            RegistryEvent::Replaced { shape_count } => {
                format!("Registry replaced ({} shapes)", shape_count)
            }
            RegistryEvent::Removed { ids } => format!("Removed {} shapes", ids.len()),
            RegistryEvent::Patched { id } => format!("Patched {}", id),
            RegistryEvent::Cleared => "Registry cleared".to_string(),
        }
    }
}

/// Remote persistence events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncEvent {
    /// A single drawing was deleted remotely.
    Deleted {
        /// Chart symbol.
        symbol: String,
        /// Deleted id.
        id: String,
    },
    /// A batch delete finished.
    BatchDeleted {
        /// Chart symbol.
        symbol: String,
        /// Number of accepted deletions.
        succeeded: usize,
        /// Number of rejected deletions.
        failed: usize,
    },
    /// Every drawing of a symbol was deleted remotely.
    AllDeleted {
        /// Chart symbol.
        symbol: String,
    },
    /// A drawing was updated remotely.
    Updated {
        /// Chart symbol.
        symbol: String,
        /// Updated id.
        id: String,
    },
}

impl SyncEvent {
    fn description(&self) -> String {
        match self {
            SyncEvent::Deleted { symbol, id } => format!("Deleted {} on {}", id, symbol),
            SyncEvent::BatchDeleted {
                symbol,
                succeeded,
                failed,
            } => format!(
                "Batch delete on {}: {} deleted, {} failed",
                symbol, succeeded, failed
            ),
            SyncEvent::AllDeleted { symbol } => format!("Deleted all drawings on {}", symbol),
            SyncEvent::Updated { symbol, id } => format!("Updated {} on {}", id, symbol),
        }
    }
}

/// Error events surfaced to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// A remote operation failed and the local state was left unchanged.
    SyncFailed {
        /// Operation name (delete, update, ...).
        operation: String,
        /// Message suitable for display.
        message: String,
    },
    /// A push-channel message could not be applied.
    DrawingsRejected {
        /// Message suitable for display.
        message: String,
    },
}

impl ErrorEvent {
    fn description(&self) -> String {
        match self {
            ErrorEvent::SyncFailed { operation, message } => {
                format!("{} failed: {}", operation, message)
            }
            ErrorEvent::DrawingsRejected { message } => {
                format!("Drawings rejected: {}", message)
            }
        }
    }
}
