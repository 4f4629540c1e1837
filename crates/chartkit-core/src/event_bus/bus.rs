//! The annotation event bus.
//!
//! One bus is owned per chart and shared as `Arc<EventBus>` between the
//! annotation engine, the synchronizer and page code. Every published event
//! is stamped with a sequence number. Listeners choose the categories they
//! care about; async consumers take a broadcast receiver. An optional
//! journal keeps the latest events for status panels and audits.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{
    AnnotationEvent, ErrorEvent, EventCategory, HoverEvent, RegistryEvent, SelectionEvent,
    SyncEvent,
};

const CHANNEL_CAPACITY: usize = 256;

/// Default journal size for [`EventBus::with_journal`] callers that want one.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 128;

/// Set of event categories, stored as a bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategorySet(u8);

fn bit(category: EventCategory) -> u8 {
    match category {
        EventCategory::Hover => 1,
        EventCategory::Selection => 1 << 1,
        EventCategory::Registry => 1 << 2,
        EventCategory::Sync => 1 << 3,
        EventCategory::Error => 1 << 4,
    }
}

impl CategorySet {
    pub const ALL: Self = Self(0b1_1111);
    pub const NONE: Self = Self(0);

    pub fn of(categories: &[EventCategory]) -> Self {
        Self(categories.iter().fold(0, |mask, c| mask | bit(*c)))
    }

    pub fn with(self, category: EventCategory) -> Self {
        Self(self.0 | bit(category))
    }

    pub fn contains(&self, category: EventCategory) -> bool {
        self.0 & bit(category) != 0
    }
}

impl From<EventCategory> for CategorySet {
    fn from(category: EventCategory) -> Self {
        Self(bit(category))
    }
}

/// A published event with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub seq: u64,
    pub event: AnnotationEvent,
}

/// Handle returned by [`EventBus::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0.simple())
    }
}

struct Listener {
    categories: CategorySet,
    handler: Box<dyn Fn(&AnnotationEvent) + Send + Sync>,
}

pub struct EventBus {
    next_seq: AtomicU64,
    sender: broadcast::Sender<Envelope>,
    listeners: RwLock<HashMap<ListenerId, Listener>>,
    journal: Option<Mutex<VecDeque<Envelope>>>,
    journal_capacity: usize,
}

impl EventBus {
    /// A bus without a journal.
    pub fn new() -> Self {
        Self::build(0)
    }

    /// A bus that keeps the last `capacity` events.
    pub fn with_journal(capacity: usize) -> Self {
        Self::build(capacity)
    }

    fn build(journal_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            next_seq: AtomicU64::new(1),
            sender,
            listeners: RwLock::new(HashMap::new()),
            journal: (journal_capacity > 0)
                .then(|| Mutex::new(VecDeque::with_capacity(journal_capacity))),
            journal_capacity,
        }
    }

    /// Publishes `event`, returning its sequence number.
    ///
    /// Listeners run synchronously on the caller's thread, in no particular
    /// order. Having nobody listening is not an error.
    pub fn publish(&self, event: AnnotationEvent) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("event #{}: {}", seq, event.description());

        let category = event.category();
        for listener in self.listeners.read().values() {
            if listener.categories.contains(category) {
                (listener.handler)(&event);
            }
        }

        let envelope = Envelope { seq, event };
        if let Some(journal) = &self.journal {
            let mut journal = journal.lock();
            if journal.len() == self.journal_capacity {
                journal.pop_front();
            }
            journal.push_back(envelope.clone());
        }
        // Err only means no async receiver is alive.
        let _ = self.sender.send(envelope);
        seq
    }

    pub fn listen<F>(&self, categories: impl Into<CategorySet>, handler: F) -> ListenerId
    where
        F: Fn(&AnnotationEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(Uuid::new_v4());
        self.listeners.write().insert(
            id,
            Listener {
                categories: categories.into(),
                handler: Box::new(handler),
            },
        );
        tracing::debug!("{} attached", id);
        id
    }

    /// Returns false if `id` was not attached.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        self.listeners.write().remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn receiver(&self) -> broadcast::Receiver<Envelope> {
        self.sender.subscribe()
    }

    /// Sequence number of the most recent event, 0 before the first.
    pub fn last_seq(&self) -> u64 {
        self.next_seq.load(Ordering::Relaxed) - 1
    }

    /// Journaled events, oldest first. Empty without a journal.
    pub fn journal(&self) -> Vec<AnnotationEvent> {
        self.journal
            .as_ref()
            .map(|j| j.lock().iter().map(|e| e.event.clone()).collect())
            .unwrap_or_default()
    }

    /// Journaled events published after `seq`.
    pub fn journal_since(&self, seq: u64) -> Vec<Envelope> {
        self.journal
            .as_ref()
            .map(|j| j.lock().iter().filter(|e| e.seq > seq).cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear_journal(&self) {
        if let Some(journal) = &self.journal {
            journal.lock().clear();
        }
    }

    // ------------------------------------------------------------------
    // Typed publishers

    pub fn hover_entered(&self, id: impl ToString) {
        self.publish(AnnotationEvent::Hover(HoverEvent::Entered { id: id.to_string() }));
    }

    pub fn hover_cleared(&self, previous: Option<String>) {
        self.publish(AnnotationEvent::Hover(HoverEvent::Cleared { previous }));
    }

    pub fn selection_changed(&self, ids: Vec<String>, active: Option<String>) {
        self.publish(AnnotationEvent::Selection(SelectionEvent::Changed { ids, active }));
    }

    pub fn shapes_replaced(&self, shape_count: usize) {
        self.publish(AnnotationEvent::Registry(RegistryEvent::Replaced { shape_count }));
    }

    pub fn shapes_removed(&self, ids: Vec<String>) {
        self.publish(AnnotationEvent::Registry(RegistryEvent::Removed { ids }));
    }

    pub fn shape_patched(&self, id: impl ToString) {
        self.publish(AnnotationEvent::Registry(RegistryEvent::Patched { id: id.to_string() }));
    }

    pub fn registry_cleared(&self) {
        self.publish(AnnotationEvent::Registry(RegistryEvent::Cleared));
    }

    pub fn drawing_deleted(&self, symbol: &str, id: impl ToString) {
        self.publish(AnnotationEvent::Sync(SyncEvent::Deleted {
            symbol: symbol.to_string(),
            id: id.to_string(),
        }));
    }

    pub fn batch_deleted(&self, symbol: &str, succeeded: usize, failed: usize) {
        self.publish(AnnotationEvent::Sync(SyncEvent::BatchDeleted {
            symbol: symbol.to_string(),
            succeeded,
            failed,
        }));
    }

    pub fn all_deleted(&self, symbol: &str) {
        self.publish(AnnotationEvent::Sync(SyncEvent::AllDeleted {
            symbol: symbol.to_string(),
        }));
    }

    pub fn drawing_updated(&self, symbol: &str, id: impl ToString) {
        self.publish(AnnotationEvent::Sync(SyncEvent::Updated {
            symbol: symbol.to_string(),
            id: id.to_string(),
        }));
    }

    /// Surfaces a failed remote operation to the user.
    pub fn sync_failed(&self, operation: &str, message: impl ToString) {
        self.publish(AnnotationEvent::Error(ErrorEvent::SyncFailed {
            operation: operation.to_string(),
            message: message.to_string(),
        }));
    }

    pub fn drawings_rejected(&self, message: impl ToString) {
        self.publish(AnnotationEvent::Error(ErrorEvent::DrawingsRejected {
            message: message.to_string(),
        }));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .field("last_seq", &self.last_seq())
            .field("journal_capacity", &self.journal_capacity)
            .finish()
    }
}
