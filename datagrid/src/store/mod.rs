//! Row store - the single source of truth for a table instance.
//!
//! The store holds the current row sequence and the per-row/table UI state as
//! one immutable [`Snapshot`]. Every write publishes a brand new snapshot, so
//! consumers that compare `Arc` pointers see each update exactly once and never
//! observe a half-applied write.
//!
//! One [`RowStore`] is the writer (owned by the grid root). Any number of
//! [`StoreReader`] handles can be handed to rendering consumers; they can read
//! and subscribe but not write.
//!
//! # Example
//!
//! ```
//! use datagrid::store::{RowStore, StoreRead};
//! use datagrid::Row;
//!
//! let store = RowStore::new();
//! let reader = store.reader();
//!
//! store.replace_rows(vec![Row::new().set("name", "Bob")]);
//!
//! assert_eq!(reader.value_at("name", 0), Some("Bob".into()));
//! assert_eq!(reader.value_at("name", 5), None);
//! ```

mod snapshot;
mod wakeup;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use log::{debug, trace};
use serde_json::Value;

use crate::cell::{self, CellFormat};
use crate::column::ColumnDef;
use crate::row::Row;

pub use snapshot::{ActiveRow, FieldValues, Snapshot, TableState};
pub use wakeup::{WakeupReceiver, WakeupSender, channel as wakeup_channel};

use wakeup::WakeupSlot;

/// Callback invoked with each newly published snapshot.
type Subscriber = Arc<dyn Fn(&Arc<Snapshot>) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// State shared between the writer and every reader.
struct Shared {
    current: RwLock<Arc<Snapshot>>,
    dirty: AtomicBool,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    wakeup: WakeupSlot,
}

impl Shared {
    fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::default())),
            dirty: AtomicBool::new(false),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            wakeup: WakeupSlot::default(),
        }
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Build the next snapshot from the current one and publish it.
    fn commit<F>(&self, build: F)
    where
        F: FnOnce(&Snapshot) -> Snapshot,
    {
        let published = {
            let Ok(mut guard) = self.current.write() else {
                return;
            };
            let next = Arc::new(build(guard.as_ref()));
            *guard = Arc::clone(&next);
            next
        };

        self.dirty.store(true, Ordering::SeqCst);
        self.wakeup.notify();

        // Notify outside of both locks so subscribers may read or subscribe.
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .map(|guard| guard.iter().map(|(_, s)| Arc::clone(s)).collect())
            .unwrap_or_default();
        trace!(
            "Published snapshot ({} rows) to {} subscribers",
            published.len(),
            subscribers.len()
        );
        for subscriber in subscribers {
            subscriber(&published);
        }
    }

    fn subscribe(&self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut guard) = self.subscribers.lock() {
            guard.push((id, subscriber));
        }
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .lock()
            .map(|mut guard| {
                let before = guard.len();
                guard.retain(|(sid, _)| *sid != id);
                guard.len() != before
            })
            .unwrap_or(false)
    }
}

/// Read access to a row store.
///
/// Implemented by both the writer ([`RowStore`]) and the read-only
/// [`StoreReader`] handle. Every read goes through the snapshot current at the
/// time of the call.
pub trait StoreRead {
    // =========================================================================
    // Required Methods
    // =========================================================================

    /// The most recently published snapshot.
    fn snapshot(&self) -> Arc<Snapshot>;

    /// Register a callback invoked synchronously after every completed write.
    ///
    /// The callback is not invoked for the snapshot current at subscription
    /// time; pull that with [`StoreRead::snapshot`].
    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<Snapshot>) + Send + Sync + 'static;

    /// Remove a subscription. Returns `false` if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Whether a write happened since the last [`StoreRead::clear_dirty`].
    fn is_dirty(&self) -> bool;

    /// Clear the dirty flag after rendering.
    fn clear_dirty(&self);

    // =========================================================================
    // Provided Methods
    // =========================================================================

    /// Number of rows.
    fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns `true` if the store holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of `field` on the row at `row_index`, or `None`.
    ///
    /// Never panics, whatever the index.
    fn value_at(&self, field: &str, row_index: usize) -> Option<Value> {
        self.snapshot().value_at(field, row_index).cloned()
    }

    /// The value of `field` for every row, in row order.
    ///
    /// Bound to the current snapshot; call again after a write to see it.
    fn values_for_field(&self, field: &str) -> FieldValues {
        FieldValues::new(self.snapshot(), field)
    }

    /// Default cell text of `column` for every row.
    fn column_text(&self, column: &ColumnDef, format: &CellFormat) -> Vec<String> {
        let snapshot = self.snapshot();
        snapshot
            .rows()
            .iter()
            .map(|row| cell::default_text(Some(row), column, format))
            .collect()
    }
}

/// Writer handle of the row store.
///
/// Created empty at table initialisation. Not `Clone`: the grid root keeps
/// the only writer and hands out [`StoreReader`]s.
pub struct RowStore {
    shared: Arc<Shared>,
}

impl RowStore {
    /// Create an empty store: no rows, nothing collapsed, no active row.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new()),
        }
    }

    /// A read-only handle on this store.
    pub fn reader(&self) -> StoreReader {
        StoreReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Replace the row sequence, keeping the table state and active row.
    pub fn replace_rows(&self, rows: Vec<Row>) {
        debug!("Replacing rows ({} rows)", rows.len());
        self.shared.commit(|prev| prev.with_rows(rows));
    }

    /// Publish a reordering of the current rows.
    ///
    /// `order[i]` is the prior index of `rows[i]`. Unlike
    /// [`RowStore::replace_rows`], the active row keeps pointing at the same
    /// record.
    pub fn reorder_rows(&self, rows: Vec<Row>, order: &[usize]) {
        debug!("Reordering rows ({} rows)", rows.len());
        self.shared.commit(|prev| prev.with_reordered_rows(rows, order));
    }

    /// Replace the row sequence from a JSON document.
    ///
    /// A non-array document is treated as an empty sequence.
    pub fn replace_rows_json(&self, value: Value) {
        self.replace_rows(Row::many_from_json(value));
    }

    /// Replace the active row record only.
    pub fn set_active_row(&self, active_row: ActiveRow) {
        debug!("Active row: {:?}", active_row);
        self.shared.commit(|prev| prev.with_active_row(active_row));
    }

    /// Replace the table-wide UI flags only.
    pub fn set_table_state(&self, table_state: TableState) {
        debug!("Table state: {:?}", table_state);
        self.shared.commit(|prev| prev.with_table_state(table_state));
    }

    /// Install a wakeup sender signalled after every write.
    ///
    /// Replaces any previous sender. The store drops the sender on its own
    /// once the receiver is gone.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        if self.shared.wakeup.replace(Some(sender)).is_some() {
            debug!("Replaced wakeup sender");
        }
    }

    /// Remove the installed wakeup sender, closing the channel if it was the
    /// last one.
    pub fn uninstall_wakeup(&self) {
        self.shared.wakeup.replace(None);
    }

    /// Returns `true` while a wakeup sender is installed.
    pub fn has_wakeup(&self) -> bool {
        self.shared.wakeup.is_installed()
    }
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStore")
            .field("rows", &self.shared.snapshot().len())
            .finish()
    }
}

impl StoreRead for RowStore {
    fn snapshot(&self) -> Arc<Snapshot> {
        self.shared.snapshot()
    }

    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<Snapshot>) + Send + Sync + 'static,
    {
        self.shared.subscribe(Arc::new(callback))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.unsubscribe(id)
    }

    fn is_dirty(&self) -> bool {
        self.shared.dirty.load(Ordering::SeqCst)
    }

    fn clear_dirty(&self) {
        self.shared.dirty.store(false, Ordering::SeqCst);
    }
}

/// Read-only handle on a row store, cheap to clone.
#[derive(Clone)]
pub struct StoreReader {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for StoreReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreReader")
            .field("rows", &self.shared.snapshot().len())
            .finish()
    }
}

impl StoreRead for StoreReader {
    fn snapshot(&self) -> Arc<Snapshot> {
        self.shared.snapshot()
    }

    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<Snapshot>) + Send + Sync + 'static,
    {
        self.shared.subscribe(Arc::new(callback))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.unsubscribe(id)
    }

    fn is_dirty(&self) -> bool {
        self.shared.dirty.load(Ordering::SeqCst)
    }

    fn clear_dirty(&self) {
        self.shared.dirty.store(false, Ordering::SeqCst);
    }
}
