//! Render wakeups.
//!
//! Store writes publish snapshots synchronously. A render task parked on a
//! [`WakeupReceiver`] learns about them through a bounded channel of empty
//! signals: the task pulls the current snapshot itself, so any number of
//! writes between two renders fold into one wakeup.

use std::sync::Mutex;

use log::trace;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Signals queued before further writes stop adding to the backlog.
const WAKEUP_CAPACITY: usize = 16;

/// Create a connected sender/receiver pair.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    let (tx, rx) = mpsc::channel(WAKEUP_CAPACITY);
    (WakeupSender { tx }, WakeupReceiver { rx })
}

/// Write side, installed into a store.
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Signal one write without blocking.
    ///
    /// Returns `false` once the receiver is gone. A full backlog still counts
    /// as delivered.
    pub fn notify(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        }
    }
}

/// Render side.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Wait for a write, then fold in every signal already queued.
    ///
    /// Returns how many signals this wakeup covers (at least 1), or `None`
    /// when no sender is left.
    pub async fn recv(&mut self) -> Option<usize> {
        self.rx.recv().await?;
        Some(1 + self.pending())
    }

    /// Consume queued signals without waiting; returns how many there were.
    pub fn pending(&mut self) -> usize {
        std::iter::from_fn(|| self.rx.try_recv().ok()).count()
    }
}

/// The store's sender slot. Empty until a render layer installs one.
#[derive(Debug, Default)]
pub(crate) struct WakeupSlot {
    sender: Mutex<Option<WakeupSender>>,
}

impl WakeupSlot {
    /// Swap the slot's content, returning the previous sender.
    pub(crate) fn replace(&self, sender: Option<WakeupSender>) -> Option<WakeupSender> {
        match self.sender.lock() {
            Ok(mut guard) => std::mem::replace(&mut *guard, sender),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), sender),
        }
    }

    /// Signal the installed sender. A sender whose receiver is gone is dropped.
    pub(crate) fn notify(&self) {
        let Ok(mut guard) = self.sender.lock() else {
            return;
        };
        if let Some(sender) = guard.as_ref()
            && !sender.notify()
        {
            trace!("Wakeup receiver closed, dropping sender");
            *guard = None;
        }
    }

    pub(crate) fn is_installed(&self) -> bool {
        self.sender
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}
