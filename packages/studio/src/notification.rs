//! Single-slot transient notification with auto-dismiss.
//!
//! Last write wins: a new message replaces whatever is shown and restarts the
//! display timer. Visibility is computed against `tokio::time::Instant`, so a
//! paused test clock drives expiry deterministically.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// How long a notification stays visible.
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_millis(3000);

/// Snapshot of the live notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub visible: bool,
}

#[derive(Debug)]
struct Slot {
    message: String,
    shown_at: Instant,
    dismissed: bool,
}

/// Shared handle to the notification slot. Clones refer to the same slot.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    slot: Arc<Mutex<Option<Slot>>>,
    display_for: Duration,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DISPLAY_DURATION)
    }

    pub fn with_duration(display_for: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            display_for,
        }
    }

    pub fn display_duration(&self) -> Duration {
        self.display_for
    }

    /// Show `message`, replacing the current one and restarting the timer.
    pub fn enqueue(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(message = %message, "notification enqueued");
        *self.lock() = Some(Slot {
            message,
            shown_at: Instant::now(),
            dismissed: false,
        });
    }

    /// Hide the current message now; its pending expiry no longer applies.
    pub fn dismiss(&self) {
        if let Some(slot) = self.lock().as_mut() {
            slot.dismissed = true;
        }
    }

    /// The last enqueued message and whether it is still visible.
    pub fn current(&self) -> Option<Notification> {
        let guard = self.lock();
        guard.as_ref().map(|slot| Notification {
            message: slot.message.clone(),
            visible: self.is_live(slot),
        })
    }

    /// The message, only while it is visible.
    pub fn visible_message(&self) -> Option<String> {
        self.current()
            .filter(|n| n.visible)
            .map(|n| n.message)
    }

    /// When the visible message will auto-dismiss.
    pub fn expires_at(&self) -> Option<Instant> {
        let guard = self.lock();
        guard
            .as_ref()
            .filter(|slot| self.is_live(slot))
            .map(|slot| slot.shown_at + self.display_for)
    }

    fn is_live(&self, slot: &Slot) -> bool {
        !slot.dismissed && slot.shown_at.elapsed() < self.display_for
    }

    fn lock(&self) -> MutexGuard<'_, Option<Slot>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}
