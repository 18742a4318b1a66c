//! User-facing notifications (toasts) for generation and export.
//!
//! The library reports progress through an injected [`Notifier`] instead of
//! printing anything itself, so the host decides how feedback is shown: the
//! CLI drives a spinner, tests record into a [`ToastQueue`], and library
//! callers that want silence pass [`NoopNotifier`].
//!
//! Notifications are fire-and-forget. Nothing waits on them and they never
//! fail.
//!
//! # Example
//!
//! ```rust
//! use wanderlens::notify::{Notifier, NotificationKind, ToastQueue};
//!
//! let toasts = ToastQueue::new();
//! let id = toasts.loading("Generating PDF...");
//! toasts.dismiss(id);
//! toasts.success("Itinerary downloaded successfully!");
//!
//! let kinds: Vec<_> = toasts.history().iter().map(|n| n.kind).collect();
//! assert_eq!(kinds, [NotificationKind::Loading, NotificationKind::Success]);
//! assert_eq!(toasts.active().len(), 1);
//! ```

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How long a toast stays visible unless dismissed earlier.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Most recent toasts kept in [`ToastQueue::history`]; older ones are dropped.
pub const HISTORY_LIMIT: usize = 256;

/// Handle returned for every notification; pass it to [`Notifier::dismiss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: ToastId,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    fn expires_at(&self) -> Instant {
        self.created_at + self.duration
    }
}

/// Receives notifications from the session and export flows.
///
/// All methods default to no-ops so implementors only override what they
/// display.
pub trait Notifier: Send + Sync {
    fn loading(&self, message: &str) -> ToastId {
        let _ = message;
        ToastId::default()
    }

    fn success(&self, message: &str) -> ToastId {
        let _ = message;
        ToastId::default()
    }

    fn error(&self, message: &str) -> ToastId {
        let _ = message;
        ToastId::default()
    }

    /// Remove a toast before its duration elapses. Unknown ids are ignored.
    fn dismiss(&self, id: ToastId) {
        let _ = id;
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn loading(&self, message: &str) -> ToastId {
        (**self).loading(message)
    }

    fn success(&self, message: &str) -> ToastId {
        (**self).success(message)
    }

    fn error(&self, message: &str) -> ToastId {
        (**self).error(message)
    }

    fn dismiss(&self, id: ToastId) {
        (**self).dismiss(id)
    }
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    active: Vec<Notification>,
    history: Vec<Notification>,
}

/// In-memory toast stack with auto-dismiss.
///
/// Toasts stack in creation order. Expiry is evaluated lazily against the
/// clock on every read, so no background task is needed.
#[derive(Debug)]
pub struct ToastQueue {
    duration: Duration,
    state: Mutex<QueueState>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_duration(DEFAULT_TOAST_DURATION)
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration,
            state: Mutex::new(QueueState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A panic while holding the lock leaves the toast list intact.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, kind: NotificationKind, message: &str) -> ToastId {
        let mut state = self.lock();
        state.next_id += 1;
        let notification = Notification {
            id: ToastId(state.next_id),
            kind,
            message: message.to_string(),
            created_at: Instant::now(),
            duration: self.duration,
        };
        let id = notification.id;
        let now = notification.created_at;
        state.active.retain(|n| n.expires_at() > now);
        if state.history.len() >= HISTORY_LIMIT {
            let excess = state.history.len() + 1 - HISTORY_LIMIT;
            state.history.drain(..excess);
        }
        state.history.push(notification.clone());
        state.active.push(notification);
        id
    }

    /// Toasts still visible now.
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    /// Toasts visible at `now`; expired ones are dropped from the stack.
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let mut state = self.lock();
        state.active.retain(|n| n.expires_at() > now);
        state.active.clone()
    }

    /// The last [`HISTORY_LIMIT`] toasts shown, oldest first.
    pub fn history(&self) -> Vec<Notification> {
        self.lock().history.clone()
    }

    /// Number of toasts of `kind` in [`history`](Self::history).
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.lock().history.iter().filter(|n| n.kind == kind).count()
    }
}

impl Notifier for ToastQueue {
    fn loading(&self, message: &str) -> ToastId {
        self.push(NotificationKind::Loading, message)
    }

    fn success(&self, message: &str) -> ToastId {
        self.push(NotificationKind::Success, message)
    }

    fn error(&self, message: &str) -> ToastId {
        self.push(NotificationKind::Error, message)
    }

    fn dismiss(&self, id: ToastId) {
        self.lock().active.retain(|n| n.id != id);
    }
}
