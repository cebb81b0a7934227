//! # Notifications
//!
//! Transient toasts raised by cart and form commands.
//!
//! ## Toast Lifecycle
//! ```text
//! notify("Mug has been added to the cart!", Cart)
//!      │
//!      ▼
//! ┌──────────┐   duration elapsed   ┌──────────┐
//! │ visible  │ ───────────────────► │ expired  │ ── prune() drops it
//! └──────────┘                      └──────────┘
//!      │ dismiss(id)
//!      ▼
//!   removed
//! ```
//!
//! Expiry is measured on the tokio clock, so tests with paused time decide
//! exactly when a toast goes away.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use basket_core::Severity;
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Something that can show a message to the shopper. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// A toast on screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    #[serde(skip)]
    pub expires_at: Instant,
}

impl Toast {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process toast queue.
#[derive(Debug)]
pub struct ToastCenter {
    toasts: Mutex<Vec<Toast>>,
    duration: Duration,
}

impl ToastCenter {
    /// Creates a queue whose toasts live for `duration`.
    pub fn new(duration: Duration) -> Self {
        ToastCenter {
            toasts: Mutex::new(Vec::new()),
            duration,
        }
    }

    /// Toasts that have not expired, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        let now = Instant::now();
        self.lock()
            .iter()
            .filter(|t| !t.is_expired(now))
            .cloned()
            .collect()
    }

    /// Removes a toast before it expires. Returns false if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        let removed = toasts.len() != before;
        if removed {
            debug!(%id, "Toast dismissed");
        }
        removed
    }

    /// Drops expired toasts and returns how many went.
    pub fn prune(&self) -> usize {
        let now = Instant::now();
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| !t.is_expired(now));
        before - toasts.len()
    }

    /// Messages of the visible toasts, for quick assertions and logs.
    pub fn messages(&self) -> Vec<String> {
        self.visible().into_iter().map(|t| t.message).collect()
    }

    // A panic while holding the lock cannot leave the Vec half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        ToastCenter::new(Duration::from_millis(basket_core::TOAST_DURATION_MS))
    }
}

impl Notifier for ToastCenter {
    fn notify(&self, message: &str, severity: Severity) {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.to_string(),
            severity,
            expires_at: Instant::now() + self.duration,
        };
        debug!(id = %toast.id, %severity, text = message, "Toast raised");

        let mut toasts = self.lock();
        let now = Instant::now();
        toasts.retain(|t| !t.is_expired(now));
        toasts.push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_duration() {
        let center = ToastCenter::new(Duration::from_secs(4));
        center.notify("Cart has been cleared", Severity::Error);
        assert_eq!(center.visible().len(), 1);

        tokio::time::advance(Duration::from_millis(3_999)).await;
        assert_eq!(center.visible().len(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(center.visible().is_empty());
        assert_eq!(center.prune(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_early() {
        let center = ToastCenter::default();
        center.notify("one", Severity::Info);
        center.notify("two", Severity::Success);

        let first = center.visible()[0].id;
        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));
        assert_eq!(center.messages(), vec!["two".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_keep_arrival_order_and_severity() {
        let center = ToastCenter::default();
        center.notify("Mug has been added to the cart!", Severity::Cart);
        center.notify("Mug removed from cart", Severity::Error);

        let toasts = center.visible();
        assert_eq!(toasts[0].severity, Severity::Cart);
        assert_eq!(toasts[1].severity, Severity::Error);
    }

    #[test]
    fn test_toast_serializes_without_instant() {
        let toast = Toast {
            id: Uuid::nil(),
            message: "hi".into(),
            severity: Severity::Success,
            expires_at: Instant::now(),
        };
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["severity"], "success");
        assert!(json.get("expiresAt").is_none());
    }
}
