//! Transient user notifications ("toasts") raised by the controller.

use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub severity: ToastSeverity,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: ToastSeverity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: ToastSeverity::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == ToastSeverity::Error
    }
}

/// Non-blocking sink for toasts. Implementations must not wait on the UI.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Fans toasts out to every subscribed view.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Toast>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, toast: Toast) {
        // no subscribers is fine: the toast is simply dropped
        let _ = self.tx.send(toast);
    }
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.severity {
            ToastSeverity::Success => info!(message = %toast.message, "toast"),
            ToastSeverity::Error => warn!(message = %toast.message, "toast"),
        }
    }
}
