use crate::error::Result;
use crate::{State, StateStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification::Error(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success(message) | Notification::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

/// Delivers transient user-facing messages.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
}

impl State for ToastState {}

impl ToastState {
    pub fn push(mut self, toast: Toast) -> Self {
        self.toasts.push(toast);
        self
    }

    pub fn dismiss(mut self, id: u64) -> Self {
        self.toasts.retain(|toast| toast.id != id);
        self
    }

    pub fn error_count(&self) -> usize {
        self.toasts
            .iter()
            .filter(|toast| toast.notification.is_error())
            .count()
    }
}

/// Keeps the currently visible toasts; each one disappears after `ttl`.
pub struct ToastModel {
    store: Arc<StateStore<ToastState>>,
    next_id: AtomicU64,
    ttl: Option<Duration>,
}

impl Default for ToastModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastModel {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

    pub fn new() -> Self {
        Self::with_ttl(Some(Self::DEFAULT_TTL))
    }

    /// `None` keeps toasts until they are dismissed explicitly.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            store: Arc::new(StateStore::new(ToastState::default())),
            next_id: AtomicU64::new(0),
            ttl,
        }
    }

    pub fn store(&self) -> Arc<StateStore<ToastState>> {
        self.store.clone()
    }

    pub fn show(&self, notification: Notification) -> Result<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(toast_id = id, ?notification, "showing toast");
        self.store
            .set_state(move |state| state.push(Toast { id, notification }))?;

        if let Some(ttl) = self.ttl {
            let store = self.store.clone();
            tokio::spawn(async move {
                tokio::time::sleep(ttl).await;
                let _ = store.set_state(move |state| state.dismiss(id));
            });
        }
        Ok(id)
    }

    pub fn dismiss(&self, id: u64) -> Result<()> {
        self.store.set_state(move |state| state.dismiss(id))
    }
}

impl Notifier for ToastModel {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.show(notification) {
            warn!(error = %e, "toast dropped");
        }
    }
}
