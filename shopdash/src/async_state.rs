use crate::error::DashboardError;

/// Lifecycle of one asynchronous request as seen from a store.
///
/// `Loading` and `Fail` may carry the last good value so a view can keep
/// showing it while a request is in flight or after it failed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Async<T: Clone> {
    Uninitialized,
    Loading(Option<T>),
    Success { value: T },
    Fail { error: DashboardError, value: Option<T> },
}

impl<T: Clone> Async<T> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Async::Success { .. } | Async::Fail { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Async::Loading(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Async::Success { .. })
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Async::Fail { .. })
    }

    pub fn error(&self) -> Option<&DashboardError> {
        match self {
            Async::Fail { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn value_ref(&self) -> Option<&T> {
        match self {
            Async::Loading(Some(value)) => Some(value),
            Async::Success { value } => Some(value),
            Async::Fail {
                value: Some(value), ..
            } => Some(value),
            _ => None,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Async::Uninitialized => None,
            Async::Loading(value) => value,
            Async::Success { value } => Some(value),
            Async::Fail { value, .. } => value,
        }
    }

    /// Converts to `Loading`, keeping whatever value is currently held.
    pub fn into_loading(self) -> Self {
        Async::Loading(self.value())
    }

    pub fn loading(value: Option<T>) -> Self {
        Async::Loading(value)
    }

    pub fn success(value: T) -> Self {
        Async::Success { value }
    }

    pub fn fail(error: DashboardError, value: Option<T>) -> Self {
        Async::Fail { error, value }
    }
}

impl<T: Clone> Default for Async<T> {
    fn default() -> Self {
        Async::Uninitialized
    }
}
