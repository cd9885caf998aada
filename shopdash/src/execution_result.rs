use crate::error::DashboardError;
use crate::Async;

/// Anything a store computation may return that can be folded into an
/// [`Async`] outcome.
pub trait ExecutionResult<T: Clone> {
    fn into_async(self) -> Async<T>;
}

impl<T: Clone> ExecutionResult<T> for Result<T, DashboardError> {
    fn into_async(self) -> Async<T> {
        match self {
            Ok(value) => Async::success(value),
            Err(error) => Async::fail(error, None),
        }
    }
}

impl<T: Clone> ExecutionResult<T> for Option<T> {
    fn into_async(self) -> Async<T> {
        match self {
            Some(value) => Async::success(value),
            None => Async::fail(
                DashboardError::UnexpectedShape("computation produced no value".into()),
                None,
            ),
        }
    }
}

pub fn execution_result_to_async<T: Clone, R: ExecutionResult<T>>(result: R) -> Async<T> {
    result.into_async()
}
