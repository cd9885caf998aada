use crate::error::{DashboardError, Result};
use crate::{execution_result_to_async, Async, ExecutionResult, State};
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use std::future::Future;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

type Reducer<S> = Box<dyn FnOnce(S) -> S + Send>;
type Action<S> = Box<dyn FnOnce(S) + Send>;
type Listener<S> = Box<dyn Fn(&S) + Send + Sync>;

/// A single-writer state container.
///
/// Reducers are queued and applied one at a time on a background task, so
/// every state transition is serialised no matter how many tasks submit
/// them. Observers subscribe through [`StateStore::to_signal`].
///
/// Must be created inside a tokio runtime.
pub struct StateStore<S: State> {
    state: Mutable<S>,
    set_state_tx: UnboundedSender<Reducer<S>>,
    with_state_tx: UnboundedSender<Action<S>>,
}

impl<S: State> StateStore<S> {
    pub fn new(initial_state: S) -> Self {
        Self::spawn(initial_state, None)
    }

    /// Like [`StateStore::new`], but `listener` sees every state produced by a
    /// reducer before it is published to subscribers.
    pub fn observed<L>(initial_state: S, listener: L) -> Self
    where
        L: Fn(&S) + Send + Sync + 'static,
    {
        Self::spawn(initial_state, Some(Box::new(listener)))
    }

    fn spawn(initial_state: S, listener: Option<Listener<S>>) -> Self {
        let state = Mutable::new(initial_state);
        let (set_state_tx, set_state_rx) = tokio::sync::mpsc::unbounded_channel::<Reducer<S>>();
        let (with_state_tx, with_state_rx) = tokio::sync::mpsc::unbounded_channel::<Action<S>>();

        let state_clone = state.clone();
        tokio::spawn(async move {
            Self::process_queue(state_clone, set_state_rx, with_state_rx, listener).await;
        });

        StateStore {
            state,
            set_state_tx,
            with_state_tx,
        }
    }

    async fn process_queue(
        state: Mutable<S>,
        mut set_state_rx: UnboundedReceiver<Reducer<S>>,
        mut with_state_rx: UnboundedReceiver<Action<S>>,
        listener: Option<Listener<S>>,
    ) {
        loop {
            tokio::select! {
                biased;
                Some(reducer) = set_state_rx.recv() => {
                    let new_state = reducer(state.get_cloned());
                    if let Some(listener) = &listener {
                        listener(&new_state);
                    }
                    state.set(new_state);
                }
                Some(action) = with_state_rx.recv() => {
                    action(state.get_cloned());
                }
                else => break,
            }
        }
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<S>> {
        self.state.signal_cloned().to_stream()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<S> {
        self.state.signal_cloned()
    }

    pub fn set_state<F>(&self, reducer: F) -> Result<()>
    where
        F: FnOnce(S) -> S + Send + 'static,
    {
        self.set_state_tx
            .send(Box::new(reducer))
            .map_err(|_| DashboardError::ChannelClosed)
    }

    /// Runs `action` against the state once every reducer queued before it
    /// has been applied.
    pub fn with_state<F>(&self, action: F) -> Result<()>
    where
        F: FnOnce(S) + Send + 'static,
    {
        self.with_state_tx
            .send(Box::new(action))
            .map_err(|_| DashboardError::ChannelClosed)
    }

    /// Current published state, without waiting for queued reducers.
    pub fn get_state(&self) -> S {
        self.state.get_cloned()
    }

    pub async fn await_state(&self) -> Result<S> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.with_state(move |state| {
            let _ = tx.send(state);
        })?;
        rx.await.map_err(|_| DashboardError::ChannelClosed)
    }

    fn update_async_state<T>(
        set_state_tx: &UnboundedSender<Reducer<S>>,
        state_updater: impl FnOnce(S, Async<T>) -> S + Send + 'static,
        async_state: Async<T>,
    ) where
        T: Send + Clone + 'static,
    {
        let _ = set_state_tx.send(Box::new(move |old_state| {
            state_updater(old_state, async_state)
        }));
    }

    /// Spawns `computation` and reports its lifecycle through `state_updater`:
    /// first `Async::Loading(None)`, then `Success` or `Fail`.
    pub fn async_execute<T, R, F, U>(&self, computation: F, state_updater: U) -> JoinHandle<()>
    where
        T: Clone + Send + 'static,
        R: ExecutionResult<T> + Send + 'static,
        F: Future<Output = R> + Send + 'static,
        U: FnOnce(S, Async<T>) -> S + Clone + Send + 'static,
    {
        let set_state_tx = self.set_state_tx.clone();
        tokio::spawn(async move {
            Self::update_async_state(&set_state_tx, state_updater.clone(), Async::Loading(None));
            // Let the loading state land before the computation starts.
            tokio::task::yield_now().await;
            let async_result = execution_result_to_async(computation.await);
            Self::update_async_state(&set_state_tx, state_updater, async_result);
        })
    }
}
