//! Product list lifecycle: fetch the collection, derive the visible subset
//! from the search text, delete products behind a confirmation step.
//!
//! All transitions are reducers on [`ProductListState`]; network work runs
//! through [`StateStore::async_execute`] and reports back with the request it
//! belonged to, so a slow response can never overwrite a newer one.

use crate::api::{DeleteReply, ProductApi};
use crate::error::{DashboardError, Result};
use crate::filter::filter_products;
use crate::product::{Product, ProductId};
use crate::toast::{Notification, Notifier};
use crate::{Async, State, StateStore};
use futures_signals::signal::{Signal, SignalExt};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch products";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete product";
pub const DELETE_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this product?";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListState {
    /// Unfiltered copy of the last accepted fetch.
    pub products: Vec<Product>,
    /// `products` narrowed by `search`; recomputed whenever either changes.
    pub filtered: Vec<Product>,
    pub search: String,
    pub is_loading: bool,
    /// Bumped after every successful delete; each change triggers a fetch.
    pub refresh: u64,
    pub last_error: Option<DashboardError>,
    /// Product awaiting a yes/no answer before it is deleted.
    pub pending_delete: Option<ProductId>,
    pub delete: Async<DeleteReply>,
    latest_request: u64,
}

impl State for ProductListState {}

impl ProductListState {
    pub fn set_search(self, search: String) -> Self {
        let filtered = filter_products(&self.products, &search);
        Self {
            search,
            filtered,
            ..self
        }
    }

    pub fn on_fetch(self, request_id: u64, result: Async<Option<Vec<Product>>>) -> Self {
        match result {
            Async::Uninitialized => self,
            _ if request_id < self.latest_request => {
                debug!(
                    request_id,
                    latest_request = self.latest_request,
                    "discarding stale product list response"
                );
                self
            }
            Async::Loading(_) => Self {
                is_loading: true,
                latest_request: request_id,
                ..self
            },
            Async::Success { value: Some(products) } => {
                let filtered = filter_products(&products, &self.search);
                Self {
                    products,
                    filtered,
                    is_loading: false,
                    last_error: None,
                    ..self
                }
            }
            Async::Success { value: None } => Self {
                is_loading: false,
                last_error: None,
                ..self
            },
            Async::Fail { error, .. } => Self {
                is_loading: false,
                last_error: Some(error),
                ..self
            },
        }
    }

    pub fn request_delete(self, id: ProductId) -> Self {
        Self {
            pending_delete: Some(id),
            ..self
        }
    }

    pub fn cancel_delete(self) -> Self {
        Self {
            pending_delete: None,
            ..self
        }
    }

    pub fn on_delete(self, result: Async<DeleteReply>) -> Self {
        let refresh = if result.is_success() {
            self.refresh.wrapping_add(1)
        } else {
            self.refresh
        };
        Self {
            delete: result,
            refresh,
            ..self
        }
    }

    pub fn bump_refresh(self) -> Self {
        Self {
            refresh: self.refresh.wrapping_add(1),
            ..self
        }
    }
}

/// Drives a [`ProductListState`] store against a [`ProductApi`].
///
/// Cloning is cheap and every clone drives the same store.
#[derive(Clone)]
pub struct ProductListModel {
    store: Arc<StateStore<ProductListState>>,
    api: Arc<dyn ProductApi>,
    notifier: Arc<dyn Notifier>,
    next_request: Arc<AtomicU64>,
    mounted: Arc<Mutex<Option<CancellationToken>>>,
}

impl ProductListModel {
    pub fn new(api: Arc<dyn ProductApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: Arc::new(StateStore::new(ProductListState::default())),
            api,
            notifier,
            next_request: Arc::new(AtomicU64::new(0)),
            mounted: Arc::new(Mutex::new(None)),
        }
    }

    pub fn store(&self) -> Arc<StateStore<ProductListState>> {
        self.store.clone()
    }

    /// Starts the view: fetches now and again after every refresh bump, and
    /// follows `search` into the filtered view. Mounting again replaces the
    /// previous subscriptions.
    pub fn mount<Q>(&self, search: Q)
    where
        Q: Signal<Item = String> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Ok(mut mounted) = self.mounted.lock() {
            if let Some(previous) = mounted.replace(token.clone()) {
                previous.cancel();
            }
        }

        let model = self.clone();
        let refreshes = self
            .store
            .to_signal()
            .map(|state| state.refresh)
            .dedupe()
            .for_each(move |refresh| {
                debug!(refresh, "refresh requested");
                model.fetch();
                async {}
            });
        tokio::spawn(run_until_cancelled(token.clone(), refreshes));

        let store = self.store.clone();
        let searches = search.for_each(move |query| {
            if store.set_state(move |state| state.set_search(query)).is_err() {
                warn!("product list store closed, search update dropped");
            }
            async {}
        });
        tokio::spawn(run_until_cancelled(token, searches));
    }

    pub fn unmount(&self) {
        if let Ok(mut mounted) = self.mounted.lock() {
            if let Some(token) = mounted.take() {
                token.cancel();
            }
        }
    }

    /// Requests the product collection. Failures keep the current snapshot
    /// and raise one error toast.
    pub fn fetch(&self) -> JoinHandle<()> {
        let request_id = self.next_request.fetch_add(1, Ordering::SeqCst) + 1;
        let api = self.api.clone();
        let notifier = self.notifier.clone();
        self.store.async_execute(
            async move {
                let result = api.fetch_products().await;
                if let Err(e) = &result {
                    error!(request_id, error = %e, "failed to fetch products");
                    notifier.notify(Notification::error(FETCH_FAILED_MESSAGE));
                }
                result
            },
            move |state: ProductListState, result: Async<Option<Vec<Product>>>| {
                state.on_fetch(request_id, result)
            },
        )
    }

    pub fn refresh(&self) -> Result<()> {
        self.store.set_state(|state| state.bump_refresh())
    }

    pub fn apply_search(&self, query: impl Into<String>) -> Result<()> {
        let query = query.into();
        self.store.set_state(move |state| state.set_search(query))
    }

    /// First half of a delete: ask the user to confirm.
    pub fn request_delete(&self, id: ProductId) -> Result<()> {
        self.store.set_state(move |state| state.request_delete(id))
    }

    pub fn cancel_delete(&self) -> Result<()> {
        self.store.set_state(|state| state.cancel_delete())
    }

    /// Second half of a delete: the user said yes. Does nothing when no
    /// confirmation is pending.
    pub fn confirm_delete(&self) -> Result<()> {
        let model = self.clone();
        self.store.with_state(move |state| {
            let Some(id) = state.pending_delete else {
                return;
            };
            if model.store.set_state(|state| state.cancel_delete()).is_err() {
                return;
            }
            model.delete_confirmed(id);
        })
    }

    fn delete_confirmed(&self, id: ProductId) -> JoinHandle<()> {
        let api = self.api.clone();
        let notifier = self.notifier.clone();
        self.store.async_execute(
            async move {
                match api.delete_product(&id).await {
                    Ok(reply) if reply.is_success() => {
                        info!(product_id = %id, "product deleted");
                        notifier.notify(Notification::success(reply.message.clone()));
                        Ok(reply)
                    }
                    Ok(reply) => {
                        warn!(product_id = %id, status_code = reply.status_code, "delete rejected");
                        notifier.notify(Notification::error(DELETE_FAILED_MESSAGE));
                        Err(DashboardError::Rejected {
                            status_code: reply.status_code,
                            message: reply.message,
                        })
                    }
                    Err(e) => {
                        error!(product_id = %id, error = %e, "failed to delete product");
                        notifier.notify(Notification::error(DELETE_FAILED_MESSAGE));
                        Err(e)
                    }
                }
            },
            |state: ProductListState, result: Async<DeleteReply>| state.on_delete(result),
        )
    }
}

async fn run_until_cancelled<F>(token: CancellationToken, task: F)
where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = token.cancelled() => {}
        _ = task => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoes() -> Vec<Product> {
        vec![
            Product::new("1", "Red Shoe", 10.0, 1),
            Product::new("2", "Blue Hat", 20.0, 2),
        ]
    }

    #[test]
    fn stale_responses_are_discarded() {
        let state = ProductListState::default()
            .on_fetch(1, Async::Loading(None))
            .on_fetch(2, Async::Loading(None))
            .on_fetch(2, Async::success(Some(shoes())))
            .on_fetch(1, Async::success(Some(vec![])));

        assert_eq!(state.products, shoes());
        assert!(!state.is_loading);
    }

    #[test]
    fn loading_stays_on_until_latest_request_resolves() {
        let state = ProductListState::default()
            .on_fetch(1, Async::Loading(None))
            .on_fetch(2, Async::Loading(None))
            .on_fetch(1, Async::success(Some(shoes())));
        assert!(state.is_loading);
        assert!(state.products.is_empty());
    }

    #[test]
    fn late_loading_of_an_older_request_is_ignored() {
        let state = ProductListState::default()
            .on_fetch(2, Async::Loading(None))
            .on_fetch(2, Async::success(Some(shoes())))
            .on_fetch(1, Async::Loading(None))
            .on_fetch(1, Async::success(Some(vec![])));
        assert!(!state.is_loading);
        assert_eq!(state.products, shoes());
    }

    #[test]
    fn fetch_respects_current_search() {
        let state = ProductListState::default()
            .set_search("hat".into())
            .on_fetch(1, Async::Loading(None))
            .on_fetch(1, Async::success(Some(shoes())));
        assert_eq!(state.products.len(), 2);
        assert_eq!(state.filtered, vec![shoes()[1].clone()]);
    }

    #[test]
    fn failed_fetch_keeps_snapshot() {
        let loaded = ProductListState::default()
            .on_fetch(1, Async::Loading(None))
            .on_fetch(1, Async::success(Some(shoes())));
        let failed = loaded
            .clone()
            .on_fetch(2, Async::Loading(None))
            .on_fetch(2, Async::fail(DashboardError::Transport("down".into()), None));

        assert_eq!(failed.products, loaded.products);
        assert_eq!(failed.filtered, loaded.filtered);
        assert!(!failed.is_loading);
        assert!(failed.last_error.is_some());
    }

    #[test]
    fn only_successful_delete_bumps_refresh() {
        let ok = DeleteReply {
            status_code: 200,
            message: "Product deleted".into(),
        };
        let state = ProductListState::default().on_delete(Async::success(ok));
        assert_eq!(state.refresh, 1);

        let state = state.on_delete(Async::fail(
            DashboardError::Rejected {
                status_code: 404,
                message: String::new(),
            },
            None,
        ));
        assert_eq!(state.refresh, 1);
    }
}
