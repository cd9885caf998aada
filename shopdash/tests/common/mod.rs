#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use futures_signals::signal::SignalExt;
use shopdash::api::{DeleteReply, ProductApi};
use shopdash::{Notification, Notifier, Product, ProductId, Result, State, StateStore};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A `ProductApi` that replays scripted responses and counts calls.
///
/// An exhausted fetch script answers `Ok(None)`; an exhausted delete script
/// answers a successful reply.
#[derive(Default)]
pub struct FakeApi {
    fetches: Mutex<VecDeque<(Duration, Result<Option<Vec<Product>>>)>>,
    deletes: Mutex<VecDeque<Result<DeleteReply>>>,
    fetch_calls: AtomicUsize,
    deleted: Mutex<Vec<ProductId>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_fetch(&self, result: Result<Option<Vec<Product>>>) -> &Self {
        self.script_fetch_after(Duration::ZERO, result)
    }

    pub fn script_fetch_after(&self, delay: Duration, result: Result<Option<Vec<Product>>>) -> &Self {
        self.fetches.lock().unwrap().push_back((delay, result));
        self
    }

    pub fn script_delete(&self, result: Result<DeleteReply>) -> &Self {
        self.deletes.lock().unwrap().push_back(result);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<ProductId> {
        self.deleted.lock().unwrap().clone()
    }
}

impl ProductApi for FakeApi {
    fn fetch_products(&self) -> BoxFuture<'_, Result<Option<Vec<Product>>>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = self
            .fetches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(None)));
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        }
        .boxed()
    }

    fn delete_product<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<DeleteReply>> {
        self.deleted.lock().unwrap().push(id.clone());
        let result = self.deletes.lock().unwrap().pop_front().unwrap_or(Ok(DeleteReply {
            status_code: 200,
            message: "Product deleted successfully".into(),
        }));
        async move { result }.boxed()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn errors(&self) -> usize {
        self.seen().iter().filter(|n| n.is_error()).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

pub fn catalogue() -> Vec<Product> {
    vec![
        Product::new("p1", "Red Shoe", 1499.0, 3).with_image("https://cdn.example/shoe.png"),
        Product::new("p2", "Blue Hat", 250.0, 10),
        Product::new("p3", "red socks", 99.0, 0),
    ]
}

pub fn titles(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.title.as_str()).collect()
}

/// Resolves with the first published state matching `predicate`.
pub async fn wait_for<S, F>(store: &StateStore<S>, predicate: F) -> S
where
    S: State,
    F: FnMut(&S) -> bool,
{
    let mut matched = None;
    let watch = store.to_signal().stop_if(predicate).for_each(|state| {
        matched = Some(state);
        async {}
    });
    tokio::time::timeout(Duration::from_secs(5), watch)
        .await
        .expect("state never matched");
    matched.expect("signal ended without a state")
}

/// Gives spawned watchers a chance to run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
