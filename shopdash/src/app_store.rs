//! Process-wide application state: four independent slices under one root,
//! rehydrated from storage at startup and written back after every change.
//!
//! The stored blob follows the redux-persist layout so a root persisted by
//! the web dashboard reads back unchanged:
//!
//! ```json
//! { "_persist": { "version": 1 }, "user": {..}, "cart": {..}, "modal": {..}, "search": {..} }
//! ```

use crate::error::Result;
use crate::persist::{MemoryStorage, PersistStorage};
use crate::product::ProductId;
use crate::{State, StateStore};
use futures_signals::signal::{Signal, SignalExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_PERSIST_KEY: &str = "root";
pub const PERSIST_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
}

impl AuthState {
    pub fn login(self, user: UserProfile, token: Option<String>) -> Self {
        Self {
            user: Some(user),
            token,
        }
    }

    pub fn logout(self) -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub title: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl CartState {
    /// Adding a product already in the cart raises its quantity.
    pub fn add_item(mut self, item: CartItem) -> Self {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
        self
    }

    pub fn remove_item(mut self, product_id: &ProductId) -> Self {
        self.items.retain(|item| &item.product_id != product_id);
        self
    }

    /// A quantity of zero removes the item.
    pub fn set_quantity(mut self, product_id: &ProductId, quantity: u32) -> Self {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
        {
            item.quantity = quantity;
        }
        self
    }

    pub fn clear(self) -> Self {
        Self::default()
    }

    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalState {
    pub open: Option<String>,
}

impl ModalState {
    pub fn open(self, name: impl Into<String>) -> Self {
        Self {
            open: Some(name.into()),
        }
    }

    pub fn close(self) -> Self {
        Self { open: None }
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.open.as_deref() == Some(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchState {
    pub search: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub user: AuthState,
    pub cart: CartState,
    pub modal: ModalState,
    pub search: SearchState,
}

impl State for AppState {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PersistMeta {
    version: u32,
}

#[derive(Serialize)]
struct PersistedRootRef<'a> {
    #[serde(rename = "_persist")]
    meta: PersistMeta,
    #[serde(flatten)]
    state: &'a AppState,
}

#[derive(Deserialize)]
struct PersistedRoot {
    #[serde(rename = "_persist", default)]
    meta: Option<PersistMeta>,
    #[serde(flatten)]
    state: AppState,
}

pub fn dehydrate(state: &AppState) -> Result<String> {
    let root = PersistedRootRef {
        meta: PersistMeta {
            version: PERSIST_VERSION,
        },
        state,
    };
    Ok(serde_json::to_string(&root)?)
}

/// Reads the persisted root. Anything unreadable yields the default state;
/// startup never fails because of storage.
pub fn rehydrate(storage: &dyn PersistStorage, storage_key: &str) -> AppState {
    let blob = match storage.load(storage_key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return AppState::default(),
        Err(e) => {
            warn!(key = storage_key, error = %e, "failed to read persisted state");
            return AppState::default();
        }
    };

    match serde_json::from_str::<PersistedRoot>(&blob) {
        Ok(PersistedRoot {
            meta: Some(meta), ..
        }) if meta.version != PERSIST_VERSION => {
            warn!(
                key = storage_key,
                found = meta.version,
                expected = PERSIST_VERSION,
                "persisted state version mismatch, starting fresh"
            );
            AppState::default()
        }
        Ok(root) => {
            debug!(key = storage_key, "rehydrated persisted state");
            root.state
        }
        Err(e) => {
            warn!(key = storage_key, error = %e, "persisted state is corrupt, starting fresh");
            AppState::default()
        }
    }
}

pub struct AppStateStore {
    store: Arc<StateStore<AppState>>,
    storage_key: String,
}

impl AppStateStore {
    /// Rehydrates from `storage` under `persist:<key>` and persists every
    /// subsequent change there.
    pub fn open(storage: Arc<dyn PersistStorage>, key: &str) -> Self {
        let storage_key = format!("persist:{key}");
        let initial = rehydrate(storage.as_ref(), &storage_key);

        let writer_key = storage_key.clone();
        let store = StateStore::observed(initial, move |state: &AppState| {
            let written = dehydrate(state).and_then(|blob| storage.save(&writer_key, &blob));
            if let Err(e) = written {
                warn!(key = %writer_key, error = %e, "failed to persist state");
            }
        });

        Self {
            store: Arc::new(store),
            storage_key,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStorage::new()), DEFAULT_PERSIST_KEY)
    }

    pub fn store(&self) -> Arc<StateStore<AppState>> {
        self.store.clone()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// The search slice as a signal, emitting only when the text changes.
    pub fn search_signal(&self) -> impl Signal<Item = String> + Send + 'static {
        self.store
            .to_signal()
            .map(|state| state.search.search)
            .dedupe_cloned()
    }

    pub fn set_search(&self, search: impl Into<String>) -> Result<()> {
        let search = search.into();
        self.store.set_state(move |state| AppState {
            search: SearchState { search },
            ..state
        })
    }

    /// Edits the search text in place, for keystroke-at-a-time input.
    pub fn update_search<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&str) -> String + Send + 'static,
    {
        self.store.set_state(move |state| AppState {
            search: SearchState {
                search: edit(&state.search.search),
            },
            ..state
        })
    }

    pub fn clear_search(&self) -> Result<()> {
        self.set_search(String::new())
    }

    pub fn login(&self, user: UserProfile, token: Option<String>) -> Result<()> {
        self.store.set_state(move |state| AppState {
            user: state.user.login(user, token),
            ..state
        })
    }

    pub fn logout(&self) -> Result<()> {
        self.store.set_state(|state| AppState {
            user: state.user.logout(),
            ..state
        })
    }

    pub fn add_to_cart(&self, item: CartItem) -> Result<()> {
        self.store.set_state(move |state| AppState {
            cart: state.cart.add_item(item),
            ..state
        })
    }

    pub fn remove_from_cart(&self, product_id: ProductId) -> Result<()> {
        self.store.set_state(move |state| AppState {
            cart: state.cart.remove_item(&product_id),
            ..state
        })
    }

    pub fn set_cart_quantity(&self, product_id: ProductId, quantity: u32) -> Result<()> {
        self.store.set_state(move |state| AppState {
            cart: state.cart.set_quantity(&product_id, quantity),
            ..state
        })
    }

    pub fn clear_cart(&self) -> Result<()> {
        self.store.set_state(|state| AppState {
            cart: state.cart.clear(),
            ..state
        })
    }

    pub fn open_modal(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.store.set_state(move |state| AppState {
            modal: state.modal.open(name),
            ..state
        })
    }

    pub fn close_modal(&self) -> Result<()> {
        self.store.set_state(|state| AppState {
            modal: state.modal.close(),
            ..state
        })
    }

    /// Resets every slice; the empty root is persisted like any other change.
    pub fn purge(&self) -> Result<()> {
        self.store.set_state(|_| AppState::default())
    }
}
