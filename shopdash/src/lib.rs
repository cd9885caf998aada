mod async_state;
mod execution_result;
mod state_store;
pub mod macros;

pub mod api;
pub mod app_store;
pub mod config;
pub mod error;
pub mod filter;
pub mod persist;
pub mod product;
pub mod product_list;
pub mod render;
pub mod toast;

pub use async_state::*;
pub use execution_result::*;
pub use state_store::*;

pub use api::{DeleteReply, HttpProductApi, ProductApi};
pub use app_store::{AppState, AppStateStore};
pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use filter::filter_products;
pub use product::{Product, ProductId, ProductImage};
pub use product_list::{ProductListModel, ProductListState};
pub use render::{render_product_list, ProductListScreen};
pub use toast::{Notification, Notifier, ToastModel};

/// Marker for values that can live inside a [`StateStore`].
pub trait State: Clone + Send + Sync + 'static {}
