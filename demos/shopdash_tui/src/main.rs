use crate::app::app_model::AppModel;
use crate::tracing_setup::tracing_init;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use shopdash::persist::JsonFileStorage;
use shopdash::{AppStateStore, DashboardConfig, HttpProductApi, ProductListModel, ToastModel};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;

mod app;
mod input;
mod product;
mod toast;

mod tracing_setup;

const CONFIG_FILE: &str = "shopdash.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = DashboardConfig::load(Some(&config_path))?;
    tracing_init(&config.data_dir)?;
    tracing::info!(api = %config.api_base_url, "starting dashboard");

    let storage = Arc::new(JsonFileStorage::new(config.data_dir.clone())?);
    let app_store = Arc::new(AppStateStore::open(storage, &config.persist_key));

    // A signed-in session's token wins over the configured one.
    let api = match app_store.store().get_state().user.token {
        Some(token) => HttpProductApi::from_config(&config).with_bearer_token(token),
        None => HttpProductApi::from_config(&config),
    };
    let toasts = Arc::new(ToastModel::new());
    let list_model = ProductListModel::new(Arc::new(api), toasts.clone());

    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let app = AppModel::new(list_model, app_store, toasts);
    app.run(terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    tracing::info!("dashboard closed");
    Ok(())
}
