use crate::input::input_state::InputState;
use crossterm::event;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use shopdash::{AppStateStore, ProductListModel, StateStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub struct InputHandler {
    store: Arc<StateStore<InputState>>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            store: Arc::new(StateStore::new(InputState::default())),
        }
    }

    pub fn store(&self) -> Arc<StateStore<InputState>> {
        self.store.clone()
    }

    pub fn send_draw_event(&self) {
        self.update(|state| state.send_draw_event());
    }

    pub fn request_exit(&self) {
        self.update(|state| state.set_exit());
    }

    pub fn select_up(&self) {
        self.update(|state| state.select_up());
    }

    pub fn select_down(&self, len: usize) {
        self.update(move |state| state.select_down(len));
    }

    pub fn reset_selection(&self) {
        self.update(|state| state.reset_selection());
    }

    pub fn tick(&self) {
        self.update(|state| state.on_tick());
    }

    fn update<F>(&self, reducer: F)
    where
        F: FnOnce(InputState) -> InputState + Send + 'static,
    {
        if let Err(e) = self.store.set_state(reducer) {
            warn!(error = %e, "input store closed");
        }
    }
}

/// Polls the terminal until exit is requested, forwarding key presses.
pub fn start_input_listener(
    list_model: ProductListModel,
    app_store: Arc<AppStateStore>,
    input_handler: Arc<InputHandler>,
) {
    let timeout = Duration::from_millis(10);
    let input_store = input_handler.store();
    tokio::spawn(async move {
        loop {
            match input_store.await_state().await {
                Err(_) => {
                    error!("Failed to get input state");
                    break;
                }
                Ok(state) if state.is_exit() => break,
                Ok(_) => {}
            }
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(event) = event::read() {
                    handle_event(event, &list_model, &app_store, &input_handler);
                }
            }
        }
    });
}

/// Spins the loading throbber while a fetch is in flight.
pub fn start_ticker(list_model: ProductListModel, input_handler: Arc<InputHandler>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(120));
        loop {
            interval.tick().await;
            if input_handler.store().get_state().is_exit() {
                break;
            }
            if list_model.store().get_state().is_loading {
                input_handler.tick();
            }
        }
    });
}

fn handle_event(
    event: Event,
    list_model: &ProductListModel,
    app_store: &AppStateStore,
    input_handler: &InputHandler,
) {
    match event {
        Event::Resize(_, _) => input_handler.send_draw_event(),
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            handle_key(key, list_model, app_store, input_handler)
        }
        _ => {}
    }
}

fn handle_key(
    key: KeyEvent,
    list_model: &ProductListModel,
    app_store: &AppStateStore,
    input_handler: &InputHandler,
) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        input_handler.request_exit();
        return;
    }

    let list_state = list_model.store().get_state();

    // An open confirmation captures every key.
    if list_state.pending_delete.is_some() {
        let answered = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => list_model.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => list_model.cancel_delete(),
            _ => Ok(()),
        };
        if let Err(e) = answered {
            warn!(error = %e, "delete confirmation dropped");
        }
        return;
    }

    let result = match key.code {
        KeyCode::Esc => {
            input_handler.request_exit();
            Ok(())
        }
        KeyCode::F(5) => list_model.refresh(),
        KeyCode::Up => {
            input_handler.select_up();
            Ok(())
        }
        KeyCode::Down => {
            input_handler.select_down(list_state.filtered.len());
            Ok(())
        }
        KeyCode::Delete => {
            let selected = input_handler.store().get_state().selected;
            match list_state.filtered.get(selected) {
                Some(product) => {
                    debug!(product_id = %product.id, "delete requested");
                    list_model.request_delete(product.id.clone())
                }
                None => Ok(()),
            }
        }
        KeyCode::Backspace => {
            input_handler.reset_selection();
            app_store.update_search(|search| {
                let mut search = search.to_string();
                search.pop();
                search
            })
        }
        KeyCode::Char(c) => {
            input_handler.reset_selection();
            app_store.update_search(move |search| format!("{search}{c}"))
        }
        _ => Ok(()),
    };
    if let Err(e) = result {
        warn!(error = %e, key = ?key.code, "key press dropped");
    }
}
