use crate::app::app_view::app_view;
use crate::input::input_handler::{start_input_listener, start_ticker, InputHandler};
use futures::StreamExt;
use futures_signals::map_ref;
use futures_signals::signal::SignalExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use shopdash::{combine_state_flow, render_product_list, AppStateStore, ProductListModel, ToastModel};
use std::io::Stdout;
use std::sync::Arc;

pub struct AppModel {
    list_model: ProductListModel,
    app_store: Arc<AppStateStore>,
    toasts: Arc<ToastModel>,
    input_handler: Arc<InputHandler>,
}

impl AppModel {
    pub fn new(
        list_model: ProductListModel,
        app_store: Arc<AppStateStore>,
        toasts: Arc<ToastModel>,
    ) -> Self {
        Self {
            list_model,
            app_store,
            toasts,
            input_handler: Arc::new(InputHandler::new()),
        }
    }

    pub async fn run(&self, mut terminal: Terminal<CrosstermBackend<Stdout>>) {
        self.list_model.mount(self.app_store.search_signal());
        start_input_listener(
            self.list_model.clone(),
            self.app_store.clone(),
            self.input_handler.clone(),
        );
        start_ticker(self.list_model.clone(), self.input_handler.clone());

        let app_state = combine_state_flow! {
            self.list_model.store().to_signal(),
            self.app_store.store().to_signal(),
            self.toasts.store().to_signal(),
            self.input_handler.store().to_signal(),
        };

        app_state
            .stop_if(|(_, _, _, input_state)| input_state.exit)
            .to_stream()
            .for_each(|(list_state, app_state, toast_state, input_state)| {
                let screen = render_product_list(&list_state);
                let result = terminal.draw(|frame| {
                    app_view(frame, &screen, &app_state, &toast_state, &input_state);
                });
                if let Err(e) = result {
                    tracing::error!(error = %e, "failed to draw the terminal");
                }
                async move {}
            })
            .await;

        self.list_model.unmount();
    }
}
