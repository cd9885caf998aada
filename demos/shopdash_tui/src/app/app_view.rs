use crate::input::input_state::InputState;
use crate::product::product_view::{product_list_view, search_view};
use crate::toast::toast_view::toast_view;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use shopdash::toast::ToastState;
use shopdash::{AppState, ProductListScreen};

pub fn app_view(
    frame: &mut Frame,
    screen: &ProductListScreen,
    app_state: &AppState,
    toast_state: &ToastState,
    input_state: &InputState,
) {
    let [search_area, list_area, toast_area, controls_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(4),
        Constraint::Length(4),
    ])
    .areas(frame.area());

    frame.render_widget(search_view(&app_state.search.search), search_area);
    product_list_view(frame, list_area, screen, input_state);
    frame.render_widget(toast_view(toast_state), toast_area);

    let user = match &app_state.user.user {
        Some(user) => Line::from(vec!["Signed in as ".into(), user.name.clone().bold()]),
        None => Line::from("Not signed in".dark_gray()),
    };
    let list_instructions = Line::from(vec![
        "Type".cyan().bold(),
        " to search, ".into(),
        "<Up>/<Down>".cyan().bold(),
        " select, ".into(),
        "<Del>".cyan().bold(),
        " delete, ".into(),
        "<F5>".cyan().bold(),
        " refresh, ".into(),
        "<Esc>".red().bold(),
        " quit".into(),
    ]);

    frame.render_widget(
        Paragraph::new(Text::from(vec![list_instructions, user]))
            .block(Block::default().title("Controls").borders(Borders::ALL))
            .alignment(Alignment::Center),
        controls_area,
    );
}
