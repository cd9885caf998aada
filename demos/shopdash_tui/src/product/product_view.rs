use crate::input::input_state::InputState;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::prelude::{Color, Line, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use shopdash::render::{ConfirmPrompt, ProductCard, ProductListBody, LOADING_LABEL, NO_PRODUCT_LABEL};
use shopdash::ProductListScreen;

pub fn search_view<'a>(search: &str) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![search.to_string().into(), "▏".dark_gray()]))
        .block(Block::default().title("Search").borders(Borders::ALL))
}

pub fn product_list_view(
    frame: &mut Frame,
    area: Rect,
    screen: &ProductListScreen,
    input_state: &InputState,
) {
    let ProductListScreen::Ready {
        heading,
        bulk_delete_label,
        create_label,
        create_route,
        body,
        confirm,
    } = screen
    else {
        let throbber = throbber_widgets_tui::Throbber::default()
            .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
            .use_type(throbber_widgets_tui::WhichUse::Spin)
            .to_symbol_span(&input_state.throbber_state);
        let loading = Paragraph::new(Line::from(vec![throbber, format!(" {LOADING_LABEL}").into()]))
            .block(Block::default().borders(Borders::ALL))
            .centered();
        frame.render_widget(loading, area);
        return;
    };

    let title = Line::from(vec![
        format!(" {heading} ").bold(),
        format!("[{bulk_delete_label}] ").dark_gray(),
    ]);
    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(format!(" {create_label} {create_route} ")).right_aligned())
        .borders(Borders::ALL);

    match body {
        ProductListBody::NoProductFound => {
            let empty = Paragraph::new(NO_PRODUCT_LABEL.yellow()).block(block).centered();
            frame.render_widget(empty, area);
        }
        ProductListBody::Cards(cards) => {
            let items: Vec<ListItem> = cards.iter().map(card_item).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("> ");
            let selected = input_state.selected.min(cards.len().saturating_sub(1));
            let mut list_state = ListState::default().with_selected(Some(selected));
            frame.render_stateful_widget(list, area, &mut list_state);
        }
    }

    if let Some(prompt) = confirm {
        confirm_view(frame, area, prompt);
    }
}

fn card_item<'a>(card: &ProductCard) -> ListItem<'a> {
    let image = match &card.image_url {
        Some(url) => Span::from(format!("  {url}")).dark_gray(),
        None => Span::from("  (no image)").dark_gray(),
    };
    ListItem::new(vec![
        Line::from(card.title.clone().bold()),
        Line::from(vec![
            card.price_label.clone().green(),
            "  ".into(),
            card.quantity_label.clone().into(),
            "  ".into(),
            card.edit_route.clone().cyan(),
        ]),
        Line::from(image),
    ])
}

fn confirm_view(frame: &mut Frame, area: Rect, prompt: &ConfirmPrompt) {
    let [popup] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(popup);

    let text = vec![
        Line::from(prompt.message),
        Line::from(vec!["[y] ".red().bold(), "delete  ".into(), "[n] ".cyan().bold(), "keep".into()]),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text)
            .block(
                Block::default()
                    .title(format!(" Delete {} ", prompt.product_id))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .wrap(Wrap { trim: true })
            .centered(),
        popup,
    );
}
