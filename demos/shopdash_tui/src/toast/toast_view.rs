use ratatui::prelude::{Color, Line, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use shopdash::toast::ToastState;

pub fn toast_view<'a>(toast_state: &ToastState) -> Paragraph<'a> {
    let lines: Vec<Line> = toast_state
        .toasts
        .iter()
        .map(|toast| {
            let color = if toast.notification.is_error() {
                Color::Red
            } else {
                Color::Green
            };
            Line::styled(toast.notification.message().to_string(), Style::default().fg(color))
        })
        .collect();

    Paragraph::new(lines).block(Block::default().title("Notifications").borders(Borders::ALL))
}
