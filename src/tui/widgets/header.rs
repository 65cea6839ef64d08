use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, location_name: &str, hijri_str: &str) {
    let gregorian = Local::now().format("%A, %b %d, %Y").to_string();

    let title = Line::from(vec![
        Span::styled("  قيام  ", theme::accent().add_modifier(Modifier::BOLD)),
        Span::styled("qiyam", theme::accent()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(location_name, theme::mint()),
    ]);

    let dates = Line::from(vec![
        Span::styled(hijri_str, theme::amber()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(gregorian, theme::dim()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent())
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title, Line::from(""), dates])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
