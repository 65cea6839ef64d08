use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

use crate::models::DHIKR_PRESETS;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    counts: &HashMap<String, i32>,
    focus_idx: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(Span::styled(" Dhikr ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
        .style(theme::surface());

    // Arabic glyphs render wider than their char count; pad by display
    // width so the count column lines up.
    let arabic_col = DHIKR_PRESETS
        .iter()
        .map(|p| UnicodeWidthStr::width(p.arabic))
        .max()
        .unwrap_or(0);

    let items: Vec<ListItem> = DHIKR_PRESETS
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let is_focused = focused && i == focus_idx;
            let count = counts.get(preset.slug).copied().unwrap_or(0);
            let done = count >= preset.target;

            let pad = arabic_col.saturating_sub(UnicodeWidthStr::width(preset.arabic));
            let (status, status_style) = if done {
                (format!("✓ {}/{}", count, preset.target), theme::mint())
            } else {
                (format!("{}/{}", count, preset.target), theme::dim())
            };

            let name_style = if is_focused {
                theme::accent().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            ListItem::new(Line::from(vec![
                Span::styled(if is_focused { " ▸" } else { "  " }, theme::accent()),
                Span::styled(format!("{:<19}", preset.name), name_style),
                Span::styled(format!("{}{}  ", preset.arabic, " ".repeat(pad)), theme::amber()),
                Span::styled(status, status_style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
