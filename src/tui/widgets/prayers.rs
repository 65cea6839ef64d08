use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::models::DailyLog;
use crate::schedule::ScheduleState;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    day: Option<&DailyLog>,
    schedule: Option<&ScheduleState>,
    focus_idx: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(Span::styled(" Prayers ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
        .style(theme::surface());

    let Some(day) = day else {
        let empty = List::new(vec![ListItem::new(Line::from(Span::styled(
            "  No data",
            theme::dim(),
        )))])
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let items: Vec<ListItem> = day
        .prayers
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let is_focused = focused && i == focus_idx;

            let time_str = record
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string());

            let (icon, icon_style) = if record.completed {
                ("✓", theme::mint())
            } else {
                ("○", theme::dim())
            };

            let tag = match schedule {
                Some(s) if s.current == record.name => ("current", theme::accent()),
                Some(s) if s.next == record.name => ("next", theme::amber()),
                _ => ("", theme::dim()),
            };

            let name_style = if is_focused {
                theme::accent().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            ListItem::new(Line::from(vec![
                Span::styled(if is_focused { " ▸" } else { "  " }, theme::accent()),
                Span::styled(format!("{:<9}", record.name.display_name()), name_style),
                Span::styled(format!("{:<7}", time_str), theme::dim()),
                Span::styled(icon, icon_style),
                Span::styled(format!("  {}", tag.0), tag.1),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
