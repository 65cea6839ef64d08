use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled("  [↑↓] move ", theme::dim()),
        Span::styled(" [Enter] toggle ", theme::dim()),
        Span::styled(" [Tab] section ", theme::dim()),
        Span::styled(" [d] dhikr +1 ", theme::dim()),
        Span::styled(" [s] stats ", theme::dim()),
        Span::styled(" [?] help ", theme::dim()),
        Span::styled(" [Esc] quit", theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(hints), area);
}
