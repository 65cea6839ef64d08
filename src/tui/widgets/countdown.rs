use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::schedule::{ScheduleState, Timetable};
use crate::tui::theme;
use crate::utils::format::{format_minutes, format_time};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    schedule: Option<&ScheduleState>,
    timetable: Option<&Timetable>,
) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (Some(state), Some(timetable)) = (schedule, timetable) else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("  No data", theme::dim()))),
            inner,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // name + time
            Constraint::Min(0),    // big countdown
            Constraint::Length(1), // current prayer
        ])
        .split(inner);

    let headline = Line::from(vec![
        Span::styled(
            format!("  {}", state.next.display_name().to_uppercase()),
            theme::accent().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  at {}", format_time(timetable.time_of(state.next))),
            theme::dim(),
        ),
    ]);
    frame.render_widget(Paragraph::new(headline), chunks[0]);

    let big = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(theme::amber())
        .lines(vec![Line::from(format_minutes(state.minutes_remaining))])
        .build();
    frame.render_widget(big, chunks[1]);

    let footer = Line::from(vec![
        Span::styled("  now: ", theme::dim()),
        Span::styled(state.current.display_name(), theme::mint()),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}
