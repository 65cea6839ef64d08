use ratatui::style::{Color, Modifier, Style};

// Deep indigo night with gold and mint accents.
pub const BG: Color = Color::Rgb(16, 18, 34);
pub const SURFACE: Color = Color::Rgb(24, 27, 48);
pub const BORDER: Color = Color::Rgb(46, 52, 88);
pub const TEXT: Color = Color::Rgb(214, 218, 238);
pub const TEXT_DIM: Color = Color::Rgb(110, 116, 152);
pub const GOLD: Color = Color::Rgb(255, 215, 0);
pub const MINT: Color = Color::Rgb(152, 251, 152);
pub const AMBER: Color = Color::Rgb(224, 164, 78);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn accent() -> Style {
    Style::default().fg(GOLD)
}

pub fn mint() -> Style {
    Style::default().fg(MINT)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(GOLD)
    } else {
        Style::default().fg(BORDER)
    }
}
