use ratatui::style::{Color, Modifier, Style};

pub const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub const TICK_LABEL_STYLE: Style = Style::new();

pub const YEAR_LABEL_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

pub const TITLE_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

/// Background of days without data ("whitesmoke")
pub const FILL_COLOR: Color = Color::Rgb(245, 245, 245);

/// Month outlines; `Reset` leaves them in the terminal's own foreground
pub const BORDER_COLOR: Color = Color::Reset;
