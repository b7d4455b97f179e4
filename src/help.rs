use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// The commands of the plot viewer
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Action {
    ScrollDown,
    ScrollUp,
    ToggleBorders,
    ToggleLegend,
    Help,
    Quit,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::ScrollDown,
        Action::ScrollUp,
        Action::ToggleBorders,
        Action::ToggleLegend,
        Action::Help,
        Action::Quit,
    ];

    pub(crate) fn for_key(key: KeyCode) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.keys().contains(&key))
    }

    fn keys(self) -> &'static [KeyCode] {
        match self {
            Action::ScrollDown => &[KeyCode::Char('j'), KeyCode::Down],
            Action::ScrollUp => &[KeyCode::Char('k'), KeyCode::Up],
            Action::ToggleBorders => &[KeyCode::Char('b')],
            Action::ToggleLegend => &[KeyCode::Char('L')],
            Action::Help => &[KeyCode::Char('?')],
            Action::Quit => &[KeyCode::Char('q'), KeyCode::Esc],
        }
    }

    fn description(self) -> &'static str {
        match self {
            Action::ScrollDown => "Scroll down one year",
            Action::ScrollUp => "Scroll up one year",
            Action::ToggleBorders => "Toggle month borders",
            Action::ToggleLegend => "Toggle legend",
            Action::Help => "Show this help",
            Action::Quit => "Quit",
        }
    }

    fn help_line(self) -> String {
        let keys = self
            .keys()
            .iter()
            .map(|&key| match key {
                KeyCode::Char(c) => c.to_string(),
                other => other.to_string().to_uppercase(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{keys:16}{}", self.description())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = Action::ALL
            .into_iter()
            .map(|a| Line::raw(a.help_line()))
            .chain([Line::raw(""), Line::raw("Press the Any Key to dismiss.")])
            .collect::<Vec<_>>();
        let text = Text::from(lines);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        // Leave a blank column on either side so the box doesn't butt up
        // against whatever is drawn underneath
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        };
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        para.render(help_area, buf);
    }
}
