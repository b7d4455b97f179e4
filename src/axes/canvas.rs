use ratatui::{
    buffer::{Buffer, Cell},
    layout::Rect,
    style::{Color, Style},
    text::Line,
};

pub(crate) const ACS_HLINE: char = '─';
pub(crate) const ACS_VLINE: char = '│';

/// Bits recording which directions a stroke leaves a terminal cell in
pub(crate) const UP: u8 = 1;
pub(crate) const DOWN: u8 = 2;
pub(crate) const LEFT: u8 = 4;
pub(crate) const RIGHT: u8 = 8;

/// The box-drawing character joining the given stroke directions
pub(crate) fn box_char(mask: u8) -> Option<char> {
    let ch = match mask {
        0 => return None,
        m if m & (UP | DOWN) == 0 => ACS_HLINE,
        m if m & (LEFT | RIGHT) == 0 => ACS_VLINE,
        m if m == DOWN | RIGHT => '┌',
        m if m == DOWN | LEFT => '┐',
        m if m == UP | RIGHT => '└',
        m if m == UP | LEFT => '┘',
        m if m == LEFT | RIGHT | DOWN => '┬',
        m if m == LEFT | RIGHT | UP => '┴',
        m if m == UP | DOWN | RIGHT => '├',
        m if m == UP | DOWN | LEFT => '┤',
        _ => '┼',
    };
    Some(ch)
}

/// Display width of `s` in terminal columns
pub(crate) fn text_width(s: &str) -> u16 {
    u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX)
}

/// Clipped drawing onto the part of a buffer covered by `area`.  All
/// coordinates are relative to the top-left corner of `area`.
#[derive(Debug)]
pub(crate) struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    pub(crate) fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        // Never reach outside the buffer, lest indexing panic
        let area = area.intersection(buf.area);
        Self { area, buf }
    }

    /// Paint a `width`×`height` block with background `color`
    pub(crate) fn fill(&mut self, y: u16, x: u16, width: u16, height: u16, color: Color) {
        for dy in 0..height {
            for dx in 0..width {
                if let Some(cell) = self.cell_mut(y.saturating_add(dy), x.saturating_add(dx)) {
                    cell.set_symbol(" ").set_bg(color);
                }
            }
        }
    }

    /// Put `ch` at the given position in foreground `color`, leaving the
    /// background untouched
    pub(crate) fn mvaddch(&mut self, y: u16, x: u16, ch: char, color: Color) {
        if let Some(cell) = self.cell_mut(y, x) {
            cell.set_char(ch).set_fg(color);
        }
    }

    pub(crate) fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            self.buf.set_stringn(
                x + self.area.x,
                y + self.area.y,
                s,
                usize::from(self.area.width - x),
                style,
            );
        }
    }

    fn cell_mut(&mut self, y: u16, x: u16) -> Option<&mut Cell> {
        if y < self.area.height && x < self.area.width {
            self.buf.cell_mut((x + self.area.x, y + self.area.y))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_char() {
        assert_eq!(box_char(0), None);
        assert_eq!(box_char(LEFT), Some('─'));
        assert_eq!(box_char(LEFT | RIGHT), Some('─'));
        assert_eq!(box_char(UP | DOWN), Some('│'));
        assert_eq!(box_char(DOWN | RIGHT), Some('┌'));
        assert_eq!(box_char(UP | LEFT), Some('┘'));
        assert_eq!(box_char(LEFT | RIGHT | DOWN), Some('┬'));
        assert_eq!(box_char(UP | DOWN | LEFT | RIGHT), Some('┼'));
    }

    #[test]
    fn test_clipping() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        let mut canvas = BufferCanvas::new(Rect::new(1, 0, 10, 10), &mut buf);
        canvas.mvprint(0, 1, "abcdef", Style::new());
        canvas.mvaddch(1, 0, '│', Color::Red);
        canvas.mvaddch(5, 0, '│', Color::Red);
        canvas.fill(1, 2, 5, 5, Color::Blue);
        let mut expected = Buffer::with_lines(["  ab", " │  "]);
        expected.set_style(Rect::new(1, 1, 1, 1), Style::new().fg(Color::Red));
        expected.set_style(Rect::new(3, 1, 1, 1), Style::new().bg(Color::Blue));
        assert_eq!(buf, expected);
    }
}
