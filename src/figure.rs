use crate::axes::{Axes, Label};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Paragraph, Widget},
};

/// Blank lines between stacked axes
const AXES_SPACING: u16 = 1;

/// Columns between the plots and the legend
const LEGEND_GAP: u16 = 2;

/// Lines taken by a title: the title itself and a blank line below it
const TITLE_LINES: u16 = 2;

/// A vertical stack of axes, optionally topped by a title and accompanied by
/// a legend to their right
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Figure {
    suptitle: Option<Label>,
    axes: Vec<Axes>,
    legend: Option<Axes>,
}

impl Figure {
    /// A figure of `rows` empty axes, plus an empty legend axes if `legend`
    /// is true
    pub fn subplots(rows: usize, legend: bool) -> Figure {
        Figure {
            suptitle: None,
            axes: std::iter::repeat_with(Axes::new).take(rows).collect(),
            legend: legend.then(Axes::new),
        }
    }

    pub fn set_suptitle(&mut self, title: Label) {
        self.suptitle = Some(title);
    }

    pub fn suptitle(&self) -> Option<&Label> {
        self.suptitle.as_ref()
    }

    /// The plot axes, top to bottom, without the legend
    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut [Axes] {
        &mut self.axes
    }

    pub fn legend(&self) -> Option<&Axes> {
        self.legend.as_ref()
    }

    pub fn legend_mut(&mut self) -> Option<&mut Axes> {
        self.legend.as_mut()
    }

    /// Width and height the figure needs to be drawn in full
    pub fn size(&self) -> (u16, u16) {
        let mut width = self.plots_width();
        if let Some(legend) = &self.legend {
            width = width
                .saturating_add(LEGEND_GAP)
                .saturating_add(legend.size().0);
        }
        if let Some(title) = &self.suptitle {
            let title_width = Line::raw(title.text.as_str()).width();
            width = width.max(u16::try_from(title_width).unwrap_or(u16::MAX));
        }
        let mut height = self.plots_height(0);
        if let Some(legend) = &self.legend {
            height = height.max(legend.size().1);
        }
        (width, height.saturating_add(self.title_lines()))
    }

    /// Render the figure with its first `first` axes scrolled out of view.
    /// The title and legend stay in place.
    pub fn render_from(&self, first: usize, area: Rect, buf: &mut Buffer) {
        let width = self.size().0.min(area.width);
        if let Some(title) = &self.suptitle {
            Paragraph::new(Line::styled(title.text.as_str(), title.style))
                .alignment(Alignment::Center)
                .render(Rect::new(area.x, area.y, width, area.height.min(1)), buf);
        }
        let top = area.y.saturating_add(self.title_lines());
        let mut y = top;
        for ax in self.axes.iter().skip(first) {
            if y >= area.bottom() {
                break;
            }
            let (w, h) = ax.size();
            ax.render(
                Rect::new(area.x, y, w.min(area.width), h.min(area.bottom() - y)),
                buf,
            );
            y = y.saturating_add(h).saturating_add(AXES_SPACING);
        }
        if let Some(legend) = &self.legend {
            let x = area
                .x
                .saturating_add(self.plots_width())
                .saturating_add(LEGEND_GAP);
            if x < area.right() && top < area.bottom() {
                let height = self
                    .plots_height(first)
                    .max(legend.size().1)
                    .min(area.bottom() - top);
                legend.render(
                    Rect::new(x, top, legend.size().0.min(area.right() - x), height),
                    buf,
                );
            }
        }
    }

    fn title_lines(&self) -> u16 {
        if self.suptitle.is_some() {
            TITLE_LINES
        } else {
            0
        }
    }

    fn plots_width(&self) -> u16 {
        self.axes.iter().map(|ax| ax.size().0).max().unwrap_or(0)
    }

    // Height of the axes from `first` onwards, stacked
    fn plots_height(&self, first: usize) -> u16 {
        let shown = self.axes.iter().skip(first);
        let count = u16::try_from(shown.len()).unwrap_or(u16::MAX);
        shown
            .map(|ax| ax.size().1)
            .fold(0u16, u16::saturating_add)
            .saturating_add(count.saturating_sub(1).saturating_mul(AXES_SPACING))
    }
}

impl Widget for &Figure {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_from(0, area, buf);
    }
}
