mod canvas;
use self::canvas::{box_char, text_width, BufferCanvas, DOWN, LEFT, RIGHT, UP};
use crate::grid::Grid;
use crate::theme::TICK_LABEL_STYLE;
use crate::util::{floor_u16, to_f64, to_u16};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use std::collections::BTreeMap;

/// Number of columns per day cell.  With one line per cell this keeps the
/// cells roughly square in most terminal fonts.
pub const CELL_WIDTH: u16 = 2;

/// Lines between cells, drawn around the cells of a mesh.  The gutter
/// between cells is one terminal cell wide, so every `width` above 0 draws
/// the same line.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edges {
    pub width: u16,
    pub color: Color,
}

/// A layer of colored cells.  Masked cells are left undrawn.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mesh {
    colors: Grid<Color>,
    edges: Option<Edges>,
    extra: BTreeMap<String, String>,
}

impl Mesh {
    pub fn new(colors: Grid<Color>) -> Mesh {
        Mesh {
            colors,
            edges: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_edges(mut self, edges: Edges) -> Mesh {
        self.edges = Some(edges);
        self
    }

    /// Attach options this crate does not interpret, for callers that
    /// decorate meshes themselves
    pub fn with_extra(mut self, extra: BTreeMap<String, String>) -> Mesh {
        self.extra = extra;
        self
    }

    pub fn colors(&self) -> &Grid<Color> {
        &self.colors
    }

    pub fn edges(&self) -> Option<Edges> {
        self.edges
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// A labelled position along an axis, in cell units
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

impl Tick {
    pub fn new<S: Into<String>>(position: f64, label: S) -> Tick {
        Tick {
            position,
            label: label.into(),
        }
    }
}

/// A closed outline through grid lattice points `(x, y)`, with y growing
/// downwards.  Only horizontal and vertical sides are drawn.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<(usize, usize)>,
    pub color: Color,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Label {
    pub text: String,
    pub style: Style,
}

impl Label {
    pub fn new<S: Into<String>>(text: S, style: Style) -> Label {
        Label {
            text: text.into(),
            style,
        }
    }
}

/// A one-cell-wide strip of colors, top first, stretched over the full height
/// of the axes
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    pub colors: Vec<Color>,
}

/// A single plot panel.  Drawing operations only record what to draw; the
/// panel is laid out and painted when rendered as a [`Widget`].
///
/// ```text
///  year label │ cells (xlim columns × ylim rows) │ y tick labels
///             │ x tick labels                    │
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Axes {
    meshes: Vec<Mesh>,
    polygons: Vec<Polygon>,
    image: Option<Image>,
    xlim: u16,
    ylim: u16,
    xticks: Vec<Tick>,
    yticks: Vec<Tick>,
    ylabel: Option<Label>,
}

impl Axes {
    pub fn new() -> Axes {
        Axes::default()
    }

    /// Add a mesh on top of those already drawn, growing the limits to fit
    /// it
    pub fn pcolormesh(&mut self, mesh: Mesh) {
        self.xlim = self.xlim.max(to_u16(mesh.colors.columns()));
        self.ylim = self.ylim.max(to_u16(mesh.colors.rows()));
        self.meshes.push(mesh);
    }

    pub fn imshow(&mut self, image: Image) {
        self.image = Some(image);
    }

    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn set_xlim(&mut self, columns: u16) {
        self.xlim = columns;
    }

    pub fn set_ylim(&mut self, rows: u16) {
        self.ylim = rows;
    }

    pub fn set_xticks(&mut self, ticks: Vec<Tick>) {
        self.xticks = ticks;
    }

    pub fn set_yticks(&mut self, ticks: Vec<Tick>) {
        self.yticks = ticks;
    }

    pub fn set_ylabel(&mut self, label: Label) {
        self.ylabel = Some(label);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn xlim(&self) -> u16 {
        self.xlim
    }

    pub fn ylim(&self) -> u16 {
        self.ylim
    }

    pub fn xticks(&self) -> &[Tick] {
        &self.xticks
    }

    pub fn yticks(&self) -> &[Tick] {
        &self.yticks
    }

    pub fn ylabel(&self) -> Option<&Label> {
        self.ylabel.as_ref()
    }

    /// Width and height the axes need to be drawn in full.  An axes holding
    /// an image has no natural height and reports the room its tick labels
    /// take.
    pub fn size(&self) -> (u16, u16) {
        let layout = self.layout();
        let width = layout
            .left
            .saturating_add(layout.plot_width)
            .saturating_add(self.ytick_width());
        let height = if self.image.is_some() {
            to_u16(self.yticks.len())
        } else {
            layout.plot_height
        };
        (width, height.saturating_add(u16::from(!self.xticks.is_empty())))
    }

    // Gutters between cells exist only when something is drawn in them
    fn gutter(&self) -> u16 {
        let edged = self
            .meshes
            .iter()
            .any(|m| m.edges.is_some_and(|e| e.width > 0));
        u16::from(edged || !self.polygons.is_empty())
    }

    fn layout(&self) -> Layout {
        let gutter = self.gutter();
        let left = self
            .ylabel
            .as_ref()
            .map_or(0, |l| text_width(&l.text).saturating_add(1));
        let plot_width = if self.image.is_some() {
            CELL_WIDTH
        } else {
            self.xlim
                .saturating_mul(CELL_WIDTH + gutter)
                .saturating_add(gutter)
        };
        let plot_height = self.ylim.saturating_mul(1 + gutter).saturating_add(gutter);
        Layout {
            left,
            gutter,
            plot_width,
            plot_height,
        }
    }

    fn ytick_width(&self) -> u16 {
        self.yticks
            .iter()
            .map(|t| text_width(&t.label))
            .max()
            .map_or(0, |w| w.saturating_add(1))
    }

    fn draw_meshes(&self, canvas: &mut BufferCanvas<'_>, layout: &Layout) {
        for mesh in &self.meshes {
            if let Some(edges) = mesh.edges.filter(|e| e.width > 0 && layout.gutter > 0) {
                for (row, column, _) in mesh.colors.iter() {
                    let (x, y) = layout.cell(row, column);
                    canvas.fill(y - 1, x - 1, CELL_WIDTH + 2, 3, edges.color);
                }
            }
            for (row, column, &color) in mesh.colors.iter() {
                let (x, y) = layout.cell(row, column);
                canvas.fill(y, x, CELL_WIDTH, 1, color);
            }
        }
    }

    fn draw_polygons(&self, canvas: &mut BufferCanvas<'_>, layout: &Layout) {
        let mut strokes = BTreeMap::<(u16, u16), (u8, Color)>::new();
        for polygon in &self.polygons {
            let points = polygon
                .vertices
                .iter()
                .map(|&(x, y)| layout.vertex(x, y))
                .collect::<Vec<_>>();
            for (&start, &end) in std::iter::zip(&points, points.iter().cycle().skip(1)) {
                stroke(&mut strokes, start, end, polygon.color);
            }
        }
        for ((x, y), (mask, color)) in strokes {
            if let Some(ch) = box_char(mask) {
                canvas.mvaddch(y, x, ch, color);
            }
        }
    }

    fn draw_image(&self, canvas: &mut BufferCanvas<'_>, layout: &Layout, height: u16) {
        let Some(image) = &self.image else {
            return;
        };
        let len = image.colors.len();
        for y in 0..height {
            let i = usize::from(y) * len / usize::from(height);
            if let Some(&color) = image.colors.get(i) {
                canvas.fill(y, layout.left, CELL_WIDTH, 1, color);
            }
        }
    }

    fn draw_xticks(&self, canvas: &mut BufferCanvas<'_>, layout: &Layout, y: u16) {
        let mut next_free = 0;
        for tick in &self.xticks {
            let center = layout
                .left
                .saturating_add(floor_u16(tick.position * f64::from(CELL_WIDTH + layout.gutter)));
            let width = text_width(&tick.label);
            let start = center.saturating_sub(width / 2);
            // Drop labels that would overwrite the previous one
            if start < next_free {
                continue;
            }
            canvas.mvprint(y, start, &tick.label, TICK_LABEL_STYLE);
            next_free = start.saturating_add(width).saturating_add(1);
        }
    }

    fn draw_yticks(&self, canvas: &mut BufferCanvas<'_>, layout: &Layout, height: u16) {
        let x = layout.left.saturating_add(layout.plot_width).saturating_add(1);
        for tick in &self.yticks {
            let y = match &self.image {
                Some(image) if !image.colors.is_empty() => floor_u16(
                    tick.position * f64::from(height.saturating_sub(1)) / to_f64(image.colors.len()),
                ),
                _ => floor_u16(tick.position * f64::from(1 + layout.gutter)),
            };
            canvas.mvprint(y, x, &tick.label, TICK_LABEL_STYLE);
        }
    }
}

impl Widget for &Axes {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout();
        let xtick_lines = u16::from(!self.xticks.is_empty());
        let plot_height = if self.image.is_some() {
            area.height.saturating_sub(xtick_lines)
        } else {
            layout.plot_height
        };
        tracing::trace!(
            ?area,
            meshes = self.meshes.len(),
            polygons = self.polygons.len(),
            "rendering axes"
        );
        let mut canvas = BufferCanvas::new(area, buf);
        if let Some(label) = &self.ylabel {
            canvas.mvprint(plot_height / 2, 0, &label.text, label.style);
        }
        self.draw_image(&mut canvas, &layout, plot_height);
        self.draw_meshes(&mut canvas, &layout);
        if layout.gutter > 0 {
            self.draw_polygons(&mut canvas, &layout);
        }
        self.draw_xticks(&mut canvas, &layout, plot_height);
        self.draw_yticks(&mut canvas, &layout, plot_height);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Layout {
    /// Columns reserved for the y label
    left: u16,
    /// Columns and lines between adjacent cells and around the outside
    gutter: u16,
    plot_width: u16,
    plot_height: u16,
}

impl Layout {
    // Top-left corner of a cell, as (x, y)
    fn cell(&self, row: usize, column: usize) -> (u16, u16) {
        let x = self
            .left
            .saturating_add(self.gutter)
            .saturating_add(to_u16(column).saturating_mul(CELL_WIDTH + self.gutter));
        let y = self
            .gutter
            .saturating_add(to_u16(row).saturating_mul(1 + self.gutter));
        (x, y)
    }

    // Position of a lattice point between cells, as (x, y)
    fn vertex(&self, x: usize, y: usize) -> (u16, u16) {
        (
            self.left
                .saturating_add(to_u16(x).saturating_mul(CELL_WIDTH + self.gutter)),
            to_u16(y).saturating_mul(1 + self.gutter),
        )
    }
}

fn stroke(
    strokes: &mut BTreeMap<(u16, u16), (u8, Color)>,
    (x0, y0): (u16, u16),
    (x1, y1): (u16, u16),
    color: Color,
) {
    let mut mark = |pos: (u16, u16), bits: u8| {
        let entry = strokes.entry(pos).or_insert((0, color));
        entry.0 |= bits;
        entry.1 = color;
    };
    if y0 == y1 {
        let (a, b) = (x0.min(x1), x0.max(x1));
        if a < b {
            for x in a..=b {
                let left = if x > a { LEFT } else { 0 };
                let right = if x < b { RIGHT } else { 0 };
                mark((x, y0), left | right);
            }
        }
    } else if x0 == x1 {
        let (a, b) = (y0.min(y1), y0.max(y1));
        for y in a..=b {
            let up = if y > a { UP } else { 0 };
            let down = if y < b { DOWN } else { 0 };
            mark((x0, y), up | down);
        }
    }
    // Diagonal sides never occur in month outlines and are not drawn
}
