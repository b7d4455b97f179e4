use crate::axes::{Axes, Edges, Image, Label, Mesh, Polygon, Tick};
use crate::colormap::{ColorScale, Colormap};
use crate::error::PlotError;
use crate::figure::Figure;
use crate::grid::{MonthSpan, YearGrid, DAYS_IN_WEEK};
use crate::series::{resample, Aggregation, DailySeries, TimeSeries};
use crate::theme::{BORDER_COLOR, FILL_COLOR, TITLE_STYLE, YEAR_LABEL_STYLE};
use crate::ticks::TickSelection;
use crate::util::{to_f64, to_u16};
use ratatui::style::{Color, Style};
use std::collections::BTreeMap;
use std::iter::{once, zip};
use time::Month;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

const DAY_ABBRS: [&str; DAYS_IN_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MONTH_ABBRS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How to draw a single year
#[derive(Clone, Debug, PartialEq)]
pub struct YearPlotOptions {
    /// Method for collapsing each day's entries into one value; `None` means
    /// the series is already sampled by day
    pub how: Option<Aggregation>,
    /// Value mapped to the low end of the color map; defaults to the
    /// smallest daily value
    pub vmin: Option<f64>,
    /// Value mapped to the high end of the color map; defaults to the
    /// largest daily value
    pub vmax: Option<f64>,
    pub cmap: Colormap,
    /// Background of days without data
    pub fill_color: Color,
    /// Width of the lines between cells; 0 draws the cells edge to edge.
    /// Lines are one terminal cell wide, so any width above 1 is drawn as 1.
    pub linewidth: u16,
    /// Color of the lines between cells; defaults to the terminal background
    pub linecolor: Option<Color>,
    /// Labels for the rows, Monday first
    pub day_labels: Vec<String>,
    pub day_ticks: TickSelection,
    /// Labels for the months, January first
    pub month_labels: Vec<String>,
    pub month_ticks: TickSelection,
    /// Outline each month
    pub monthly_border: bool,
    /// Recorded verbatim on the data mesh
    pub extra: BTreeMap<String, String>,
}

impl Default for YearPlotOptions {
    fn default() -> YearPlotOptions {
        YearPlotOptions {
            how: Some(Aggregation::Sum),
            vmin: None,
            vmax: None,
            cmap: Colormap::default(),
            fill_color: FILL_COLOR,
            linewidth: 0,
            linecolor: None,
            day_labels: DAY_ABBRS.map(String::from).to_vec(),
            day_ticks: TickSelection::All,
            month_labels: MONTH_ABBRS.map(String::from).to_vec(),
            month_ticks: TickSelection::All,
            monthly_border: false,
            extra: BTreeMap::new(),
        }
    }
}

/// How to draw every year of a series
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarPlotOptions {
    /// Options applied to each year.  The color bounds default to the
    /// bounds of the whole series so that all years share one scale.
    pub yearplot: YearPlotOptions,
    /// Label each year's axes with the year
    pub year_labels: bool,
    /// Draw the earliest year first
    pub year_ascending: bool,
    pub year_label_style: Style,
    /// Title drawn above all years
    pub suptitle: Option<String>,
    /// Draw a color bar to the right of the years
    pub legend: bool,
    /// Number of color steps in the legend
    pub legend_resolution: usize,
    /// Number of intervals between legend labels
    pub legend_nticks: usize,
}

impl Default for CalendarPlotOptions {
    fn default() -> CalendarPlotOptions {
        CalendarPlotOptions {
            yearplot: YearPlotOptions::default(),
            year_labels: true,
            year_ascending: true,
            year_label_style: YEAR_LABEL_STYLE,
            suptitle: None,
            legend: true,
            legend_resolution: 50,
            legend_nticks: 5,
        }
    }
}

/// Plot one year of `data` as a calendar heatmap onto `ax`.
///
/// Weekdays run down the rows, Monday first, and weeks run across the
/// columns.  If `year` is `None`, the first year with data is plotted.
pub fn yearplot<'a>(
    data: &TimeSeries,
    year: Option<i32>,
    opts: &YearPlotOptions,
    ax: &'a mut Axes,
) -> Result<&'a mut Axes, PlotError> {
    check_bounds(opts)?;
    let daily = resample(data, opts.how)?;
    let year = year.or_else(|| data.first_year()).ok_or(PlotError::NoData)?;
    draw_year(&daily, year, opts, ax)
}

/// Plot every year of `data` as a calendar heatmap, one axes per year
/// stacked vertically, all on the same color scale
pub fn calendarplot(data: &TimeSeries, opts: &CalendarPlotOptions) -> Result<Figure, PlotError> {
    let mut years = data.years();
    if !opts.year_ascending {
        years.reverse();
    }
    check_bounds(&opts.yearplot)?;
    // Resample once here rather than once per year
    let daily = resample(data, opts.yearplot.how)?;
    let year_opts = YearPlotOptions {
        how: None,
        vmin: opts.yearplot.vmin.or_else(|| daily.min()),
        vmax: opts.yearplot.vmax.or_else(|| daily.max()),
        ..opts.yearplot.clone()
    };
    let mut fig = Figure::subplots(years.len(), opts.legend);
    if let Some(title) = &opts.suptitle {
        fig.set_suptitle(Label::new(title.as_str(), TITLE_STYLE));
    }
    let mut max_weeks = 0;
    for (&year, ax) in zip(&years, fig.axes_mut()) {
        draw_year(&daily, year, &year_opts, ax)?;
        max_weeks = max_weeks.max(ax.xlim());
        if opts.year_labels {
            ax.set_ylabel(Label::new(year.to_string(), opts.year_label_style));
        }
    }
    // Leap years starting late in the week span 54 columns; keep every year
    // the same width
    for ax in fig.axes_mut() {
        ax.set_xlim(max_weeks);
    }
    if let (Some(legend), Some(vmin), Some(vmax)) =
        (fig.legend_mut(), year_opts.vmin, year_opts.vmax)
    {
        let scale = ColorScale::new(year_opts.cmap, vmin, vmax);
        draw_legend(legend, scale, vmax, opts.legend_resolution, opts.legend_nticks);
    }
    tracing::debug!(years = ?years, days = daily.len(), "drew calendar plot");
    Ok(fig)
}

fn draw_year<'a>(
    daily: &DailySeries,
    year: i32,
    opts: &YearPlotOptions,
    ax: &'a mut Axes,
) -> Result<&'a mut Axes, PlotError> {
    check_label_count("day", &opts.day_labels, DAYS_IN_WEEK)?;
    check_label_count("month", &opts.month_labels, MONTHS.len())?;
    let day_ticks = opts.day_ticks.select(opts.day_labels.len())?;
    let month_ticks = opts.month_ticks.select(opts.month_labels.len())?;
    let grid = YearGrid::build(daily, year)?;

    ax.pcolormesh(Mesh::new(grid.presence().map(|_| opts.fill_color)));
    if let (Some(vmin), Some(vmax)) = (
        opts.vmin.or_else(|| daily.min()),
        opts.vmax.or_else(|| daily.max()),
    ) {
        let scale = ColorScale::new(opts.cmap, vmin, vmax);
        let mut mesh =
            Mesh::new(grid.data().map(|&v| scale.color(v))).with_extra(opts.extra.clone());
        if opts.linewidth > 0 {
            mesh = mesh.with_edges(Edges {
                width: opts.linewidth,
                color: opts.linecolor.unwrap_or(Color::Reset),
            });
        }
        ax.pcolormesh(mesh);
    }
    ax.set_xlim(to_u16(grid.columns()));
    ax.set_ylim(to_u16(DAYS_IN_WEEK));

    let spans = MONTHS
        .into_iter()
        .map(|month| MonthSpan::new(year, month))
        .collect::<Result<Vec<_>, _>>()?;
    ax.set_xticks(
        month_ticks
            .into_iter()
            .filter_map(|i| {
                let label = opts.month_labels.get(i)?;
                Some(Tick::new(spans.get(i)?.midpoint(), label.as_str()))
            })
            .collect(),
    );
    ax.set_yticks(
        day_ticks
            .into_iter()
            .filter_map(|i| {
                let label = opts.day_labels.get(i)?;
                Some(Tick::new(to_f64(i) + 0.5, label.as_str()))
            })
            .collect(),
    );
    if opts.monthly_border {
        for span in &spans {
            ax.add_polygon(Polygon {
                vertices: span.outline(),
                color: BORDER_COLOR,
            });
        }
    }
    Ok(ax)
}

fn check_bounds(opts: &YearPlotOptions) -> Result<(), PlotError> {
    match (opts.vmin, opts.vmax) {
        (Some(vmin), Some(vmax)) if vmin > vmax => Err(PlotError::InvertedBounds { vmin, vmax }),
        _ => Ok(()),
    }
}

fn check_label_count(
    what: &'static str,
    labels: &[String],
    expected: usize,
) -> Result<(), PlotError> {
    if labels.len() == expected {
        Ok(())
    } else {
        Err(PlotError::LabelCount {
            what,
            expected,
            found: labels.len(),
        })
    }
}

// A vertical color bar running from `vmax` at the top down to 0
fn draw_legend(ax: &mut Axes, scale: ColorScale, vmax: f64, resolution: usize, nticks: usize) {
    let step = if resolution > 1 {
        vmax / to_f64(resolution - 1)
    } else {
        0.0
    };
    ax.imshow(Image {
        colors: (0..resolution)
            .rev()
            .map(|i| scale.color(to_f64(i) * step))
            .collect(),
    });
    ax.set_yticks(legend_ticks(vmax, resolution, nticks));
}

/// Ticks along a legend of `resolution` steps: `nticks` evenly spaced
/// integer labels from the top down, followed by 0 at the very bottom.  The
/// top label is `vmax` itself, unrounded.
fn legend_ticks(vmax: f64, resolution: usize, nticks: usize) -> Vec<Tick> {
    if nticks == 0 {
        return Vec::new();
    }
    let n = to_f64(nticks);
    let positions = (0..nticks)
        .map(|k| to_f64(k) * to_f64(resolution) / n)
        .chain(once(to_f64(resolution)));
    let mut labels = (0..nticks)
        .map(|k| (to_f64(k) * vmax / n).round().to_string())
        .chain(once(vmax.to_string()))
        .collect::<Vec<_>>();
    labels.reverse();
    zip(positions, labels)
        .map(|(position, label)| Tick::new(position, label))
        .collect()
}
