//! Calendar heatmaps of daily time series, drawn with [ratatui].
//!
//! A [`TimeSeries`] is resampled to one value per day, laid out with weekdays
//! down the rows and weeks across the columns, and drawn onto an [`Axes`]
//! (one year) or a [`Figure`] (every year, stacked).  Both are widgets that
//! can be rendered into any ratatui buffer.
//!
//! ```
//! use calheat::{calendarplot, CalendarPlotOptions, TimeSeries};
//! use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
//! use time::macros::date;
//!
//! let series = [(date!(2024 - 03 - 14), 2.0), (date!(2024 - 03 - 15), 5.0)]
//!     .into_iter()
//!     .collect::<TimeSeries>();
//! let figure = calendarplot(&series, &CalendarPlotOptions::default())?;
//! assert_eq!(figure.axes().len(), 1);
//! let (width, height) = figure.size();
//! let area = Rect::new(0, 0, width, height);
//! let mut buf = Buffer::empty(area);
//! (&figure).render(area, &mut buf);
//! # Ok::<(), calheat::PlotError>(())
//! ```
mod axes;
mod colormap;
mod error;
mod figure;
mod grid;
pub mod input;
mod plot;
mod series;
pub mod theme;
mod ticks;
mod util;
pub use crate::axes::{Axes, Edges, Image, Label, Mesh, Polygon, Tick, CELL_WIDTH};
pub use crate::colormap::{ColorScale, Colormap, Palette, ParseColormapError};
pub use crate::error::PlotError;
pub use crate::figure::Figure;
pub use crate::grid::{
    week_column, week_columns, weekday_row, Grid, MonthSpan, YearGrid, DAYS_IN_WEEK,
};
pub use crate::plot::{calendarplot, yearplot, CalendarPlotOptions, YearPlotOptions};
pub use crate::series::{
    resample, Aggregation, DailySeries, ParseAggregationError, TimeSeries,
};
pub use crate::ticks::{ParseTickSelectionError, TickSelection};
