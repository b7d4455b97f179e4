mod app;
mod help;
mod logging;
use crate::app::{build_figure, App};
use crate::logging::Destination;
use anyhow::Context;
use calheat::input::read_series;
use calheat::{Aggregation, CalendarPlotOptions, Figure, TimeSeries};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::{DefaultTerminal, TerminalOptions, Viewport};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
enum Command {
    Run(Run),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut file = None;
        let mut year = None;
        let mut opts = CalendarPlotOptions::default();
        let mut inline = false;
        let mut verbosity = 0u8;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            let plot = &mut opts.yearplot;
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('y') | Arg::Long("year") => year = Some(parser.value()?.parse()?),
                Arg::Long("how") => {
                    let value = parser.value()?.string()?;
                    plot.how = if value == "none" {
                        None
                    } else {
                        Some(parse_value::<Aggregation>(value)?)
                    };
                }
                Arg::Long("cmap") => plot.cmap = parser.value()?.parse()?,
                Arg::Long("vmin") => plot.vmin = Some(parser.value()?.parse()?),
                Arg::Long("vmax") => plot.vmax = Some(parser.value()?.parse()?),
                Arg::Long("fill-color") => plot.fill_color = parser.value()?.parse()?,
                Arg::Long("line-width") => plot.linewidth = parser.value()?.parse()?,
                Arg::Long("line-color") => plot.linecolor = Some(parser.value()?.parse()?),
                Arg::Long("day-labels") => {
                    plot.day_labels = parse_labels(&parser.value()?.string()?);
                }
                Arg::Long("day-ticks") => plot.day_ticks = parser.value()?.parse()?,
                Arg::Long("month-labels") => {
                    plot.month_labels = parse_labels(&parser.value()?.string()?);
                }
                Arg::Long("month-ticks") => plot.month_ticks = parser.value()?.parse()?,
                Arg::Long("monthly-border") => plot.monthly_border = true,
                Arg::Long("no-legend") => opts.legend = false,
                Arg::Long("legend-resolution") => {
                    opts.legend_resolution = parser.value()?.parse()?;
                }
                Arg::Long("legend-ticks") => opts.legend_nticks = parser.value()?.parse()?,
                Arg::Long("descending") => opts.year_ascending = false,
                Arg::Long("no-year-labels") => opts.year_labels = false,
                Arg::Long("title") => opts.suptitle = Some(parser.value()?.string()?),
                Arg::Long("inline") => inline = true,
                Arg::Short('v') | Arg::Long("verbose") => verbosity = verbosity.saturating_add(1),
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if file.is_none() => file = Some(PathBuf::from(value)),
                _ => return Err(arg.unexpected()),
            }
        }
        let Some(file) = file else {
            return Err(lexopt::Error::from("no input file given"));
        };
        Ok(Command::Run(Run {
            file,
            year,
            opts,
            inline,
            verbosity,
            log_file,
        }))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(run) => run.run(),
            Command::Help => {
                println!("Usage: calheat [OPTIONS] <FILE>");
                println!();
                println!("Draw a CSV time series (date,value) as a calendar heatmap in the terminal");
                println!("Use `-` as FILE to read from standard input.");
                println!();
                println!("Options:");
                println!("  -y, --year <YEAR>           Show only this year");
                println!("      --how <METHOD|none>     Combine each day's values with sum, mean,");
                println!("                              median, min, max, count, first, last, or std");
                println!("                              [default: sum]");
                println!("      --cmap <NAME>           Color map, e.g. Reds, YlGn, viridis, Blues_r");
                println!("      --vmin <VALUE>          Value at the low end of the color map");
                println!("      --vmax <VALUE>          Value at the high end of the color map");
                println!("      --fill-color <COLOR>    Color of days without data");
                println!("      --line-width <N>        Width of the lines between days [default: 0]");
                println!("                              (any N above 1 is drawn as 1)");
                println!("      --line-color <COLOR>    Color of the lines between days");
                println!("      --day-labels <LABELS>   Seven weekday labels, e.g. MTWTFSS or Mo,Tu,...");
                println!("      --day-ticks <WHICH>     Weekday labels to show: all, none, N, or i,j,...");
                println!("      --month-labels <LABELS> Twelve month labels, comma-separated");
                println!("      --month-ticks <WHICH>   Month labels to show: all, none, N, or i,j,...");
                println!("      --monthly-border        Outline each month");
                println!("      --no-legend             Do not draw a legend");
                println!("      --legend-resolution <N> Number of colors in the legend [default: 50]");
                println!("      --legend-ticks <N>      Number of legend intervals [default: 5]");
                println!("      --descending            Show the latest year first");
                println!("      --no-year-labels        Do not label the years");
                println!("      --title <TEXT>          Title above the plot");
                println!("      --inline                Print the plot below the prompt and exit");
                println!("  -v, --verbose               Log more; may be repeated.  Logs go to stderr");
                println!("                              unless it is a terminal");
                println!("      --log-file <PATH>       Write logs to this file instead");
                println!("  -h, --help                  Display this help message and exit");
                println!("  -V, --version               Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Run {
    file: PathBuf,
    year: Option<i32>,
    opts: CalendarPlotOptions,
    inline: bool,
    verbosity: u8,
    log_file: Option<PathBuf>,
}

impl Run {
    fn run(self) -> anyhow::Result<()> {
        logging::init(
            self.verbosity,
            Destination::choose(self.log_file.as_deref()),
        )?;
        let series = read_input(&self.file)?;
        tracing::info!(file = %self.file.display(), points = series.len(), "loaded series");
        if self.inline {
            let figure = build_figure(&series, &self.opts, self.year)
                .context("failed to plot series")?;
            draw_inline(&figure)
        } else {
            let app = App::new(series, self.opts, self.year).context("failed to plot series")?;
            with_terminal(|mut terminal| {
                terminal.hide_cursor().context("failed to hide cursor")?;
                app.run(&mut terminal)?;
                Ok(())
            })
        }
    }
}

fn read_input(file: &Path) -> anyhow::Result<TimeSeries> {
    if file == Path::new("-") {
        read_series(io::stdin().lock()).context("failed to read series from stdin")
    } else {
        let fp = File::open(file).with_context(|| format!("failed to open {}", file.display()))?;
        read_series(BufReader::new(fp))
            .with_context(|| format!("failed to read series from {}", file.display()))
    }
}

// A comma-separated list, or else one label per character
fn parse_labels(s: &str) -> Vec<String> {
    if s.contains(',') {
        s.split(',').map(|label| label.trim().to_owned()).collect()
    } else {
        s.chars().map(String::from).collect()
    }
}

fn parse_value<T>(value: String) -> Result<T, lexopt::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value.parse::<T>() {
        Ok(v) => Ok(v),
        Err(e) => Err(lexopt::Error::ParsingFailed {
            value,
            error: Box::new(e),
        }),
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

// Draw the figure once beneath the cursor, leaving it in the scrollback
fn draw_inline(figure: &Figure) -> anyhow::Result<()> {
    let (_, height) = figure.size();
    let mut terminal = ratatui::init_with_options(TerminalOptions {
        viewport: Viewport::Inline(height),
    });
    let r = terminal
        .draw(|frame| frame.render_widget(figure, frame.area()))
        .map(|_| ())
        .context("failed to draw figure");
    ratatui::restore();
    println!();
    r
}
