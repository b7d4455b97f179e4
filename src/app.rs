use crate::help::{Action, Help};
use calheat::theme::{BASE_STYLE, TITLE_STYLE};
use calheat::{calendarplot, yearplot, CalendarPlotOptions, Figure, Label, PlotError, TimeSeries};
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, buffer::Buffer, layout::Rect, widgets::Widget, Terminal};
use std::io::{self, Write};

/// Plot the single year `year` of `series`, or every year if `year` is
/// `None`.  Only the latter gets a legend.
pub(crate) fn build_figure(
    series: &TimeSeries,
    opts: &CalendarPlotOptions,
    year: Option<i32>,
) -> Result<Figure, PlotError> {
    let Some(year) = year else {
        return calendarplot(series, opts);
    };
    let mut figure = Figure::subplots(1, false);
    if let Some(title) = &opts.suptitle {
        figure.set_suptitle(Label::new(title.as_str(), TITLE_STYLE));
    }
    for ax in figure.axes_mut() {
        yearplot(series, Some(year), &opts.yearplot, ax)?;
        if opts.year_labels {
            ax.set_ylabel(Label::new(year.to_string(), opts.year_label_style));
        }
    }
    Ok(figure)
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct App {
    series: TimeSeries,
    opts: CalendarPlotOptions,
    year: Option<i32>,
    figure: Figure,
    /// Index of the topmost year on screen
    first: usize,
    state: AppState,
}

impl App {
    pub(crate) fn new(
        series: TimeSeries,
        opts: CalendarPlotOptions,
        year: Option<i32>,
    ) -> Result<App, PlotError> {
        let figure = build_figure(&series, &opts, year)?;
        Ok(App {
            series,
            opts,
            year,
            figure,
            first: 0,
            state: AppState::Viewing,
        })
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = read()?
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Viewing => match Action::for_key(key) {
                Some(Action::ScrollDown) => self.scroll_down(),
                Some(Action::ScrollUp) => self.scroll_up(),
                Some(Action::ToggleBorders) => self.reconfigure(|opts| {
                    opts.yearplot.monthly_border = !opts.yearplot.monthly_border;
                }),
                Some(Action::ToggleLegend) => self.reconfigure(|opts| opts.legend = !opts.legend),
                Some(Action::Quit) => {
                    self.state = AppState::Quitting;
                    true
                }
                Some(Action::Help) => {
                    self.state = AppState::Helping;
                    true
                }
                None => false,
            },
            AppState::Helping => {
                self.state = AppState::Viewing;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn scroll_down(&mut self) -> bool {
        if self.first + 1 < self.figure.axes().len() {
            self.first += 1;
            true
        } else {
            false
        }
    }

    fn scroll_up(&mut self) -> bool {
        if self.first > 0 {
            self.first -= 1;
            true
        } else {
            false
        }
    }

    // Redraw the figure with changed options, keeping the old options if
    // that fails
    fn reconfigure<F: FnOnce(&mut CalendarPlotOptions)>(&mut self, f: F) -> bool {
        let mut opts = self.opts.clone();
        f(&mut opts);
        match build_figure(&self.series, &opts, self.year) {
            Ok(figure) => {
                self.opts = opts;
                self.figure = figure;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to redraw figure");
                false
            }
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        self.figure.render_from(self.first, area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Viewing,
    Helping,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use calheat::theme::{FILL_COLOR, YEAR_LABEL_STYLE};
    use calheat::Colormap;
    use ratatui::style::Color;
    use time::macros::date;

    fn two_years() -> TimeSeries {
        [(date!(2019 - 07 - 04), 3.0), (date!(2020 - 01 - 06), 1.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_render() {
        let series = std::iter::successors(Some(date!(2020 - 01 - 01)), |d| d.next_day())
            .take(31)
            .map(|d| (d, 1.0))
            .collect::<TimeSeries>();
        let opts = CalendarPlotOptions {
            legend: false,
            ..CalendarPlotOptions::default()
        };
        let app = App::new(series, opts, None).unwrap();
        let area = Rect::new(0, 0, 120, 10);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        // "2020" takes the first five columns; 2020-01-01 is a Wednesday
        let low = Colormap::default().sample(0.0);
        assert_eq!(buffer[(5, 2)].bg, low);
        assert_eq!(buffer[(6, 2)].bg, low);
        assert_eq!(buffer[(5, 0)].bg, Color::Black);
        assert_eq!(buffer[(15, 0)].bg, FILL_COLOR);
        let label = (0..4).map(|x| buffer[(x, 3)].symbol()).collect::<String>();
        assert_eq!(label, "2020");
        assert!(buffer[(0, 3)].modifier.contains(YEAR_LABEL_STYLE.add_modifier));
        let ticks = (0..120).map(|x| buffer[(x, 7)].symbol()).collect::<String>();
        assert!(ticks.starts_with("         Jan "));
        assert_eq!(buffer[(112, 0)].symbol(), "M");
    }

    #[test]
    fn test_scroll() {
        let mut app = App::new(two_years(), CalendarPlotOptions::default(), None).unwrap();
        assert!(!app.handle_key(KeyCode::Char('k')));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.first, 1);
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Up));
        assert_eq!(app.first, 0);
    }

    #[test]
    fn test_toggles() {
        let mut app = App::new(two_years(), CalendarPlotOptions::default(), None).unwrap();
        assert!(app.figure.axes()[0].polygons().is_empty());
        assert!(app.handle_key(KeyCode::Char('b')));
        assert_eq!(app.figure.axes()[0].polygons().len(), 12);
        assert!(app.figure.legend().is_some());
        assert!(app.handle_key(KeyCode::Char('L')));
        assert!(app.figure.legend().is_none());
        assert_eq!(app.figure.axes()[1].polygons().len(), 12);
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = App::new(two_years(), CalendarPlotOptions::default(), None).unwrap();
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Viewing);
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
    }

    #[test]
    fn test_single_year() {
        let opts = CalendarPlotOptions {
            suptitle: Some("Walks".into()),
            ..CalendarPlotOptions::default()
        };
        let figure = build_figure(&two_years(), &opts, Some(2019)).unwrap();
        assert_eq!(figure.axes().len(), 1);
        assert!(figure.legend().is_none());
        assert_eq!(figure.suptitle().map(|t| t.text.as_str()), Some("Walks"));
        let ax = &figure.axes()[0];
        assert_eq!(ax.ylabel().map(|l| l.text.as_str()), Some("2019"));
        assert_eq!(ax.meshes()[1].colors().count(), 1);
    }
}
