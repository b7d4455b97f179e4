use crate::error::PlotError;
use crate::series::DailySeries;
use crate::util::to_f64;
use std::iter::successors;
use time::{Date, Month};

pub const DAYS_IN_WEEK: usize = 7;

/// A dense row-major array of optional cells.  `None` marks a masked cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    columns: usize,
    cells: Vec<Option<T>>,
}

impl<T> Grid<T> {
    pub fn new(rows: usize, columns: usize) -> Grid<T> {
        Grid {
            rows,
            columns,
            cells: std::iter::repeat_with(|| None)
                .take(rows * columns)
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        if row < self.rows && column < self.columns {
            self.cells.get(row * self.columns + column)?.as_ref()
        } else {
            None
        }
    }

    /// Stores `value` at the given cell; out-of-range cells are ignored.
    pub fn set(&mut self, row: usize, column: usize, value: T) {
        if row < self.rows && column < self.columns {
            if let Some(cell) = self.cells.get_mut(row * self.columns + column) {
                *cell = Some(value);
            }
        }
    }

    /// Iterate over the unmasked cells as `(row, column, value)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|v| (i / columns, i % columns, v)))
    }

    /// Number of unmasked cells
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    pub fn map<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            rows: self.rows,
            columns: self.columns,
            cells: self.cells.iter().map(|c| c.as_ref().map(&mut f)).collect(),
        }
    }
}

/// One calendar year of daily values laid out by weekday (rows, Monday = 0)
/// and week (columns).
#[derive(Clone, Debug, PartialEq)]
pub struct YearGrid {
    year: i32,
    data: Grid<f64>,
    presence: Grid<()>,
    // Week column of each day of the year, indexed by ordinal - 1
    day_columns: Vec<usize>,
}

impl YearGrid {
    /// Lay out the days of `year` from `daily`.  Days without a value are
    /// masked in the data grid but present in the presence grid.
    pub fn build(daily: &DailySeries, year: i32) -> Result<YearGrid, PlotError> {
        let keyed = week_keys(year)?;
        let mut day_columns = Vec::with_capacity(keyed.len());
        let mut column = 0;
        let mut prev_week = None;
        for &(_, week) in &keyed {
            // Pivoting on the week keys leaves no gaps between columns
            if prev_week.is_some_and(|p| p != week) {
                column += 1;
            }
            prev_week = Some(week);
            day_columns.push(column);
        }
        let columns = day_columns.last().map_or(0, |&c| c + 1);
        let mut data = Grid::new(DAYS_IN_WEEK, columns);
        let mut presence = Grid::new(DAYS_IN_WEEK, columns);
        for (&(date, _), &column) in std::iter::zip(&keyed, &day_columns) {
            let row = weekday_row(date);
            presence.set(row, column, ());
            if let Some(value) = daily.get(date) {
                data.set(row, column, value);
            }
        }
        tracing::debug!(
            year,
            columns,
            days = presence.count(),
            with_data = data.count(),
            "built year grid"
        );
        Ok(YearGrid {
            year,
            data,
            presence,
            day_columns,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn columns(&self) -> usize {
        self.data.columns()
    }

    /// Values of the days that have data; everything else is masked
    pub fn data(&self) -> &Grid<f64> {
        &self.data
    }

    /// Values of the days with data, in row-major order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(|(_, _, &value)| value)
    }

    /// Marks every day that exists in the year, with or without data
    pub fn presence(&self) -> &Grid<()> {
        &self.presence
    }

    /// The `(row, column)` cell of `date`, or `None` if it lies in another
    /// year
    pub fn cell_of(&self, date: Date) -> Option<(usize, usize)> {
        if date.year() != self.year {
            return None;
        }
        let column = *self.day_columns.get(usize::from(date.ordinal()) - 1)?;
        Some((weekday_row(date), column))
    }
}

/// Grid row of a date: Monday is 0, Sunday is 6
pub fn weekday_row(date: Date) -> usize {
    usize::from(date.weekday().number_days_from_monday())
}

/// Week column of `date` within its own year, counting the (possibly
/// partial) week containing January 1 as column 0
pub fn week_column(date: Date) -> usize {
    let jan1 = Date::from_ordinal_date(date.year(), 1).map_or(0, weekday_row);
    (usize::from(date.ordinal()) - 1 + jan1) / DAYS_IN_WEEK
}

/// Number of week columns spanned by `year` (53 or 54)
pub fn week_columns(year: i32) -> usize {
    Date::from_calendar_date(year, Month::December, 31).map_or(0, |d| week_column(d) + 1)
}

/// First and last cells of a month, each as `(row, column)`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonthSpan {
    pub first: (usize, usize),
    pub last: (usize, usize),
}

impl MonthSpan {
    pub fn new(year: i32, month: Month) -> Result<MonthSpan, PlotError> {
        let first =
            Date::from_calendar_date(year, month, 1).map_err(|_| PlotError::YearOutOfRange(year))?;
        let last = first
            .replace_day(month.length(year))
            .map_err(|_| PlotError::YearOutOfRange(year))?;
        Ok(MonthSpan {
            first: (weekday_row(first), week_column(first)),
            last: (weekday_row(last), week_column(last)),
        })
    }

    /// Horizontal midpoint of the month's columns, in column units
    pub fn midpoint(&self) -> f64 {
        let (x0, x1) = (to_f64(self.first.1), to_f64(self.last.1));
        x0 + (x1 - x0 + 1.0) / 2.0
    }

    /// Corners of the outline around the month's cells, as `(x, y)` grid
    /// lattice points with y growing downwards.  The month fills column x0
    /// from its first weekday down, every column in between, and column x1
    /// from the top down to its last weekday.
    pub fn outline(&self) -> Vec<(usize, usize)> {
        let (y0, x0) = self.first;
        let (y1, x1) = self.last;
        let bottom = DAYS_IN_WEEK;
        vec![
            (x0, y0),
            (x0 + 1, y0),
            (x0 + 1, 0),
            (x1 + 1, 0),
            (x1 + 1, y1 + 1),
            (x1, y1 + 1),
            (x1, bottom),
            (x0, bottom),
        ]
    }
}

// Every date of `year` with its week key: the ISO week number, except that
// January days belonging to the previous ISO year get week 0 and December
// days belonging to the next ISO year get one past the largest week.
fn week_keys(year: i32) -> Result<Vec<(Date, u8)>, PlotError> {
    let jan1 = Date::from_calendar_date(year, Month::January, 1)
        .map_err(|_| PlotError::YearOutOfRange(year))?;
    let mut keyed = successors(Some(jan1), |d| d.next_day())
        .take_while(|d| d.year() == year)
        .map(|d| (d, d.iso_week()))
        .collect::<Vec<_>>();
    for (date, week) in &mut keyed {
        if date.month() == Month::January && *week > 50 {
            *week = 0;
        }
    }
    let max_week = keyed.iter().map(|&(_, w)| w).max().unwrap_or(0);
    for (date, week) in &mut keyed {
        if date.month() == Month::December && *week < 10 {
            *week = max_week + 1;
        }
    }
    Ok(keyed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use time::macros::date;

    fn all_days(year: i32) -> Vec<Date> {
        let jan1 = Date::from_calendar_date(year, Month::January, 1).unwrap();
        successors(Some(jan1), |d| d.next_day())
            .take_while(|d| d.year() == year)
            .collect()
    }

    #[test]
    fn test_every_day_has_its_own_cell() {
        for year in [2012, 2013, 2015, 2016, 2020, 2021] {
            let grid = YearGrid::build(&DailySeries::default(), year).unwrap();
            let days = all_days(year);
            let cells = days
                .iter()
                .map(|&d| grid.cell_of(d).unwrap())
                .collect::<BTreeSet<_>>();
            assert_eq!(cells.len(), days.len(), "collision in {year}");
            assert_eq!(grid.presence().count(), days.len());
            assert_eq!(grid.data().count(), 0);
        }
    }

    #[test]
    fn test_columns_match_arithmetic() {
        for year in 1990..=2040 {
            let grid = YearGrid::build(&DailySeries::default(), year).unwrap();
            assert_eq!(grid.columns(), week_columns(year), "columns of {year}");
            for d in all_days(year) {
                assert_eq!(
                    grid.cell_of(d),
                    Some((weekday_row(d), week_column(d))),
                    "cell of {d}"
                );
            }
        }
    }

    #[test]
    fn test_columns_are_contiguous() {
        for year in [2010, 2012, 2020] {
            let grid = YearGrid::build(&DailySeries::default(), year).unwrap();
            let used = all_days(year)
                .into_iter()
                .filter_map(|d| grid.cell_of(d))
                .map(|(_, c)| c)
                .collect::<BTreeSet<_>>();
            assert_eq!(
                used.into_iter().collect::<Vec<_>>(),
                (0..grid.columns()).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_year_boundary_weeks() {
        // 2016-01-01 is a Friday in ISO week 53 of 2015
        let grid = YearGrid::build(&DailySeries::default(), 2016).unwrap();
        assert_eq!(grid.cell_of(date!(2016 - 01 - 01)), Some((4, 0)));
        assert_eq!(grid.cell_of(date!(2016 - 01 - 03)), Some((6, 0)));
        assert_eq!(grid.cell_of(date!(2016 - 01 - 04)), Some((0, 1)));
        // 2018-12-31 is a Monday in ISO week 1 of 2019
        let grid = YearGrid::build(&DailySeries::default(), 2018).unwrap();
        assert_eq!(grid.columns(), 53);
        assert_eq!(grid.cell_of(date!(2018 - 12 - 31)), Some((0, 52)));
        assert_eq!(grid.cell_of(date!(2018 - 12 - 30)), Some((6, 51)));
    }

    #[test]
    fn test_week_column_counts() {
        assert_eq!(week_columns(2012), 54);
        assert_eq!(week_columns(2013), 53);
        assert_eq!(week_columns(2020), 53);
        assert_eq!(week_columns(2017), 53);
    }

    #[test]
    fn test_sparse_series_is_masked() {
        let daily = (1..=12)
            .map(|m| {
                let month = Month::try_from(m).unwrap();
                (Date::from_calendar_date(2020, month, 15).unwrap(), 0.0)
            })
            .collect::<DailySeries>();
        let grid = YearGrid::build(&daily, 2020).unwrap();
        assert_eq!(grid.presence().count(), 366);
        assert_eq!(grid.data().count(), 12);
        let (row, column) = grid.cell_of(date!(2020 - 05 - 15)).unwrap();
        assert_eq!(grid.data().get(row, column), Some(&0.0));
        let (row, column) = grid.cell_of(date!(2020 - 05 - 16)).unwrap();
        assert_eq!(grid.data().get(row, column), None);
        assert_eq!(grid.presence().get(row, column), Some(&()));
    }

    #[test]
    fn test_other_years_are_ignored() {
        let daily = DailySeries::from_iter([
            (date!(2019 - 12 - 31), 1.0),
            (date!(2020 - 01 - 01), 2.0),
            (date!(2021 - 01 - 01), 3.0),
        ]);
        let grid = YearGrid::build(&daily, 2020).unwrap();
        assert_eq!(grid.data().count(), 1);
        assert_eq!(grid.cell_of(date!(2019 - 12 - 31)), None);
    }

    #[test]
    fn test_out_of_range_year() {
        assert_eq!(
            YearGrid::build(&DailySeries::default(), 10_000),
            Err(PlotError::YearOutOfRange(10_000))
        );
    }

    #[test]
    fn test_month_span() {
        // March 2020 runs from Sunday in column 8 to Tuesday in column 13
        let span = MonthSpan::new(2020, Month::March).unwrap();
        assert_eq!(span.first, (6, 8));
        assert_eq!(span.last, (1, 13));
        assert_eq!(span.midpoint(), 11.0);
        assert_eq!(
            span.outline(),
            vec![
                (8, 6),
                (9, 6),
                (9, 0),
                (14, 0),
                (14, 2),
                (13, 2),
                (13, 7),
                (8, 7)
            ]
        );
    }

    #[test]
    fn test_grid_iter_and_map() {
        let mut grid = Grid::new(2, 3);
        grid.set(0, 2, 1.5);
        grid.set(1, 0, 2.5);
        grid.set(5, 5, 9.0);
        assert_eq!(
            grid.iter().collect::<Vec<_>>(),
            vec![(0, 2, &1.5), (1, 0, &2.5)]
        );
        let doubled = grid.map(|v| v * 2.0);
        assert_eq!(doubled.get(0, 2), Some(&3.0));
        assert_eq!(doubled.get(0, 0), None);
        assert_eq!(doubled.get(0, 3), None);
    }
}
