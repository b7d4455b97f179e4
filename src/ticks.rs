use crate::error::PlotError;
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;

/// Which of a set of axis labels to show
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum TickSelection {
    #[default]
    All,
    None,
    /// Only the labels at these indices
    Indices(Vec<usize>),
    /// Every nth label, starting from label `n / 2`
    Every(NonZeroUsize),
}

impl TickSelection {
    /// Resolve the selection against `len` labels
    pub fn select(&self, len: usize) -> Result<Vec<usize>, PlotError> {
        match self {
            TickSelection::All => Ok((0..len).collect()),
            TickSelection::None => Ok(Vec::new()),
            TickSelection::Indices(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                    Err(PlotError::TickIndex { index, len })
                } else {
                    Ok(indices.clone())
                }
            }
            TickSelection::Every(n) => Ok((n.get() / 2..len).step_by(n.get()).collect()),
        }
    }
}

impl FromStr for TickSelection {
    type Err = ParseTickSelectionError;

    /// Parses `all`, `none`, a count `N` (every Nth label), or a
    /// comma-separated list of indices (`0,2,4`; a single index needs a
    /// trailing comma)
    fn from_str(s: &str) -> Result<TickSelection, ParseTickSelectionError> {
        let err = || ParseTickSelectionError(s.to_owned());
        match s.trim() {
            "all" | "true" => Ok(TickSelection::All),
            "none" | "false" => Ok(TickSelection::None),
            t if t.contains(',') => t
                .split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(|piece| piece.parse::<usize>().map_err(|_| err()))
                .collect::<Result<Vec<_>, _>>()
                .map(TickSelection::Indices),
            t => t
                .parse::<NonZeroUsize>()
                .map(TickSelection::Every)
                .map_err(|_| err()),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid tick selection {0:?}; expected \"all\", \"none\", a count, or a list of indices")]
pub struct ParseTickSelectionError(String);
