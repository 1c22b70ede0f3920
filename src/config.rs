use std::time::Duration;

use clap::ValueEnum;

use crate::error::{Error, Result};

/// Valve every searcher starts from, unless told otherwise.
pub const START_VALVE: &str = "AA";

/// Minutes available when searching alone.
pub const SINGLE_MINUTES: usize = 30;

/// Minutes available to each searcher when two of them split the work.
pub const PAIR_MINUTES: usize = 26;

/// How long each searcher has and how many of them there are. Searchers run one after another
/// from the start valve, each with the full number of minutes, and share the set of opened
/// valves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Budget {
    minutes: usize,
    searchers: u8,
}

impl Budget {
    pub const MAX_SEARCHERS: u8 = 2;

    pub fn new(minutes: usize, searchers: u8) -> Result<Self> {
        if searchers == 0 || searchers > Self::MAX_SEARCHERS {
            return Err(Error::InvalidBudget {
                message: format!(
                    "{searchers} searchers requested, expected 1 to {}",
                    Self::MAX_SEARCHERS
                ),
            });
        }
        Ok(Budget { minutes, searchers })
    }

    pub fn single(minutes: usize) -> Self {
        Budget { minutes, searchers: 1 }
    }

    pub fn pair(minutes: usize) -> Self {
        Budget { minutes, searchers: 2 }
    }

    pub fn minutes(&self) -> usize {
        self.minutes
    }

    pub fn searchers(&self) -> u8 {
        self.searchers
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::single(SINGLE_MINUTES)
    }
}

/// Order in which pending states are taken off the frontier. It only changes how fast the
/// search runs, never its result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FrontierOrder {
    /// Highest upper bound first.
    #[default]
    BestFirst,
    /// Oldest state first.
    BreadthFirst,
    /// Newest state first.
    DepthFirst,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub start: String,
    pub budget: Budget,
    pub order: FrontierOrder,
    /// Stop after expanding this many states.
    pub max_states: Option<usize>,
    /// Stop once the search has run this long.
    pub time_limit: Option<Duration>,
}

impl SearchConfig {
    pub fn new(budget: Budget) -> Self {
        SearchConfig { budget, ..Default::default() }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            start: START_VALVE.to_string(),
            budget: Budget::default(),
            order: FrontierOrder::default(),
            max_states: None,
            time_limit: None,
        }
    }
}
