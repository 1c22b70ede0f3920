//! Find the most pressure that can be released by opening valves in a network of tunnels
//! before time runs out, either alone or with a second searcher sharing the work.
//!
//! ```no_run
//! use valve_search::{solve, Budget, SearchConfig};
//!
//! let input = std::fs::read_to_string("input.txt")?;
//! let alone = solve(&input, &SearchConfig::default())?;
//! let together = solve(&input, &SearchConfig::new(Budget::pair(26)))?;
//! println!("{} {}", alone.best, together.best);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bound;
pub mod cave;
pub mod config;
pub mod distance;
pub mod error;
pub mod explorer;
pub mod parse;
pub mod state;
pub mod volcano;

#[cfg(test)]
mod testutil;

pub use bound::Bounder;
pub use cave::{Cave, Valve};
pub use config::{Budget, FrontierOrder, SearchConfig, PAIR_MINUTES, SINGLE_MINUTES, START_VALVE};
pub use distance::DistanceIndex;
pub use error::{Error, Result};
pub use explorer::{Explorer, Outcome, Step};
pub use parse::{parse_records, read_input, ValveRecord};
pub use state::{Choice, State, Trail, ValveSet};
pub use volcano::{RoomHandle, Volcano};

/// Parse `input`, compact it and search it with `config`.
pub fn solve(input: &str, config: &SearchConfig) -> Result<Outcome> {
    let cave = Cave::parse(input, &config.start)?;
    Ok(Explorer::new(&cave, config)?.run())
}
