use tracing::debug;

use crate::distance::DistanceIndex;
use crate::error::{Error, Result};
use crate::state::ValveSet;
use crate::volcano::Volcano;

/// A valve worth opening, addressed by its distance index slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Valve {
    pub slot: usize,
    pub flow_rate: usize,
}

/// Everything the search needs to know about the volcano: the compacted network, the distances
/// between the rooms that are left, and which of them have a valve worth opening.
#[derive(Clone, Debug)]
pub struct Cave {
    volcano: Volcano,
    distances: DistanceIndex,
    valves: Vec<Valve>,
    start: usize,
}

impl Cave {
    /// Compact `volcano` and index the distances between the rooms that remain.
    pub fn new(mut volcano: Volcano) -> Result<Self> {
        volcano.compact();
        let distances = DistanceIndex::build(&volcano);
        if distances.len() > ValveSet::CAPACITY {
            return Err(Error::TooManyValves {
                count: distances.len(),
                max: ValveSet::CAPACITY,
            });
        }

        let start = distances
            .slot(volcano.start())
            .ok_or_else(|| Error::UnknownStart {
                valve: volcano.name(volcano.start()).to_string(),
            })?;
        let valves: Vec<Valve> = distances
            .rooms()
            .iter()
            .enumerate()
            .filter(|&(_, &rh)| volcano.flow(rh) > 0)
            .map(|(slot, &rh)| Valve { slot, flow_rate: volcano.flow(rh) })
            .collect();
        debug!(valves = valves.len(), start = volcano.name(volcano.start()), "cave ready");

        Ok(Cave { volcano, distances, valves, start })
    }

    pub fn parse(input: &str, start: &str) -> Result<Self> {
        Cave::new(Volcano::parse(input, start)?)
    }

    pub fn volcano(&self) -> &Volcano {
        &self.volcano
    }

    pub fn distances(&self) -> &DistanceIndex {
        &self.distances
    }

    /// Valves with a positive flow rate, in slot order.
    pub fn valves(&self) -> &[Valve] {
        &self.valves
    }

    /// Sum of every valve's flow rate, or `None` if it overflows.
    pub fn total_flow(&self) -> Option<usize> {
        self.valves.iter().try_fold(0usize, |sum, valve| sum.checked_add(valve.flow_rate))
    }

    /// Slot of the start room.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn distance(&self, src: usize, dst: usize) -> Option<usize> {
        self.distances.get(src, dst)
    }

    pub fn name(&self, slot: usize) -> &str {
        self.volcano.name(self.distances.room(slot))
    }
}
