use crate::cave::Cave;
use crate::config::Budget;
use crate::state::{State, ValveSet};

/// Computes upper bounds on the value any descendant of a state can reach.
///
/// The bound pretends every closed valve in reach could be opened the moment the searcher
/// arrives, all of them at once, so each contributes its flow for every minute left after the
/// walk there. Searchers that haven't set off yet get the same treatment from the start room
/// with the full budget, over the same closed valves. A valve can be counted by more than one
/// searcher that way, which only loosens the bound.
#[derive(Clone, Copy, Debug)]
pub struct Bounder<'a> {
    cave: &'a Cave,
    budget: Budget,
}

impl<'a> Bounder<'a> {
    pub fn new(cave: &'a Cave, budget: Budget) -> Self {
        Bounder { cave, budget }
    }

    pub fn upper_bound(&self, state: &State) -> usize {
        let opened = state.opened();
        let mut bound =
            state.value() + self.relaxed_gain(state.position(), state.minutes_left(), opened);
        if state.idle_searchers() > 0 {
            let fresh = self.relaxed_gain(self.cave.start(), self.budget.minutes(), opened);
            bound += fresh * state.idle_searchers() as usize;
        }
        bound
    }

    /// Flow a lone searcher at `from` could release if every reachable closed valve opened
    /// without delay on arrival.
    pub fn relaxed_gain(&self, from: usize, minutes_left: usize, opened: ValveSet) -> usize {
        self.cave
            .valves()
            .iter()
            .filter(|valve| !opened.contains(valve.slot))
            .filter_map(|valve| {
                let dist = self.cave.distance(from, valve.slot)?;
                (dist <= minutes_left).then(|| valve.flow_rate * (minutes_left - dist))
            })
            .sum()
    }
}
