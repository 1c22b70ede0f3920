use std::fmt;
use std::rc::Rc;

use crate::cave::Cave;
use crate::config::Budget;

/// Set of distance index slots, used to track opened valves.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ValveSet(u128);

impl ValveSet {
    pub const CAPACITY: usize = u128::BITS as usize;

    pub fn new() -> Self {
        ValveSet(0)
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot < Self::CAPACITY && (self.0 >> slot) & 1 == 1
    }

    /// A copy of this set that also contains `slot`.
    pub fn with(self, slot: usize) -> Self {
        ValveSet(self.0 | (1 << slot))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::CAPACITY).filter(|&slot| self.contains(slot))
    }
}

impl fmt::Debug for ValveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// What produced a state from its parent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Choice {
    Start,
    /// Walk to the valve in this slot and open it.
    Open(usize),
    /// The active searcher is done; the next one sets off from the start room.
    Handoff,
}

/// One link in the chain of choices leading to a state. Siblings share their parent's chain,
/// and a link is freed once no pending state refers to it.
#[derive(PartialEq, Eq, Debug)]
pub struct Trail {
    choice: Choice,
    minutes_left: usize,
    parent: Option<Rc<Trail>>,
}

impl Trail {
    pub fn choice(&self) -> Choice {
        self.choice
    }

    /// Minutes the active searcher had left right after this choice.
    pub fn minutes_left(&self) -> usize {
        self.minutes_left
    }

    pub fn parent(&self) -> Option<&Trail> {
        self.parent.as_deref()
    }
}

/// A point in the search. States are never modified: every transition builds a new one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct State {
    trail: Option<Rc<Trail>>,
    position: usize,
    opened: ValveSet,
    minutes_left: usize,
    released: usize,
    idle_searchers: u8,
}

impl State {
    pub fn root(cave: &Cave, budget: &Budget) -> Self {
        State {
            trail: None,
            position: cave.start(),
            opened: ValveSet::new(),
            minutes_left: budget.minutes(),
            released: 0,
            idle_searchers: budget.searchers() - 1,
        }
    }

    /// The choice that produced this state; `Start` for the root.
    pub fn choice(&self) -> Choice {
        self.trail.as_ref().map_or(Choice::Start, |t| t.choice)
    }

    /// Choices from the root to this state, oldest first.
    pub fn history(&self) -> Vec<&Trail> {
        let mut out = Vec::new();
        let mut cur = self.trail.as_deref();
        while let Some(link) = cur {
            out.push(link);
            cur = link.parent();
        }
        out.reverse();
        out
    }

    fn extend(&self, choice: Choice, minutes_left: usize) -> Option<Rc<Trail>> {
        Some(Rc::new(Trail { choice, minutes_left, parent: self.trail.clone() }))
    }

    /// Slot of the room the active searcher is in.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn opened(&self) -> ValveSet {
        self.opened
    }

    pub fn minutes_left(&self) -> usize {
        self.minutes_left
    }

    /// Total pressure the opened valves will release by the end of the budget.
    pub fn value(&self) -> usize {
        self.released
    }

    /// Searchers that haven't set off yet.
    pub fn idle_searchers(&self) -> u8 {
        self.idle_searchers
    }

    /// Push every state reachable with one choice onto `out`. Each of them extends this
    /// state's trail so the path can be rebuilt later.
    ///
    /// Pressure is summed unchecked: `Explorer::new` rejects a cave whose total flow over the
    /// budget doesn't fit in a `usize`.
    pub fn push_successors(&self, cave: &Cave, budget: &Budget, out: &mut Vec<State>) {
        for valve in cave.valves() {
            if self.opened.contains(valve.slot) {
                continue;
            }
            let Some(dist) = cave.distance(self.position, valve.slot) else {
                continue;
            };
            // Walk there, then spend a minute opening the valve.
            if dist + 1 > self.minutes_left {
                continue;
            }
            let minutes_left = self.minutes_left - dist - 1;
            out.push(State {
                trail: self.extend(Choice::Open(valve.slot), minutes_left),
                position: valve.slot,
                opened: self.opened.with(valve.slot),
                minutes_left,
                released: self.released + valve.flow_rate * minutes_left,
                idle_searchers: self.idle_searchers,
            });
        }

        if self.idle_searchers > 0 {
            out.push(State {
                trail: self.extend(Choice::Handoff, budget.minutes()),
                position: cave.start(),
                opened: self.opened,
                minutes_left: budget.minutes(),
                released: self.released,
                idle_searchers: self.idle_searchers - 1,
            });
        }
    }

    pub fn successors(&self, cave: &Cave, budget: &Budget) -> Vec<State> {
        let mut out = Vec::new();
        self.push_successors(cave, budget, &mut out);
        out
    }
}
