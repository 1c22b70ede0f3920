use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::bound::Bounder;
use crate::cave::Cave;
use crate::config::{FrontierOrder, SearchConfig};
use crate::error::{Error, Result};
use crate::state::{Choice, State};

// Only look at the clock every this many pops.
const CLOCK_CHECK_MASK: usize = 0x3ff;

/// One step of the winning path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Open { valve: String, minutes_left: usize },
    Handoff,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Open { valve, minutes_left } => {
                write!(f, "open {valve} with {minutes_left} minutes left")
            }
            Step::Handoff => write!(f, "next searcher starts"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Most pressure released by any state seen.
    pub best: usize,
    /// Choices leading to the best state.
    pub path: Vec<Step>,
    pub expanded: usize,
    pub pruned: usize,
    pub generated: usize,
    /// Most states waiting on the frontier at any one time.
    pub peak_frontier: usize,
    /// False if a state or time limit stopped the search before the frontier ran dry. `best` is
    /// still achievable, it just may not be optimal.
    pub complete: bool,
}

// A state waiting on the frontier, ordered by its upper bound alone.
struct Pending {
    upper_bound: usize,
    state: State,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.upper_bound == other.upper_bound
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.upper_bound.cmp(&other.upper_bound)
    }
}

// Owns the pending states. A popped state is gone once it has been expanded, and so is any
// part of its trail no other pending state shares.
enum Frontier {
    BestFirst(BinaryHeap<Pending>),
    BreadthFirst(VecDeque<Pending>),
    DepthFirst(Vec<Pending>),
}

impl Frontier {
    fn new(order: FrontierOrder) -> Self {
        match order {
            FrontierOrder::BestFirst => Frontier::BestFirst(BinaryHeap::new()),
            FrontierOrder::BreadthFirst => Frontier::BreadthFirst(VecDeque::new()),
            FrontierOrder::DepthFirst => Frontier::DepthFirst(Vec::new()),
        }
    }

    fn push(&mut self, upper_bound: usize, state: State) {
        let pending = Pending { upper_bound, state };
        match self {
            Frontier::BestFirst(heap) => heap.push(pending),
            Frontier::BreadthFirst(queue) => queue.push_back(pending),
            Frontier::DepthFirst(stack) => stack.push(pending),
        }
    }

    fn pop(&mut self) -> Option<Pending> {
        match self {
            Frontier::BestFirst(heap) => heap.pop(),
            Frontier::BreadthFirst(queue) => queue.pop_front(),
            Frontier::DepthFirst(stack) => stack.pop(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Frontier::BestFirst(heap) => heap.len(),
            Frontier::BreadthFirst(queue) => queue.len(),
            Frontier::DepthFirst(stack) => stack.len(),
        }
    }
}

/// Branch-and-bound over the states of a cave. Only the frontier and the best state so far are
/// held; each state carries the trail of choices that led to it.
pub struct Explorer<'a> {
    cave: &'a Cave,
    config: SearchConfig,
    bounder: Bounder<'a>,
}

impl<'a> Explorer<'a> {
    /// Fails if the pressure some state or bound could add up to doesn't fit in a `usize`.
    pub fn new(cave: &'a Cave, config: &SearchConfig) -> Result<Self> {
        let budget = config.budget;
        let ceiling = cave
            .total_flow()
            .and_then(|flow| flow.checked_mul(budget.minutes()))
            .and_then(|flow| flow.checked_mul(budget.searchers() as usize + 1));
        if ceiling.is_none() {
            return Err(Error::PressureOverflow {
                minutes: budget.minutes(),
                searchers: budget.searchers(),
            });
        }
        Ok(Explorer { cave, config: config.clone(), bounder: Bounder::new(cave, budget) })
    }

    pub fn run(&self) -> Outcome {
        let started = Instant::now();
        let budget = self.config.budget;

        let root = State::root(self.cave, &budget);
        let root_bound = self.bounder.upper_bound(&root);
        let mut best = root.clone();

        let mut frontier = Frontier::new(self.config.order);
        frontier.push(root_bound, root);

        let mut children: Vec<State> = Vec::new();
        let (mut pops, mut expanded, mut pruned, mut generated) = (0usize, 0usize, 0usize, 1usize);
        let mut peak_frontier = frontier.len();
        let mut complete = true;
        while let Some(Pending { upper_bound, state }) = frontier.pop() {
            if self.out_of_budget(pops, expanded, started) {
                complete = false;
                break;
            }
            pops += 1;

            if state.value() > best.value() {
                best = state.clone();
                debug!(best_score = best.value(), expanded, "new best");
            }

            // The best score may have gone up since this state was pushed.
            if upper_bound <= best.value() {
                pruned += 1;
                continue;
            }
            trace!(
                position = self.cave.name(state.position()),
                minutes_left = state.minutes_left(),
                value = state.value(),
                upper_bound,
                best_score = best.value(),
                "expanding"
            );

            state.push_successors(self.cave, &budget, &mut children);
            expanded += 1;
            for child in children.drain(..) {
                generated += 1;
                let upper_bound = self.bounder.upper_bound(&child);
                if upper_bound <= best.value() {
                    pruned += 1;
                    continue;
                }
                frontier.push(upper_bound, child);
            }
            peak_frontier = peak_frontier.max(frontier.len());
        }

        let path = self.path_to(&best);
        info!(
            best = best.value(),
            expanded,
            pruned,
            generated,
            peak_frontier,
            complete,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );
        Outcome { best: best.value(), path, expanded, pruned, generated, peak_frontier, complete }
    }

    fn out_of_budget(&self, pops: usize, expanded: usize, started: Instant) -> bool {
        if self.config.max_states.is_some_and(|max| expanded >= max) {
            return true;
        }
        match self.config.time_limit {
            Some(limit) if pops & CLOCK_CHECK_MASK == 0 => started.elapsed() >= limit,
            _ => false,
        }
    }

    fn path_to(&self, state: &State) -> Vec<Step> {
        state
            .history()
            .into_iter()
            .filter_map(|link| match link.choice() {
                Choice::Start => None,
                Choice::Open(slot) => Some(Step::Open {
                    valve: self.cave.name(slot).to_string(),
                    minutes_left: link.minutes_left(),
                }),
                Choice::Handoff => Some(Step::Handoff),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::Budget;
    use crate::testutil::{brute_force, random_records, toy_cave, EXAMPLE, TOY};
    use crate::volcano::Volcano;

    const ORDERS: [FrontierOrder; 3] = [
        FrontierOrder::BestFirst,
        FrontierOrder::BreadthFirst,
        FrontierOrder::DepthFirst,
    ];

    fn explore(cave: &Cave, budget: Budget, order: FrontierOrder) -> Outcome {
        let config = SearchConfig { order, ..SearchConfig::new(budget) };
        Explorer::new(cave, &config).unwrap().run()
    }

    fn open(valve: &str, minutes_left: usize) -> Step {
        Step::Open { valve: valve.to_string(), minutes_left }
    }

    #[test]
    fn test_single_searcher_toy() {
        let cave = toy_cave();
        let volcano = Volcano::parse(TOY, "AA").unwrap();
        let want = brute_force(&volcano, 5, 1);
        assert_eq!(want, 39);
        for order in ORDERS {
            let outcome = explore(&cave, Budget::single(5), order);
            assert_eq!(outcome.best, want, "{order:?}");
            assert!(outcome.complete);
            assert_eq!(outcome.path[0], open("BB", 3));
        }
    }

    #[test]
    fn test_two_searchers_toy() {
        let cave = toy_cave();
        let volcano = Volcano::parse(TOY, "AA").unwrap();
        // One searcher can only open one valve in 4 minutes, so they split them: 13 * 2 + 2 * 2.
        let want = brute_force(&volcano, 4, 2);
        assert_eq!(want, 30);
        assert_eq!(brute_force(&volcano, 4, 1), 26);
        for order in ORDERS {
            let outcome = explore(&cave, Budget::pair(4), order);
            assert_eq!(outcome.best, want, "{order:?}");
            let handoffs = outcome.path.iter().filter(|s| **s == Step::Handoff).count();
            assert_eq!(handoffs, 1);
            assert_eq!(outcome.path.len(), 3);
        }
    }

    #[test]
    fn test_example_single() {
        let cave = Cave::parse(EXAMPLE, "AA").unwrap();
        for order in ORDERS {
            let outcome = explore(&cave, Budget::single(30), order);
            assert_eq!(outcome.best, 1651, "{order:?}");
        }
        let outcome = explore(&cave, Budget::single(30), FrontierOrder::BestFirst);
        assert!(!outcome.path.contains(&Step::Handoff));
        assert_eq!(replay(&cave, &outcome.path), 1651);
        assert!(outcome.pruned > 0);
        assert!(outcome.generated >= outcome.expanded);
    }

    #[test]
    fn test_example_pair() {
        let cave = Cave::parse(EXAMPLE, "AA").unwrap();
        for order in ORDERS {
            let outcome = explore(&cave, Budget::pair(26), order);
            assert_eq!(outcome.best, 1707, "{order:?}");
            assert!(outcome.path.iter().filter(|s| **s == Step::Handoff).count() <= 1);
        }
    }

    #[test]
    fn test_matches_brute_force_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(1707);
        for _ in 0..12 {
            let records = random_records(&mut rng, 6, 0.3);
            let volcano = Volcano::new(&records, "V0").unwrap();
            let cave = Cave::new(volcano.clone()).unwrap();
            let single = brute_force(&volcano, 7, 1);
            let pair = brute_force(&volcano, 5, 2);
            for order in ORDERS {
                assert_eq!(explore(&cave, Budget::single(7), order).best, single);
                assert_eq!(explore(&cave, Budget::pair(5), order).best, pair);
            }
        }
    }

    // Pressure released by following `path`, recomputed from the flow rates.
    fn replay(cave: &Cave, path: &[Step]) -> usize {
        let volcano = cave.volcano();
        path.iter()
            .map(|step| match step {
                Step::Open { valve, minutes_left } => {
                    volcano.flow(volcano.handle(valve).unwrap()) * minutes_left
                }
                Step::Handoff => 0,
            })
            .sum()
    }

    #[test]
    fn test_path_replays_to_best() {
        let cave = Cave::parse(EXAMPLE, "AA").unwrap();
        for order in ORDERS {
            let outcome = explore(&cave, Budget::pair(26), order);
            assert_eq!(replay(&cave, &outcome.path), outcome.best, "{order:?}");
        }
    }

    #[test]
    fn test_nothing_reachable() {
        let input = "\
Valve AA has flow rate=0; tunnel leads to valve BB
Valve BB has flow rate=0; tunnel leads to valve AA
Valve CC has flow rate=9; tunnel leads to valve CC";
        let cave = Cave::parse(input, "AA").unwrap();
        let outcome = explore(&cave, Budget::pair(30), FrontierOrder::BestFirst);
        assert_eq!(outcome.best, 0);
        assert!(outcome.path.is_empty());
        assert!(outcome.complete);
    }

    #[test]
    fn test_state_limit_is_sound() {
        let cave = Cave::parse(EXAMPLE, "AA").unwrap();
        for max_states in [0, 1, 5, 20] {
            let config = SearchConfig {
                max_states: Some(max_states),
                order: FrontierOrder::DepthFirst,
                ..SearchConfig::default()
            };
            let outcome = Explorer::new(&cave, &config).unwrap().run();
            assert!(!outcome.complete);
            assert!(outcome.expanded <= max_states);
            assert!(outcome.best <= 1651);
        }
    }

    #[test]
    fn test_time_limit_is_sound() {
        let cave = Cave::parse(EXAMPLE, "AA").unwrap();
        let config = SearchConfig {
            budget: Budget::pair(26),
            time_limit: Some(Duration::ZERO),
            ..SearchConfig::default()
        };
        let outcome = Explorer::new(&cave, &config).unwrap().run();
        assert!(!outcome.complete);
        assert_eq!(outcome.expanded, 0);
        assert_eq!(outcome.best, 0);
    }

    #[test]
    fn test_frontier_releases_expanded_states() {
        let cave = Cave::parse(EXAMPLE, "AA").unwrap();
        for order in ORDERS {
            let outcome = explore(&cave, Budget::pair(26), order);
            assert_eq!(outcome.best, 1707, "{order:?}");
            // The root left the frontier before anything else was pushed.
            assert!(outcome.peak_frontier > 0);
            assert!(outcome.peak_frontier < outcome.generated, "{order:?}");
        }
    }

    #[test]
    fn test_breadth_first_frontier_shrinks() {
        let cave = toy_cave();
        let budget = Budget::pair(5);
        let root = State::root(&cave, &budget);
        let mut frontier = Frontier::new(FrontierOrder::BreadthFirst);
        for child in root.successors(&cave, &budget) {
            frontier.push(1, child);
        }
        assert_eq!(frontier.len(), 3);

        let first = frontier.pop().unwrap();
        assert_eq!(frontier.len(), 2);
        for child in first.state.successors(&cave, &budget) {
            assert_eq!(child.history().len(), 2);
            frontier.push(1, child);
        }
        drop(first);
        let mut popped = 0;
        while frontier.pop().is_some() {
            popped += 1;
        }
        assert!(popped > 2);
        assert_eq!(frontier.len(), 0);
    }

    #[test]
    fn test_rejects_pressure_that_overflows() {
        let input = "\
Valve AA has flow rate=0; tunnel leads to valve BB
Valve BB has flow rate=1000000000000000000; tunnel leads to valve AA";
        let cave = Cave::parse(input, "AA").unwrap();
        let config = SearchConfig::new(Budget::single(30));
        assert!(matches!(
            Explorer::new(&cave, &config),
            Err(Error::PressureOverflow { minutes: 30, searchers: 1 })
        ));

        // Small enough to add up over the whole budget.
        let input = input.replace("1000000000000000000", "1000000000");
        let cave = Cave::parse(&input, "AA").unwrap();
        assert_eq!(Explorer::new(&cave, &config).unwrap().run().best, 1000000000 * 28);
    }
}
