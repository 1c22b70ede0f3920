//! Fixtures shared by the unit tests.

use rand::Rng;

use crate::cave::Cave;
use crate::parse::ValveRecord;
use crate::volcano::{RoomHandle, Volcano};

pub const EXAMPLE: &str = "\
Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
Valve BB has flow rate=13; tunnels lead to valves CC, AA
Valve CC has flow rate=2; tunnels lead to valves DD, BB
Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
Valve EE has flow rate=3; tunnels lead to valves FF, DD
Valve FF has flow rate=0; tunnels lead to valves EE, GG
Valve GG has flow rate=0; tunnels lead to valves FF, HH
Valve HH has flow rate=22; tunnel leads to valve GG
Valve II has flow rate=0; tunnels lead to valves AA, JJ
Valve JJ has flow rate=21; tunnel leads to valve II";

/// BB and CC are both one tunnel away from AA, and two from each other.
pub const TOY: &str = "\
Valve AA has flow rate=0; tunnels lead to valves BB, CC
Valve BB has flow rate=13; tunnel leads to valve AA
Valve CC has flow rate=2; tunnel leads to valve AA";

pub fn toy_cave() -> Cave {
    Cave::parse(TOY, "AA").unwrap()
}

/// Rooms `V0`..`Vn`, mostly connected: each room links back to an earlier one with high
/// probability, plus a few extra tunnels. About `zero_flow` of them have no flow.
pub fn random_records(rng: &mut impl Rng, n: usize, zero_flow: f64) -> Vec<ValveRecord> {
    let names: Vec<String> = (0..n).map(|i| format!("V{i}")).collect();
    let mut tunnels: Vec<Vec<&str>> = vec![Vec::new(); n];
    for i in 1..n {
        if rng.gen_bool(0.9) {
            let j = rng.gen_range(0..i);
            tunnels[i].push(&names[j]);
        }
    }
    for _ in 0..n / 2 {
        let (i, j) = (rng.gen_range(0..n), rng.gen_range(0..n));
        tunnels[i].push(&names[j]);
    }
    (0..n)
        .map(|i| {
            let flow = if rng.gen_bool(zero_flow) { 0 } else { rng.gen_range(1..=25) };
            ValveRecord::new(&names[i], flow, &tunnels[i])
        })
        .collect()
}

/// Most pressure that can be released by playing out every move minute by minute on the raw,
/// uncompacted network. Searchers go one after another and share opened valves. Only usable on
/// tiny inputs.
pub fn brute_force(volcano: &Volcano, minutes: usize, searchers: u8) -> usize {
    let mut opened = vec![false; volcano.len()];
    walk(volcano, volcano.start(), minutes, minutes, searchers - 1, 0, &mut opened)
}

fn walk(
    volcano: &Volcano,
    room: RoomHandle,
    minutes_left: usize,
    minutes: usize,
    idle: u8,
    released: usize,
    opened: &mut [bool],
) -> usize {
    let mut best = released;
    if idle > 0 {
        let next = walk(volcano, volcano.start(), minutes, minutes, idle - 1, released, opened);
        best = best.max(next);
    }
    if minutes_left == 0 {
        return best;
    }
    let flow = volcano.flow(room);
    if flow > 0 && !opened[room.as_usize()] {
        opened[room.as_usize()] = true;
        let gained = released + flow * (minutes_left - 1);
        best = best.max(walk(volcano, room, minutes_left - 1, minutes, idle, gained, opened));
        opened[room.as_usize()] = false;
    }
    for &(next, cost) in volcano.tunnels(room) {
        if cost <= minutes_left {
            let got = walk(volcano, next, minutes_left - cost, minutes, idle, released, opened);
            best = best.max(got);
        }
    }
    best
}
