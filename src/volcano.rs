use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::parse::{parse_records, ValveRecord};

/// Rooms are addressed by a `u8`, so a volcano holds at most this many.
pub const MAX_ROOMS: usize = u8::MAX as usize + 1;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RoomHandle(u8);

impl RoomHandle {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Room {
    name: String,
    flow_rate: usize,
    tunnels: Vec<(RoomHandle, usize)>,
    active: bool,
}

/// The tunnel network: an arena of rooms, each with a valve and a list of weighted, undirected
/// tunnels. Removing a room only deactivates its slot, so handles stay valid for the life of the
/// volcano.
#[derive(Clone, Debug)]
pub struct Volcano {
    rooms: Vec<Room>,
    handle_for: HashMap<String, RoomHandle>,
    start: RoomHandle,
}

impl Volcano {
    /// Build the network from parsed records, with a one-minute tunnel for every listed
    /// neighbor. Tunnels are added in both directions even if only one side lists them.
    pub fn new(records: &[ValveRecord], start: &str) -> Result<Self> {
        if records.len() > MAX_ROOMS {
            return Err(Error::TooManyRooms { count: records.len(), max: MAX_ROOMS });
        }

        // Declare every room before wiring tunnels, since tunnels can point forward.
        let mut rooms = Vec::with_capacity(records.len());
        let mut handle_for = HashMap::with_capacity(records.len());
        for (i, rec) in records.iter().enumerate() {
            let rh = RoomHandle(i as u8);
            if handle_for.insert(rec.name.clone(), rh).is_some() {
                return Err(Error::DuplicateValve { valve: rec.name.clone() });
            }
            rooms.push(Room {
                name: rec.name.clone(),
                flow_rate: rec.flow_rate,
                tunnels: Vec::new(),
                active: true,
            });
        }

        let Some(&start) = handle_for.get(start) else {
            return Err(Error::UnknownStart { valve: start.to_string() });
        };

        let mut volcano = Volcano { rooms, handle_for, start };
        for (i, rec) in records.iter().enumerate() {
            let src = RoomHandle(i as u8);
            for name in &rec.tunnels {
                let Some(dst) = volcano.handle(name) else {
                    return Err(Error::UnknownNeighbor {
                        valve: rec.name.clone(),
                        neighbor: name.clone(),
                    });
                };
                if dst != src {
                    volcano.connect(src, dst, 1);
                }
            }
        }
        Ok(volcano)
    }

    /// Parse scan output and build the network from it.
    pub fn parse(input: &str, start: &str) -> Result<Self> {
        Volcano::new(&parse_records(input)?, start)
    }

    pub fn start(&self) -> RoomHandle {
        self.start
    }

    /// Number of slots in the arena, including deactivated rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn handle(&self, name: &str) -> Option<RoomHandle> {
        self.handle_for.get(name).copied()
    }

    pub fn name(&self, rh: RoomHandle) -> &str {
        &self.rooms[rh.as_usize()].name
    }

    pub fn flow(&self, rh: RoomHandle) -> usize {
        self.rooms[rh.as_usize()].flow_rate
    }

    pub fn is_active(&self, rh: RoomHandle) -> bool {
        self.rooms[rh.as_usize()].active
    }

    /// Active rooms, in handle order.
    pub fn rooms(&self) -> impl Iterator<Item = RoomHandle> + '_ {
        self.rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| room.active)
            .map(|(i, _)| RoomHandle(i as u8))
    }

    pub fn tunnels(&self, rh: RoomHandle) -> &[(RoomHandle, usize)] {
        &self.rooms[rh.as_usize()].tunnels
    }

    pub fn tunnel(&self, src: RoomHandle, dst: RoomHandle) -> Option<usize> {
        self.tunnels(src)
            .iter()
            .find(|&&(rh, _)| rh == dst)
            .map(|&(_, cost)| cost)
    }

    // Add a tunnel in both directions, or shorten the existing one.
    fn connect(&mut self, a: RoomHandle, b: RoomHandle, cost: usize) {
        for (src, dst) in [(a, b), (b, a)] {
            let tunnels = &mut self.rooms[src.as_usize()].tunnels;
            match tunnels.iter_mut().find(|(rh, _)| *rh == dst) {
                Some((_, w)) => *w = (*w).min(cost),
                None => tunnels.push((dst, cost)),
            }
        }
    }

    /// Remove a room, replacing every path through it with a direct tunnel between each pair of
    /// its neighbors. Returns false for the start room and for rooms that are already gone.
    pub fn eliminate(&mut self, rh: RoomHandle) -> bool {
        if rh == self.start || !self.is_active(rh) {
            return false;
        }
        let room = &mut self.rooms[rh.as_usize()];
        room.active = false;
        let tunnels = std::mem::take(&mut room.tunnels);

        for &(neighbor, _) in &tunnels {
            self.rooms[neighbor.as_usize()].tunnels.retain(|&(dst, _)| dst != rh);
        }
        for (i, &(a, cost_a)) in tunnels.iter().enumerate() {
            for &(b, cost_b) in &tunnels[i + 1..] {
                self.connect(a, b, cost_a + cost_b);
            }
        }
        trace!(room = self.name(rh), neighbors = tunnels.len(), "eliminated room");
        true
    }

    /// Remove every room whose valve has no flow, except the start room. Shortest distances
    /// between the remaining rooms don't change. Returns the number of rooms removed.
    pub fn compact(&mut self) -> usize {
        let zero_flow_rooms: Vec<RoomHandle> = self
            .rooms()
            .filter(|&rh| self.flow(rh) == 0 && rh != self.start)
            .collect();
        let removed = zero_flow_rooms
            .into_iter()
            .filter(|&rh| self.eliminate(rh))
            .count();
        debug!(removed, remaining = self.rooms().count(), "compacted volcano");
        removed
    }
}
