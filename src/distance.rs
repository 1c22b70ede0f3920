use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use tracing::{debug, trace};

use crate::volcano::{RoomHandle, Volcano};

#[derive(Clone, PartialEq, Eq)]
pub struct SquareArray {
    cols: usize,
    data: Vec<Option<usize>>,
}

impl SquareArray {
    pub fn new(cols: usize) -> Self {
        Self { cols, data: vec![None; cols * cols] }
    }

    pub fn get(&self, src: usize, dst: usize) -> Option<usize> {
        self.data[src * self.cols + dst]
    }

    pub fn set(&mut self, src: usize, dst: usize, v: Option<usize>) {
        self.data[src * self.cols + dst] = v;
    }

    pub fn row(&self, y: usize) -> &[Option<usize>] {
        let start = y * self.cols;
        &self.data[start..(start + self.cols)]
    }
}

impl fmt::Display for SquareArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for src in 0..self.cols {
            for &w in self.row(src) {
                match w {
                    Some(w) => write!(f, "{:>3}", w)?,
                    None => write!(f, "{:>3}", "-")?,
                }
            }
            writeln!(f)?
        }
        Ok(())
    }
}

impl fmt::Debug for SquareArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Shortest walking distances between every pair of active rooms. Each active room gets a dense
/// slot, in handle order, which is what the search uses to address rooms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceIndex {
    rooms: Vec<RoomHandle>,
    slot_for: Vec<Option<usize>>,
    table: SquareArray,
}

impl DistanceIndex {
    pub fn build(volcano: &Volcano) -> Self {
        let rooms: Vec<RoomHandle> = volcano.rooms().collect();
        let mut slot_for = vec![None; volcano.len()];
        for (slot, rh) in rooms.iter().enumerate() {
            slot_for[rh.as_usize()] = Some(slot);
        }

        let mut table = SquareArray::new(rooms.len());
        let mut settled = vec![false; volcano.len()];
        let mut queue: BinaryHeap<Reverse<(usize, RoomHandle)>> = BinaryHeap::new();
        for (src, &start) in rooms.iter().enumerate() {
            settled.fill(false);
            queue.clear();
            queue.push(Reverse((0, start)));

            while let Some(Reverse((dist, rh))) = queue.pop() {
                if settled[rh.as_usize()] {
                    continue;
                }
                settled[rh.as_usize()] = true;
                if let Some(dst) = slot_for[rh.as_usize()] {
                    table.set(src, dst, Some(dist));
                }
                for &(next, cost) in volcano.tunnels(rh) {
                    if !settled[next.as_usize()] {
                        queue.push(Reverse((dist + cost, next)));
                    }
                }
            }
        }

        debug!(rooms = rooms.len(), "built distance index");
        trace!("distances:\n{table}");
        DistanceIndex { rooms, slot_for, table }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms in slot order.
    pub fn rooms(&self) -> &[RoomHandle] {
        &self.rooms
    }

    pub fn room(&self, slot: usize) -> RoomHandle {
        self.rooms[slot]
    }

    pub fn slot(&self, rh: RoomHandle) -> Option<usize> {
        self.slot_for.get(rh.as_usize()).copied().flatten()
    }

    /// Distance between two slots, or `None` if no path connects them.
    pub fn get(&self, src: usize, dst: usize) -> Option<usize> {
        self.table.get(src, dst)
    }

    /// Distance between two rooms, or `None` if either was removed or they aren't connected.
    pub fn between(&self, src: RoomHandle, dst: RoomHandle) -> Option<usize> {
        self.get(self.slot(src)?, self.slot(dst)?)
    }

    pub fn table(&self) -> &SquareArray {
        &self.table
    }
}
