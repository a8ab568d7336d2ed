//! Open set ordered by estimated total cost.
//!
//! `BinaryHeap` has no decrease-key, so an improved key is pushed again under a
//! fresh ticket. Only the entry whose ticket matches the key's current record
//! is live; older entries are dropped when they surface.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::normalize::NormalizedState;

/// Ordering key: lower total first, then older tickets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FrontierKey {
    pub(crate) total: f32,
    pub(crate) ticket: u64,
}

impl Eq for FrontierKey {}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total
            .total_cmp(&other.total)
            .then(self.ticket.cmp(&other.ticket))
    }
}

#[derive(Debug)]
struct FrontierEntry {
    key: Reverse<FrontierKey>,
    state: NormalizedState,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-priority open set keyed by normalised state.
#[derive(Debug, Default)]
pub(crate) struct OpenSet {
    heap: BinaryHeap<FrontierEntry>,
    next_ticket: u64,
    high_water: usize,
}

impl OpenSet {
    /// Queues the state and returns the ticket identifying this entry.
    pub(crate) fn push(&mut self, state: NormalizedState, total: f32) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.heap.push(FrontierEntry {
            key: Reverse(FrontierKey { total, ticket }),
            state,
        });
        self.high_water = self.high_water.max(self.heap.len());
        ticket
    }

    /// Pops the entry with the lowest total, stale or not.
    pub(crate) fn pop(&mut self) -> Option<(NormalizedState, FrontierKey)> {
        self.heap.pop().map(|entry| (entry.state, entry.key.0))
    }

    /// Largest number of entries held at once.
    pub(crate) fn high_water(&self) -> usize {
        self.high_water
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(x: i32) -> NormalizedState {
        NormalizedState {
            xpos: x,
            ypos: 0,
            xb: 0,
            yb: 0,
            rot: 0,
            rot_rate: 0,
        }
    }

    #[test]
    fn pops_lowest_total_first() {
        let mut open = OpenSet::default();
        let _ = open.push(state(0), 10.0);
        let _ = open.push(state(1), 5.0);
        let _ = open.push(state(2), 15.0);

        let (first, key) = open.pop().expect("open set is not empty");
        assert_eq!(first, state(1));
        assert!((key.total - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn equal_totals_pop_in_insertion_order() {
        let mut open = OpenSet::default();
        let first = open.push(state(3), 2.0);
        let second = open.push(state(4), 2.0);
        assert!(first < second);

        assert_eq!(open.pop().map(|(s, _)| s), Some(state(3)));
        assert_eq!(open.pop().map(|(s, _)| s), Some(state(4)));
        assert!(open.pop().is_none());
    }

    #[test]
    fn infinite_totals_sink_to_the_bottom() {
        let mut open = OpenSet::default();
        let _ = open.push(state(0), f32::INFINITY);
        let _ = open.push(state(1), 1.0e9);

        assert_eq!(open.pop().map(|(s, _)| s), Some(state(1)));
        assert_eq!(open.high_water(), 2);
    }
}
