//! Min-priority queue over window offsets.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::field::Window;

#[derive(Clone, Copy, Debug)]
struct Entry {
    weight: f32,
    sequence: u64,
    index: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap yields the lightest, oldest entry first.
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra frontier with decrease-key by reinsertion.
///
/// Improving a pixel pushes a second entry; the outdated one is discarded when
/// popped because its weight no longer matches the settled value.
#[derive(Debug, Default)]
pub(crate) struct PixelQueue {
    heap: BinaryHeap<Entry>,
    sequence: u64,
}

impl PixelQueue {
    pub(crate) fn push(&mut self, index: usize, weight: f32) {
        self.heap.push(Entry {
            weight,
            sequence: self.sequence,
            index,
        });
        self.sequence += 1;
    }

    /// Pops the lightest entry whose weight still matches `weights`.
    pub(crate) fn pop_current(&mut self, weights: &[f32]) -> Option<(usize, f32)> {
        while let Some(entry) = self.heap.pop() {
            let current = weights.get(entry.index).copied()?;
            if entry.weight > current {
                continue;
            }
            return Some((entry.index, entry.weight));
        }
        None
    }
}

/// Runs Dijkstra over `weights`, which must already hold the seed values with
/// every seed pushed onto `queue`.
///
/// `edge_cost` receives the settled source, the neighbour and the step length
/// and returns the cost of the edge, or `None` when the edge is forbidden.
pub(crate) fn relax<F>(
    window: &Window,
    weights: &mut [f32],
    queue: &mut PixelQueue,
    mut edge_cost: F,
) where
    F: FnMut(usize, usize, f32) -> Option<f32>,
{
    while let Some((index, weight)) = queue.pop_current(weights) {
        let Some(pixel) = window.pixel_at(index) else {
            continue;
        };

        for step in window.neighbors(pixel) {
            let Some(neighbor) = window.offset(step.to) else {
                continue;
            };
            let Some(cost) = edge_cost(index, neighbor, step.length) else {
                continue;
            };

            let candidate = weight + cost;
            if candidate < weights[neighbor] {
                weights[neighbor] = candidate;
                queue.push(neighbor, candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lightest_first_and_breaks_ties_by_age() {
        let weights = [4.0, 1.0, 1.0, 0.5];
        let mut queue = PixelQueue::default();
        queue.push(0, 4.0);
        queue.push(2, 1.0);
        queue.push(1, 1.0);
        queue.push(3, 0.5);

        assert_eq!(queue.pop_current(&weights), Some((3, 0.5)));
        assert_eq!(queue.pop_current(&weights), Some((2, 1.0)));
        assert_eq!(queue.pop_current(&weights), Some((1, 1.0)));
        assert_eq!(queue.pop_current(&weights), Some((0, 4.0)));
        assert_eq!(queue.pop_current(&weights), None);
    }

    #[test]
    fn outdated_entries_are_skipped() {
        let mut weights = [5.0, 3.0];
        let mut queue = PixelQueue::default();
        queue.push(0, 5.0);
        queue.push(1, 3.0);
        weights[0] = 2.0;
        queue.push(0, 2.0);

        assert_eq!(queue.pop_current(&weights), Some((0, 2.0)));
        assert_eq!(queue.pop_current(&weights), Some((1, 3.0)));
        assert_eq!(queue.pop_current(&weights), None);
    }
}
