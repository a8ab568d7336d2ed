//! Records kept for every normalised state the search has accepted.

use helirin_core::{Action, ExactState};

use crate::normalize::NormalizedState;

/// Best known way of reaching one normalised state.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchNode {
    /// Exact state simulation continues from.
    pub(crate) exact: ExactState,
    /// Ticks spent since the initial state.
    pub(crate) weight: u32,
    /// Cost-field estimate at the exact pixel.
    pub(crate) cost: f32,
    /// Action that produced the state; absent for the seed.
    pub(crate) action: Option<Action>,
    /// Key of the state this one was reached from.
    pub(crate) previous: Option<NormalizedState>,
    /// Ticket of the live open-set entry for this record.
    pub(crate) ticket: u64,
}

impl SearchNode {
    /// Estimated total cost through this node.
    pub(crate) fn total(&self) -> f32 {
        self.cost + self.weight as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_adds_ticks_to_the_estimate() {
        let node = SearchNode {
            exact: ExactState::default(),
            weight: 4,
            cost: 2.5,
            action: None,
            previous: None,
            ticket: 0,
        };
        assert!((node.total() - 6.5).abs() < f32::EPSILON);

        let unreachable = SearchNode {
            cost: f32::INFINITY,
            ..node
        };
        assert!(unreachable.total().is_infinite());
    }
}
