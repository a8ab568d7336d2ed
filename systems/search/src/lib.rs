#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-first search over exact physics states.
//!
//! The [`Planner`] simulates every action from every expanded state through a
//! [`PhysicsModel`] and identifies states by a reduced-precision key
//! ([`NormalizedState`]). The flood engine's cost field serves as the
//! heuristic: an open-set entry is ordered by the cost at the state's exact
//! pixel plus the number of ticks spent reaching it.
//!
//! Near walls the key keeps fine positional precision, far from walls it gets
//! coarser, which keeps the search graph small in open areas.

mod frontier;
mod node;
mod normalize;

use std::collections::HashMap;
use std::time::Instant;

use helirin_core::{
    Action, ConfigError, ExactState, GameStatus, MapView, PhysicsModel, Pixel, PlannerConfig,
    SearchTuning, WallClipPolicy,
};
use helirin_system_flooding::{CostError, CostField, FieldError, Flooding};
use thiserror::Error;

use crate::frontier::OpenSet;
use crate::node::SearchNode;

pub use normalize::{NormalizedState, ReductionUnits};

/// Reasons a planner cannot be built or a search cannot run.
#[derive(Debug, Error)]
pub enum SearchError {
    /// `solve` was called before any cost map was computed.
    #[error("no cost map has been computed")]
    CostMapMissing,
    /// A state lies outside the planning window.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// The planner tuning is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The cost-map multipliers are invalid.
    #[error(transparent)]
    Cost(#[from] CostError),
    /// Walking predecessors from the goal never reached the initial state.
    #[error("predecessor chain broke after {steps} steps")]
    BrokenChain {
        /// Links followed before giving up.
        steps: usize,
    },
}

/// Outcome of one search together with its effort counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Actions leading to a win in chronological order, if one was found.
    pub actions: Option<Vec<Action>>,
    /// Open-set entries expanded.
    pub expanded: usize,
    /// Keys recorded for the first time.
    pub discovered: usize,
    /// Recorded keys replaced by a cheaper candidate.
    pub improved: usize,
    /// Superseded open-set entries skipped when popped.
    pub stale: usize,
    /// Largest open-set size reached.
    pub open_high_water: usize,
}

/// Plans action sequences inside a fixed pixel window.
#[derive(Debug)]
pub struct Planner<M, P> {
    flooding: Flooding<M>,
    physics: P,
    tuning: SearchTuning,
    cost_map: Option<CostField>,
}

impl<M: MapView, P: PhysicsModel> Planner<M, P> {
    /// Builds the static flood fields for `[start, end]`.
    ///
    /// No cost map exists until [`Planner::compute_new_cost_maps`] is called.
    pub fn new(
        map: M,
        physics: P,
        start: Pixel,
        end: Pixel,
        config: &PlannerConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        let flooding = Flooding::new(map, start, end, config.flood)?;
        Ok(Self {
            flooding,
            physics,
            tuning: config.search,
            cost_map: None,
        })
    }

    /// Rebuilds the active cost map for the wall-clip policy.
    ///
    /// Invalid multipliers leave the previous cost map in place.
    pub fn compute_new_cost_maps(
        &mut self,
        gwb_mult: f32,
        wgm_mult: f32,
        policy: WallClipPolicy,
    ) -> Result<(), SearchError> {
        self.cost_map = Some(self.flooding.compute_cost_map(gwb_mult, wgm_mult, policy)?);
        Ok(())
    }

    /// Cost map the next search will use as its heuristic.
    #[must_use]
    pub fn current_cost_map(&self) -> Option<&CostField> {
        self.cost_map.as_ref()
    }

    /// Static flood fields backing the planner.
    #[must_use]
    pub fn flooding(&self) -> &Flooding<M> {
        &self.flooding
    }

    /// Physics model used for simulation.
    #[must_use]
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Search tuning in effect.
    #[must_use]
    pub fn tuning(&self) -> &SearchTuning {
        &self.tuning
    }

    /// Upper-left corner of the planning window.
    #[must_use]
    pub fn pixel_start(&self) -> Pixel {
        self.flooding.pixel_start()
    }

    /// Lower-right corner of the planning window.
    #[must_use]
    pub fn pixel_end(&self) -> Pixel {
        self.flooding.pixel_end()
    }

    /// Quanta applied to a state, scaled by its distance to the nearest wall.
    pub fn reduction_units(&self, state: &ExactState) -> Result<ReductionUnits, SearchError> {
        let pixel = self.physics.state_pixel(state);
        let wall_distance = self.flooding.dist_to_wall(pixel)?;
        Ok(ReductionUnits::at_distance(
            wall_distance,
            self.physics.angular_resolution(),
            &self.tuning,
        ))
    }

    /// Search key of an exact state.
    pub fn normalise_state(&self, state: &ExactState) -> Result<NormalizedState, SearchError> {
        Ok(self.reduction_units(state)?.apply(state))
    }

    /// Searches for actions that take `initial` to a winning state.
    ///
    /// `Ok(None)` means every reachable state was explored without a win.
    pub fn solve(&self, initial: &ExactState) -> Result<Option<Vec<Action>>, SearchError> {
        Ok(self.solve_with_report(initial)?.actions)
    }

    /// Runs [`Planner::solve`] and reports how much work the search did.
    pub fn solve_with_report(&self, initial: &ExactState) -> Result<SearchReport, SearchError> {
        let Some(costs) = self.cost_map.as_ref() else {
            return Err(SearchError::CostMapMissing);
        };
        let began = Instant::now();
        let mut report = SearchReport::default();

        let initial_pixel = self.physics.state_pixel(initial);
        let seed_cost = costs.get(initial_pixel)?;
        let seed_key = self.normalise_state(initial)?;

        match initial.status {
            GameStatus::Win => {
                report.actions = Some(Vec::new());
                return Ok(report);
            }
            GameStatus::Lose => return Ok(report),
            GameStatus::Ongoing => {}
        }

        let mut records: HashMap<NormalizedState, SearchNode> = HashMap::new();
        let mut open = OpenSet::default();

        let seed = SearchNode {
            exact: *initial,
            weight: 0,
            cost: seed_cost,
            action: None,
            previous: None,
            ticket: 0,
        };
        let ticket = open.push(seed_key, seed.total());
        let _ = records.insert(seed_key, SearchNode { ticket, ..seed });
        report.discovered += 1;

        let mut goal = None;
        'search: while let Some((key, entry)) = open.pop() {
            let Some(current) = records.get(&key).copied() else {
                continue;
            };
            if current.ticket != entry.ticket {
                report.stale += 1;
                continue;
            }
            report.expanded += 1;
            tracing::trace!(
                weight = current.weight,
                cost = current.cost,
                xpos = current.exact.xpos,
                ypos = current.exact.ypos,
                "expanding state",
            );

            for action in Action::ALL {
                let next = self.physics.next(&current.exact, action);
                if next.status == GameStatus::Lose {
                    continue;
                }
                let pixel = self.physics.state_pixel(&next);
                if !self.flooding.contains(pixel) {
                    continue;
                }

                let next_key = self.normalise_state(&next)?;
                let candidate = SearchNode {
                    exact: next,
                    weight: current.weight + 1,
                    cost: costs.get(pixel)?,
                    action: Some(action),
                    previous: Some(key),
                    ticket: 0,
                };
                let total = candidate.total();

                match records.get(&next_key) {
                    None => report.discovered += 1,
                    Some(recorded) if total < recorded.total() => report.improved += 1,
                    Some(_) => continue,
                }

                let ticket = open.push(next_key, total);
                let _ = records.insert(next_key, SearchNode { ticket, ..candidate });

                if next.status == GameStatus::Win {
                    goal = Some(next_key);
                    break 'search;
                }
            }
        }

        report.open_high_water = open.high_water();
        if let Some(goal) = goal {
            report.actions = Some(reconstruct(&records, goal)?);
        }

        tracing::info!(
            solved = report.actions.is_some(),
            plan_len = report.actions.as_ref().map_or(0, Vec::len) as u64,
            expanded = report.expanded as u64,
            discovered = report.discovered as u64,
            improved = report.improved as u64,
            elapsed_ms = began.elapsed().as_millis() as u64,
            "search finished",
        );

        Ok(report)
    }
}

/// Walks predecessor keys back from `goal` and returns the actions in order.
///
/// A key may be re-recorded after its descendants were, so the chain is
/// bounded by the number of records instead of trusted to terminate.
fn reconstruct(
    records: &HashMap<NormalizedState, SearchNode>,
    goal: NormalizedState,
) -> Result<Vec<Action>, SearchError> {
    let mut actions = Vec::new();
    let mut cursor = Some(goal);
    let mut steps = 0;

    while let Some(key) = cursor {
        let Some(node) = records.get(&key) else {
            return Err(SearchError::BrokenChain { steps });
        };
        if steps > records.len() {
            return Err(SearchError::BrokenChain { steps });
        }
        if let Some(action) = node.action {
            actions.push(action);
        }
        cursor = node.previous;
        steps += 1;
    }

    actions.reverse();
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(x: i32) -> NormalizedState {
        NormalizedState {
            xpos: x,
            ypos: 0,
            xb: 0,
            yb: 0,
            rot: 0,
            rot_rate: 0,
        }
    }

    fn node(action: Option<u8>, previous: Option<i32>) -> SearchNode {
        SearchNode {
            exact: ExactState::default(),
            weight: 0,
            cost: 0.0,
            action: action.and_then(Action::new),
            previous: previous.map(key),
            ticket: 0,
        }
    }

    #[test]
    fn reconstruction_is_chronological_and_skips_the_seed() {
        let mut records = HashMap::new();
        let _ = records.insert(key(0), node(None, None));
        let _ = records.insert(key(1), node(Some(3), Some(0)));
        let _ = records.insert(key(2), node(Some(7), Some(1)));
        let _ = records.insert(key(3), node(Some(24), Some(2)));

        let actions = reconstruct(&records, key(3)).expect("chain reaches the seed");
        let indices: Vec<u8> = actions.iter().map(Action::index).collect();
        assert_eq!(indices, vec![3, 7, 24]);
    }

    #[test]
    fn reconstruction_detects_cycles() {
        let mut records = HashMap::new();
        let _ = records.insert(key(1), node(Some(1), Some(2)));
        let _ = records.insert(key(2), node(Some(2), Some(1)));

        assert!(matches!(
            reconstruct(&records, key(1)),
            Err(SearchError::BrokenChain { .. })
        ));
    }

    #[test]
    fn reconstruction_reports_missing_links() {
        let mut records = HashMap::new();
        let _ = records.insert(key(5), node(Some(1), Some(4)));

        assert!(matches!(
            reconstruct(&records, key(5)),
            Err(SearchError::BrokenChain { steps: 1 })
        ));
    }
}
