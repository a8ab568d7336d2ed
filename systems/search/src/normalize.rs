//! Variable-resolution quantisation of exact physics states.

use helirin_core::{ExactState, GameStatus, SearchTuning};

/// Reduced-precision projection of an [`ExactState`] used as a search key.
///
/// Two exact states that normalise to the same key are the same search node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedState {
    /// Quantised horizontal position.
    pub xpos: i32,
    /// Quantised vertical position.
    pub ypos: i32,
    /// Quantised horizontal bump.
    pub xb: i32,
    /// Quantised vertical bump.
    pub yb: i32,
    /// Quantised rotation.
    pub rot: i16,
    /// Quantised rotation rate.
    pub rot_rate: i16,
}

impl NormalizedState {
    /// Ongoing exact state lying exactly on this quantisation point.
    #[must_use]
    pub const fn representative(&self) -> ExactState {
        ExactState {
            xpos: self.xpos,
            ypos: self.ypos,
            xb: self.xb,
            yb: self.yb,
            rot: self.rot,
            rot_rate: self.rot_rate,
            status: GameStatus::Ongoing,
        }
    }
}

/// Quanta applied to each component of a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReductionUnits {
    /// Position quantum.
    pub position: i32,
    /// Bump quantum.
    pub bump: i32,
    /// Rotation quantum.
    pub rotation: i16,
    /// Rotation-rate quantum.
    pub rotation_rate: i16,
}

impl ReductionUnits {
    /// Quanta for a state lying `wall_distance` pixels from the nearest wall.
    ///
    /// Position and bump quanta grow by one step per wall thickness; a
    /// non-finite distance means the window has no wall and uses the
    /// configured open-space multiplier.
    #[must_use]
    pub(crate) fn at_distance(
        wall_distance: f32,
        angular_resolution: i16,
        tuning: &SearchTuning,
    ) -> Self {
        let units = wall_distance_units(wall_distance, tuning);
        Self {
            position: tuning.position_reduction.saturating_mul(units),
            bump: tuning.bump_reduction.saturating_mul(units),
            rotation: angular_resolution.max(1),
            rotation_rate: angular_resolution.max(1),
        }
    }

    /// Projects the state onto the quantisation grid.
    #[must_use]
    pub fn apply(&self, state: &ExactState) -> NormalizedState {
        NormalizedState {
            xpos: round_to_multiple(state.xpos, self.position),
            ypos: round_to_multiple(state.ypos, self.position),
            xb: round_to_multiple(state.xb, self.bump),
            yb: round_to_multiple(state.yb, self.bump),
            rot: round_angle(state.rot, self.rotation),
            rot_rate: round_angle(state.rot_rate, self.rotation_rate),
        }
    }
}

fn wall_distance_units(wall_distance: f32, tuning: &SearchTuning) -> i32 {
    if !wall_distance.is_finite() {
        return tuning.open_space_units;
    }
    // Truncate first, then divide by whole tiles.
    (wall_distance as i32)
        .checked_div(tuning.tile_size_px)
        .map_or(1, |tiles| tiles.saturating_add(1))
}

/// Rounds to the nearest multiple of `unit`, ties to even.
fn round_to_multiple(value: i32, unit: i32) -> i32 {
    let steps = (f64::from(value) / f64::from(unit)).round_ties_even();
    (steps as i32).saturating_mul(unit)
}

/// Rotations are 16-bit angles, so rounding past the end wraps around.
fn round_angle(value: i16, unit: i16) -> i16 {
    round_to_multiple(i32::from(value), i32::from(unit)) as i16
}
