//! Deterministic point-mass simulation used to exercise the planner.

use helirin_core::{Action, ExactState, GameStatus, MapView, PhysicsModel, Zone};
use serde::{Deserialize, Serialize};

const FIXED_POINT_SHIFT: u32 = 16;

/// Parameters of the point-mass simulation, in 16.16 fixed-point units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointMassConfig {
    /// Bump gained per tick for each unit of axis input.
    pub acceleration: i32,
    /// Largest bump magnitude allowed on either axis.
    pub max_speed: i32,
    /// Angular resolution reported to the planner.
    pub angular_resolution: i16,
}

impl Default for PointMassConfig {
    fn default() -> Self {
        Self {
            acceleration: 0x10000 / 8,
            max_speed: 0x10000 * 2,
            angular_resolution: 0x100,
        }
    }
}

/// Craft modelled as a point whose bump is steered by the action's axes.
///
/// The craft loses as soon as its pixel is inside a wall and wins as soon as
/// it reaches the ending zone. Terminal states no longer change.
#[derive(Clone, Debug)]
pub struct PointMassPhysics<M> {
    map: M,
    config: PointMassConfig,
}

impl<M: MapView> PointMassPhysics<M> {
    /// Creates a simulation over the provided map.
    #[must_use]
    pub fn new(map: M, config: PointMassConfig) -> Self {
        Self { map, config }
    }

    /// Parameters in use.
    #[must_use]
    pub fn config(&self) -> &PointMassConfig {
        &self.config
    }

    fn advance_axis(&self, bump: i32, input: i8) -> i32 {
        let accelerated =
            bump.saturating_add(i32::from(input).saturating_mul(self.config.acceleration));
        accelerated.clamp(-self.config.max_speed, self.config.max_speed)
    }
}

impl<M: MapView> PhysicsModel for PointMassPhysics<M> {
    fn next(&self, state: &ExactState, action: Action) -> ExactState {
        if state.status != GameStatus::Ongoing {
            return *state;
        }

        let (horizontal, vertical) = action.axes();
        let xb = self.advance_axis(state.xb, horizontal);
        let yb = self.advance_axis(state.yb, vertical);

        let mut next = ExactState {
            xpos: state.xpos.saturating_add(xb),
            ypos: state.ypos.saturating_add(yb),
            xb,
            yb,
            rot: state.rot.wrapping_add(state.rot_rate),
            rot_rate: state.rot_rate,
            status: GameStatus::Ongoing,
        };

        let pixel = self.state_pixel(&next);
        next.status = if self.map.is_pixel_in_collision(pixel) {
            GameStatus::Lose
        } else if self.map.pixel_zone(pixel) == Some(Zone::Ending) {
            GameStatus::Win
        } else {
            GameStatus::Ongoing
        };
        next
    }

    fn position_to_pixel(&self, position: i32) -> i32 {
        position >> FIXED_POINT_SHIFT
    }

    fn angular_resolution(&self) -> i16 {
        self.config.angular_resolution
    }
}

/// Converts a pixel coordinate to the fixed-point position of its centre.
#[must_use]
pub fn pixel_centre(pixel: i32) -> i32 {
    (pixel << FIXED_POINT_SHIFT) + (1 << (FIXED_POINT_SHIFT - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileMap;

    fn corridor() -> TileMap {
        TileMap::from_ascii("#######\n#....E#\n#######\n").expect("layout parses")
    }

    fn resting_at(x: i32, y: i32) -> ExactState {
        ExactState::at_rest(pixel_centre(x), pixel_centre(y), 0x100)
    }

    #[test]
    fn bump_accumulates_and_moves_the_craft() {
        let map = corridor();
        let physics = PointMassPhysics::new(&map, PointMassConfig::default());
        let push_right = Action::from_axes(2, 0).expect("action exists");

        let first = physics.next(&resting_at(1, 1), push_right);
        assert_eq!(first.xb, 0x10000 / 4);
        assert_eq!(first.yb, 0);
        assert_eq!(first.xpos, pixel_centre(1) + 0x10000 / 4);
        assert_eq!(first.rot, 0x100);
        assert_eq!(first.status, GameStatus::Ongoing);
    }

    #[test]
    fn bump_is_clamped_to_max_speed() {
        let map = corridor();
        let config = PointMassConfig {
            acceleration: 0x10000,
            max_speed: 0x8000,
            ..PointMassConfig::default()
        };
        let physics = PointMassPhysics::new(&map, config);
        let push_right = Action::from_axes(2, 0).expect("action exists");

        let next = physics.next(&resting_at(1, 1), push_right);
        assert_eq!(next.xb, 0x8000);
    }

    #[test]
    fn walls_lose_and_ending_wins() {
        let map = corridor();
        let config = PointMassConfig {
            acceleration: 0x10000,
            max_speed: 0x10000,
            ..PointMassConfig::default()
        };
        let physics = PointMassPhysics::new(&map, config);
        let up = Action::from_axes(0, -1).expect("action exists");
        let right = Action::from_axes(1, 0).expect("action exists");

        assert_eq!(physics.next(&resting_at(1, 1), up).status, GameStatus::Lose);
        assert_eq!(physics.next(&resting_at(4, 1), right).status, GameStatus::Win);
    }

    #[test]
    fn terminal_states_are_frozen() {
        let map = corridor();
        let physics = PointMassPhysics::new(&map, PointMassConfig::default());
        let mut state = resting_at(2, 1);
        state.status = GameStatus::Win;

        assert_eq!(physics.next(&state, Action::ALL[0]), state);
    }

    #[test]
    fn negative_positions_floor_to_pixels() {
        let map = corridor();
        let physics = PointMassPhysics::new(&map, PointMassConfig::default());
        assert_eq!(physics.position_to_pixel(-1), -1);
        assert_eq!(physics.position_to_pixel(pixel_centre(3)), 3);
    }
}
