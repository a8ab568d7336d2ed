//! Cost-to-goal field under a wall-clip policy.

use helirin_core::{FloodTuning, MapView, Pixel, WallClipPolicy, Zone};
use thiserror::Error;

use crate::field::{Field, FieldError, Window};
use crate::queue::{relax, PixelQueue};

/// Errors raised when cost-map multipliers cannot be flooded.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum CostError {
    /// A multiplier is negative, NaN or an infinity the policy does not allow.
    #[error("multiplier `{name}` must be finite and non-negative, got {value}")]
    InvalidMultiplier {
        /// Name of the offending multiplier.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
}

/// Effective multipliers handed to the cost-map flood for a policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostParameters {
    /// Multiplier applied to the ground-wall bonus and its threshold.
    pub ground_wall_bonus_mult: f32,
    /// Multiplier applied to the wall-ground malus; may be `f32::INFINITY`.
    pub wall_ground_malus_mult: f32,
    /// Forbids entering collision pixels altogether.
    pub no_wall_clip: bool,
}

impl CostParameters {
    /// Maps a policy and the caller's multipliers to flood parameters.
    ///
    /// Both multipliers must be finite and non-negative; only the policy
    /// itself may introduce an infinite malus.
    pub fn for_policy(
        policy: WallClipPolicy,
        gwb_mult: f32,
        wgm_mult: f32,
    ) -> Result<Self, CostError> {
        finite_multiplier("gwb_mult", gwb_mult)?;
        finite_multiplier("wgm_mult", wgm_mult)?;

        Ok(match policy {
            WallClipPolicy::NoWallClip => Self {
                ground_wall_bonus_mult: 0.0,
                wall_ground_malus_mult: 0.0,
                no_wall_clip: true,
            },
            WallClipPolicy::Allow => Self {
                ground_wall_bonus_mult: gwb_mult,
                wall_ground_malus_mult: wgm_mult,
                no_wall_clip: false,
            },
            WallClipPolicy::NoCompleteWallClip => Self {
                ground_wall_bonus_mult: gwb_mult,
                wall_ground_malus_mult: f32::INFINITY,
                no_wall_clip: false,
            },
        })
    }

    /// Checks that no edge weight can turn negative or NaN.
    ///
    /// The malus multiplier may be `+∞`; the bonus multiplier must be finite.
    pub fn validate(&self) -> Result<(), CostError> {
        finite_multiplier("ground_wall_bonus_mult", self.ground_wall_bonus_mult)?;
        let malus = self.wall_ground_malus_mult;
        if malus.is_nan() || malus < 0.0 {
            return Err(CostError::InvalidMultiplier {
                name: "wall_ground_malus_mult",
                value: malus,
            });
        }
        Ok(())
    }
}

fn finite_multiplier(name: &'static str, value: f32) -> Result<(), CostError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CostError::InvalidMultiplier { name, value })
    }
}

/// Travel cost from every pixel of the window to the ending zone.
///
/// Cost fields are rebuilt wholesale whenever the policy or multipliers
/// change; they are never updated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct CostField {
    field: Field<f32>,
    policy: WallClipPolicy,
    parameters: CostParameters,
}

impl CostField {
    /// Cost stored for the pixel.
    pub fn get(&self, pixel: Pixel) -> Result<f32, FieldError> {
        self.field.get(pixel)
    }

    /// Underlying dense field.
    #[must_use]
    pub fn field(&self) -> &Field<f32> {
        &self.field
    }

    /// Window covered by the field.
    #[must_use]
    pub fn window(&self) -> Window {
        self.field.window()
    }

    /// Policy the field was computed under.
    #[must_use]
    pub fn policy(&self) -> WallClipPolicy {
        self.policy
    }

    /// Effective multipliers the field was computed with.
    #[must_use]
    pub fn parameters(&self) -> CostParameters {
        self.parameters
    }

    /// Largest finite cost in the field, or zero when none is finite.
    #[must_use]
    pub fn max_finite(&self) -> f32 {
        self.field
            .cells()
            .iter()
            .copied()
            .filter(|cost| cost.is_finite())
            .fold(0.0, f32::max)
    }

    /// Number of pixels with a finite cost.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.field
            .cells()
            .iter()
            .filter(|cost| cost.is_finite())
            .count()
    }
}

/// Floods the cost map from the ending zone.
///
/// The ground-wall bonus is applied to wall pixels after the search; as an edge
/// weight it would be negative and break Dijkstra.
pub(crate) fn cost_map<M: MapView>(
    map: &M,
    window: Window,
    dist_to_wall: &Field<f32>,
    tuning: &FloodTuning,
    policy: WallClipPolicy,
    parameters: CostParameters,
) -> CostField {
    let bonus = tuning.ground_wall_bonus * parameters.ground_wall_bonus_mult;
    let bonus_min_dist = tuning.ground_wall_bonus_min_dist * parameters.ground_wall_bonus_mult;
    let malus = scale_malus(tuning.wall_ground_malus, parameters.wall_ground_malus_mult);

    let walls: Vec<bool> = window
        .pixels()
        .map(|pixel| map.is_pixel_in_collision(pixel))
        .collect();
    let near_wall: Vec<bool> = dist_to_wall
        .cells()
        .iter()
        .map(|&distance| distance <= tuning.wall_clip_end_dist)
        .collect();

    let mut field = Field::filled(window, f32::INFINITY);
    let mut queue = PixelQueue::default();
    let weights = field.cells_mut();

    for (index, pixel) in window.pixels().enumerate() {
        if map.pixel_zone(pixel) == Some(Zone::Ending) {
            weights[index] = 0.0;
            queue.push(index, 0.0);
        }
    }

    relax(&window, weights, &mut queue, |from, to, length| {
        if parameters.no_wall_clip && walls[to] {
            return None;
        }

        let cost = if near_wall[from] && !near_wall[to] {
            length / tuning.ground_speed + malus
        } else if walls[from] && walls[to] {
            length / tuning.wall_speed
        } else {
            length / tuning.ground_speed
        };
        Some(cost)
    });

    for (weight, &wall) in weights.iter_mut().zip(&walls) {
        if wall {
            *weight = apply_wall_bonus(*weight, bonus, bonus_min_dist);
        }
    }

    tracing::debug!(
        %policy,
        bonus,
        malus,
        "flooded cost map over {}x{} window",
        window.width(),
        window.height(),
    );

    CostField {
        field,
        policy,
        parameters,
    }
}

/// Scales the malus; an infinite multiplier forbids leaving a clip outright.
fn scale_malus(malus: f32, multiplier: f32) -> f32 {
    if multiplier.is_infinite() && multiplier > 0.0 {
        f32::INFINITY
    } else {
        malus * multiplier
    }
}

/// Subtracts the wall bonus, proportionally below the full-bonus threshold.
fn apply_wall_bonus(weight: f32, bonus: f32, min_dist: f32) -> f32 {
    if weight >= min_dist {
        weight - bonus
    } else {
        weight - bonus * weight / min_dist
    }
}
