#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flood-fill cost fields that guide the Helirin state search.
//!
//! A [`Flooding`] owns a rectangular pixel window and precomputes two static
//! fields over it when constructed: which pixels are legally connected to the
//! ending zone and how far every pixel lies from the nearest wall. Cost-to-goal
//! maps depend on the wall-clip policy and are produced on demand by
//! [`Flooding::compute_cost_map`]; callers keep the returned [`CostField`] and
//! replace it wholesale when the policy changes.

mod cost;
mod distance;
mod field;
mod queue;
mod zones;

use std::time::Instant;

use helirin_core::{FloodTuning, MapView, Pixel, WallClipPolicy};

pub use cost::{CostError, CostField, CostParameters};
pub use field::{Field, FieldError, Window};

/// Static flood fields for one map window.
#[derive(Clone, Debug)]
pub struct Flooding<M> {
    map: M,
    window: Window,
    tuning: FloodTuning,
    legal_zones: Field<bool>,
    dist_to_wall: Field<f32>,
}

impl<M: MapView> Flooding<M> {
    /// Builds the legal-zone and distance-to-wall fields over `[start, end]`.
    pub fn new(map: M, start: Pixel, end: Pixel, tuning: FloodTuning) -> Result<Self, FieldError> {
        let window = Window::new(start, end)?;
        let began = Instant::now();

        let legal_zones = zones::legal_zones(&map, window);
        let dist_to_wall = distance::distance_to_a_wall(&map, window);

        tracing::debug!(
            start = %start,
            end = %end,
            legal = legal_zones.cells().iter().filter(|&&legal| legal).count() as u64,
            elapsed_ms = began.elapsed().as_millis() as u64,
            "built static flood fields",
        );

        Ok(Self {
            map,
            window,
            tuning,
            legal_zones,
            dist_to_wall,
        })
    }

    /// Upper-left corner of the window.
    #[must_use]
    pub fn pixel_start(&self) -> Pixel {
        self.window.start()
    }

    /// Lower-right corner of the window.
    #[must_use]
    pub fn pixel_end(&self) -> Pixel {
        self.window.end()
    }

    /// Window covered by every field.
    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }

    /// Reports whether the pixel lies inside the window.
    #[must_use]
    pub fn contains(&self, pixel: Pixel) -> bool {
        self.window.contains(pixel)
    }

    /// Map the fields were computed from.
    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Tuning used for cost maps.
    #[must_use]
    pub fn tuning(&self) -> &FloodTuning {
        &self.tuning
    }

    /// Graph distance from the pixel to the nearest wall.
    pub fn dist_to_wall(&self, pixel: Pixel) -> Result<f32, FieldError> {
        self.dist_to_wall.get(pixel)
    }

    /// Reports whether the pixel is 4-connected to the ending zone.
    pub fn is_legal_zone(&self, pixel: Pixel) -> Result<bool, FieldError> {
        self.legal_zones.get(pixel)
    }

    /// Cost stored in `costs` for the pixel.
    pub fn cost(&self, costs: &CostField, pixel: Pixel) -> Result<f32, FieldError> {
        costs.get(pixel)
    }

    /// Dense legal-zone field.
    #[must_use]
    pub fn legal_zones(&self) -> &Field<bool> {
        &self.legal_zones
    }

    /// Dense distance-to-wall field.
    #[must_use]
    pub fn distance_field(&self) -> &Field<f32> {
        &self.dist_to_wall
    }

    /// Computes the cost-to-goal map for a wall-clip policy.
    ///
    /// `gwb_mult` scales the ground-wall bonus and `wgm_mult` the wall-ground
    /// malus; both are ignored where the policy overrides them. Negative or
    /// non-finite multipliers are rejected.
    pub fn compute_cost_map(
        &self,
        gwb_mult: f32,
        wgm_mult: f32,
        policy: WallClipPolicy,
    ) -> Result<CostField, CostError> {
        let parameters = CostParameters::for_policy(policy, gwb_mult, wgm_mult)?;
        self.compute_cost_map_with(policy, parameters)
    }

    /// Computes a cost map from explicit flood parameters.
    pub fn compute_cost_map_with(
        &self,
        policy: WallClipPolicy,
        parameters: CostParameters,
    ) -> Result<CostField, CostError> {
        parameters.validate()?;
        Ok(cost::cost_map(
            &self.map,
            self.window,
            &self.dist_to_wall,
            &self.tuning,
            policy,
            parameters,
        ))
    }
}
