#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Helirin planner.
//!
//! This crate defines the vocabulary that connects the map adapter, the
//! physics adapter, the flood engine and the state search engine. Maps answer
//! per-pixel collision and zone queries through [`MapView`], physics engines
//! advance one [`ExactState`] per tick through [`PhysicsModel`], and the
//! planning systems exchange [`Pixel`] coordinates, [`Action`] values and the
//! tuning structures found in [`PlannerConfig`].

mod config;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, FloodTuning, PlannerConfig, SearchTuning};

/// Integer pixel coordinate on the map.
///
/// Coordinates are signed because planning windows may extend past the map's
/// own extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pixel {
    x: i32,
    y: i32,
}

impl Pixel {
    /// Creates a new pixel coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the pixel.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the pixel.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the pixel displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Named regions a map may assign to a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Region the craft starts from.
    Starting,
    /// Region that restores the craft's health.
    Healing,
    /// Goal region; reaching it wins the level.
    Ending,
}

/// Read-only view of the static level geometry.
///
/// Implementations must answer for any pixel, including pixels beyond the
/// map's extent; those are usually reported as free and zoneless.
pub trait MapView {
    /// Reports whether the pixel lies inside a wall.
    fn is_pixel_in_collision(&self, pixel: Pixel) -> bool;

    /// Zone the pixel belongs to, if any.
    fn pixel_zone(&self, pixel: Pixel) -> Option<Zone>;

    /// Width of the map measured in pixels.
    fn width_px(&self) -> i32;

    /// Height of the map measured in pixels.
    fn height_px(&self) -> i32;

    /// Reports whether the pixel lies within the map's own extent.
    fn contains_pixel(&self, pixel: Pixel) -> bool {
        pixel.x() >= 0
            && pixel.x() < self.width_px()
            && pixel.y() >= 0
            && pixel.y() < self.height_px()
    }
}

impl<T: MapView + ?Sized> MapView for &T {
    fn is_pixel_in_collision(&self, pixel: Pixel) -> bool {
        (**self).is_pixel_in_collision(pixel)
    }

    fn pixel_zone(&self, pixel: Pixel) -> Option<Zone> {
        (**self).pixel_zone(pixel)
    }

    fn width_px(&self) -> i32 {
        (**self).width_px()
    }

    fn height_px(&self) -> i32 {
        (**self).height_px()
    }
}

/// Terminal status attached to every exact physics state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The level is still in progress.
    #[default]
    Ongoing,
    /// The craft reached the goal.
    Win,
    /// The craft was destroyed.
    Lose,
}

/// Full physics state of the craft.
///
/// Positions and bumps are 16.16 fixed-point values; rotation is a 16-bit
/// angle that wraps around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExactState {
    /// Horizontal position.
    pub xpos: i32,
    /// Vertical position.
    pub ypos: i32,
    /// Horizontal bump (velocity proxy) applied per tick.
    pub xb: i32,
    /// Vertical bump (velocity proxy) applied per tick.
    pub yb: i32,
    /// Current rotation angle.
    pub rot: i16,
    /// Rotation applied per tick.
    pub rot_rate: i16,
    /// Terminal status of the state.
    pub status: GameStatus,
}

impl ExactState {
    /// Creates an ongoing state at rest at the provided fixed-point position.
    #[must_use]
    pub const fn at_rest(xpos: i32, ypos: i32, rot_rate: i16) -> Self {
        Self {
            xpos,
            ypos,
            xb: 0,
            yb: 0,
            rot: 0,
            rot_rate,
            status: GameStatus::Ongoing,
        }
    }
}

/// One of the discrete control inputs accepted per simulation tick.
///
/// Each action decodes to a pair of axis inputs in `-2..=2`; the planner treats
/// actions as opaque and only enumerates them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action(u8);

impl Action {
    /// Number of distinct actions.
    pub const COUNT: usize = 25;

    /// Every action in index order.
    pub const ALL: [Action; Action::COUNT] = {
        let mut all = [Action(0); Action::COUNT];
        let mut index = 0;
        while index < Action::COUNT {
            all[index] = Action(index as u8);
            index += 1;
        }
        all
    };

    const AXIS_SPAN: i8 = 2;
    const AXIS_VALUES: u8 = 5;

    /// Creates the action with the provided index, if it exists.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Creates the action that applies the provided axis inputs.
    #[must_use]
    pub const fn from_axes(horizontal: i8, vertical: i8) -> Option<Self> {
        if horizontal < -Self::AXIS_SPAN
            || horizontal > Self::AXIS_SPAN
            || vertical < -Self::AXIS_SPAN
            || vertical > Self::AXIS_SPAN
        {
            return None;
        }

        let column = (horizontal + Self::AXIS_SPAN) as u8;
        let row = (vertical + Self::AXIS_SPAN) as u8;
        Some(Self(row * Self::AXIS_VALUES + column))
    }

    /// Index of the action within [`Action::ALL`].
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// Horizontal and vertical axis inputs encoded by the action.
    #[must_use]
    pub const fn axes(&self) -> (i8, i8) {
        let column = (self.0 % Self::AXIS_VALUES) as i8;
        let row = (self.0 / Self::AXIS_VALUES) as i8;
        (column - Self::AXIS_SPAN, row - Self::AXIS_SPAN)
    }
}

/// Simulation engine that advances the craft by one tick.
pub trait PhysicsModel {
    /// Computes the state reached after applying `action` for one tick.
    fn next(&self, state: &ExactState, action: Action) -> ExactState;

    /// Converts a fixed-point position component to its pixel coordinate.
    fn position_to_pixel(&self, position: i32) -> i32;

    /// Native angular resolution used when quantising rotations.
    fn angular_resolution(&self) -> i16;

    /// Pixel containing the state's position.
    fn state_pixel(&self, state: &ExactState) -> Pixel {
        Pixel::new(
            self.position_to_pixel(state.xpos),
            self.position_to_pixel(state.ypos),
        )
    }
}

impl<T: PhysicsModel + ?Sized> PhysicsModel for &T {
    fn next(&self, state: &ExactState, action: Action) -> ExactState {
        (**self).next(state, action)
    }

    fn position_to_pixel(&self, position: i32) -> i32 {
        (**self).position_to_pixel(position)
    }

    fn angular_resolution(&self) -> i16 {
        (**self).angular_resolution()
    }
}

/// How the cost field treats the wall-clip mechanic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WallClipPolicy {
    /// Walls are never traversable.
    NoWallClip,
    /// Walls may be entered but leaving a wall-clip zone is infinitely costly.
    NoCompleteWallClip,
    /// Wall clips are allowed with the configured bonus and malus.
    Allow,
}

impl WallClipPolicy {
    /// Every policy in declaration order.
    pub const ALL: [WallClipPolicy; 3] = [Self::NoWallClip, Self::NoCompleteWallClip, Self::Allow];

    /// Stable textual name of the policy.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoWallClip => "no-wall-clip",
            Self::NoCompleteWallClip => "no-complete-wall-clip",
            Self::Allow => "allow",
        }
    }
}

impl fmt::Display for WallClipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a wall-clip policy name is not recognised.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown wall-clip policy `{0}` (expected no-wall-clip, no-complete-wall-clip or allow)")]
pub struct ParsePolicyError(String);

impl FromStr for WallClipPolicy {
    type Err = ParsePolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParsePolicyError(trimmed.to_owned()))
    }
}
