//! Tuning constants for the flood and search engines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_GROUND_SPEED: f32 = 3.0;

/// Errors raised while loading or validating a planner configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a configuration.
    #[error("could not parse planner configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the planner cannot work with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Constraint the value violates.
        reason: &'static str,
    },
}

/// Complete tuning for one planner instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Constants driving the cost-field construction.
    pub flood: FloodTuning,
    /// Constants driving state quantisation.
    pub search: SearchTuning,
}

impl PlannerConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing tables and keys fall back to their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every tuning constant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flood.validate()?;
        self.search.validate()
    }
}

/// Speeds, bonuses and penalties used when flooding the cost map.
///
/// Speeds are expressed in pixels per frame; the bonus and malus are in cost
/// units (frames).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloodTuning {
    /// Travel speed outside walls.
    pub ground_speed: f32,
    /// Travel speed while clipping through a wall.
    ///
    /// Wall speed cannot be sustained, so it matches the ground speed and the
    /// advantage is modelled by [`FloodTuning::ground_wall_bonus`] instead.
    pub wall_speed: f32,
    /// Bonus subtracted from every wall pixel once the graph search is done.
    pub ground_wall_bonus: f32,
    /// Cost a wall pixel needs before it earns the full bonus.
    pub ground_wall_bonus_min_dist: f32,
    /// Penalty charged every time a path leaves a wall-clip zone.
    pub wall_ground_malus: f32,
    /// Distance from a wall at which the craft stops being in a clip.
    pub wall_clip_end_dist: f32,
}

impl Default for FloodTuning {
    fn default() -> Self {
        Self {
            ground_speed: DEFAULT_GROUND_SPEED,
            wall_speed: DEFAULT_GROUND_SPEED,
            ground_wall_bonus: 7.0 - 2.0 - DEFAULT_GROUND_SPEED,
            ground_wall_bonus_min_dist: 7.0 - 2.0,
            wall_ground_malus: DEFAULT_GROUND_SPEED * 20.0,
            wall_clip_end_dist: 4.0,
        }
    }
}

impl FloodTuning {
    /// Checks that every constant is usable by the flood engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("flood.ground_speed", self.ground_speed)?;
        positive("flood.wall_speed", self.wall_speed)?;
        non_negative("flood.ground_wall_bonus", self.ground_wall_bonus)?;
        non_negative(
            "flood.ground_wall_bonus_min_dist",
            self.ground_wall_bonus_min_dist,
        )?;
        positive("flood.wall_ground_malus", self.wall_ground_malus)?;
        non_negative("flood.wall_clip_end_dist", self.wall_clip_end_dist)?;

        if self.ground_wall_bonus_min_dist < self.ground_wall_bonus {
            return Err(ConfigError::Invalid {
                field: "flood.ground_wall_bonus_min_dist",
                reason: "must not be smaller than flood.ground_wall_bonus",
            });
        }

        Ok(())
    }
}

/// Reduction units used when collapsing exact states into search keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchTuning {
    /// Position quantum next to a wall, in fixed-point units (1/64 px).
    pub position_reduction: i32,
    /// Bump quantum next to a wall, in fixed-point units per frame.
    pub bump_reduction: i32,
    /// Wall thickness used to turn distances into reduction multipliers.
    pub tile_size_px: i32,
    /// Multiplier applied when the window contains no wall at all.
    pub open_space_units: i32,
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            position_reduction: 0x10000 / 64,
            bump_reduction: 0x10000 / 64,
            tile_size_px: 8,
            open_space_units: 16,
        }
    }
}

impl SearchTuning {
    /// Checks that every reduction unit is strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("search.position_reduction", self.position_reduction),
            ("search.bump_reduction", self.bump_reduction),
            ("search.tile_size_px", self.tile_size_px),
            ("search.open_space_units", self.open_space_units),
        ];
        for (field, value) in checks {
            if value <= 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be strictly positive",
                });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be finite and strictly positive",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be finite and non-negative",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_tuning() {
        let flood = FloodTuning::default();
        assert!((flood.ground_speed - 3.0).abs() < f32::EPSILON);
        assert!((flood.wall_speed - flood.ground_speed).abs() < f32::EPSILON);
        assert!((flood.ground_wall_bonus - 2.0).abs() < f32::EPSILON);
        assert!((flood.ground_wall_bonus_min_dist - 5.0).abs() < f32::EPSILON);
        assert!((flood.wall_ground_malus - 60.0).abs() < f32::EPSILON);
        assert!((flood.wall_clip_end_dist - 4.0).abs() < f32::EPSILON);

        let search = SearchTuning::default();
        assert_eq!(search.position_reduction, 1024);
        assert_eq!(search.bump_reduction, 1024);
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = PlannerConfig::from_toml_str(
            r#"
            [flood]
            wall_ground_malus = 30.0

            [search]
            tile_size_px = 16
            "#,
        )
        .expect("configuration parses");

        assert!((config.flood.wall_ground_malus - 30.0).abs() < f32::EPSILON);
        assert!((config.flood.ground_speed - 3.0).abs() < f32::EPSILON);
        assert_eq!(config.search.tile_size_px, 16);
        assert_eq!(config.search.position_reduction, 1024);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = PlannerConfig::from_toml_str("[flood]\nwall_sped = 3.0\n")
            .expect_err("typo must be reported");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn bonus_threshold_must_cover_the_bonus() {
        let error = PlannerConfig::from_toml_str(
            "[flood]\nground_wall_bonus = 6.0\nground_wall_bonus_min_dist = 5.0\n",
        )
        .expect_err("threshold below bonus is invalid");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "flood.ground_wall_bonus_min_dist",
                ..
            }
        ));
    }

    #[test]
    fn malus_must_be_strictly_positive() {
        for malus in ["0.0", "-1.0"] {
            let toml = format!("[flood]\nwall_ground_malus = {malus}\n");
            let error = PlannerConfig::from_toml_str(&toml).expect_err("malus must be positive");
            assert!(matches!(
                error,
                ConfigError::Invalid {
                    field: "flood.wall_ground_malus",
                    ..
                }
            ));
        }
    }

    #[test]
    fn zero_reduction_is_rejected() {
        let config = PlannerConfig {
            search: SearchTuning {
                bump_reduction: 0,
                ..SearchTuning::default()
            },
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "search.bump_reduction",
                ..
            })
        ));
    }
}
