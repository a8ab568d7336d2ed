#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Concrete map and physics adapters for the Helirin planner.
//!
//! [`TileMap`] is a pixel-exact level parsed from an ASCII layout and
//! [`PointMassPhysics`] is a small deterministic simulation. Both exist so the
//! planning systems can be driven end to end; the planner itself only relies
//! on the [`MapView`] and [`helirin_core::PhysicsModel`] contracts.

mod physics;

use helirin_core::{MapView, Pixel, Zone};
use thiserror::Error;

pub use physics::{pixel_centre, PointMassConfig, PointMassPhysics};

const GLYPH_WALL: char = '#';
const GLYPH_FREE: char = '.';
const GLYPH_ENDING: char = 'E';
const GLYPH_STARTING: char = 'S';
const GLYPH_HEALING: char = 'H';

/// Errors raised while parsing an ASCII level layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MapParseError {
    /// The layout did not contain a single row.
    #[error("map layout is empty")]
    Empty,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} pixels but the map is {expected} pixels wide")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph does not describe any pixel kind.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Character that could not be interpreted.
        glyph: char,
        /// Zero-based column of the glyph.
        column: usize,
        /// Zero-based row of the glyph.
        row: usize,
    },
    /// The layout exceeds the addressable pixel range.
    #[error("map layout is too large")]
    TooLarge,
}

/// Classification of a single map pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Tile {
    wall: bool,
    zone: Option<Zone>,
}

/// Pixel-exact level layout.
///
/// Pixels beyond the layout are free and belong to no zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Parses a layout where every glyph describes one pixel.
    ///
    /// `#` is a wall, `.` is free space, `E`, `S` and `H` mark the ending,
    /// starting and healing zones. Blank lines and trailing whitespace are
    /// ignored.
    pub fn from_ascii(layout: &str) -> Result<Self, MapParseError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|row| !row.is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(MapParseError::Empty);
        };
        let expected = first.chars().count();

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(MapParseError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }

            for (column, glyph) in line.chars().enumerate() {
                tiles.push(parse_glyph(glyph).ok_or(MapParseError::UnknownGlyph {
                    glyph,
                    column,
                    row,
                })?);
            }
        }

        let width = i32::try_from(expected).map_err(|_| MapParseError::TooLarge)?;
        let height = i32::try_from(rows.len()).map_err(|_| MapParseError::TooLarge)?;

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Pixels assigned to the provided zone in row-major order.
    #[must_use]
    pub fn find_zone(&self, zone: Zone) -> Vec<Pixel> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Pixel::new(x, y)))
            .filter(|&pixel| self.pixel_zone(pixel) == Some(zone))
            .collect()
    }

    /// Upper-left corner of the layout.
    #[must_use]
    pub const fn pixel_start(&self) -> Pixel {
        Pixel::new(0, 0)
    }

    /// Lower-right corner of the layout.
    #[must_use]
    pub const fn pixel_end(&self) -> Pixel {
        Pixel::new(self.width - 1, self.height - 1)
    }

    fn tile(&self, pixel: Pixel) -> Tile {
        if !self.contains_pixel(pixel) {
            return Tile::default();
        }

        let Ok(row) = usize::try_from(pixel.y()) else {
            return Tile::default();
        };
        let Ok(column) = usize::try_from(pixel.x()) else {
            return Tile::default();
        };
        let Ok(width) = usize::try_from(self.width) else {
            return Tile::default();
        };

        self.tiles
            .get(row * width + column)
            .copied()
            .unwrap_or_default()
    }
}

impl MapView for TileMap {
    fn is_pixel_in_collision(&self, pixel: Pixel) -> bool {
        self.tile(pixel).wall
    }

    fn pixel_zone(&self, pixel: Pixel) -> Option<Zone> {
        self.tile(pixel).zone
    }

    fn width_px(&self) -> i32 {
        self.width
    }

    fn height_px(&self) -> i32 {
        self.height
    }
}

fn parse_glyph(glyph: char) -> Option<Tile> {
    let tile = match glyph {
        GLYPH_WALL => Tile {
            wall: true,
            zone: None,
        },
        GLYPH_FREE => Tile::default(),
        GLYPH_ENDING => Tile {
            wall: false,
            zone: Some(Zone::Ending),
        },
        GLYPH_STARTING => Tile {
            wall: false,
            zone: Some(Zone::Starting),
        },
        GLYPH_HEALING => Tile {
            wall: false,
            zone: Some(Zone::Healing),
        },
        _ => return None,
    };
    Some(tile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_walls_and_zones() {
        let map = TileMap::from_ascii("#####\n#S.E#\n#####\n").expect("layout parses");
        assert_eq!(map.width_px(), 5);
        assert_eq!(map.height_px(), 3);
        assert!(map.is_pixel_in_collision(Pixel::new(0, 0)));
        assert!(!map.is_pixel_in_collision(Pixel::new(2, 1)));
        assert_eq!(map.pixel_zone(Pixel::new(1, 1)), Some(Zone::Starting));
        assert_eq!(map.pixel_zone(Pixel::new(3, 1)), Some(Zone::Ending));
        assert_eq!(map.find_zone(Zone::Ending), vec![Pixel::new(3, 1)]);
        assert_eq!(map.pixel_end(), Pixel::new(4, 2));
    }

    #[test]
    fn pixels_outside_the_layout_are_free() {
        let map = TileMap::from_ascii("##\n##\n").expect("layout parses");
        assert!(!map.is_pixel_in_collision(Pixel::new(-1, 0)));
        assert!(!map.is_pixel_in_collision(Pixel::new(2, 1)));
        assert_eq!(map.pixel_zone(Pixel::new(5, 5)), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert_eq!(
            TileMap::from_ascii("###\n##\n"),
            Err(MapParseError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn unknown_glyphs_are_rejected() {
        assert_eq!(
            TileMap::from_ascii("#.#\n#x#\n"),
            Err(MapParseError::UnknownGlyph {
                glyph: 'x',
                column: 1,
                row: 1,
            })
        );
        assert_eq!(TileMap::from_ascii("\n\n"), Err(MapParseError::Empty));
    }
}
