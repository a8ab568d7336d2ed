//! Legal-zone reachability seeded from the ending zone.

use std::collections::VecDeque;

use helirin_core::{MapView, Zone};

use crate::field::{Field, Window};

/// Marks every collision-free pixel 4-connected to an ending pixel.
///
/// Seeds are restricted to the map's own extent; the walk itself may leave the
/// map as long as it stays inside the window.
pub(crate) fn legal_zones<M: MapView>(map: &M, window: Window) -> Field<bool> {
    let mut field = Field::filled(window, false);
    let cells = field.cells_mut();
    let mut queue = VecDeque::new();

    for pixel in window.pixels() {
        if !map.contains_pixel(pixel) || map.pixel_zone(pixel) != Some(Zone::Ending) {
            continue;
        }
        if map.is_pixel_in_collision(pixel) {
            continue;
        }
        let Some(index) = window.offset(pixel) else {
            continue;
        };
        if cells[index] {
            continue;
        }

        cells[index] = true;
        queue.push_back(pixel);
    }

    while let Some(pixel) = queue.pop_front() {
        for neighbor in window.straight_neighbors(pixel) {
            if map.is_pixel_in_collision(neighbor) {
                continue;
            }
            let Some(index) = window.offset(neighbor) else {
                continue;
            };
            if cells[index] {
                continue;
            }

            cells[index] = true;
            queue.push_back(neighbor);
        }
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use helirin_core::Pixel;
    use helirin_world::TileMap;

    fn window_over(map: &TileMap) -> Window {
        Window::new(map.pixel_start(), map.pixel_end()).expect("window is valid")
    }

    #[test]
    fn ending_pixels_are_legal() {
        let map = TileMap::from_ascii("...\n.E.\n...\n").expect("layout parses");
        let field = legal_zones(&map, window_over(&map));

        assert!(field.cells().iter().all(|&legal| legal));
    }

    #[test]
    fn walls_split_the_legal_region() {
        let map = TileMap::from_ascii(
            "\
E.#..
..#..
..#..
",
        )
        .expect("layout parses");
        let field = legal_zones(&map, window_over(&map));

        assert_eq!(field.get(Pixel::new(1, 2)), Ok(true));
        assert_eq!(field.get(Pixel::new(2, 0)), Ok(false));
        assert_eq!(field.get(Pixel::new(3, 0)), Ok(false));
        assert_eq!(field.get(Pixel::new(4, 2)), Ok(false));
    }

    #[test]
    fn diagonal_gaps_do_not_connect() {
        let map = TileMap::from_ascii("E#\n#.\n").expect("layout parses");
        let field = legal_zones(&map, window_over(&map));

        assert_eq!(field.get(Pixel::new(0, 0)), Ok(true));
        assert_eq!(field.get(Pixel::new(1, 1)), Ok(false));
    }

    #[test]
    fn walk_extends_past_the_map_edge() {
        let map = TileMap::from_ascii("E#\n##\n").expect("layout parses");
        let window = Window::new(Pixel::new(-1, 0), Pixel::new(1, 1)).expect("window is valid");
        let field = legal_zones(&map, window);

        assert_eq!(field.get(Pixel::new(-1, 0)), Ok(true));
        assert_eq!(field.get(Pixel::new(-1, 1)), Ok(true));
        assert_eq!(field.get(Pixel::new(1, 1)), Ok(false));
    }
}
