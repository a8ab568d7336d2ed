//! Distance from every pixel to the nearest wall.

use helirin_core::MapView;

use crate::field::{Field, Window};
use crate::queue::{relax, PixelQueue};

/// 8-connected multi-source Dijkstra seeded at every collision pixel.
///
/// Pixels with no wall anywhere in the window keep `f32::INFINITY`.
pub(crate) fn distance_to_a_wall<M: MapView>(map: &M, window: Window) -> Field<f32> {
    let mut field = Field::filled(window, f32::INFINITY);
    let mut queue = PixelQueue::default();
    let weights = field.cells_mut();

    for (index, pixel) in window.pixels().enumerate() {
        if map.is_pixel_in_collision(pixel) {
            weights[index] = 0.0;
            queue.push(index, 0.0);
        }
    }

    relax(&window, weights, &mut queue, |_, _, length| Some(length));
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use helirin_core::Pixel;
    use helirin_world::TileMap;

    #[test]
    fn distances_grow_away_from_walls() {
        let map = TileMap::from_ascii("#....\n.....\n.....\n").expect("layout parses");
        let window = Window::new(map.pixel_start(), map.pixel_end()).expect("window is valid");
        let field = distance_to_a_wall(&map, window);

        assert_eq!(field.get(Pixel::new(0, 0)), Ok(0.0));
        assert_eq!(field.get(Pixel::new(3, 0)), Ok(3.0));
        let diagonal = field.get(Pixel::new(2, 2)).expect("pixel is in window");
        assert!((diagonal - 2.0 * std::f32::consts::SQRT_2).abs() < 1e-5);
        let knight = field.get(Pixel::new(2, 1)).expect("pixel is in window");
        assert!((knight - (1.0 + std::f32::consts::SQRT_2)).abs() < 1e-5);
    }

    #[test]
    fn wall_free_windows_stay_infinite() {
        let map = TileMap::from_ascii("...\n.E.\n").expect("layout parses");
        let window = Window::new(map.pixel_start(), map.pixel_end()).expect("window is valid");
        let field = distance_to_a_wall(&map, window);

        assert!(field.cells().iter().all(|distance| distance.is_infinite()));
    }
}
