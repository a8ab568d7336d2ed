//! Dense per-pixel storage over a rectangular window.

use helirin_core::Pixel;
use thiserror::Error;

const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Largest number of pixels a window may cover.
const MAX_WINDOW_PIXELS: usize = i32::MAX as usize;

/// Errors raised by window construction and bounds-checked field access.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The window's end corner lies before its start corner.
    #[error("window end {end} lies before its start {start}")]
    EmptyWindow {
        /// Requested upper-left corner.
        start: Pixel,
        /// Requested lower-right corner.
        end: Pixel,
    },
    /// The window holds more pixels than can be addressed.
    #[error("window {start}..={end} is too large to store")]
    TooLarge {
        /// Requested upper-left corner.
        start: Pixel,
        /// Requested lower-right corner.
        end: Pixel,
    },
    /// A lookup targeted a pixel outside the window.
    #[error("pixel {pixel} lies outside the window {start}..={end}")]
    OutOfWindow {
        /// Pixel that was requested.
        pixel: Pixel,
        /// Upper-left corner of the window.
        start: Pixel,
        /// Lower-right corner of the window.
        end: Pixel,
    },
}

/// Closed pixel rectangle `[start, end]` covered by the flood fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    start: Pixel,
    end: Pixel,
    width: usize,
    height: usize,
    len: usize,
}

impl Window {
    /// Creates the window spanning both corners inclusively.
    pub fn new(start: Pixel, end: Pixel) -> Result<Self, FieldError> {
        let span = |from: i32, to: i32| usize::try_from(i64::from(to) - i64::from(from) + 1).ok();
        let (Some(width), Some(height)) = (span(start.x(), end.x()), span(start.y(), end.y()))
        else {
            return Err(FieldError::EmptyWindow { start, end });
        };
        if width == 0 || height == 0 {
            return Err(FieldError::EmptyWindow { start, end });
        }
        let len = width
            .checked_mul(height)
            .filter(|&len| len <= MAX_WINDOW_PIXELS)
            .ok_or(FieldError::TooLarge { start, end })?;

        Ok(Self {
            start,
            end,
            width,
            height,
            len,
        })
    }

    /// Upper-left corner of the window.
    #[must_use]
    pub const fn start(&self) -> Pixel {
        self.start
    }

    /// Lower-right corner of the window.
    #[must_use]
    pub const fn end(&self) -> Pixel {
        self.end
    }

    /// Number of pixel columns in the window.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of pixel rows in the window.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels in the window.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Windows always hold at least one pixel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Reports whether the pixel lies inside the window.
    #[must_use]
    pub fn contains(&self, pixel: Pixel) -> bool {
        pixel.x() >= self.start.x()
            && pixel.x() <= self.end.x()
            && pixel.y() >= self.start.y()
            && pixel.y() <= self.end.y()
    }

    /// Row-major storage offset of the pixel.
    pub fn index(&self, pixel: Pixel) -> Result<usize, FieldError> {
        self.offset(pixel).ok_or(FieldError::OutOfWindow {
            pixel,
            start: self.start,
            end: self.end,
        })
    }

    /// Iterates over every pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        let (start, end) = (self.start, self.end);
        (start.y()..=end.y())
            .flat_map(move |y| (start.x()..=end.x()).map(move |x| Pixel::new(x, y)))
    }

    pub(crate) fn offset(&self, pixel: Pixel) -> Option<usize> {
        if !self.contains(pixel) {
            return None;
        }
        let column = usize::try_from(i64::from(pixel.x()) - i64::from(self.start.x())).ok()?;
        let row = usize::try_from(i64::from(pixel.y()) - i64::from(self.start.y())).ok()?;
        row.checked_mul(self.width)?.checked_add(column)
    }

    pub(crate) fn pixel_at(&self, index: usize) -> Option<Pixel> {
        if index >= self.len() {
            return None;
        }
        let column = i32::try_from(index % self.width).ok()?;
        let row = i32::try_from(index / self.width).ok()?;
        Some(self.start.offset(column, row))
    }

    /// 4-connected neighbours that stay inside the window.
    pub(crate) fn straight_neighbors(&self, pixel: Pixel) -> impl Iterator<Item = Pixel> {
        let mut candidates = [None; 4];
        let mut count = 0;

        if pixel.y() > self.start.y() {
            candidates[count] = Some(pixel.offset(0, -1));
            count += 1;
        }
        if pixel.y() < self.end.y() {
            candidates[count] = Some(pixel.offset(0, 1));
            count += 1;
        }
        if pixel.x() > self.start.x() {
            candidates[count] = Some(pixel.offset(-1, 0));
            count += 1;
        }
        if pixel.x() < self.end.x() {
            candidates[count] = Some(pixel.offset(1, 0));
            count += 1;
        }

        candidates.into_iter().take(count).flatten()
    }

    fn diagonal_neighbors(&self, pixel: Pixel) -> impl Iterator<Item = Pixel> {
        let mut candidates = [None; 4];
        let mut count = 0;

        let up = pixel.y() > self.start.y();
        let down = pixel.y() < self.end.y();
        let left = pixel.x() > self.start.x();
        let right = pixel.x() < self.end.x();

        if up && left {
            candidates[count] = Some(pixel.offset(-1, -1));
            count += 1;
        }
        if down && right {
            candidates[count] = Some(pixel.offset(1, 1));
            count += 1;
        }
        if down && left {
            candidates[count] = Some(pixel.offset(-1, 1));
            count += 1;
        }
        if up && right {
            candidates[count] = Some(pixel.offset(1, -1));
            count += 1;
        }

        candidates.into_iter().take(count).flatten()
    }

    /// 8-connected neighbours with their step lengths, straight steps first.
    pub(crate) fn neighbors(&self, pixel: Pixel) -> impl Iterator<Item = Step> {
        self.straight_neighbors(pixel)
            .map(|to| Step { to, length: 1.0 })
            .chain(
                self.diagonal_neighbors(pixel)
                    .map(|to| Step { to, length: SQRT_2 }),
            )
    }
}

/// Single edge of the implicit pixel graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Step {
    pub(crate) to: Pixel,
    pub(crate) length: f32,
}

/// Dense value grid covering a [`Window`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field<T> {
    window: Window,
    cells: Vec<T>,
}

impl<T: Copy> Field<T> {
    /// Creates a field where every pixel holds `value`.
    #[must_use]
    pub fn filled(window: Window, value: T) -> Self {
        Self {
            window,
            cells: vec![value; window.len()],
        }
    }

    /// Window covered by the field.
    #[must_use]
    pub const fn window(&self) -> Window {
        self.window
    }

    /// Value stored for the pixel.
    pub fn get(&self, pixel: Pixel) -> Result<T, FieldError> {
        let index = self.window.index(pixel)?;
        self.cells.get(index).copied().ok_or(FieldError::OutOfWindow {
            pixel,
            start: self.window.start(),
            end: self.window.end(),
        })
    }

    /// Overwrites the value stored for the pixel.
    pub fn set(&mut self, pixel: Pixel, value: T) -> Result<(), FieldError> {
        let index = self.window.index(pixel)?;
        let slot = self.cells.get_mut(index).ok_or(FieldError::OutOfWindow {
            pixel,
            start: self.window.start(),
            end: self.window.end(),
        })?;
        *slot = value;
        Ok(())
    }

    /// Dense values stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterates over every pixel together with its value.
    pub fn iter(&self) -> impl Iterator<Item = (Pixel, T)> + '_ {
        self.window.pixels().zip(self.cells.iter().copied())
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }
}
