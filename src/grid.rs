// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-run pixel planes.  A Grid belongs to exactly one render: the
//! escape plane is written by the classification pass, the count plane
//! by the accumulation pass, and the RGB plane by the paint pass.

use error::RenderError;
use planes::Pixel;

/// Bytes per pixel in the RGB plane.
pub const BYTES_PER_PIXEL: usize = 3;

/// Row-major escape, count and color planes for a width × height image.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    escapes: Vec<bool>,
    counts: Vec<u32>,
    max: u32,
    raster: Vec<u8>,
}

/// A `cells`-long vector of `value`, or `RenderError::Allocation` naming
/// `name` when it does not fit in memory.
pub(crate) fn plane<T: Clone>(
    cells: usize,
    value: T,
    name: &'static str,
) -> Result<Vec<T>, RenderError> {
    let mut v = Vec::new();
    v.try_reserve_exact(cells)
        .map_err(|_| RenderError::Allocation { cells, plane: name })?;
    v.resize(cells, value);
    Ok(v)
}

impl Grid {
    /// Allocates zeroed planes.  Fails rather than aborting when the
    /// planes do not fit in memory.
    pub fn new(width: usize, height: usize) -> Result<Grid, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }
        let cells = width
            .checked_mul(height)
            .ok_or(RenderError::Allocation {
                cells: usize::max_value(),
                plane: "escape",
            })?;
        let bytes = cells
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or(RenderError::Allocation {
                cells: usize::max_value(),
                plane: "rgb",
            })?;

        Ok(Grid {
            width,
            height,
            escapes: plane(cells, false, "escape")?,
            counts: plane(cells, 0, "count")?,
            max: 0,
            raster: plane(bytes, 0, "rgb")?,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.escapes.len()
    }

    /// Never true for a constructed grid; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.escapes.is_empty()
    }

    /// Escape flags, row-major.
    pub fn escapes(&self) -> &[bool] {
        &self.escapes
    }

    /// Visitation counts, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Visitation count of one pixel.
    pub fn count(&self, pixel: &Pixel) -> u32 {
        self.counts[pixel.1 * self.width + pixel.0]
    }

    /// The largest visitation count, as tracked during accumulation.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// The RGB plane: 3 bytes per pixel, row-major, no padding.
    pub fn raster(&self) -> &[u8] {
        &self.raster
    }

    pub(crate) fn escapes_mut(&mut self) -> &mut [bool] {
        &mut self.escapes
    }

    pub(crate) fn set_density(&mut self, counts: Vec<u32>, max: u32) {
        debug_assert_eq!(counts.len(), self.escapes.len());
        self.counts = counts;
        self.max = max;
    }

    pub(crate) fn counts_and_raster_mut(&mut self) -> (&[u32], &mut [u8]) {
        (&self.counts, &mut self.raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_zeroed() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.len(), 12);
        assert!(!grid.is_empty());
        assert!(grid.escapes().iter().all(|e| !e));
        assert!(grid.counts().iter().all(|c| *c == 0));
        assert_eq!(grid.raster().len(), 36);
        assert_eq!(grid.max(), 0);
    }

    #[test]
    fn empty_grids_are_refused() {
        assert!(Grid::new(0, 3).is_err());
        assert!(Grid::new(3, 0).is_err());
    }

    #[test]
    fn oversized_grids_fail_cleanly() {
        match Grid::new(usize::max_value(), 2) {
            Err(RenderError::Allocation { .. }) => {}
            other => panic!("expected an allocation error, got {:?}", other),
        }
    }

    #[test]
    fn planes_too_large_to_reserve_name_themselves() {
        match plane(usize::max_value(), 0u64, "frequency") {
            Err(RenderError::Allocation { plane: "frequency", .. }) => {}
            other => panic!("expected an allocation error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn pixels_index_row_major() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.escapes_mut()[4] = true;
        grid.set_density(vec![0, 0, 0, 0, 9, 0], 9);
        assert!(grid.escapes()[4]);
        assert!(!grid.escapes()[3]);
        assert_eq!(grid.count(&Pixel(1, 1)), 9);
        assert_eq!(grid.max(), 9);
    }
}
