// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Orbit density.  Each escaping point is iterated again and every value
//! its orbit takes is mapped back onto the pixel plane, where the pixel
//! it lands on is incremented.  Many source orbits land on the same
//! target pixel, so the counters are atomic and any number of workers
//! may feed one accumulator at once.

use num::Complex;
use std::sync::atomic::{AtomicU32, Ordering};

use error::RenderError;
use escape::trace_orbit;
use planes::PlaneMapper;

/// Visitation counters for one run, plus the running maximum.
pub struct DensityAccumulator<'a> {
    plane: &'a PlaneMapper,
    counts: Vec<AtomicU32>,
    max: AtomicU32,
}

impl<'a> DensityAccumulator<'a> {
    /// A zeroed counter for every pixel of the plane.
    pub fn new(plane: &'a PlaneMapper) -> Result<Self, RenderError> {
        let cells = plane.len();
        let mut counts = Vec::new();
        counts
            .try_reserve_exact(cells)
            .map_err(|_| RenderError::Allocation {
                cells,
                plane: "count",
            })?;
        counts.extend((0..cells).map(|_| AtomicU32::new(0)));
        Ok(DensityAccumulator {
            plane,
            counts,
            max: AtomicU32::new(0),
        })
    }

    /// Counts one orbit value.  Values that map off the grid are dropped;
    /// orbits leaving the viewport is normal.
    pub fn visit(&self, z: Complex<f64>) {
        if let Some(offset) = self.plane.point_to_offset(&z) {
            // Saturates at u32::MAX instead of wrapping back to zero.
            let count = match self.counts[offset].fetch_update(
                Ordering::Relaxed,
                Ordering::Relaxed,
                |n| n.checked_add(1),
            ) {
                Ok(previous) => previous + 1,
                Err(saturated) => saturated,
            };
            self.max.fetch_max(count, Ordering::Relaxed);
        }
    }

    /// Re-iterates the point `c` and counts every value of its orbit
    /// short of the escaping one.  Returns the escape time.
    pub fn trace(&self, c: &Complex<f64>, limit: usize) -> usize {
        trace_orbit(c, limit, |z| self.visit(z))
    }

    /// Unwraps the counters into a plain count plane and its maximum.
    pub fn finish(self) -> (Vec<u32>, u32) {
        let max = self.max.into_inner();
        let counts = self.counts.into_iter().map(AtomicU32::into_inner).collect();
        (counts, max)
    }
}
