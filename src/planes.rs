// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a viewport on the complex plane.
use num::Complex;

use config::Viewport;
use error::RenderError;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a point in a region: column first, then row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

// Quotients this close to a whole pixel are taken to be on it.
const SNAP: f64 = 1e-9;

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a rectangle of the complex plane.  Maps points from one to the
/// other.  The mapping is affine both ways and uses the same step size
/// in each direction, so a pixel survives the round trip.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The region of the complex plane being mapped.
    pub viewport: Viewport,
    // The complex distance covered by one pixel, along each axis.
    steps: (f64, f64),
}

impl PlaneMapper {
    /// Takes the size of the integral plane and the viewport it covers.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }

        let steps = (
            viewport.real_span() / (width as f64),
            viewport.imag_span() / (height as f64),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            viewport,
            steps,
        })
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Width of the integral plane.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height of the integral plane.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// Given a pixel on the integral cartesian plane, return the complex
    /// number at its corner.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        self.viewport.origin()
            + Complex::new(self.steps.0 * (pixel.0 as f64), self.steps.1 * (pixel.1 as f64))
    }

    /// Given a complex number, return the integral coordinates it falls
    /// on, truncated toward zero.  There is no bounds check; the result
    /// may lie anywhere, including off the grid.
    pub fn point_to_coords(&self, point: &Complex<f64>) -> (i64, i64) {
        let (left, top) = self.scaled(point);
        (left as i64, top as i64)
    }

    /// Like `point_to_coords`, but only for points whose truncated
    /// coordinates land on the grid.  A point up to one pixel left of or
    /// above the viewport truncates onto column or row 0 and is kept.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let (left, top) = self.scaled(point);
        if !(left.is_finite() && top.is_finite()) {
            return None;
        }
        let (x, y) = (left as i64, top as i64);
        let IntegralPlane(width, height) = self.integral_plane;
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return None;
        }
        Some(Pixel(x as usize, y as usize))
    }

    /// Since the Buddhabrot actually tracks the progress of a complex
    /// number as it orbits, we have to map those complex numbers back
    /// to the pixel plane, and then increment those points on the pixel
    /// plane as the orbit passes through them.  This function takes a
    /// point, maps it to pixel coordinates, then returns the linear
    /// offset from the root of the image buffer in memory.
    pub fn point_to_offset(&self, point: &Complex<f64>) -> Option<usize> {
        self.point_to_pixel(point).map(|p| self.offset(&p))
    }

    /// Row-major offset of a pixel.
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.integral_plane.0 + pixel.0
    }

    /// The pixel at a row-major offset.
    pub fn pixel(&self, offset: usize) -> Pixel {
        Pixel(offset % self.integral_plane.0, offset / self.integral_plane.0)
    }

    // Distance from the origin in pixels, before truncation.
    fn scaled(&self, point: &Complex<f64>) -> (f64, f64) {
        (
            snap(
                (point.re - self.viewport.real_min) / self.steps.0,
                self.integral_plane.0,
            ),
            snap(
                (point.im - self.viewport.imag_min) / self.steps.1,
                self.integral_plane.1,
            ),
        )
    }
}

// Pulls a quotient onto the nearest whole pixel when it is within SNAP of
// it, except onto the far edge: a point inside the viewport stays inside.
fn snap(v: f64, edge: usize) -> f64 {
    let nearest = v.round();
    if (v - nearest).abs() < SNAP && !(v < edge as f64 && nearest >= edge as f64) {
        nearest
    } else {
        v
    }
}
