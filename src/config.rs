// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parameters of a single render.  Once a run starts none of this
//! changes; the renderer keeps its own copy.

use num::Complex;

use error::RenderError;

/// The rectangle of the complex plane mapped onto the pixel grid.  The
/// real part is the x-axis and the imaginary part the y-axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge.
    pub real_min: f64,
    /// Right edge.
    pub real_max: f64,
    /// Edge mapped to the first row.
    pub imag_min: f64,
    /// Edge mapped past the last row.
    pub imag_max: f64,
}

impl Viewport {
    /// Builds a viewport from its left-lower and right-upper corners.
    pub fn new(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Result<Viewport, RenderError> {
        let corners = [leftlower.re, leftlower.im, rightupper.re, rightupper.im];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(RenderError::InvalidViewport(
                "corner coordinates must be finite".to_string(),
            ));
        }

        if rightupper.re <= leftlower.re {
            return Err(RenderError::InvalidViewport(
                "the left lower corner is not to the left of the right upper corner".to_string(),
            ));
        }

        if rightupper.im <= leftlower.im {
            return Err(RenderError::InvalidViewport(
                "the left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        Ok(Viewport {
            real_min: leftlower.re,
            real_max: rightupper.re,
            imag_min: leftlower.im,
            imag_max: rightupper.im,
        })
    }

    /// Width of the rectangle along the real axis.
    pub fn real_span(&self) -> f64 {
        self.real_max - self.real_min
    }

    /// Height of the rectangle along the imaginary axis.
    pub fn imag_span(&self) -> f64 {
        self.imag_max - self.imag_min
    }

    /// The left-lower corner as a complex number.
    pub fn origin(&self) -> Complex<f64> {
        Complex::new(self.real_min, self.imag_min)
    }
}

/// The classic full view of the set: real in [-2, 1], imaginary in [-1, 1].
impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            real_min: -2.0,
            real_max: 1.0,
            imag_min: -1.0,
            imag_max: 1.0,
        }
    }
}

/// Image size, iteration cap, viewport and worker count for one run.
/// Fields are private; the builder methods consume and return the value
/// so a config handed to a renderer cannot be changed under it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunConfig {
    width: usize,
    height: usize,
    max_iterations: usize,
    viewport: Viewport,
    threads: usize,
}

impl RunConfig {
    /// A single-threaded run over the default viewport.
    pub fn new(width: usize, height: usize, max_iterations: usize) -> Result<RunConfig, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }
        if max_iterations == 0 {
            return Err(RenderError::NoIterations);
        }
        Ok(RunConfig {
            width,
            height,
            max_iterations,
            viewport: Viewport::default(),
            threads: 1,
        })
    }

    /// Replaces the viewport.
    pub fn with_viewport(self, viewport: Viewport) -> RunConfig {
        RunConfig { viewport, ..self }
    }

    /// Sets the number of worker threads used by each pass.
    pub fn with_threads(self, threads: usize) -> Result<RunConfig, RenderError> {
        if threads == 0 {
            return Err(RenderError::NoThreads);
        }
        Ok(RunConfig { threads, ..self })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Iteration cap per orbit.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// The mapped region of the complex plane.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Worker threads per pass.
    pub fn threads(&self) -> usize {
        self.threads
    }
}
