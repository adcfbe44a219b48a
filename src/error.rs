// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types for the renderer and for the image writer.  The two are
//! kept apart: a render can fail on its own, but whether the finished
//! raster reaches disk is the host program's business.

use std::io;

/// Everything that can stop a render before it produces a raster.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The complex-plane corners do not describe a usable rectangle.
    #[fail(display = "invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// One of the image dimensions is zero.
    #[fail(display = "image dimensions must be nonzero, got {}x{}", width, height)]
    EmptyImage {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The iteration cap must allow at least one step.
    #[fail(display = "the iteration cap must be at least 1")]
    NoIterations,

    /// A render needs at least one worker.
    #[fail(display = "the thread count must be at least 1")]
    NoThreads,

    /// A plane of the grid could not be allocated.
    #[fail(display = "could not allocate {} cells for the {} plane", cells, plane)]
    Allocation {
        /// Number of cells requested.
        cells: usize,
        /// Which plane was being allocated.
        plane: &'static str,
    },

    /// A grid handed to a pass does not match the renderer's dimensions.
    #[fail(
        display = "grid is {}x{} but the run is configured for {}x{}",
        grid_width, grid_height, width, height
    )]
    GridShape {
        /// Width of the offending grid.
        grid_width: usize,
        /// Height of the offending grid.
        grid_height: usize,
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },

    /// No orbit ever landed inside the viewport, so there is nothing to
    /// average and nothing to color.
    #[fail(display = "no point in the viewport escapes; nothing to plot")]
    NoEscapes,

    /// The run's cancel token was triggered between pixels.
    #[fail(display = "render cancelled")]
    Cancelled,

    /// A worker thread panicked; its share of the pass is lost.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

/// Failures writing a finished raster to disk.
#[derive(Debug, Fail)]
pub enum OutputError {
    /// The destination could not be created.
    #[fail(display = "could not open {}: {}", path, cause)]
    Open {
        /// Destination path.
        path: String,
        /// Underlying error.
        #[cause]
        cause: io::Error,
    },

    /// The destination was opened but the image could not be written.
    #[fail(display = "could not write {}: {}", path, cause)]
    Write {
        /// Destination path.
        path: String,
        /// Underlying error.
        #[cause]
        cause: io::Error,
    },

    /// The raster does not hold width × height RGB triples.
    #[fail(
        display = "raster holds {} bytes but a {}x{} RGB image needs {}",
        len, width, height, expected
    )]
    Size {
        /// Bytes supplied.
        len: usize,
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
        /// Bytes required.
        expected: usize,
    },
}
