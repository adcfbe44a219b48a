#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Buddhabrot density renderer
//!
//! The Buddhabrot is a variant of the Mandelbrot set that plots where
//! escaping points go rather than how fast they leave.  Every point of
//! the viewport is iterated under `z ← z² + c`; for the points that
//! escape, each intermediate value of the orbit is mapped back to the
//! nearest pixel and that pixel is incremented.  The resulting density
//! is colored by one of three policies, the most useful of which places
//! its color bands on the decile thresholds of the counts.
//!
//! A render is three passes over a `Grid`, driven by a `Renderer`:
//!
//! 1. classify every pixel as escaping or bounded,
//! 2. trace the orbit of every escaping pixel into the count plane,
//! 3. color every count into the RGB plane,
//!
//! with the statistics of the counts computed between the second and
//! third.  Each pass runs on a pool of scoped worker threads and may be
//! cancelled between pixels.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

#[cfg(test)]
extern crate tempfile;

pub mod color;
pub mod config;
pub mod density;
pub mod error;
pub mod escape;
pub mod grid;
pub mod output;
pub mod planes;
pub mod raster;
pub mod render;
pub mod report;
pub mod stats;
pub mod workers;

pub use color::{ColorMapper, ColorPolicy, Rgb};
pub use config::{RunConfig, Viewport};
pub use error::{OutputError, RenderError};
pub use grid::Grid;
pub use planes::{Pixel, PlaneMapper};
pub use render::{render, Render, Renderer};
pub use report::Report;
pub use stats::{compute_stats, Statistics};
pub use workers::CancelToken;
