// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The final pass: counts through the color mapper into an interleaved
//! RGB buffer, row-major, top to bottom, left to right, three bytes per
//! pixel and no padding.  That layout is what the image writer expects.

use itertools::iproduct;

use color::{ColorMapper, Rgb};
use error::RenderError;
use grid::{Grid, BYTES_PER_PIXEL};
use planes::Pixel;
use workers::{drain, CancelToken};

fn write_rgb(slot: &mut [u8], color: Rgb) {
    slot[0] = color.0;
    slot[1] = color.1;
    slot[2] = color.2;
}

/// Writes one pixel's color into a buffer `width` pixels wide.
pub fn draw_pixel(buffer: &mut [u8], width: usize, pixel: &Pixel, color: Rgb) {
    let offset = (pixel.1 * width + pixel.0) * BYTES_PER_PIXEL;
    write_rgb(&mut buffer[offset..offset + BYTES_PER_PIXEL], color);
}

/// Colors every pixel of the grid into a fresh buffer, one at a time.
pub fn rasterize(grid: &Grid, colors: &ColorMapper) -> Vec<u8> {
    let mut buffer = vec![0u8; grid.len() * BYTES_PER_PIXEL];
    for (row, column) in iproduct!(0..grid.height(), 0..grid.width()) {
        let pixel = Pixel(column, row);
        draw_pixel(&mut buffer, grid.width(), &pixel, colors.color(grid.count(&pixel)));
    }
    buffer
}

/// Colors every pixel of the grid into the grid's own RGB plane, on
/// `threads` workers.  Produces the same bytes as `rasterize`.
pub fn paint(
    grid: &mut Grid,
    colors: &ColorMapper,
    threads: usize,
    cancel: &CancelToken,
) -> Result<(), RenderError> {
    let (counts, raster) = grid.counts_and_raster_mut();
    let slots = raster.chunks_mut(BYTES_PER_PIXEL).zip(counts.iter());
    drain(threads, slots, cancel, |(slot, count)| {
        write_rgb(slot, colors.color(*count))
    })
}
