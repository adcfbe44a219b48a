// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time iteration of `z ← z² + c`.
//!
//! Every function here counts iterations the same way: the first
//! iterated value is iteration 1, the loop stops at the first value
//! whose magnitude reaches 2 and reports its index, and a point that
//! never gets there is reported as `limit`.  A point escapes iff the
//! result is strictly less than `limit`.

use num::Complex;

use planes::{Pixel, PlaneMapper};

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// True when the point lies inside the main cardioid or the period-2
/// bulb, which together hold most of the set's area.  Points there never
/// escape, so there is no need to iterate them.  False says nothing; the
/// point may still be bounded.
pub fn in_main_bulbs(c: &Complex<f64>) -> bool {
    let y = c.im * c.im;
    let q = (c.re - D4) * (c.re - D4) + y;
    q * (q + (c.re - D4)) <= y * D4 || (c.re + 1.0) * (c.re + 1.0) + y <= D16
}

/// This is our classic iterator function, which returns the number of
/// iterations it took to escape, or `limit` if the point never did.
pub fn escape_time(c: &Complex<f64>, limit: usize) -> usize {
    trace_orbit(c, limit, |_| ())
}

/// Runs the same iteration as `escape_time` and hands every iterated
/// value to `visit`, except the one that escaped.  The trace is the
/// orbit's path inside the escape radius, not its exit point.
pub fn trace_orbit<F>(c: &Complex<f64>, limit: usize, mut visit: F) -> usize
where
    F: FnMut(Complex<f64>),
{
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    for i in 1..limit {
        z = z * z + c;
        if z.norm_sqr() >= 4.0_f64 {
            return i;
        }
        visit(z);
    }
    limit
}

/// Escape time of the point under a pixel.  Points known to be inside
/// the set are answered without iterating.
pub fn classify(plane: &PlaneMapper, pixel: &Pixel, limit: usize) -> usize {
    let c = plane.pixel_to_point(pixel);
    if in_main_bulbs(&c) {
        return limit;
    }
    escape_time(&c, limit)
}

/// Escape time of the point under a pixel, reporting the orbit to
/// `visit` as `trace_orbit` does.
pub fn classify_with_trace<F>(plane: &PlaneMapper, pixel: &Pixel, limit: usize, visit: F) -> usize
where
    F: FnMut(Complex<f64>),
{
    trace_orbit(&plane.pixel_to_point(pixel), limit, visit)
}
