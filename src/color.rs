// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning visitation counts into colors.
//!
//! Three policies are offered.  `Fraction` splits `[0, max]` into
//! twentieths and walks black, blue, purple, red, yellow, white along
//! them; because most counts are a few percent of the maximum, the first
//! three twentieths get a band each.  `Percentile` places its bands on
//! the decile thresholds of the run instead, so each band holds a known
//! share of the visited pixels no matter how skewed the counts are.
//! `Power` is a plain curve that needs nothing but the maximum.  Every
//! policy maps a count of zero to black.

use num::clamp;
use std::fmt;
use std::str::FromStr;

use stats::{Statistics, DECILES};

/// An 8-bit RGB triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Unvisited pixels.
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// The most visited pixels.
pub const WHITE: Rgb = Rgb(255, 255, 255);

/// Converts channel intensities in `[0, 1]` to bytes, truncating.
fn rgb(r: f64, g: f64, b: f64) -> Rgb {
    let byte = |v: f64| (clamp(v, 0.0, 1.0) * 255.0) as u8;
    Rgb(byte(r), byte(g), byte(b))
}

/// Which mapping from counts to colors to use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Bands at fixed fractions of the maximum count.
    Fraction,
    /// Bands at the run's decile thresholds.
    Percentile,
    /// `(a³, a³, a)` with `a = count / max`.
    Power,
}

impl ColorPolicy {
    /// Names accepted by `from_str`, for command-line help.
    pub const NAMES: &'static [&'static str] = &["fraction", "percentile", "power"];
}

impl FromStr for ColorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fraction" => Ok(ColorPolicy::Fraction),
            "percentile" => Ok(ColorPolicy::Percentile),
            "power" => Ok(ColorPolicy::Power),
            _ => Err(format!("unknown color policy '{}'", s)),
        }
    }
}

impl fmt::Display for ColorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            ColorPolicy::Fraction => "fraction",
            ColorPolicy::Percentile => "percentile",
            ColorPolicy::Power => "power",
        };
        f.write_str(name)
    }
}

/// Maps counts to colors for one run, using that run's statistics.
#[derive(Debug, Clone, Copy)]
pub struct ColorMapper<'a> {
    policy: ColorPolicy,
    stats: &'a Statistics,
}

impl<'a> ColorMapper<'a> {
    /// A mapper applying `policy` against `stats`.
    pub fn new(policy: ColorPolicy, stats: &'a Statistics) -> Self {
        ColorMapper { policy, stats }
    }

    /// The policy in use.
    pub fn policy(&self) -> ColorPolicy {
        self.policy
    }

    /// The color of a pixel visited `count` times.
    pub fn color(&self, count: u32) -> Rgb {
        if count == 0 || self.stats.max == 0 {
            return BLACK;
        }
        match self.policy {
            ColorPolicy::Fraction => fraction(count, self.stats.max),
            ColorPolicy::Percentile => percentile(count, &self.stats.percentiles),
            ColorPolicy::Power => power(count, self.stats.max),
        }
    }
}

fn fraction(count: u32, max: u32) -> Rgb {
    let twentieth = f64::from(max) / 20.0;
    let c = f64::from(count);

    if c < twentieth {
        // 0-5%: half through full blue
        let a = c / twentieth / 2.0;
        return rgb(0.0, 0.0, 0.5 + a);
    }
    if c < twentieth * 2.0 {
        // 5-10%: blue through purple
        let a = (c - twentieth) / twentieth;
        return rgb(a, 0.0, 1.0);
    }
    if c < twentieth * 3.0 {
        // 10-15%: purple through red
        let a = (c - twentieth * 2.0) / twentieth;
        return rgb(1.0, 0.0, 1.0 - a);
    }
    if c < twentieth * 10.0 {
        // 15-50%: red through yellow
        let a = (c - twentieth * 3.0) / (twentieth * 7.0);
        return rgb(1.0, a, 0.0);
    }
    // 50-100%: yellow through white
    let a = (c - twentieth * 10.0) / (twentieth * 10.0);
    rgb(1.0, 1.0, a)
}

// Position of `count` within `[low, high]`; a band of zero width has
// every count at its bottom.
fn rank(count: u32, low: u32, high: u32) -> f64 {
    if high <= low {
        return 0.0;
    }
    clamp(
        (f64::from(count) - f64::from(low)) / (f64::from(high) - f64::from(low)),
        0.0,
        1.0,
    )
}

fn percentile(count: u32, limits: &[u32; DECILES]) -> Rgb {
    let max = limits[DECILES - 1];
    if count >= max {
        return WHITE;
    }

    if count < limits[1] {
        // 0-20%: blue ramp
        let a = rank(count, 0, limits[1]);
        rgb(0.0, 0.0, 0.5 + a / 2.0)
    } else if count < limits[2] {
        // 20-30%: blue through purple
        let a = rank(count, limits[1], limits[2]);
        rgb(a, 0.0, 1.0)
    } else if count < limits[4] {
        // 30-50%: purple through red
        let a = rank(count, limits[2], limits[4]);
        rgb(1.0, 0.0, 1.0 - a)
    } else if count < limits[5] {
        // 50-60%: red through yellow
        let a = rank(count, limits[4], limits[5]);
        rgb(1.0, a, 0.0)
    } else if count < limits[6] {
        // 60-70%: yellow through green
        let a = rank(count, limits[5], limits[6]);
        rgb(1.0 - a, 1.0, 0.0)
    } else if count < limits[7] {
        // 70-80%: green through cyan
        let a = rank(count, limits[6], limits[7]);
        rgb(0.0, 1.0, a)
    } else {
        // 80-100%: cyan through white
        let a = rank(count, limits[7], max);
        rgb(a, 1.0, 1.0)
    }
}

fn power(count: u32, max: u32) -> Rgb {
    let a = f64::from(count) / f64::from(max);
    let cube = a * a * a;
    rgb(cube, cube, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(max: u32, percentiles: [u32; DECILES]) -> Statistics {
        Statistics {
            iterations: 50,
            cells: 100,
            max,
            mean: 1.0,
            frequency: vec![0; max as usize + 1],
            escaped: 10,
            percentiles,
        }
    }

    const POLICIES: [ColorPolicy; 3] =
        [ColorPolicy::Fraction, ColorPolicy::Percentile, ColorPolicy::Power];

    #[test]
    fn zero_is_black_under_every_policy() {
        let s = stats(100, [10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        for policy in POLICIES.iter() {
            assert_eq!(ColorMapper::new(*policy, &s).color(0), BLACK);
        }
    }

    #[test]
    fn max_is_white_under_every_policy() {
        let s = stats(100, [10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        for policy in POLICIES.iter() {
            assert_eq!(ColorMapper::new(*policy, &s).color(100), WHITE);
        }
    }

    #[test]
    fn fraction_bands() {
        let s = stats(200, [0; DECILES]);
        let m = ColorMapper::new(ColorPolicy::Fraction, &s);
        // twentieth = 10
        assert_eq!(m.color(1), Rgb(0, 0, 140));
        assert_eq!(m.color(15), Rgb(127, 0, 255));
        assert_eq!(m.color(25), Rgb(255, 0, 127));
        assert_eq!(m.color(30), Rgb(255, 0, 0));
        assert_eq!(m.color(100), Rgb(255, 255, 0));
        assert_eq!(m.color(150), Rgb(255, 255, 127));
    }

    #[test]
    fn percentile_bands() {
        let s = stats(100, [10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        let m = ColorMapper::new(ColorPolicy::Percentile, &s);
        assert_eq!(m.color(10), Rgb(0, 0, 191));
        assert_eq!(m.color(25), Rgb(127, 0, 255));
        assert_eq!(m.color(40), Rgb(255, 0, 127));
        assert_eq!(m.color(55), Rgb(255, 127, 0));
        assert_eq!(m.color(65), Rgb(127, 255, 0));
        assert_eq!(m.color(75), Rgb(0, 255, 127));
        assert_eq!(m.color(90), Rgb(127, 255, 255));
    }

    #[test]
    fn collapsed_percentile_bands_do_not_divide_by_zero() {
        let s = stats(7, [1, 1, 1, 1, 1, 1, 1, 1, 1, 7]);
        let m = ColorMapper::new(ColorPolicy::Percentile, &s);
        // everything below the top band is empty, so 1 starts cyan
        assert_eq!(m.color(1), Rgb(0, 255, 255));
        assert_eq!(m.color(4), Rgb(127, 255, 255));
        assert_eq!(m.color(7), WHITE);

        let flat = stats(4, [4; DECILES]);
        let m = ColorMapper::new(ColorPolicy::Percentile, &flat);
        assert_eq!(m.color(1), Rgb(0, 0, 159));
        assert_eq!(m.color(4), WHITE);
    }

    #[test]
    fn zero_width_bands_rank_at_the_bottom() {
        assert_eq!(rank(5, 3, 3), 0.0);
        assert_eq!(rank(5, 4, 2), 0.0);
        assert_eq!(rank(9, 0, 4), 1.0);
    }

    #[test]
    fn power_curve() {
        let s = stats(10, [0; DECILES]);
        let m = ColorMapper::new(ColorPolicy::Power, &s);
        assert_eq!(m.color(5), Rgb(31, 31, 127));
    }

    #[test]
    fn policies_parse_and_print() {
        for name in ColorPolicy::NAMES {
            let policy: ColorPolicy = name.parse().unwrap();
            assert_eq!(policy.to_string(), *name);
        }
        assert!("sepia".parse::<ColorPolicy>().is_err());
    }
}
