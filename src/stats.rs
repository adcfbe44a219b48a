// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reductions over a finished count plane.
//!
//! Nearly all visited pixels have small counts and a handful near the
//! center of the figure have enormous ones, so a coloring that divides
//! the range evenly spends most of its palette on almost no pixels.
//! The decile thresholds computed here let the color mapper spread the
//! palette by population instead of by value.

use error::RenderError;
use grid::{plane, Grid};

/// Number of percentile thresholds, one per tenth of the escaping cells.
pub const DECILES: usize = 10;

/// Number of equal-width buckets in the count histogram.
pub const HISTOGRAM_BUCKETS: usize = 20;

/// Summary of a count plane.  Read-only once computed.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Iteration cap of the run the counts came from.
    pub iterations: usize,
    /// Total number of cells in the grid.
    pub cells: usize,
    /// Largest count.
    pub max: u32,
    /// Mean count over the nonzero cells.
    pub mean: f64,
    /// `frequency[c]` is the number of cells holding count `c`; sized
    /// `max + 1`.  `frequency[0]` is left at zero.
    pub frequency: Vec<u64>,
    /// Number of nonzero cells.
    pub escaped: usize,
    /// Ascending decile thresholds; `percentiles[k]` is the count below
    /// which roughly `(k + 1) * 10%` of the nonzero cells fall.  The last
    /// one is always `max`.
    pub percentiles: [u32; DECILES],
}

/// Reduces a grid's count plane.  A plane with no nonzero cells has no
/// mean and no percentiles; that is reported as `NoEscapes`.
pub fn compute_stats(grid: &Grid, iterations: usize) -> Result<Statistics, RenderError> {
    let max = grid.counts().iter().cloned().max().unwrap_or(0);
    debug_assert_eq!(max, grid.max());

    let mut frequency = plane(max as usize + 1, 0u64, "frequency")?;
    let mut sum = 0u64;
    let mut escaped = 0usize;
    for &count in grid.counts().iter().filter(|c| **c != 0) {
        frequency[count as usize] += 1;
        sum += u64::from(count);
        escaped += 1;
    }

    if escaped == 0 {
        return Err(RenderError::NoEscapes);
    }

    Ok(Statistics {
        iterations,
        cells: grid.len(),
        max,
        mean: sum as f64 / escaped as f64,
        percentiles: percentiles(&frequency, escaped as u64, max),
        frequency,
        escaped,
    })
}

// Walks the counts in ascending order.  Decile k (1-based) resolves at the
// first count where the cumulative population exceeds k/10 of the total;
// several deciles may resolve on one count.
fn percentiles(frequency: &[u64], total: u64, max: u32) -> [u32; DECILES] {
    let mut limits = [0u32; DECILES];
    let mut resolved = 0;
    let mut cumulative = 0u64;

    for (count, n) in frequency.iter().enumerate().skip(1) {
        cumulative += n;
        while resolved < DECILES - 1 && cumulative * 10 > (resolved as u64 + 1) * total {
            limits[resolved] = count as u32;
            resolved += 1;
        }
        if resolved == DECILES - 1 {
            break;
        }
    }

    // Carry the last resolved threshold forward over any that never were.
    let carry = if resolved == 0 { max } else { limits[resolved - 1] };
    for limit in limits.iter_mut().take(DECILES - 1).skip(resolved) {
        *limit = carry;
    }
    limits[DECILES - 1] = max;
    limits
}

impl Statistics {
    /// Counts of nonzero cells in twenty equal-width ranges of `[1, max]`.
    /// A count `c` falls in bucket `min(20c / max, 19)`, so the top bucket
    /// is closed at `max` and the buckets always sum to `escaped`.
    pub fn histogram(&self) -> [usize; HISTOGRAM_BUCKETS] {
        let mut buckets = [0usize; HISTOGRAM_BUCKETS];
        let max = u64::from(self.max);
        if max == 0 {
            return buckets;
        }
        for (count, n) in self.frequency.iter().enumerate().skip(1) {
            let bucket = ((count as u64 * HISTOGRAM_BUCKETS as u64) / max) as usize;
            buckets[bucket.min(HISTOGRAM_BUCKETS - 1)] += *n as usize;
        }
        buckets
    }

    /// The count range `[low, high)` covered by a histogram bucket.
    pub fn bucket_range(&self, bucket: usize) -> (f64, f64) {
        let twentieth = f64::from(self.max) / HISTOGRAM_BUCKETS as f64;
        (twentieth * bucket as f64, twentieth * (bucket + 1) as f64)
    }

    /// Share of the grid's cells that were visited at least once.
    pub fn escaped_fraction(&self) -> f64 {
        self.escaped as f64 / self.cells as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_of(counts: &[u32]) -> Grid {
        let mut grid = Grid::new(counts.len(), 1).unwrap();
        let max = counts.iter().cloned().max().unwrap_or(0);
        grid.set_density(counts.to_vec(), max);
        grid
    }

    #[test]
    fn empty_planes_are_degenerate() {
        match compute_stats(&grid_of(&[0, 0, 0, 0]), 50) {
            Err(RenderError::NoEscapes) => {}
            other => panic!("expected NoEscapes, got {:?}", other),
        }
    }

    #[test]
    fn frequency_and_mean_ignore_empty_cells() {
        let stats = compute_stats(&grid_of(&[0, 1, 1, 2, 0, 4]), 50).unwrap();
        assert_eq!(stats.max, 4);
        assert_eq!(stats.frequency, vec![0, 2, 1, 0, 1]);
        assert_eq!(stats.escaped, 4);
        assert_eq!(stats.cells, 6);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.iterations, 50);
    }

    #[test]
    fn deciles_of_one_through_ten() {
        let counts: Vec<u32> = (1..11).collect();
        let stats = compute_stats(&grid_of(&counts), 50).unwrap();
        // cumulative k cells at count k; decile k needs more than k cells
        assert_eq!(stats.percentiles, [2, 3, 4, 5, 6, 7, 8, 9, 10, 10]);
    }

    #[test]
    fn several_deciles_can_share_a_count() {
        let mut counts = vec![1u32; 95];
        counts.extend(vec![7u32; 5]);
        let stats = compute_stats(&grid_of(&counts), 50).unwrap();
        assert_eq!(stats.percentiles, [1, 1, 1, 1, 1, 1, 1, 1, 1, 7]);
    }

    #[test]
    fn a_single_cell_resolves_every_decile() {
        let stats = compute_stats(&grid_of(&[0, 0, 3]), 50).unwrap();
        assert_eq!(stats.percentiles, [3; DECILES]);
    }

    #[test]
    fn unresolved_deciles_carry_forward() {
        // Only reachable through a truncated frequency table.
        assert_eq!(percentiles(&[0, 1, 1], 10, 9), [2, 2, 2, 2, 2, 2, 2, 2, 2, 9]);
        assert_eq!(percentiles(&[0, 1], 10, 5), [5; DECILES]);
        assert_eq!(percentiles(&[0], 10, 5), [5; DECILES]);
    }

    #[test]
    fn thresholds_are_monotone_and_end_at_max() {
        let counts: Vec<u32> = (0..500u32).map(|i| (i * i) % 97).collect();
        let stats = compute_stats(&grid_of(&counts), 50).unwrap();
        for pair in stats.percentiles.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(stats.percentiles[DECILES - 1], stats.max);
    }

    #[test]
    fn histogram_sums_to_escaped() {
        let counts: Vec<u32> = (0..500u32).map(|i| (i * 7) % 41).collect();
        let stats = compute_stats(&grid_of(&counts), 50).unwrap();
        let total: usize = stats.histogram().iter().sum();
        assert_eq!(total, stats.escaped);
    }

    #[test]
    fn the_maximum_lands_in_the_top_bucket() {
        let stats = compute_stats(&grid_of(&[1, 20, 10]), 50).unwrap();
        let buckets = stats.histogram();
        assert_eq!(buckets[1], 1);
        assert_eq!(buckets[10], 1);
        assert_eq!(buckets[19], 1);
        assert_eq!(stats.bucket_range(19), (19.0, 20.0));
    }

    #[test]
    fn recomputing_is_idempotent() {
        let grid = grid_of(&[0, 3, 3, 9, 1, 0, 2]);
        assert_eq!(compute_stats(&grid, 50).unwrap(), compute_stats(&grid, 50).unwrap());
    }

    #[test]
    fn escaped_fraction_counts_nonzero_cells() {
        let stats = compute_stats(&grid_of(&[0, 1, 0, 1]), 50).unwrap();
        assert_eq!(stats.escaped_fraction(), 0.5);
    }
}
