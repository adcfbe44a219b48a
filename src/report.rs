// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A plain-text summary of a finished render: the run parameters, the
//! mean and maximum count, a twenty-bucket histogram of the counts, and
//! the decile thresholds when the percentile policy was used.

use std::fmt;

use color::ColorPolicy;
use render::Render;
use stats::HISTOGRAM_BUCKETS;

/// Displays the statistics of a render.
pub struct Report<'a> {
    render: &'a Render,
}

impl<'a> Report<'a> {
    /// A report on `render`.
    pub fn new(render: &'a Render) -> Self {
        Report { render }
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let stats = &self.render.stats;
        let grid = &self.render.grid;

        writeln!(f, "Iterations: {}", stats.iterations)?;
        writeln!(f, "Dimensions: {}x{}px", grid.width(), grid.height())?;
        writeln!(f, "Mean count: {:.2}", stats.mean)?;
        writeln!(f, "Max count: {}", stats.max)?;
        writeln!(
            f,
            "Escaping points: {} ({:.2}%)",
            stats.escaped,
            stats.escaped_fraction() * 100.0
        )?;
        writeln!(f)?;

        let histogram = stats.histogram();
        let mut cumulative = 0.0;
        for bucket in 0..HISTOGRAM_BUCKETS {
            let (low, high) = stats.bucket_range(bucket);
            let n = histogram[bucket];
            let pct = n as f64 / stats.escaped as f64 * 100.0;
            cumulative += pct;
            writeln!(
                f,
                "{:2} {:6} - {:6} {:15}  {:6.2}  {:6.2}",
                bucket + 1,
                low as u64,
                high as u64,
                n,
                pct,
                cumulative
            )?;
        }

        if self.render.policy == ColorPolicy::Percentile {
            writeln!(f)?;
            write!(f, "Deciles:")?;
            for limit in stats.percentiles.iter() {
                write!(f, " {}", limit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::RunConfig;
    use render::render;

    fn report_of(policy: ColorPolicy) -> String {
        let config = RunConfig::new(30, 20, 100).unwrap();
        let render = render(config, policy).unwrap();
        Report::new(&render).to_string()
    }

    #[test]
    fn report_lists_run_and_histogram() {
        let text = report_of(ColorPolicy::Fraction);
        assert!(text.starts_with("Iterations: 100\n"));
        assert!(text.contains("Dimensions: 30x20px\n"));
        assert!(text.contains("Max count: "));
        assert!(text.contains("Escaping points: "));
        assert!(text.lines().any(|l| l.starts_with("20 ")));
        assert!(text.contains("100.00"));
        assert!(!text.contains("Deciles:"));
    }

    #[test]
    fn percentile_reports_list_deciles() {
        let text = report_of(ColorPolicy::Percentile);
        let deciles = text.lines().find(|l| l.starts_with("Deciles:")).unwrap();
        assert_eq!(deciles.split_whitespace().count(), 11);
    }
}
