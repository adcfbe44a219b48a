// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The three-pass pipeline.
//!
//! Pass one iterates every pixel once to find out which points escape.
//! Pass two iterates the escaping points again and counts where their
//! orbits go.  Between them and the final pass sits a reduction over
//! the counts; the final pass colors each pixel by its count.  Each pass
//! runs on the worker pool and finishes completely before the next one
//! starts.

use std::time::Instant;

use color::{ColorMapper, ColorPolicy};
use config::RunConfig;
use density::DensityAccumulator;
use error::RenderError;
use escape::{classify, classify_with_trace};
use grid::Grid;
use planes::PlaneMapper;
use raster::paint;
use stats::{compute_stats, Statistics};
use workers::{drain, CancelToken};

/// The product of a finished run: the grid with all three planes filled
/// in, and the statistics of its counts.
#[derive(Debug, Clone)]
pub struct Render {
    /// Escape flags, counts and the RGB raster.
    pub grid: Grid,
    /// Summary of the counts.
    pub stats: Statistics,
    /// The policy the raster was colored with.
    pub policy: ColorPolicy,
}

/// The parameters by which a buddhabrot is generated.  Once set, this
/// object should not be mutable.
pub struct Renderer {
    config: RunConfig,
    plane: PlaneMapper,
    cancel: CancelToken,
}

impl Renderer {
    /// Prepares a renderer for one configuration.
    pub fn new(config: RunConfig) -> Result<Self, RenderError> {
        let plane = PlaneMapper::new(config.width(), config.height(), config.viewport())?;
        Ok(Renderer {
            config,
            plane,
            cancel: CancelToken::new(),
        })
    }

    /// Uses `cancel` instead of the renderer's own token, so the caller
    /// can stop the run from another thread.
    pub fn with_cancel(self, cancel: CancelToken) -> Self {
        Renderer { cancel, ..self }
    }

    /// A handle on this renderer's cancel token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The configuration this renderer was built with.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The pixel/complex mapping for this run.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// A fresh grid the size of this run's image.
    pub fn grid(&self) -> Result<Grid, RenderError> {
        Grid::new(self.config.width(), self.config.height())
    }

    fn check(&self, grid: &Grid) -> Result<(), RenderError> {
        if grid.width() != self.config.width() || grid.height() != self.config.height() {
            return Err(RenderError::GridShape {
                grid_width: grid.width(),
                grid_height: grid.height(),
                width: self.config.width(),
                height: self.config.height(),
            });
        }
        Ok(())
    }

    /// Pass one: marks every pixel whose point escapes.  Returns how many
    /// did.
    pub fn mark_escapes(&self, grid: &mut Grid) -> Result<usize, RenderError> {
        self.check(grid)?;
        let started = Instant::now();
        let plane = &self.plane;
        let limit = self.config.max_iterations();

        drain(
            self.config.threads(),
            grid.escapes_mut().iter_mut().enumerate(),
            &self.cancel,
            |(offset, escapes)| {
                *escapes = classify(plane, &plane.pixel(offset), limit) < limit;
            },
        )?;

        let escaping = grid.escapes().iter().filter(|e| **e).count();
        debug!(
            "escape pass: {} of {} pixels escape ({:?})",
            escaping,
            grid.len(),
            started.elapsed()
        );
        Ok(escaping)
    }

    /// Pass two: traces the orbit of every escaping pixel and fills in
    /// the grid's counts and maximum.
    pub fn accumulate(&self, grid: &mut Grid) -> Result<(), RenderError> {
        self.check(grid)?;
        let started = Instant::now();
        let plane = &self.plane;
        let limit = self.config.max_iterations();
        let density = DensityAccumulator::new(plane)?;

        {
            let sources = grid
                .escapes()
                .iter()
                .enumerate()
                .filter(|&(_, escapes)| *escapes)
                .map(|(offset, _)| offset);
            let density = &density;
            drain(self.config.threads(), sources, &self.cancel, |offset| {
                classify_with_trace(plane, &plane.pixel(offset), limit, |z| density.visit(z));
            })?;
        }

        let (counts, max) = density.finish();
        grid.set_density(counts, max);
        debug!("density pass: max count {} ({:?})", max, started.elapsed());
        Ok(())
    }

    /// Pass three: colors the grid's counts into its RGB plane.
    pub fn paint(&self, grid: &mut Grid, colors: &ColorMapper) -> Result<(), RenderError> {
        self.check(grid)?;
        let started = Instant::now();
        paint(grid, colors, self.config.threads(), &self.cancel)?;
        debug!("paint pass: {} colors ({:?})", colors.policy(), started.elapsed());
        Ok(())
    }

    /// Runs all three passes and the statistics between them.
    pub fn render(&self, policy: ColorPolicy) -> Result<Render, RenderError> {
        info!(
            "rendering {}x{} at {} iterations on {} thread(s)",
            self.config.width(),
            self.config.height(),
            self.config.max_iterations(),
            self.config.threads()
        );

        let result = self.passes(policy);
        if let Err(RenderError::Cancelled) = result {
            warn!("render cancelled");
        }
        result
    }

    fn passes(&self, policy: ColorPolicy) -> Result<Render, RenderError> {
        let mut grid = self.grid()?;
        self.mark_escapes(&mut grid)?;
        self.accumulate(&mut grid)?;
        let stats = compute_stats(&grid, self.config.max_iterations())?;
        self.paint(&mut grid, &ColorMapper::new(policy, &stats))?;
        info!(
            "rendered: {} pixels visited, max count {}, mean {:.2}",
            stats.escaped, stats.max, stats.mean
        );
        Ok(Render {
            grid,
            stats,
            policy,
        })
    }
}

/// Renders `config` in one call.
pub fn render(config: RunConfig, policy: ColorPolicy) -> Result<Render, RenderError> {
    Renderer::new(config)?.render(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Viewport;
    use num::Complex;

    #[test]
    fn escapes_match_single_point_classification() {
        let renderer = Renderer::new(RunConfig::new(12, 8, 100).unwrap()).unwrap();
        let mut grid = renderer.grid().unwrap();
        let escaping = renderer.mark_escapes(&mut grid).unwrap();
        assert_eq!(escaping, grid.escapes().iter().filter(|e| **e).count());
        for offset in 0..grid.len() {
            let pixel = renderer.plane().pixel(offset);
            assert_eq!(
                grid.escapes()[offset],
                classify(renderer.plane(), &pixel, 100) < 100
            );
        }
    }

    #[test]
    fn accumulation_records_the_running_max() {
        let renderer = Renderer::new(RunConfig::new(40, 30, 200).unwrap()).unwrap();
        let mut grid = renderer.grid().unwrap();
        renderer.mark_escapes(&mut grid).unwrap();
        renderer.accumulate(&mut grid).unwrap();
        assert!(grid.max() > 0);
        assert_eq!(grid.counts().iter().cloned().max(), Some(grid.max()));
    }

    #[test]
    fn mismatched_grids_are_refused() {
        let renderer = Renderer::new(RunConfig::new(4, 4, 50).unwrap()).unwrap();
        let mut grid = Grid::new(5, 4).unwrap();
        match renderer.mark_escapes(&mut grid) {
            Err(RenderError::GridShape { .. }) => {}
            other => panic!("expected a shape error, got {:?}", other),
        }
    }

    #[test]
    fn a_viewport_inside_the_cardioid_is_degenerate() {
        let vp = Viewport::new(Complex::new(-0.1, -0.1), Complex::new(0.1, 0.1)).unwrap();
        let config = RunConfig::new(8, 8, 100).unwrap().with_viewport(vp);
        match render(config, ColorPolicy::Percentile) {
            Err(RenderError::NoEscapes) => {}
            other => panic!("expected NoEscapes, got {:?}", other.map(|r| r.stats)),
        }
    }

    #[test]
    fn an_external_token_cancels_the_run() {
        let cancel = CancelToken::new();
        let renderer = Renderer::new(RunConfig::new(16, 16, 100).unwrap())
            .unwrap()
            .with_cancel(cancel.clone());
        assert_eq!(renderer.config().width(), 16);
        cancel.cancel();
        assert!(renderer.cancel_token().is_cancelled());
        let mut grid = renderer.grid().unwrap();
        match renderer.mark_escapes(&mut grid) {
            Err(RenderError::Cancelled) => {}
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[test]
    fn a_cancelled_renderer_stops() {
        let renderer = Renderer::new(RunConfig::new(16, 16, 100).unwrap()).unwrap();
        renderer.cancel_token().cancel();
        match renderer.render(ColorPolicy::Fraction) {
            Err(RenderError::Cancelled) => {}
            other => panic!("expected cancellation, got {:?}", other.map(|r| r.stats)),
        }
    }
}
