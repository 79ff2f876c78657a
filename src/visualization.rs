use std::path::Path;

use log::info;
use plotters::prelude::*;

use crate::error::{Error, Result};
use crate::gradient_descent::Diagnostics;

const CANVAS_SIZE: (u32, u32) = (1500, 500);
const PANEL_WIDTH: i32 = 750;

/// Plot-ready points derived from a fit's [`Diagnostics`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceSeries {
    /// `(iteration, ||g||)`
    pub gradient_norm: Vec<(usize, f64)>,
    /// `(iteration, l(B^r) - l(B^*))`
    pub loss_gap: Vec<(usize, f64)>,
}

impl ConvergenceSeries {
    pub fn new(diagnostics: &Diagnostics, baseline_loss: f64) -> Self {
        let gradient_norm = diagnostics
            .index
            .iter()
            .copied()
            .zip(diagnostics.gradient_norm.iter().copied())
            .collect();

        let loss_gap = diagnostics
            .index
            .iter()
            .zip(&diagnostics.loss)
            .map(|(&iteration, &loss)| (iteration, loss - baseline_loss))
            .collect();

        Self {
            gradient_norm,
            loss_gap,
        }
    }

    pub fn len(&self) -> usize {
        self.gradient_norm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradient_norm.is_empty()
    }

    fn iteration_range(&self) -> std::ops::Range<usize> {
        let first = self.gradient_norm.first().map_or(0, |&(i, _)| i);
        let last = self.gradient_norm.last().map_or(0, |&(i, _)| i);

        first..last.max(first + 1)
    }
}

/// `(min, max)` of `values`, widened when they coincide so the axis has extent.
fn value_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (low, high) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), v| {
        (low.min(v), high.max(v))
    });

    if !low.is_finite() || !high.is_finite() {
        return None;
    }

    if (high - low).abs() < f64::EPSILON {
        let pad = low.abs().max(1.0) * 0.5;
        Some((low - pad, high + pad))
    } else {
        Some((low, high))
    }
}

/// Draws gradient norm (log scale) and loss gap side by side into an SVG at `path`.
pub fn render(series: &ConvergenceSeries, path: &Path) -> Result<()> {
    if series.is_empty() {
        return Err(Error::InvalidInput("no diagnostics were recorded"));
    }

    let iterations = series.iteration_range();

    let positive_norms: Vec<(usize, f64)> = series
        .gradient_norm
        .iter()
        .copied()
        .filter(|&(_, norm)| norm > 0.0)
        .collect();
    let (norm_low, norm_high) = value_bounds(positive_norms.iter().map(|&(_, norm)| norm))
        .ok_or(Error::InvalidInput("gradient norms are not positive and finite"))?;
    // keep the log axis strictly positive after widening
    let norm_low = norm_low.max(f64::MIN_POSITIVE);

    let (gap_low, gap_high) = value_bounds(series.loss_gap.iter().map(|&(_, gap)| gap))
        .ok_or(Error::InvalidInput("loss gaps are not finite"))?;

    let root = SVGBackend::new(path, CANVAS_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (left, right) = root.split_horizontally(PANEL_WIDTH);

    let mut gradient_chart = ChartBuilder::on(&left)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(iterations.clone(), (norm_low..norm_high).log_scale())?;

    gradient_chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc("gradient norm (log)")
        .y_label_formatter(&|norm| format!("{norm:.0e}"))
        .draw()?;

    gradient_chart.draw_series(LineSeries::new(positive_norms, &BLUE))?;

    let mut loss_chart = ChartBuilder::on(&right)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(iterations, gap_low..gap_high)?;

    loss_chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc("l(B^r) - l(B^*)")
        .draw()?;

    loss_chart.draw_series(LineSeries::new(series.loss_gap.iter().copied(), &BLUE))?;

    root.present()?;

    info!("convergence plot written to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_generation::generate;
    use crate::gradient_descent::{Hyperparameters, LogisticRegression};
    use rand::{rngs::StdRng, SeedableRng};

    fn diagnostics(count: usize) -> Diagnostics {
        let mut diagnostics = Diagnostics::default();
        for i in 1..=count {
            diagnostics.index.push(i);
            diagnostics.gradient_norm.push(10.0 / i as f64);
            diagnostics.loss.push(0.5 + 1.0 / i as f64);
        }
        diagnostics
    }

    #[test]
    fn test_series_shapes_match_iteration_count() {
        let series = ConvergenceSeries::new(&diagnostics(250), 0.5);

        assert_eq!(series.len(), 250);
        assert_eq!(series.loss_gap.len(), 250);
        assert_eq!(series.gradient_norm[0], (1, 10.0));
    }

    #[test]
    fn test_loss_gap_subtracts_baseline() {
        let series = ConvergenceSeries::new(&diagnostics(4), 0.5);

        for (&(i, gap), expected) in series.loss_gap.iter().zip([1.0, 0.5, 1.0 / 3.0, 0.25]) {
            assert!((gap - expected).abs() < 1e-12, "iteration {i}");
        }
    }

    #[test]
    fn test_render_rejects_empty_series() {
        let series = ConvergenceSeries::new(&Diagnostics::default(), 0.0);

        assert!(matches!(
            render(&series, Path::new("unused.svg")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_writes_fitted_series() {
        let mut rng = StdRng::seed_from_u64(31);
        let data = generate(200, 10, &mut rng).unwrap();
        let mut model = LogisticRegression::new(Hyperparameters {
            step_size: 1e-4,
            max_iterations: 2_000,
            ..Hyperparameters::default()
        });
        model
            .fit(data.features.view(), data.labels.view(), &mut rng)
            .unwrap();

        let series = ConvergenceSeries::new(model.diagnostics(), 0.3);
        let path =
            std::env::temp_dir().join(format!("logit-convergence-{}.svg", std::process::id()));

        let result = render(&series, &path);

        assert!(result.is_ok(), "{result:?}");
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_value_bounds_widen_flat_series() {
        let (low, high) = value_bounds([2.0, 2.0].into_iter()).unwrap();

        assert!(low < 2.0 && high > 2.0);
        assert!(value_bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn test_iteration_range_is_never_empty() {
        let series = ConvergenceSeries::new(&diagnostics(1), 0.0);

        assert_eq!(series.iteration_range(), 1..2);
    }
}
