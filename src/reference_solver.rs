use log::debug;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::error::{Error, Result};
use crate::loss::{log_loss, sigmoid};

const MAX_NEWTON_ITERATIONS: usize = 100;
const STEP_TOLERANCE: f64 = 1e-10;

/// Unpenalised maximum-likelihood logistic regression by Newton-Raphson.
///
/// `features` already carries its bias column, so no intercept is added.
/// Coefficients follow the usual `1 / (1 + exp(-z))` link.
pub fn fit(features: ArrayView2<f64>, labels: ArrayView1<f64>) -> Result<Array1<f64>> {
    let (samples_count, features_count) = features.dim();

    if labels.len() != samples_count {
        return Err(Error::DimensionMismatch {
            what: "labels",
            got: labels.len(),
            expected: samples_count,
        });
    }
    if samples_count == 0 || features_count == 0 {
        return Err(Error::InvalidInput("reference fit needs samples and features"));
    }

    // X
    let design = DMatrix::from_fn(samples_count, features_count, |i, j| features[(i, j)]);
    // y
    let targets = DVector::from_iterator(samples_count, labels.iter().copied());

    let mut coefficients: DVector<f64> = DVector::zeros(features_count);

    for iteration in 0..MAX_NEWTON_ITERATIONS {
        let probabilities = (&design * &coefficients).map(sigmoid);

        // X^T (p - y)
        let gradient = design.transpose() * (&probabilities - &targets);

        // X^T W X, W = diag(p (1 - p))
        let mut weighted_design = design.clone();
        for (mut row, &p) in weighted_design.row_iter_mut().zip(probabilities.iter()) {
            row *= p * (1.0 - p);
        }
        let hessian = design.transpose() * weighted_design;

        let Some(hessian_inverse) = hessian.try_inverse() else {
            // p (1 - p) underflows once every sample sits far on its own side
            if separates(&design, &coefficients, &targets) {
                return Err(Error::Separable { iteration });
            }
            return Err(Error::SingularHessian { iteration });
        };

        let step = hessian_inverse * gradient;
        coefficients -= &step;

        if step.norm() < STEP_TOLERANCE {
            debug!("newton converged after {} iterations", iteration + 1);
            break;
        }
    }

    Ok(Array1::from(coefficients.as_slice().to_vec()))
}

fn separates(
    design: &DMatrix<f64>,
    coefficients: &DVector<f64>,
    targets: &DVector<f64>,
) -> bool {
    (design * coefficients)
        .iter()
        .zip(targets.iter())
        .all(|(&z, &y)| z != 0.0 && (z > 0.0) == (y > 0.5))
}

/// Log loss of `coefficients` under the `1 / (1 + exp(-z))` link.
pub fn baseline_loss(
    features: ArrayView2<f64>,
    labels: ArrayView1<f64>,
    coefficients: &Array1<f64>,
) -> f64 {
    let probabilities = features.dot(coefficients).mapv(sigmoid);
    log_loss(labels, probabilities.view())
}
