use crate::error::{Error, Result};
use crate::loss::sigmoid;
use log::debug;
use ndarray::{s, Array1, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;

#[derive(Debug, Clone)]
pub struct SyntheticData {
    /// N x P, column 0 is the bias term.
    pub features: Array2<f64>,
    /// 0 or 1 per row.
    pub labels: Array1<f64>,
}

/// First `n_features` entries of the repeating `[-1, 1]` pattern.
pub fn latent_coefficients(n_features: usize) -> Array1<f64> {
    Array1::from_shape_fn(n_features, |j| if j % 2 == 0 { -1.0 } else { 1.0 })
}

/// Draws a design matrix with a constant first column and standard normal
/// features, then labels each row by thresholding `sigmoid(x . b)` against a
/// uniform draw, where `b` is [`latent_coefficients`].
///
/// All features are drawn (row-major) before any threshold, so a seeded `rng`
/// reproduces the same data.
pub fn generate<R: Rng + ?Sized>(
    n_samples: usize,
    n_features: usize,
    rng: &mut R,
) -> Result<SyntheticData> {
    if n_samples == 0 {
        return Err(Error::InvalidInput("at least one sample is required"));
    }
    if n_features == 0 {
        return Err(Error::InvalidInput("at least the bias feature is required"));
    }

    let normal: Array2<f64> =
        Array2::random_using((n_samples, n_features - 1), StandardNormal, rng);

    let mut features: Array2<f64> = Array2::ones((n_samples, n_features));
    features.slice_mut(s![.., 1..]).assign(&normal);

    let latent_probabilities = features.dot(&latent_coefficients(n_features)).mapv(sigmoid);

    let labels = latent_probabilities.mapv(|probability| {
        let threshold: f64 = rng.random();
        if probability > threshold {
            1.0
        } else {
            0.0
        }
    });

    debug!(
        "generated {n_samples} samples with {n_features} features, {} positive",
        labels.sum()
    );

    Ok(SyntheticData { features, labels })
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_shape_and_bias_column() {
        let mut rng = StdRng::seed_from_u64(7);

        for (n, p) in [(1, 2), (50, 4), (200, 10)] {
            let data = generate(n, p, &mut rng).unwrap();

            assert_eq!(data.features.dim(), (n, p));
            assert_eq!(data.labels.len(), n);
            assert!(data.features.column(0).iter().all(|&x| (x - 1.0).abs() < f64::EPSILON));
        }
    }

    #[test]
    fn test_labels_are_binary() {
        let mut rng = StdRng::seed_from_u64(11);
        let data = generate(500, 6, &mut rng).unwrap();

        #[allow(clippy::float_cmp)]
        let binary = data.labels.iter().all(|&y| y == 0.0 || y == 1.0);
        assert!(binary);
        // both classes show up with this many samples
        assert!(data.labels.sum() > 0.0);
        assert!(data.labels.sum() < 500.0);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let first = generate(100, 8, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = generate(100, 8, &mut StdRng::seed_from_u64(42)).unwrap();

        let bits = |data: &SyntheticData| {
            data.features
                .iter()
                .chain(data.labels.iter())
                .map(|x| x.to_bits())
                .collect::<Vec<_>>()
        };

        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn test_features_are_not_constant() {
        let data = generate(100, 3, &mut StdRng::seed_from_u64(3)).unwrap();
        let column = data.features.column(1);
        let mean = column.sum() / 100.0;

        assert!(column.iter().any(|&x| (x - mean).abs() > 0.1));
    }

    #[test]
    fn test_latent_coefficients_truncate_for_odd_width() {
        assert_eq!(latent_coefficients(4).to_vec(), vec![-1.0, 1.0, -1.0, 1.0]);
        assert_eq!(latent_coefficients(5).to_vec(), vec![-1.0, 1.0, -1.0, 1.0, -1.0]);
        assert_eq!(latent_coefficients(1).to_vec(), vec![-1.0]);
    }

    #[test]
    fn test_rejects_empty_shapes() {
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(generate(0, 4, &mut rng), Err(Error::InvalidInput(_))));
        assert!(matches!(generate(4, 0, &mut rng), Err(Error::InvalidInput(_))));
    }
}
