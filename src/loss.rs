use ndarray::{Array1, ArrayView1};

/// Probabilities are clipped to `[PROBABILITY_EPSILON, 1 - PROBABILITY_EPSILON]`
/// before taking logarithms.
pub const PROBABILITY_EPSILON: f64 = f64::EPSILON;

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// `1 / (1 + exp(z))`, the sigmoid of `-z`.
pub fn complementary_sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + z.exp())
}

/// Mean binary cross-entropy between `labels` (0 or 1) and predicted
/// probabilities of the positive class.
pub fn log_loss(labels: ArrayView1<f64>, probabilities: ArrayView1<f64>) -> f64 {
    let total: f64 = labels
        .iter()
        .zip(probabilities)
        .map(|(&label, &probability)| {
            let probability = probability.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
            -(label * probability.ln() + (1.0 - label) * (1.0 - probability).ln())
        })
        .sum();

    total / labels.len() as f64
}

pub fn l2_norm(vector: &Array1<f64>) -> f64 {
    vector.dot(vector).sqrt()
}

pub fn accuracy(labels: ArrayView1<f64>, probabilities: ArrayView1<f64>) -> f64 {
    let correct = labels
        .iter()
        .zip(probabilities)
        .filter(|&(&label, &probability)| (probability > 0.5) == (label > 0.5))
        .count();

    correct as f64 / labels.len() as f64
}
