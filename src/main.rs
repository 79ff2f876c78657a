use std::path::Path;

use log::info;
use logit::{
    data_generation::generate,
    gradient_descent::{Hyperparameters, LogisticRegression},
    loss::accuracy,
    reference_solver,
    visualization::{render, ConvergenceSeries},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    const N_SAMPLES: usize = 200;
    const N_FEATURES: usize = 10;
    const PLOT_FILEPATH: &str = "convergence.svg";

    let mut rng = rand::rng();

    let data = generate(N_SAMPLES, N_FEATURES, &mut rng)?;
    let (features, labels) = (data.features.view(), data.labels.view());

    let coefficients = reference_solver::fit(features, labels)?;
    let baseline_loss = reference_solver::baseline_loss(features, labels, &coefficients);
    let reference_probabilities = features.dot(&coefficients).mapv(logit::loss::sigmoid);

    info!(
        "reference solver: loss {baseline_loss:.6}, accuracy {:.3}%",
        accuracy(labels, reference_probabilities.view()) * 100.0
    );

    const STEP_SIZE: f64 = 1e-4;
    const MAX_ITERATIONS: usize = 10_000;

    let mut model = LogisticRegression::new(Hyperparameters {
        step_size: STEP_SIZE,
        max_iterations: MAX_ITERATIONS,
        ..Hyperparameters::default()
    });
    let summary = model.fit(features, labels, &mut rng)?;
    let probabilities = model.predict(features)?;

    info!(
        "gradient descent: {} iterations, loss {:.6} (gap {:.3e}), gradient norm {:.3e}, accuracy {:.3}%",
        summary.iterations,
        summary.loss,
        summary.loss - baseline_loss,
        summary.gradient_norm,
        accuracy(labels, probabilities.view()) * 100.0
    );

    let series = ConvergenceSeries::new(model.diagnostics(), baseline_loss);
    render(&series, Path::new(PLOT_FILEPATH))?;

    Ok(())
}
