use crate::error::{Error, Result};
use crate::loss::{complementary_sigmoid, l2_norm, log_loss, sigmoid};
use log::{debug, info};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Link {
    /// `1 / (1 + exp(x . b))`. Combined with [`Update::AddGradient`] this
    /// minimises the log loss, with weights that are the negation of the
    /// conventional ones.
    #[default]
    Complementary,
    Standard,
}

impl Link {
    fn apply(self, z: f64) -> f64 {
        match self {
            Link::Complementary => complementary_sigmoid(z),
            Link::Standard => sigmoid(z),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Update {
    #[default]
    AddGradient,
    SubtractGradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stopping {
    /// Keep going while the budget remains OR the loss is below tolerance.
    /// Only the budget ever ends the run, and a loss that stays below
    /// tolerance past the budget never ends it.
    #[default]
    BudgetOrBelowTolerance,
    BudgetAndAboveTolerance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparameters {
    pub tolerance: f64,
    pub step_size: f64,
    pub max_iterations: usize,
    pub record_diagnostics: bool,
    pub link: Link,
    pub update: Update,
    pub stopping: Stopping,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            tolerance: 5e-6,
            step_size: 0.05,
            max_iterations: 10_000,
            record_diagnostics: true,
            link: Link::default(),
            update: Update::default(),
            stopping: Stopping::default(),
        }
    }
}

impl Hyperparameters {
    fn should_continue(&self, iteration: usize, loss: f64) -> bool {
        let within_budget = iteration < self.max_iterations;
        let below_tolerance = loss < self.tolerance;

        match self.stopping {
            Stopping::BudgetOrBelowTolerance => within_budget || below_tolerance,
            Stopping::BudgetAndAboveTolerance => within_budget && !below_tolerance,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub index: Vec<usize>,
    pub gradient_norm: Vec<f64>,
    pub loss: Vec<f64>,
}

impl Diagnostics {
    fn push(&mut self, iteration: usize, gradient_norm: f64, loss: f64) {
        self.index.push(iteration);
        self.gradient_norm.push(gradient_norm);
        self.loss.push(loss);
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub iterations: usize,
    /// Loss at the start of the last iteration, or the sentinel if none ran.
    /// `gradient_norm` is NaN in that case.
    pub loss: f64,
    pub gradient_norm: f64,
}

#[derive(Clone, Copy)]
struct FitContext<'a> {
    features: ArrayView2<'a, f64>,
    labels: ArrayView1<'a, f64>,
    link: Link,
}

impl FitContext<'_> {
    fn predict(&self, weights: &Array1<f64>) -> Array1<f64> {
        let link = self.link;
        self.features.dot(weights).mapv(|z| link.apply(z))
    }

    /// `X^T (y_hat - y)`
    fn gradient(&self, weights: &Array1<f64>) -> Array1<f64> {
        let residual = self.predict(weights) - &self.labels;
        self.features.t().dot(&residual)
    }

    fn loss(&self, weights: &Array1<f64>) -> f64 {
        log_loss(self.labels, self.predict(weights).view())
    }
}

pub struct LogisticRegression {
    hyperparameters: Hyperparameters,
    weights: Option<Array1<f64>>,
    diagnostics: Diagnostics,
}

impl LogisticRegression {
    pub fn new(hyperparameters: Hyperparameters) -> Self {
        Self {
            hyperparameters,
            weights: None,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Initialises the weights uniformly in `[-1, 1)` and iterates until the
    /// configured [`Stopping`] rule ends the run.
    pub fn fit<'a, R: Rng + ?Sized>(
        &mut self,
        features: ArrayView2<'a, f64>,
        labels: ArrayView1<'a, f64>,
        rng: &mut R,
    ) -> Result<FitSummary> {
        if features.nrows() != labels.len() {
            return Err(Error::DimensionMismatch {
                what: "labels",
                got: labels.len(),
                expected: features.nrows(),
            });
        }
        if features.nrows() == 0 {
            return Err(Error::InvalidInput("cannot fit on zero samples"));
        }
        if features.ncols() == 0 {
            return Err(Error::InvalidInput("cannot fit without features"));
        }

        let context = FitContext {
            features,
            labels,
            link: self.hyperparameters.link,
        };
        let Hyperparameters {
            step_size,
            update,
            record_diagnostics,
            ..
        } = self.hyperparameters;

        self.diagnostics = Diagnostics::default();
        let mut weights = Array1::from_shape_fn(features.ncols(), |_| rng.random_range(-1.0..1.0));

        let mut iteration = 0;
        // any value above tolerance lets the first iteration run
        let mut loss = 1.0 + self.hyperparameters.tolerance;
        let mut gradient_norm = f64::NAN;

        while self.hyperparameters.should_continue(iteration, loss) {
            loss = context.loss(&weights);
            let gradient = context.gradient(&weights);

            match update {
                Update::AddGradient => weights.scaled_add(step_size, &gradient),
                Update::SubtractGradient => weights.scaled_add(-step_size, &gradient),
            }

            iteration += 1;
            gradient_norm = l2_norm(&gradient);

            if record_diagnostics {
                self.diagnostics.push(iteration, gradient_norm, loss);
            }

            if iteration % 1000 == 0 {
                debug!("iteration {iteration}: loss {loss:.6}, gradient norm {gradient_norm:.3e}");
            }
        }

        info!("fit finished after {iteration} iterations with loss {loss:.6}");

        self.weights = Some(weights);

        Ok(FitSummary {
            iterations: iteration,
            loss,
            gradient_norm,
        })
    }

    pub fn predict(&self, features: ArrayView2<f64>) -> Result<Array1<f64>> {
        let weights = self.weights.as_ref().ok_or(Error::NotFitted)?;

        if features.ncols() != weights.len() {
            return Err(Error::DimensionMismatch {
                what: "features",
                got: features.ncols(),
                expected: weights.len(),
            });
        }

        let link = self.hyperparameters.link;
        Ok(features.dot(weights).mapv(|z| link.apply(z)))
    }
}
