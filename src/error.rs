use std::fmt;

use plotters::drawing::DrawingAreaErrorKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// An input is empty or otherwise unusable.
    InvalidInput(&'static str),

    /// Two shapes that must agree do not (e.g. sample rows vs labels).
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// A prediction was requested before any weights were fitted.
    NotFitted,

    /// The Newton step could not be taken because `X^T W X` is singular.
    SingularHessian { iteration: usize },

    /// Newton diverged because a hyperplane separates the classes, so no
    /// finite maximum-likelihood estimate exists.
    Separable { iteration: usize },

    /// The plotting backend failed.
    Plot(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::DimensionMismatch {
                what,
                got,
                expected,
            } => write!(f, "dimension mismatch for {what}: got {got}, expected {expected}"),
            Error::NotFitted => write!(f, "model has not been fitted"),
            Error::SingularHessian { iteration } => {
                write!(f, "hessian is singular at newton iteration {iteration}")
            }
            Error::Separable { iteration } => write!(
                f,
                "classes are linearly separable, newton diverged by iteration {iteration}"
            ),
            Error::Plot(msg) => write!(f, "failed to draw plot: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(error.to_string())
    }
}
