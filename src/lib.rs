pub mod data_generation;
pub mod error;
pub mod gradient_descent;
pub mod loss;
pub mod reference_solver;
pub mod visualization;
