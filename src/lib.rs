pub mod error;
pub mod forest;
pub mod percolation;
pub mod stats;

mod macros;


pub use error::Error;
pub use forest::DisjointSetForest;
pub use percolation::{EdgeRule, MIN_SIDE, PERCOLATION_THRESHOLD, PercolationSimulation};
pub use stats::{Estimate, Experiment, run_trial};
