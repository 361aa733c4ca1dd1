//! Cross-sample correlation analysis: unified taxon list, Pearson and
//! significance matrices, relative-frequency extremes.

pub mod correlation;
pub mod matrix;
pub mod special;

pub use correlation::{CorrelationEngine, CorrelationResult};
pub use matrix::SymmetricMatrix;
