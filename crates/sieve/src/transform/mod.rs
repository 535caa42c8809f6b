//! Distribution transforms: log, reciprocal, square, square root and the
//! Box-Cox / Yeo-Johnson power transforms.

mod engine;
mod operations;
pub mod power;

pub use engine::{DistributionResult, TransformEngine, TransformSummary};
pub use operations::DistributionTransform;
