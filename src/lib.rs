//! Design principles:
//! 1. Reference semantics over speed - plain loops, nothing fused, nothing vectorized.
//! 2. Dtype-generic through `Scalar` values, not through type parameters.

pub mod dtype;
pub mod init;
pub mod ops;
pub mod tensor;
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod tests;

pub use dtype::{Dtype, Scalar};
pub use ops::Padding;
pub use tensor::{Error, Tensor};
