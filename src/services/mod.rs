//! Services module.

pub mod vector_ops;

pub use vector_ops::VectorOps;
