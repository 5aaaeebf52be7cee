//! Pure data structures processed by the pipeline.

pub mod order;

pub use order::*;
