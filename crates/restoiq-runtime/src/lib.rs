//! Runtime pipeline: free text in, one dispatched result envelope out.
//!
//! Extraction never fails, resolution picks at most one operation, and the
//! dispatcher turns every handler failure into an error envelope, so
//! [`Pipeline::run`] is total over its input.

pub mod pipeline;
pub mod types;

pub use pipeline::Pipeline;
pub use types::*;
