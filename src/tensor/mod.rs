//! Tensor types
//!
//! This module provides the core `Tensor` type, a dense row-major matrix or
//! batch of matrices held in host memory.

mod core;
mod layout;
mod shape;

pub use core::Tensor;
pub use layout::{Layout, Strides};
pub use shape::Shape;
