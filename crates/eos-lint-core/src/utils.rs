//! Utility functions for rule implementations.

pub mod annotation;

#[doc(inline)]
pub use annotation::{Annotations, IgnoreAnnotation};
