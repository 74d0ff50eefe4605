//! Color value types.
//!
//! [`ColorTuple`] is the exact (R, G, B, A) value used both for sampled
//! pixels and as substitution parameters.

mod tuple;

pub use tuple::ColorTuple;
