//! Image entity.

pub mod model;
