//! Output Module
//!
//! Code generation for compiled templates.

pub mod emitter;
pub mod generator;

pub use emitter::{property_key, EmitterContext};
pub use generator::{generate, TemplateCode};
