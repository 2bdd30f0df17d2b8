#![deny(clippy::all)]

//! Fragment Compiler
//!
//! Compiles tagged HTML template literals into a cloned DOM fragment plus
//! positional binder wiring. This crate holds the template core; parsing the
//! host JavaScript is left to the driver.

pub mod chars;
pub mod error;
pub mod ml_parser;
pub mod module_state;
pub mod output;
pub mod template;

pub use error::{format_position, CompileError, Result};
pub use module_state::{ModuleState, RuntimeHelpers};
pub use output::{generate, TemplateCode};
pub use template::{
    parse_template, Binder, BinderExpression, BindingType, ParsedTemplate, TemplateInput,
};
