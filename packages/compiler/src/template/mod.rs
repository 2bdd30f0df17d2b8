//! Template Module
//!
//! Binder model, binding classification and the markup parser that turns one
//! tagged template into skeleton HTML plus an ordered binder list.

pub mod binder;
pub mod binding_type;
pub mod parser;

pub use binder::{
    target_for, Binder, BinderArg, BinderExpression, BinderIndex, BinderInit, Target, TargetKind,
};
pub use binding_type::{classify, BindingType};
pub use parser::{parse_template, ParsedTemplate, TemplateInput, BIND_MARKER};
