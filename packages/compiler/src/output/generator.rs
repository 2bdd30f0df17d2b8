//! Code Generator
//!
//! Lowers the binder list of one parsed template into the statements that
//! render its fragment, wire every binder to its node and hand back the
//! fragment (with an `unsubscribe` handle when anything stays subscribed).

use super::emitter::{property_key, EmitterContext};
use crate::error::{CompileError, Result};
use crate::module_state::{COMBINE_HELPER, FIRST_HELPER, MAP_HELPER};
use crate::module_state::ModuleState;
use crate::template::{Binder, BinderIndex, BindingType};

pub const NODES: &str = "__nodes";
pub const FRAGMENT: &str = "__fragment";

/// Generated code for one template site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCode {
    pub fragment_index: usize,
    /// Render call followed by one or two statements per binder.
    pub statements: Vec<String>,
    /// Subscriptions to release, in declaration order.
    pub unsubscribes: Vec<String>,
}

impl TemplateCode {
    /// Immediately invoked arrow replacing the template expression. Lines
    /// after the first are prefixed with `margin`, the indentation of the
    /// source line the replacement starts on.
    pub fn to_iife(&self, margin: &str) -> String {
        let mut ctx = EmitterContext::with_margin(margin);
        ctx.println("(() => {");
        ctx.inc_indent();
        self.emit_statements(&mut ctx);
        ctx.dec_indent();
        ctx.print("})()");
        ctx.to_source()
    }

    /// Block body replacing an arrow function's expression body.
    pub fn to_function_body(&self, margin: &str) -> String {
        let mut ctx = EmitterContext::with_margin(margin);
        ctx.println("{");
        ctx.inc_indent();
        self.emit_statements(&mut ctx);
        ctx.dec_indent();
        ctx.print("}");
        ctx.to_source()
    }

    /// Bare statements replacing an explicit `return` of the template.
    pub fn to_statements(&self, margin: &str) -> String {
        let mut ctx = EmitterContext::with_margin(margin);
        self.emit_statements(&mut ctx);
        ctx.to_source()
    }

    pub fn emit_statements(&self, ctx: &mut EmitterContext) {
        for statement in &self.statements {
            ctx.println(statement);
        }
        if self.unsubscribes.is_empty() {
            ctx.println(&format!("return {}[{}.length];", NODES, NODES));
            return;
        }
        ctx.println(&format!("const {} = {}[{}.length];", FRAGMENT, NODES, NODES));
        ctx.println(&format!("{}.unsubscribe = () => {{", FRAGMENT));
        ctx.inc_indent();
        for name in &self.unsubscribes {
            ctx.println(&format!("{}.unsubscribe();", name));
        }
        ctx.dec_indent();
        ctx.println("};");
        ctx.println(&format!("return {};", FRAGMENT));
    }
}

/// Generate the code for a parsed template whose skeleton was registered as
/// `fragment_index`. Assigns each binder's `module_index`.
pub fn generate(
    binders: &mut [Binder],
    fragment_index: usize,
    state: &mut ModuleState,
) -> Result<TemplateCode> {
    let mut code = TemplateCode {
        fragment_index,
        statements: vec![format!("const {} = __render{}();", NODES, fragment_index)],
        unsubscribes: Vec::new(),
    };

    for (i, binder) in binders.iter_mut().enumerate() {
        let module_index = state.add_binder(binder);
        binder.module_index = Some(module_index);

        let binding_type = binder.binding_type();
        state.use_binding_type(binding_type);

        let el_index = binder.el_index.ok_or_else(|| CompileError::UnsupportedBinderType {
            message: format!("binder {} was never assigned a node", i),
        })?;
        let bind_call = format!("__bind{}({}[{}])", module_index, NODES, el_index);
        let sub = format!("__sub{}", i);

        let observer = if binder.is_block() {
            let wrapper = format!("{}b", sub);
            code.statements
                .push(format!("const {} = {};", wrapper, bind_call));
            code.unsubscribes.push(wrapper.clone());
            format!("{}.observer", wrapper)
        } else {
            bind_call
        };

        let value = value_source(binder);
        let statement = match binding_type {
            BindingType::Value => format!("{}({});", observer, value),
            BindingType::Subscribe => {
                format!("const {} = ({}).subscribe({});", sub, value, observer)
            }
            BindingType::First => format!(
                "const {} = {}({}, {});",
                sub, FIRST_HELPER, value, observer
            ),
            BindingType::Map | BindingType::MapFirst => {
                let [observable] = binder.observables.as_slice() else {
                    return Err(unsupported_arity(binding_type, binder));
                };
                format!(
                    "const {} = {}({}, {} => ({}), {}{});",
                    sub,
                    MAP_HELPER,
                    observable,
                    observable,
                    value,
                    observer,
                    once_flag(binding_type)
                )
            }
            BindingType::Combine | BindingType::CombineFirst => {
                if binder.observables.len() < 2 {
                    return Err(unsupported_arity(binding_type, binder));
                }
                let observables = binder.observables.join(", ");
                format!(
                    "const {} = {}([{}], ({}) => ({}), {}{});",
                    sub,
                    COMBINE_HELPER,
                    observables,
                    observables,
                    value,
                    observer,
                    once_flag(binding_type)
                )
            }
        };
        code.statements.push(statement);

        if binding_type.is_subscription() {
            code.unsubscribes.push(sub);
        }
    }

    Ok(code)
}

fn once_flag(binding_type: BindingType) -> &'static str {
    if binding_type.is_first_only() {
        ", true"
    } else {
        ""
    }
}

fn unsupported_arity(binding_type: BindingType, binder: &Binder) -> CompileError {
    CompileError::UnsupportedBinderType {
        message: format!(
            "{} binding over {} observables",
            binding_type.as_str(),
            binder.observables.len()
        ),
    }
}

/// Expression text passed to the observer. Components call their factory
/// with an object of their properties.
fn value_source(binder: &Binder) -> String {
    if !binder.is_component() {
        return binder.expression.source.clone();
    }
    let props: Vec<String> = binder
        .properties
        .iter()
        .filter_map(|property| match &property.index {
            BinderIndex::Attribute(name) => Some(format!(
                "{}: {}",
                property_key(name),
                property.expression.source
            )),
            BinderIndex::Child(_) => None,
        })
        .collect();
    if props.is_empty() {
        format!("{}({{}})", binder.expression.source)
    } else {
        format!("{}({{ {} }})", binder.expression.source, props.join(", "))
    }
}
