//! Binder
//!
//! One bound expression of a template: where it lands in the fragment, how it
//! was marked, and (once scope analysis has run) which of its free variables
//! are observable.

use super::binding_type::{classify, BindingType};
use crate::ml_parser::Sigil;
use serde::Serialize;
use smallvec::SmallVec;

/// Expression slot of a template literal as handed over by the host parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderExpression {
    /// Source text to emit for the expression (nested templates already
    /// lowered).
    pub source: String,
    /// Byte offset of the expression in the host file.
    pub offset: u32,
    /// The expression is a single identifier reference.
    pub is_identifier: bool,
    /// Compiler-made literal with no free variables (static component props).
    pub is_literal: bool,
}

impl BinderExpression {
    pub fn new(source: impl Into<String>, offset: u32, is_identifier: bool) -> Self {
        BinderExpression {
            source: source.into(),
            offset,
            is_identifier,
            is_literal: false,
        }
    }

    /// A string literal expression holding `value`.
    pub fn string_literal(value: &str, offset: u32) -> Self {
        let source = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string());
        BinderExpression {
            is_literal: true,
            ..BinderExpression::new(source, offset, false)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Text,
    Block,
    Attribute,
    Component,
}

/// Capability record of a binder target shape.
#[derive(Debug, PartialEq, Eq)]
pub struct Target {
    pub kind: TargetKind,
    /// Placeholder written into the skeleton HTML.
    pub html: &'static str,
    pub is_block: bool,
    pub is_component: bool,
    /// Runtime factory that builds the binder for this target.
    pub import_name: &'static str,
}

pub const TEXT_BINDER: &str = "__textBinder";
pub const BLOCK_BINDER: &str = "__blockBinder";
pub const ATTRIBUTE_BINDER: &str = "__attrBinder";
pub const COMPONENT_BINDER: &str = "__componentBinder";

static TEXT_TARGET: Target = Target {
    kind: TargetKind::Text,
    html: "<text-node></text-node>",
    is_block: false,
    is_component: false,
    import_name: TEXT_BINDER,
};

static BLOCK_TARGET: Target = Target {
    kind: TargetKind::Block,
    html: "<!-- block -->",
    is_block: true,
    is_component: false,
    import_name: BLOCK_BINDER,
};

static ATTRIBUTE_TARGET: Target = Target {
    kind: TargetKind::Attribute,
    html: "\"\"",
    is_block: false,
    is_component: false,
    import_name: ATTRIBUTE_BINDER,
};

static COMPONENT_TARGET: Target = Target {
    kind: TargetKind::Component,
    html: "<!-- component -->",
    is_block: true,
    is_component: true,
    import_name: COMPONENT_BINDER,
};

pub fn target_for(kind: TargetKind) -> &'static Target {
    match kind {
        TargetKind::Text => &TEXT_TARGET,
        TargetKind::Block => &BLOCK_TARGET,
        TargetKind::Attribute => &ATTRIBUTE_TARGET,
        TargetKind::Component => &COMPONENT_TARGET,
    }
}

impl Target {
    /// Descriptor of the runtime call that builds this binder.
    pub fn init(&self, binder: &Binder) -> BinderInit {
        let arg = match &binder.index {
            BinderIndex::Child(index) => BinderArg::Index(*index),
            BinderIndex::Attribute(name) => BinderArg::Name(name.clone()),
        };
        BinderInit {
            name: self.import_name,
            arg,
        }
    }
}

/// Position of a binder within its element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BinderIndex {
    /// Offset among the element's child nodes.
    Child(usize),
    /// Attribute (or component property) name.
    Attribute(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum BinderArg {
    Index(usize),
    Name(String),
}

impl BinderArg {
    pub fn to_js(&self) -> String {
        match self {
            BinderArg::Index(index) => index.to_string(),
            BinderArg::Name(name) => {
                serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name))
            }
        }
    }
}

/// `(importName, arg)` pair identifying one shared binder initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BinderInit {
    pub name: &'static str,
    pub arg: BinderArg,
}

impl BinderInit {
    /// Canonical serialized form used as the dedup key.
    pub fn key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{}({})", self.name, self.arg.to_js()))
    }

    pub fn to_js(&self) -> String {
        format!("{}({})", self.name, self.arg.to_js())
    }
}

#[derive(Debug, Clone)]
pub struct Binder {
    pub sigil: Sigil,
    pub expression: BinderExpression,
    pub target: &'static Target,
    /// Index of the expression slot in the template literal.
    pub slot: usize,
    /// Index into the runtime node list; assigned when parsing finishes.
    pub el_index: Option<usize>,
    pub index: BinderIndex,
    /// Observable free variables, in first-appearance order.
    pub observables: SmallVec<[String; 2]>,
    /// Entry in the file-wide binder table.
    pub module_index: Option<usize>,
    /// Component properties, one binder per attribute of the component tag.
    pub properties: Vec<Binder>,
    /// Fragment index of a template literal written directly in this slot.
    pub child_template: Option<usize>,
}

impl Binder {
    pub fn new(
        kind: TargetKind,
        sigil: Sigil,
        expression: BinderExpression,
        slot: usize,
        index: BinderIndex,
    ) -> Self {
        Binder {
            sigil,
            expression,
            target: target_for(kind),
            slot,
            el_index: None,
            index,
            observables: SmallVec::new(),
            module_index: None,
            properties: Vec::new(),
            child_template: None,
        }
    }

    /// A component's value is a factory call, never a bare identifier.
    pub fn binding_type(&self) -> BindingType {
        classify(
            self.sigil,
            self.expression.is_identifier && !self.is_component(),
            self.observables.len(),
        )
    }

    pub fn init(&self) -> BinderInit {
        self.target.init(self)
    }

    pub fn is_block(&self) -> bool {
        self.target.is_block
    }

    pub fn is_component(&self) -> bool {
        self.target.is_component
    }
}
