//! Template Markup Parser
//!
//! Walks the literal chunks and expression holes of one tagged template,
//! writing the skeleton HTML and giving every hole a structural position.
//!
//! Elements that end up hosting a binder get a `data-bind` marker. Binders are
//! grouped per hosting element in the order elements close; every group shares
//! one index into the runtime node list, and binders sitting directly on the
//! fragment root form the final group.

use super::binder::{Binder, BinderExpression, BinderIndex, TargetKind};
use crate::error::{CompileError, Result};
use crate::ml_parser::{
    is_void_element, scan_binding_sigil, scan_block_marker, Sigil, SigilScan, SlotPosition,
    TokenHandler, Tokenizer,
};
use indexmap::IndexMap;

pub const BIND_MARKER: &str = " data-bind";
const COMPONENT_TAG: &str = "#:";

/// Quasis and expressions of a template literal.
#[derive(Debug, Clone, Default)]
pub struct TemplateInput {
    /// Raw text of each literal chunk.
    pub quasis: Vec<String>,
    pub expressions: Vec<BinderExpression>,
}

impl TemplateInput {
    pub fn new(quasis: Vec<String>, expressions: Vec<BinderExpression>) -> Self {
        TemplateInput {
            quasis,
            expressions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub html: String,
    /// Binders in node-list order, with `el_index` assigned.
    pub binders: Vec<Binder>,
}

pub fn parse_template(input: &TemplateInput) -> Result<ParsedTemplate> {
    if input.quasis.len() != input.expressions.len() + 1 {
        return Err(CompileError::markup(format!(
            "template has {} literal chunks for {} expressions",
            input.quasis.len(),
            input.expressions.len()
        )));
    }

    let mut parser = TemplateParser::new();
    let mut quasis = input.quasis.clone();

    for slot in 0..quasis.len() {
        let chunk = std::mem::take(&mut quasis[slot]);
        let Some(expression) = input.expressions.get(slot) else {
            parser.write(&chunk)?;
            break;
        };

        let SigilScan { sigil, text } = scan_binding_sigil(&chunk);
        parser.write(&text)?;

        let (is_block, next) = scan_block_marker(&quasis[slot + 1]);
        quasis[slot + 1] = next;

        parser
            .bind(slot, sigil, is_block, expression.clone())
            .map_err(|e| e.with_offset(expression.offset))?;
    }

    parser.finish()
}

#[derive(Debug, Clone)]
enum AttributeValue {
    Static(String),
    Bound,
}

/// Open element during parsing.
#[derive(Debug)]
struct ElementFrame {
    name: String,
    attributes: IndexMap<String, AttributeValue>,
    binders: Vec<Binder>,
    child_groups: Vec<Vec<Binder>>,
    /// Index of the last child node seen, -1 before the first.
    child_index: isize,
    /// Buffer slot that becomes the bind marker.
    bind_slot: Option<usize>,
    /// Set for `<#:${...}/>` frames.
    component: Option<Binder>,
}

impl ElementFrame {
    fn new(name: &str) -> Self {
        ElementFrame {
            name: name.to_string(),
            attributes: IndexMap::new(),
            binders: Vec::new(),
            child_groups: Vec::new(),
            child_index: -1,
            bind_slot: None,
            component: None,
        }
    }

    fn next_child_index(&mut self) -> usize {
        self.child_index += 1;
        self.child_index as usize
    }
}

struct TemplateParser {
    tokenizer: Tokenizer,
    builder: SkeletonBuilder,
}

impl TemplateParser {
    fn new() -> Self {
        TemplateParser {
            tokenizer: Tokenizer::new(),
            builder: SkeletonBuilder::new(),
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.tokenizer.write(text, &mut self.builder)
    }

    fn bind(
        &mut self,
        slot: usize,
        sigil: Sigil,
        is_block: bool,
        expression: BinderExpression,
    ) -> Result<()> {
        match self.tokenizer.slot_position() {
            SlotPosition::Text => {
                self.tokenizer.flush_text(&mut self.builder)?;
                let kind = if is_block {
                    TargetKind::Block
                } else {
                    TargetKind::Text
                };
                self.builder.add_child_binder(kind, sigil, expression, slot);
                Ok(())
            }
            SlotPosition::AttributeValue { .. } => {
                if is_block {
                    return Err(CompileError::unsupported(
                        "block binding in attribute position",
                    ));
                }
                let name = self.tokenizer.bind_attribute_value()?;
                self.builder
                    .add_attribute_binder(name, sigil, expression, slot)
            }
            SlotPosition::TagName(name) if name == COMPONENT_TAG => {
                if is_block {
                    return Err(CompileError::unsupported(
                        "block marker on a component",
                    ));
                }
                if sigil != Sigil::None {
                    return Err(CompileError::unsupported(
                        "sigil in front of a component",
                    ));
                }
                self.builder.pending_component = Some(Binder::new(
                    TargetKind::Component,
                    sigil,
                    expression,
                    slot,
                    BinderIndex::Child(0),
                ));
                Ok(())
            }
            position => Err(CompileError::unsupported(format!(
                "expression in {}",
                position.describe()
            ))),
        }
    }

    fn finish(mut self) -> Result<ParsedTemplate> {
        self.tokenizer.end(&mut self.builder)?;
        Ok(self.builder.into_template())
    }
}

/// Builds the skeleton HTML and binder groups from tokenizer events.
struct SkeletonBuilder {
    html: Vec<String>,
    /// Open elements; the fragment root is always at the bottom.
    stack: Vec<ElementFrame>,
    pending_component: Option<Binder>,
}

impl SkeletonBuilder {
    fn new() -> Self {
        SkeletonBuilder {
            html: Vec::new(),
            stack: vec![ElementFrame::new("")],
            pending_component: None,
        }
    }

    fn current(&mut self) -> &mut ElementFrame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn add_child_binder(
        &mut self,
        kind: TargetKind,
        sigil: Sigil,
        expression: BinderExpression,
        slot: usize,
    ) {
        let frame = self.current();
        let index = frame.next_child_index();
        let binder = Binder::new(kind, sigil, expression, slot, BinderIndex::Child(index));
        self.html.push(binder.target.html.to_string());
        self.current().binders.push(binder);
    }

    fn add_attribute_binder(
        &mut self,
        name: String,
        sigil: Sigil,
        expression: BinderExpression,
        slot: usize,
    ) -> Result<()> {
        let frame = self.current();
        let binder = Binder::new(
            TargetKind::Attribute,
            sigil,
            expression,
            slot,
            BinderIndex::Attribute(name.clone()),
        );
        if let Some(component) = frame.component.as_mut() {
            if sigil != Sigil::None {
                return Err(CompileError::unsupported(format!(
                    "sigil on component property \"{}\"",
                    name
                )));
            }
            component.properties.push(binder);
            return Ok(());
        }
        frame.attributes.insert(name, AttributeValue::Bound);
        frame.binders.push(binder);
        Ok(())
    }

    fn write_open_tag(&mut self) {
        let mut tag = format!("<{}", self.current().name);
        for (name, value) in &self.current().attributes {
            match value {
                AttributeValue::Static(value) => {
                    tag.push_str(&format!(" {}=\"{}\"", name, value.replace('"', "&quot;")))
                }
                AttributeValue::Bound => tag.push_str(&format!(" {}=\"\"", name)),
            }
        }
        self.html.push(tag);
        let slot = self.html.len();
        self.html.push(String::new());
        self.html.push(">".to_string());
        self.current().bind_slot = Some(slot);
    }

    /// Pop the current element and fold its binder group, then its
    /// descendants' groups, into its parent.
    fn close_frame(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if !frame.binders.is_empty() {
            if let Some(slot) = frame.bind_slot {
                self.html[slot] = BIND_MARKER.to_string();
            }
        }
        // Groups follow the document order of the bound elements.
        let parent = self.current();
        if !frame.binders.is_empty() {
            parent.child_groups.push(frame.binders);
        }
        parent.child_groups.extend(frame.child_groups);
    }

    fn close_component(&mut self, self_closing: bool) -> Result<()> {
        if !self_closing {
            return Err(CompileError::unsupported(
                "component tags must be self-closing",
            ));
        }
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        if let Some(component) = frame.component {
            self.html.push(component.target.html.to_string());
            self.current().binders.push(component);
        }
        Ok(())
    }

    fn into_template(mut self) -> ParsedTemplate {
        while self.stack.len() > 1 {
            let name = self.current().name.clone();
            self.html.push(format!("</{}>", name));
            self.close_frame();
        }

        let mut root = self.stack.pop().unwrap_or_else(|| ElementFrame::new(""));
        let mut groups = std::mem::take(&mut root.child_groups);
        if !root.binders.is_empty() {
            groups.push(root.binders);
        }

        let binders = groups
            .into_iter()
            .enumerate()
            .flat_map(|(el_index, group)| {
                group.into_iter().map(move |mut binder| {
                    binder.el_index = Some(el_index);
                    binder
                })
            })
            .collect();

        ParsedTemplate {
            html: self.html.concat(),
            binders,
        }
    }
}

impl TokenHandler for SkeletonBuilder {
    fn on_open_tag_name(&mut self, name: &str) -> Result<()> {
        let index = self.current().next_child_index();
        let mut frame = ElementFrame::new(name);
        if name.starts_with(COMPONENT_TAG) {
            let Some(mut component) = self.pending_component.take().filter(|_| name == COMPONENT_TAG)
            else {
                return Err(CompileError::unsupported(format!(
                    "component tag <{}> must be written <#:${{factory}} />",
                    name
                )));
            };
            component.index = BinderIndex::Child(index);
            frame.component = Some(component);
        }
        self.stack.push(frame);
        Ok(())
    }

    fn on_attribute(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let frame = self.current();
        let value = value.unwrap_or("");
        if let Some(component) = frame.component.as_mut() {
            let expression = BinderExpression::string_literal(value, component.expression.offset);
            let property = Binder::new(
                TargetKind::Attribute,
                Sigil::None,
                expression,
                component.slot,
                BinderIndex::Attribute(name.to_string()),
            );
            component.properties.push(property);
            return Ok(());
        }
        frame
            .attributes
            .insert(name.to_string(), AttributeValue::Static(value.to_string()));
        Ok(())
    }

    fn on_open_tag_end(&mut self, self_closing: bool) -> Result<()> {
        if self.current().component.is_some() {
            return self.close_component(self_closing);
        }
        self.write_open_tag();
        let name = self.current().name.clone();
        if is_void_element(&name) {
            self.close_frame();
        } else if self_closing {
            self.html.push(format!("</{}>", name));
            self.close_frame();
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str) -> Result<()> {
        self.html.push(text.to_string());
        self.current().next_child_index();
        Ok(())
    }

    fn on_close_tag(&mut self, name: &str) -> Result<()> {
        if self.stack.len() > 1 && self.current().name.eq_ignore_ascii_case(name) {
            self.html.push(format!("</{}>", name));
            self.close_frame();
            return Ok(());
        }
        if is_void_element(name) {
            return Ok(());
        }
        Err(CompileError::markup(format!(
            "unexpected closing tag </{}>",
            name
        )))
    }

    fn on_comment(&mut self, text: &str) -> Result<()> {
        self.html.push(format!("<!--{}-->", text));
        self.current().next_child_index();
        Ok(())
    }

    fn on_end(&mut self) -> Result<()> {
        Ok(())
    }
}
