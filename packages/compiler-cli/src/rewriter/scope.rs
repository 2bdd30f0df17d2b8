//! Scope Chain
//!
//! Lexical scopes mapping each declared name to whether it is an observable
//! source. A name is observable when its declaration carries the marker
//! default `=$`; any later unmarked declaration of the same name in an inner
//! scope masks it.

use fragment_compiler::{CompileError, Result};
use oxc_ast::ast::{BindingPattern, BindingPatternKind, Expression};
use oxc_span::GetSpan;
use std::collections::HashMap;

/// Identifier used as the observable marker default.
pub const OBSERVABLE_MARKER: &str = "$";

#[derive(Debug)]
pub struct ScopeChain {
    scopes: Vec<HashMap<String, bool>>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    pub fn new() -> Self {
        ScopeChain {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare(&mut self, name: &str, observable: bool) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), observable);
        }
    }

    pub fn declare_all(&mut self, bindings: &[PatternBinding]) {
        for binding in bindings {
            self.declare(&binding.name, binding.observable);
        }
    }

    /// Resolve `name` from the innermost scope outwards.
    pub fn is_observable(&self, name: &str) -> bool {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
            .unwrap_or(false)
    }
}

/// A name bound by a declaration pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBinding {
    pub name: String,
    pub observable: bool,
}

pub fn is_observable_marker(expr: &Expression) -> bool {
    matches!(expr, Expression::Identifier(id) if id.name.as_str() == OBSERVABLE_MARKER)
}

/// Every name a pattern binds, flagged observable when it sits under a marker.
pub fn collect_bindings(pattern: &BindingPattern) -> Result<Vec<PatternBinding>> {
    let mut out = Vec::new();
    collect(pattern, false, &mut out)?;
    Ok(out)
}

fn collect(pattern: &BindingPattern, under_marker: bool, out: &mut Vec<PatternBinding>) -> Result<()> {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => {
            out.push(PatternBinding {
                name: id.name.to_string(),
                observable: under_marker,
            });
        }
        BindingPatternKind::AssignmentPattern(assign) => {
            let marked = is_observable_marker(&assign.right);
            if marked && under_marker {
                let name = first_name(&assign.left).unwrap_or_else(|| "pattern".to_string());
                return Err(CompileError::DuplicateObservableMarker {
                    name,
                    offset: Some(assign.span.start),
                });
            }
            collect(&assign.left, under_marker || marked, out)?;
        }
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                collect(&property.value, under_marker, out)?;
            }
            if let Some(rest) = &object.rest {
                collect(&rest.argument, under_marker, out)?;
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                collect(element, under_marker, out)?;
            }
            if let Some(rest) = &array.rest {
                collect(&rest.argument, under_marker, out)?;
            }
        }
    }
    Ok(())
}

fn first_name(pattern: &BindingPattern) -> Option<String> {
    let mut out = Vec::new();
    collect(pattern, false, &mut out).ok()?;
    out.into_iter().next().map(|binding| binding.name)
}

/// Spans of the `=$` marker text (from the end of the marked target to the
/// end of the default) found anywhere in `pattern`.
pub fn marker_spans(pattern: &BindingPattern, out: &mut Vec<(u32, u32)>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(_) => {}
        BindingPatternKind::AssignmentPattern(assign) => {
            if is_observable_marker(&assign.right) {
                out.push((assign.left.span().end, assign.span.end));
            }
            marker_spans(&assign.left, out);
        }
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                marker_spans(&property.value, out);
            }
            if let Some(rest) = &object.rest {
                marker_spans(&rest.argument, out);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                marker_spans(element, out);
            }
            if let Some(rest) = &array.rest {
                marker_spans(&rest.argument, out);
            }
        }
    }
}

/// Default-value and computed-key expressions inside a pattern, markers
/// excluded. These are ordinary expressions that may hold templates.
pub fn pattern_expressions<'b, 'a>(pattern: &'b BindingPattern<'a>, out: &mut Vec<&'b Expression<'a>>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(_) => {}
        BindingPatternKind::AssignmentPattern(assign) => {
            pattern_expressions(&assign.left, out);
            if !is_observable_marker(&assign.right) {
                out.push(&assign.right);
            }
        }
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                if property.computed {
                    if let Some(key) = property.key.as_expression() {
                        out.push(key);
                    }
                }
                pattern_expressions(&property.value, out);
            }
            if let Some(rest) = &object.rest {
                pattern_expressions(&rest.argument, out);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                pattern_expressions(element, out);
            }
            if let Some(rest) = &array.rest {
                pattern_expressions(&rest.argument, out);
            }
        }
    }
}
