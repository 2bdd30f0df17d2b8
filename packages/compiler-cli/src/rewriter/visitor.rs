//! Template Visitor
//!
//! Walks the host syntax tree with a scope chain, compiles every template
//! tagged with the runtime tag and records the replacement text as source
//! edits. Templates written inside another template's expression slots are
//! compiled first and folded into the outer slot text.

use super::edits::SourceEdits;
use super::free_vars::free_variables;
use super::scope::{collect_bindings, marker_spans, pattern_expressions, ScopeChain};
use crate::logging::Logger;
use fragment_compiler::{
    format_position, generate, parse_template, BinderExpression, CompileError, ModuleState,
    Result, TemplateCode, TemplateInput,
};
use oxc_ast::ast::{
    self, ArrayExpressionElement, Declaration, ExportDefaultDeclarationKind, Expression,
    ForStatementInit, ForStatementLeft, ObjectPropertyKind, Statement,
};
use oxc_span::GetSpan;
use std::collections::HashMap;

pub struct TemplateVisitor<'s> {
    source: &'s str,
    filename: &'s str,
    tag: String,
    scopes: ScopeChain,
    edits: SourceEdits,
    state: ModuleState,
    /// Fragment index of every compiled site, by site start offset.
    sites: HashMap<u32, usize>,
    /// References to the tag other than as a template tag.
    tag_references: usize,
    logger: &'s dyn Logger,
}

/// What the visitor leaves behind for the file-level rewrite.
pub struct VisitResult {
    pub edits: SourceEdits,
    pub state: ModuleState,
    pub site_count: usize,
    pub tag_referenced: bool,
}

/// The tagged template `expr` is (possibly parenthesized), when its tag is
/// `tag`.
fn site_of<'b, 'a>(
    expr: &'b Expression<'a>,
    tag: &str,
) -> Option<&'b ast::TaggedTemplateExpression<'a>> {
    match expr {
        Expression::TaggedTemplateExpression(t) => match &t.tag {
            Expression::Identifier(id) if id.name.as_str() == tag => Some(&**t),
            _ => None,
        },
        Expression::ParenthesizedExpression(p) => site_of(&p.expression, tag),
        _ => None,
    }
}

impl<'s> TemplateVisitor<'s> {
    pub fn new(source: &'s str, filename: &'s str, tag: &str, logger: &'s dyn Logger) -> Self {
        TemplateVisitor {
            source,
            filename,
            tag: tag.to_string(),
            scopes: ScopeChain::new(),
            edits: SourceEdits::new(),
            state: ModuleState::new(),
            sites: HashMap::new(),
            tag_references: 0,
            logger,
        }
    }

    pub fn finish(self) -> VisitResult {
        VisitResult {
            edits: self.edits,
            state: self.state,
            site_count: self.sites.len(),
            tag_referenced: self.tag_references > 0,
        }
    }

    pub fn visit_program(&mut self, program: &ast::Program) -> Result<()> {
        self.declare_statements(&program.body)?;
        self.visit_statements(&program.body)
    }

    /// Pre-register the declarations of a statement list in the current scope.
    fn declare_statements(&mut self, statements: &[Statement]) -> Result<()> {
        for statement in statements {
            match statement {
                Statement::VariableDeclaration(decl) => self.declare_variables(decl)?,
                Statement::FunctionDeclaration(func) => self.declare_id(func.id.as_ref()),
                Statement::ClassDeclaration(class) => self.declare_id(class.id.as_ref()),
                Statement::ExportNamedDeclaration(export) => match &export.declaration {
                    Some(Declaration::VariableDeclaration(decl)) => self.declare_variables(decl)?,
                    Some(Declaration::FunctionDeclaration(func)) => {
                        self.declare_id(func.id.as_ref())
                    }
                    Some(Declaration::ClassDeclaration(class)) => {
                        self.declare_id(class.id.as_ref())
                    }
                    _ => {}
                },
                _ => {}
            }
        }
        Ok(())
    }

    fn declare_variables(&mut self, decl: &ast::VariableDeclaration) -> Result<()> {
        for declarator in &decl.declarations {
            let bindings = collect_bindings(&declarator.id)?;
            self.scopes.declare_all(&bindings);
        }
        Ok(())
    }

    fn declare_id(&mut self, id: Option<&ast::BindingIdentifier>) {
        if let Some(id) = id {
            self.scopes.declare(id.name.as_str(), false);
        }
    }

    fn visit_statements(&mut self, statements: &[Statement]) -> Result<()> {
        for statement in statements {
            self.visit_statement(statement, true)?;
        }
        Ok(())
    }

    fn visit_block(&mut self, statements: &[Statement]) -> Result<()> {
        self.scopes.push();
        let result = self
            .declare_statements(statements)
            .and_then(|_| self.visit_statements(statements));
        self.scopes.pop();
        result
    }

    /// `in_list` is false when the statement is the single body of an `if`,
    /// loop or label, where a replacement needs its own braces.
    fn visit_statement(&mut self, statement: &Statement, in_list: bool) -> Result<()> {
        match statement {
            Statement::ExpressionStatement(s) => self.visit_expression(&s.expression),
            Statement::BlockStatement(block) => self.visit_block(&block.body),
            Statement::IfStatement(s) => {
                self.visit_expression(&s.test)?;
                self.visit_statement(&s.consequent, false)?;
                if let Some(alternate) = &s.alternate {
                    self.visit_statement(alternate, false)?;
                }
                Ok(())
            }
            Statement::ReturnStatement(s) => {
                let Some(argument) = &s.argument else {
                    return Ok(());
                };
                let Some(site) = site_of(argument, &self.tag) else {
                    return self.visit_expression(argument);
                };
                let code = self.compile_site(site)?;
                let margin = self.line_indent(s.span.start);
                let text = if in_list {
                    code.to_statements(margin)
                } else {
                    code.to_function_body(margin)
                };
                self.edits.replace(s.span.start, s.span.end, text);
                Ok(())
            }
            Statement::VariableDeclaration(decl) => self.visit_variable_declaration(decl),
            Statement::FunctionDeclaration(func) => {
                self.visit_function(&func.params, func.body.as_deref())
            }
            Statement::ClassDeclaration(class) => self.visit_class(class),
            Statement::ForStatement(s) => {
                self.scopes.push();
                let result = self.visit_for(s);
                self.scopes.pop();
                result
            }
            Statement::ForInStatement(s) => {
                self.scopes.push();
                let result = self
                    .visit_for_left(&s.left)
                    .and_then(|_| self.visit_expression(&s.right))
                    .and_then(|_| self.visit_statement(&s.body, false));
                self.scopes.pop();
                result
            }
            Statement::ForOfStatement(s) => {
                self.scopes.push();
                let result = self
                    .visit_for_left(&s.left)
                    .and_then(|_| self.visit_expression(&s.right))
                    .and_then(|_| self.visit_statement(&s.body, false));
                self.scopes.pop();
                result
            }
            Statement::WhileStatement(s) => {
                self.visit_expression(&s.test)?;
                self.visit_statement(&s.body, false)
            }
            Statement::DoWhileStatement(s) => {
                self.visit_statement(&s.body, false)?;
                self.visit_expression(&s.test)
            }
            Statement::SwitchStatement(s) => {
                self.visit_expression(&s.discriminant)?;
                self.scopes.push();
                let result = self.visit_switch_cases(&s.cases);
                self.scopes.pop();
                result
            }
            Statement::TryStatement(s) => {
                self.visit_block(&s.block.body)?;
                if let Some(handler) = &s.handler {
                    self.scopes.push();
                    let result = self.visit_catch(handler);
                    self.scopes.pop();
                    result?;
                }
                if let Some(finalizer) = &s.finalizer {
                    self.visit_block(&finalizer.body)?;
                }
                Ok(())
            }
            Statement::LabeledStatement(s) => self.visit_statement(&s.body, false),
            Statement::ThrowStatement(s) => self.visit_expression(&s.argument),
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::VariableDeclaration(decl)) => {
                    self.visit_variable_declaration(decl)
                }
                Some(Declaration::FunctionDeclaration(func)) => {
                    self.visit_function(&func.params, func.body.as_deref())
                }
                Some(Declaration::ClassDeclaration(class)) => self.visit_class(class),
                _ => Ok(()),
            },
            Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                    self.visit_function(&func.params, func.body.as_deref())
                }
                ExportDefaultDeclarationKind::ClassDeclaration(class) => self.visit_class(class),
                other => match other.as_expression() {
                    Some(expr) => self.visit_expression(expr),
                    None => Ok(()),
                },
            },
            _ => Ok(()),
        }
    }

    fn visit_for(&mut self, s: &ast::ForStatement) -> Result<()> {
        match &s.init {
            Some(ForStatementInit::VariableDeclaration(decl)) => {
                self.declare_variables(decl)?;
                self.visit_variable_declaration(decl)?;
            }
            Some(init) => {
                if let Some(expr) = init.as_expression() {
                    self.visit_expression(expr)?;
                }
            }
            None => {}
        }
        if let Some(test) = &s.test {
            self.visit_expression(test)?;
        }
        if let Some(update) = &s.update {
            self.visit_expression(update)?;
        }
        self.visit_statement(&s.body, false)
    }

    fn visit_for_left(&mut self, left: &ForStatementLeft) -> Result<()> {
        if let ForStatementLeft::VariableDeclaration(decl) = left {
            self.declare_variables(decl)?;
            self.visit_variable_declaration(decl)?;
        }
        Ok(())
    }

    fn visit_switch_cases(&mut self, cases: &[ast::SwitchCase]) -> Result<()> {
        for case in cases {
            self.declare_statements(&case.consequent)?;
        }
        for case in cases {
            if let Some(test) = &case.test {
                self.visit_expression(test)?;
            }
            self.visit_statements(&case.consequent)?;
        }
        Ok(())
    }

    fn visit_catch(&mut self, handler: &ast::CatchClause) -> Result<()> {
        if let Some(param) = &handler.param {
            let bindings = collect_bindings(&param.pattern)?;
            self.scopes.declare_all(&bindings);
        }
        self.visit_block(&handler.body.body)
    }

    fn visit_variable_declaration(&mut self, decl: &ast::VariableDeclaration) -> Result<()> {
        for declarator in &decl.declarations {
            self.visit_pattern(&declarator.id)?;
            if let Some(init) = &declarator.init {
                self.visit_expression(init)?;
            }
        }
        Ok(())
    }

    /// Strip observable markers from a declaration pattern and visit its
    /// default values.
    fn visit_pattern(&mut self, pattern: &ast::BindingPattern) -> Result<()> {
        let mut markers = Vec::new();
        marker_spans(pattern, &mut markers);
        for (start, end) in markers {
            self.edits.remove(start, end);
        }
        let mut defaults = Vec::new();
        pattern_expressions(pattern, &mut defaults);
        for expr in defaults {
            self.visit_expression(expr)?;
        }
        Ok(())
    }

    fn enter_params(&mut self, params: &ast::FormalParameters) -> Result<()> {
        for param in &params.items {
            let bindings = collect_bindings(&param.pattern)?;
            self.scopes.declare_all(&bindings);
        }
        if let Some(rest) = &params.rest {
            let bindings = collect_bindings(&rest.argument)?;
            self.scopes.declare_all(&bindings);
        }
        for param in &params.items {
            self.visit_pattern(&param.pattern)?;
        }
        if let Some(rest) = &params.rest {
            self.visit_pattern(&rest.argument)?;
        }
        Ok(())
    }

    fn visit_function(
        &mut self,
        params: &ast::FormalParameters,
        body: Option<&ast::FunctionBody>,
    ) -> Result<()> {
        self.scopes.push();
        let result = self.enter_params(params).and_then(|_| match body {
            Some(body) => self
                .declare_statements(&body.statements)
                .and_then(|_| self.visit_statements(&body.statements)),
            None => Ok(()),
        });
        self.scopes.pop();
        result
    }

    fn visit_arrow(&mut self, arrow: &ast::ArrowFunctionExpression) -> Result<()> {
        self.scopes.push();
        let result = self
            .enter_params(&arrow.params)
            .and_then(|_| self.visit_arrow_body(arrow));
        self.scopes.pop();
        result
    }

    fn visit_arrow_body(&mut self, arrow: &ast::ArrowFunctionExpression) -> Result<()> {
        let statements = &arrow.body.statements;
        if arrow.expression {
            if let Some(Statement::ExpressionStatement(s)) = statements.first() {
                let Some(site) = site_of(&s.expression, &self.tag) else {
                    return self.visit_expression(&s.expression);
                };
                let code = self.compile_site(site)?;
                let span = s.expression.span();
                let body = code.to_function_body(self.line_indent(span.start));
                self.edits.replace(span.start, span.end, body);
                return Ok(());
            }
        }
        self.declare_statements(statements)?;
        self.visit_statements(statements)
    }

    fn visit_class(&mut self, class: &ast::Class) -> Result<()> {
        if let Some(super_class) = &class.super_class {
            self.visit_expression(super_class)?;
        }
        for element in &class.body.body {
            match element {
                ast::ClassElement::MethodDefinition(method) => {
                    self.visit_function(&method.value.params, method.value.body.as_deref())?;
                }
                ast::ClassElement::PropertyDefinition(property) => {
                    if let Some(value) = &property.value {
                        self.visit_expression(value)?;
                    }
                }
                ast::ClassElement::StaticBlock(block) => self.visit_block(&block.body)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn visit_expression(&mut self, expr: &Expression) -> Result<()> {
        match expr {
            Expression::TaggedTemplateExpression(t) => {
                if let Some(site) = site_of(expr, &self.tag) {
                    let code = self.compile_site(site)?;
                    let iife = code.to_iife(self.line_indent(t.span.start));
                    self.edits.replace(t.span.start, t.span.end, iife);
                    return Ok(());
                }
                self.visit_expression(&t.tag)?;
                self.visit_expressions(&t.quasi.expressions)
            }
            Expression::Identifier(id) => {
                if id.name.as_str() == self.tag {
                    self.tag_references += 1;
                }
                Ok(())
            }
            Expression::TemplateLiteral(t) => self.visit_expressions(&t.expressions),
            Expression::ArrowFunctionExpression(arrow) => self.visit_arrow(arrow),
            Expression::FunctionExpression(func) => {
                self.visit_function(&func.params, func.body.as_deref())
            }
            Expression::ClassExpression(class) => self.visit_class(class),
            Expression::ArrayExpression(array) => {
                for element in &array.elements {
                    match element {
                        ArrayExpressionElement::SpreadElement(spread) => {
                            self.visit_expression(&spread.argument)?
                        }
                        other => {
                            if let Some(e) = other.as_expression() {
                                self.visit_expression(e)?;
                            }
                        }
                    }
                }
                Ok(())
            }
            Expression::ObjectExpression(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPropertyKind::ObjectProperty(p) => {
                            if p.computed {
                                if let Some(key) = p.key.as_expression() {
                                    self.visit_expression(key)?;
                                }
                            }
                            self.visit_expression(&p.value)?;
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            self.visit_expression(&spread.argument)?
                        }
                    }
                }
                Ok(())
            }
            Expression::CallExpression(call) => {
                self.visit_expression(&call.callee)?;
                self.visit_arguments(&call.arguments)
            }
            Expression::NewExpression(e) => {
                self.visit_expression(&e.callee)?;
                self.visit_arguments(&e.arguments)
            }
            Expression::ChainExpression(chain) => match &chain.expression {
                ast::ChainElement::CallExpression(call) => {
                    self.visit_expression(&call.callee)?;
                    self.visit_arguments(&call.arguments)
                }
                ast::ChainElement::StaticMemberExpression(m) => self.visit_expression(&m.object),
                ast::ChainElement::ComputedMemberExpression(m) => {
                    self.visit_expression(&m.object)?;
                    self.visit_expression(&m.expression)
                }
                #[allow(unreachable_patterns)]
                _ => Ok(()),
            },
            Expression::StaticMemberExpression(m) => self.visit_expression(&m.object),
            Expression::ComputedMemberExpression(m) => {
                self.visit_expression(&m.object)?;
                self.visit_expression(&m.expression)
            }
            Expression::AssignmentExpression(e) => self.visit_expression(&e.right),
            Expression::AwaitExpression(e) => self.visit_expression(&e.argument),
            Expression::YieldExpression(e) => match &e.argument {
                Some(argument) => self.visit_expression(argument),
                None => Ok(()),
            },
            Expression::UnaryExpression(e) => self.visit_expression(&e.argument),
            Expression::BinaryExpression(e) => {
                self.visit_expression(&e.left)?;
                self.visit_expression(&e.right)
            }
            Expression::LogicalExpression(e) => {
                self.visit_expression(&e.left)?;
                self.visit_expression(&e.right)
            }
            Expression::ConditionalExpression(e) => {
                self.visit_expression(&e.test)?;
                self.visit_expression(&e.consequent)?;
                self.visit_expression(&e.alternate)
            }
            Expression::SequenceExpression(e) => self.visit_expressions(&e.expressions),
            Expression::ParenthesizedExpression(e) => self.visit_expression(&e.expression),
            Expression::TSAsExpression(e) => self.visit_expression(&e.expression),
            Expression::TSSatisfiesExpression(e) => self.visit_expression(&e.expression),
            Expression::TSNonNullExpression(e) => self.visit_expression(&e.expression),
            _ => Ok(()),
        }
    }

    fn visit_expressions(&mut self, expressions: &[Expression]) -> Result<()> {
        for expr in expressions {
            self.visit_expression(expr)?;
        }
        Ok(())
    }

    fn visit_arguments(&mut self, arguments: &[ast::Argument]) -> Result<()> {
        for argument in arguments {
            match argument {
                ast::Argument::SpreadElement(spread) => self.visit_expression(&spread.argument)?,
                other => {
                    if let Some(e) = other.as_expression() {
                        self.visit_expression(e)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Compile one template site. Nested sites in its slots are compiled
    /// first; their edits are folded into the slot text.
    fn compile_site(&mut self, site: &ast::TaggedTemplateExpression) -> Result<TemplateCode> {
        let mark = self.edits.len();
        self.visit_expressions(&site.quasi.expressions)?;
        let inner = self.edits.split_off(mark);

        let quasis = site
            .quasi
            .quasis
            .iter()
            .map(|q| q.value.raw.to_string())
            .collect();
        let expressions = site
            .quasi
            .expressions
            .iter()
            .map(|expr| {
                let span = expr.span();
                BinderExpression::new(
                    inner.apply_range(self.source, span.start, span.end),
                    span.start,
                    matches!(expr, Expression::Identifier(_)),
                )
            })
            .collect();

        let mut parsed = parse_template(&TemplateInput::new(quasis, expressions))
            .map_err(|e| e.with_offset(site.span.start))?;

        for binder in parsed.binders.iter_mut() {
            let Some(slot) = site.quasi.expressions.get(binder.slot) else {
                continue;
            };
            binder.observables = self.observables_of(slot);
            if let Some(child) = site_of(slot, &self.tag) {
                binder.child_template = self.sites.get(&child.span.start).copied();
            }
            for property in binder.properties.iter_mut() {
                if property.expression.is_literal {
                    continue;
                }
                if let Some(slot) = site.quasi.expressions.get(property.slot) {
                    property.observables = self.observables_of(slot);
                }
            }
        }

        let fragment = self.state.add_fragment(&parsed.html);
        let code = generate(&mut parsed.binders, fragment, &mut self.state).map_err(|e| {
            match e {
                CompileError::UnsupportedBinderType { message } => {
                    CompileError::UnsupportedBinderType {
                        message: format!(
                            "{} at {}",
                            message,
                            format_position(self.source, site.span.start)
                        ),
                    }
                }
                other => other.with_offset(site.span.start),
            }
        })?;
        self.sites.insert(site.span.start, code.fragment_index);

        let position = format_position(self.source, site.span.start);
        self.logger.debug(&format!(
            "{}:{}: template -> fragment {} with {} binders",
            self.filename,
            position,
            code.fragment_index,
            parsed.binders.len()
        ));
        for binder in &parsed.binders {
            if let Some(child) = binder.child_template {
                self.logger.debug(&format!(
                    "{}:{}: fragment {} slot {} renders fragment {}",
                    self.filename, position, code.fragment_index, binder.slot, child
                ));
            }
        }
        Ok(code)
    }

    /// Leading whitespace of the source line containing `offset`.
    fn line_indent(&self, offset: u32) -> &'s str {
        let source: &'s str = self.source;
        let offset = (offset as usize).min(source.len());
        let start = source[..offset].rfind('\n').map_or(0, |nl| nl + 1);
        let line = &source[start..offset];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &source[start..start + width]
    }

    fn observables_of(&self, expr: &Expression) -> smallvec::SmallVec<[String; 2]> {
        free_variables(expr)
            .into_iter()
            .filter(|name| *name != self.tag && self.scopes.is_observable(name))
            .collect()
    }
}
