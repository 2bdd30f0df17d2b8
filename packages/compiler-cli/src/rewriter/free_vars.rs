//! Free Variables
//!
//! Identifier references of a binder expression in first-appearance order.
//! Names bound inside functions nested in the expression (parameters and
//! their local declarations) are not free.

use super::scope::collect_bindings;
use indexmap::IndexSet;
use oxc_ast::ast::{
    self, ArrayExpressionElement, AssignmentTarget, ChainElement, Expression, ObjectPropertyKind,
    SimpleAssignmentTarget, Statement,
};

pub fn free_variables(expr: &Expression) -> Vec<String> {
    let mut collector = FreeVars::default();
    collector.expression(expr);
    collector.names.into_iter().collect()
}

#[derive(Default)]
struct FreeVars {
    names: IndexSet<String>,
    bound: Vec<Vec<String>>,
}

impl FreeVars {
    fn reference(&mut self, name: &str) {
        if !self.bound.iter().any(|frame| frame.iter().any(|n| n == name)) {
            self.names.insert(name.to_string());
        }
    }

    fn bind_pattern(&mut self, pattern: &ast::BindingPattern) {
        // A misplaced marker is reported by the scope pass, not here.
        if let (Ok(bindings), Some(frame)) = (collect_bindings(pattern), self.bound.last_mut()) {
            frame.extend(bindings.into_iter().map(|b| b.name));
        }
    }

    fn function(&mut self, params: &ast::FormalParameters, body: Option<&ast::FunctionBody>) {
        self.bound.push(Vec::new());
        for param in &params.items {
            self.bind_pattern(&param.pattern);
        }
        if let Some(rest) = &params.rest {
            self.bind_pattern(&rest.argument);
        }
        if let Some(body) = body {
            for statement in &body.statements {
                self.declare(statement);
            }
            for statement in &body.statements {
                self.statement(statement);
            }
        }
        self.bound.pop();
    }

    fn declare(&mut self, statement: &Statement) {
        match statement {
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    self.bind_pattern(&declarator.id);
                }
            }
            Statement::FunctionDeclaration(func) => {
                if let (Some(id), Some(frame)) = (&func.id, self.bound.last_mut()) {
                    frame.push(id.name.to_string());
                }
            }
            Statement::ClassDeclaration(class) => {
                if let (Some(id), Some(frame)) = (&class.id, self.bound.last_mut()) {
                    frame.push(id.name.to_string());
                }
            }
            _ => {}
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::ExpressionStatement(s) => self.expression(&s.expression),
            Statement::ReturnStatement(s) => {
                if let Some(argument) = &s.argument {
                    self.expression(argument);
                }
            }
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    if let Some(init) = &declarator.init {
                        self.expression(init);
                    }
                }
            }
            Statement::BlockStatement(block) => {
                for s in &block.body {
                    self.declare(s);
                }
                for s in &block.body {
                    self.statement(s);
                }
            }
            Statement::IfStatement(s) => {
                self.expression(&s.test);
                self.statement(&s.consequent);
                if let Some(alternate) = &s.alternate {
                    self.statement(alternate);
                }
            }
            Statement::ThrowStatement(s) => self.expression(&s.argument),
            Statement::FunctionDeclaration(func) => {
                self.function(&func.params, func.body.as_deref());
            }
            _ => {}
        }
    }

    fn expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Identifier(id) => self.reference(id.name.as_str()),
            Expression::TemplateLiteral(t) => {
                for e in &t.expressions {
                    self.expression(e);
                }
            }
            Expression::TaggedTemplateExpression(t) => {
                self.expression(&t.tag);
                for e in &t.quasi.expressions {
                    self.expression(e);
                }
            }
            Expression::ArrayExpression(array) => {
                for element in &array.elements {
                    match element {
                        ArrayExpressionElement::SpreadElement(spread) => {
                            self.expression(&spread.argument)
                        }
                        ArrayExpressionElement::Elision(_) => {}
                        other => {
                            if let Some(e) = other.as_expression() {
                                self.expression(e);
                            }
                        }
                    }
                }
            }
            Expression::ObjectExpression(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPropertyKind::ObjectProperty(p) => {
                            if p.computed {
                                if let Some(key) = p.key.as_expression() {
                                    self.expression(key);
                                }
                            }
                            self.expression(&p.value);
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            self.expression(&spread.argument)
                        }
                    }
                }
            }
            Expression::ArrowFunctionExpression(arrow) => {
                self.function(&arrow.params, Some(&*arrow.body));
            }
            Expression::FunctionExpression(func) => {
                self.function(&func.params, func.body.as_deref());
            }
            Expression::AssignmentExpression(e) => {
                self.assignment_target(&e.left);
                self.expression(&e.right);
            }
            Expression::UpdateExpression(e) => self.simple_target(&e.argument),
            Expression::AwaitExpression(e) => self.expression(&e.argument),
            Expression::YieldExpression(e) => {
                if let Some(argument) = &e.argument {
                    self.expression(argument);
                }
            }
            Expression::UnaryExpression(e) => self.expression(&e.argument),
            Expression::BinaryExpression(e) => {
                self.expression(&e.left);
                self.expression(&e.right);
            }
            Expression::LogicalExpression(e) => {
                self.expression(&e.left);
                self.expression(&e.right);
            }
            Expression::ConditionalExpression(e) => {
                self.expression(&e.test);
                self.expression(&e.consequent);
                self.expression(&e.alternate);
            }
            Expression::SequenceExpression(e) => {
                for e in &e.expressions {
                    self.expression(e);
                }
            }
            Expression::ParenthesizedExpression(e) => self.expression(&e.expression),
            Expression::CallExpression(call) => self.call(call),
            Expression::NewExpression(e) => {
                self.expression(&e.callee);
                self.arguments(&e.arguments);
            }
            Expression::ChainExpression(chain) => match &chain.expression {
                ChainElement::CallExpression(call) => self.call(call),
                ChainElement::TSNonNullExpression(e) => self.expression(&e.expression),
                ChainElement::StaticMemberExpression(m) => self.expression(&m.object),
                ChainElement::ComputedMemberExpression(m) => {
                    self.expression(&m.object);
                    self.expression(&m.expression);
                }
                ChainElement::PrivateFieldExpression(m) => self.expression(&m.object),
                #[allow(unreachable_patterns)]
                _ => {}
            },
            Expression::StaticMemberExpression(m) => self.expression(&m.object),
            Expression::ComputedMemberExpression(m) => {
                self.expression(&m.object);
                self.expression(&m.expression);
            }
            Expression::PrivateFieldExpression(m) => self.expression(&m.object),
            Expression::TSAsExpression(e) => self.expression(&e.expression),
            Expression::TSSatisfiesExpression(e) => self.expression(&e.expression),
            Expression::TSNonNullExpression(e) => self.expression(&e.expression),
            Expression::TSTypeAssertion(e) => self.expression(&e.expression),
            _ => {}
        }
    }

    fn call(&mut self, call: &ast::CallExpression) {
        self.expression(&call.callee);
        self.arguments(&call.arguments);
    }

    fn arguments(&mut self, arguments: &[ast::Argument]) {
        for argument in arguments {
            match argument {
                ast::Argument::SpreadElement(spread) => self.expression(&spread.argument),
                other => {
                    if let Some(e) = other.as_expression() {
                        self.expression(e);
                    }
                }
            }
        }
    }

    fn assignment_target(&mut self, target: &AssignmentTarget) {
        match target {
            AssignmentTarget::AssignmentTargetIdentifier(id) => self.reference(id.name.as_str()),
            AssignmentTarget::StaticMemberExpression(m) => self.expression(&m.object),
            AssignmentTarget::ComputedMemberExpression(m) => {
                self.expression(&m.object);
                self.expression(&m.expression);
            }
            _ => {}
        }
    }

    fn simple_target(&mut self, target: &SimpleAssignmentTarget) {
        match target {
            SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                self.reference(id.name.as_str())
            }
            SimpleAssignmentTarget::StaticMemberExpression(m) => self.expression(&m.object),
            SimpleAssignmentTarget::ComputedMemberExpression(m) => {
                self.expression(&m.object);
                self.expression(&m.expression);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn free(source: &str) -> Vec<String> {
        let allocator = Allocator::default();
        let expr = Parser::new(&allocator, source, SourceType::mjs())
            .parse_expression()
            .unwrap();
        free_variables(&expr)
    }

    #[test]
    fn should_list_names_in_first_appearance_order() {
        assert_eq!(free("b + a * b"), vec!["b", "a"]);
    }

    #[test]
    fn should_skip_member_property_names() {
        assert_eq!(free("user.name + items[index]"), vec!["user", "items", "index"]);
    }

    #[test]
    fn should_skip_nested_function_parameters() {
        assert_eq!(free("items.map(item => item.id + offset)"), vec!["items", "offset"]);
        assert_eq!(free("list.map(({ id }) => id)"), vec!["list"]);
    }

    #[test]
    fn should_include_shorthand_and_computed_keys() {
        assert_eq!(free("({ a, [k]: v, b: 1 })"), vec!["a", "k", "v"]);
    }
}
