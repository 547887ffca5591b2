use super::ast::JsExpression;
use super::scope::JsScope;

/// Owner of the global scope and the canonical literal constructors.
#[derive(Debug, Clone)]
pub struct JsProgram {
    root_scope: JsScope,
}

impl JsProgram {
    pub fn new(module_name: &str) -> Self {
        JsProgram { root_scope: JsScope::root(format!("module {}", module_name)) }
    }

    pub fn root_scope(&self) -> &JsScope {
        &self.root_scope
    }

    pub fn empty_expression(&self) -> JsExpression {
        JsExpression::Empty
    }

    pub fn string_literal(&self, value: impl Into<String>) -> JsExpression {
        JsExpression::String(value.into())
    }
}
