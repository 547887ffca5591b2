//! file: core/src/syntax.rs
//! description: the syntactic declarations and expressions the lowering walks.
//!
//! Every node carries a `NodeId` so the binding context can map it to its
//! resolved call, declared descriptor or compile-time constant.

use serde::{Deserialize, Serialize};

use crate::semantic::{ConstantValue, DescriptorId};

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationForm {
    #[default]
    Named,
    /// A lambda `{ ... }`; its receiver, if any, is captured by closure.
    FunctionLiteral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub id: NodeId,
    /// Declaration text used in diagnostics.
    pub name: String,
    #[serde(default)]
    pub form: DeclarationForm,
    #[serde(default)]
    pub body: Option<Body>,
}

impl FunctionDeclaration {
    pub fn named(id: NodeId, name: impl Into<String>, body: Option<Body>) -> Self {
        FunctionDeclaration { id, name: name.into(), form: DeclarationForm::Named, body }
    }

    pub fn literal(id: NodeId, body: Body) -> Self {
        FunctionDeclaration { id, name: "<anonymous>".to_string(), form: DeclarationForm::FunctionLiteral, body: Some(body) }
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn is_function_literal(&self) -> bool {
        self.form == DeclarationForm::FunctionLiteral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    /// `fun f() = expr`
    Expression(Expression),
    /// `fun f() { ... }`
    Block(Vec<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Plus,
    Minus,
    Times,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringTemplateEntry {
    Literal(String),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    pub id: NodeId,
    #[serde(default)]
    pub arguments: Vec<Expression>,
}

impl CallExpression {
    pub fn new(id: NodeId, arguments: Vec<Expression>) -> Self {
        CallExpression { id, arguments }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    Constant { id: NodeId, value: ConstantValue },
    StringTemplate { id: NodeId, entries: Vec<StringTemplateEntry> },
    Reference { id: NodeId, target: DescriptorId },
    /// `this`; `receiver` names the receiver parameter it resolves to, if any.
    This {
        id: NodeId,
        #[serde(default)]
        receiver: Option<DescriptorId>,
    },
    Binary { id: NodeId, op: BinaryOperator, left: Box<Expression>, right: Box<Expression> },
    Unary { id: NodeId, op: UnaryOperator, operand: Box<Expression> },
    Call(CallExpression),
    /// `receiver.selector(...)`
    Qualified { id: NodeId, receiver: Box<Expression>, selector: CallExpression },
    Return {
        id: NodeId,
        #[serde(default)]
        value: Option<Box<Expression>>,
    },
    FunctionLiteral(Box<FunctionDeclaration>),
    /// Local `val name = initializer`.
    Val { id: NodeId, variable: DescriptorId, initializer: Box<Expression> },
}

impl Expression {
    pub fn id(&self) -> NodeId {
        match self {
            Expression::Constant { id, .. }
            | Expression::StringTemplate { id, .. }
            | Expression::Reference { id, .. }
            | Expression::This { id, .. }
            | Expression::Binary { id, .. }
            | Expression::Unary { id, .. }
            | Expression::Qualified { id, .. }
            | Expression::Return { id, .. }
            | Expression::Val { id, .. } => *id,
            Expression::Call(call) => call.id,
            Expression::FunctionLiteral(declaration) => declaration.id,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Expression::Return { .. })
    }

    /// A string template made of a single literal entry, as the frontend
    /// produces for `"..."`.
    pub fn string_template(id: NodeId, text: impl Into<String>) -> Self {
        Expression::StringTemplate { id, entries: vec![StringTemplateEntry::Literal(text.into())] }
    }
}
