//! file: core/src/js/ast.rs
//! description: the target JavaScript AST produced by the lowering.
//!
//! Nodes are plain owned values except function objects, which are shared
//! (`JsFunctionRef`) so the translation context and the caller observe the
//! same object while parameters, body and markers are installed in place.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use super::metadata::{HasMetadata, Metadata};
use super::scope::JsScope;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JsName {
    ident: String,
}

impl JsName {
    /// A name not bound to any scope (free reference, property label).
    pub fn free(ident: impl Into<String>) -> Self {
        JsName { ident: ident.into() }
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn make_ref(&self) -> JsNameRef {
        JsNameRef::new(self.clone())
    }
}

impl std::fmt::Display for JsName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ident)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsNameRef {
    pub name: JsName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<Box<JsExpression>>,
}

impl JsNameRef {
    pub fn new(name: JsName) -> Self {
        JsNameRef { name, qualifier: None }
    }

    pub fn qualified(name: JsName, qualifier: JsExpression) -> Self {
        JsNameRef { name, qualifier: Some(Box::new(qualifier)) }
    }

    pub fn ident(&self) -> &str {
        self.name.ident()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsNumber {
    Int(i64),
    Double(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsBinaryOperator {
    Assign,
    AssignAdd,
    AssignSub,
    AssignMul,
    AssignDiv,
    AssignMod,
    AssignShl,
    AssignShr,
    AssignShru,
    AssignBitAnd,
    AssignBitOr,
    AssignBitXor,
    Comma,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Neq,
    StrictEq,
    StrictNeq,
    Lt,
    Lte,
    Gt,
    Gte,
    InstanceOf,
    In,
    Shl,
    Shr,
    Shru,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl JsBinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            JsBinaryOperator::Assign => "=",
            JsBinaryOperator::AssignAdd => "+=",
            JsBinaryOperator::AssignSub => "-=",
            JsBinaryOperator::AssignMul => "*=",
            JsBinaryOperator::AssignDiv => "/=",
            JsBinaryOperator::AssignMod => "%=",
            JsBinaryOperator::AssignShl => "<<=",
            JsBinaryOperator::AssignShr => ">>=",
            JsBinaryOperator::AssignShru => ">>>=",
            JsBinaryOperator::AssignBitAnd => "&=",
            JsBinaryOperator::AssignBitOr => "|=",
            JsBinaryOperator::AssignBitXor => "^=",
            JsBinaryOperator::Comma => ",",
            JsBinaryOperator::Or => "||",
            JsBinaryOperator::And => "&&",
            JsBinaryOperator::BitOr => "|",
            JsBinaryOperator::BitXor => "^",
            JsBinaryOperator::BitAnd => "&",
            JsBinaryOperator::Eq => "==",
            JsBinaryOperator::Neq => "!=",
            JsBinaryOperator::StrictEq => "===",
            JsBinaryOperator::StrictNeq => "!==",
            JsBinaryOperator::Lt => "<",
            JsBinaryOperator::Lte => "<=",
            JsBinaryOperator::Gt => ">",
            JsBinaryOperator::Gte => ">=",
            JsBinaryOperator::InstanceOf => "instanceof",
            JsBinaryOperator::In => "in",
            JsBinaryOperator::Shl => "<<",
            JsBinaryOperator::Shr => ">>",
            JsBinaryOperator::Shru => ">>>",
            JsBinaryOperator::Add => "+",
            JsBinaryOperator::Sub => "-",
            JsBinaryOperator::Mul => "*",
            JsBinaryOperator::Div => "/",
            JsBinaryOperator::Mod => "%",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "=" => JsBinaryOperator::Assign,
            "+=" => JsBinaryOperator::AssignAdd,
            "-=" => JsBinaryOperator::AssignSub,
            "*=" => JsBinaryOperator::AssignMul,
            "/=" => JsBinaryOperator::AssignDiv,
            "%=" => JsBinaryOperator::AssignMod,
            "<<=" => JsBinaryOperator::AssignShl,
            ">>=" => JsBinaryOperator::AssignShr,
            ">>>=" => JsBinaryOperator::AssignShru,
            "&=" => JsBinaryOperator::AssignBitAnd,
            "|=" => JsBinaryOperator::AssignBitOr,
            "^=" => JsBinaryOperator::AssignBitXor,
            "," => JsBinaryOperator::Comma,
            "||" => JsBinaryOperator::Or,
            "&&" => JsBinaryOperator::And,
            "|" => JsBinaryOperator::BitOr,
            "^" => JsBinaryOperator::BitXor,
            "&" => JsBinaryOperator::BitAnd,
            "==" => JsBinaryOperator::Eq,
            "!=" => JsBinaryOperator::Neq,
            "===" => JsBinaryOperator::StrictEq,
            "!==" => JsBinaryOperator::StrictNeq,
            "<" => JsBinaryOperator::Lt,
            "<=" => JsBinaryOperator::Lte,
            ">" => JsBinaryOperator::Gt,
            ">=" => JsBinaryOperator::Gte,
            "instanceof" => JsBinaryOperator::InstanceOf,
            "in" => JsBinaryOperator::In,
            "<<" => JsBinaryOperator::Shl,
            ">>" => JsBinaryOperator::Shr,
            ">>>" => JsBinaryOperator::Shru,
            "+" => JsBinaryOperator::Add,
            "-" => JsBinaryOperator::Sub,
            "*" => JsBinaryOperator::Mul,
            "/" => JsBinaryOperator::Div,
            "%" => JsBinaryOperator::Mod,
            _ => return None,
        };
        Some(op)
    }

    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            JsBinaryOperator::Assign
                | JsBinaryOperator::AssignAdd
                | JsBinaryOperator::AssignSub
                | JsBinaryOperator::AssignMul
                | JsBinaryOperator::AssignDiv
                | JsBinaryOperator::AssignMod
                | JsBinaryOperator::AssignShl
                | JsBinaryOperator::AssignShr
                | JsBinaryOperator::AssignShru
                | JsBinaryOperator::AssignBitAnd
                | JsBinaryOperator::AssignBitOr
                | JsBinaryOperator::AssignBitXor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsUnaryOperator {
    Not,
    Neg,
    Pos,
    BitNot,
    TypeOf,
    Void,
    Delete,
    Inc,
    Dec,
}

impl JsUnaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "!" => JsUnaryOperator::Not,
            "-" => JsUnaryOperator::Neg,
            "+" => JsUnaryOperator::Pos,
            "~" => JsUnaryOperator::BitNot,
            "typeof" => JsUnaryOperator::TypeOf,
            "void" => JsUnaryOperator::Void,
            "delete" => JsUnaryOperator::Delete,
            "++" => JsUnaryOperator::Inc,
            "--" => JsUnaryOperator::Dec,
            _ => return None,
        };
        Some(op)
    }

    pub fn is_modifying(&self) -> bool {
        matches!(self, JsUnaryOperator::Inc | JsUnaryOperator::Dec)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsExpression {
    NameRef(JsNameRef),
    This,
    Null,
    Boolean(bool),
    Number(JsNumber),
    String(String),
    Array(Vec<JsExpression>),
    Object(JsObjectLiteral),
    Function(JsFunctionRef),
    Invocation(JsInvocation),
    New {
        constructor: Box<JsExpression>,
        arguments: Vec<JsExpression>,
    },
    Binary {
        op: JsBinaryOperator,
        left: Box<JsExpression>,
        right: Box<JsExpression>,
    },
    Prefix {
        op: JsUnaryOperator,
        operand: Box<JsExpression>,
    },
    Postfix {
        op: JsUnaryOperator,
        operand: Box<JsExpression>,
    },
    Conditional {
        test: Box<JsExpression>,
        then: Box<JsExpression>,
        otherwise: Box<JsExpression>,
    },
    Index {
        object: Box<JsExpression>,
        index: Box<JsExpression>,
    },
    /// Placeholder for "no code"; emitted as nothing.
    Empty,
}

impl JsExpression {
    pub fn name_ref(name: &JsName) -> Self {
        JsExpression::NameRef(name.make_ref())
    }

    pub fn binary(op: JsBinaryOperator, left: JsExpression, right: JsExpression) -> Self {
        JsExpression::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn make_stmt(self) -> JsStatement {
        JsStatement::Expression(self)
    }

    pub fn as_invocation(&self) -> Option<&JsInvocation> {
        match self {
            JsExpression::Invocation(invocation) => Some(invocation),
            _ => None,
        }
    }

    pub fn as_name_ref(&self) -> Option<&JsNameRef> {
        match self {
            JsExpression::NameRef(name_ref) => Some(name_ref),
            _ => None,
        }
    }

    /// Valid left-hand side of an assignment or `++`/`--`.
    pub fn is_reference(&self) -> bool {
        matches!(self, JsExpression::NameRef(_) | JsExpression::Index { .. })
    }
}

impl From<JsNameRef> for JsExpression {
    fn from(name_ref: JsNameRef) -> Self {
        JsExpression::NameRef(name_ref)
    }
}

impl From<JsInvocation> for JsExpression {
    fn from(invocation: JsInvocation) -> Self {
        JsExpression::Invocation(invocation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsVar {
    pub name: JsName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<JsExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsStatement {
    Expression(JsExpression),
    Return(Option<JsExpression>),
    Vars(Vec<JsVar>),
    If {
        test: JsExpression,
        then: Box<JsStatement>,
        otherwise: Option<Box<JsStatement>>,
    },
    While {
        test: JsExpression,
        body: Box<JsStatement>,
    },
    DoWhile {
        body: Box<JsStatement>,
        test: JsExpression,
    },
    For {
        init: Option<Box<JsStatement>>,
        test: Option<JsExpression>,
        update: Option<JsExpression>,
        body: Box<JsStatement>,
    },
    ForIn {
        variable: JsName,
        declared: bool,
        object: JsExpression,
        body: Box<JsStatement>,
    },
    Block(JsBlock),
    Throw(JsExpression),
    Break,
    Continue,
    Empty,
}

impl JsStatement {
    pub fn as_expression(&self) -> Option<&JsExpression> {
        match self {
            JsStatement::Expression(expression) => Some(expression),
            _ => None,
        }
    }

    pub fn as_invocation(&self) -> Option<&JsInvocation> {
        self.as_expression().and_then(JsExpression::as_invocation)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct JsBlock {
    statements: Vec<JsStatement>,
}

impl JsBlock {
    pub fn new(statements: Vec<JsStatement>) -> Self {
        JsBlock { statements }
    }

    pub fn statements(&self) -> &[JsStatement] {
        &self.statements
    }

    pub fn statements_mut(&mut self) -> &mut Vec<JsStatement> {
        &mut self.statements
    }

    pub fn into_statements(self) -> Vec<JsStatement> {
        self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsParameter {
    pub name: JsName,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl JsParameter {
    pub fn new(name: JsName) -> Self {
        JsParameter { name, metadata: Metadata::new() }
    }

    pub fn name(&self) -> &JsName {
        &self.name
    }
}

impl HasMetadata for JsParameter {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsInvocation {
    pub qualifier: Box<JsExpression>,
    pub arguments: Vec<JsExpression>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl JsInvocation {
    pub fn new(qualifier: JsExpression, arguments: Vec<JsExpression>) -> Self {
        JsInvocation { qualifier: Box::new(qualifier), arguments, metadata: Metadata::new() }
    }

    /// The invoked name when the callee is a plain (unqualified) name reference.
    pub fn callee_name(&self) -> Option<&str> {
        match self.qualifier.as_ref() {
            JsExpression::NameRef(name_ref) if name_ref.qualifier.is_none() => Some(name_ref.ident()),
            _ => None,
        }
    }

    pub fn make_stmt(self) -> JsStatement {
        JsStatement::Expression(JsExpression::Invocation(self))
    }
}

impl HasMetadata for JsInvocation {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

pub type JsFunctionRef = Rc<RefCell<JsFunction>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsFunction {
    #[serde(skip)]
    scope: JsScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<JsName>,
    parameters: Vec<JsParameter>,
    body: JsBlock,
}

impl JsFunction {
    pub fn new(scope: JsScope) -> Self {
        JsFunction { scope, name: None, parameters: Vec::new(), body: JsBlock::default() }
    }

    pub fn into_ref(self) -> JsFunctionRef {
        Rc::new(RefCell::new(self))
    }

    pub fn scope(&self) -> &JsScope {
        &self.scope
    }

    pub fn parameters(&self) -> &[JsParameter] {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: Vec<JsParameter>) {
        self.parameters = parameters;
    }

    pub fn body(&self) -> &JsBlock {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut JsBlock {
        &mut self.body
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsPropertyInitializer {
    pub label: JsExpression,
    pub value: JsExpression,
}

impl JsPropertyInitializer {
    pub fn new(label: JsExpression, value: JsExpression) -> Self {
        JsPropertyInitializer { label, value }
    }

    /// Label text for name and string labels.
    pub fn label_text(&self) -> Option<&str> {
        match &self.label {
            JsExpression::NameRef(name_ref) => Some(name_ref.ident()),
            JsExpression::String(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct JsObjectLiteral {
    pub properties: Vec<JsPropertyInitializer>,
}

impl JsObjectLiteral {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: &str, value: JsExpression) {
        self.properties.push(JsPropertyInitializer::new(JsName::free(label).make_ref().into(), value));
    }

    pub fn get(&self, label: &str) -> Option<&JsExpression> {
        self.properties.iter().find(|p| p.label_text() == Some(label)).map(|p| &p.value)
    }
}

/// Result of lowering a call: calls usually yield expressions, embedded
/// target code may yield a statement or a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsNode {
    Expression(JsExpression),
    Statement(JsStatement),
}

impl JsNode {
    pub fn as_expression(&self) -> Option<&JsExpression> {
        match self {
            JsNode::Expression(expression) => Some(expression),
            JsNode::Statement(_) => None,
        }
    }

    pub fn into_statement(self) -> JsStatement {
        match self {
            JsNode::Expression(JsExpression::Empty) => JsStatement::Empty,
            JsNode::Expression(expression) => JsStatement::Expression(expression),
            JsNode::Statement(statement) => statement,
        }
    }
}
