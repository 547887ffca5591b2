//! Target JavaScript representation: AST, scopes, inline metadata and the
//! parser for embedded source.

pub mod ast;
pub mod metadata;
pub mod parser;
pub mod program;
pub mod scope;

pub use ast::{
    JsBinaryOperator, JsBlock, JsExpression, JsFunction, JsFunctionRef, JsInvocation, JsName, JsNameRef, JsNode,
    JsNumber, JsObjectLiteral, JsParameter, JsPropertyInitializer, JsStatement, JsUnaryOperator, JsVar,
};
pub use metadata::{
    HasMetadata, INLINE_END_TAG, INLINE_START_TAG, InlineStrategy, Metadata, MetadataKey, MetadataValue,
};
pub use program::JsProgram;
pub use scope::JsScope;
