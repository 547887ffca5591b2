//! Lowering of resolved declarations and calls into the target AST.

pub mod aliasing;
pub mod body;
pub mod call;
pub mod context;
pub mod err;
pub mod expression;
pub mod function;
pub mod general_call;
pub mod namer;

pub use aliasing::AliasingContext;
pub use context::TranslationContext;
pub use err::{TranslationError, TranslationErrorKind, TranslationResult};
pub use function::FunctionLowering;
