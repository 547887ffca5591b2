//! file: core/src/translate/call.rs
//! description: lowering of resolved call expressions.
//!
//! Three branches, tried in order: the `js(...)` intrinsic, whose string
//! argument is parsed and spliced as target code; calls the inliner should
//! expand, which are stamped `inline-strategy = in-place`; ordinary calls.
//! The intrinsic must be matched first since it is itself a plain function.

use log::debug;

use super::context::TranslationContext;
use super::err::{TranslationError, TranslationErrorKind, TranslationResult};
use super::expression;
use super::general_call;
use crate::js::ast::{JsBlock, JsExpression, JsNode, JsStatement};
use crate::js::metadata::{self, InlineStrategy};
use crate::js::parser::{self, ErrorReporter, FailingReporter, JsParseError};
use crate::location::Location;
use crate::semantic::{BindingContext, ConstantValue, Descriptor, DescriptorId, FunctionKind, ResolvedCall};
use crate::syntax::{CallExpression, Expression};

const JS_CODE_FQ_NAME: &str = "kotlin.js.js";

/// Lower `call`, failing on any syntax error in embedded js code.
pub fn lower(
    call: &CallExpression,
    receiver: Option<JsExpression>,
    context: &TranslationContext<'_>,
) -> TranslationResult<JsNode> {
    lower_with_reporter(call, receiver, context, &mut FailingReporter)
}

/// Like [`lower`], with `reporter` receiving the diagnostics of embedded js
/// code. A reporter that aborts parsing makes the code splice as nothing.
pub fn lower_with_reporter(
    call: &CallExpression,
    receiver: Option<JsExpression>,
    context: &TranslationContext<'_>,
    reporter: &mut dyn ErrorReporter,
) -> TranslationResult<JsNode> {
    let binding = context.binding_context();
    let resolved_call = binding.resolved_call(call.id).ok_or_else(|| {
        TranslationError::new(
            TranslationErrorKind::MissingResolvedCall,
            format!("Call {} has no resolved call.", call.id),
            "lowerjs.translate.call.lower",
        )
    })?;

    if is_js_code_call(resolved_call, binding) {
        debug!("call {}: js code", call.id);
        return lower_js_code(call, context, reporter);
    }

    let arguments = call
        .arguments
        .iter()
        .map(|argument| expression::translate_as_expression(argument, context))
        .collect::<TranslationResult<Vec<_>>>()?;
    let lowered = general_call::translate_call(context, resolved_call, receiver, arguments)?;

    if context.config().inline_enabled && should_inline(resolved_call, binding) {
        debug!("call {}: inline", call.id);
        return Ok(JsNode::Expression(match lowered {
            JsExpression::Invocation(mut invocation) => {
                metadata::set_inline_strategy(&mut invocation, InlineStrategy::InPlace);
                JsExpression::Invocation(invocation)
            }
            other => other,
        }));
    }

    debug!("call {}: ordinary", call.id);
    Ok(JsNode::Expression(lowered))
}

/// `kotlin.js.js(String)`.
pub fn is_js_code_call(resolved_call: &ResolvedCall, binding: &dyn BindingContext) -> bool {
    let Some(function) = binding.function(resolved_call.resulting_descriptor()) else {
        return false;
    };
    if function.qualified_name() != JS_CODE_FQ_NAME {
        return false;
    }
    match function.value_parameters.as_slice() {
        [parameter] => binding.value_parameter(*parameter).is_some_and(|p| p.ty.is_string()),
        _ => false,
    }
}

/// Whether the inliner should expand a call resolved to `resolved_call`.
/// Variable-as-function calls are decided by their variable.
pub fn should_inline(resolved_call: &ResolvedCall, binding: &dyn BindingContext) -> bool {
    should_inline_descriptor(binding, resolved_call.semantic_callee())
}

pub fn should_inline_descriptor(binding: &dyn BindingContext, descriptor: DescriptorId) -> bool {
    match binding.descriptor(descriptor) {
        Some(Descriptor::Function(f)) if f.kind == FunctionKind::Simple => f.inline_kind.is_inline(),
        Some(Descriptor::ValueParameter(p)) => {
            !p.noinline && binding.function(p.containing_declaration).is_some_and(|f| f.inline_kind.is_inline())
        }
        _ => false,
    }
}

fn lower_js_code(
    call: &CallExpression,
    context: &TranslationContext<'_>,
    reporter: &mut dyn ErrorReporter,
) -> TranslationResult<JsNode> {
    let argument = match call.arguments.as_slice() {
        [argument @ Expression::StringTemplate { .. }] => argument,
        _ => {
            return Err(TranslationError::new(
                TranslationErrorKind::MalformedJsCall,
                format!("js() call {} must have a single string template argument.", call.id),
                "lowerjs.translate.call.lower_js_code",
            ));
        }
    };
    let source = match context.binding_context().compile_time_constant(argument.id()) {
        Some(ConstantValue::String(source)) => source,
        _ => {
            return Err(TranslationError::new(
                TranslationErrorKind::NonStringJsCode,
                format!("Compile time value of js() argument in call {} is not a string.", call.id),
                "lowerjs.translate.call.lower_js_code",
            ));
        }
    };

    let statements = parse_js_code(source, context, reporter)?;
    Ok(splice(statements, context))
}

fn parse_js_code(
    source: &str,
    context: &TranslationContext<'_>,
    reporter: &mut dyn ErrorReporter,
) -> TranslationResult<Vec<JsStatement>> {
    let info = Location::start_of(context.config().js_code_source_name.clone());
    match parser::parse(&info, context.scope(), source.as_bytes(), reporter, true) {
        Ok(statements) => Ok(statements),
        Err(JsParseError::Aborted) => {
            debug!("js code parsing aborted, splicing nothing");
            Ok(Vec::new())
        }
        Err(JsParseError::Syntax(error)) => Err(TranslationError::embedded_source(error)),
        Err(JsParseError::Io(error)) => Err(TranslationError::new(
            TranslationErrorKind::Io,
            format!("Failed to read js code: {}", error),
            "lowerjs.translate.call.parse_js_code",
        )),
    }
}

fn splice(mut statements: Vec<JsStatement>, context: &TranslationContext<'_>) -> JsNode {
    match statements.len() {
        0 => JsNode::Expression(context.program().empty_expression()),
        1 => match statements.pop() {
            Some(JsStatement::Expression(expression)) => JsNode::Expression(expression),
            Some(statement) => JsNode::Statement(statement),
            None => JsNode::Expression(context.program().empty_expression()),
        },
        _ => JsNode::Statement(JsStatement::Block(JsBlock::new(statements))),
    }
}
