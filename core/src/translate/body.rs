use super::context::TranslationContext;
use super::err::TranslationResult;
use super::expression;
use crate::js::ast::{JsBlock, JsExpression, JsNode, JsStatement};
use crate::semantic::FunctionDescriptor;
use crate::syntax::{Body, Expression, FunctionDeclaration};

/// Translate the body of `declaration` into the statements of its function
/// object.
///
/// An expression body is returned unless the function returns `Unit`. In a
/// function literal the last expression of a block is its value.
pub fn translate_function_body(
    descriptor: &FunctionDescriptor,
    declaration: &FunctionDeclaration,
    context: &TranslationContext<'_>,
) -> TranslationResult<JsBlock> {
    let Some(body) = &declaration.body else {
        return Ok(JsBlock::default());
    };

    let mut statements = Vec::new();
    match body {
        Body::Expression(expression) => {
            let statement = translate_result_expression(descriptor, expression, context)?;
            if statement != JsStatement::Empty {
                statements.push(statement);
            }
        }
        Body::Block(expressions) => {
            let last = expressions.len().checked_sub(1);
            for (index, expression) in expressions.iter().enumerate() {
                let statement = if declaration.is_function_literal() && Some(index) == last {
                    translate_result_expression(descriptor, expression, context)?
                } else {
                    expression::translate_as_statement(expression, context)?
                };
                if statement != JsStatement::Empty {
                    statements.push(statement);
                }
            }
        }
    }
    Ok(JsBlock::new(statements))
}

fn translate_result_expression(
    descriptor: &FunctionDescriptor,
    expression: &Expression,
    context: &TranslationContext<'_>,
) -> TranslationResult<JsStatement> {
    if expression.is_return() || descriptor.returns_unit() {
        return expression::translate_as_statement(expression, context);
    }
    Ok(match expression::translate(expression, context)? {
        JsNode::Expression(JsExpression::Empty) => JsStatement::Empty,
        JsNode::Expression(value) => JsStatement::Return(Some(value)),
        JsNode::Statement(statement) => statement,
    })
}
