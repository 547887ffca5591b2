//! file: core/src/translate/expression.rs
//! description: translation of syntactic expressions into target nodes.

use super::call;
use super::context::TranslationContext;
use super::err::{TranslationError, TranslationErrorKind, TranslationResult};
use super::function::FunctionLowering;
use crate::js::ast::{JsBinaryOperator, JsExpression, JsNode, JsNumber, JsStatement, JsUnaryOperator, JsVar};
use crate::semantic::ConstantValue;
use crate::syntax::{BinaryOperator, Expression, StringTemplateEntry, UnaryOperator};

pub fn translate(expression: &Expression, context: &TranslationContext<'_>) -> TranslationResult<JsNode> {
    let node = match expression {
        Expression::Constant { value, .. } => JsNode::Expression(constant_to_js(value)),
        Expression::StringTemplate { id, entries } => match context.binding_context().compile_time_constant(*id) {
            Some(value) => JsNode::Expression(constant_to_js(value)),
            None => JsNode::Expression(translate_string_template(entries, context)?),
        },
        Expression::Reference { target, .. } => JsNode::Expression(context.get_reference(*target)?),
        Expression::This { receiver, .. } => {
            let alias = receiver.and_then(|r| context.aliasing().alias_for(r)).cloned();
            JsNode::Expression(alias.unwrap_or(JsExpression::This))
        }
        Expression::Binary { op, left, right, .. } => {
            let left = translate_as_expression(left, context)?;
            let right = translate_as_expression(right, context)?;
            JsNode::Expression(JsExpression::binary(binary_operator(*op), left, right))
        }
        Expression::Unary { op, operand, .. } => {
            let operand = translate_as_expression(operand, context)?;
            JsNode::Expression(JsExpression::Prefix { op: unary_operator(*op), operand: Box::new(operand) })
        }
        Expression::Call(call_expression) => call::lower(call_expression, None, context)?,
        Expression::Qualified { receiver, selector, .. } => {
            let receiver = translate_as_expression(receiver, context)?;
            call::lower(selector, Some(receiver), context)?
        }
        Expression::Return { value, .. } => {
            let value = match value {
                Some(value) => Some(translate_as_expression(value, context)?),
                None => None,
            };
            JsNode::Statement(JsStatement::Return(value))
        }
        Expression::FunctionLiteral(declaration) => {
            let function = FunctionLowering::new(declaration, context)?.lower_function_object()?;
            JsNode::Expression(JsExpression::Function(function))
        }
        Expression::Val { variable, initializer, .. } => {
            let initializer = translate_as_expression(initializer, context)?;
            let name = context.name_for_descriptor(*variable)?;
            JsNode::Statement(JsStatement::Vars(vec![JsVar { name, initializer: Some(initializer) }]))
        }
    };
    Ok(node)
}

pub fn translate_as_expression(expression: &Expression, context: &TranslationContext<'_>) -> TranslationResult<JsExpression> {
    match translate(expression, context)? {
        JsNode::Expression(translated) => Ok(translated),
        JsNode::Statement(_) => Err(TranslationError::new(
            TranslationErrorKind::Unsupported,
            format!("Expression {} yields a statement where a value is expected.", expression.id()),
            "lowerjs.translate.expression.translate_as_expression",
        )),
    }
}

pub fn translate_as_statement(expression: &Expression, context: &TranslationContext<'_>) -> TranslationResult<JsStatement> {
    Ok(translate(expression, context)?.into_statement())
}

fn translate_string_template(entries: &[StringTemplateEntry], context: &TranslationContext<'_>) -> TranslationResult<JsExpression> {
    // Start from "" unless the first entry already is a string, so `+`
    // concatenates.
    let mut result = match entries.first() {
        Some(StringTemplateEntry::Literal(_)) => None,
        _ => Some(context.program().string_literal("")),
    };
    for entry in entries {
        let part = match entry {
            StringTemplateEntry::Literal(text) => context.program().string_literal(text.clone()),
            StringTemplateEntry::Expression(expression) => translate_as_expression(expression, context)?,
        };
        result = Some(match result {
            Some(left) => JsExpression::binary(JsBinaryOperator::Add, left, part),
            None => part,
        });
    }
    Ok(result.unwrap_or_else(|| context.program().string_literal("")))
}

fn constant_to_js(value: &ConstantValue) -> JsExpression {
    match value {
        ConstantValue::String(s) => JsExpression::String(s.clone()),
        ConstantValue::Int(i) => JsExpression::Number(JsNumber::Int(*i)),
        ConstantValue::Double(d) => JsExpression::Number(JsNumber::Double(*d)),
        ConstantValue::Boolean(b) => JsExpression::Boolean(*b),
        ConstantValue::Null => JsExpression::Null,
    }
}

fn binary_operator(op: BinaryOperator) -> JsBinaryOperator {
    match op {
        BinaryOperator::Plus => JsBinaryOperator::Add,
        BinaryOperator::Minus => JsBinaryOperator::Sub,
        BinaryOperator::Times => JsBinaryOperator::Mul,
        BinaryOperator::Div => JsBinaryOperator::Div,
        BinaryOperator::Rem => JsBinaryOperator::Mod,
        BinaryOperator::Eq => JsBinaryOperator::StrictEq,
        BinaryOperator::NotEq => JsBinaryOperator::StrictNeq,
        BinaryOperator::Lt => JsBinaryOperator::Lt,
        BinaryOperator::LtEq => JsBinaryOperator::Lte,
        BinaryOperator::Gt => JsBinaryOperator::Gt,
        BinaryOperator::GtEq => JsBinaryOperator::Gte,
        BinaryOperator::And => JsBinaryOperator::And,
        BinaryOperator::Or => JsBinaryOperator::Or,
    }
}

fn unary_operator(op: UnaryOperator) -> JsUnaryOperator {
    match op {
        UnaryOperator::Minus => JsUnaryOperator::Neg,
        UnaryOperator::Plus => JsUnaryOperator::Pos,
        UnaryOperator::Not => JsUnaryOperator::Not,
    }
}
