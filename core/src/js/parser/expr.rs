use pest::iterators::Pair;

use super::rules::{self, ParseContext, ParseResult, Rule};
use super::stmt;
use crate::js::ast::{
    JsBinaryOperator, JsExpression, JsFunction, JsInvocation, JsName, JsNameRef, JsNumber, JsObjectLiteral,
    JsParameter, JsPropertyInitializer, JsUnaryOperator,
};

pub(crate) fn parse_expression_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    match pair.as_rule() {
        Rule::expression => {
            let mut inner = rules::inner_pairs(&pair);
            let first = rules::fetch_next_pair(&mut inner, &pair, cx)?;
            let mut node = parse_expression_rule(first, cx)?;
            for next in inner {
                let right = parse_expression_rule(next, cx)?;
                node = JsExpression::binary(JsBinaryOperator::Comma, node, right);
            }
            Ok(node)
        }
        Rule::assignment_expr => parse_assignment_rule(pair, cx),
        Rule::conditional_expr => parse_conditional_rule(pair, cx),
        Rule::logical_or
        | Rule::logical_and
        | Rule::bit_or
        | Rule::bit_xor
        | Rule::bit_and
        | Rule::equality
        | Rule::relational
        | Rule::shift
        | Rule::additive
        | Rule::multiplicative => parse_binary_rule(pair, cx),
        Rule::unary => parse_unary_rule(pair, cx),
        Rule::postfix => parse_postfix_rule(pair, cx),
        Rule::lhs_expr => parse_lhs_rule(pair, cx),
        Rule::primary => {
            let mut inner = rules::inner_pairs(&pair);
            let next = rules::fetch_next_pair(&mut inner, &pair, cx)?;
            parse_primary_rule(next, cx)
        }
        other => Err(cx.error_at(pair.as_span().start_pos(), &format!("Unexpected expression type {:?}.", other))),
    }
}

fn parse_assignment_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut inner = rules::inner_pairs(&pair);
    let target_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let target = parse_expression_rule(target_pair.clone(), cx)?;
    let Some(op_pair) = inner.next() else {
        return Ok(target);
    };
    let op = match JsBinaryOperator::from_symbol(op_pair.as_str()) {
        Some(op) if op.is_assignment() => op,
        _ => return Err(cx.error_at(op_pair.as_span().start_pos(), "Invalid assignment operator.")),
    };
    if !target.is_reference() {
        return Err(cx.error_at(target_pair.as_span().start_pos(), "Invalid assignment left-hand side."));
    }
    let value_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let value = parse_expression_rule(value_pair, cx)?;
    Ok(JsExpression::binary(op, target, value))
}

fn parse_conditional_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut inner = rules::inner_pairs(&pair);
    let test_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let test = parse_expression_rule(test_pair, cx)?;
    let Some(then_pair) = inner.next() else {
        return Ok(test);
    };
    let then = parse_expression_rule(then_pair, cx)?;
    let otherwise_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let otherwise = parse_expression_rule(otherwise_pair, cx)?;
    Ok(JsExpression::Conditional {
        test: Box::new(test),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    })
}

/// All binary precedence levels share the `operand (op operand)*` shape and
/// fold to the left.
fn parse_binary_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut inner = rules::inner_pairs(&pair);
    let left_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let mut node = parse_expression_rule(left_pair, cx)?;

    while let Some(op_pair) = inner.next() {
        let op = match JsBinaryOperator::from_symbol(op_pair.as_str()) {
            Some(op) => op,
            None => {
                return Err(cx.error_at(
                    op_pair.as_span().start_pos(),
                    &format!("Invalid binary operator '{}'.", op_pair.as_str()),
                ));
            }
        };
        let right_pair = match inner.next() {
            Some(rp) => rp,
            None => {
                return Err(cx.error_at(
                    op_pair.as_span().start_pos(),
                    &format!("Missing right-hand operand for '{}'.", op.symbol()),
                ));
            }
        };
        let right = parse_expression_rule(right_pair, cx)?;
        node = JsExpression::binary(op, node, right);
    }

    Ok(node)
}

fn parse_unary_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut prefixes = Vec::new();
    let mut operand = None;
    for next in rules::inner_pairs(&pair) {
        match next.as_rule() {
            Rule::prefix_op => prefixes.push(next),
            _ => operand = Some(next),
        }
    }
    let operand_pair = match operand {
        Some(p) => p,
        None => return Err(cx.error_at(pair.as_span().start_pos(), "Missing operand for unary operator.")),
    };
    let mut node = parse_expression_rule(operand_pair, cx)?;

    // Prefix operators bind right to left.
    for op_pair in prefixes.into_iter().rev() {
        let op = match JsUnaryOperator::from_symbol(op_pair.as_str()) {
            Some(op) => op,
            None => return Err(cx.error_at(op_pair.as_span().start_pos(), "Invalid unary operator.")),
        };
        if op.is_modifying() && !node.is_reference() {
            return Err(cx.error_at(op_pair.as_span().start_pos(), "Invalid increment/decrement operand."));
        }
        node = JsExpression::Prefix { op, operand: Box::new(node) };
    }
    Ok(node)
}

fn parse_postfix_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut inner = rules::inner_pairs(&pair);
    let operand_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let node = parse_expression_rule(operand_pair, cx)?;
    let Some(op_pair) = inner.next() else {
        return Ok(node);
    };
    let op = match JsUnaryOperator::from_symbol(op_pair.as_str()) {
        Some(op) if op.is_modifying() => op,
        _ => return Err(cx.error_at(op_pair.as_span().start_pos(), "Invalid postfix operator.")),
    };
    if !node.is_reference() {
        return Err(cx.error_at(op_pair.as_span().start_pos(), "Invalid increment/decrement operand."));
    }
    Ok(JsExpression::Postfix { op, operand: Box::new(node) })
}

fn parse_lhs_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut inner = rules::inner_pairs(&pair);
    let head = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let mut node = match head.as_rule() {
        Rule::new_expr => parse_new_rule(head, cx)?,
        _ => parse_expression_rule(head, cx)?,
    };
    for suffix in inner {
        // call_suffix wraps exactly one of arguments/member/index.
        let mut suffix_inner = rules::inner_pairs(&suffix);
        let next = rules::fetch_next_pair(&mut suffix_inner, &suffix, cx)?;
        node = apply_suffix(node, next, cx)?;
    }
    Ok(node)
}

fn apply_suffix(node: JsExpression, suffix: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    match suffix.as_rule() {
        Rule::arguments => {
            let arguments = parse_arguments_rule(suffix, cx)?;
            Ok(JsInvocation::new(node, arguments).into())
        }
        Rule::member_suffix => {
            let mut inner = rules::inner_pairs(&suffix);
            let name_pair = rules::fetch_next_pair(&mut inner, &suffix, cx)?;
            Ok(JsNameRef::qualified(JsName::free(name_pair.as_str()), node).into())
        }
        Rule::index_suffix => {
            let mut inner = rules::inner_pairs(&suffix);
            let index_pair = rules::fetch_next_pair(&mut inner, &suffix, cx)?;
            let index = parse_expression_rule(index_pair, cx)?;
            Ok(JsExpression::Index { object: Box::new(node), index: Box::new(index) })
        }
        other => Err(cx.error_at(suffix.as_span().start_pos(), &format!("Unexpected suffix {:?}.", other))),
    }
}

fn parse_arguments_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<Vec<JsExpression>> {
    let mut arguments = Vec::new();
    for arg in rules::inner_pairs(&pair) {
        arguments.push(parse_expression_rule(arg, cx)?);
    }
    Ok(arguments)
}

fn parse_new_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut inner = rules::inner_pairs(&pair);
    let member_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;

    let mut member_inner = rules::inner_pairs(&member_pair);
    let primary_pair = rules::fetch_next_pair(&mut member_inner, &member_pair, cx)?;
    let mut constructor = parse_expression_rule(primary_pair, cx)?;
    for suffix in member_inner {
        constructor = apply_suffix(constructor, suffix, cx)?;
    }

    let arguments = match inner.next() {
        Some(args) => parse_arguments_rule(args, cx)?,
        None => Vec::new(),
    };
    Ok(JsExpression::New { constructor: Box::new(constructor), arguments })
}

fn parse_primary_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    match pair.as_rule() {
        Rule::function_expr => parse_function_expression_rule(pair, cx),
        Rule::this_lit => Ok(JsExpression::This),
        Rule::null_lit => Ok(JsExpression::Null),
        Rule::bool_lit => Ok(JsExpression::Boolean(pair.as_str() == "true")),
        Rule::number => parse_number_rule(pair, cx).map(JsExpression::Number),
        Rule::string => parse_string_rule(pair, cx).map(JsExpression::String),
        Rule::array_lit => {
            let mut elements = Vec::new();
            for element in rules::inner_pairs(&pair) {
                elements.push(parse_expression_rule(element, cx)?);
            }
            Ok(JsExpression::Array(elements))
        }
        Rule::object_lit => parse_object_rule(pair, cx),
        Rule::identifier => Ok(JsExpression::name_ref(&cx.resolve(pair.as_str()))),
        Rule::paren_expr => {
            let mut inner = rules::inner_pairs(&pair);
            let next = rules::fetch_next_pair(&mut inner, &pair, cx)?;
            parse_expression_rule(next, cx)
        }
        other => Err(cx.error_at(pair.as_span().start_pos(), &format!("Unexpected primary expression {:?}.", other))),
    }
}

fn parse_object_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut object = JsObjectLiteral::new();
    for property in rules::inner_pairs(&pair) {
        let mut inner = rules::inner_pairs(&property);
        let name_pair = rules::fetch_next_pair(&mut inner, &property, cx)?;
        let value_pair = rules::fetch_next_pair(&mut inner, &property, cx)?;

        let mut name_inner = rules::inner_pairs(&name_pair);
        let label_pair = rules::fetch_next_pair(&mut name_inner, &name_pair, cx)?;
        let label = match label_pair.as_rule() {
            Rule::identifier_name => JsName::free(label_pair.as_str()).make_ref().into(),
            Rule::string => JsExpression::String(parse_string_rule(label_pair, cx)?),
            _ => JsExpression::Number(parse_number_rule(label_pair, cx)?),
        };
        let value = parse_expression_rule(value_pair, cx)?;
        object.properties.push(JsPropertyInitializer::new(label, value));
    }
    Ok(JsExpression::Object(object))
}

/// Function expressions and declarations: parameters and body live in a
/// fresh scope nested in the current one.
pub(crate) fn parse_function_rule(
    pair: Pair<Rule>,
    name: Option<JsName>,
    cx: &mut ParseContext<'_>,
) -> ParseResult<JsFunction> {
    let description = match &name {
        Some(n) => format!("function {}", n),
        None => "function <anonymous>".to_string(),
    };
    let function_scope = cx.scope().inner(description);
    let mut function = JsFunction::new(function_scope.clone());
    function.name = name;

    cx.enter_function(function_scope.clone());
    let result = parse_function_parts(&pair, &mut function, cx);
    cx.leave_function();
    result?;
    Ok(function)
}

fn parse_function_parts(pair: &Pair<Rule>, function: &mut JsFunction, cx: &mut ParseContext<'_>) -> ParseResult<()> {
    for part in rules::inner_pairs(pair) {
        match part.as_rule() {
            Rule::params => {
                let parameters = rules::inner_pairs(&part)
                    .map(|p| JsParameter::new(function.scope().declare_name(p.as_str())))
                    .collect();
                function.set_parameters(parameters);
            }
            Rule::function_body => {
                let statements = stmt::parse_statement_list(part.into_inner(), cx)?;
                function.body_mut().statements_mut().extend(statements);
            }
            // The name was handled by the caller.
            _ => {}
        }
    }
    Ok(())
}

fn parse_function_expression_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let name = rules::inner_pairs(&pair).find(|p| p.as_rule() == Rule::identifier).map(|p| JsName::free(p.as_str()));
    let function = parse_function_rule(pair, name, cx)?;
    Ok(JsExpression::Function(function.into_ref()))
}

fn parse_number_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsNumber> {
    let text = pair.as_str();
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok().map(JsNumber::Int)
    } else if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().ok().map(JsNumber::Double)
    } else {
        match text.parse::<i64>() {
            Ok(value) => Some(JsNumber::Int(value)),
            Err(_) => text.parse::<f64>().ok().map(JsNumber::Double),
        }
    };
    match parsed {
        Some(number) => Ok(number),
        None => Err(cx.error_at(pair.as_span().start_pos(), &format!("Invalid number literal '{}'.", text))),
    }
}

fn parse_string_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<String> {
    let raw = pair.clone().into_inner().next().map(|p| p.as_str()).unwrap_or("");
    match unescape(raw) {
        Some(value) => Ok(value),
        None => Err(cx.error_at(pair.as_span().start_pos(), "Invalid escape sequence in string literal.")),
    }
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => out.push(hex_char(&mut chars, 2)?),
            'u' => out.push(hex_char(&mut chars, 4)?),
            // Line continuation.
            '\n' => {}
            other => out.push(other),
        }
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}
