use pest::Position;
use pest::iterators::{Pair, Pairs};

use super::expr;
use super::rules::{self, ParseContext, ParseResult, Rule};
use crate::js::ast::{JsBlock, JsExpression, JsStatement, JsVar};

pub(crate) fn parse_program_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<Vec<JsStatement>> {
    parse_statement_list(pair.into_inner(), cx)
}

pub(crate) fn parse_statement_list(pairs: Pairs<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<Vec<JsStatement>> {
    let mut statements = Vec::new();
    for stmt_pair in rules::significant_pairs(pairs) {
        statements.push(parse_statement_rule(stmt_pair, cx)?);
    }
    Ok(statements)
}

fn parse_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    let mut inner = rules::inner_pairs(&pair);
    let next = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    match next.as_rule() {
        Rule::block => Ok(JsStatement::Block(JsBlock::new(parse_statement_list(next.into_inner(), cx)?))),
        Rule::empty_stmt => Ok(JsStatement::Empty),
        Rule::var_stmt => parse_var_statement_rule(next, cx),
        Rule::function_stmt => parse_function_statement_rule(next, cx),
        Rule::if_stmt => parse_if_statement_rule(next, cx),
        Rule::while_stmt => parse_while_statement_rule(next, cx),
        Rule::do_while_stmt => parse_do_while_statement_rule(next, cx),
        Rule::for_stmt => parse_for_statement_rule(next, cx),
        Rule::for_in_stmt => parse_for_in_statement_rule(next, cx),
        Rule::return_stmt => parse_return_statement_rule(next, cx),
        Rule::throw_stmt => {
            check_terminator(&next, cx)?;
            let value_pair = match line_value(&next) {
                Some(value_pair) => value_pair,
                None => return Err(cx.error_at(next.as_span().start_pos(), "Missing value of throw statement.")),
            };
            Ok(JsStatement::Throw(expr::parse_expression_rule(value_pair, cx)?))
        }
        Rule::break_stmt => {
            check_terminator(&next, cx)?;
            Ok(JsStatement::Break)
        }
        Rule::continue_stmt => {
            check_terminator(&next, cx)?;
            Ok(JsStatement::Continue)
        }
        Rule::expression_stmt => {
            check_terminator(&next, cx)?;
            let mut inner = rules::inner_pairs(&next);
            let expression_pair = rules::fetch_next_pair(&mut inner, &next, cx)?;
            Ok(JsStatement::Expression(expr::parse_expression_rule(expression_pair, cx)?))
        }
        other => Err(cx.error_at(next.as_span().start_pos(), &format!("Unexpected statement type {:?}.", other))),
    }
}

/// Automatic semicolon insertion is accepted, and reported, only before a
/// line break, a `}` or the end of the source.
fn check_terminator(pair: &Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<()> {
    if is_terminated(pair) {
        return Ok(());
    }
    let end = last_token_end(pair);
    if !cx.allows_implicit_terminator(end.pos()) {
        return Err(cx.error_at(end, "missing ; before statement"));
    }
    cx.warning_at(end, "missing ; after statement");
    Ok(())
}

fn is_terminated(pair: &Pair<Rule>) -> bool {
    pair.clone().into_inner().any(|p| p.as_rule() == Rule::terminator)
}

/// Rules whose span stops at their last token. Other rules end with an
/// optional part and so also cover the whitespace skipped before it.
fn ends_on_token(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::identifier
            | Rule::identifier_name
            | Rule::number
            | Rule::string
            | Rule::this_lit
            | Rule::null_lit
            | Rule::bool_lit
            | Rule::postfix_op
            | Rule::kw_return
            | Rule::kw_break
            | Rule::kw_continue
            | Rule::primary
            | Rule::arguments
            | Rule::member_suffix
            | Rule::index_suffix
    )
}

fn last_token_end<'i>(pair: &Pair<'i, Rule>) -> Position<'i> {
    pair.clone()
        .into_inner()
        .flatten()
        .filter(|p| ends_on_token(p.as_rule()))
        .map(|p| p.as_span().end_pos())
        .max_by_key(|p| p.pos())
        .unwrap_or_else(|| pair.as_span().end_pos())
}

/// The expression of a `return` or `throw`, present only when it starts on
/// the keyword's line.
fn line_value<'i>(pair: &Pair<'i, Rule>) -> Option<Pair<'i, Rule>> {
    let head = pair.clone().into_inner().find(|p| matches!(p.as_rule(), Rule::return_head | Rule::throw_head))?;
    let value = head.into_inner().find(|p| p.as_rule() == Rule::line_value)?;
    value.into_inner().next()
}

fn parse_var_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    check_terminator(&pair, cx)?;
    let mut inner = rules::inner_pairs(&pair);
    let list_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    Ok(JsStatement::Vars(parse_var_list_rule(list_pair, cx)?))
}

fn parse_var_list_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<Vec<JsVar>> {
    let mut vars = Vec::new();
    for decl in rules::inner_pairs(&pair) {
        let mut inner = rules::inner_pairs(&decl);
        let name_pair = rules::fetch_next_pair(&mut inner, &decl, cx)?;
        let name = cx.scope().declare_name(name_pair.as_str());
        let initializer = match inner.next() {
            Some(init) => Some(expr::parse_expression_rule(init, cx)?),
            None => None,
        };
        vars.push(JsVar { name, initializer });
    }
    Ok(vars)
}

fn parse_function_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    let mut inner = rules::inner_pairs(&pair);
    let name_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let name = cx.scope().declare_name(name_pair.as_str());
    let function = expr::parse_function_rule(pair, Some(name), cx)?;
    Ok(JsStatement::Expression(JsExpression::Function(function.into_ref())))
}

fn parse_if_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    let mut inner = rules::inner_pairs(&pair);
    let test_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let then_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;

    let test = expr::parse_expression_rule(test_pair, cx)?;
    let then = parse_statement_rule(then_pair, cx)?;
    let otherwise = match inner.next() {
        Some(else_pair) => Some(Box::new(parse_statement_rule(else_pair, cx)?)),
        None => None,
    };
    Ok(JsStatement::If { test, then: Box::new(then), otherwise })
}

fn parse_while_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    let mut inner = rules::inner_pairs(&pair);
    let test_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let body_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;

    let test = expr::parse_expression_rule(test_pair, cx)?;
    let body = parse_statement_rule(body_pair, cx)?;
    Ok(JsStatement::While { test, body: Box::new(body) })
}

fn parse_do_while_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    // The closing `)` always allows an implicit `;`.
    if !is_terminated(&pair) {
        cx.warning_at(pair.as_span().start_pos(), "missing ; after statement");
    }
    let mut inner = rules::inner_pairs(&pair);
    let body_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let test_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;

    let body = parse_statement_rule(body_pair, cx)?;
    let test = expr::parse_expression_rule(test_pair, cx)?;
    Ok(JsStatement::DoWhile { body: Box::new(body), test })
}

fn parse_for_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    let mut init = None;
    let mut test = None;
    let mut update = None;
    let mut body = None;

    for part in rules::inner_pairs(&pair) {
        match part.as_rule() {
            Rule::for_init => {
                let mut inner = rules::inner_pairs(&part);
                let init_pair = rules::fetch_next_pair(&mut inner, &part, cx)?;
                let statement = match init_pair.as_rule() {
                    Rule::var_list => JsStatement::Vars(parse_var_list_rule(init_pair, cx)?),
                    _ => JsStatement::Expression(expr::parse_expression_rule(init_pair, cx)?),
                };
                init = Some(Box::new(statement));
            }
            Rule::for_test => test = Some(parse_wrapped_expression(part, cx)?),
            Rule::for_update => update = Some(parse_wrapped_expression(part, cx)?),
            Rule::statement => body = Some(parse_statement_rule(part, cx)?),
            _ => {}
        }
    }

    match body {
        Some(body) => Ok(JsStatement::For { init, test, update, body: Box::new(body) }),
        None => Err(cx.error_at(pair.as_span().start_pos(), "Missing body of for statement.")),
    }
}

fn parse_wrapped_expression(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsExpression> {
    let mut inner = rules::inner_pairs(&pair);
    let expression_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    expr::parse_expression_rule(expression_pair, cx)
}

fn parse_for_in_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    let mut inner = rules::inner_pairs(&pair);
    let variable_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let object_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;
    let body_pair = rules::fetch_next_pair(&mut inner, &pair, cx)?;

    let (variable, declared) = match variable_pair.as_rule() {
        Rule::for_in_var => {
            let ident = variable_pair.clone().into_inner().find(|p| p.as_rule() == Rule::identifier);
            match ident {
                Some(ident) => (cx.scope().declare_name(ident.as_str()), true),
                None => return Err(cx.error_at(variable_pair.as_span().start_pos(), "Missing for-in variable.")),
            }
        }
        _ => (cx.resolve(variable_pair.as_str()), false),
    };
    let object = expr::parse_expression_rule(object_pair, cx)?;
    let body = parse_statement_rule(body_pair, cx)?;
    Ok(JsStatement::ForIn { variable, declared, object, body: Box::new(body) })
}

fn parse_return_statement_rule(pair: Pair<Rule>, cx: &mut ParseContext<'_>) -> ParseResult<JsStatement> {
    if !cx.inside_function() {
        return Err(cx.error_at(pair.as_span().start_pos(), "invalid return"));
    }
    check_terminator(&pair, cx)?;
    let value = match line_value(&pair) {
        Some(value_pair) => Some(expr::parse_expression_rule(value_pair, cx)?),
        None => None,
    };
    Ok(JsStatement::Return(value))
}
