use pest::Position;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use super::err::JsParseError;
use super::reporter::ErrorReporter;
use crate::js::ast::JsName;
use crate::js::scope::JsScope;
use crate::location::Location;

#[derive(Parser)]
#[grammar = "js/parser/js.pest"]
pub struct JsGrammar;

pub(crate) type ParseResult<T> = Result<T, JsParseError>;

/// Keyword tokens carry no information past the grammar.
fn is_keyword(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_var
            | Rule::kw_function
            | Rule::kw_return
            | Rule::kw_if
            | Rule::kw_else
            | Rule::kw_while
            | Rule::kw_do
            | Rule::kw_for
            | Rule::kw_in
            | Rule::kw_throw
            | Rule::kw_break
            | Rule::kw_continue
            | Rule::kw_new
            | Rule::EOI
    )
}

pub(crate) fn significant_pairs<'i>(pairs: Pairs<'i, Rule>) -> impl Iterator<Item = Pair<'i, Rule>> + use<'i> {
    pairs.filter(|p| !is_keyword(p.as_rule()))
}

pub(crate) fn inner_pairs<'i>(pair: &Pair<'i, Rule>) -> impl Iterator<Item = Pair<'i, Rule>> + use<'i> {
    significant_pairs(pair.clone().into_inner())
}

pub(crate) fn fetch_next_pair<'i, I>(pairs: &mut I, parent: &Pair<'i, Rule>, cx: &mut ParseContext<'_>) -> ParseResult<Pair<'i, Rule>>
where
    I: Iterator<Item = Pair<'i, Rule>>,
{
    match pairs.next() {
        Some(pair) => Ok(pair),
        None => Err(cx.error_at(
            parent.as_span().start_pos(),
            &format!("Expected more inner pairs in {:?} but found none.", parent.as_rule()),
        )),
    }
}

/// Parser state threaded through the rule walkers: the diagnostic sink, the
/// scope names resolve against and whether a `return` is legal.
pub(crate) struct ParseContext<'a> {
    info: &'a Location,
    source: &'a str,
    reporter: &'a mut dyn ErrorReporter,
    scope: JsScope,
    outer_scopes: Vec<JsScope>,
    function_depth: usize,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(
        info: &'a Location,
        source: &'a str,
        reporter: &'a mut dyn ErrorReporter,
        scope: JsScope,
        inside_function: bool,
    ) -> Self {
        ParseContext {
            info,
            source,
            reporter,
            scope,
            outer_scopes: Vec::new(),
            function_depth: usize::from(inside_function),
        }
    }

    pub(crate) fn scope(&self) -> &JsScope {
        &self.scope
    }

    pub(crate) fn inside_function(&self) -> bool {
        self.function_depth > 0
    }

    pub(crate) fn enter_function(&mut self, scope: JsScope) {
        let outer = std::mem::replace(&mut self.scope, scope);
        self.outer_scopes.push(outer);
        self.function_depth += 1;
    }

    pub(crate) fn leave_function(&mut self) {
        if let Some(outer) = self.outer_scopes.pop() {
            self.scope = outer;
            self.function_depth -= 1;
        }
    }

    /// Declared names are shared; anything else is a free reference.
    pub(crate) fn resolve(&self, ident: &str) -> JsName {
        self.scope.find_name(ident).unwrap_or_else(|| JsName::free(ident))
    }

    /// Whether a statement ending at byte `offset` may omit its `;`: only a
    /// line break, a `}` or the end of the source may follow it. A block
    /// comment spanning lines counts as a line break.
    pub(crate) fn allows_implicit_terminator(&self, offset: usize) -> bool {
        let mut rest = self.source.get(offset..).unwrap_or("");
        loop {
            rest = rest.trim_start_matches([' ', '\t', '\u{A0}', '\u{FEFF}']);
            let Some(comment) = rest.strip_prefix("/*") else {
                return rest.is_empty() || rest.starts_with(['\n', '\r', '}']) || rest.starts_with("//");
            };
            let Some(close) = comment.find("*/") else {
                return false;
            };
            if comment[..close].contains(['\n', '\r']) {
                return true;
            }
            rest = &comment[close + 2..];
        }
    }

    /// Line numbers are reported relative to where the source was embedded.
    fn absolute_line(&self, line: usize) -> usize {
        self.info.line + line.saturating_sub(1)
    }

    pub(crate) fn error_at(&mut self, pos: Position<'_>, message: &str) -> JsParseError {
        let (line, column) = pos.line_col();
        let line_source = pos.line_of().trim_end_matches(['\r', '\n']).to_string();
        self.report_error(message, line, &line_source, column)
    }

    pub(crate) fn warning_at(&mut self, pos: Position<'_>, message: &str) {
        let (line, column) = pos.line_col();
        let line_source = pos.line_of().trim_end_matches(['\r', '\n']).to_string();
        let line = self.absolute_line(line);
        self.reporter.warning(message, &self.info.file, line, &line_source, column - 1);
    }

    pub(crate) fn grammar_error(&mut self, error: pest::error::Error<Rule>) -> JsParseError {
        let (line, column) = match error.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        let message = error.variant.message().to_string();
        let line_source = error.line().to_string();
        self.report_error(&message, line, &line_source, column)
    }

    fn report_error(&mut self, message: &str, line: usize, line_source: &str, column: usize) -> JsParseError {
        let line = self.absolute_line(line);
        self.reporter.error(message, &self.info.file, line, line_source, column - 1)
    }
}
