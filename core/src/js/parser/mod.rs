//! file: core/src/js/parser/mod.rs
//! description: parser for JavaScript source embedded through `js("...")`.
//!
//! The source is parsed into target statements whose names resolve against
//! a caller supplied scope, so declared names are shared with the code the
//! statements are spliced into.

pub mod err;
pub mod reporter;

mod expr;
mod rules;
mod stmt;

use std::io::Read;

use log::trace;
use pest::Parser;

use crate::js::ast::JsStatement;
use crate::js::scope::JsScope;
use crate::location::Location;

pub use err::{JsParseError, JsSyntaxError};
pub use reporter::{CollectingReporter, ErrorReporter, FailingReporter, JsDiagnostic};

use rules::{JsGrammar, ParseContext, Rule};

/// Parse `reader` as a list of statements.
///
/// `info` names the source and the position it starts at; reported lines are
/// offset by it. Names declared with `var` go into `scope`. A `return` is
/// only accepted when `inside_function` is set.
pub fn parse<R: Read>(
    info: &Location,
    scope: &JsScope,
    mut reader: R,
    reporter: &mut dyn ErrorReporter,
    inside_function: bool,
) -> Result<Vec<JsStatement>, JsParseError> {
    let mut source = String::new();
    reader.read_to_string(&mut source).map_err(JsParseError::Io)?;
    trace!("parsing {} bytes of embedded js from {}", source.len(), info);

    let mut cx = ParseContext::new(info, &source, reporter, scope.clone(), inside_function);
    let mut pairs = match JsGrammar::parse(Rule::program, &source) {
        Ok(pairs) => pairs,
        Err(e) => return Err(cx.grammar_error(e)),
    };
    match pairs.next() {
        Some(program) => stmt::parse_program_rule(program, &mut cx),
        None => Ok(Vec::new()),
    }
}

/// Convenience wrapper over [`parse`] for in-memory source.
pub fn parse_str(
    info: &Location,
    scope: &JsScope,
    source: &str,
    reporter: &mut dyn ErrorReporter,
    inside_function: bool,
) -> Result<Vec<JsStatement>, JsParseError> {
    parse(info, scope, source.as_bytes(), reporter, inside_function)
}
