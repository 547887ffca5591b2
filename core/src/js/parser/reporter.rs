//! file: core/src/js/parser/reporter.rs
//! description: diagnostic sinks for the embedded JavaScript parser.

use log::debug;

use super::err::{JsParseError, JsSyntaxError};
use crate::error::Level;
use crate::location::Location;

/// Receives diagnostics while parsing. `error` decides how parsing ends:
/// the returned value is what `parse` fails with.
pub trait ErrorReporter {
    fn warning(&mut self, message: &str, source_name: &str, line: usize, line_source: &str, line_offset: usize);

    fn error(
        &mut self,
        message: &str,
        source_name: &str,
        line: usize,
        line_source: &str,
        line_offset: usize,
    ) -> JsParseError;
}

/// Turns every error into a fatal `JsParseError::Syntax`; warnings are dropped.
#[derive(Debug, Default)]
pub struct FailingReporter;

impl ErrorReporter for FailingReporter {
    fn warning(&mut self, message: &str, source_name: &str, line: usize, _line_source: &str, _line_offset: usize) {
        debug!("ignoring js warning at {}:{}: {}", source_name, line, message);
    }

    fn error(
        &mut self,
        message: &str,
        source_name: &str,
        line: usize,
        line_source: &str,
        line_offset: usize,
    ) -> JsParseError {
        JsParseError::Syntax(JsSyntaxError::with(
            Level::Error,
            message.to_string(),
            "lowerjs.js.parser".into(),
            Some(Location::new(source_name, line, line_offset + 1)),
            line_source.to_string(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsDiagnostic {
    pub level: Level,
    pub message: String,
    pub location: Location,
    pub line_source: String,
}

/// Records diagnostics and aborts on the first error, for callers that
/// report problems themselves (e.g. a frontend checking `js(...)` arguments).
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Vec<JsDiagnostic>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[JsDiagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level >= Level::Error)
    }

    fn record(&mut self, level: Level, message: &str, source_name: &str, line: usize, line_source: &str, line_offset: usize) {
        self.diagnostics.push(JsDiagnostic {
            level,
            message: message.to_string(),
            location: Location::new(source_name, line, line_offset + 1),
            line_source: line_source.to_string(),
        });
    }
}

impl ErrorReporter for CollectingReporter {
    fn warning(&mut self, message: &str, source_name: &str, line: usize, line_source: &str, line_offset: usize) {
        self.record(Level::Warning, message, source_name, line, line_source, line_offset);
    }

    fn error(
        &mut self,
        message: &str,
        source_name: &str,
        line: usize,
        line_source: &str,
        line_offset: usize,
    ) -> JsParseError {
        self.record(Level::Error, message, source_name, line, line_source, line_offset);
        JsParseError::Aborted
    }
}
