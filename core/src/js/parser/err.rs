use crate::error::{Level, LowerErrorExt};
use crate::location::{Location, Span};

/// A syntax or semantic error found in embedded JavaScript source.
#[derive(Debug, Clone)]
pub struct JsSyntaxError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    line_source: String,
}

impl JsSyntaxError {
    pub fn with(level: Level, message: String, issuer: String, location: Option<Location>, line_source: String) -> Self {
        JsSyntaxError { level, message, issuer, location, line_source }
    }

    /// Text of the offending source line.
    pub fn line_source(&self) -> &str {
        &self.line_source
    }
}

impl std::fmt::Display for JsSyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {})", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for JsSyntaxError {}

impl LowerErrorExt for JsSyntaxError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

/// Why `parse` returned no statements.
#[derive(Debug)]
pub enum JsParseError {
    /// The source was already diagnosed by the reporter; the caller should
    /// carry on as if it were empty.
    Aborted,
    Syntax(JsSyntaxError),
    Io(std::io::Error),
}

impl std::fmt::Display for JsParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsParseError::Aborted => write!(f, "parsing aborted"),
            JsParseError::Syntax(e) => write!(f, "{}", e),
            JsParseError::Io(e) => write!(f, "failed to read JavaScript source: {}", e),
        }
    }
}

impl std::error::Error for JsParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JsParseError::Syntax(e) => Some(e),
            JsParseError::Io(e) => Some(e),
            JsParseError::Aborted => None,
        }
    }
}
