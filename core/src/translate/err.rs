use crate::error::{Level, LowerErrorExt};
use crate::js::parser::JsSyntaxError;
use crate::location::{Location, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationErrorKind {
    /// The function object already has parameters installed.
    FunctionLoweredTwice,
    /// The argument of `js(...)` has no compile-time string value.
    NonStringJsCode,
    /// `js(...)` called with something other than one string template.
    MalformedJsCall,
    /// An abstract function declares a body.
    UnexpectedBody,
    /// A non-abstract function declares no body.
    MissingBody,
    MissingDescriptor,
    MissingResolvedCall,
    /// The embedded JavaScript failed to parse.
    EmbeddedSource,
    Io,
    Unsupported,
}

impl TranslationErrorKind {
    /// Everything except embedded-source failures is a broken caller or
    /// frontend invariant.
    pub fn level(&self) -> Level {
        match self {
            TranslationErrorKind::EmbeddedSource | TranslationErrorKind::Io | TranslationErrorKind::Unsupported => {
                Level::Error
            }
            _ => Level::Critical,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranslationError {
    kind: TranslationErrorKind,
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl TranslationError {
    pub fn new(kind: TranslationErrorKind, message: impl Into<String>, issuer: &str) -> Self {
        TranslationError {
            kind,
            level: kind.level(),
            message: message.into(),
            issuer: issuer.to_string(),
            location: None,
        }
    }

    pub fn kind(&self) -> TranslationErrorKind {
        self.kind
    }

    /// Wrap a parser failure reported while lowering `js(...)`.
    pub fn embedded_source(error: JsSyntaxError) -> Self {
        TranslationError {
            kind: TranslationErrorKind::EmbeddedSource,
            level: Level::Error,
            message: format!("Encountered js error in backend: {}", error.message()),
            issuer: "lowerjs.translate.call.js_code".into(),
            location: error.location(),
        }
    }
}

impl std::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TranslationError {}

impl LowerErrorExt for TranslationError {
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

impl From<TranslationError> for Box<dyn LowerErrorExt> {
    fn from(error: TranslationError) -> Self {
        Box::new(error)
    }
}

pub type TranslationResult<T> = Result<T, TranslationError>;
