//! file: core/src/js/scope.rs
//! description: lexical scopes of the target program.
//!
//! A `JsScope` is a cheap shared handle; child scopes keep their parent
//! alive. Fresh names never collide with a name visible from the scope nor
//! with an identifier reserved by the runtime namer.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use lazy_static::lazy_static;

use super::ast::JsName;
use super::metadata::{INLINE_END_TAG, INLINE_START_TAG};

lazy_static! {
    static ref RESERVED_IDENTIFIERS: HashSet<&'static str> = {
        let mut set: HashSet<&'static str> = [
            "break", "case", "catch", "class", "const", "continue", "debugger", "default",
            "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
            "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
            "new", "null", "package", "private", "protected", "public", "return", "static",
            "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
            "while", "with", "yield", "arguments", "eval", "undefined", "Infinity", "NaN",
        ]
        .into_iter()
        .collect();
        set.insert(INLINE_START_TAG);
        set.insert(INLINE_END_TAG);
        set
    };
}

/// True for JavaScript keywords and the identifiers the inliner relies on.
pub fn is_reserved_identifier(ident: &str) -> bool {
    RESERVED_IDENTIFIERS.contains(ident)
}

#[derive(Debug)]
struct ScopeData {
    description: String,
    parent: Option<JsScope>,
    names: HashMap<String, JsName>,
}

#[derive(Debug, Clone)]
pub struct JsScope(Rc<RefCell<ScopeData>>);

impl JsScope {
    pub fn root(description: impl Into<String>) -> Self {
        JsScope(Rc::new(RefCell::new(ScopeData {
            description: description.into(),
            parent: None,
            names: HashMap::new(),
        })))
    }

    pub fn inner(&self, description: impl Into<String>) -> Self {
        JsScope(Rc::new(RefCell::new(ScopeData {
            description: description.into(),
            parent: Some(self.clone()),
            names: HashMap::new(),
        })))
    }

    pub fn description(&self) -> String {
        self.0.borrow().description.clone()
    }

    pub fn parent(&self) -> Option<JsScope> {
        self.0.borrow().parent.clone()
    }

    /// Declare `ident` in this scope; an existing declaration is returned as is.
    pub fn declare_name(&self, ident: &str) -> JsName {
        let mut data = self.0.borrow_mut();
        data.names.entry(ident.to_string()).or_insert_with(|| JsName::free(ident)).clone()
    }

    /// Declare a name based on `suggested` that is unique in the scope chain.
    pub fn declare_fresh_name(&self, suggested: &str) -> JsName {
        let mut candidate = suggested.to_string();
        let mut counter = 0usize;
        while is_reserved_identifier(&candidate) || self.find_name(&candidate).is_some() {
            counter += 1;
            candidate = format!("{}${}", suggested, counter);
        }
        self.declare_name(&candidate)
    }

    pub fn has_own_name(&self, ident: &str) -> bool {
        self.0.borrow().names.contains_key(ident)
    }

    /// Resolve `ident` in this scope or any enclosing one.
    pub fn find_name(&self, ident: &str) -> Option<JsName> {
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            if let Some(name) = scope.0.borrow().names.get(ident) {
                return Some(name.clone());
            }
            current = scope.parent();
        }
        None
    }

    pub fn same_scope(&self, other: &JsScope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Scopes compare by identity.
impl PartialEq for JsScope {
    fn eq(&self, other: &Self) -> bool {
        self.same_scope(other)
    }
}
