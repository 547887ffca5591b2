//! file: core/src/unit.rs
//! description: translation units loaded from JSON.
//!
//! A unit bundles the function declarations to lower with the semantic
//! model they were resolved against and an optional configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::TranslationConfig;
use crate::error::{Level, LowerErrorExt};
use crate::semantic::SemanticModel;
use crate::syntax::FunctionDeclaration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationUnit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: Option<TranslationConfig>,
    #[serde(default)]
    pub model: SemanticModel,
    #[serde(default)]
    pub declarations: Vec<FunctionDeclaration>,
}

impl TranslationUnit {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn LowerErrorExt>> {
        let path = path.as_ref();
        let fail = |reason: String| -> Box<dyn LowerErrorExt> {
            Box::new(UnitLoadError { path: path.to_path_buf(), reason })
        };
        let raw = std::fs::read_to_string(path).map_err(|e| fail(format!("read unit: {}", e)))?;
        let mut unit: TranslationUnit = serde_json::from_str(&raw).map_err(|e| fail(format!("parse unit: {}", e)))?;
        if unit.name.is_empty() {
            unit.name = path.file_stem().unwrap_or_default().to_string_lossy().to_string();
        }
        unit.model.validate().map_err(fail)?;
        if let Some(config) = &unit.config {
            config.validate().map_err(fail)?;
        }
        Ok(unit)
    }

    /// The unit's own configuration, or the defaults.
    pub fn effective_config(&self) -> TranslationConfig {
        self.config.clone().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct UnitLoadError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for UnitLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot load translation unit {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for UnitLoadError {}

impl LowerErrorExt for UnitLoadError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "lowerjs.unit".to_string()
    }

    fn span(&self) -> Option<crate::location::Span> {
        None
    }

    fn location(&self) -> Option<crate::location::Location> {
        None
    }
}
