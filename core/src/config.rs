//! file: core/src/config.rs
//! description: translation configuration.
//!
//! A `TranslationConfig` is usually embedded in a translation unit but can
//! also be loaded on its own from a JSON file. Every field has a default, so
//! `{}` is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcmaVersion {
    Ecma3,
    #[default]
    Ecma5,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub module_name: String,
    /// Mark calls to inline callees for the inliner.
    pub inline_enabled: bool,
    pub ecma_version: EcmaVersion,
    /// Property descriptors also carry `enumerable: true`.
    pub enumerable_descriptors: bool,
    /// Source name used when reporting errors in `js(...)` code.
    pub js_code_source_name: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            module_name: "main".to_string(),
            inline_enabled: true,
            ecma_version: EcmaVersion::Ecma5,
            enumerable_descriptors: false,
            js_code_source_name: "<js-code>".to_string(),
        }
    }
}

impl TranslationConfig {
    /// Load a configuration from a JSON file path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<TranslationConfig, String> {
        let raw = std::fs::read_to_string(&path).map_err(|e| format!("read config: {}", e))?;
        serde_json::from_str(&raw).map_err(|e| format!("parse config: {}", e))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.module_name.trim().is_empty() {
            return Err("module name is empty".to_string());
        }
        if self.js_code_source_name.trim().is_empty() {
            return Err("js code source name is empty".to_string());
        }
        Ok(())
    }

    pub fn without_inlining(mut self) -> Self {
        self.inline_enabled = false;
        self
    }
}
