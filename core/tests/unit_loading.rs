use std::io::Write;

use lowerjs_core::js::ast::JsExpression;
use lowerjs_core::js::metadata::{self, InlineStrategy};
use lowerjs_core::{Level, LowerErrorExt, TranslationConfig, TranslationUnit, lower_translation_unit};
use tempfile::NamedTempFile;

const TWICE_UNIT: &str = r#"{
    "model": {
        "descriptors": {
            "1": { "kind": "function", "name": "twice", "inline_kind": "inline",
                   "value_parameters": [2], "return_type": { "fq_name": "kotlin.Unit" } },
            "2": { "kind": "value_parameter", "name": "block",
                   "type": { "fq_name": "kotlin.Function0", "kind": "function" },
                   "containing_declaration": 1 },
            "3": { "kind": "function", "name": "invoke", "fq_name": "kotlin.Function0.invoke" }
        },
        "declarations": { "10": 1 },
        "resolved_calls": { "11": { "kind": "variable_as_function", "variable": 2, "invoke": 3 } }
    },
    "declarations": [
        { "id": 10, "name": "twice",
          "body": { "block": [ { "kind": "call", "id": 11 }, { "kind": "call", "id": 11 } ] } }
    ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().prefix("unit").suffix(".json").tempfile().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn unit_loads_and_lowers_with_inline_markers() {
    let file = write_temp(TWICE_UNIT);
    let unit = TranslationUnit::load_from_file(file.path()).expect("unit should load");
    assert!(!unit.is_empty());
    // Without a name in the file the stem is used.
    assert!(unit.name.starts_with("unit"), "{}", unit.name);
    assert_eq!(unit.effective_config(), TranslationConfig::default());

    let module = lower_translation_unit(&unit, unit.effective_config()).expect("unit should lower");
    assert_eq!(module.properties.len(), 1);
    let function = match module.get("twice") {
        Some(JsExpression::Function(function)) => function.clone(),
        other => panic!("expected twice to be a function, got {:?}", other),
    };
    let function = function.borrow();
    assert_eq!(metadata::inline_strategy(&function.parameters()[0]), Some(InlineStrategy::InPlace));

    let statements = function.body().statements();
    assert_eq!(statements.len(), 4);
    assert!(metadata::is_inline_start_tag(statements[0].as_invocation().unwrap()));
    for call in &statements[1..3] {
        let call = call.as_invocation().unwrap();
        assert_eq!(call.callee_name(), Some("block"));
        assert_eq!(metadata::inline_strategy(call), Some(InlineStrategy::InPlace));
    }
    assert!(metadata::is_inline_end_tag(statements[3].as_invocation().unwrap()));
}

#[test]
fn lowered_module_serializes_to_json() {
    let file = write_temp(TWICE_UNIT);
    let unit = TranslationUnit::load_from_file(file.path()).unwrap();
    let module = lower_translation_unit(&unit, unit.effective_config().without_inlining()).unwrap();
    let json = serde_json::to_string(&module).unwrap();
    assert!(json.contains("\"$inline$start$\""), "{}", json);
    assert!(json.contains("[\"inline-strategy\",\"in-place\"]"), "{}", json);
}

#[test]
fn embedded_config_overrides_defaults() {
    let unit = TWICE_UNIT.replacen('{', r#"{ "name": "sample", "config": { "ecma_version": "ecma3", "inline_enabled": false },"#, 1);
    let file = write_temp(&unit);
    let unit = TranslationUnit::load_from_file(file.path()).unwrap();
    assert_eq!(unit.name, "sample");
    let config = unit.effective_config();
    assert!(!config.inline_enabled);
    assert_eq!(config.ecma_version, lowerjs_core::EcmaVersion::Ecma3);
    assert_eq!(config.module_name, "main");
}

#[test]
fn broken_references_are_rejected_on_load() {
    let broken = TWICE_UNIT.replace("\"containing_declaration\": 1", "\"containing_declaration\": 3000");
    let file = write_temp(&broken);
    let err = TranslationUnit::load_from_file(file.path()).unwrap_err();
    assert_eq!(err.level(), Level::Error);
    assert!(err.message().contains("not contained in a function"), "{}", err.message());
}

#[test]
fn malformed_and_missing_files_are_errors() {
    let file = write_temp("{ \"declarations\": 3 }");
    let err = TranslationUnit::load_from_file(file.path()).unwrap_err();
    assert!(err.message().contains("parse unit"), "{}", err.message());
    assert_eq!(err.issuer(), "lowerjs.unit");

    let err = TranslationUnit::load_from_file("/definitely/not/here.json").unwrap_err();
    assert!(err.message().contains("read unit"), "{}", err.message());
}

#[test]
fn invalid_config_stops_lowering() {
    let file = write_temp(TWICE_UNIT);
    let unit = TranslationUnit::load_from_file(file.path()).unwrap();
    let config = TranslationConfig { module_name: " ".into(), ..TranslationConfig::default() };
    let err = lower_translation_unit(&unit, config).unwrap_err();
    assert!(err.message().contains("module name is empty"), "{}", err.message());
}

#[test]
fn config_files_load_with_defaults() {
    let file = write_temp(r#"{ "enumerable_descriptors": true }"#);
    let config = TranslationConfig::load_from_file(file.path()).unwrap();
    assert!(config.enumerable_descriptors);
    assert!(config.inline_enabled);
    assert!(config.validate().is_ok());

    let file = write_temp(r#"{ "js_code_source_name": "" }"#);
    let config = TranslationConfig::load_from_file(file.path()).unwrap();
    assert!(config.validate().is_err());

    let file = write_temp("not json");
    let err = TranslationConfig::load_from_file(file.path()).unwrap_err();
    assert!(err.starts_with("parse config:"), "{}", err);
}
