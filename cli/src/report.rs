//! Tabular summaries of lowered modules and parsed JavaScript.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use lowerjs_core::js::ast::{JsExpression, JsObjectLiteral, JsParameter, JsStatement};
use lowerjs_core::js::metadata;
use lowerjs_core::js::parser::JsDiagnostic;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic).set_header(header);
    table
}

fn describe_parameter(parameter: &JsParameter) -> String {
    let mut flags = Vec::new();
    if let Some(strategy) = metadata::inline_strategy(parameter) {
        flags.push(if strategy.is_inline() { "in-place" } else { "not-inline" });
    }
    if metadata::has_default_value(parameter) {
        flags.push("default");
    }
    if flags.is_empty() {
        parameter.name().ident().to_string()
    } else {
        format!("{} [{}]", parameter.name().ident(), flags.join(", "))
    }
}

fn join_refs(refs: Option<&[lowerjs_core::js::ast::JsNameRef]>) -> String {
    match refs {
        Some(refs) if !refs.is_empty() => refs.iter().map(|r| r.ident()).collect::<Vec<_>>().join(", "),
        Some(_) => "-".to_string(),
        None => String::new(),
    }
}

/// One row per lowered function: parameters with their metadata, the
/// argument partition carried by the start tag and the body size.
pub fn function_table(module: &JsObjectLiteral) -> Table {
    let mut table = new_table(vec!["Function", "Parameters", "Inline args", "Noinline args", "Statements"]);
    for property in &module.properties {
        let label = property.label_text().unwrap_or("?").to_string();
        let function = match &property.value {
            JsExpression::Function(function) => function.clone(),
            JsExpression::Object(descriptor) => match descriptor.get("value") {
                Some(JsExpression::Function(function)) => function.clone(),
                _ => continue,
            },
            _ => continue,
        };
        let function = function.borrow();
        let parameters = function.parameters().iter().map(describe_parameter).collect::<Vec<_>>().join(", ");
        let start_tag = function
            .body()
            .statements()
            .first()
            .and_then(JsStatement::as_invocation)
            .filter(|invocation| metadata::is_inline_start_tag(invocation));
        let (inline_args, noinline_args) = match start_tag {
            Some(tag) => (join_refs(metadata::inline_args(tag)), join_refs(metadata::noinline_args(tag))),
            None => (String::new(), String::new()),
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(parameters),
            Cell::new(inline_args),
            Cell::new(noinline_args),
            Cell::new(function.body().len()),
        ]);
    }
    table
}

pub fn diagnostics_table(diagnostics: &[JsDiagnostic]) -> Table {
    let mut table = new_table(vec!["Level", "Location", "Message", "Source"]);
    for diagnostic in diagnostics {
        table.add_row(vec![
            Cell::new(diagnostic.level),
            Cell::new(&diagnostic.location),
            Cell::new(&diagnostic.message),
            Cell::new(diagnostic.line_source.trim()),
        ]);
    }
    table
}

fn statement_kind(statement: &JsStatement) -> &'static str {
    match statement {
        JsStatement::Expression(JsExpression::Function(_)) => "function",
        JsStatement::Expression(_) => "expression",
        JsStatement::Return(_) => "return",
        JsStatement::Vars(_) => "var",
        JsStatement::If { .. } => "if",
        JsStatement::While { .. } => "while",
        JsStatement::DoWhile { .. } => "do-while",
        JsStatement::For { .. } => "for",
        JsStatement::ForIn { .. } => "for-in",
        JsStatement::Block(_) => "block",
        JsStatement::Throw(_) => "throw",
        JsStatement::Break => "break",
        JsStatement::Continue => "continue",
        JsStatement::Empty => "empty",
    }
}

pub fn statements_table(statements: &[JsStatement]) -> Table {
    let mut table = new_table(vec!["#", "Statement"]);
    for (index, statement) in statements.iter().enumerate() {
        table.add_row(vec![Cell::new(index + 1), Cell::new(statement_kind(statement))]);
    }
    table
}
