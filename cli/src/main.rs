use clap::{Arg, ArgAction, ArgMatches, Command};
use lowerjs_core::js::JsScope;
use lowerjs_core::js::parser::{self, CollectingReporter, JsParseError};
use lowerjs_core::{Location, LowerErrorExt, TranslationConfig, TranslationUnit, generate_error_report};
use std::fs;
use std::process::ExitCode;

mod output;
mod report;

use output::{BoxPrinter, ConsoleLogger};

fn main() -> ExitCode {
    let cli = Command::new("lowerjs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lower resolved Kotlin function declarations into JavaScript function objects");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    ConsoleLogger::init(matches.get_count("verbose"));
    dispatch_commands(&matches)
}

/// Configures the `lower` and `parse-js` subcommands.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("verbose")
            .help("Increase log output (repeat for more)")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true),
    )
    .subcommand(
        Command::new("lower")
            .about("Lower every declaration of a translation unit")
            .arg(
                Arg::new("file")
                    .help("The translation unit (JSON) to lower")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("config")
                    .help("Translation configuration overriding the unit's own")
                    .short('c')
                    .long("config")
                    .value_parser(clap::value_parser!(String))
                    .value_name("FILE"),
            )
            .arg(
                Arg::new("no-inline")
                    .help("Do not mark calls for the inliner")
                    .long("no-inline")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("format")
                    .help("Output format")
                    .short('f')
                    .long("format")
                    .value_parser(["json", "table"])
                    .default_value("json")
                    .value_name("FORMAT"),
            )
            .arg(
                Arg::new("output")
                    .help("Write the output to a file instead of stdout")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(String))
                    .value_name("FILE"),
            ),
    )
    .subcommand(
        Command::new("parse-js")
            .about("Parse a JavaScript snippet the way js(\"...\") code is parsed")
            .arg(
                Arg::new("file")
                    .help("The JavaScript file to parse")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("top-level")
                    .help("Parse as top-level code, where return is invalid")
                    .long("top-level")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("format")
                    .help("Output format")
                    .short('f')
                    .long("format")
                    .value_parser(["json", "table"])
                    .default_value("table")
                    .value_name("FORMAT"),
            ),
    )
}

/// Dispatches the subcommand and maps its outcome to the process exit code.
fn dispatch_commands(matches: &ArgMatches) -> ExitCode {
    let result = match matches.subcommand() {
        Some(("lower", sub_m)) => run_lower(sub_m),
        Some(("parse-js", sub_m)) => run_parse_js(sub_m),
        _ => {
            eprintln!("No valid subcommand was used. Use --help for more information.");
            return ExitCode::from(2);
        }
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", generate_error_report(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}

fn emit(text: &str, output: Option<&String>) -> Result<(), Box<dyn LowerErrorExt>> {
    match output {
        Some(path) => fs::write(path, text).map_err(|e| cli_error(format!("cannot write {}: {}", path, e))),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn run_lower(sub_m: &ArgMatches) -> Result<bool, Box<dyn LowerErrorExt>> {
    let file = sub_m.get_one::<String>("file").ok_or_else(|| cli_error("missing unit file".into()))?;
    let unit = TranslationUnit::load_from_file(file)?;

    let mut config = match sub_m.get_one::<String>("config") {
        Some(path) => TranslationConfig::load_from_file(path).map_err(cli_error)?,
        None => unit.effective_config(),
    };
    if sub_m.get_flag("no-inline") {
        config = config.without_inlining();
    }

    let module = lowerjs_core::lower_translation_unit(&unit, config)?;
    let text = match sub_m.get_one::<String>("format").map(String::as_str) {
        Some("table") => report::function_table(&module).to_string(),
        _ => serde_json::to_string_pretty(&module).map_err(|e| cli_error(format!("cannot serialize module: {}", e)))?,
    };
    emit(&text, sub_m.get_one::<String>("output"))?;
    Ok(true)
}

fn run_parse_js(sub_m: &ArgMatches) -> Result<bool, Box<dyn LowerErrorExt>> {
    let file = sub_m.get_one::<String>("file").ok_or_else(|| cli_error("missing source file".into()))?;
    let source = fs::File::open(file).map_err(|e| cli_error(format!("cannot open {}: {}", file, e)))?;
    let scope = JsScope::root(file.as_str());
    let mut reporter = CollectingReporter::new();
    let inside_function = !sub_m.get_flag("top-level");

    let statements = match parser::parse(&Location::start_of(file.as_str()), &scope, source, &mut reporter, inside_function)
    {
        Ok(statements) => statements,
        Err(JsParseError::Aborted) => Vec::new(),
        Err(JsParseError::Syntax(e)) => return Err(Box::new(e)),
        Err(JsParseError::Io(e)) => return Err(cli_error(format!("cannot read {}: {}", file, e))),
    };

    let as_table = sub_m.get_one::<String>("format").map(String::as_str) == Some("table");
    if as_table {
        print_diagnostics(file, &reporter).map_err(|e| cli_error(format!("cannot write report: {}", e)))?;
        if !reporter.has_errors() {
            println!("{}", report::statements_table(&statements));
        }
    } else {
        let text = serde_json::to_string_pretty(&statements)
            .map_err(|e| cli_error(format!("cannot serialize statements: {}", e)))?;
        println!("{}", text);
        if !reporter.diagnostics().is_empty() {
            eprintln!("{}", report::diagnostics_table(reporter.diagnostics()));
        }
    }
    Ok(!reporter.has_errors())
}

fn print_diagnostics(file: &str, reporter: &CollectingReporter) -> std::io::Result<()> {
    let width = console::Term::stdout().size_checked().map(|(_, columns)| columns as usize).unwrap_or(80);
    let mut printer = BoxPrinter::new(std::io::stdout(), width);
    printer.top_border()?;
    printer.title(file)?;
    if reporter.diagnostics().is_empty() {
        printer.success("no diagnostics")?;
    }
    for diagnostic in reporter.diagnostics() {
        printer.diagnostic(diagnostic.level, &format!("{} ({})", diagnostic.message, diagnostic.location))?;
        printer.message(&format!("    {}", diagnostic.line_source))?;
    }
    printer.bottom_border()?;
    printer.flush()
}

/// Failure of the driver itself (arguments, files, serialization).
#[derive(Debug)]
struct CliError {
    message: String,
}

fn cli_error(message: String) -> Box<dyn LowerErrorExt> {
    Box::new(CliError { message })
}

impl LowerErrorExt for CliError {
    fn level(&self) -> lowerjs_core::Level {
        lowerjs_core::Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "lowerjs.cli".to_string()
    }

    fn span(&self) -> Option<lowerjs_core::Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
