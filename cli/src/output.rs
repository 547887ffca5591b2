/// cli/src/output.rs
/// Styled terminal output for the lowerjs CLI.
/// description: box-framed diagnostic printing and a console logger backing
/// the `log` facade used by the core crate.

use std::io::{self, Write};

use console::{Style, measure_text_width, strip_ansi_codes};
use log::{Level as LogLevel, LevelFilter, Log, Metadata, Record};
use lowerjs_core::Level;

pub struct BoxCorners {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
}

impl Default for BoxCorners {
    fn default() -> Self {
        BoxCorners { top_left: '┌', top_right: '┐', bottom_left: '└', bottom_right: '┘' }
    }
}

/// Styles for the different kinds of output lines.
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
    pub success: Style,
    pub corners: BoxCorners,
    pub horizontal: char,
    pub vertical: char,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().underlined(),
            info: Style::new().cyan(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
            corners: BoxCorners::default(),
            horizontal: '─',
            vertical: '│',
        }
    }
}

impl FormatStyle {
    /// Style used for a diagnostic of the given severity.
    pub fn for_level(&self, level: Level) -> &Style {
        match level {
            Level::Info => &self.info,
            Level::Warning => &self.warning,
            Level::Error | Level::Critical => &self.error,
        }
    }
}

/// Writes box-framed lines into any `Write`.
pub struct BoxPrinter<T: Write> {
    out: T,
    inner_width: usize,
    formatting: FormatStyle,
}

impl<T: Write> BoxPrinter<T> {
    pub fn new(out: T, total_width: usize) -> Self {
        // two border chars + two single-space paddings
        let inner_width = total_width.saturating_sub(4);
        BoxPrinter { out, inner_width, formatting: FormatStyle::default() }
    }

    pub fn formatting(&self) -> &FormatStyle {
        &self.formatting
    }

    /// Write one line inside the box; lines wider than the box are not wrapped.
    pub fn line(&mut self, text: &str, style: Option<&Style>) -> io::Result<()> {
        let rendered = match style {
            Some(s) => s.apply_to(text).to_string(),
            None => text.to_string(),
        };
        let visible = measure_text_width(&strip_ansi_codes(&rendered));
        let pad = self.inner_width.saturating_sub(visible);
        let vertical = self.formatting.vertical;
        writeln!(self.out, "{} {}{} {}", vertical, rendered, " ".repeat(pad), vertical)
    }

    pub fn top_border(&mut self) -> io::Result<()> {
        let corners = &self.formatting.corners;
        let rule = self.formatting.horizontal.to_string().repeat(self.inner_width + 2);
        writeln!(self.out, "{}{}{}", corners.top_left, rule, corners.top_right)
    }

    pub fn bottom_border(&mut self) -> io::Result<()> {
        let corners = &self.formatting.corners;
        let rule = self.formatting.horizontal.to_string().repeat(self.inner_width + 2);
        writeln!(self.out, "{}{}{}", corners.bottom_left, rule, corners.bottom_right)
    }

    pub fn title(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.title.clone();
        self.line(text, Some(&style))
    }

    pub fn diagnostic(&mut self, level: Level, text: &str) -> io::Result<()> {
        let style = self.formatting.for_level(level).clone();
        self.line(&format!("{}: {}", level, text), Some(&style))
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.success.clone();
        self.line(text, Some(&style))
    }

    pub fn message(&mut self, text: &str) -> io::Result<()> {
        self.line(text, None)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// `log` backend writing colored records to stderr.
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    /// Install the logger; `verbosity` counts `-v` flags.
    pub fn init(verbosity: u8) {
        let level = match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        // A second installation (tests) keeps the first logger.
        if log::set_boxed_logger(Box::new(ConsoleLogger { level })).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let style = match record.level() {
            LogLevel::Error => Style::new().red().bold(),
            LogLevel::Warn => Style::new().yellow(),
            LogLevel::Info => Style::new().cyan(),
            LogLevel::Debug | LogLevel::Trace => Style::new().dim(),
        };
        let _ = writeln!(
            io::stderr(),
            "{} {} {}",
            style.apply_to(format!("{:<5}", record.level())),
            Style::new().dim().apply_to(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
