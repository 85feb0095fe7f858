//! Terminal output for the command line tool.
//!
//! Diagnostics go through `log`; this is the user-facing progress report.
//! In quiet mode only warnings are printed, so `--json` output on stdout
//! stays machine-readable.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// When progress lines are colored.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color when writing to a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorMode {
    /// Resolves to a termcolor choice for a stream.
    ///
    /// `NO_COLOR` always wins; `Auto` also turns color off when the stream
    /// is not a terminal.
    pub fn to_color_choice(self, is_terminal: bool) -> ColorChoice {
        if std::env::var_os("NO_COLOR").is_some() {
            return ColorChoice::Never;
        }
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if is_terminal => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Plain,
    Progress,
    Success,
    Warning,
    Section,
}

impl LineKind {
    fn marker(self) -> &'static str {
        match self {
            LineKind::Plain => "",
            LineKind::Progress => "• ",
            LineKind::Success => "✓ ",
            LineKind::Warning => "⚠ ",
            LineKind::Section => "",
        }
    }

    fn color_spec(self) -> Option<ColorSpec> {
        let mut spec = ColorSpec::new();
        match self {
            LineKind::Plain => return None,
            LineKind::Progress => spec.set_fg(Some(Color::Cyan)),
            LineKind::Success => spec.set_fg(Some(Color::Green)).set_bold(true),
            LineKind::Warning => spec.set_fg(Some(Color::Yellow)).set_bold(true),
            LineKind::Section => spec.set_bold(true),
        };
        Some(spec)
    }
}

/// Writes one line, coloring only the marker (or the whole title for a
/// section).
fn write_line(w: &mut impl WriteColor, kind: LineKind, message: &str) -> io::Result<()> {
    match kind.color_spec() {
        None => writeln!(w, "{message}"),
        Some(spec) if kind == LineKind::Section => {
            writeln!(w)?;
            w.set_color(&spec)?;
            write!(w, "{message}")?;
            w.reset()?;
            writeln!(w)
        }
        Some(spec) => {
            w.set_color(&spec)?;
            write!(w, "{}", kind.marker())?;
            w.reset()?;
            writeln!(w, "{message}")
        }
    }
}

/// Prints progress, success and warning lines.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    color: ColorMode,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool, color: ColorMode) -> Self {
        Self {
            verbose,
            quiet,
            color,
        }
    }

    fn line(&self, kind: LineKind, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let choice = self.color.to_color_choice(io::stdout().is_terminal());
        let mut stream = StandardStream::stdout(choice);
        write_line(&mut stream.lock(), kind, message)
    }

    /// Detail line, shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose {
            self.line(LineKind::Plain, message)
        } else {
            Ok(())
        }
    }

    /// Step in progress.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.line(LineKind::Progress, message)
    }

    /// Completed step.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.line(LineKind::Success, message)
    }

    /// Warning, printed to stderr even in quiet mode.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        let choice = self.color.to_color_choice(io::stderr().is_terminal());
        let mut stream = StandardStream::stderr(choice);
        write_line(&mut stream.lock(), LineKind::Warning, message)
    }

    /// Section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        self.line(LineKind::Section, title)
    }

    /// Indented detail line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.line(LineKind::Plain, &format!("  {message}"))
    }
}
