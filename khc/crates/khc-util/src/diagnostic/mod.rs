//! Diagnostic module - the append-only error sink of the front-end.
//!
//! The lexer and parser never abort: every problem is recorded as a
//! [`Diagnostic`] in a shared [`Handler`] and a best-effort token or AST
//! node is produced in its place. Callers inspect the handler after the
//! parse; a non-empty handler means "the parse had errors" even though a
//! tree was returned.
//!
//! # Examples
//!
//! ```
//! use khc_util::diagnostic::{Diagnostic, Handler};
//! use khc_util::span::Span;
//!
//! let handler = Handler::new();
//! handler.emit(Diagnostic::parser_error("expected '}'", Span::DUMMY));
//!
//! assert!(handler.has_errors());
//! assert_eq!(handler.error_count(), 1);
//! ```

mod codes;

pub use codes::DiagnosticCode;

use std::cell::RefCell;
use std::fmt;

use crate::span::Span;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that makes the parse result unreliable.
    Error,
    /// A warning; the parse result is still usable.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// Which front-end phase produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Reported by the scanner (malformed literal, unknown character, ...).
    Lexer,
    /// Reported by the parser (missing delimiter, wrong statement head, ...).
    Parser,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexer => write!(f, "lexer"),
            Phase::Parser => write!(f, "parser"),
        }
    }
}

/// A single diagnostic record: phase, severity, message, and location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Which phase reported this.
    pub phase: Phase,
    /// Severity level.
    pub level: Level,
    /// Main diagnostic message.
    pub message: String,
    /// Source location.
    pub span: Span,
    /// Optional diagnostic code.
    pub code: Option<DiagnosticCode>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(phase: Phase, level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            phase,
            level,
            message: message.into(),
            span,
            code: None,
        }
    }

    /// Create a lexer error.
    ///
    /// # Examples
    ///
    /// ```
    /// use khc_util::diagnostic::{Diagnostic, Level, Phase};
    /// use khc_util::span::Span;
    ///
    /// let diag = Diagnostic::lexer_error("unterminated string", Span::DUMMY);
    /// assert_eq!(diag.phase, Phase::Lexer);
    /// assert_eq!(diag.level, Level::Error);
    /// ```
    pub fn lexer_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Phase::Lexer, Level::Error, message, span)
    }

    /// Create a parser error.
    pub fn parser_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Phase::Parser, Level::Error, message, span)
    }

    /// Attach a diagnostic code.
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} {}[{}]: {}", self.phase, self.level, code, self.message),
            None => write!(f, "{} {}: {}", self.phase, self.level, self.message),
        }
    }
}

/// Handler for collecting diagnostics.
///
/// The handler is shared by reference between the lexer and the parser,
/// so it uses interior mutability. It only records; nothing here stops
/// the parse.
///
/// # Examples
///
/// ```
/// use khc_util::diagnostic::Handler;
///
/// let handler = Handler::new();
/// assert!(!handler.has_errors());
/// ```
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new, empty handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Append a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// True if any error-level diagnostic has been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    /// True if nothing has been recorded at all.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    /// Snapshot of all recorded diagnostics, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drop all recorded diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(format!("{}", Level::Error), "error");
        assert_eq!(format!("{}", Level::Warning), "warning");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(format!("{}", Phase::Lexer), "lexer");
        assert_eq!(format!("{}", Phase::Parser), "parser");
    }

    #[test]
    fn test_diagnostic_constructors() {
        let lex = Diagnostic::lexer_error("bad escape", Span::DUMMY);
        assert_eq!(lex.phase, Phase::Lexer);
        assert_eq!(lex.level, Level::Error);

        let par = Diagnostic::parser_error("expected statement", Span::DUMMY);
        assert_eq!(par.phase, Phase::Parser);
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::lexer_error("x", Span::DUMMY).with_code(DiagnosticCode::E1001);
        assert_eq!(diag.code, Some(DiagnosticCode::E1001));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::parser_error("expected '}'", Span::DUMMY)
            .with_code(DiagnosticCode::E2003);
        assert_eq!(format!("{}", diag), "parser error[E2003]: expected '}'");
    }

    #[test]
    fn test_handler_counts() {
        let handler = Handler::new();
        assert!(handler.is_empty());

        handler.emit(Diagnostic::lexer_error("a", Span::DUMMY));
        handler.emit(Diagnostic::new(
            Phase::Parser,
            Level::Warning,
            "b",
            Span::DUMMY,
        ));

        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(handler.diagnostics().len(), 2);
    }

    #[test]
    fn test_handler_clear() {
        let handler = Handler::new();
        handler.emit(Diagnostic::parser_error("x", Span::DUMMY));
        handler.clear();
        assert!(!handler.has_errors());
        assert!(handler.is_empty());
    }

    #[test]
    fn test_handler_preserves_order() {
        let handler = Handler::new();
        handler.emit(Diagnostic::lexer_error("first", Span::DUMMY));
        handler.emit(Diagnostic::parser_error("second", Span::DUMMY));
        let diags = handler.diagnostics();
        assert_eq!(diags[0].message, "first");
        assert_eq!(diags[1].message, "second");
    }
}
