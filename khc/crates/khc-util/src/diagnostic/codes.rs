//! Diagnostic codes for categorizing front-end errors.
//!
//! Codes follow the format `{prefix}{number}`. The number space is
//! partitioned by phase: `E1xxx` for lexer errors and `E2xxx` for parser
//! errors, so a code alone identifies the reporting phase.
//!
//! # Examples
//!
//! ```
//! use khc_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E1002;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.number(), 1002);
//! assert_eq!(code.as_str(), "E1002");
//! ```

use std::fmt;

/// A unique code identifying a diagnostic message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix ("E" for error, "W" for warning).
    pub prefix: &'static str,
    /// The numeric identifier.
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code.
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix.
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier.
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E1001").
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // LEXER ERROR CODES (E1xxx)
    // =========================================================================

    /// E1001: Unexpected character.
    pub const E1001: Self = Self::new("E", 1001);
    /// E1002: Unterminated string or buffer literal.
    pub const E1002: Self = Self::new("E", 1002);
    /// E1003: Unterminated character literal.
    pub const E1003: Self = Self::new("E", 1003);
    /// E1004: Invalid escape sequence.
    pub const E1004: Self = Self::new("E", 1004);
    /// E1005: Numeric literal overflow.
    pub const E1005: Self = Self::new("E", 1005);
    /// E1006: Missing or invalid digits in a numeric literal.
    pub const E1006: Self = Self::new("E", 1006);
    /// E1007: Value not representable in a byte context.
    pub const E1007: Self = Self::new("E", 1007);
    /// E1008: Unknown numeric literal suffix.
    pub const E1008: Self = Self::new("E", 1008);

    // =========================================================================
    // PARSER ERROR CODES (E2xxx)
    // =========================================================================

    /// E2001: Expected a statement.
    pub const E2001: Self = Self::new("E", 2001);
    /// E2002: Expected an expression.
    pub const E2002: Self = Self::new("E", 2002);
    /// E2003: Expected a specific token or delimiter.
    pub const E2003: Self = Self::new("E", 2003);
    /// E2004: Keyword not valid in this position.
    pub const E2004: Self = Self::new("E", 2004);
    /// E2005: Specifier not allowed here.
    pub const E2005: Self = Self::new("E", 2005);
    /// E2006: Malformed for-loop header.
    pub const E2006: Self = Self::new("E", 2006);
    /// E2007: Misplaced or duplicate variadic argument.
    pub const E2007: Self = Self::new("E", 2007);
    /// E2008: Expected a statement terminator.
    pub const E2008: Self = Self::new("E", 2008);
    /// E2009: Expression not allowed in a type position.
    pub const E2009: Self = Self::new("E", 2009);
    /// E2010: Expected an identifier.
    pub const E2010: Self = Self::new("E", 2010);
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", self.prefix, self.number)
    }
}
