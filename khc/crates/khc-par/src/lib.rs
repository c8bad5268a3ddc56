//! khc-par - AST model and parser for the Kithare front-end.
//!
//! The parser is a hand-written recursive descent over the token stream
//! produced by [`khc_lex::tokenize`]. It never aborts: every error is
//! recorded in the shared [`Handler`] and parsing continues with a
//! best-effort node, so callers always get a full statement list back.
//!
//! # Example
//!
//! ```
//! use khc_par::{parse, Stmt};
//! use khc_util::Handler;
//!
//! let handler = Handler::new();
//! let ast = parse("x: int = 3 + 4", &handler);
//!
//! assert!(!handler.has_errors());
//! assert_eq!(ast.len(), 1);
//! assert!(matches!(ast[0], Stmt::Expr(_)));
//! ```

pub mod ast;
pub mod expr;
pub mod items;
pub mod stmt;

mod edge_cases;

pub use ast::*;
pub use expr::ExprCtx;

use khc_lex::{tokenize, Delim, Keyword, Op, Token, TokenWithSpan};
use khc_util::{Diagnostic, DiagnosticCode, Handler, Span, Symbol};

/// Parses a whole source buffer into a statement list.
///
/// This is the front-end's single entry point: lexing and parsing share
/// the one diagnostic sink, and a best-effort AST is returned even when
/// the sink ends up non-empty.
pub fn parse(source: &str, handler: &Handler) -> Ast {
    let tokens = tokenize(source, handler);
    Parser::new(tokens, handler).parse_module()
}

/// Recursive descent parser over a buffered token stream.
///
/// Comments are terminator-equivalent to newlines, so they are
/// normalized to [`Token::Newline`] up front; everything after that only
/// deals with one kind of line break.
pub struct Parser<'a> {
    /// Token stream, always terminated by `Eof`.
    tokens: Vec<TokenWithSpan>,

    /// Current position in the token stream.
    position: usize,

    /// Diagnostic sink.
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    /// Creates a parser from a token stream.
    pub fn new(mut tokens: Vec<TokenWithSpan>, handler: &'a Handler) -> Self {
        for tok in &mut tokens {
            if tok.token == Token::Comment {
                tok.token = Token::Newline;
            }
        }
        if !matches!(tokens.last().map(|t| &t.token), Some(Token::Eof)) {
            let span = tokens.last().map(|t| t.span).unwrap_or(Span::DUMMY);
            tokens.push(TokenWithSpan::new(Token::Eof, span));
        }
        Self {
            tokens,
            position: 0,
            handler,
        }
    }

    /// Parses statements until end of input.
    pub fn parse_module(&mut self) -> Ast {
        let mut stmts = Vec::new();
        loop {
            self.skip_line_breaks();
            if matches!(self.current_token(), Token::Eof) {
                break;
            }
            let before = self.position;
            stmts.push(self.parse_statement());
            if self.position == before {
                self.recover();
            }
        }
        stmts
    }

    // =========================================================================
    // TOKEN STREAM HELPERS
    // =========================================================================

    /// The token at the cursor.
    pub(crate) fn current_token(&self) -> &Token {
        &self.tokens[self.position].token
    }

    /// The span of the token at the cursor.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.position].span
    }

    /// The span of the most recently consumed token.
    pub(crate) fn prev_span(&self) -> Span {
        if self.position == 0 {
            Span::DUMMY
        } else {
            self.tokens[self.position - 1].span
        }
    }

    /// Advances past the current token; pins at `Eof`.
    pub(crate) fn bump(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Skips any run of line breaks at the cursor.
    pub(crate) fn skip_line_breaks(&mut self) {
        while matches!(self.current_token(), Token::Newline) {
            self.bump();
        }
    }

    /// Index of the next significant token: the cursor itself, or the
    /// first non-newline position when `ignore_newline` is set.
    fn peek_at(&self, ignore_newline: bool) -> usize {
        let mut i = self.position;
        if ignore_newline {
            while matches!(self.tokens[i].token, Token::Newline) {
                i += 1;
            }
        }
        i
    }

    /// Peeks the next significant token without consuming anything.
    pub(crate) fn peek(&self, ignore_newline: bool) -> &Token {
        &self.tokens[self.peek_at(ignore_newline)].token
    }

    /// Span of the next significant token.
    pub(crate) fn peek_span(&self, ignore_newline: bool) -> Span {
        self.tokens[self.peek_at(ignore_newline)].span
    }

    /// The token after the next significant one (raw, no newline skip).
    pub(crate) fn peek_second(&self, ignore_newline: bool) -> &Token {
        let i = self.peek_at(ignore_newline);
        let j = (i + 1).min(self.tokens.len() - 1);
        &self.tokens[j].token
    }

    /// Consumes the next significant token if it equals `token`.
    fn eat(&mut self, token: &Token, ignore_newline: bool) -> bool {
        let i = self.peek_at(ignore_newline);
        if &self.tokens[i].token == token {
            self.position = (i + 1).min(self.tokens.len() - 1);
            true
        } else {
            false
        }
    }

    /// Consumes the next significant token if it is the given operator.
    pub(crate) fn eat_op(&mut self, op: Op, ignore_newline: bool) -> bool {
        self.eat(&Token::Op(op), ignore_newline)
    }

    /// Consumes the next significant token if it is the given delimiter.
    pub(crate) fn eat_delim(&mut self, delim: Delim, ignore_newline: bool) -> bool {
        self.eat(&Token::Delim(delim), ignore_newline)
    }

    /// Consumes the next significant token if it is the given keyword.
    pub(crate) fn eat_keyword(&mut self, keyword: Keyword, ignore_newline: bool) -> bool {
        self.eat(&Token::Keyword(keyword), ignore_newline)
    }

    /// Consumes the next significant operator if it is one of `ops`,
    /// returning which.
    pub(crate) fn eat_any_op(&mut self, ops: &[Op], ignore_newline: bool) -> Option<Op> {
        if let Token::Op(op) = self.peek(ignore_newline) {
            let op = *op;
            if ops.contains(&op) {
                self.advance_to(ignore_newline);
                self.bump();
                return Some(op);
            }
        }
        None
    }

    /// True if the next significant token is the given delimiter.
    pub(crate) fn check_delim(&self, delim: Delim, ignore_newline: bool) -> bool {
        self.peek(ignore_newline) == &Token::Delim(delim)
    }

    /// Moves the cursor up to the next significant token.
    pub(crate) fn advance_to(&mut self, ignore_newline: bool) {
        self.position = self.peek_at(ignore_newline);
    }

    /// Consumes the expected delimiter, or reports a diagnostic.
    ///
    /// The cursor does not move on failure; callers remain responsible
    /// for forward progress.
    pub(crate) fn expect_delim(&mut self, delim: Delim, ignore_newline: bool) -> bool {
        if self.eat_delim(delim, ignore_newline) {
            true
        } else {
            self.error(
                format!(
                    "expected '{}', found {}",
                    delim.as_str(),
                    self.describe_peek(ignore_newline)
                ),
                DiagnosticCode::E2003,
                self.peek_span(ignore_newline),
            );
            false
        }
    }

    /// Consumes the expected keyword, or reports a diagnostic.
    pub(crate) fn expect_keyword(&mut self, keyword: Keyword, ignore_newline: bool) -> bool {
        if self.eat_keyword(keyword, ignore_newline) {
            true
        } else {
            self.error(
                format!(
                    "expected '{}', found {}",
                    keyword.as_str(),
                    self.describe_peek(ignore_newline)
                ),
                DiagnosticCode::E2003,
                self.peek_span(ignore_newline),
            );
            false
        }
    }

    /// Consumes an identifier, or reports a diagnostic and synthesizes
    /// an empty one.
    pub(crate) fn expect_ident(&mut self, ignore_newline: bool) -> Symbol {
        if let Token::Ident(name) = self.peek(ignore_newline) {
            let name = *name;
            self.advance_to(ignore_newline);
            self.bump();
            name
        } else {
            self.error(
                format!(
                    "expected an identifier, found {}",
                    self.describe_peek(ignore_newline)
                ),
                DiagnosticCode::E2010,
                self.peek_span(ignore_newline),
            );
            Symbol::intern("")
        }
    }

    /// A printable description of the next significant token.
    pub(crate) fn describe_peek(&self, ignore_newline: bool) -> String {
        match self.peek(ignore_newline) {
            Token::Eof => "end of file".to_string(),
            Token::Newline => "end of line".to_string(),
            token => format!("'{}'", token),
        }
    }

    /// Records a parser diagnostic.
    pub(crate) fn error(&self, message: impl Into<String>, code: DiagnosticCode, span: Span) {
        self.handler
            .emit(Diagnostic::parser_error(message, span).with_code(code));
    }

    /// Forces progress after a failed sub-parse: consumes one token
    /// unless already at `Eof`.
    pub(crate) fn recover(&mut self) {
        if !matches!(self.current_token(), Token::Eof) {
            self.bump();
        }
    }

    /// True if the current token terminates a statement.
    pub(crate) fn at_terminator(&self) -> bool {
        matches!(
            self.current_token(),
            Token::Newline | Token::Eof | Token::Delim(Delim::Semicolon) | Token::Delim(Delim::RBrace)
        )
    }

    /// Consumes a statement terminator (`\n`, `;`, end of file, or a
    /// closing `}` left for the enclosing block), or reports a
    /// diagnostic and skips one token.
    pub(crate) fn expect_terminator(&mut self) {
        match self.current_token() {
            Token::Newline | Token::Delim(Delim::Semicolon) => self.bump(),
            Token::Eof | Token::Delim(Delim::RBrace) => {}
            _ => {
                self.error(
                    format!("expected end of statement, found {}", self.describe_peek(false)),
                    DiagnosticCode::E2008,
                    self.current_span(),
                );
                self.bump();
            }
        }
    }
}
