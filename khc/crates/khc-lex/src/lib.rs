//! khc-lex - The Kithare scanner.
//!
//! Turns source text into a stream of tokens. The scanner is
//! cursor-driven and produces exactly one token per call; newlines and
//! `#` comments are tokens in their own right because the parser treats
//! them as statement terminators.
//!
//! Errors never stop the scan: they are recorded in the shared
//! [`Handler`](khc_util::Handler) and lexing continues with a
//! best-effort token.
//!
//! # Example
//!
//! ```
//! use khc_lex::{tokenize, Token};
//! use khc_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = tokenize("x: int = 3 + 4", &handler);
//!
//! assert!(!handler.has_errors());
//! assert!(matches!(tokens[0].token, Token::Ident(_)));
//! ```

pub mod cursor;
pub mod lexer;
pub mod token;

mod edge_cases;

pub use cursor::{Cursor, CursorSnapshot};
pub use lexer::{tokenize, Lexer};
pub use token::{keyword_from_word, Delim, Keyword, Op, Token, TokenWithSpan};
