//! khc-util - Foundation types for the Kithare compiler front-end.
//!
//! This crate provides the pieces every phase of the front-end leans on:
//!
//! - [`span`]: source locations ([`Span`], [`FileId`]) and the
//!   [`SourceMap`] used to turn byte offsets back into line/column pairs.
//! - [`symbol`]: interned strings ([`Symbol`]) backed by a global,
//!   lock-free string table.
//! - [`diagnostic`]: the append-only [`Handler`] sink that the lexer and
//!   parser report into. Diagnostics are never fatal; the front-end
//!   always produces a best-effort result alongside them.
//! - [`error`]: typed errors for the fallible utility operations.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticCode, Handler, Level, Phase};
pub use error::{SourceMapError, SourceMapResult};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::{InternerStats, Symbol};
