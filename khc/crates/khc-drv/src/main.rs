//! khc - Kithare front-end driver.
//!
//! Reads one source file, runs the scanner and parser over it, and
//! prints either the token stream or the reparsed AST. Diagnostics go
//! to stderr with `file:line:column` locations; the exit status is
//! non-zero when any error was collected.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use khc_lex::tokenize;
use khc_par::{parse, repr};
use khc_util::{Handler, SourceMap};

/// Kithare front-end driver.
///
/// Parses a source file and reports what it found. No semantic
/// analysis happens here; a successful run only means the file is
/// syntactically well-formed.
#[derive(Parser, Debug)]
#[command(name = "khc")]
#[command(author = "Kithare Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse Kithare source and print tokens or the AST", long_about = None)]
struct Cli {
    /// Source file to parse
    file: PathBuf,

    /// Print the token stream instead of the AST
    #[arg(long)]
    tokens: bool,

    /// Print the reparsed AST (implied unless --check is given)
    #[arg(long)]
    ast: bool,

    /// Check only: print nothing but diagnostics
    #[arg(long)]
    check: bool,

    /// Enable verbose logging
    #[arg(short, long, env = "KHC_VERBOSE")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(clean) => {
            if !clean {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(1);
        }
    }
}

/// Sets up the tracing subscriber; `RUST_LOG` still wins when set.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

/// Runs the front-end over the input file. Returns whether the parse
/// was error-free.
fn run(cli: &Cli) -> Result<bool> {
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("cannot read '{}'", cli.file.display()))?;

    let mut sources = SourceMap::new();
    let file_id = sources.add_file(cli.file.display().to_string(), source.as_str());

    let handler = Handler::new();
    if cli.tokens {
        let tokens = tokenize(&source, &handler);
        debug!(count = tokens.len(), "tokenized");
        for tok in &tokens {
            println!("{:>6}..{:<6} {}", tok.span.start, tok.span.end, tok.token);
        }
    } else {
        let ast = parse(&source, &handler);
        debug!(statements = ast.len(), "parsed");
        if !cli.check || cli.ast {
            print!("{}", repr(&ast));
        }
    }

    for diag in handler.diagnostics() {
        let location = sources
            .format_span(diag.span.with_file_id(file_id))
            .unwrap_or_else(|| cli.file.display().to_string());
        eprintln!("{}: {}", location, diag);
    }

    Ok(!handler.has_errors())
}
