use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chisel_pluck::decoders::Encoding;
use chisel_pluck::{Document, QueryOptions};
use clap::Parser;
use clap_verbosity_flag::{ErrorLevel, Verbosity};

/// Extract values from a JSON document using dot/bracket paths such as `foo.bar[2].baz` or
/// `items.*.name`. Each matched value is printed on its own line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read the document from this file instead of standard input
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Render JSON null as the text 'null' instead of an empty line
    #[arg(short = 'n', long)]
    print_nulls: bool,

    /// Suppress error text on stderr
    #[arg(short, long)]
    silent: bool,

    /// Character encoding of the input (utf8 or ascii)
    #[arg(short, long, default_value_t = Encoding::Utf8)]
    encoding: Encoding,

    #[command(flatten)]
    verbose: Verbosity<ErrorLevel>,

    /// Paths to extract
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    let mut out = BufWriter::new(io::stdout().lock());
    let status = report(run(&cli), cli.silent, &mut out, &mut io::stderr().lock());
    ExitCode::from(status)
}

/// Write the outcome of a batch. Lines only reach `out` when every path resolved, otherwise
/// the error goes to `err` (unless silenced). Returns the process exit status.
fn report(
    result: Result<Vec<String>>,
    silent: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    match result.and_then(|lines| print_lines(out, &lines)) {
        Ok(()) => 0,
        Err(e) => {
            if !silent {
                let _ = writeln!(err, "ERROR: {:#}", e);
            }
            1
        }
    }
}

// Load the document and evaluate every path, producing the output lines
fn run(cli: &Cli) -> Result<Vec<String>> {
    let document = match &cli.file {
        Some(path) => Document::load_file(path, cli.encoding)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Document::load_stdin(cli.encoding).context("failed to load stdin")?,
    };
    let options = QueryOptions::default().with_print_nulls(cli.print_nulls);
    Ok(document.values(&cli.paths, &options)?)
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}
