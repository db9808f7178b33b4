use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use calcparse::ast::Statement;
use calcparse::error::ParseError;
use calcparse::parse_statement;

#[derive(ClapParser, Debug)]
#[command(version, about = "Calculator statement parser", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to a file
    #[arg(long, global = true)]
    log: bool,

    /// File written to when --log is given
    #[arg(long, global = true, default_value = "calcparse.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parses every line of a file (or stdin) and prints each AST as JSON
    Parse {
        filename: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Parses every line of a file (or stdin) and reports only errors
    Check { filename: Option<PathBuf> },
}

/// Process exit code when any line fails to parse.
const EXIT_PARSE_FAILURE: i32 = 65;

/// Reads a file, or stdin when no filename is given, into a String.
fn read_input(filename: Option<PathBuf>) -> Result<String> {
    let mut buf = Vec::new();

    match filename {
        Some(filename) => {
            info!("Reading file: {:?}", filename);
            let file =
                File::open(&filename).context(format!("Failed to open file {:?}", filename))?;

            BufReader::new(file)
                .read_to_end(&mut buf)
                .context(format!("Failed to read file {:?}", filename))?;
        }

        None => {
            info!("Reading stdin");
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
        }
    }

    info!("Read {} bytes", buf.len());

    String::from_utf8(buf).context("Input is not valid UTF-8")
}

/// `line N: <error>` followed by the source line and a caret under the
/// failing position.
fn render_error(line_no: usize, line: &str, err: &ParseError) -> String {
    let column: usize = line
        .get(..err.offset())
        .map_or(0, |prefix| prefix.chars().count());

    format!(
        "line {}: {}\n    {}\n    {}^",
        line_no,
        err,
        line,
        " ".repeat(column)
    )
}

/// Parses each non-blank line independently.  Returns the number of failures.
fn parse_lines<F>(source: &str, mut on_statement: F) -> Result<usize>
where
    F: FnMut(&Statement<'_>) -> Result<()>,
{
    let mut failures: usize = 0;

    for (index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_statement(line) {
            Ok(statement) => {
                debug!("Line {} parsed", index + 1);
                on_statement(&statement)?;
            }

            Err(e) => {
                failures += 1;
                debug!("Parse debug: {}", e);
                eprintln!("{}", render_error(index + 1, line, &e));
            }
        }
    }

    Ok(failures)
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file = File::create(path).context(format!("Failed to create {:?}", path))?;

    // Module path and source line on each record; RUST_LOG overrides the level
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("calcparse::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger(&args.log_file)?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let failures: usize = match args.commands {
        Commands::Parse { filename, pretty } => {
            info!("Running Parse subcommand");
            let source = read_input(filename)?;
            let stdout = io::stdout();

            parse_lines(&source, |statement| {
                let json = if pretty {
                    serde_json::to_string_pretty(statement)
                } else {
                    serde_json::to_string(statement)
                }
                .context("Failed to serialize statement")?;

                writeln!(stdout.lock(), "{}", json).context("Failed to write to stdout")?;
                Ok(())
            })?
        }

        Commands::Check { filename } => {
            info!("Running Check subcommand");
            let source = read_input(filename)?;
            let mut parsed: usize = 0;

            let failures = parse_lines(&source, |_| {
                parsed += 1;
                Ok(())
            })?;

            println!("{} parsed, {} failed", parsed, failures);
            failures
        }
    };

    if failures > 0 {
        debug!(
            "{} line(s) failed, exiting with code {}",
            failures, EXIT_PARSE_FAILURE
        );
        std::process::exit(EXIT_PARSE_FAILURE);
    }

    info!("Completed successfully");
    Ok(())
}
