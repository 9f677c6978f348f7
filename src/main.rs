use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use loglog_counter::estimator::DEFAULT_PRECISION;
use loglog_counter::{count_lines, Estimator};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "loglog-counter", version, about)]
struct Arguments {
    /// Text file to read keys from, one key per line.
    ///
    /// Reads standard input when omitted or `-`.
    file: Option<PathBuf>,

    /// Number of hash bits used for register indices, in [4..16] range.
    #[clap(short, long, env = "LOGLOG_PRECISION", default_value_t = DEFAULT_PRECISION)]
    precision: u8,

    /// Print the floating point estimate instead of truncating it.
    #[clap(long)]
    raw: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Estimate number of distinct lines in a file or standard input.
fn main() {
    let args = Arguments::parse();
    configure_logger(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

fn configure_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Arguments) -> Result<()> {
    let estimator = match args.file.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            info!(path = %path.display(), precision = args.precision, "reading file");
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            count_lines(BufReader::new(file), args.precision)
                .with_context(|| format!("failed to count lines of {}", path.display()))?
        }
        _ => {
            info!(precision = args.precision, "reading standard input");
            count_lines(io::stdin().lock(), args.precision)
                .context("failed to count lines of standard input")?
        }
    };

    let mut stdout = BufWriter::new(io::stdout().lock());
    write_result(&mut stdout, &estimator, args.raw)?;
    stdout.flush()?;

    Ok(())
}

fn write_result<W: Write>(out: &mut W, estimator: &Estimator, raw: bool) -> io::Result<()> {
    if raw {
        writeln!(out, "Unique words = {}", estimator.estimate())
    } else {
        writeln!(out, "Unique words = {}", estimator.estimate() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_result() {
        let mut e = Estimator::new(4).unwrap();
        e.update("");

        let mut out = Vec::new();
        write_result(&mut out, &e, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Unique words = 1\n");

        let mut out = Vec::new();
        write_result(&mut out, &e, true).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Unique words = 1.0326"));
    }

    #[test]
    fn test_arguments() {
        let args = Arguments::parse_from(["loglog-counter", "-p", "10", "--raw", "-vv", "words.txt"]);
        assert_eq!(args.precision, 10);
        assert!(args.raw);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.file, Some(PathBuf::from("words.txt")));
    }
}
