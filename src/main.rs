use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use jcc2c::{convert, Config, Element};

/// Argument value meaning standard input/output
const STDIO: &str = "-";

#[derive(Parser)]
#[command(name = "jcc2c")]
#[command(about = "Convert JaCoCo XML coverage reports into Cobertura XML coverage reports")]
#[command(version)]
struct Cli {
    /// JaCoCo XML report ("-" reads from stdin)
    filename: String,

    /// Source directories listed in the Cobertura report (default: ".")
    source_roots: Vec<String>,

    /// Cobertura XML output file ("-" writes to stdout)
    #[arg(short, long, default_value = STDIO)]
    output: String,

    /// Path to a jcc2c.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    let config = match cli.config {
        Some(ref path) => Config::load(path)
            .with_context(|| format!("Could not load {}", path.display()))?,
        None => Config::default(),
    };
    let options = config.options(cli.source_roots);

    let coverage = if cli.filename == STDIO {
        info(quiet, "Parsing input from stdin...");
        convert::convert_reader(io::stdin().lock(), &options)?
    } else {
        let path = PathBuf::from(&cli.filename);
        info(quiet, &format!("Parsing input from file {}", path.display()));
        convert::convert_path(&path, &options)?
    };

    // Render fully before touching the output so a failure leaves nothing behind
    let document = convert::render(&coverage)?;

    if cli.output == STDIO {
        info(quiet, "Writing output to stdout...");
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(document.as_bytes())
            .context("Failed to write to stdout")?;
        stdout.flush().context("Failed to write to stdout")?;
    } else {
        info(quiet, &format!("Writing output to file {}", cli.output));
        fs::write(&cli.output, &document)
            .with_context(|| format!("Failed to write {}", cli.output))?;
    }

    if !quiet {
        print_summary(&coverage);
    }

    Ok(())
}

fn info(quiet: bool, message: &str) {
    if !quiet {
        eprintln!("{} {}", "[INFO]".cyan(), message);
    }
}

fn print_summary(coverage: &Element) {
    let packages = coverage.descendants("package").count();
    let classes = coverage.descendants("class").count();

    let session = coverage
        .attribute("timestamp")
        .and_then(|t| t.parse::<i64>().ok())
        .and_then(|t| DateTime::from_timestamp(t, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let percent = |name: &str| {
        coverage
            .attribute(name)
            .and_then(|r| r.parse::<f64>().ok())
            .map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string())
    };

    eprintln!(
        "{} Converted {} packages, {} classes (session started {})",
        "[INFO]".cyan(),
        packages.to_string().bold(),
        classes.to_string().bold(),
        session
    );
    eprintln!(
        "{} Line rate: {}, branch rate: {}",
        "[INFO]".cyan(),
        percent("line-rate").green(),
        percent("branch-rate").green()
    );
}
