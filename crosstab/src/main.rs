//! crosstab-split CLI - split a crosstab CSV into one CSV per entity
//!
//! ```bash
//! crosstab-split data.csv output           # explicit paths
//! crosstab-split                           # prompts, defaults data.csv / output
//! crosstab-split data.csv out --strict     # fail on a missing "<time> <metric>" column
//! crosstab-split data.csv out --json all.json
//! ```

use clap::Parser;
use crosstab::logs::log_error;
use crosstab::{
    split_file, MissingColumnPolicy, ReshapeOptions, SplitOptions, SplitReport,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "crosstab-split")]
#[command(about = "Split a time × metric crosstab CSV into one CSV per entity", long_about = None)]
struct Cli {
    /// Input CSV file (prompted for if omitted)
    input: Option<PathBuf>,

    /// Output directory (prompted for if omitted)
    output: Option<PathBuf>,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Fail when an expected "<time> <metric>" column is missing
    #[arg(long)]
    strict: bool,

    /// Label of the first column in every output file
    #[arg(long, default_value = crosstab::DEFAULT_TIME_LABEL)]
    time_label: String,

    /// Also write the full reshape result as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Use the defaults instead of prompting for missing paths
    #[arg(long)]
    no_prompt: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(cli)?;

    eprintln!("Processing: {}", options.input.display());
    let report = split_file(&options).await?;
    print_report(&report, &options.output_dir);

    println!("Finished!");
    Ok(())
}

fn build_options(cli: Cli) -> io::Result<SplitOptions> {
    let defaults = SplitOptions::default();

    let input = match cli.input {
        Some(p) => p,
        None if cli.no_prompt => defaults.input,
        None => PathBuf::from(prompt("Input CSV file", &defaults.input.to_string_lossy())?),
    };
    let output_dir = match cli.output {
        Some(p) => p,
        None if cli.no_prompt => defaults.output_dir,
        None => PathBuf::from(prompt("Output directory", &defaults.output_dir.to_string_lossy())?),
    };

    let missing = if cli.strict {
        MissingColumnPolicy::Fail
    } else {
        MissingColumnPolicy::Blank
    };

    Ok(SplitOptions {
        input,
        output_dir,
        delimiter: cli.delimiter,
        reshape: ReshapeOptions { missing },
        time_label: cli.time_label,
        json_dump: cli.json,
    })
}

fn prompt(question: &str, default: &str) -> io::Result<String> {
    let stdin = io::stdin();
    prompt_with(&mut stdin.lock(), &mut io::stderr(), question, default)
}

/// Ask on `output`, read one line from `input`. Empty answer or EOF takes
/// the default.
fn prompt_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: &str,
) -> io::Result<String> {
    write!(output, "{} [{}]: ", question, default)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

fn print_report(report: &SplitReport, output_dir: &Path) {
    eprintln!(
        "{} file(s) in {}, {} time(s), {} metric(s)",
        report.files.len(),
        output_dir.display(),
        report.times,
        report.metrics
    );
    if report.skipped_rows > 0 {
        eprintln!("{} empty row(s) skipped", report.skipped_rows);
    }
}
