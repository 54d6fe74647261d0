#![doc = include_str!("../README.md")]

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use addax_automata::{Automaton, AutomatonError};
use addax_engine::{analyze, AutomatonReport, PipelineOptions, Summary};
use addax_prover::{WalnutConfig, WalnutProver};

#[derive(Parser, Debug)]
#[command(name = "addax", version, about = "Growth and additive-basis analysis of base-2 automatic sets")]
struct Cli {
    /// File of automaton descriptions, one `states transitions accepting`
    /// line each. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Walnut installation directory (contains `bin`, `Result`, and the
    /// word automata library).
    #[arg(long)]
    walnut_home: PathBuf,

    /// Compute additive-basis orders, searching up to MAX summands.
    #[arg(long, value_name = "MAX", num_args = 0..=1, default_missing_value = "10")]
    basis_order: Option<usize>,

    /// Also compute the non-asymptotic basis order.
    #[arg(long)]
    non_asymptotic: bool,

    /// Suppress per-automaton lines; print only the summary.
    #[arg(long, short)]
    quiet: bool,

    /// Emit per-automaton reports as JSON lines instead of text.
    #[arg(long)]
    json: bool,

    /// Keep the prover's per-query log files.
    #[arg(long)]
    keep_logs: bool,

    /// Word-length bound for the heuristic growth estimate.
    #[arg(long, default_value_t = 62)]
    word_length_bound: usize,

    /// Sample all accepted values below 2^BITS for the heuristic GCD.
    #[arg(long, value_name = "BITS", default_value_t = 10)]
    gcd_certainty_bits: u32,

    /// JVM binary used to launch Walnut.
    #[arg(long, default_value = "java")]
    java: String,

    /// Extra JVM argument (repeatable).
    #[arg(long = "jvm-arg", value_name = "ARG")]
    jvm_args: Vec<String>,

    /// Seconds to wait for each prover result file.
    #[arg(long, default_value_t = 600)]
    prover_timeout: u64,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = PipelineOptions {
        growth_word_length_bound: cli.word_length_bound,
        gcd_certainty_bits: cli.gcd_certainty_bits,
        basis_order: cli.basis_order,
        non_asymptotic: cli.non_asymptotic,
    };
    let mut config = WalnutConfig::new(&cli.walnut_home);
    config.java_bin = cli.java.clone();
    config.jvm_args = cli.jvm_args.clone();
    config.keep_logs = cli.keep_logs;
    config.result_timeout = Duration::from_secs(cli.prover_timeout);
    let mut prover = WalnutProver::new(config);

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path).into_diagnostic()?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut summary = Summary::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line.into_diagnostic()?;
        let aut = match parse_line(&line) {
            None => continue,
            Some(Err(e)) => {
                return Err(miette::miette!("line {}: {e}", number + 1));
            }
            Some(Ok(aut)) => aut,
        };
        let report = analyze(&aut, &mut prover, &options)
            .map_err(|e| miette::miette!("line {}: {e}", number + 1))?;
        if !cli.quiet {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&report).into_diagnostic()?
                );
            } else {
                println!("{}", render_report(&report));
            }
        }
        summary.record(&report);
    }

    print!("{summary}");
    Ok(())
}

/// Parse one input line into an automaton.
///
/// `None` means the line is skipped: blank, a `#` comment, or a transition
/// encoding that does not start with `0` (the initial state must absorb
/// leading zeros for the value-based analyses to be meaningful).
fn parse_line(line: &str) -> Option<Result<Automaton, AutomatonError>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut fields = line.split_whitespace();
    let states = fields.next()?;
    let transitions = fields.next().unwrap_or("");
    let accepting = fields.next().unwrap_or("");
    if !transitions.is_empty() && !transitions.starts_with('0') {
        warn!(line, "skipping automaton whose initial state moves on 0");
        return None;
    }
    let states = match states.parse::<usize>() {
        Ok(n) => n,
        Err(_) => {
            return Some(Err(AutomatonError::InvalidDigit {
                digit: states.chars().next().unwrap_or('?'),
                context: "state count",
            }))
        }
    };
    Some(Automaton::from_description(states, transitions, accepting))
}

fn render_report(report: &AutomatonReport) -> String {
    let mut line = format!(
        "{}: growth={} gcd={}",
        report.canonical,
        report.growth,
        report.gcd.value()
    );
    if let Some(contains_one) = report.contains_one {
        line.push_str(if contains_one {
            " contains_one=yes"
        } else {
            " contains_one=no"
        });
    }
    if let Some(order) = report.asymptotic_order {
        line.push_str(&format!(" asymptotic_order={order}"));
    }
    if let Some(order) = report.exact_order {
        line.push_str(&format!(" exact_order={order}"));
    }
    line
}
