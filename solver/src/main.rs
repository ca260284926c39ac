use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use hanjie::{deepen_with, Hints, Limits, LoadError, Puzzle, SearchStats, SolveOptions, SolveResult, Strategy};
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Algorithm {
    /// Line propagation only.
    ByLines,
    /// Line propagation, then nested guesses.
    Branch,
    /// Line propagation, then try both states of each cell, then nested guesses.
    Probe,
}

impl From<Algorithm> for Strategy {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::ByLines => Strategy::Lines,
            Algorithm::Branch => Strategy::Branch,
            Algorithm::Probe => Strategy::Probe,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about = "Solve nonograms given as JSON row and column hints")]
struct Args {
    /// Path to a JSON file with `row_hints` and `col_hints`; read from stdin when absent.
    path: Option<PathBuf>,

    /// Deepest level of nested guesses to try; 0 means no limit.
    #[arg(short, long, default_value_t = 3)]
    max_depth: usize,

    /// How to go on once line propagation stalls.
    #[arg(short, long, value_enum, default_value_t = Algorithm::Branch)]
    algorithm: Algorithm,

    /// Keep searching after the first solution.
    #[arg(short, long)]
    find_all: bool,

    /// Give up after this many search nodes.
    #[arg(long)]
    node_limit: Option<u64>,

    /// Give up after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    result: &'a SolveResult,
    stats: &'a SearchStats,
}

fn load(path: Option<&PathBuf>) -> Result<Puzzle, LoadError> {
    match path {
        Some(path) => Ok(Hints::from_path(path)?.into_puzzle()?),
        None => Puzzle::load(io::stdin().lock()),
    }
}

fn print_text(out: &mut impl Write, result: &SolveResult) -> io::Result<()> {
    match result {
        SolveResult::Solutions(set) => {
            for solution in set.solutions() {
                writeln!(out, "{solution}")?;
            }
            match (set.len(), set.is_exhaustive()) {
                (1, true) => writeln!(out, "unique solution"),
                (n, true) => writeln!(out, "{n} solutions, no others exist"),
                (n, false) => writeln!(out, "{n} solution(s) found"),
            }
        }
        SolveResult::NoSolution => writeln!(out, "no solution"),
        SolveResult::DepthExhausted { partial } => {
            writeln!(out, "{partial}")?;
            writeln!(out, "depth limit reached, {} cells unknown", partial.unknown_count())
        }
        SolveResult::Cancelled { reason, solutions } => {
            for solution in solutions {
                writeln!(out, "{solution}")?;
            }
            writeln!(out, "cancelled ({reason}) after {} solution(s)", solutions.len())
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let puzzle = match load(args.path.as_ref()) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(ExitCode::from(2));
        }
    };
    info!("loaded {}x{} puzzle", puzzle.width(), puzzle.height());

    let mut limits = Limits::default();
    if let Some(nodes) = args.node_limit {
        limits = limits.with_node_limit(nodes);
    }
    if let Some(ms) = args.timeout_ms {
        limits = limits.with_timeout(Duration::from_millis(ms));
    }
    let ceiling = (args.max_depth > 0).then_some(args.max_depth);

    let start = Instant::now();
    let options = SolveOptions::new(0, args.find_all).with_limits(limits).with_strategy(args.algorithm.into());
    let report = deepen_with(&puzzle, ceiling, &options);
    let elapsed = start.elapsed();

    let mut out = io::stdout().lock();
    match args.format {
        Format::Text => print_text(&mut out, &report.result).context("writing solutions")?,
        Format::Json => {
            let json = Report { result: &report.result, stats: &report.stats };
            serde_json::to_writer_pretty(&mut out, &json).context("writing solutions")?;
            writeln!(out)?;
        }
    }
    eprintln!("Elapsed: {} ms ({} nodes)", elapsed.as_millis(), report.stats.nodes);

    Ok(if report.result.is_solved() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
