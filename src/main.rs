extern crate failure;
extern crate structopt;
extern crate sudoku_batch;

use failure::{Fallible, ResultExt};
use log::info;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
    time::Instant,
};
use structopt::StructOpt;
use sudoku_batch::{GuessStrategy, Grid, Solution, Solver, SolverConfig};

#[derive(StructOpt)]
struct Config {
    /// Full lockstep passes before switching to the stall queue
    #[structopt(long = "rounds", default_value = "3")]
    rounds: usize,
    /// Upper bound on stall queue entries per batch
    #[structopt(long = "queue-capacity", default_value = "162")]
    queue_capacity: usize,
    /// Branch cell choice: 'pair' or 'fewest'
    #[structopt(long = "guess", default_value = "fewest")]
    guess: GuessStrategy,
}

impl From<&Config> for SolverConfig {
    fn from(c: &Config) -> Self {
        SolverConfig {
            rounds: c.rounds,
            queue_capacity: c.queue_capacity,
            guess: c.guess,
        }
    }
}

#[derive(StructOpt)]
struct Solve {
    #[structopt(parse(from_os_str))]
    input_path: Option<PathBuf>,
    #[structopt(parse(from_os_str), short = "o", long = "output")]
    output_path: Option<PathBuf>,
    #[structopt(flatten)]
    config: Config,
}

#[derive(StructOpt)]
struct Bench {
    /// CSV file of `puzzle,solution` records
    #[structopt(parse(from_os_str))]
    input_path: PathBuf,
    #[structopt(flatten)]
    config: Config,
}

fn solve(args: &Solve) -> Fallible<()> {
    let stdin = std::io::stdin();
    let input: Box<dyn BufRead> = match &args.input_path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).context("Failed to open input file")?,
        )),
        None => Box::new(stdin.lock()),
    };
    let stdout = std::io::stdout();
    let mut output: Box<dyn Write> = match &args.output_path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).context("Failed to create output file")?,
        )),
        None => Box::new(stdout.lock()),
    };

    let mut problems = Vec::new();
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        problems.push(sudoku_batch::parse(line.trim())?);
    }

    let mut solver = Solver::new(SolverConfig::from(&args.config));
    for solution in solver.solve_all(&problems) {
        match solution {
            Solution::No => writeln!(&mut output, "no solution"),
            Solution::Found(g) => writeln!(&mut output, "{}", g),
        }
        .context("Failed to write output")?;
    }
    info!("{:?}", solver.stats());

    Ok(())
}

fn bench(args: &Bench) -> Fallible<()> {
    let instant = Instant::now();
    let input = BufReader::new(File::open(&args.input_path).context("Failed to open input file")?);
    let records = sudoku_batch::read_records(input)?;
    info!(
        "Reading {} records took: {}ms",
        records.len(),
        instant.elapsed().as_millis()
    );

    let puzzles: Vec<Grid> = records.iter().map(|r| r.puzzle.clone()).collect();
    let mut solver = Solver::new(SolverConfig::from(&args.config));
    let instant = Instant::now();
    let solutions = solver.solve_all(&puzzles);
    let elapsed = instant.elapsed();

    let failed = records
        .iter()
        .zip(&solutions)
        .filter(|(record, solution)| !record.check(solution))
        .count();
    let stats = solver.stats();
    info!(
        "Solving {} sudokus took: {}ms",
        puzzles.len(),
        elapsed.as_millis()
    );
    info!(
        "Batches: {}, saturated: {}, queue pops: {}",
        stats.batches, stats.saturated_batches, stats.queue_pops
    );
    info!(
        "Fallback lanes: {}, guesses: {}, unsolved: {}",
        stats.fallback_lanes, stats.guesses, stats.unsolved
    );
    println!("Failed: {}", failed);

    Ok(())
}

#[derive(StructOpt)]
enum App {
    #[structopt(name = "solve")]
    Solve(Solve),
    #[structopt(name = "bench")]
    Bench(Bench),
}

fn main() {
    env_logger::init();
    let instant = Instant::now();
    match App::from_args() {
        App::Solve(args) => solve(&args),
        App::Bench(args) => bench(&args),
    }
    .unwrap_or_else(|err| {
        for e in err.iter_chain() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    });
    let duration = instant.elapsed();
    println!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
}
