use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossterm::style::{Attribute, Color as TermColor, Stylize};
use env_logger::TimestampPrecision;
use log::LevelFilter;
use spinners::Spinner;
use twophase::cubie::CubieCube;
use twophase::error::Error;
use twophase::scramble::{gen_scramble, scramble_from_str, scramble_to_str};
use twophase::solver::{solve as solver, SolverConfig, SolverTables};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
struct Cli {
    /// Log table building and search progress.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "solves the cube using two-phase algorithm")]
    #[clap(group(
    clap::ArgGroup::new("input")
        .required(true)
        .args(&["scramble", "state"]),
    ))]
    Solve {
        #[arg(short, long)]
        scramble: Option<String>,

        /// Corner permutation, corner orientation, edge permutation and edge orientation,
        /// comma separated lists joined by '/', e.g. "1,2,3,4,5,6,7,8/0,0,0,0,0,0,0,0/...".
        #[arg(long)]
        state: Option<String>,

        #[arg(short, long, default_value_t = 30)]
        max: usize,

        /// Timeout in seconds.
        #[arg(short, long, default_value_t = 10.0)]
        timeout: f32,

        #[arg(long, default_value = "tables")]
        tables: PathBuf,

        /// Build the tables in memory only.
        #[arg(long)]
        no_cache: bool,
    },

    #[command(about = "generates scramble")]
    Scramble {
        #[arg(short, long, default_value_t = 25)]
        length: usize,

        #[arg(short, long, default_value_t = 1)]
        number: usize,
    },

    #[command(about = "builds the move and pruning tables")]
    Tables {
        #[arg(long, default_value = "tables")]
        tables: PathBuf,
    },
}

fn solve(
    scramble: &Option<String>,
    state: &Option<String>,
    config: SolverConfig,
) -> Result<(), Error> {
    let cube = match (scramble, state) {
        (Some(scramble), _) => CubieCube::from(&scramble_from_str(scramble)?),
        (None, Some(state)) => state.parse::<CubieCube>()?,
        (None, None) => return Ok(()),
    };
    config.validate()?;

    let start = Instant::now();
    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Loading tables".to_owned());
    let tables = SolverTables::load(config.table_dir.as_deref());
    spinner.stop_with_newline();

    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Solving".to_owned());
    let result = solver(&tables, &cube, &config);
    spinner.stop_with_newline();
    let result = result?;
    let end = Instant::now();

    println!("Solution: {}", scramble_to_str(&result.solution));
    println!("Move count: {}", result.solution.len());
    println!("Phase 1 moves: {}", result.phase1_length);
    println!("Solve time: {:?}", result.solve_time);
    println!("Total time: {:?}", end - start);

    Ok(())
}

fn scramble(length: usize, number: usize) {
    for _ in 0..number {
        println!("Scramble: {}", scramble_to_str(&gen_scramble(length)));
    }
}

fn tables(dir: PathBuf) {
    let start = Instant::now();
    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Building tables".to_owned());
    SolverTables::load(Some(dir.as_path()));
    spinner.stop_with_newline();
    println!("Tables in {} ready in {:?}", dir.display(), start.elapsed());
}

fn main() {
    let program = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if program.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .parse_default_env()
        .init();

    let result = match program.command {
        Some(Commands::Solve {
            scramble,
            state,
            max,
            timeout,
            tables,
            no_cache,
        }) => {
            let config = SolverConfig::default()
                .with_max_depth(max)
                .with_timeout(Duration::from_secs_f32(timeout))
                .with_table_dir(tables);
            let config = if no_cache { config.without_cache() } else { config };
            solve(&scramble, &state, config)
        }
        Some(Commands::Scramble { length, number }) => {
            scramble(length, number);
            Ok(())
        }
        Some(Commands::Tables { tables: dir }) => {
            tables(dir);
            Ok(())
        }
        None => Ok(()),
    };

    if let Err(error) = result {
        let styled = "Error:".with(TermColor::Red).attribute(Attribute::Bold);
        println!("{styled} {error}");
        std::process::exit(1);
    }
}
