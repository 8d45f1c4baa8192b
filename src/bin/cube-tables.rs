use clap::{Parser, Subcommand};
use cube_solver::cube333::discovery::{discover, CancelToken, DiscoveryConfig};
use cube_solver::cube333::solver::{LookupTables, Solver};
use cube_solver::cube333::{Color, Cube};
use env_logger::TimestampPrecision;
use log::{info, LevelFilter};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

/// Derive solver tables, search the cube's state graph and solve cubes.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// How much to log: warnings by default, then info, debug and trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    log_level: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive every lookup table the solver uses and write them as JSON.
    Tables {
        #[arg(short, long, default_value = "tables.json")]
        output: PathBuf,
    },
    /// Search outwards from a solved cube with the eighteen quarter turns and dump every pattern
    /// reached.
    Search {
        #[arg(short, long, default_value_t = 3)]
        depth: usize,
        /// Stop once this many states have been put on the frontier.
        #[arg(long)]
        max_frontier: Option<usize>,
        /// Only tell stickers of these colors apart, e.g. `Y` or `WR`.
        #[arg(short, long)]
        mask: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Solve a cube and print the moves.
    Solve {
        /// The cube as 54 color letters, face by face in the order U D L R F B.
        #[arg(short, long, conflicts_with = "seed")]
        state: Option<String>,
        /// Solve a scramble made from this seed instead.
        #[arg(long)]
        seed: Option<u64>,
        /// Tables written by `tables`. They are derived on the spot when left out.
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },
}

fn parse_mask(mask: &str) -> Result<Vec<Color>, String> {
    mask.chars()
        .map(|c| {
            Color::from_char(c.to_ascii_uppercase()).ok_or_else(|| format!("{c:?} is not a color"))
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Tables { output } => {
            let tables = LookupTables::discover()?;
            tables.save(&output)?;
            info!("wrote {}", output.display());
        }
        Commands::Search {
            depth,
            max_frontier,
            mask,
            output,
        } => {
            let mut config = DiscoveryConfig {
                max_depth: depth,
                ..Default::default()
            };
            if let Some(max_frontier) = max_frontier {
                config.max_frontier = max_frontier;
            }
            let keep = mask.as_deref().map(parse_mask).transpose()?;

            let outcome = discover(
                &Cube::new(),
                &config,
                |cube| match &keep {
                    Some(colors) => cube.to_masked_pattern(colors),
                    None => cube.to_sticker_string(),
                },
                &CancelToken::new(),
            )?;
            outcome.save(&output)?;
            println!(
                "{:?}: {} patterns, {} pushed, {} popped, {} stale",
                outcome.status,
                outcome.stats.recorded,
                outcome.stats.pushed,
                outcome.stats.popped,
                outcome.stats.stale
            );
        }
        Commands::Solve {
            state,
            seed,
            tables,
        } => {
            let cube = match (state, seed) {
                (Some(state), _) => state.parse::<Cube>()?,
                (None, seed) => {
                    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
                    let (cube, scramble) = Cube::scrambled(seed);
                    println!("scramble: {scramble}");
                    cube
                }
            };
            if !cube.is_legal() {
                return Err(format!("{cube} is not a legal cube: {:?}", cube.invariants()).into());
            }

            let tables = match tables {
                Some(path) => LookupTables::load(path)?,
                None => LookupTables::discover()?,
            };
            let mut solver = Solver::new(cube, Arc::new(tables));
            solver.solve()?;
            println!("{}", solver.solution());
        }
    }
    Ok(())
}
