//! Game of Life CLI - Run a parallel simulation in the terminal.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread;

use gol_threads::{
    compute::{Simulation, SimulationError, SimulationStats, StopHandle, StopReason},
    display::TextRenderer,
    schema::{InputProvider, Seed, SeedError, Seeding, SimulationConfig, TextInput},
};

struct Args {
    config: SimulationConfig,
    seed_path: Option<PathBuf>,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_seed();
        return;
    }

    let Args { config, seed_path } = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    // Configuration errors are reported before anything is drawn
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let grid = match load_seed(seed_path.as_ref(), config.board_size) {
        Ok(Seeding::Ready(grid)) => grid,
        Ok(Seeding::Cancelled) => {
            println!("Configuration cancelled");
            return;
        }
        Err(e) => {
            eprintln!("Error loading seed: {}", e);
            std::process::exit(1);
        }
    };

    let simulation = Simulation::new(config.clone()).unwrap_or_else(|e| {
        eprintln!("Error starting simulation: {}", e);
        std::process::exit(1);
    });

    watch_for_quit(simulation.stop_handle());

    let initial_stats = SimulationStats::from_grid(&grid, 0);
    log::info!(
        "Seeded {}x{} board: {} live cells ({:.1}%)",
        config.board_size,
        config.board_size,
        initial_stats.live_cells,
        initial_stats.density * 100.0
    );

    let mut renderer = TextRenderer::new(io::stdout()).with_clear_screen(true);

    match simulation.run(grid, &mut renderer) {
        Ok(summary) => {
            match summary.stop_reason {
                StopReason::Completed => println!("Simulation completed!"),
                StopReason::Stopped => {
                    println!("Simulation stopped after {} generations.", summary.generations)
                }
            }
            let stats = SimulationStats::from_grid(&summary.grid, summary.generations);
            println!(
                "Live cells: {} of {} ({:.1}%)",
                stats.live_cells,
                stats.total_cells,
                stats.density * 100.0
            );
        }
        Err(SimulationError::Generation {
            generation,
            last_completed,
            grid,
            source,
        }) => {
            eprintln!("Generation {} failed: {}", generation + 1, source);
            match last_completed {
                Some(g) => eprintln!(
                    "Last completed generation: {} ({} live cells)",
                    g + 1,
                    grid.live_cells()
                ),
                None => eprintln!("No generation completed"),
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    if args.len() < 4 {
        return Err("expected board size, partition count and generation count".to_string());
    }

    let board_size = parse_count(&args[1], "M")?;
    let partitions = parse_count(&args[2], "N")?;
    let generations = parse_count(&args[3], "MAX")?;
    let mut config = SimulationConfig::new(board_size, partitions, generations);
    let mut seed_path = None;

    let mut rest = args[4..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--delay-ms" {
            let value = rest.next().ok_or("--delay-ms needs a value")?;
            config.delay_ms = value
                .parse()
                .map_err(|_| format!("invalid delay '{}'", value))?;
        } else if seed_path.is_none() {
            seed_path = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument '{}'", arg));
        }
    }

    Ok(Args { config, seed_path })
}

fn parse_count(value: &str, name: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("{} must be a non-negative integer, got '{}'", name, value))
}

fn load_seed(path: Option<&PathBuf>, board_size: usize) -> Result<Seeding, SeedError> {
    match path {
        None => Seed::default().provide(board_size),
        Some(path) if path.extension().is_some_and(|ext| ext == "json") => {
            Seed::load(path)?.provide(board_size)
        }
        Some(path) => {
            let file = File::open(path)?;
            TextInput::new(BufReader::new(file)).provide(board_size)
        }
    }
}

/// Stop the run after the current generation when `q` is entered on stdin.
fn watch_for_quit(stop: StopHandle) {
    let spawned = thread::Builder::new()
        .name("quit-watcher".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                        stop.stop();
                        return;
                    }
                    Ok(_) => {}
                    Err(_) => return,
                }
            }
        });

    if let Err(e) = spawned {
        log::warn!("Quit command unavailable: {}", e);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <M> <N> <MAX> [--delay-ms <ms>] [seed-file]", program);
    eprintln!();
    eprintln!("Run Game of Life on an MxM torus with N*N worker threads.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  M          Board size (MxM), divisible by N");
    eprintln!("  N          Sections per side (N*N threads)");
    eprintln!("  MAX        Number of generations");
    eprintln!("  seed-file  JSON seed (*.json) or text cell map (X = alive)");
    eprintln!("             Default: random soup");
    eprintln!();
    eprintln!("Type q and Enter while running to stop.");
    eprintln!("Example seed is printed with --example.");
}

fn print_example_seed() {
    let seed = Seed::default();
    let glider = Seed {
        pattern: gol_threads::Pattern::Glider { origin: (1, 1) },
    };

    println!("Example seed (seed.json):");
    match serde_json::to_string_pretty(&seed) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing seed: {}", e),
    }
    println!();
    println!("Glider seed:");
    match serde_json::to_string_pretty(&glider) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing seed: {}", e),
    }
}
