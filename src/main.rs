use blockmaze::{
    analysis,
    config::MazeConfig,
    generators::{RecursiveBacktracker, StepOutcome},
    grid::MazeGrid,
    grid_displays::{GridEvent, RecordingObserver},
};
use docopt::Docopt;
use log::info;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    thread,
    time::Duration,
};

const USAGE: &str = "Blockmaze

Usage:
    blockmaze_driver -h | --help
    blockmaze_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--animate] [--step-delay=<ms>] [--text-out=<path>] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n maze cells.
    --grid-width=<w>       The grid width in a w*h grid [default: 20].
    --grid-height=<h>      The grid height in a w*h grid [default: 20].
    --seed=<s>             Seed for the random choices, the same seed always carves the same maze.
    --animate              Redraw the maze on the terminal after every generation step.
    --step-delay=<ms>      Milliseconds to pause between animated steps [default: 10].
    --text-out=<path>      Output file path for a textual rendering of the maze.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_animate: bool,
    flag_step_delay: u64,
    flag_text_out: String,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Grid(::blockmaze::grid::GridError);
            Generation(::blockmaze::generators::GenerationError);
        }
    }
}
use crate::errors::*;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    let config = MazeConfig::new(width, height, args.flag_seed)?;

    // Stands in for a renderer: it sees every block spawned and despawned.
    let blocks = RecordingObserver::new();
    let mut maze_grid = config.build_grid(Some(Box::new(blocks.clone())))?;

    let steps = if args.flag_animate {
        animate_generation(&mut maze_grid, &config, Duration::from_millis(args.flag_step_delay))?
    } else {
        RecursiveBacktracker::new(&mut maze_grid, config.rng()).run_to_completion()?
    };

    let spawned = blocks.events()
        .iter()
        .filter(|event| match event {
            GridEvent::CellCreated(_, is_wall) => *is_wall,
            GridEvent::WallCleared(_) => false,
        })
        .count();
    info!("{}x{} maze generated in {} steps, {} of {} wall blocks removed",
          width,
          height,
          steps,
          blocks.cleared_walls().len(),
          spawned);

    if args.flag_text_out.is_empty() {
        if !args.flag_animate {
            print!("{}", maze_grid);
        }
    } else {
        write_text_to_file(&format!("{}", maze_grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if !args.flag_save_edges.is_empty() {
        write_text_to_file(&analysis::edges_text(&maze_grid), &args.flag_save_edges)
            .chain_err(|| format!("Failed to write maze graph to text file {}", args.flag_save_edges))?;
    }

    Ok(())
}

/// Drive the generator one step at a time, redrawing the maze after each step.
fn animate_generation(maze_grid: &mut MazeGrid, config: &MazeConfig, delay: Duration) -> Result<usize> {
    let mut generator = RecursiveBacktracker::new(maze_grid, config.rng());
    generator.start_generation()?;

    let stdout = io::stdout();
    loop {
        let outcome = generator.step()?;
        if outcome == StepOutcome::Finished {
            break;
        }

        let mut out = stdout.lock();
        write!(out, "{}{}", CLEAR_SCREEN, generator.grid())?;
        writeln!(out, "step {}: {:?}", generator.steps_taken(), outcome)?;
        out.flush()?;
        thread::sleep(delay);
    }

    Ok(generator.steps_taken())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
