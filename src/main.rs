use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cruciverbe::{extract_and_number, BuildResult, BuilderConfig, Cell, CellType, Grid, GridBuilder, Solver};
use log::info;
use thiserror::Error;

static WORDLIST_DIR: &str = "wordlists";
static PUZZLE_DIR: &str = "puzzles";
static SELECTION_TARGET_WORDS: usize = 15;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
/// A command line utility for building and solving French crossword grids.
struct Cli {
    /// Base name shared by a wordlist file and its puzzle grid file.
    name: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a grid from `wordlists/<name>.txt` and save it as `puzzles/<name>.grid`.
    Build(Build),
    /// Fill every remaining empty cell of a saved grid via the CSP solver.
    Solve,
    /// Print a saved grid.
    Display,
    /// Number the entries of a saved (ideally solved) grid and print them.
    Numbers,
}

#[derive(Args)]
struct Build {
    #[arg(default_value_t = 10)]
    max_rows: usize,
    #[arg(default_value_t = 10)]
    max_cols: usize,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("{path} line {line}: unrecognised cell character '{ch}'")]
    Parse { path: PathBuf, line: usize, ch: char },
}

fn wordlist_path(name: &str) -> PathBuf {
    Path::new(WORDLIST_DIR).join(format!("{name}.txt"))
}

fn grid_path(name: &str) -> PathBuf {
    Path::new(PUZZLE_DIR).join(format!("{name}.grid"))
}

fn read_words(path: &Path) -> Result<Vec<String>, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(contents
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

fn read_grid(path: &Path) -> Result<Grid, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<&str> = contents.lines().collect();
    let cols = lines.first().map(|l| l.chars().count()).unwrap_or(0);
    let mut grid = Grid::new(lines.len(), cols, Cell::block());

    for (r, line) in lines.iter().enumerate() {
        for (c, ch) in line.chars().enumerate() {
            let cell = match ch {
                '#' => Cell::block(),
                '.' => Cell::letter(None),
                letter if letter.is_ascii_uppercase() => Cell::letter(Some(letter)),
                ch => {
                    return Err(CliError::Parse {
                        path: path.to_path_buf(),
                        line: r + 1,
                        ch,
                    })
                }
            };
            grid.set(r, c, cell);
        }
    }

    Ok(grid)
}

fn write_grid(path: &Path, grid: &Grid) -> Result<(), CliError> {
    let mut text = String::new();
    for row in grid.rows_iter() {
        for cell in row {
            let ch = match cell.kind {
                CellType::Block => '#',
                CellType::Clue => '*',
                CellType::Letter => cell.solution.unwrap_or('.'),
            };
            text.push(ch);
        }
        text.push('\n');
    }
    fs::write(path, text).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn build(name: &str, opts: &Build) -> Result<(), CliError> {
    let candidates = read_words(&wordlist_path(name))?;
    let builder = GridBuilder::new(BuilderConfig {
        max_rows: opts.max_rows,
        max_cols: opts.max_cols,
        target_words: SELECTION_TARGET_WORDS,
        seed: opts.seed,
    });

    let BuildResult {
        grid,
        placed_words,
        success,
    } = builder.build(&candidates);

    info!("build placed {} words, success={success}", placed_words.len());
    println!("{grid}");
    println!("placed: {}", placed_words.join(", "));
    if !success {
        println!("warning: fewer than 8 words placed");
    }

    write_grid(&grid_path(name), &grid)
}

fn solve(name: &str) -> Result<(), CliError> {
    let grid = read_grid(&grid_path(name))?;

    let primary = read_words(&wordlist_path(name)).unwrap_or_default();
    let mut lexicon = cruciverbe::vocab::new_hybrid_lexicon();
    lexicon.set_primary_words(&primary);

    let solver = Solver::new(&lexicon);
    match solver.solve(&grid) {
        Ok(result) => {
            println!("{}", result.grid);
            write_grid(&grid_path(name), &result.grid)?;
        }
        Err(e) => println!("solve failed: {e}"),
    }
    Ok(())
}

fn display(name: &str) -> Result<(), CliError> {
    let grid = read_grid(&grid_path(name))?;
    println!("{grid}");
    Ok(())
}

fn numbers(name: &str) -> Result<(), CliError> {
    let grid = read_grid(&grid_path(name))?;
    let (numbered, across, down) = extract_and_number(&grid);
    println!("{numbered}");
    for entry in across.iter().chain(down.iter()) {
        println!(
            "{:>3} {:<6} {} ({},{})",
            entry.number, entry.direction, entry.answer, entry.start_row, entry.start_col
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = fs::create_dir_all(WORDLIST_DIR).and_then(|_| fs::create_dir_all(PUZZLE_DIR)) {
        eprintln!("error creating working directories: {e}");
        return;
    }

    let cli = Cli::parse();
    let name = cli.name;

    let result = match &cli.command {
        Commands::Build(opts) => build(&name, opts),
        Commands::Solve => solve(&name),
        Commands::Display => display(&name),
        Commands::Numbers => numbers(&name),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
