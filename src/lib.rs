//! Generation core for French crossword puzzles: a pattern-indexed lexicon,
//! a word-first grid builder, a constraint-satisfaction slot solver, and
//! entry numbering/extraction, coordinated by a thin retry orchestrator.

pub mod builder;
pub mod cell;
pub mod extract;
pub mod grid;
pub mod language;
pub mod lexicon;
pub mod orchestrator;
pub mod puzzle;
pub mod solver;
pub mod vocab;

pub use builder::{BuildResult, BuilderConfig, GridBuilder};
pub use cell::{Cell, CellType, Direction};
pub use extract::{extract_and_number, Entry};
pub use grid::Grid;
pub use language::normalize;
pub use lexicon::{HybridLexicon, Lexicon, MemoryLexicon};
pub use orchestrator::{
    CandidateGenerator, ClueGenerator, ClueVariant, ExternalError, GenerateRequest, Orchestrator,
    OrchestratorError, Theme, ThemeGenerator,
};
pub use puzzle::{Clue, Clues, Metadata, Puzzle, PuzzleStatus};
pub use solver::{Crossing, Slot, Solver, SolverError};
