use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a slot or placed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// The perpendicular direction, used when a placed word crosses another.
    pub fn perpendicular(self) -> Direction {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// Row/column step for walking a word or slot one cell at a time.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Down => (1, 0),
            Direction::Across => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Kind of cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Holds a solution letter, filled in by the player.
    Letter,
    /// Opaque filler, never part of a slot.
    Block,
    /// Displays definition text (mots-fléchés rendering); unused by the core.
    Clue,
}

/// A single cell in the crossword grid.
///
/// Invariant: only `Letter` cells carry a solution, and a solution once set
/// is never overwritten with a conflicting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "type")]
    pub kind: CellType,
    pub solution: Option<char>,
    pub number: Option<u32>,
    pub clue_across: Option<String>,
    pub clue_down: Option<String>,
}

impl Cell {
    pub fn block() -> Self {
        Cell {
            kind: CellType::Block,
            solution: None,
            number: None,
            clue_across: None,
            clue_down: None,
        }
    }

    pub fn letter(solution: Option<char>) -> Self {
        Cell {
            kind: CellType::Letter,
            solution,
            number: None,
            clue_across: None,
            clue_down: None,
        }
    }

    pub fn is_letter(&self) -> bool {
        matches!(self.kind, CellType::Letter)
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, CellType::Block)
    }

    pub fn is_clue(&self) -> bool {
        matches!(self.kind, CellType::Clue)
    }

    /// Set the solution letter. Never overwrites a conflicting existing value;
    /// returns `false` if the existing solution disagrees.
    pub fn set_solution(&mut self, letter: char) -> bool {
        match self.solution {
            Some(existing) if existing != letter => false,
            _ => {
                self.solution = Some(letter);
                true
            }
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CellType::Block => write!(f, "#"),
            CellType::Clue => write!(f, "*"),
            CellType::Letter => match self.solution {
                Some(c) => write!(f, "{c}"),
                None => write!(f, "."),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_solution_rejects_conflict() {
        let mut cell = Cell::letter(Some('A'));
        assert!(!cell.set_solution('B'));
        assert_eq!(cell.solution, Some('A'));
        assert!(cell.set_solution('A'));
    }

    #[test]
    fn block_is_never_a_letter() {
        let cell = Cell::block();
        assert!(cell.is_block());
        assert!(!cell.is_letter());
    }

    #[test]
    fn direction_perpendicular_round_trips() {
        assert_eq!(Direction::Across.perpendicular(), Direction::Down);
        assert_eq!(Direction::Down.perpendicular(), Direction::Across);
    }
}
