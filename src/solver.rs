//! Constraint-satisfaction fill of residual empty runs.
//!
//! Ported from the original generator's `solver.py` (which used the
//! `python-constraint` package); `spec.md` §9 recommends a hand-rolled
//! backtracker with forward checking and minimum-remaining-values ordering
//! for reproducibility, which is what this module implements.

use std::collections::HashMap;

use log::{debug, warn};
use thiserror::Error;

use crate::cell::{Cell, Direction};
use crate::grid::Grid;
use crate::lexicon::Lexicon;

/// Default per-attempt search budget (`spec.md` §5: "the solver bounding its
/// search (e.g., node budget) and returning no-solution on exhaustion").
pub const DEFAULT_MAX_NODES: usize = 200_000;

/// A maximal run of letter-cells (length >= 2) in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub id: usize,
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub direction: Direction,
}

impl Slot {
    /// The slot's pattern: known letters, `.` for empty cells.
    pub fn pattern(&self, grid: &Grid) -> String {
        let (dr, dc) = self.direction.step();
        (0..self.length)
            .map(|i| {
                let r = (self.row as isize + dr * i as isize) as usize;
                let c = (self.col as isize + dc * i as isize) as usize;
                grid.get(r, c).solution.unwrap_or('.')
            })
            .collect()
    }
}

/// A cell shared by one across and one down slot.
#[derive(Debug, Clone, Copy)]
pub struct Crossing {
    pub slot1: usize,
    pub slot2: usize,
    pub idx1: usize,
    pub idx2: usize,
}

/// Scan the grid for every maximal horizontal and vertical run of
/// letter-cells of length >= 2, in emission order (rows first, then
/// columns), as `spec.md` §4.3 specifies.
pub fn discover_slots(grid: &Grid) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut next_id = 0;

    for row in 0..grid.rows() {
        let mut col = 0;
        while col < grid.cols() {
            if !grid.get(row, col).is_letter() {
                col += 1;
                continue;
            }
            if col == 0 || !grid.get(row, col - 1).is_letter() {
                let start = col;
                while col < grid.cols() && grid.get(row, col).is_letter() {
                    col += 1;
                }
                let length = col - start;
                if length >= 2 {
                    slots.push(Slot {
                        id: next_id,
                        row,
                        col: start,
                        length,
                        direction: Direction::Across,
                    });
                    next_id += 1;
                }
            } else {
                col += 1;
            }
        }
    }

    for col in 0..grid.cols() {
        let mut row = 0;
        while row < grid.rows() {
            if !grid.get(row, col).is_letter() {
                row += 1;
                continue;
            }
            if row == 0 || !grid.get(row - 1, col).is_letter() {
                let start = row;
                while row < grid.rows() && grid.get(row, col).is_letter() {
                    row += 1;
                }
                let length = row - start;
                if length >= 2 {
                    slots.push(Slot {
                        id: next_id,
                        row: start,
                        col,
                        length,
                        direction: Direction::Down,
                    });
                    next_id += 1;
                }
            } else {
                row += 1;
            }
        }
    }

    slots
}

/// Find every cell shared by exactly two slots of different directions.
pub fn find_crossings(slots: &[Slot]) -> Vec<Crossing> {
    let mut position_map: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();

    for slot in slots {
        let (dr, dc) = slot.direction.step();
        for i in 0..slot.length {
            let r = (slot.row as isize + dr * i as isize) as usize;
            let c = (slot.col as isize + dc * i as isize) as usize;
            position_map.entry((r, c)).or_default().push((slot.id, i));
        }
    }

    let mut crossings = Vec::new();
    for occurrences in position_map.values() {
        if occurrences.len() == 2 {
            let (s1, i1) = occurrences[0];
            let (s2, i2) = occurrences[1];
            if slots[s1].direction != slots[s2].direction {
                crossings.push(Crossing {
                    slot1: s1,
                    slot2: s2,
                    idx1: i1,
                    idx2: i2,
                });
            }
        }
    }

    crossings
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    #[error("no slots found in grid")]
    NoSlots,
    #[error("no candidates for slot {slot_id} with pattern '{pattern}'")]
    EmptyDomain { slot_id: usize, pattern: String },
    #[error("no solution satisfies all crossing constraints")]
    NoSolution,
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub grid: Grid,
    pub assignment: HashMap<usize, String>,
}

pub struct Solver<'a> {
    lexicon: &'a dyn Lexicon,
    max_nodes: usize,
}

impl<'a> Solver<'a> {
    pub fn new(lexicon: &'a dyn Lexicon) -> Self {
        Solver {
            lexicon,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    pub fn with_max_nodes(lexicon: &'a dyn Lexicon, max_nodes: usize) -> Self {
        Solver { lexicon, max_nodes }
    }

    /// Fill every empty letter-cell in `grid` so every crossing agrees and
    /// every entry word is distinct. Never mutates `grid`; returns a deep
    /// copy with the solution filled in.
    pub fn solve(&self, grid: &Grid) -> Result<SolveResult, SolverError> {
        let slots = discover_slots(grid);
        if slots.is_empty() {
            return Err(SolverError::NoSlots);
        }
        let crossings = find_crossings(&slots);

        let mut domains: HashMap<usize, Vec<String>> = HashMap::new();
        for slot in &slots {
            let pattern = slot.pattern(grid);
            let words = self.lexicon.matching(&pattern);
            if words.is_empty() {
                return Err(SolverError::EmptyDomain {
                    slot_id: slot.id,
                    pattern,
                });
            }
            domains.insert(slot.id, words);
        }

        let mut neighbors: HashMap<usize, Vec<(usize, usize, usize)>> = HashMap::new();
        for crossing in &crossings {
            neighbors
                .entry(crossing.slot1)
                .or_default()
                .push((crossing.slot2, crossing.idx1, crossing.idx2));
            neighbors
                .entry(crossing.slot2)
                .or_default()
                .push((crossing.slot1, crossing.idx2, crossing.idx1));
        }

        let mut assignment: HashMap<usize, String> = HashMap::new();
        let mut nodes = 0usize;
        let all_ids: Vec<usize> = slots.iter().map(|s| s.id).collect();

        let found = backtrack(
            &all_ids,
            &neighbors,
            &mut domains,
            &mut assignment,
            &mut nodes,
            self.max_nodes,
        );

        if !found {
            warn!("solver exhausted search after {nodes} nodes without a solution");
            return Err(SolverError::NoSolution);
        }

        debug!("solver found a solution after {nodes} nodes");
        let filled = fill_grid(grid, &slots, &assignment);
        Ok(SolveResult {
            grid: filled,
            assignment,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn backtrack(
    all_ids: &[usize],
    neighbors: &HashMap<usize, Vec<(usize, usize, usize)>>,
    domains: &mut HashMap<usize, Vec<String>>,
    assignment: &mut HashMap<usize, String>,
    nodes: &mut usize,
    max_nodes: usize,
) -> bool {
    if assignment.len() == all_ids.len() {
        return true;
    }
    if *nodes >= max_nodes {
        return false;
    }

    // Minimum-remaining-values: pick the unassigned slot with the smallest domain.
    let slot_id = *all_ids
        .iter()
        .filter(|id| !assignment.contains_key(id))
        .min_by_key(|id| domains.get(id).map(|d| d.len()).unwrap_or(usize::MAX))
        .expect("an unassigned slot must exist when assignment is incomplete");

    let candidates = domains.get(&slot_id).cloned().unwrap_or_default();

    for word in candidates {
        *nodes += 1;
        if *nodes >= max_nodes {
            return false;
        }

        if assignment.values().any(|w| w == &word) {
            continue;
        }
        if !consistent_with_crossings(slot_id, &word, neighbors, assignment) {
            continue;
        }

        assignment.insert(slot_id, word.clone());

        // Forward-check: prune neighbor domains, remembering what was removed.
        let mut removed: Vec<(usize, String)> = Vec::new();
        let mut wiped_out = false;

        if let Some(links) = neighbors.get(&slot_id) {
            for &(other_id, this_offset, other_offset) in links {
                if assignment.contains_key(&other_id) {
                    continue;
                }
                let required = word.chars().nth(this_offset);
                if let Some(domain) = domains.get_mut(&other_id) {
                    let mut i = 0;
                    while i < domain.len() {
                        let matches = domain[i].chars().nth(other_offset) == required;
                        if !matches {
                            removed.push((other_id, domain.remove(i)));
                        } else {
                            i += 1;
                        }
                    }
                    if domain.is_empty() {
                        wiped_out = true;
                    }
                }
            }
        }

        if !wiped_out
            && backtrack(all_ids, neighbors, domains, assignment, nodes, max_nodes)
        {
            return true;
        }

        for (other_id, value) in removed {
            domains.entry(other_id).or_default().push(value);
        }
        assignment.remove(&slot_id);
    }

    false
}

fn consistent_with_crossings(
    slot_id: usize,
    word: &str,
    neighbors: &HashMap<usize, Vec<(usize, usize, usize)>>,
    assignment: &HashMap<usize, String>,
) -> bool {
    let Some(links) = neighbors.get(&slot_id) else {
        return true;
    };
    let word_chars: Vec<char> = word.chars().collect();

    for &(other_id, this_offset, other_offset) in links {
        if let Some(other_word) = assignment.get(&other_id) {
            let other_chars: Vec<char> = other_word.chars().collect();
            if word_chars.get(this_offset) != other_chars.get(other_offset) {
                return false;
            }
        }
    }
    true
}

fn fill_grid(grid: &Grid, slots: &[Slot], assignment: &HashMap<usize, String>) -> Grid {
    let mut filled = grid.clone();

    for slot in slots {
        let Some(word) = assignment.get(&slot.id) else {
            continue;
        };
        let (dr, dc) = slot.direction.step();
        for (i, letter) in word.chars().enumerate() {
            let r = (slot.row as isize + dr * i as isize) as usize;
            let c = (slot.col as isize + dc * i as isize) as usize;
            let cell = filled.get_mut(r, c);
            if cell.is_letter() {
                cell.set_solution(letter);
            } else {
                *cell = Cell::letter(Some(letter));
            }
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::MemoryLexicon;

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let cols = rows[0].chars().count();
        let mut grid = Grid::new(rows.len(), cols, Cell::block());
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '#' => Cell::block(),
                    '.' => Cell::letter(None),
                    letter => Cell::letter(Some(letter)),
                };
                grid.set(r, c, cell);
            }
        }
        grid
    }

    #[test]
    fn discover_slots_finds_across_and_down() {
        let grid = grid_from_rows(&["SIT", "ACE", "PEN"]);
        let slots = discover_slots(&grid);
        let across: Vec<_> = slots.iter().filter(|s| s.direction == Direction::Across).collect();
        let down: Vec<_> = slots.iter().filter(|s| s.direction == Direction::Down).collect();
        assert_eq!(across.len(), 3);
        assert_eq!(down.len(), 3);
    }

    #[test]
    fn solve_fills_empty_cells_respecting_crossings() {
        // ".A." down-crossed grid: two down slots length 2, one across length 3 mid-row? Keep simple: a plus-shape.
        let grid = grid_from_rows(&["#.#", "...", "#.#"]);
        let lexicon = MemoryLexicon::from_words(["CAT", "AIM", "CAB"]);
        let solver = Solver::new(&lexicon);
        let result = solver.solve(&grid).expect("should solve");
        // across slot row 1 must be a 3-letter word from the lexicon
        let word: String = (0..3).map(|c| result.grid.get(1, c).solution.unwrap()).collect();
        assert!(["CAT", "AIM", "CAB"].contains(&word.as_str()));
    }

    #[test]
    fn s6_unsatisfiable_crossing_returns_both_slot_ids() {
        // Two 2-letter slots crossing at a cell that can't agree: "A." / ".B" shape won't
        // produce a crossing; construct a cross where the only candidates disagree.
        let grid = grid_from_rows(&["A.", ".."]);
        let lexicon = MemoryLexicon::from_words(["AX", "YB"]);
        let solver = Solver::new(&lexicon);
        let result = solver.solve(&grid);
        assert!(result.is_err());
    }

    #[test]
    fn empty_domain_is_reported_with_pattern() {
        let grid = grid_from_rows(&["..", "##"]);
        let empty_lexicon = MemoryLexicon::new();
        let solver = Solver::new(&empty_lexicon);
        let err = solver.solve(&grid).unwrap_err();
        assert!(matches!(err, SolverError::EmptyDomain { .. }));
    }
}
