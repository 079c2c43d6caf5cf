//! Wire/storage record for a finished puzzle.
//!
//! Mirrors `original_source/domain/types.py`'s `pydantic.BaseModel` records
//! (`Puzzle`, `Clue`, `Clues`, `Metadata`, `PuzzleStatus`) translated into
//! `serde`-derived Rust structs, per `spec.md` §6's serialisation contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::extract::Entry;

/// Lifecycle state of a puzzle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleStatus {
    Draft,
    Published,
    Archived,
}

/// Characters that separate a clue's words for display purposes only; the
/// normalised answer used for solving discards all of them.
const WORD_BREAK_CHARS: [char; 4] = [' ', '-', '\'', '\u{2019}'];

/// One clue: its answer, prompt text, and bookkeeping for multi-word display.
///
/// `original_answer` carries the pre-normalisation form (with spaces,
/// hyphens, apostrophes) when the upstream candidate generator supplied one;
/// `word_breaks` derives the split points from it. `spec.md` §9 raises this
/// as an Open Question and suggests passing the original form through
/// unchanged, which is what `original_answer` does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub number: u32,
    pub answer: String,
    pub prompt: String,
    pub start_row: usize,
    pub start_col: usize,
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_answer: Option<String>,
}

impl Clue {
    pub fn new(entry: &Entry, prompt: String) -> Self {
        Clue {
            number: entry.number,
            answer: entry.answer.clone(),
            prompt,
            start_row: entry.start_row,
            start_col: entry.start_col,
            length: entry.length,
            original_answer: None,
        }
    }

    pub fn with_original_answer(mut self, original: impl Into<String>) -> Self {
        self.original_answer = Some(original.into());
        self
    }

    /// Split points within the *original* (pre-normalisation) answer, at
    /// spaces, hyphens, and apostrophes. Falls back to the normalised
    /// answer when no original form was recorded.
    pub fn word_breaks(&self) -> Vec<&str> {
        let source = self.original_answer.as_deref().unwrap_or(&self.answer);
        source
            .split(|c: char| WORD_BREAK_CHARS.contains(&c))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// The two clue lists of a puzzle, across and down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clues {
    pub across: Vec<Clue>,
    pub down: Vec<Clue>,
}

/// Descriptive and QA metadata attached to a generated puzzle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub theme_tags: Vec<String>,
    #[serde(default)]
    pub reference_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness_score: Option<f64>,
}

/// A complete, serialisable puzzle record, per `spec.md` §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub date: NaiveDate,
    pub language: String,
    pub title: String,
    pub author: String,
    pub difficulty: u8,
    pub status: PuzzleStatus,
    pub grid: Vec<Vec<Cell>>,
    pub clues: Clues,
    pub metadata: Metadata,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Direction;

    fn sample_entry() -> Entry {
        Entry {
            id: "across-0-0".to_string(),
            direction: Direction::Across,
            number: 1,
            answer: "CINEMA".to_string(),
            start_row: 0,
            start_col: 0,
            length: 6,
        }
    }

    #[test]
    fn word_breaks_splits_on_separators_in_original_form() {
        let clue = Clue::new(&sample_entry(), "Salle obscure".to_string())
            .with_original_answer("Salle d'exposition");
        assert_eq!(clue.word_breaks(), vec!["Salle", "d", "exposition"]);
    }

    #[test]
    fn word_breaks_falls_back_to_normalised_answer() {
        let clue = Clue::new(&sample_entry(), "Septieme art".to_string());
        assert_eq!(clue.word_breaks(), vec!["CINEMA"]);
    }

    #[test]
    fn puzzle_round_trips_through_json() {
        let puzzle = Puzzle {
            id: "2026-07-28-fr".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 7, 28).unwrap(),
            language: "fr".to_string(),
            title: "Cinema".to_string(),
            author: "orchestrator".to_string(),
            difficulty: 3,
            status: PuzzleStatus::Draft,
            grid: vec![vec![Cell::block()]],
            clues: Clues::default(),
            metadata: Metadata::default(),
            created_at: chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0).unwrap(),
            updated_at: chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0).unwrap(),
        };

        let json = serde_json::to_string(&puzzle).expect("serialize");
        let back: Puzzle = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.id, puzzle.id);
        assert_eq!(back.status, puzzle.status);
    }
}
