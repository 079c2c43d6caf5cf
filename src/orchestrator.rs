//! Coordinating shell: retries the full pipeline, talking to external
//! theme/candidate/clue generators only through traits.
//!
//! Ported from the original generator's `orchestrator.py`. The concrete
//! LLM-backed generators stay outside this crate (`spec.md` §1); only the
//! trait contracts and the retry/QA-scoring shell live here.

use std::collections::HashSet;

use log::{info, warn};
use thiserror::Error;

use crate::builder::{BuilderConfig, GridBuilder};
use crate::extract::{extract_and_number, Entry};
use crate::lexicon::Lexicon;
use crate::puzzle::{Clue, Clues, Metadata, Puzzle, PuzzleStatus};
use crate::solver::{Solver, SolverError};
use crate::vocab;

/// Theme, keywords, and seed words for one generation attempt.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub seed_words: Vec<String>,
    pub difficulty: u8,
}

/// One candidate clue prompt for an answer.
#[derive(Debug, Clone)]
pub struct ClueVariant {
    pub prompt: String,
    pub difficulty: u8,
    pub ambiguity_notes: Option<String>,
}

/// Raised by an external collaborator on a recoverable failure (network
/// error, rate limit, malformed model response), the orchestrator retries
/// the whole attempt on this.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ExternalError(pub String);

pub trait ThemeGenerator {
    fn generate_for_date(&self, date: &str, difficulty: u8) -> Result<Theme, ExternalError>;
}

pub trait CandidateGenerator {
    fn expand_seed_words(
        &self,
        seeds: &[String],
        title: &str,
        count: usize,
    ) -> Result<Vec<String>, ExternalError>;
}

pub trait ClueGenerator {
    fn generate(&self, answer: &str, difficulty: u8) -> Result<Vec<ClueVariant>, ExternalError>;
    fn select_best_clue(&self, variants: &[ClueVariant], target: u8) -> Option<ClueVariant>;
}

/// Parameters for one puzzle generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub date: String,
    pub language: String,
    pub difficulty: u8,
    pub max_size: usize,
    pub max_attempts: usize,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        GenerateRequest {
            date: String::new(),
            language: "fr".to_string(),
            difficulty: 3,
            max_size: 10,
            max_attempts: 3,
        }
    }
}

/// QA evaluation of a successfully assembled puzzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QaReport {
    pub fill_score: u32,
    pub clue_score: u32,
    pub freshness_score: u32,
}

#[derive(Debug, Clone)]
pub struct DraftBundle {
    pub puzzle: Puzzle,
    pub report: QaReport,
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("transient external generator error: {0}")]
    Transient(String),
    #[error("no candidates match slot {slot_id} pattern '{pattern}'")]
    EmptyDomain { slot_id: usize, pattern: String },
    #[error("no assignment satisfies all crossing constraints")]
    Unsatisfiable,
    #[error("grid building failed - fewer than 8 words placed")]
    SparseBuild,
    #[error("generation attempts exhausted: {last_error}")]
    AttemptsExhausted { last_error: String },
}

/// Coordinates one pipeline run: theme -> candidates -> build -> solve ->
/// extract/number -> clues -> QA score, retrying on any recoverable error.
pub struct Orchestrator<'a> {
    theme_gen: &'a dyn ThemeGenerator,
    candidate_gen: &'a dyn CandidateGenerator,
    clue_gen: &'a dyn ClueGenerator,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        theme_gen: &'a dyn ThemeGenerator,
        candidate_gen: &'a dyn CandidateGenerator,
        clue_gen: &'a dyn ClueGenerator,
    ) -> Self {
        Orchestrator {
            theme_gen,
            candidate_gen,
            clue_gen,
        }
    }

    pub fn generate(&self, request: &GenerateRequest) -> Result<DraftBundle, OrchestratorError> {
        let mut last_error = OrchestratorError::Transient("no attempts made".to_string());

        for attempt in 1..=request.max_attempts {
            match self.generate_attempt(request, attempt as u64) {
                Ok(bundle) => return Ok(bundle),
                Err(err) => {
                    warn!("generation attempt {attempt} failed: {err}");
                    last_error = err;
                }
            }
        }

        Err(OrchestratorError::AttemptsExhausted {
            last_error: last_error.to_string(),
        })
    }

    fn generate_attempt(
        &self,
        request: &GenerateRequest,
        attempt: u64,
    ) -> Result<DraftBundle, OrchestratorError> {
        let theme = self
            .theme_gen
            .generate_for_date(&request.date, request.difficulty)
            .map_err(|e| OrchestratorError::Transient(e.0))?;

        let expanded = self
            .candidate_gen
            .expand_seed_words(&theme.seed_words, &theme.title, 50)
            .map_err(|e| OrchestratorError::Transient(e.0))?;

        let mut all_candidates: HashSet<String> = theme.seed_words.iter().cloned().collect();
        all_candidates.extend(expanded);
        let all_candidates: Vec<String> = all_candidates.into_iter().collect();

        let mut lexicon = vocab::new_hybrid_lexicon();
        lexicon.set_primary_words(&all_candidates);

        let builder = GridBuilder::new(BuilderConfig {
            max_rows: request.max_size,
            max_cols: request.max_size,
            target_words: all_candidates.len().min(15),
            seed: Some(attempt),
        });
        let build_result = builder.build(&lexicon.words());

        if !build_result.success {
            return Err(OrchestratorError::SparseBuild);
        }

        let has_unfilled = build_result
            .grid
            .cells_row_major()
            .any(|(_, _, cell)| cell.is_letter() && cell.solution.is_none());

        let grid = if has_unfilled {
            let solver = Solver::new(&lexicon);
            solver
                .solve(&build_result.grid)
                .map_err(|e| match e {
                    SolverError::EmptyDomain { slot_id, pattern } => {
                        OrchestratorError::EmptyDomain { slot_id, pattern }
                    }
                    SolverError::NoSolution | SolverError::NoSlots => {
                        OrchestratorError::Unsatisfiable
                    }
                })?
                .grid
        } else {
            build_result.grid.clone()
        };

        let (numbered_grid, across_entries, down_entries) = extract_and_number(&grid);

        let across_clues = self.clues_for_entries(&across_entries, request.difficulty);
        let down_clues = self.clues_for_entries(&down_entries, request.difficulty);

        let all_entries: Vec<&Entry> = across_entries.iter().chain(down_entries.iter()).collect();
        let freshness = calculate_freshness(&all_entries);

        let now = chrono::Utc::now();
        let puzzle = Puzzle {
            id: format!("{}-{attempt}", request.date),
            date: chrono::NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
                .map_err(|_| OrchestratorError::Transient(format!("invalid date {}", request.date)))?,
            language: request.language.clone(),
            title: theme.title.clone(),
            author: "orchestrator".to_string(),
            difficulty: request.difficulty,
            status: PuzzleStatus::Draft,
            grid: numbered_grid.rows_iter().map(|row| row.to_vec()).collect(),
            clues: Clues {
                across: across_clues,
                down: down_clues,
            },
            metadata: Metadata {
                theme_tags: theme.keywords.clone(),
                reference_tags: Vec::new(),
                notes: None,
                freshness_score: Some(freshness as f64),
            },
            created_at: now,
            updated_at: now,
        };

        let report = score_puzzle(&puzzle);

        info!("generated puzzle '{}' on attempt {attempt}", puzzle.title);
        Ok(DraftBundle { puzzle, report })
    }

    fn clues_for_entries(&self, entries: &[Entry], difficulty: u8) -> Vec<Clue> {
        entries
            .iter()
            .map(|entry| {
                let prompt = self
                    .clue_gen
                    .generate(&entry.answer, difficulty)
                    .ok()
                    .and_then(|variants| self.clue_gen.select_best_clue(&variants, difficulty))
                    .map(|v| v.prompt)
                    .unwrap_or_else(|| format!("Mot de {} lettres", entry.length));
                Clue::new(entry, prompt)
            })
            .collect()
    }
}

const MODERN_WORDS: &[&str] = &[
    "NETFLIX", "SPOTIFY", "TIKTOK", "INSTAGRAM", "TWITTER", "PODCAST", "SELFIE", "HASHTAG",
    "VIRAL", "STREAM", "APPLI", "CLOUD", "EMOJI", "MEME", "TREND", "WIFI", "DRONE", "CRYPTO",
    "GAMING", "VLOG",
];

/// Ratio of answers referencing modern culture, scaled to 0-100.
fn calculate_freshness(entries: &[&Entry]) -> u32 {
    if entries.is_empty() {
        return 50;
    }
    let modern_count = entries
        .iter()
        .filter(|e| MODERN_WORDS.contains(&e.answer.as_str()))
        .count();
    let ratio = modern_count as f64 / entries.len() as f64;
    (50.0 + ratio * 100.0).min(100.0) as u32
}

/// Fill-score from letter-cell density, clue-score from entry count,
/// freshness passed through from metadata. Ported from `_score_puzzle`.
fn score_puzzle(puzzle: &Puzzle) -> QaReport {
    let rows = puzzle.grid.len();
    let cols = puzzle.grid.first().map(|r| r.len()).unwrap_or(0);
    let total_cells = rows * cols;
    let letter_cells = puzzle.grid.iter().flatten().filter(|c| c.is_letter()).count();
    let fill_score = if total_cells > 0 {
        ((letter_cells as f64 / total_cells as f64) * 100.0) as u32
    } else {
        0
    };

    let total_clues = puzzle.clues.across.len() + puzzle.clues.down.len();
    let clue_score = if total_clues > 10 { 80 } else { 60 };

    let freshness_score = puzzle.metadata.freshness_score.unwrap_or(50.0) as u32;

    QaReport {
        fill_score,
        clue_score,
        freshness_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubTheme;
    impl ThemeGenerator for StubTheme {
        fn generate_for_date(&self, _date: &str, difficulty: u8) -> Result<Theme, ExternalError> {
            Ok(Theme {
                title: "Cinema".to_string(),
                description: "Le septieme art".to_string(),
                keywords: vec!["FILM".to_string()],
                seed_words: vec![
                    "CINEMA".to_string(),
                    "ACTEUR".to_string(),
                    "SCENE".to_string(),
                    "FILM".to_string(),
                    "ROLE".to_string(),
                ],
                difficulty,
            })
        }
    }

    struct StubCandidates;
    impl CandidateGenerator for StubCandidates {
        fn expand_seed_words(
            &self,
            _seeds: &[String],
            _title: &str,
            _count: usize,
        ) -> Result<Vec<String>, ExternalError> {
            Ok(vec![
                "CAMERA".to_string(),
                "STUDIO".to_string(),
                "ECRAN".to_string(),
                "STAR".to_string(),
            ])
        }
    }

    struct NullClueGenerator;
    impl ClueGenerator for NullClueGenerator {
        fn generate(&self, _answer: &str, _difficulty: u8) -> Result<Vec<ClueVariant>, ExternalError> {
            Ok(Vec::new())
        }
        fn select_best_clue(&self, _variants: &[ClueVariant], _target: u8) -> Option<ClueVariant> {
            None
        }
    }

    struct FailingTheme;
    impl ThemeGenerator for FailingTheme {
        fn generate_for_date(&self, _date: &str, _difficulty: u8) -> Result<Theme, ExternalError> {
            Err(ExternalError("model unavailable".to_string()))
        }
    }

    #[test]
    fn successful_attempt_assembles_a_draft_bundle() {
        let theme_gen = StubTheme;
        let candidate_gen = StubCandidates;
        let clue_gen = NullClueGenerator;
        let orchestrator = Orchestrator::new(&theme_gen, &candidate_gen, &clue_gen);

        let request = GenerateRequest {
            date: "2026-07-28".to_string(),
            ..GenerateRequest::default()
        };

        let bundle = orchestrator.generate(&request).expect("should generate");
        assert_eq!(bundle.puzzle.title, "Cinema");
        assert!(!bundle.puzzle.clues.across.is_empty() || !bundle.puzzle.clues.down.is_empty());
        assert!(bundle.report.fill_score <= 100);
    }

    #[test]
    fn transient_theme_failure_exhausts_attempts() {
        let theme_gen = FailingTheme;
        let candidate_gen = StubCandidates;
        let clue_gen = NullClueGenerator;
        let orchestrator = Orchestrator::new(&theme_gen, &candidate_gen, &clue_gen);

        let request = GenerateRequest {
            date: "2026-07-28".to_string(),
            max_attempts: 2,
            ..GenerateRequest::default()
        };

        let err = orchestrator.generate(&request).unwrap_err();
        assert!(matches!(err, OrchestratorError::AttemptsExhausted { .. }));
    }

    #[test]
    fn freshness_scores_modern_vocabulary_higher() {
        let modern = Entry {
            id: "across-0-0".to_string(),
            direction: crate::cell::Direction::Across,
            number: 1,
            answer: "TIKTOK".to_string(),
            start_row: 0,
            start_col: 0,
            length: 6,
        };
        let stale = Entry {
            answer: "CHATEAU".to_string(),
            length: 7,
            ..modern.clone()
        };
        assert!(calculate_freshness(&[&modern]) > calculate_freshness(&[&stale]));
    }
}
