//! Uniform cost search over cube states, for finding short move sequences.
//!
//! The search expands states in order of how many generators have been applied, and remembers
//! the first (and so cheapest) way it reached each pattern. Patterns are produced by a function
//! the caller passes in, so a search can ignore everything but the pieces or colors it cares
//! about. The solver's lookup tables are built from the memos this produces.

use super::moves::{Move, MoveGenerator, QuarterTurns};
use super::Cube;
use crate::error::{InvalidMoveError, SearchError};
use crate::moves::MoveSequence;

use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

const PROGRESS_INTERVAL: usize = 100_000;

/// A named step the search may take: a single move or a whole algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    /// How the step is written in exported memos
    pub name: String,
    /// The moves it applies
    pub moves: MoveSequence<Move>,
}

impl Generator {
    /// A generator made of one move, named after it.
    pub fn single(mv: Move) -> Generator {
        Generator {
            name: mv.to_string(),
            moves: MoveSequence(vec![mv]),
        }
    }

    /// A generator for an algorithm written in move notation.
    pub fn from_alg(name: &str, alg: &str) -> Result<Generator, InvalidMoveError> {
        Ok(Generator {
            name: name.to_owned(),
            moves: alg.parse()?,
        })
    }

    /// Quarter turns of every face and slice, both ways.
    pub fn quarter_turns() -> Vec<Generator> {
        QuarterTurns::MOVE_LIST
            .iter()
            .map(|&mv| Generator::single(mv))
            .collect()
    }
}

/// Limits and moves for a search.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// The steps each state is expanded with
    pub generators: Vec<Generator>,
    /// States this many generators from the start are recorded but not expanded
    pub max_depth: usize,
    /// Children are dropped while the frontier holds this many states
    pub max_frontier: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            generators: Generator::quarter_turns(),
            max_depth: 3,
            max_frontier: 4_000_000,
        }
    }
}

/// A flag another thread can set to stop a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every search holding this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// The cheapest known way to a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    /// Generators applied
    pub moves: usize,
    /// Indices into the search's generators, in the order applied
    pub history: Vec<usize>,
}

/// Counters kept while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// States put on the frontier, the start included
    pub pushed: usize,
    /// States taken off the frontier
    pub popped: usize,
    /// Popped states whose pattern was already recorded at no greater cost
    pub stale: usize,
    /// Patterns recorded
    pub recorded: usize,
}

/// Whether a search saw everything within its depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    /// The frontier ran dry
    Complete,
    /// Some children were dropped because the frontier was full
    Truncated,
}

/// The memo and counters of a finished search.
#[derive(Debug, Clone)]
pub struct DiscoveryOutcome {
    /// Every pattern reached, with the cheapest way to it
    pub memo: BTreeMap<String, Visit>,
    /// Search counters
    pub stats: SearchStats,
    /// Whether anything was dropped
    pub status: SearchStatus,
    generators: Vec<Generator>,
}

#[derive(Serialize)]
struct ExportedVisit<'a> {
    moves: usize,
    history: Vec<&'a str>,
}

impl DiscoveryOutcome {
    /// The moves a recorded history stands for, in order.
    pub fn sequence(&self, visit: &Visit) -> MoveSequence<Move> {
        visit
            .history
            .iter()
            .flat_map(|&g| self.generators[g].moves.iter().copied())
            .collect()
    }

    /// Write the memo as a JSON object from pattern to moves and generator names.
    pub fn write_json(&self, writer: impl Write) -> Result<(), SearchError> {
        let export: BTreeMap<&str, ExportedVisit> = self
            .memo
            .iter()
            .map(|(pattern, visit)| {
                let history = visit
                    .history
                    .iter()
                    .map(|&g| self.generators[g].name.as_str())
                    .collect();
                (
                    pattern.as_str(),
                    ExportedVisit {
                        moves: visit.moves,
                        history,
                    },
                )
            })
            .collect();
        serde_json::to_writer_pretty(writer, &export)?;
        Ok(())
    }

    /// Write the memo to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SearchError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

struct Node {
    moves: usize,
    pattern: String,
    cube: Cube,
    history: Vec<usize>,
}

impl Eq for Node {}
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.moves == other.moves && self.pattern == other.pattern
    }
}
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.moves
            .cmp(&other.moves)
            .then_with(|| self.pattern.cmp(&other.pattern))
    }
}
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Search outwards from `start`, recording the cheapest generator history reaching each pattern.
///
/// A child that would immediately undo the generator that produced its parent is never built.
pub fn discover(
    start: &Cube,
    config: &DiscoveryConfig,
    pattern: impl Fn(&Cube) -> String,
    cancel: &CancelToken,
) -> Result<DiscoveryOutcome, SearchError> {
    if config.generators.is_empty() {
        return Err(SearchError::NoGenerators);
    }
    let generators = &config.generators;
    let inverse_of: Vec<Option<usize>> = generators
        .iter()
        .map(|g| {
            let undo = g.moves.clone().inverse();
            generators.iter().position(|h| h.moves == undo)
        })
        .collect();

    let mut stats = SearchStats::default();
    let mut status = SearchStatus::Complete;
    let mut memo: BTreeMap<String, Visit> = BTreeMap::new();
    let mut frontier = BinaryHeap::new();

    frontier.push(Reverse(Node {
        moves: 0,
        pattern: pattern(start),
        cube: start.clone(),
        history: Vec::new(),
    }));
    stats.pushed += 1;

    while let Some(Reverse(node)) = frontier.pop() {
        if cancel.is_cancelled() {
            log::info!("search cancelled after {} states", stats.popped);
            return Err(SearchError::Cancelled {
                popped: stats.popped,
            });
        }
        stats.popped += 1;
        if stats.popped % PROGRESS_INTERVAL == 0 {
            log::debug!(
                "popped {} states, depth {}, frontier {}, recorded {}",
                stats.popped,
                node.moves,
                frontier.len(),
                memo.len()
            );
        }

        if memo
            .get(&node.pattern)
            .is_some_and(|seen| seen.moves <= node.moves)
        {
            stats.stale += 1;
            continue;
        }
        memo.insert(
            node.pattern,
            Visit {
                moves: node.moves,
                history: node.history.clone(),
            },
        );

        if node.moves >= config.max_depth {
            continue;
        }

        let undo = node.history.last().and_then(|&g| inverse_of[g]);
        for (i, generator) in generators.iter().enumerate() {
            if undo == Some(i) {
                continue;
            }
            let mut cube = node.cube.clone();
            cube.apply_sequence(&generator.moves)?;
            let child = pattern(&cube);
            if memo.contains_key(&child) {
                continue;
            }
            if frontier.len() >= config.max_frontier {
                if status == SearchStatus::Complete {
                    log::warn!(
                        "search frontier reached {} states, dropping children",
                        config.max_frontier
                    );
                }
                status = SearchStatus::Truncated;
                continue;
            }

            let mut history = node.history.clone();
            history.push(i);
            frontier.push(Reverse(Node {
                moves: node.moves + 1,
                pattern: child,
                cube,
                history,
            }));
            stats.pushed += 1;
        }
    }

    stats.recorded = memo.len();
    log::info!(
        "search finished: {} patterns, {} pushed, {} popped, {} stale ({status:?})",
        stats.recorded,
        stats.pushed,
        stats.popped,
        stats.stale
    );
    Ok(DiscoveryOutcome {
        memo,
        stats,
        status,
        generators: generators.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube333::{Color, Position};

    fn full(cube: &Cube) -> String {
        cube.to_sticker_string()
    }

    #[test_log::test]
    fn depth_three_from_solved() {
        let start = Cube::new();
        let outcome = discover(&start, &DiscoveryConfig::default(), full, &CancelToken::new())
            .unwrap();

        assert!(outcome.stats.pushed <= 1 + 18 + 18 * 17 + 18 * 17 * 17);
        assert_eq!(outcome.status, SearchStatus::Complete);
        assert_eq!(
            outcome.memo.get(start.solved_state()),
            Some(&Visit {
                moves: 0,
                history: vec![]
            })
        );
        assert_eq!(outcome.stats.recorded, outcome.memo.len());
        assert!(outcome.memo.values().all(|v| v.moves <= 3));
    }

    #[test]
    fn histories_reach_their_patterns() {
        let config = DiscoveryConfig {
            max_depth: 2,
            ..Default::default()
        };
        let outcome = discover(&Cube::new(), &config, full, &CancelToken::new()).unwrap();
        for (pattern, visit) in outcome.memo.iter().take(200) {
            let mut cube = Cube::new();
            cube.apply_sequence(&outcome.sequence(visit)).unwrap();
            assert_eq!(&cube.to_sticker_string(), pattern);
            assert_eq!(visit.history.len(), visit.moves);
        }
    }

    #[test]
    fn quarter_turn_counts() {
        let config = DiscoveryConfig {
            max_depth: 1,
            ..Default::default()
        };
        let outcome = discover(&Cube::new(), &config, full, &CancelToken::new()).unwrap();
        assert_eq!(outcome.memo.len(), 19);
        assert_eq!(outcome.stats.pushed, 19);
    }

    #[test]
    fn masked_search_merges_states() {
        let config = DiscoveryConfig {
            generators: vec![Generator::single(crate::mv!(U))],
            max_depth: 4,
            ..Default::default()
        };
        let outcome = discover(
            &Cube::new(),
            &config,
            |c| c.to_masked_pattern(&[Color::W]),
            &CancelToken::new(),
        )
        .unwrap();
        // U only spins the white face, so the mask never changes.
        assert_eq!(outcome.memo.len(), 1);
    }

    #[test]
    fn piece_pattern_search() {
        let config = DiscoveryConfig {
            generators: ["R", "R'", "U", "U'"]
                .iter()
                .map(|m| Generator::from_alg(m, m).unwrap())
                .collect(),
            max_depth: 20,
            ..Default::default()
        };
        let tracked = |c: &Cube| {
            c.to_piece_pattern(|p| p.home_position() == Some(Position::UFR))
        };
        let outcome = discover(&Cube::new(), &config, tracked, &CancelToken::new()).unwrap();
        // One corner in the six corners of U and R, three ways each.
        assert_eq!(outcome.memo.len(), 18);
        assert_eq!(outcome.status, SearchStatus::Complete);
    }

    #[test]
    fn macro_generators() {
        let config = DiscoveryConfig {
            generators: vec![
                Generator::from_alg("sexy", "R U R' U'").unwrap(),
                Generator::from_alg("unsexy", "U R U' R'").unwrap(),
            ],
            max_depth: 6,
            ..Default::default()
        };
        let outcome = discover(&Cube::new(), &config, full, &CancelToken::new()).unwrap();
        // The sexy move has order 6, so past three repeats its inverse is shorter.
        let sexy_only = outcome
            .memo
            .values()
            .filter(|v| v.history.iter().all(|&g| g == 0))
            .count();
        assert!(sexy_only >= 3);
        assert!(outcome.memo.values().all(|v| v.moves <= 3));
        assert!(outcome
            .memo
            .values()
            .all(|v| !v.history.windows(2).any(|w| w == [0, 1] || w == [1, 0])));
    }

    #[test]
    fn truncation() {
        let config = DiscoveryConfig {
            max_depth: 3,
            max_frontier: 10,
            ..Default::default()
        };
        let outcome = discover(&Cube::new(), &config, full, &CancelToken::new()).unwrap();
        assert_eq!(outcome.status, SearchStatus::Truncated);
        assert!(outcome.stats.pushed < 1 + 18 + 18 * 17);
    }

    #[test]
    fn cancellation() {
        let token = CancelToken::new();
        token.cancel();
        let result = discover(&Cube::new(), &DiscoveryConfig::default(), full, &token);
        assert!(matches!(result, Err(SearchError::Cancelled { popped: 0 })));
    }

    #[test]
    fn needs_generators() {
        let config = DiscoveryConfig {
            generators: vec![],
            ..Default::default()
        };
        let result = discover(&Cube::new(), &config, full, &CancelToken::new());
        assert!(matches!(result, Err(SearchError::NoGenerators)));
    }

    #[test]
    fn json_export() {
        let config = DiscoveryConfig {
            max_depth: 1,
            ..Default::default()
        };
        let outcome = discover(&Cube::new(), &config, full, &CancelToken::new()).unwrap();
        let mut out = Vec::new();
        outcome.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let solved = &value[Cube::new().solved_state()];
        assert_eq!(solved["moves"], 0);
        assert_eq!(solved["history"].as_array().map(Vec::len), Some(0));
        assert_eq!(value.as_object().map(|o| o.len()), Some(19));
    }
}
