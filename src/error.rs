//! This module defines the error types used throughout the crate.

use crate::cube333::solver::Phase;
use crate::cube333::Position;
use thiserror::Error;

/// Error type for malformed sticker strings given to [`Cube::load`](crate::cube333::Cube::load).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The state contained a character that is neither a color letter, a digit (debug form) nor
    /// whitespace.
    #[error("illegal character {ch:?} at index {index} of cube state")]
    IllegalCharacter {
        /// The offending character
        ch: char,
        /// Its byte index in the input
        index: usize,
    },
    /// The number of color letters does not describe a supported cube (6 * n^2 stickers).
    #[error("cube state has {found} stickers, expected 54 (3x3x3) or 24 (2x2x2)")]
    Length {
        /// The number of color letters found
        found: usize,
    },
    /// Only 2x2x2 and 3x3x3 cubes are modelled.
    #[error("unsupported cube size {0}")]
    UnsupportedSize(u8),
}

/// A move token that could not be parsed, or a move that the cube cannot perform (e.g. a slice
/// turn on a 2x2x2).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid move `{token}`")]
pub struct InvalidMoveError {
    /// The token as written
    pub token: String,
}

/// A position name or lookup table key that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Not the name of a position such as `UFR` or `FR`
    #[error("unknown position {0:?}")]
    Position(String),
    /// An F2L condition that isn't three `:` separated parts
    #[error("expected CORNER:FACE:BOOL, found {0:?}")]
    Condition(String),
    /// An F2L condition on a corner other than `UFR` or `DFR`
    #[error("corner {0} is not UFR or DFR")]
    Corner(Position),
    /// An F2L condition naming a face its corner doesn't touch
    #[error("{face:?} is not a face of {corner}")]
    Face {
        /// The face as written
        face: String,
        /// The condition's corner
        corner: Position,
    },
    /// An F2L alignment other than `true` or `false`
    #[error("{0:?} is not true or false")]
    Aligned(String),
    /// A pattern key of the wrong length
    #[error("{found} characters, expected {expected}")]
    Length {
        /// Characters in the key
        found: usize,
        /// Characters a key of this kind has
        expected: usize,
    },
    /// A character with no meaning in this kind of key
    #[error("unexpected character {0:?}")]
    Character(char),
    /// A real position that a table has no entries for
    #[error("{position} is not {expected}")]
    Slot {
        /// The position given
        position: Position,
        /// What the table wants instead
        expected: &'static str,
    },
}

/// Errors from loading or mutating a cube.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeError {
    /// Malformed sticker string
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Unknown or unsupported move
    #[error(transparent)]
    InvalidMove(#[from] InvalidMoveError),
}

/// Errors reported by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// A phase ran out of attempts before its goal predicate held. The cube is left in the
    /// state the phase stopped in.
    #[error("{phase} phase unsolved after {attempts} attempts")]
    UnsolvableWithinBound {
        /// The phase that gave up
        phase: Phase,
        /// How many attempts it made
        attempts: usize,
    },
    /// The solver only handles 3x3x3 cubes.
    #[error("cannot solve a {0}x{0}x{0} cube")]
    UnsupportedSize(u8),
    /// A stored sequence could not be applied.
    #[error(transparent)]
    InvalidMove(#[from] InvalidMoveError),
}

/// Errors from reading, writing or deriving lookup tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be read or written.
    #[error("table io: {0}")]
    Io(#[from] std::io::Error),
    /// The table file is not valid JSON for the table schema.
    #[error("table json: {0}")]
    Json(#[from] serde_json::Error),
    /// A key in the named table does not parse.
    #[error("bad key {key:?} in {table} table: {source}")]
    Key {
        /// Which table
        table: &'static str,
        /// The key as written
        key: String,
        /// What is wrong with it
        source: KeyError,
    },
    /// A move sequence in the named table does not parse.
    #[error("bad sequence for {key:?} in {table} table: {source}")]
    Sequence {
        /// Which table
        table: &'static str,
        /// The key the sequence belongs to
        key: String,
        /// The move error
        source: InvalidMoveError,
    },
    /// Deriving a table failed.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Errors from the move-sequence discovery search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A search needs at least one generator.
    #[error("search has no generators")]
    NoGenerators,
    /// The search was cancelled before it finished.
    #[error("search cancelled after {popped} states")]
    Cancelled {
        /// States popped before cancellation was noticed
        popped: usize,
    },
    /// A generator could not be applied to a state.
    #[error(transparent)]
    InvalidMove(#[from] InvalidMoveError),
    /// The memo could not be written.
    #[error("search io: {0}")]
    Io(#[from] std::io::Error),
    /// The memo could not be serialized.
    #[error("search json: {0}")]
    Json(#[from] serde_json::Error),
}
