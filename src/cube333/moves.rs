//! Moves on the cube: face, slice and whole-cube turns, their notation, and applying them.
//!
//! Every turn is a quarter turn of some of the cubies about an axis, looked up in the tables of
//! [`axis`](super::axis).

use super::axis::Axis;
use super::{Color, Cube, Face, Position};
use crate::error::{CubeError, InvalidMoveError};
use crate::moves::{Cancellation, MoveSequence};

use std::fmt;
use std::str::FromStr;

#[cfg(test)]
use proptest_derive::Arbitrary;

/// The part of the cube a move turns: an outer face, a middle slice or the whole cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum Layer {
    /// Up face
    U,
    /// Down face
    D,
    /// Left face
    L,
    /// Right face
    R,
    /// Front face
    F,
    /// Back face
    B,
    /// Slice between L and R, turning like L
    M,
    /// Slice between U and D, turning like D
    E,
    /// Slice between F and B, turning like F
    S,
    /// Whole cube, turning like R
    X,
    /// Whole cube, turning like U
    Y,
    /// Whole cube, turning like F
    Z,
}

/// A middle slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Slice {
    M,
    E,
    S,
}

impl Slice {
    /// The axis of the slice and whether a clockwise slice turn is clockwise about it.
    pub fn axis_sense(self) -> (Axis, bool) {
        match self {
            Slice::M => (Axis::X, false),
            Slice::E => (Axis::Y, false),
            Slice::S => (Axis::Z, true),
        }
    }

    /// Whether `position` lies in this slice.
    pub fn contains(self, position: Position) -> bool {
        let [a, b] = self.axis_sense().0.faces();
        !position.touches(a) && !position.touches(b)
    }
}

impl Face {
    /// The axis a face turns about and whether turning the face clockwise is clockwise about
    /// that axis.
    pub fn axis_sense(self) -> (Axis, bool) {
        match self {
            Face::U => (Axis::Y, true),
            Face::D => (Axis::Y, false),
            Face::L => (Axis::X, false),
            Face::R => (Axis::X, true),
            Face::F => (Axis::Z, true),
            Face::B => (Axis::Z, false),
        }
    }
}

impl Layer {
    /// The face this layer turns, if it is a face turn.
    pub fn face(self) -> Option<Face> {
        match self {
            Layer::U => Some(Face::U),
            Layer::D => Some(Face::D),
            Layer::L => Some(Face::L),
            Layer::R => Some(Face::R),
            Layer::F => Some(Face::F),
            Layer::B => Some(Face::B),
            _ => None,
        }
    }

    /// The axis this layer turns about.
    pub fn axis(self) -> Axis {
        match self {
            Layer::L | Layer::R | Layer::M | Layer::X => Axis::X,
            Layer::U | Layer::D | Layer::E | Layer::Y => Axis::Y,
            Layer::F | Layer::B | Layer::S | Layer::Z => Axis::Z,
        }
    }

    fn as_char(self) -> char {
        b"UDLRFBMESxyz"[self as usize] as char
    }
}

impl From<Face> for Layer {
    fn from(face: Face) -> Layer {
        match face {
            Face::U => Layer::U,
            Face::D => Layer::D,
            Face::L => Layer::L,
            Face::R => Layer::R,
            Face::F => Layer::F,
            Face::B => Layer::B,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// How far a layer turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum Turn {
    /// A clockwise quarter turn, looking at the face
    Clockwise,
    /// A half turn
    Double,
    /// An anticlockwise quarter turn
    CounterClockwise,
}

impl Turn {
    /// The number of clockwise quarter turns this amounts to.
    pub fn count(self) -> u8 {
        match self {
            Turn::Clockwise => 1,
            Turn::Double => 2,
            Turn::CounterClockwise => 3,
        }
    }

    /// The turn made of `count` clockwise quarter turns, if that isn't the identity.
    pub fn from_count(count: u8) -> Option<Turn> {
        match count % 4 {
            1 => Some(Turn::Clockwise),
            2 => Some(Turn::Double),
            3 => Some(Turn::CounterClockwise),
            _ => None,
        }
    }
}

/// A move on a 3x3x3: a layer and how far it turns.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
#[allow(missing_docs)]
pub struct Move {
    pub layer: Layer,
    pub turn: Turn,
}

impl Move {
    /// Create a move.
    pub const fn new(layer: Layer, turn: Turn) -> Move {
        Move { layer, turn }
    }
}

impl crate::moves::Move for Move {
    fn inverse(self) -> Self {
        let turn = match self.turn {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::Double => Turn::Double,
            Turn::CounterClockwise => Turn::Clockwise,
        };
        Move { turn, ..self }
    }

    fn commutes_with(&self, b: &Self) -> bool {
        self.layer.axis() == b.layer.axis()
    }

    fn cancel(self, b: Self) -> Cancellation<Self> {
        if self.layer == b.layer {
            match Turn::from_count(self.turn.count() + b.turn.count()) {
                None => Cancellation::NoMove,
                Some(turn) => Cancellation::OneMove(Move { turn, ..self }),
            }
        } else {
            Cancellation::TwoMove(self, b)
        }
    }
}

// Print moves the way they are written, not as structs.
impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.turn {
            Turn::Clockwise => write!(f, "{}", self.layer),
            Turn::Double => write!(f, "{}2", self.layer),
            Turn::CounterClockwise => write!(f, "{}'", self.layer),
        }
    }
}

impl FromStr for Move {
    type Err = InvalidMoveError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let err = || InvalidMoveError {
            token: token.to_owned(),
        };
        let mut chars = token.chars();
        let layer = match chars.next().ok_or_else(err)? {
            'U' => Layer::U,
            'D' => Layer::D,
            'L' => Layer::L,
            'R' => Layer::R,
            'F' => Layer::F,
            'B' => Layer::B,
            'M' => Layer::M,
            'E' => Layer::E,
            'S' => Layer::S,
            'x' | 'X' => Layer::X,
            'y' | 'Y' => Layer::Y,
            'z' | 'Z' => Layer::Z,
            _ => return Err(err()),
        };
        let turn = match chars.as_str() {
            "" => Turn::Clockwise,
            "'" => Turn::CounterClockwise,
            "2" | "2'" | "'2" => Turn::Double,
            _ => return Err(err()),
        };
        Ok(Move { layer, turn })
    }
}

impl FromStr for MoveSequence<Move> {
    type Err = InvalidMoveError;

    /// Parse a whitespace or comma separated list of moves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::parse::<Move>)
            .collect()
    }
}

/// Create a move by specifying a layer and turn. Note that you do not need to specify for
/// example `Layer::R`, you only need to specify `R`.
#[macro_export]
macro_rules! mv {
    ($layer:ident) => {
        $crate::mv!($layer, Clockwise)
    };
    ($layer:ident, $turn:ident) => {
        $crate::cube333::moves::Move::new(
            $crate::cube333::moves::Layer::$layer,
            $crate::cube333::moves::Turn::$turn,
        )
    };
}

/// A trait to classify a type as a move generator: a fixed list of moves a search may expand a
/// state with.
pub trait MoveGenerator {
    /// The amount of moves that are available in the moveset.
    const SIZE: usize;
    /// A list of all valid moves.
    const MOVE_LIST: &'static [Move];
}

/// Quarter turns of the six faces and the three slices, in both directions.
pub struct QuarterTurns;

impl MoveGenerator for QuarterTurns {
    const SIZE: usize = 18;
    const MOVE_LIST: &'static [Move] = &[
        mv!(U),
        mv!(D),
        mv!(L),
        mv!(R),
        mv!(F),
        mv!(B),
        mv!(M),
        mv!(E),
        mv!(S),
        mv!(U, CounterClockwise),
        mv!(D, CounterClockwise),
        mv!(L, CounterClockwise),
        mv!(R, CounterClockwise),
        mv!(F, CounterClockwise),
        mv!(B, CounterClockwise),
        mv!(M, CounterClockwise),
        mv!(E, CounterClockwise),
        mv!(S, CounterClockwise),
    ];
}

/// Quarter turns of the six faces, the moves scrambles are made of.
pub struct FaceQuarterTurns;

impl MoveGenerator for FaceQuarterTurns {
    const SIZE: usize = 12;
    const MOVE_LIST: &'static [Move] = &[
        mv!(U),
        mv!(D),
        mv!(L),
        mv!(R),
        mv!(F),
        mv!(B),
        mv!(U, CounterClockwise),
        mv!(D, CounterClockwise),
        mv!(L, CounterClockwise),
        mv!(R, CounterClockwise),
        mv!(F, CounterClockwise),
        mv!(B, CounterClockwise),
    ];
}

/// The number of moves in a default scramble.
pub const SCRAMBLE_LENGTH: usize = 20;

impl Cube {
    // Quarter turn the cubies at the selected positions about `axis`.
    fn turn_where(&mut self, axis: Axis, clockwise: bool, select: impl Fn(Position) -> bool) {
        let table = axis.table(clockwise);
        let mut next = self.cubies;
        for cubie in self.cubies.iter().filter(|c| select(c.position)) {
            let from = cubie.position as usize;
            let to = table.perm[from];
            next[to as usize] = cubie.moved(to, table.twist[from]);
        }
        self.cubies = next;
        self.settle_hidden();
    }

    /// Quarter turn one outer face.
    pub fn rotate_face(&mut self, face: Face, clockwise: bool) {
        let (axis, sense) = face.axis_sense();
        self.turn_where(axis, clockwise == sense, |p| p.touches(face));
    }

    /// Quarter turn a middle slice. A 2x2x2 has no slices.
    pub fn rotate_slice(&mut self, slice: Slice, clockwise: bool) -> Result<(), InvalidMoveError> {
        if self.size < 3 {
            return Err(InvalidMoveError {
                token: format!("{slice:?}"),
            });
        }
        let (axis, sense) = slice.axis_sense();
        self.turn_where(axis, clockwise == sense, |p| slice.contains(p));
        Ok(())
    }

    /// Quarter turn the whole cube. No sticker changes color relative to its neighbours, but
    /// every cubie changes position. On a 2x2x2 the hidden centers stay where they are.
    pub fn rotate_cube(&mut self, axis: Axis, clockwise: bool) {
        self.turn_where(axis, clockwise, |_| true);
    }

    /// Hold the cube so that the center colored `down` is on D and the one colored `front` is
    /// on F, using at most one rotation for each. Returns the rotations made.
    ///
    /// If `front` is the opposite color of `down` only the first rotation happens.
    pub fn orient(&mut self, down: Color, front: Color) -> MoveSequence<Move> {
        let mut rotations = Vec::new();
        let lift = match self.face_of(down) {
            Some(Face::U) => Some(mv!(X, Double)),
            Some(Face::F) => Some(mv!(X, CounterClockwise)),
            Some(Face::B) => Some(mv!(X)),
            Some(Face::R) => Some(mv!(Z)),
            Some(Face::L) => Some(mv!(Z, CounterClockwise)),
            Some(Face::D) | None => None,
        };
        if let Some(mv) = lift {
            self.rotate_by(mv);
            rotations.push(mv);
        }

        let spin = match self.face_of(front) {
            Some(Face::R) => Some(mv!(Y)),
            Some(Face::L) => Some(mv!(Y, CounterClockwise)),
            Some(Face::B) => Some(mv!(Y, Double)),
            _ => None,
        };
        if let Some(mv) = spin {
            self.rotate_by(mv);
            rotations.push(mv);
        }
        MoveSequence(rotations)
    }

    // Whole-cube rotations can't fail, so they skip `apply`'s error path.
    fn rotate_by(&mut self, mv: Move) {
        let axis = mv.layer.axis();
        log::trace!("rotate {mv}");
        match mv.turn {
            Turn::Clockwise => self.rotate_cube(axis, true),
            Turn::CounterClockwise => self.rotate_cube(axis, false),
            Turn::Double => {
                self.rotate_cube(axis, true);
                self.rotate_cube(axis, true);
            }
        }
    }

    /// Apply a move.
    pub fn apply(&mut self, mv: Move) -> Result<(), InvalidMoveError> {
        log::trace!("apply {mv}");
        let quarter = |cube: &mut Cube, clockwise: bool| -> Result<(), InvalidMoveError> {
            match mv.layer {
                Layer::M => cube.rotate_slice(Slice::M, clockwise)?,
                Layer::E => cube.rotate_slice(Slice::E, clockwise)?,
                Layer::S => cube.rotate_slice(Slice::S, clockwise)?,
                Layer::X => cube.rotate_cube(Axis::X, clockwise),
                Layer::Y => cube.rotate_cube(Axis::Y, clockwise),
                Layer::Z => cube.rotate_cube(Axis::Z, clockwise),
                face => {
                    if let Some(face) = face.face() {
                        cube.rotate_face(face, clockwise)
                    }
                }
            }
            Ok(())
        };
        match mv.turn {
            Turn::Clockwise => quarter(self, true),
            Turn::CounterClockwise => quarter(self, false),
            Turn::Double => {
                quarter(self, true)?;
                quarter(self, true)
            }
        }
    }

    /// Apply an algorithm to the cube, left to right.
    pub fn apply_sequence(&mut self, mvs: &MoveSequence<Move>) -> Result<(), InvalidMoveError> {
        mvs.iter().try_for_each(|&m| self.apply(m))
    }

    /// Parse and apply a whitespace or comma separated list of moves.
    pub fn sequence(&mut self, mvs: &str) -> Result<(), CubeError> {
        let mvs: MoveSequence<Move> = mvs.parse()?;
        Ok(self.apply_sequence(&mvs)?)
    }

    /// Apply `count` random face quarter turns and return them.
    pub fn scramble(&mut self, rng: &mut fastrand::Rng, count: usize) -> MoveSequence<Move> {
        let mvs: MoveSequence<Move> = (0..count)
            .map(|_| FaceQuarterTurns::MOVE_LIST[rng.usize(..FaceQuarterTurns::SIZE)])
            .collect();
        for m in mvs.iter() {
            if let Some(face) = m.layer.face() {
                self.rotate_face(face, m.turn == Turn::Clockwise);
            }
        }
        log::debug!("scrambled with {mvs}");
        mvs
    }

    /// A solved cube scrambled with [`SCRAMBLE_LENGTH`] moves drawn from a seeded generator,
    /// along with the scramble.
    pub fn scrambled(seed: u64) -> (Cube, MoveSequence<Move>) {
        let mut cube = Cube::new();
        let mvs = cube.scramble(&mut fastrand::Rng::with_seed(seed), SCRAMBLE_LENGTH);
        (cube, mvs)
    }
}
