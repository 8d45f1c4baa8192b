//! A cubie model of the 3x3x3 cube.
//!
//! The cube is a set of 26 cubies, each of which carries a fixed tuple of colors together with a
//! position and an orientation. A cubie at position `p` with orientation `o` shows
//! `colors[(index_of(face, p) + o) % n]` on `face`, where `index_of` is the index of the face in
//! the position's canonical face order and `n` is the number of stickers on the cubie.
//!
//! A 2x2x2 is modelled as the corners of this cube. Its edges and centers are never shown and stay
//! home whatever is turned, so a 2x2x2 is determined by its stickers alone.

pub mod axis;
pub mod discovery;
pub mod legality;
pub mod moves;
pub mod pattern;
pub mod solver;

use crate::error::{FormatError, KeyError};
use std::fmt;
use std::sync::Arc;

/// A face of the cube, in the order stickers are serialized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Face {
    U,
    D,
    L,
    R,
    F,
    B,
}

impl Face {
    /// Every face in serialization order.
    pub const ALL: [Face; 6] = [Face::U, Face::D, Face::L, Face::R, Face::F, Face::B];

    /// The bit used for this face in position masks.
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// The face on the other side of the cube.
    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::D => Face::U,
            Face::L => Face::R,
            Face::R => Face::L,
            Face::F => Face::B,
            Face::B => Face::F,
        }
    }

    /// The color of this face on a solved cube in the standard orientation.
    pub const fn home_color(self) -> Color {
        Color::ALL[self as usize]
    }

    /// Parse a face letter.
    pub fn from_char(c: char) -> Option<Face> {
        Face::ALL.into_iter().find(|f| f.as_char() == c)
    }

    /// The face letter.
    pub fn as_char(self) -> char {
        b"UDLRFB"[self as usize] as char
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A sticker color. The variant order matches the faces they start on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    /// White, starts on U
    W,
    /// Yellow, starts on D
    Y,
    /// Green, starts on L
    G,
    /// Blue, starts on R
    B,
    /// Red, starts on F
    R,
    /// Orange, starts on B
    O,
}

impl Color {
    /// Every color.
    pub const ALL: [Color; 6] = [Color::W, Color::Y, Color::G, Color::B, Color::R, Color::O];

    /// Parse a color letter (upper case only).
    pub fn from_char(c: char) -> Option<Color> {
        Color::ALL.into_iter().find(|col| col.as_char() == c)
    }

    /// The color letter.
    pub fn as_char(self) -> char {
        b"WYGBRO"[self as usize] as char
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One of the 26 places a cubie can be. Corners come first, then edges, then centers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Position {
    UFL,
    UFR,
    UBR,
    UBL,
    DFL,
    DFR,
    DBR,
    DBL,
    UF,
    UR,
    UB,
    UL,
    DF,
    DR,
    DB,
    DL,
    FL,
    FR,
    BL,
    BR,
    U,
    D,
    L,
    R,
    F,
    B,
}

/// The kinds of cubie.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// Three stickers
    Corner,
    /// Two stickers
    Edge,
    /// One sticker
    Center,
}

impl Position {
    /// Every position, indexed by `position as usize`.
    #[rustfmt::skip]
    pub const ALL: [Position; 26] = {
        use Position::*;
        [
            UFL, UFR, UBR, UBL, DFL, DFR, DBR, DBL,
            UF, UR, UB, UL, DF, DR, DB, DL, FL, FR, BL, BR,
            U, D, L, R, F, B,
        ]
    };

    /// The corner positions.
    pub const CORNERS: [Position; 8] = {
        use Position::*;
        [UFL, UFR, UBR, UBL, DFL, DFR, DBR, DBL]
    };

    /// The edge positions.
    pub const EDGES: [Position; 12] = {
        use Position::*;
        [UF, UR, UB, UL, DF, DR, DB, DL, FL, FR, BL, BR]
    };

    /// The faces this position touches, in canonical order. The colors of a cubie are indexed
    /// relative to this order.
    pub const fn faces(self) -> &'static [Face] {
        use Face as F;
        match self {
            Position::UFR => &[F::U, F::R, F::F],
            Position::UFL => &[F::U, F::F, F::L],
            Position::UBL => &[F::U, F::L, F::B],
            Position::UBR => &[F::U, F::B, F::R],
            Position::DFR => &[F::R, F::D, F::F],
            Position::DFL => &[F::F, F::D, F::L],
            Position::DBL => &[F::L, F::D, F::B],
            Position::DBR => &[F::B, F::D, F::R],
            Position::UF => &[F::U, F::F],
            Position::UR => &[F::U, F::R],
            Position::UB => &[F::U, F::B],
            Position::UL => &[F::U, F::L],
            Position::DF => &[F::D, F::F],
            Position::DR => &[F::D, F::R],
            Position::DB => &[F::D, F::B],
            Position::DL => &[F::D, F::L],
            Position::FL => &[F::F, F::L],
            Position::FR => &[F::F, F::R],
            Position::BL => &[F::B, F::L],
            Position::BR => &[F::B, F::R],
            Position::U => &[F::U],
            Position::D => &[F::D],
            Position::L => &[F::L],
            Position::R => &[F::R],
            Position::F => &[F::F],
            Position::B => &[F::B],
        }
    }

    /// The set of faces this position touches as a bitmask of [`Face::bit`].
    pub const fn mask(self) -> u8 {
        let faces = self.faces();
        let mut mask = 0;
        let mut i = 0;
        while i < faces.len() {
            mask |= faces[i].bit();
            i += 1;
        }
        mask
    }

    /// The position touching exactly the faces in `mask`, if there is one.
    pub const fn from_mask(mask: u8) -> Option<Position> {
        let mut i = 0;
        while i < 26 {
            if Position::ALL[i].mask() == mask {
                return Some(Position::ALL[i]);
            }
            i += 1;
        }
        None
    }

    /// The position touching exactly the given faces, in any order.
    pub fn from_faces(faces: &[Face]) -> Option<Position> {
        Position::from_mask(faces.iter().fold(0, |m, f| m | f.bit()))
    }

    /// The center position of a face.
    pub const fn center(face: Face) -> Position {
        Position::ALL[20 + face as usize]
    }

    /// The index of `face` in this position's canonical face order.
    pub const fn index_of(self, face: Face) -> Option<usize> {
        let faces = self.faces();
        let mut i = 0;
        while i < faces.len() {
            if faces[i] as u8 == face as u8 {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    /// Whether this position touches the face.
    pub const fn touches(self, face: Face) -> bool {
        self.mask() & face.bit() != 0
    }

    /// What kind of cubie lives here.
    pub const fn kind(self) -> PieceKind {
        match self.faces().len() {
            3 => PieceKind::Corner,
            2 => PieceKind::Edge,
            _ => PieceKind::Center,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::str::FromStr for Position {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.to_string() == s)
            .ok_or_else(|| KeyError::Position(s.to_owned()))
    }
}

/// A single piece of the cube.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cubie {
    // Entries past the sticker count repeat the first color.
    colors: [Color; 3],
    position: Position,
    orientation: u8,
}

impl Cubie {
    /// The cubie that belongs at `position` on a solved cube.
    pub const fn home(position: Position) -> Cubie {
        let faces = position.faces();
        let mut colors = [faces[0].home_color(); 3];
        let mut i = 0;
        while i < faces.len() {
            colors[i] = faces[i].home_color();
            i += 1;
        }
        Cubie {
            colors,
            position,
            orientation: 0,
        }
    }

    pub(crate) fn from_stickers(stickers: &[Color], position: Position, orientation: u8) -> Cubie {
        let mut colors = [stickers[0]; 3];
        colors[..stickers.len()].copy_from_slice(stickers);
        Cubie {
            colors,
            position,
            orientation,
        }
    }

    /// The cubie's colors, in the canonical face order of its home position.
    pub fn colors(&self) -> &[Color] {
        &self.colors[..self.sticker_count()]
    }

    /// Where the cubie is.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The cyclic offset of the colors relative to the position's face order.
    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    /// 3 for corners, 2 for edges, 1 for centers.
    pub fn sticker_count(&self) -> usize {
        self.position.faces().len()
    }

    /// The color shown on `face`, or `None` if the cubie does not touch it.
    pub fn sticker(&self, face: Face) -> Option<Color> {
        let i = self.position.index_of(face)?;
        Some(self.colors[(i + self.orientation as usize) % self.sticker_count()])
    }

    /// The face showing `color`, if the cubie has that color.
    pub fn face_with(&self, color: Color) -> Option<Face> {
        self.position
            .faces()
            .iter()
            .copied()
            .find(|&f| self.sticker(f) == Some(color))
    }

    /// Whether the cubie carries `color`.
    pub fn has_color(&self, color: Color) -> bool {
        self.colors().contains(&color)
    }

    /// Whether the cubie has exactly the colors given, in any order.
    pub fn has_colors(&self, colors: &[Color]) -> bool {
        colors.len() == self.sticker_count() && colors.iter().all(|&c| self.has_color(c))
    }

    /// Whether two cubies are the same physical piece, i.e. share a color set.
    pub fn same_piece(&self, other: &Cubie) -> bool {
        self.has_colors(other.colors())
    }

    /// The position this piece occupies on a solved cube, found from its colors.
    pub fn home_position(&self) -> Option<Position> {
        Position::ALL
            .into_iter()
            .find(|&p| self.same_piece(&Cubie::home(p)))
    }

    pub(crate) fn moved(self, position: Position, twist: u8) -> Cubie {
        let n = position.faces().len() as u8;
        Cubie {
            position,
            orientation: (self.orientation + twist) % n,
            ..self
        }
    }

    fn set_sticker(&mut self, face: Face, color: Color) {
        if let Some(i) = self.position.index_of(face) {
            let n = self.sticker_count();
            self.colors[(i + self.orientation as usize) % n] = color;
        }
    }
}

const SOLVED_CUBIES: [Cubie; 26] = {
    let mut cubies = [Cubie::home(Position::U); 26];
    let mut i = 0;
    while i < 26 {
        cubies[i] = Cubie::home(Position::ALL[i]);
        i += 1;
    }
    cubies
};

/// Which cubie shows on each cell of each face, row-major, faces in serialization order.
#[rustfmt::skip]
pub(crate) const FACE_LAYOUT: [[Position; 9]; 6] = {
    use Position::*;
    [
        [UBL, UB, UBR, UL, U, UR, UFL, UF, UFR],
        [DFL, DF, DFR, DL, D, DR, DBL, DB, DBR],
        [UBL, UL, UFL, BL, L, FL, DBL, DL, DFL],
        [UFR, UR, UBR, FR, R, BR, DFR, DR, DBR],
        [UFL, UF, UFR, FL, F, FR, DFL, DF, DFR],
        [UBR, UB, UBL, BR, B, BL, DBR, DB, DBL],
    ]
};

/// A cube. Slot `i` of the cubie array always holds the cubie at `Position::ALL[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cube {
    size: u8,
    cubies: [Cubie; 26],
    solved_state: Arc<str>,
}

impl Default for Cube {
    fn default() -> Self {
        Self::new()
    }
}

impl Cube {
    /// A solved 3x3x3 cube.
    pub fn new() -> Self {
        Self::solved(3)
    }

    /// A solved cube of the given size. Only 2 and 3 are supported.
    pub fn with_size(size: u8) -> Result<Self, FormatError> {
        match size {
            2 | 3 => Ok(Self::solved(size)),
            _ => Err(FormatError::UnsupportedSize(size)),
        }
    }

    fn solved(size: u8) -> Self {
        let mut cube = Cube {
            size,
            cubies: SOLVED_CUBIES,
            solved_state: Arc::from(""),
        };
        cube.solved_state = cube.to_sticker_string().into();
        cube
    }

    /// The edge length of the cube (2 or 3).
    pub fn size(&self) -> u8 {
        self.size
    }

    /// The sticker string of this cube when solved, computed once at construction.
    pub fn solved_state(&self) -> &str {
        &self.solved_state
    }

    /// Every cubie, in position order.
    pub fn cubies(&self) -> &[Cubie; 26] {
        &self.cubies
    }

    /// The cubie currently at `position`.
    pub fn cubie_at(&self, position: Position) -> &Cubie {
        &self.cubies[position as usize]
    }

    /// Find the piece with the given colors (in any order).
    pub fn find(&self, colors: &[Color]) -> Option<&Cubie> {
        self.cubies.iter().find(|c| c.has_colors(colors))
    }

    // A 2x2x2 shows only its corners, so everything else is put back home after each turn.
    fn settle_hidden(&mut self) {
        if self.size != 2 {
            return;
        }
        for p in Position::ALL {
            if p.kind() != PieceKind::Corner {
                self.cubies[p as usize] = Cubie::home(p);
            }
        }
    }

    /// The color of a face's center.
    pub fn center(&self, face: Face) -> Color {
        self.cubies[Position::center(face) as usize].colors[0]
    }

    /// The face whose center has the given color.
    pub fn face_of(&self, color: Color) -> Option<Face> {
        Face::ALL.into_iter().find(|&f| self.center(f) == color)
    }

    fn cells(&self) -> &'static [usize] {
        match self.size {
            2 => &[0, 2, 6, 8],
            _ => &[0, 1, 2, 3, 4, 5, 6, 7, 8],
        }
    }

    /// The number of stickers on one face.
    pub fn stickers_per_face(&self) -> usize {
        self.cells().len()
    }

    /// The color of sticker `index` (row-major) on `face`.
    ///
    /// # Panics
    ///
    /// If `index` is not below [`stickers_per_face`](Self::stickers_per_face).
    pub fn get_sticker(&self, face: Face, index: usize) -> Color {
        let position = FACE_LAYOUT[face as usize][self.cells()[index]];
        self.cubies[position as usize]
            .sticker(face)
            .unwrap_or_else(|| unreachable!("layout cell {position} is not on face {face}"))
    }

    /// Overwrite the color of sticker `index` on `face`. Only [`load`](Self::load) should need
    /// this; it does not keep the cube legal.
    pub fn set_sticker(&mut self, face: Face, index: usize, color: Color) {
        let position = FACE_LAYOUT[face as usize][self.cells()[index]];
        self.cubies[position as usize].set_sticker(face, color);
    }

    /// The stickers of one face, row-major.
    pub fn face_stickers(&self, face: Face) -> impl Iterator<Item = Color> + '_ {
        (0..self.stickers_per_face()).map(move |i| self.get_sticker(face, i))
    }

    /// Whether every face shows a single color. This does not depend on how the cube is held.
    pub fn is_solved(&self) -> bool {
        Face::ALL.into_iter().all(|face| {
            let first = self.get_sticker(face, 0);
            self.face_stickers(face).all(|c| c == first)
        })
    }
}
