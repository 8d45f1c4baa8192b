//! Flat string projections of a cube, and loading a cube back from one.
//!
//! Stickers are written face by face in the order U, D, L, R, F, B, each face row-major. Masked
//! patterns replace the stickers a caller doesn't care about with [`WILDCARD`], so that states
//! which only differ in those stickers share a key.

use super::{Color, Cube, Cubie, Face, Position, FACE_LAYOUT};
use crate::error::FormatError;

use std::fmt;
use std::str::FromStr;

/// Stands in for a masked sticker.
pub const WILDCARD: char = '_';

impl Cube {
    fn render(&self, show: impl Fn(&Cubie, Color) -> bool) -> String {
        let mut out = String::with_capacity(6 * self.stickers_per_face());
        for face in Face::ALL {
            for &cell in self.cells() {
                let cubie = self.cubie_at(FACE_LAYOUT[face as usize][cell]);
                let color = cubie.sticker(face).unwrap_or(Color::W);
                out.push(if show(cubie, color) {
                    color.as_char()
                } else {
                    WILDCARD
                });
            }
        }
        out
    }

    /// Every sticker of the cube. This is the form [`load`](Self::load) reads.
    pub fn to_sticker_string(&self) -> String {
        self.render(|_, _| true)
    }

    /// The sticker string with every sticker whose color is not in `keep` masked.
    pub fn to_masked_pattern(&self, keep: &[Color]) -> String {
        self.render(|_, color| keep.contains(&color))
    }

    /// The sticker string with every sticker of a cubie failing `keep` masked.
    pub fn to_piece_pattern(&self, keep: impl Fn(&Cubie) -> bool) -> String {
        self.render(|cubie, _| keep(cubie))
    }

    /// The sticker string with each sticker followed by its index on the face, e.g. `W0W1W2`.
    pub fn to_debug_string(&self) -> String {
        let n = self.stickers_per_face();
        self.to_sticker_string()
            .chars()
            .enumerate()
            .map(|(i, c)| format!("{c}{}", i % n))
            .collect()
    }

    /// Replace this cube with the one described by `state`.
    ///
    /// `state` holds `6 * n^2` color letters for n = 3 or n = 2. Digits and whitespace are
    /// skipped so the output of [`to_debug_string`](Self::to_debug_string) loads too. Each group
    /// of stickers is matched against the pieces of a solved cube to recover which piece it is
    /// and how it is twisted; stickers matching no piece are kept as they are. A 2x2x2 keeps its
    /// hidden pieces at home, so it loads back exactly as it was written.
    pub fn load(&mut self, state: &str) -> Result<(), FormatError> {
        let mut stickers = Vec::with_capacity(54);
        for (index, ch) in state.char_indices() {
            match Color::from_char(ch.to_ascii_uppercase()) {
                Some(color) => stickers.push(color),
                None if ch.is_ascii_digit() || ch.is_whitespace() => {}
                None => return Err(FormatError::IllegalCharacter { ch, index }),
            }
        }

        let size = match stickers.len() {
            54 => 3,
            24 => 2,
            found => return Err(FormatError::Length { found }),
        };
        let mut cube = Cube::with_size(size)?;
        let per_face = cube.stickers_per_face();
        for (face, chunk) in Face::ALL.into_iter().zip(stickers.chunks(per_face)) {
            for (i, &color) in chunk.iter().enumerate() {
                cube.set_sticker(face, i, color);
            }
        }

        for slot in cube.cubies.iter_mut() {
            *slot = identify(slot);
        }
        log::debug!("loaded {size}x{size}x{size} cube {state}");
        *self = cube;
        Ok(())
    }
}

// The solved piece whose colors are a rotation of the stickers read at this position, twisted to
// match.
fn identify(raw: &Cubie) -> Cubie {
    let stickers = raw.colors();
    let n = stickers.len();
    let position = raw.position();

    Position::ALL
        .into_iter()
        .filter(|p| p.faces().len() == n)
        .map(Cubie::home)
        .find_map(|home| {
            (0..n)
                .find(|&o| (0..n).all(|k| stickers[k] == home.colors()[(k + o) % n]))
                .map(|o| Cubie::from_stickers(home.colors(), position, o as u8))
        })
        .unwrap_or(*raw)
}

impl FromStr for Cube {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cube = Cube::new();
        cube.load(s)?;
        Ok(cube)
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sticker_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube333::moves::Move;
    use crate::moves::MoveSequence;

    const SOLVED: &str = "WWWWWWWWWYYYYYYYYYGGGGGGGGGBBBBBBBBBRRRRRRRRROOOOOOOOO";

    #[test]
    fn solved_string() {
        assert_eq!(Cube::new().to_sticker_string(), SOLVED);
        assert_eq!(Cube::new().solved_state(), SOLVED);
        assert_eq!(Cube::new().to_string(), SOLVED);
    }

    #[test]
    fn masked_pattern() {
        let mut cube = Cube::new();
        cube.sequence("R").unwrap();
        let before = cube.clone();
        let pattern = cube.to_masked_pattern(&[Color::W]);
        assert_eq!(cube, before);
        assert_eq!(&pattern[..9], "WW_WW_WW_");
        assert_eq!(pattern.chars().filter(|&c| c == 'W').count(), 9);
        assert_eq!(pattern.len(), 54);
    }

    #[test]
    fn piece_pattern() {
        let cube = Cube::new();
        let pattern = cube.to_piece_pattern(|c| c.position() == Position::UFR);
        assert_eq!(pattern.chars().filter(|&c| c != WILDCARD).count(), 3);
        assert_eq!(&pattern[..9], "________W");
    }

    #[test]
    fn load_debug_form() {
        let mut cube = Cube::new();
        cube.sequence("R U F' D2 M").unwrap();
        let debug = cube.to_debug_string();
        assert!(debug.starts_with(&format!("{}0", cube.get_sticker(Face::U, 0))));
        assert_eq!(debug.parse::<Cube>(), Ok(cube));
    }

    #[test]
    fn load_rejects_bad_input() {
        assert_eq!(
            "WWWWWWWWWYYYYYYYYYGGGGGGGGGBBBBBBBBBRRRRRRRRROOOOOOOO".parse::<Cube>(),
            Err(FormatError::Length { found: 53 })
        );
        assert_eq!(
            "WWWWWWWWWYYYYYYYYYGGGGGGGGGBBBBBBBBBRRRRRRRRROOOOOOOOX".parse::<Cube>(),
            Err(FormatError::IllegalCharacter { ch: 'X', index: 53 })
        );
    }

    #[test]
    fn load_lower_case() {
        assert_eq!(SOLVED.to_lowercase().parse::<Cube>(), Ok(Cube::new()));
    }

    #[test]
    fn load_keeps_unknown_pieces() {
        // Green and blue never share a corner.
        let mut cube = Cube::new();
        cube.set_sticker(Face::U, 8, Color::G);
        let state = cube.to_sticker_string();
        let loaded: Cube = state.parse().unwrap();
        assert_eq!(loaded.to_sticker_string(), state);
        assert_eq!(loaded.cubie_at(Position::UFR).home_position(), None);
    }

    #[test]
    fn two_by_two() {
        let mut cube = Cube::with_size(2).unwrap();
        assert_eq!(cube.to_sticker_string(), "WWWWYYYYGGGGBBBBRRRROOOO");
        cube.sequence("R U R' U'").unwrap();
        let state = cube.to_sticker_string();
        assert_eq!(state.len(), 24);
        let loaded: Cube = state.parse().unwrap();
        assert_eq!(loaded.size(), 2);
        assert_eq!(loaded.to_sticker_string(), state);
        assert_eq!(loaded, cube);

        cube.sequence("x R U y' F'").unwrap();
        assert_eq!(cube.to_sticker_string().parse::<Cube>(), Ok(cube));
    }

    #[test]
    fn rotated_cube_round_trips() {
        let mut cube = Cube::new();
        cube.sequence("x y2 z' R U").unwrap();
        assert_eq!(cube.to_string().parse::<Cube>(), Ok(cube));
    }

    use proptest::collection::vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn load_round_trip(mvs in vec(any::<Move>(), 0..30).prop_map(MoveSequence)) {
            let mut cube = Cube::new();
            cube.apply_sequence(&mvs).unwrap();
            let loaded: Cube = cube.to_sticker_string().parse().unwrap();
            assert_eq!(loaded, cube);
        }
    }
}
