//! Checks that a cube state could have been reached from solved by turning it.
//!
//! Every face, slice and whole-cube turn keeps three quantities fixed once the centers are put
//! back in their home places: the corner twist sum (mod 3), the edge flip sum (mod 2), and the
//! relation between corner and edge permutation parity.

use super::{Color, Cube, Position};

/// The quantities conserved by turning, measured on a copy of a cube held with its centers home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invariants {
    /// Sum of corner orientations, mod 3.
    pub corner_twist: u8,
    /// Sum of edge orientations, mod 2.
    pub edge_flip: u8,
    /// Whether the corners are in an odd permutation.
    pub corner_parity: bool,
    /// Whether the edges are in an odd permutation.
    pub edge_parity: bool,
    /// Whether every corner and edge is a real piece appearing exactly once.
    pub pieces_known: bool,
}

impl Invariants {
    /// Whether these are the invariants of a solvable cube.
    pub fn is_legal(&self) -> bool {
        self.pieces_known
            && self.corner_twist == 0
            && self.edge_flip == 0
            && self.corner_parity == self.edge_parity
    }
}

impl Cube {
    /// Measure this cube's [`Invariants`].
    pub fn invariants(&self) -> Invariants {
        let mut cube = self.clone();
        cube.orient(Color::Y, Color::R);

        let corner_twist = orientation_sum(&cube, &Position::CORNERS, 3);
        let edge_flip = orientation_sum(&cube, &Position::EDGES, 2);
        let corners = permutation(&cube, &Position::CORNERS);
        let edges = permutation(&cube, &Position::EDGES);

        let corner_parity = corners.as_deref().map(odd).unwrap_or(false);
        let mut invariants = Invariants {
            corner_twist,
            edge_flip,
            corner_parity,
            edge_parity: edges.as_deref().map(odd).unwrap_or(false),
            pieces_known: corners.is_some() && edges.is_some(),
        };
        // A 2x2x2 has no edges to make up for an odd corner permutation.
        if self.size() == 2 {
            invariants.edge_flip = 0;
            invariants.edge_parity = corner_parity;
        }
        invariants
    }

    /// Whether the cube can be solved by turning it.
    pub fn is_legal(&self) -> bool {
        self.invariants().is_legal()
    }
}

fn orientation_sum(cube: &Cube, slots: &[Position], n: u8) -> u8 {
    slots
        .iter()
        .map(|&p| cube.cubie_at(p).orientation())
        .fold(0, |acc, o| (acc + o) % n)
}

// For each slot, the index among `slots` of the home of the piece there. `None` if a piece is
// unknown or appears twice.
fn permutation(cube: &Cube, slots: &[Position]) -> Option<Vec<usize>> {
    let mut seen = vec![false; slots.len()];
    let mut perm = Vec::with_capacity(slots.len());
    for &p in slots {
        let home = cube.cubie_at(p).home_position()?;
        let i = slots.iter().position(|&s| s == home)?;
        if std::mem::replace(&mut seen[i], true) {
            return None;
        }
        perm.push(i);
    }
    Some(perm)
}

fn odd(perm: &[usize]) -> bool {
    let mut visited = vec![false; perm.len()];
    let mut cycles = 0;
    for start in 0..perm.len() {
        if visited[start] {
            continue;
        }
        cycles += 1;
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            i = perm[i];
        }
    }
    (perm.len() - cycles) % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube333::moves::Move;
    use crate::cube333::Cubie;
    use crate::moves::MoveSequence;

    fn place(cube: &mut Cube, piece: Position, at: Position, orientation: u8) {
        cube.cubies[at as usize] =
            Cubie::from_stickers(Cubie::home(piece).colors(), at, orientation);
    }

    #[test]
    fn solved_is_legal() {
        assert!(Cube::new().is_legal());
        assert!(Cube::with_size(2).unwrap().is_legal());
    }

    #[test]
    fn twisted_corner() {
        let mut cube = Cube::new();
        place(&mut cube, Position::UFR, Position::UFR, 1);
        let inv = cube.invariants();
        assert_eq!(inv.corner_twist, 1);
        assert!(!inv.is_legal());
    }

    #[test]
    fn flipped_edge() {
        let mut cube = Cube::new();
        place(&mut cube, Position::UF, Position::UF, 1);
        assert_eq!(cube.invariants().edge_flip, 1);
        assert!(!cube.is_legal());
    }

    #[test]
    fn swapped_edges() {
        let mut cube = Cube::new();
        place(&mut cube, Position::UF, Position::UR, 0);
        place(&mut cube, Position::UR, Position::UF, 0);
        let inv = cube.invariants();
        assert!(inv.edge_parity);
        assert!(!inv.corner_parity);
        assert!(!inv.is_legal());

        // Swapping two corners as well is what a T perm does.
        place(&mut cube, Position::UFR, Position::UBR, 0);
        place(&mut cube, Position::UBR, Position::UFR, 0);
        assert!(cube.is_legal());
    }

    #[test]
    fn duplicate_piece() {
        let mut cube = Cube::new();
        place(&mut cube, Position::UF, Position::UR, 0);
        assert!(!cube.invariants().pieces_known);
        assert!(!cube.is_legal());
    }

    #[test]
    fn slice_turns_stay_legal() {
        let mut cube = Cube::new();
        cube.sequence("M E S M' x y").unwrap();
        assert!(cube.is_legal());
    }

    #[test]
    fn quarter_turned_2x2_is_legal() {
        for setup in ["R", "R U x", "R U' F2 y D"] {
            let mut cube = Cube::with_size(2).unwrap();
            cube.sequence(setup).unwrap();
            let inv = cube.invariants();
            assert_eq!(inv.corner_twist, 0, "{setup}");
            assert!(inv.is_legal(), "{setup}");
        }
        let mut cube = Cube::with_size(2).unwrap();
        cube.sequence("R").unwrap();
        assert!(cube.invariants().corner_parity);
    }

    use proptest::collection::vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reachable_cubes_are_legal(mvs in vec(any::<Move>(), 0..40).prop_map(MoveSequence)) {
            let mut cube = Cube::new();
            cube.apply_sequence(&mvs).unwrap();
            let inv = cube.invariants();
            assert_eq!(inv.corner_twist, 0);
            assert_eq!(inv.edge_flip, 0);
            assert_eq!(inv.corner_parity, inv.edge_parity);
            assert!(inv.pieces_known);
        }

        #[test]
        fn seeded_scrambles_are_legal(seed in any::<u64>()) {
            assert!(Cube::scrambled(seed).0.is_legal());
        }
    }
}
