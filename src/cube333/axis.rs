//! Quarter-turn tables for the three axes of the cube.
//!
//! A clockwise quarter turn about an axis is described by where it sends each face. Everything
//! else (the position permutation and the orientation change of each cubie) is computed from
//! that face map at compile time, and the anticlockwise tables come from inverting the face map.

use super::{Face, Position};

/// An axis of the cube, named after the whole-cube rotation about it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// Left-Right axis, turning the same way as R
    X,
    /// Up-Down axis, turning the same way as U
    Y,
    /// Front-Back axis, turning the same way as F
    Z,
}

impl Axis {
    /// Every axis.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The two faces pierced by this axis. The first one turns clockwise with the axis.
    pub const fn faces(self) -> [Face; 2] {
        match self {
            Axis::X => [Face::R, Face::L],
            Axis::Y => [Face::U, Face::D],
            Axis::Z => [Face::F, Face::B],
        }
    }

    pub(crate) fn table(self, clockwise: bool) -> &'static TurnTable {
        &TURNS[self as usize][if clockwise { 0 } else { 1 }]
    }
}

/// The image of every position under a quarter turn of the whole cube, and how far the cubie
/// leaving each position twists.
#[derive(Debug)]
pub(crate) struct TurnTable {
    pub perm: [Position; 26],
    pub twist: [u8; 26],
}

// Images of U, D, L, R, F, B under a clockwise quarter turn.
const fn clockwise_faces(axis: Axis) -> [Face; 6] {
    use Face::*;
    match axis {
        // F -> U -> B -> D -> F
        Axis::X => [B, F, L, R, U, D],
        // F -> L -> B -> R -> F
        Axis::Y => [U, D, B, F, L, R],
        // U -> R -> D -> L -> U
        Axis::Z => [R, L, U, D, F, B],
    }
}

const fn invert_faces(map: [Face; 6]) -> [Face; 6] {
    let mut inv = [Face::U; 6];
    let mut i = 0;
    while i < 6 {
        inv[map[i] as usize] = Face::ALL[i];
        i += 1;
    }
    inv
}

const fn turn_table(map: [Face; 6]) -> TurnTable {
    let mut perm = [Position::U; 26];
    let mut twist = [0; 26];

    let mut i = 0;
    while i < 26 {
        let from = Position::ALL[i];
        let faces = from.faces();

        let mut mask = 0;
        let mut k = 0;
        while k < faces.len() {
            mask |= map[faces[k] as usize].bit();
            k += 1;
        }
        let to = match Position::from_mask(mask) {
            Some(p) => p,
            None => panic!("face map does not send positions to positions"),
        };

        // The sticker on the lead face of `from` lands on `lead`. Pick the orientation that
        // keeps it there.
        let lead = map[faces[0] as usize];
        let j = match to.index_of(lead) {
            Some(j) => j as u8,
            None => panic!("lead face lost by turn"),
        };
        let n = faces.len() as u8;

        perm[i] = to;
        twist[i] = (n - j) % n;
        i += 1;
    }

    TurnTable { perm, twist }
}

const fn axis_tables(axis: Axis) -> [TurnTable; 2] {
    let cw = clockwise_faces(axis);
    [turn_table(cw), turn_table(invert_faces(cw))]
}

static TURNS: [[TurnTable; 2]; 3] = [
    axis_tables(Axis::X),
    axis_tables(Axis::Y),
    axis_tables(Axis::Z),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anticlockwise_is_inverse() {
        for axis in Axis::ALL {
            let cw = axis.table(true);
            let ccw = axis.table(false);
            for p in Position::ALL {
                let there = cw.perm[p as usize];
                assert_eq!(ccw.perm[there as usize], p);
                let n = p.faces().len() as u8;
                assert_eq!((cw.twist[p as usize] + ccw.twist[there as usize]) % n, 0);
            }
        }
    }

    #[test]
    fn axis_faces_stay_put() {
        for axis in Axis::ALL {
            for face in axis.faces() {
                let center = Position::center(face);
                assert_eq!(axis.table(true).perm[center as usize], center);
            }
        }
    }

    #[test]
    fn x_sends_front_to_up() {
        let t = Axis::X.table(true);
        assert_eq!(t.perm[Position::UFR as usize], Position::UBR);
        assert_eq!(t.perm[Position::DFR as usize], Position::UFR);
        assert_eq!(t.perm[Position::FR as usize], Position::UR);
        assert_eq!(t.perm[Position::F as usize], Position::U);
    }

    #[test]
    fn quarter_turns_have_order_four() {
        for axis in Axis::ALL {
            for clockwise in [true, false] {
                let t = axis.table(clockwise);
                for p in Position::ALL {
                    let mut q = p;
                    let mut o = 0;
                    for _ in 0..4 {
                        o += t.twist[q as usize];
                        q = t.perm[q as usize];
                    }
                    assert_eq!(q, p);
                    assert_eq!(o % p.faces().len() as u8, 0);
                }
            }
        }
    }
}
