//! First two layers, one corner and edge pair at a time.
//!
//! A pair whose pieces sit in some other pair's slot is first lifted out. Then the corner is
//! turned above its slot, the cube is turned so that slot is front right, and the case is looked
//! up in the pair table.

use super::tables::F2lKey;
use super::{is_f2l_solved, matches_centers, Phase, Solver, Stage, TURNS};
use crate::cube333::moves::{Layer, Move};
use crate::cube333::{Color, Cube, Cubie, Face, Position};
use crate::error::SolveError;

pub(super) struct F2l;

impl Stage for F2l {
    const PHASE: Phase = Phase::F2l;

    fn is_done(cube: &Cube) -> bool {
        is_f2l_solved(cube)
    }

    fn attempt(solver: &mut Solver) -> Result<(), SolveError> {
        let down = solver.cube.center(Face::D);
        let pairs = [
            (Face::F, Face::R),
            (Face::R, Face::B),
            (Face::B, Face::L),
            (Face::L, Face::F),
        ]
        .map(|(a, b)| Pair {
            down,
            a: solver.cube.center(a),
            b: solver.cube.center(b),
        });
        for pair in pairs {
            solver.solve_pair(pair)?;
        }
        Ok(())
    }
}

/// A corner with the down color and two side colors, and the edge with the same side colors.
#[derive(Debug, Clone, Copy)]
struct Pair {
    down: Color,
    a: Color,
    b: Color,
}

/// Where a pair's pieces go: the corner below the slot and the middle edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    corner: Position,
    edge: Position,
}

impl Slot {
    fn between(a: Face, b: Face) -> Option<Slot> {
        Some(Slot {
            corner: Position::from_faces(&[Face::D, a, b])?,
            edge: Position::from_faces(&[a, b])?,
        })
    }

    // The slot a middle edge position or lower corner position belongs to.
    fn containing(position: Position) -> Option<Slot> {
        let sides: Vec<Face> = position
            .faces()
            .iter()
            .copied()
            .filter(|&f| f != Face::D && f != Face::U)
            .collect();
        match sides[..] {
            [a, b] => Slot::between(a, b),
            _ => None,
        }
    }
}

impl Pair {
    fn corner(self, cube: &Cube) -> Option<Cubie> {
        cube.find(&[self.down, self.a, self.b]).copied()
    }

    fn edge(self, cube: &Cube) -> Option<Cubie> {
        cube.find(&[self.a, self.b]).copied()
    }

    fn home(self, cube: &Cube) -> Option<Slot> {
        Slot::between(cube.face_of(self.a)?, cube.face_of(self.b)?)
    }

    fn is_solved(self, cube: &Cube) -> bool {
        let (Some(home), Some(corner), Some(edge)) =
            (self.home(cube), self.corner(cube), self.edge(cube))
        else {
            return false;
        };
        corner.position() == home.corner
            && edge.position() == home.edge
            && matches_centers(cube, home.corner)
            && matches_centers(cube, home.edge)
    }

    /// A slot other than the pair's own that holds one of its pieces.
    fn stuck_in(self, cube: &Cube) -> Option<Slot> {
        let home = self.home(cube)?;
        let edge = self.edge(cube)?.position();
        if !edge.touches(Face::U) && !edge.touches(Face::D) && edge != home.edge {
            return Slot::containing(edge);
        }
        let corner = self.corner(cube)?.position();
        if corner.touches(Face::D) && corner != home.corner {
            return Slot::containing(corner);
        }
        None
    }

    fn in_slot(self, cube: &Cube, slot: Slot) -> bool {
        self.corner(cube).is_some_and(|c| c.position() == slot.corner)
            || self.edge(cube).is_some_and(|e| e.position() == slot.edge)
    }
}

impl Solver {
    fn solve_pair(&mut self, pair: Pair) -> Result<(), SolveError> {
        for _ in 0..self.bounds.f2l_pair {
            if pair.is_solved(&self.cube) {
                return Ok(());
            }
            if let Some(slot) = pair.stuck_in(&self.cube) {
                log::debug!("lifting {}{} pieces out of {}", pair.a, pair.b, slot.edge);
                self.extract(pair, slot)?;
                continue;
            }

            let corner_up = pair
                .corner(&self.cube)
                .is_some_and(|c| c.position().touches(Face::U));
            if corner_up {
                let Some(above) = pair.home(&self.cube).and_then(|s| {
                    let [a, b] = [s.edge.faces()[0], s.edge.faces()[1]];
                    Position::from_faces(&[Face::U, a, b])
                }) else {
                    return Ok(());
                };
                self.seek(Layer::U, |c| {
                    pair.corner(c).is_some_and(|x| x.position() == above)
                })?;
            }
            self.seek(Layer::Y, |c| {
                pair.home(c).is_some_and(|s| s.edge == Position::FR)
            })?;

            let key = F2lKey::read(&self.cube);
            match key.and_then(|k| self.tables.pairs.get(&k).cloned()) {
                Some(mvs) => {
                    log::debug!("{}{} pair case {:?}: {mvs}", pair.a, pair.b, key);
                    self.apply_all(&mvs)?;
                }
                None => {
                    log::debug!("no {}{} pair case for {:?}", pair.a, pair.b, key);
                    let Some(front_right) = Slot::containing(Position::FR) else {
                        return Ok(());
                    };
                    self.extract(pair, front_right)?;
                }
            }
        }

        if !pair.is_solved(&self.cube) {
            log::warn!(
                "{}{} pair unsolved after {} attempts",
                pair.a,
                pair.b,
                self.bounds.f2l_pair
            );
        }
        Ok(())
    }

    /// Empty `slot`, first turning U so that none of the pair's pieces are put back into it.
    fn extract(&mut self, pair: Pair, slot: Slot) -> Result<(), SolveError> {
        let Some(extraction) = self.tables.edges.get(&slot.edge).cloned() else {
            log::warn!("no extraction for {}", slot.edge);
            return Ok(());
        };

        let mut setup = None;
        for turn in TURNS {
            let mv = turn.map(|t| Move::new(Layer::U, t));
            let mut trial = self.cube.clone();
            if let Some(mv) = mv {
                trial.apply(mv)?;
            }
            trial.apply_sequence(&extraction)?;
            if !pair.in_slot(&trial, slot) {
                setup = mv;
                break;
            }
        }

        if let Some(mv) = setup {
            self.apply(mv)?;
        }
        self.apply_all(&extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::derived_tables;
    use super::super::{held, is_cross_solved};
    use super::*;
    use crate::moves::MoveSequence;

    fn solver_after(setup: &str) -> Solver {
        let mut cube = held(&Cube::new());
        cube.sequence(setup).unwrap();
        Solver::new(cube, derived_tables())
    }

    #[test]
    fn slot_geometry() {
        assert_eq!(
            Slot::containing(Position::DBL),
            Some(Slot {
                corner: Position::DBL,
                edge: Position::BL
            })
        );
        assert_eq!(
            Slot::containing(Position::FR).map(|s| s.corner),
            Some(Position::DFR)
        );
        assert_eq!(Slot::containing(Position::UF), None);
    }

    #[test]
    fn stuck_pieces_are_found() {
        // The front right corner ends up below the front left slot and its edge in that slot.
        let solver = solver_after("R U R' F'");
        let cube = solver.cube();
        let pair = Pair {
            down: cube.center(Face::D),
            a: cube.center(Face::F),
            b: cube.center(Face::R),
        };
        assert!(!pair.is_solved(cube));
        assert_eq!(
            pair.stuck_in(cube),
            Some(Slot {
                corner: Position::DFL,
                edge: Position::FL
            })
        );

        // Pieces in the top layer are not stuck.
        let solver = solver_after("R U R'");
        assert_eq!(pair.stuck_in(solver.cube()), None);
    }

    #[test]
    fn single_pair_cases() {
        for setup in [
            "R U R'",
            "R U' R' U R U' R'",
            "F' U F U2 R U R'",
            "R U R' U' R U R' U' R U R'",
            "R U R' F' U2 F",
        ] {
            let mut solver = solver_after(setup);
            solver.solve_f2l().unwrap();
            assert!(is_f2l_solved(solver.cube()), "{setup}");
        }
    }

    #[test]
    fn pair_in_another_slot() {
        let mut solver = solver_after("R U R' y L' U L y'");
        solver.solve_f2l().unwrap();
        assert!(is_f2l_solved(solver.cube()));
    }

    #[test_log::test]
    fn f2l_after_cross_on_scrambles() {
        let tables = derived_tables();
        for seed in 0..300 {
            let (cube, scramble) = Cube::scrambled(seed);
            let mut solver = Solver::new(cube, tables.clone());
            solver.solve_cross().unwrap();
            solver
                .solve_f2l()
                .unwrap_or_else(|e| panic!("seed {seed} ({scramble}): {e}"));
            assert!(is_cross_solved(solver.cube()));
            assert!(is_f2l_solved(solver.cube()));
        }
    }

    #[test]
    fn extraction_avoids_reinserting_the_pair() {
        let mut solver = solver_after("");
        let pair = Pair {
            down: solver.cube.center(Face::D),
            a: solver.cube.center(Face::F),
            b: solver.cube.center(Face::R),
        };
        let front_right = Slot::containing(Position::FR).unwrap();
        solver.extract(pair, front_right).unwrap();
        assert!(!pair.in_slot(&solver.cube, front_right));
        assert_eq!(MoveSequence(solver.moves().to_vec()).to_string(), "R U R'");
    }
}
