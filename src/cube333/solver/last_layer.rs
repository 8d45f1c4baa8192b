//! Orienting and permuting the last layer.

use super::tables::{best_auf, OllKey, PllKey, T_PERM};
use super::{is_oll_solved, is_pll_solved, Phase, Solver, Stage, TURNS};
use crate::cube333::moves::{Layer, Move};
use crate::cube333::{Cube, Face, Position};
use crate::error::SolveError;

const SUNE: &str = "R U R' U R U2 R'";
const LINE_TRIGGER: &str = "F R U R' U' F'";
const ANGLE_TRIGGER: &str = "F U R U' R' F'";

/// How many edge triggers the yellow cross can take: dot, angle, line.
const CROSS_STEPS: usize = 3;

pub(super) struct Oll;

impl Stage for Oll {
    const PHASE: Phase = Phase::Oll;

    fn is_done(cube: &Cube) -> bool {
        is_oll_solved(cube)
    }

    fn attempt(solver: &mut Solver) -> Result<(), SolveError> {
        for turn in TURNS {
            let facing = turn.map(|t| Move::new(Layer::Y, t));
            let mut trial = solver.cube.clone();
            if let Some(mv) = facing {
                trial.apply(mv)?;
            }
            let key = OllKey::read(&trial);
            if let Some(mvs) = solver.tables.oll.get(&key).cloned() {
                log::debug!("OLL case {}: {mvs}", key.as_str());
                if let Some(mv) = facing {
                    solver.apply(mv)?;
                }
                return solver.apply_all(&mvs);
            }
        }
        log::debug!("OLL case not in table, taking a two-look step");
        solver.two_look_step()
    }
}

pub(super) struct Pll;

impl Stage for Pll {
    const PHASE: Phase = Phase::Pll;

    fn is_done(cube: &Cube) -> bool {
        is_pll_solved(cube)
    }

    fn attempt(solver: &mut Solver) -> Result<(), SolveError> {
        if let Some(auf) = best_auf(&solver.cube)? {
            solver.apply(auf)?;
        }
        if solver.cube.is_solved() {
            return Ok(());
        }

        match PllKey::read(&solver.cube).and_then(|k| solver.tables.pll.get(&k).cloned()) {
            Some(mvs) => {
                log::debug!("PLL case: {mvs}");
                solver.apply_all(&mvs)?;
            }
            None => {
                log::debug!("PLL case not in table, applying a T perm");
                solver.alg(T_PERM)?;
            }
        }
        solver.seek(Layer::U, Cube::is_solved)?;
        Ok(())
    }
}

// Whether the piece at `position` shows the up color on `face`.
fn up_on(cube: &Cube, position: Position, face: Face) -> bool {
    cube.cubie_at(position).sticker(face) == Some(cube.center(Face::U))
}

fn oriented_edges(cube: &Cube) -> [bool; 4] {
    [Position::UF, Position::UR, Position::UB, Position::UL].map(|p| up_on(cube, p, Face::U))
}

fn has_up_cross(cube: &Cube) -> bool {
    oriented_edges(cube).iter().all(|&o| o)
}

fn oriented_corners(cube: &Cube) -> usize {
    [Position::UFR, Position::UFL, Position::UBR, Position::UBL]
        .into_iter()
        .filter(|&p| up_on(cube, p, Face::U))
        .count()
}

impl Solver {
    /// Orient the last layer edges with edge triggers, leaving a cross of the up color. Expects
    /// the first two layers to be solved.
    pub fn yellow_cross(&mut self) -> Result<(), SolveError> {
        self.orient_cube();
        for _ in 0..CROSS_STEPS {
            if has_up_cross(&self.cube) {
                return Ok(());
            }
            self.edge_trigger_step()?;
        }
        if has_up_cross(&self.cube) {
            return Ok(());
        }
        Err(SolveError::UnsolvableWithinBound {
            phase: Phase::Oll,
            attempts: CROSS_STEPS,
        })
    }

    fn two_look_step(&mut self) -> Result<(), SolveError> {
        if has_up_cross(&self.cube) {
            self.sune_step()
        } else {
            self.edge_trigger_step()
        }
    }

    fn edge_trigger_step(&mut self) -> Result<(), SolveError> {
        let line = |c: &Cube| matches!(oriented_edges(c), [false, true, false, true]);
        let angle = |c: &Cube| matches!(oriented_edges(c), [false, false, true, true]);

        if self.seek(Layer::U, line)? {
            log::debug!("edge trigger on a line");
            self.alg(LINE_TRIGGER)
        } else if self.seek(Layer::U, angle)? {
            log::debug!("edge trigger on an angle");
            self.alg(ANGLE_TRIGGER)
        } else {
            log::debug!("edge trigger on a dot");
            self.alg(LINE_TRIGGER)
        }
    }

    fn sune_step(&mut self) -> Result<(), SolveError> {
        let placed = match oriented_corners(&self.cube) {
            1 => self.seek(Layer::U, |c| up_on(c, Position::UFL, Face::U))?,
            0 => self.seek(Layer::U, |c| up_on(c, Position::UFL, Face::L))?,
            _ => self.seek(Layer::U, |c| up_on(c, Position::UFL, Face::F))?,
        };
        if !placed {
            log::debug!("no turn sets up a Sune, applying it anyway");
        }
        self.alg(SUNE)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::derived_tables;
    use super::super::{held, is_f2l_solved, LookupTables};
    use super::*;
    use std::sync::Arc;

    fn held_after(setup: &str) -> Cube {
        let mut cube = held(&Cube::new());
        cube.sequence(setup).unwrap();
        cube
    }

    fn without_tables(cube: Cube) -> Solver {
        Solver::new(cube, Arc::new(LookupTables::default()))
    }

    #[test]
    fn yellow_cross_from_each_shape() {
        for setup in [ANGLE_TRIGGER, LINE_TRIGGER] {
            let mut solver = without_tables(held_after(setup));
            assert!(!has_up_cross(solver.cube()), "{setup}");
            solver.yellow_cross().unwrap();
            assert!(has_up_cross(solver.cube()), "{setup}");
            assert!(is_f2l_solved(solver.cube()), "{setup}");
        }
    }

    #[test]
    fn yellow_cross_after_f2l() {
        for seed in 0..100 {
            let (cube, _) = Cube::scrambled(seed);
            let mut solver = Solver::new(cube, derived_tables());
            solver.solve_cross().unwrap();
            solver.solve_f2l().unwrap();
            solver.yellow_cross().unwrap();
            assert!(has_up_cross(solver.cube()), "seed {seed}");
        }
    }

    #[test]
    fn yellow_cross_is_free_when_present() {
        let mut solver = without_tables(held_after(SUNE));
        solver.yellow_cross().unwrap();
        assert!(solver.moves().is_empty());
    }

    #[test]
    fn two_look_orients_without_tables() {
        for seed in 0..100 {
            let (cube, scramble) = Cube::scrambled(seed);
            let mut solver = Solver::new(cube, derived_tables());
            solver.solve_cross().unwrap();
            solver.solve_f2l().unwrap();

            let mut solver = without_tables(solver.into_cube());
            solver
                .solve_oll()
                .unwrap_or_else(|e| panic!("seed {seed} ({scramble}): {e}"));
            assert!(is_oll_solved(solver.cube()));
        }
    }

    #[test]
    fn oll_from_the_table_is_one_lookup() {
        let mut solver = Solver::new(held_after("R U2 R' U' R U' R'"), derived_tables());
        solver.solve_oll().unwrap();
        assert!(is_oll_solved(solver.cube()));
        assert!(solver.solution().len() <= 9);
    }

    #[test]
    fn pll_from_the_table() {
        for setup in [T_PERM, "R U' R U R U R U' R' U' R2 U", "M2 U M2 U2 M2 U M2 U'"] {
            let mut solver = Solver::new(held_after(setup), derived_tables());
            solver.solve_pll().unwrap();
            assert!(solver.cube().is_solved(), "{setup}");
        }
    }

    #[test]
    fn t_perm_without_tables() {
        let mut solver = without_tables(held_after(T_PERM));
        solver.solve_pll().unwrap();
        assert!(solver.cube().is_solved());
    }

    #[test_log::test]
    fn adjusting_the_top_layer_is_enough() {
        let mut solver = without_tables(held_after("U2"));
        solver.solve_pll().unwrap();
        assert!(solver.cube().is_solved());
        assert_eq!(solver.solution().len(), 1);
    }
}
