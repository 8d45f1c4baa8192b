//! Direct rules for the cross. Each edge is placed without disturbing the ones already placed.

use super::{is_cross_solved, Phase, Solver, Stage};
use crate::cube333::moves::{Layer, Move, Turn};
use crate::cube333::{Color, Cube, Face, Position};
use crate::error::SolveError;
use crate::moves::Move as _;

pub(super) struct Cross;

impl Stage for Cross {
    const PHASE: Phase = Phase::Cross;

    fn is_done(cube: &Cube) -> bool {
        is_cross_solved(cube)
    }

    fn attempt(solver: &mut Solver) -> Result<(), SolveError> {
        for face in [Face::F, Face::R, Face::B, Face::L] {
            let color = solver.cube.center(face);
            solver.place_cross_edge(color)?;
        }
        Ok(())
    }
}

// Where the edge with the down color and `color` is now.
fn edge_position(cube: &Cube, color: Color) -> Option<Position> {
    cube.find(&[cube.center(Face::D), color])
        .map(|e| e.position())
}

// The face of an upper or lower layer position that is not U or D.
fn side_of(position: Position) -> Option<Face> {
    position
        .faces()
        .iter()
        .copied()
        .find(|&f| f != Face::U && f != Face::D)
}

fn adjacent(a: Face, b: Face) -> bool {
    a != b && a != b.opposite()
}

impl Solver {
    fn place_cross_edge(&mut self, color: Color) -> Result<(), SolveError> {
        // Lifting, then inserting, then nothing: three steps at most.
        for _ in 0..4 {
            let down = self.cube.center(Face::D);
            let Some(target) = self.cube.face_of(color) else {
                return Ok(());
            };
            let Some(goal) = Position::from_faces(&[Face::D, target]) else {
                return Ok(());
            };
            let Some(edge) = self.cube.find(&[down, color]).copied() else {
                return Ok(());
            };
            let at = edge.position();
            if at == goal && edge.sticker(Face::D) == Some(down) {
                return Ok(());
            }

            if at.touches(Face::D) {
                let Some(side) = side_of(at) else {
                    return Ok(());
                };
                log::debug!("lifting {color} cross edge out of {at}");
                self.apply(Move::new(side.into(), Turn::Double))?;
            } else if !at.touches(Face::U) {
                log::debug!("lifting {color} cross edge out of {at}");
                let face = at.faces()[0];
                let lift = self.toward(face, |c| {
                    edge_position(c, color).is_some_and(|p| p.touches(Face::U))
                })?;
                self.apply(lift)?;
                self.apply(Move::new(Layer::U, Turn::Clockwise))?;
                self.apply(lift.inverse())?;
            } else if edge.sticker(Face::U) == Some(down) {
                log::debug!("dropping {color} cross edge from {at}");
                let above = Position::from_faces(&[Face::U, target]);
                self.seek(Layer::U, |c| edge_position(c, color) == above)?;
                self.apply(Move::new(target.into(), Turn::Double))?;
            } else {
                log::debug!("inserting {color} cross edge from {at}");
                self.seek(Layer::U, |c| {
                    edge_position(c, color)
                        .and_then(side_of)
                        .is_some_and(|s| adjacent(s, target))
                })?;
                let Some(side) = edge_position(&self.cube, color).and_then(side_of) else {
                    return Ok(());
                };
                let middle = Position::from_faces(&[side, target]);
                let down_side = self.toward(side, |c| edge_position(c, color) == middle)?;
                self.apply(down_side)?;
                let home = self.toward(target, |c| edge_position(c, color) == Some(goal))?;
                self.apply(home)?;
                self.apply(down_side.inverse())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{held, LookupTables};
    use super::*;
    use std::sync::Arc;

    fn solve_cross_from(setup: &str) -> Solver {
        let mut cube = held(&Cube::new());
        cube.sequence(setup).unwrap();
        let mut solver = Solver::new(cube, Arc::new(LookupTables::default()));
        solver.solve_cross().unwrap();
        solver
    }

    #[test]
    fn solved_cross_needs_no_moves() {
        let solver = solve_cross_from("R U R' U'");
        assert!(solver.moves().is_empty());
    }

    #[test]
    fn edge_in_middle_layer() {
        let solver = solve_cross_from("F");
        assert!(is_cross_solved(solver.cube()));
    }

    #[test]
    fn flipped_edge_in_place() {
        let solver = solve_cross_from("F' U' R' U");
        assert!(is_cross_solved(solver.cube()));
    }

    #[test]
    fn edges_in_top_layer() {
        let solver = solve_cross_from("F2 R2 B2 L2 U");
        assert!(is_cross_solved(solver.cube()));
        assert!(solver.moves().len() <= 12);
    }

    #[test]
    fn slice_moved_centers() {
        let solver = solve_cross_from("M E S R");
        assert!(is_cross_solved(solver.cube()));
    }
}
