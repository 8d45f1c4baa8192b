//! A layer by layer solver: cross, first two layers, then orientation and permutation of the last
//! layer.
//!
//! Every phase first holds the cube white side down with the red center in front, then repeats
//! one attempt at a time until its goal holds or it runs out of attempts. Attempts use direct
//! rules for the cross and [`LookupTables`] for the rest.

mod cross;
mod f2l;
mod last_layer;
pub mod tables;

pub use tables::{F2lCondition, F2lKey, LookupTables, OllKey, PllKey};

use super::moves::{Layer, Move, Turn};
use super::{Color, Cube, Face, Position};
use crate::error::SolveError;
use crate::moves::MoveSequence;

use std::fmt;
use std::sync::Arc;

/// The color held on D while solving.
pub const DOWN_COLOR: Color = Color::W;
/// The color held on F while solving.
pub const FRONT_COLOR: Color = Color::R;

/// One of the four solving phases, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The four edges around the down center
    Cross,
    /// The first two layers
    F2l,
    /// Orienting the last layer
    Oll,
    /// Permuting the last layer
    Pll,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Cross => "cross",
            Phase::F2l => "F2L",
            Phase::Oll => "OLL",
            Phase::Pll => "PLL",
        })
    }
}

/// How many attempts each phase may make.
///
/// Nothing proves these are enough for every state. They are large enough for every scramble the
/// test suite tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBounds {
    /// Passes over the four cross edges
    pub cross: usize,
    /// Passes over the four F2L pairs
    pub f2l: usize,
    /// Attempts at a single F2L pair within one pass
    pub f2l_pair: usize,
    /// Table lookups or two-look steps
    pub oll: usize,
    /// Table lookups or T perms
    pub pll: usize,
}

impl Default for PhaseBounds {
    fn default() -> Self {
        PhaseBounds {
            cross: 4,
            f2l: 4,
            f2l_pair: 12,
            oll: 10,
            pll: 4,
        }
    }
}

impl PhaseBounds {
    fn of(&self, phase: Phase) -> usize {
        match phase {
            Phase::Cross => self.cross,
            Phase::F2l => self.f2l,
            Phase::Oll => self.oll,
            Phase::Pll => self.pll,
        }
    }
}

trait Stage {
    const PHASE: Phase;

    fn is_done(cube: &Cube) -> bool;

    fn attempt(solver: &mut Solver) -> Result<(), SolveError>;
}

/// Hold the cube white side down and red side front. Applying this twice is the same as applying
/// it once.
pub fn orient_cube(cube: &mut Cube) -> MoveSequence<Move> {
    cube.orient(DOWN_COLOR, FRONT_COLOR)
}

fn held(cube: &Cube) -> Cube {
    let mut cube = cube.clone();
    orient_cube(&mut cube);
    cube
}

// Every sticker of the cubie at `position` matches the center of its face.
fn matches_centers(cube: &Cube, position: Position) -> bool {
    let cubie = cube.cubie_at(position);
    position
        .faces()
        .iter()
        .all(|&f| cubie.sticker(f) == Some(cube.center(f)))
}

/// Whether the four edges around the white center are in place.
pub fn is_cross_solved(cube: &Cube) -> bool {
    let cube = held(cube);
    [Position::DF, Position::DR, Position::DB, Position::DL]
        .into_iter()
        .all(|p| matches_centers(&cube, p))
}

/// Whether the white layer and the middle layer are solved.
pub fn is_f2l_solved(cube: &Cube) -> bool {
    let cube = held(cube);
    Position::ALL
        .into_iter()
        .filter(|p| !p.touches(Face::U))
        .all(|p| matches_centers(&cube, p))
}

/// Whether the first two layers are solved and the last layer shows one color on top.
pub fn is_oll_solved(cube: &Cube) -> bool {
    let up = held(cube);
    is_f2l_solved(cube) && up.face_stickers(Face::U).all(|c| c == up.center(Face::U))
}

/// Whether the whole cube is solved.
pub fn is_pll_solved(cube: &Cube) -> bool {
    cube.is_solved()
}

/// Solves a cube, keeping a log of every move and rotation it makes.
#[derive(Debug, Clone)]
pub struct Solver {
    cube: Cube,
    tables: Arc<LookupTables>,
    bounds: PhaseBounds,
    log: Vec<Move>,
}

impl Solver {
    /// A solver for `cube` that reads the given tables.
    pub fn new(cube: Cube, tables: Arc<LookupTables>) -> Self {
        Solver {
            cube,
            tables,
            bounds: PhaseBounds::default(),
            log: Vec::new(),
        }
    }

    /// Replace the attempt bounds.
    pub fn with_bounds(mut self, bounds: PhaseBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// The cube in its current state.
    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    /// Take the cube back.
    pub fn into_cube(self) -> Cube {
        self.cube
    }

    /// Every move made so far, rotations included.
    pub fn moves(&self) -> &[Move] {
        &self.log
    }

    /// The moves made so far, simplified.
    pub fn solution(&self) -> MoveSequence<Move> {
        MoveSequence(self.log.clone()).cancel()
    }

    /// Hold the cube white side down and red side front.
    pub fn orient_cube(&mut self) {
        let rotations = orient_cube(&mut self.cube);
        self.log.extend(rotations);
    }

    /// Run every phase in order. On failure the cube is left where the failing phase stopped.
    pub fn solve(&mut self) -> Result<(), SolveError> {
        self.solve_cross()?;
        self.solve_f2l()?;
        self.solve_oll()?;
        self.solve_pll()?;
        log::info!("solved in {} moves", self.solution().len());
        Ok(())
    }

    /// Solve the cross.
    pub fn solve_cross(&mut self) -> Result<(), SolveError> {
        self.run::<cross::Cross>()
    }

    /// Solve the first two layers. Expects the cross to be solved.
    pub fn solve_f2l(&mut self) -> Result<(), SolveError> {
        self.run::<f2l::F2l>()
    }

    /// Orient the last layer. Expects the first two layers to be solved.
    pub fn solve_oll(&mut self) -> Result<(), SolveError> {
        self.run::<last_layer::Oll>()
    }

    /// Permute the last layer. Expects the last layer to be oriented.
    pub fn solve_pll(&mut self) -> Result<(), SolveError> {
        self.run::<last_layer::Pll>()
    }

    fn run<S: Stage>(&mut self) -> Result<(), SolveError> {
        if self.cube.size() != 3 {
            return Err(SolveError::UnsupportedSize(self.cube.size()));
        }
        self.orient_cube();

        let bound = self.bounds.of(S::PHASE);
        for attempt in 0..bound {
            if S::is_done(&self.cube) {
                log::info!("{} solved after {attempt} attempts", S::PHASE);
                return Ok(());
            }
            log::debug!("{} attempt {}", S::PHASE, attempt + 1);
            S::attempt(self)?;
        }
        if S::is_done(&self.cube) {
            log::info!("{} solved after {bound} attempts", S::PHASE);
            return Ok(());
        }

        log::warn!("{} unsolved after {bound} attempts", S::PHASE);
        Err(SolveError::UnsolvableWithinBound {
            phase: S::PHASE,
            attempts: bound,
        })
    }

    fn apply(&mut self, mv: Move) -> Result<(), SolveError> {
        self.cube.apply(mv)?;
        self.log.push(mv);
        Ok(())
    }

    fn apply_all(&mut self, mvs: &MoveSequence<Move>) -> Result<(), SolveError> {
        mvs.iter().try_for_each(|&mv| self.apply(mv))
    }

    fn alg(&mut self, alg: &str) -> Result<(), SolveError> {
        let mvs: MoveSequence<Move> = alg.parse()?;
        self.apply_all(&mvs)
    }

    /// Turn `layer` by the first of none, a quarter, a half or an inverse quarter turn after
    /// which `goal` holds. Returns whether one did.
    fn seek(&mut self, layer: Layer, goal: impl Fn(&Cube) -> bool) -> Result<bool, SolveError> {
        match seek_turn(&self.cube, layer, goal)? {
            Some(Some(mv)) => {
                self.apply(mv)?;
                Ok(true)
            }
            Some(None) => Ok(true),
            None => Ok(false),
        }
    }

    /// The quarter turn of `face` after which `goal` holds, or the other one if neither does.
    fn toward(&self, face: Face, goal: impl Fn(&Cube) -> bool) -> Result<Move, SolveError> {
        let clockwise = Move::new(face.into(), Turn::Clockwise);
        let mut trial = self.cube.clone();
        trial.apply(clockwise)?;
        Ok(if goal(&trial) {
            clockwise
        } else {
            Move::new(face.into(), Turn::CounterClockwise)
        })
    }
}

const TURNS: [Option<Turn>; 4] = [
    None,
    Some(Turn::Clockwise),
    Some(Turn::Double),
    Some(Turn::CounterClockwise),
];

// `Some(None)` when no turn is needed.
fn seek_turn(
    cube: &Cube,
    layer: Layer,
    goal: impl Fn(&Cube) -> bool,
) -> Result<Option<Option<Move>>, SolveError> {
    for turn in TURNS {
        let mv = turn.map(|t| Move::new(layer, t));
        let mut trial = cube.clone();
        if let Some(mv) = mv {
            trial.apply(mv)?;
        }
        if goal(&trial) {
            return Ok(Some(mv));
        }
    }
    Ok(None)
}
