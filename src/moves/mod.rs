//! Moves as abstract group elements, and sequences of them that can be inverted and simplified.
//!
//! Nothing here knows about cubes. [`crate::cube333::moves::Move`] is the one implementation.

use std::fmt;

/// What is left of two adjacent moves once they are merged. See [`Move::cancel`].
#[derive(Debug, Eq, PartialEq)]
pub enum Cancellation<M: Move> {
    /// Nothing, as with `R R'`
    NoMove,
    /// A single move, as `R R` becomes `R2`
    OneMove(M),
    /// Both moves unchanged, as with `R U`
    TwoMove(M, M),
}

/// A power of one generator of a puzzle's move group.
///
/// Simplification only uses two kinds of relation: the order of each generator, through
/// [`cancel`](Move::cancel), and which generators commute, through
/// [`commutes_with`](Move::commutes_with). On a 3x3x3 that means `R4` is the identity and `R L`
/// equals `L R`.
pub trait Move: Eq + Clone {
    /// The move undoing this one, so that the two together are the identity in either order.
    fn inverse(self) -> Self
    where
        Self: Sized;

    /// Whether `self b` equals `b self`. This must be transitive: if `a` commutes with `b` and
    /// `b` with `c`, then `a` commutes with `c`.
    fn commutes_with(&self, b: &Self) -> bool;

    /// Merge `self` followed by `b` where the generator's order allows it.
    ///
    /// ```rust
    /// use cube_solver::cube333::moves::{Layer, Move, Turn};
    /// use cube_solver::moves::{Cancellation, Move as _};
    ///
    /// let r = Move::new(Layer::R, Turn::Clockwise);
    /// let u_prime = Move::new(Layer::U, Turn::CounterClockwise);
    /// assert_eq!(r.cancel(u_prime), Cancellation::TwoMove(r, u_prime));
    /// assert_eq!(r.cancel(r), Cancellation::OneMove(Move::new(Layer::R, Turn::Double)));
    /// assert_eq!(r.cancel(r.inverse()), Cancellation::NoMove);
    /// ```
    fn cancel(self, b: Self) -> Cancellation<Self>
    where
        Self: Sized;
}

/// An algorithm: moves applied left to right.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct MoveSequence<M: Move>(pub Vec<M>);

impl<M: Move> MoveSequence<M> {
    /// The sequence undoing this one: the moves reversed, each inverted.
    pub fn inverse(self) -> Self {
        Self(self.0.into_iter().rev().map(|m| m.inverse()).collect())
    }

    /// Simplify as far as the [`Move`] relations allow, merging moves across any run of moves
    /// they commute with.
    pub fn cancel(mut self) -> Self {
        let mut cancellation: Vec<M> = Vec::new();

        for next_mv in self.0.drain(..) {
            // Work back from the end of the reduced prefix through every move the new one
            // commutes with. Since the prefix is already reduced, merging into one of those moves
            // can't create any further cancellation.
            let mut pending = Some(next_mv);

            for i in (0..cancellation.len()).rev() {
                let Some(mv) = pending.take() else { break };
                match cancellation[i].clone().cancel(mv.clone()) {
                    Cancellation::NoMove => {
                        cancellation.remove(i);
                        break;
                    }
                    Cancellation::OneMove(merged) => {
                        cancellation[i] = merged;
                        break;
                    }
                    Cancellation::TwoMove(_, _) => {}
                }

                let commutes = mv.commutes_with(&cancellation[i]);
                pending = Some(mv);
                if !commutes {
                    break;
                }
            }

            if let Some(mv) = pending {
                cancellation.push(mv);
            }
        }

        Self(cancellation)
    }

    /// Append another sequence to the end of this one.
    pub fn append(mut self, mut other: Self) -> Self {
        self.0.append(&mut other.0);
        self
    }

    /// The number of moves in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence has no moves.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the moves in order.
    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.0.iter()
    }
}

impl<M: Move> FromIterator<M> for MoveSequence<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<M: Move> IntoIterator for MoveSequence<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<M: Move + fmt::Display> fmt::Display for MoveSequence<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for m in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{m}")?;
            first = false;
        }
        Ok(())
    }
}
