// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use anyhow::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::grid::Board;
use super::material::{Material, Pair, PieceKind, Side};
use super::position::{between, File, Mask, Offset, Position, Rank};

use File::*;
use PieceKind::*;
use Rank::*;
use Side::*;

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("The move {0} is not legal")]
    InvalidMove(Move),
    #[error("Move command should be 4 characters like \"h2e2\" but got \"{0}\"")]
    MalformedMove(String),
    #[error("There is no piece at {0}")]
    PieceNotFound(Position),
}
use MoveError::*;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedMove(s.to_string());
        let chars: Vec<char> = s.chars().collect();
        let &[f1, r1, f2, r2] = chars.as_slice() else {
            return Err(malformed());
        };
        let from = Position::try_from_chars(f1, r1).ok_or_else(malformed)?;
        let to = Position::try_from_chars(f2, r2).ok_or_else(malformed)?;
        Ok(Self::new(from, to))
    }
}

/// Legality checks for every piece kind. All checks read the board as it
/// stands before the move and never mutate it.
pub trait PieceRules: AsRef<Board> {
    fn validate_move(&self, mv: Move) -> Result<()> {
        let board: &Board = self.as_ref();
        let piece = board.require_occupant(mv.from)?;
        if mv.from == mv.to {
            return Err(InvalidMove(mv).into());
        }
        if let Some(target) = board.occupant_at(mv.to) {
            if target.side() == piece.side() {
                return Err(InvalidMove(mv).into());
            }
        }
        let side = piece.side();
        let legal = match piece.kind() {
            King => self.is_legal_king_move(side, mv),
            Adviser => self.is_legal_adviser_move(side, mv) && !self.exposes_generals(mv),
            Elephant => self.is_legal_elephant_move(side, mv) && !self.exposes_generals(mv),
            Horse => self.is_legal_horse_move(mv) && !self.exposes_generals(mv),
            Rook => self.is_legal_rook_move(mv) && !self.exposes_generals(mv),
            Cannon => self.is_legal_cannon_move(mv) && !self.exposes_generals(mv),
            Pawn => self.is_legal_pawn_move(side, mv) && !self.exposes_generals(mv),
        };
        if !legal {
            return Err(InvalidMove(mv).into());
        }
        Ok(())
    }

    fn is_legal_king_move(&self, side: Side, mv: Move) -> bool {
        let Offset { x, y } = mv.to - mv.from;
        PALACES[side].contains(mv.to) && x.abs() + y.abs() == 1 && !self.faces_general(side, mv)
    }

    fn is_legal_adviser_move(&self, side: Side, mv: Move) -> bool {
        let Offset { x, y } = mv.to - mv.from;
        ADVISER_POINTS[side].contains(mv.to) && x.abs() == 1 && y.abs() == 1
    }

    fn is_legal_elephant_move(&self, side: Side, mv: Move) -> bool {
        let board: &Board = self.as_ref();
        let Offset { x, y } = mv.to - mv.from;
        ELEPHANT_POINTS[side].contains(mv.to)
            && x.abs() == 2
            && y.abs() == 2
            // the elephant eye
            && (between(mv.from, mv.to) & board.occupied()).is_empty()
    }

    fn is_legal_horse_move(&self, mv: Move) -> bool {
        let board: &Board = self.as_ref();
        let Offset { x, y } = mv.to - mv.from;
        let leg = match (x.abs(), y.abs()) {
            (1, 2) => mv.from + Offset::new(0, y / 2),
            (2, 1) => mv.from + Offset::new(x / 2, 0),
            _ => return false,
        };
        matches!(leg, Some(leg) if board.is_vacant(leg))
    }

    fn is_legal_rook_move(&self, mv: Move) -> bool {
        is_straight(mv) && self.screens(mv) == 0
    }

    fn is_legal_cannon_move(&self, mv: Move) -> bool {
        let board: &Board = self.as_ref();
        if !is_straight(mv) {
            return false;
        }
        // own pieces at the destination are rejected before this point
        match board.occupant_at(mv.to) {
            None => self.screens(mv) == 0,
            Some(_) => self.screens(mv) == 1,
        }
    }

    fn is_legal_pawn_move(&self, side: Side, mv: Move) -> bool {
        match mv.to - mv.from {
            Offset { x: 0, y } => y == side.forward(),
            Offset { x, y: 0 } => x.abs() == 1 && has_crossed_river(side, mv.from.rank()),
            _ => false,
        }
    }

    /// Number of occupied points strictly between the ends of `mv`.
    fn screens(&self, mv: Move) -> usize {
        let board: &Board = self.as_ref();
        (between(mv.from, mv.to) & board.occupied()).len()
    }

    /// For a king move: whether the first piece met when looking from the
    /// destination towards the far side is the enemy king. The king's
    /// origin counts as vacated.
    fn faces_general(&self, side: Side, mv: Move) -> bool {
        let board: &Board = self.as_ref();
        let step = Offset::new(0, side.forward());
        let mut next = mv.to + step;
        while let Some(position) = next {
            if position != mv.from {
                if let Some(piece) = board.occupant_at(position) {
                    return piece.is_king() && piece.side() != side;
                }
            }
            next = position + step;
        }
        false
    }

    /// For a non-king move: whether the two kings are adjacent among the
    /// occupied points of the origin file once the origin is left out.
    fn exposes_generals(&self, mv: Move) -> bool {
        let board: &Board = self.as_ref();
        let file = mv.from.file().to_mask() - mv.from;
        let mut previous_is_king = false;
        for position in (file & board.occupied()).iter() {
            let is_king = board.kings().contains(position);
            if is_king && previous_is_king {
                return true;
            }
            previous_is_king = is_king;
        }
        false
    }
}

#[inline]
fn is_straight(mv: Move) -> bool {
    mv.from != mv.to && (mv.from.file() == mv.to.file() || mv.from.rank() == mv.to.rank())
}

#[inline]
fn has_crossed_river(side: Side, rank: Rank) -> bool {
    match side {
        Red => rank >= Rank5,
        Black => rank <= Rank4,
    }
}

/// Whether `material` may ever stand on `position`. Only the kinds
/// confined to fixed points are restricted.
pub(super) fn is_reachable(material: Material, position: Position) -> bool {
    let side = material.side();
    match material.kind() {
        King => PALACES[side].contains(position),
        Adviser => ADVISER_POINTS[side].contains(position),
        Elephant => ELEPHANT_POINTS[side].contains(position),
        Horse | Rook | Cannon | Pawn => true,
    }
}

static PALACES: Lazy<Pair<Mask>> = Lazy::new(|| {
    let red = Mask::from_positions(
        [Rank0, Rank1, Rank2]
            .into_iter()
            .flat_map(|rank| [FileD, FileE, FileF].map(|file| Position::new(file, rank))),
    );
    Pair::new(red, red.mirror())
});

static ADVISER_POINTS: Lazy<Pair<Mask>> = Lazy::new(|| {
    const POINTS: [Position; 5] = [
        Position::new(FileD, Rank0),
        Position::new(FileF, Rank0),
        Position::new(FileE, Rank1),
        Position::new(FileD, Rank2),
        Position::new(FileF, Rank2),
    ];
    let red = Mask::from_positions(POINTS);
    Pair::new(red, red.mirror())
});

static ELEPHANT_POINTS: Lazy<Pair<Mask>> = Lazy::new(|| {
    const POINTS: [Position; 7] = [
        Position::new(FileC, Rank0),
        Position::new(FileG, Rank0),
        Position::new(FileA, Rank2),
        Position::new(FileE, Rank2),
        Position::new(FileI, Rank2),
        Position::new(FileC, Rank4),
        Position::new(FileG, Rank4),
    ];
    let red = Mask::from_positions(POINTS);
    Pair::new(red, red.mirror())
});
