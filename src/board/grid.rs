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
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use strum::IntoEnumIterator;

use super::material::{Material, Pair, Piece, PieceKind, Side};
use super::moves::{Move, MoveError, PieceRules};
use super::position::{File, Mask, Position, Rank};

use File::*;
use PieceKind::*;
use Rank::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Squares([Option<Piece>; Position::COUNT]);

impl Squares {
    fn empty() -> Self {
        Self([None; Position::COUNT])
    }
}

impl Index<Position> for Squares {
    type Output = Option<Piece>;

    fn index(&self, index: Position) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Position> for Squares {
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Masks {
    pieces: Pair<Mask>,
    kings: Mask,
}

impl Masks {
    fn empty() -> Self {
        Self {
            pieces: Pair::new(Mask::empty(), Mask::empty()),
            kings: Mask::empty(),
        }
    }
}

/// The 9-by-10 grid. Each cell owns at most one piece and the occupancy
/// masks always agree with the cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: Squares,
    masks: Masks,
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: Squares::empty(),
            masks: Masks::empty(),
        }
    }

    /// The standard opening setup.
    pub fn initial() -> Self {
        Self::empty().init()
    }

    fn init(mut self) -> Self {
        const BACK_FILES: [(File, PieceKind); 9] = [
            (FileA, Rook),
            (FileB, Horse),
            (FileC, Elephant),
            (FileD, Adviser),
            (FileE, King),
            (FileF, Adviser),
            (FileG, Elephant),
            (FileH, Horse),
            (FileI, Rook),
        ];
        for (file, kind) in BACK_FILES {
            self.init_file(file, Rank0, kind);
        }
        for file in [FileB, FileH] {
            self.init_file(file, Rank2, Cannon);
        }
        for file in [FileA, FileC, FileE, FileG, FileI] {
            self.init_file(file, Rank3, Pawn);
        }
        self
    }

    /// Places `kind` for red on `rank` and for black on the mirrored rank.
    fn init_file(&mut self, file: File, rank: Rank, kind: PieceKind) {
        for side in Side::iter() {
            let position = match side {
                Side::Red => Position::new(file, rank),
                Side::Black => Position::new(file, rank).mirror(),
            };
            self.place(Material::new(side, kind).at(position));
        }
    }

    /// Puts `piece` on its own position, returning whatever stood there.
    /// No rules are checked.
    pub fn place(&mut self, piece: Piece) -> Option<Piece> {
        let position = piece.position();
        let previous = self.remove(position);
        self.masks.pieces[piece.side()] |= position;
        if piece.is_king() {
            self.masks.kings |= position;
        }
        self.squares[position] = Some(piece);
        previous
    }

    pub fn remove(&mut self, position: Position) -> Option<Piece> {
        let previous = self.squares[position].take();
        if let Some(piece) = previous {
            self.masks.pieces[piece.side()].reset(position);
            self.masks.kings.reset(position);
        }
        previous
    }

    #[inline]
    pub fn is_vacant(&self, position: Position) -> bool {
        self.squares[position].is_none()
    }
    #[inline]
    pub fn occupant_at(&self, position: Position) -> Option<Piece> {
        self.squares[position]
    }

    pub fn require_occupant(&self, position: Position) -> Result<Piece> {
        self.occupant_at(position)
            .ok_or_else(|| MoveError::PieceNotFound(position).into())
    }

    #[inline]
    pub fn occupied(&self) -> Mask {
        self.masks.pieces[Side::Red] | self.masks.pieces[Side::Black]
    }
    #[inline]
    pub fn kings(&self) -> Mask {
        self.masks.kings
    }
    pub fn king(&self, side: Side) -> Option<Position> {
        (self.masks.kings & self.masks.pieces[side]).iter().next()
    }

    /// Pieces in index order.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.occupied().iter().filter_map(|position| self.squares[position])
    }

    /// Moves the piece at `mv.from` if its rules allow it and returns the
    /// captured piece. The board is untouched on error.
    pub fn apply_move(&mut self, mv: Move) -> Result<Option<Piece>> {
        let mover = self.require_occupant(mv.from)?;
        self.validate_move(mv)?;
        self.remove(mv.from);
        Ok(self.place(mover.moved_to(mv.to)))
    }

    /// Reverses `apply_move`. Assumes `mv` was the last move applied.
    pub fn undo_move(&mut self, mv: Move, captured: Option<Piece>) {
        if let Some(mover) = self.remove(mv.to) {
            self.place(mover.moved_to(mv.from));
        }
        if let Some(piece) = captured {
            self.place(piece.moved_to(mv.to));
        }
    }
}

impl Index<Position> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Position) -> &Self::Output {
        &self.squares[index]
    }
}

impl AsRef<Self> for Board {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl PieceRules for Board {}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.export_position())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Board::import_position(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use strum::IntoEnumIterator;

    fn pos(name: &str) -> Position {
        name.parse().unwrap()
    }

    #[test]
    fn test_initial_setup() {
        let board = Board::initial();
        assert_eq!(board.pieces().count(), 32);
        for side in Side::iter() {
            assert_eq!(board.pieces().filter(|p| p.side() == side).count(), 16);
        }
        assert_eq!(board.king(Side::Red), Some(pos("e0")));
        assert_eq!(board.king(Side::Black), Some(pos("e9")));
        assert_eq!(board[pos("b2")].map(|p| p.material()), Some(Material::RC));
        assert_eq!(board[pos("h7")].map(|p| p.material()), Some(Material::BC));
        assert_eq!(board[pos("c9")].map(|p| p.material()), Some(Material::BB));
        assert!(board.is_vacant(pos("e4")));
    }
    #[test]
    fn test_positions_match_cells() {
        let board = Board::initial();
        for position in Position::iter() {
            if let Some(piece) = board.occupant_at(position) {
                assert_eq!(piece.position(), position);
            }
        }
    }
    #[test]
    fn test_place_and_remove() {
        let mut board = Board::empty();
        assert!(board.place(Material::RK.at(pos("e0"))).is_none());
        assert!(!board.is_vacant(pos("e0")));
        assert_eq!(board.kings().len(), 1);
        let previous = board.place(Material::RR.at(pos("e0")));
        assert_eq!(previous.map(|p| p.material()), Some(Material::RK));
        assert!(board.kings().is_empty());
        assert!(board.remove(pos("e0")).is_some());
        assert!(board.occupied().is_empty());
    }
    #[test]
    fn test_require_occupant() {
        let board = Board::initial();
        assert!(board.require_occupant(pos("a0")).is_ok());
        let err = board.require_occupant(pos("a1")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MoveError>(),
            Some(MoveError::PieceNotFound(_))
        ));
    }
    #[test]
    fn test_apply_move_relocates_piece() {
        let mut board = Board::initial();
        let mv: Move = "h2e2".parse().unwrap();
        assert!(board.apply_move(mv).unwrap().is_none());
        assert!(board.is_vacant(pos("h2")));
        let piece = board[pos("e2")].unwrap();
        assert_eq!(piece.material(), Material::RC);
        assert_eq!(piece.position(), pos("e2"));
    }
    #[test]
    fn test_rook_up_open_file_captures() {
        let mut board =
            Board::import_position("rnbakabnr/9/1c5c1/2p1p1p1p/9/9/2P1P1P1P/1C5C1/9/RNBAKABNR")
                .unwrap();
        let captured = board.apply_move("a0a9".parse().unwrap()).unwrap();
        assert_eq!(captured.map(|p| p.material()), Some(Material::BR));
        assert_eq!(board[pos("a9")].map(|p| p.material()), Some(Material::RR));
    }
    #[test]
    fn test_blocked_rook_leaves_board_unchanged() {
        let mut board = Board::initial();
        let before = board.clone();
        let err = board.apply_move("a0a5".parse().unwrap()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MoveError>(),
            Some(MoveError::InvalidMove(_))
        ));
        assert_eq!(board, before);

        // blocked by an enemy short of the destination
        let mut board = Board::import_position("4k4/9/9/9/r8/9/9/9/9/R3K4").unwrap();
        let before = board.clone();
        assert!(board.apply_move("a0a9".parse().unwrap()).is_err());
        assert_eq!(board, before);
    }
    #[test]
    fn test_exposing_kings_leaves_board_unchanged() {
        let mut board = Board::import_position("4k4/9/9/9/9/4R4/9/9/9/4K4").unwrap();
        let before = board.clone();
        assert!(board.apply_move("e4a4".parse().unwrap()).is_err());
        assert_eq!(board, before);
    }
    #[test]
    fn test_undo_restores_capture() {
        let mut board = Board::initial();
        let before = board.clone();
        let mv: Move = "b2b9".parse().unwrap();
        let captured = board.apply_move(mv).unwrap();
        assert_eq!(captured.map(|p| p.material()), Some(Material::BN));
        board.undo_move(mv, captured);
        assert_eq!(board, before);
    }
    #[test]
    fn test_kings_never_face_after_legal_moves() {
        let mut board = Board::import_position("3k5/9/9/9/9/9/9/9/9/4K4").unwrap();
        let is_invalid = |result: anyhow::Result<Option<Piece>>| {
            matches!(
                result.unwrap_err().downcast_ref::<MoveError>(),
                Some(MoveError::InvalidMove(_))
            )
        };
        assert!(is_invalid(board.apply_move("e0d0".parse().unwrap())));
        assert!(board.apply_move("e0e1".parse().unwrap()).unwrap().is_none());
        assert!(is_invalid(board.apply_move("e1d1".parse().unwrap())));
        assert!(board.apply_move("e1f1".parse().unwrap()).unwrap().is_none());
        let red = board.king(Side::Red).unwrap();
        let black = board.king(Side::Black).unwrap();
        assert!(red.file() != black.file());
    }
    #[test]
    fn test_board_serde() {
        let board = Board::initial();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, format!("\"{}\"", START_POSITION));
        let copy: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(copy, board);
        assert!(serde_json::from_str::<Board>("\"9/9\"").is_err());
    }
}
