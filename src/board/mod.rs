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

//! Xiangqi board and move rules
//!
//! A _board_ holds the pieces of a Xiangqi game and decides whether a
//! move is legal. The following features are supported:
//!
//! [x] Per-piece movement rules (palace, river, horse leg, elephant eye)
//! [x] Cannon captures over exactly one screen
//! [x] Flying general rule (kings may never face each other)
//! [x] Position notation import and export
//! [x] Move history with captured pieces, for take backs
//! [ ] Check and checkmate detection (a game ends when a king is taken)
//! [ ] Repetition and perpetual check adjudication
//! [ ] Legal move enumeration
//!
//! Some of the key abstractions include:
//!
//! * A `Position` is one of the 90 points on a 9-by-10 board. Files
//!   `FileA` .. `FileI` run from red's left and ranks `Rank0` .. `Rank9`
//!   run from red's home rank. Points are named by file letter and rank
//!   digit (e.g. `a0` .. `i9`).
//!
//! * A `Mask` is a 90-bit value with one bit per point. Masks track
//!   which points each side occupies and describe the fixed points of
//!   the king, advisers and elephants. They combine with `|` and `&`, and
//!   iterate in both directions.
//!
//! * `Material` is a `PieceKind` of a given `Side`. A `Piece` is a
//!   material standing on a position, and a captured `Piece` keeps the
//!   position it was taken on.
//!
//! * A `Board` owns the grid. `apply_move` checks the mover's rules
//!   (see `PieceRules`) and only then changes the grid, handing back any
//!   captured piece. `undo_move` reverses it given that piece.
//!
//! * A `MoveRecord` lists every applied move with its captured piece
//!   and `MoveId` numbers plies, which decides whose turn it is.
//!

mod grid;
mod material;
mod moves;
mod notation;
mod position;
mod record;

pub use grid::*;
pub use material::*;
pub use moves::*;
pub use notation::*;
pub use position::*;
pub use record::*;

pub trait Turn {
    fn turn(&self) -> Side;
}
