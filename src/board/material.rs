// Copyright 2026 Tobin Edwards
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

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

use super::position::Position;

/// A piece kind belonging to one side, without a location.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    side: Side,
    kind: PieceKind,
}

impl Material {
    pub const RK: Self = Self::red(King);
    pub const RA: Self = Self::red(Adviser);
    pub const RB: Self = Self::red(Elephant);
    pub const RN: Self = Self::red(Horse);
    pub const RR: Self = Self::red(Rook);
    pub const RC: Self = Self::red(Cannon);
    pub const RP: Self = Self::red(Pawn);

    pub const BK: Self = Self::black(King);
    pub const BA: Self = Self::black(Adviser);
    pub const BB: Self = Self::black(Elephant);
    pub const BN: Self = Self::black(Horse);
    pub const BR: Self = Self::black(Rook);
    pub const BC: Self = Self::black(Cannon);
    pub const BP: Self = Self::black(Pawn);

    #[inline]
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    #[inline]
    pub const fn red(kind: PieceKind) -> Self {
        Self::new(Red, kind)
    }

    #[inline]
    pub const fn black(kind: PieceKind) -> Self {
        Self::new(Black, kind)
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Puts this material on `position`.
    #[inline]
    pub const fn at(self, position: Position) -> Piece {
        Piece::new(self, position)
    }
}

/// A piece on (or captured from) the board. Its position always matches
/// the cell holding it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    material: Material,
    position: Position,
}

impl Piece {
    #[inline]
    pub const fn new(material: Material, position: Position) -> Self {
        Self { material, position }
    }
    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }
    #[inline]
    pub fn side(&self) -> Side {
        self.material.side
    }
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.material.kind
    }
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }
    #[inline]
    pub fn is_king(&self) -> bool {
        self.kind().is_king()
    }
    #[inline]
    pub(crate) fn moved_to(self, position: Position) -> Self {
        Self { position, ..self }
    }
}

use Side::{Black, Red};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    /// Rank delta of a forward step.
    pub const fn forward(&self) -> isize {
        match self {
            Red => 1,
            Black => -1,
        }
    }
}

impl Not for Side {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            Red => Black,
            Black => Red,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub const fn new(red: T, black: T) -> Self {
        Self((red, black))
    }
}

impl<T> Pair<T> {
    pub fn red(&self) -> &T {
        &self.0 .0
    }
    pub fn red_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn black(&self) -> &T {
        &self.0 .1
    }
    pub fn black_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T: Hash> Hash for Pair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.red().hash(state);
        self.black().hash(state);
    }
}

impl<T> Index<Side> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Side) -> &Self::Output {
        match index {
            Red => self.red(),
            Black => self.black(),
        }
    }
}

impl<T> IndexMut<Side> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        match index {
            Red => self.red_mut(),
            Black => self.black_mut(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PieceKind {
    King,
    Adviser,
    Elephant,
    Horse,
    Rook,
    Cannon,
    Pawn,
}
use PieceKind::{Adviser, Cannon, Elephant, Horse, King, Pawn, Rook};

impl PieceKind {
    pub fn is_king(&self) -> bool {
        matches!(*self, King)
    }
}
