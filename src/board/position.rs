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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitOrAssign, Sub};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::notation::NotationError;

/// A point on the 9-by-10 board. Files run `a` to `i` from red's left
/// and ranks run `0` (red's home rank) to `9` (black's home rank).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    file: File,
    rank: Rank,
}

impl Position {
    pub const COUNT: usize = File::COUNT * Rank::COUNT;

    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self { file, rank }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        debug_assert!(index < Self::COUNT);
        Self::new(
            File::from_index(index % File::COUNT),
            Rank::from_index(index / File::COUNT),
        )
    }
    #[inline]
    pub fn try_from_chars(f: char, r: char) -> Option<Self> {
        let file = File::try_from_char(f)?;
        let rank = Rank::try_from_char(r)?;
        Some(Self::new(file, rank))
    }
    #[inline]
    pub fn try_from_string(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let f = chars.next()?;
        let r = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::try_from_chars(f, r)
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        self.rank.to_index() * File::COUNT + self.file.to_index()
    }
    #[inline]
    pub const fn to_mask(&self) -> Mask {
        Mask::new(0x1 << self.to_index())
    }
    /// Zero-based `(column, row)` pair.
    #[inline]
    pub const fn to_coordinate(&self) -> (usize, usize) {
        (self.file.to_index(), self.rank.to_index())
    }
    #[inline]
    pub const fn file(&self) -> File {
        self.file
    }
    #[inline]
    pub const fn rank(&self) -> Rank {
        self.rank
    }
    /// The same point seen from the other side of the river.
    #[inline]
    pub const fn mirror(&self) -> Self {
        Self::new(self.file, Rank::from_index(Rank::COUNT - 1 - self.rank.to_index()))
    }

    pub fn iter() -> impl DoubleEndedIterator<Item = Position> {
        (0..Self::COUNT).map(Self::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

impl FromStr for Position {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_string(s).ok_or_else(|| NotationError::InvalidPosition(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum File {
    FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH, FileI,
}

use File::{
    FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH, FileI,
};

impl File {
    pub const COUNT: usize = 9;

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [File; File::COUNT] = [
            FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH, FileI,
        ];
        debug_assert!(index < File::COUNT);
        VALUES[index]
    }
    #[inline]
    pub const fn try_from_char(c: char) -> Option<Self> {
        match c {
            'a' => Some(FileA),
            'b' => Some(FileB),
            'c' => Some(FileC),
            'd' => Some(FileD),
            'e' => Some(FileE),
            'f' => Some(FileF),
            'g' => Some(FileG),
            'h' => Some(FileH),
            'i' => Some(FileI),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn to_char(&self) -> char {
        (b'a' + self.to_index() as u8) as char
    }
    pub fn to_mask(&self) -> Mask {
        Mask::from_positions(Rank::iter().map(|rank| Position::new(*self, rank)))
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Add<isize> for File {
    type Output = Option<Self>;
    fn add(self, rhs: isize) -> Self::Output {
        match self.to_index().checked_add_signed(rhs) {
            Some(i) if i < File::COUNT => Some(Self::from_index(i)),
            _ => None,
        }
    }
}

impl Sub for File {
    type Output = isize;

    fn sub(self, rhs: Self) -> Self::Output {
        self.to_index() as isize - rhs.to_index() as isize
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Rank {
    Rank0, Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8, Rank9,
}

use Rank::{
    Rank0, Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8, Rank9,
};

impl Rank {
    pub const COUNT: usize = 10;

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Rank; Rank::COUNT] = [
            Rank0, Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8, Rank9,
        ];
        debug_assert!(index < Rank::COUNT);
        VALUES[index]
    }
    #[inline]
    pub fn try_from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|digit| Self::from_index(digit as usize))
    }
    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn to_char(&self) -> char {
        (b'0' + self.to_index() as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Add<isize> for Rank {
    type Output = Option<Self>;
    fn add(self, rhs: isize) -> Self::Output {
        match self.to_index().checked_add_signed(rhs) {
            Some(i) if i < Rank::COUNT => Some(Self::from_index(i)),
            _ => None,
        }
    }
}

impl Sub for Rank {
    type Output = isize;

    fn sub(self, rhs: Self) -> Self::Output {
        self.to_index() as isize - rhs.to_index() as isize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: isize,
    pub y: isize,
}

impl Offset {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    /// A single step in the direction of `self`, if `self` lies on a
    /// file, a rank or a diagonal.
    pub fn to_unit(self) -> Option<Self> {
        let (x, y) = match (self.x, self.y) {
            (0, 0) => return None,
            (x, y) if x == 0 || y == 0 || x.abs() == y.abs() => (x.signum(), y.signum()),
            _ => return None,
        };
        Some(Self { x, y })
    }
}

impl Add<Offset> for Position {
    type Output = Option<Position>;
    fn add(self, rhs: Offset) -> Self::Output {
        let file = (self.file() + rhs.x)?;
        let rank = (self.rank() + rhs.y)?;
        Some(Position::new(file, rank))
    }
}

impl Sub for Position {
    type Output = Offset;
    fn sub(self, rhs: Self) -> Self::Output {
        Offset::new(self.file() - rhs.file(), self.rank() - rhs.rank())
    }
}

/// Returns the points strictly between `from` and `to` when both lie on
/// one line, otherwise an empty mask.
pub(super) fn between(from: Position, to: Position) -> Mask {
    let mut mask = Mask::empty();
    if let Some(step) = (to - from).to_unit() {
        let mut next = from + step;
        while let Some(position) = next {
            if position == to {
                break;
            }
            mask.set(position);
            next = position + step;
        }
    }
    mask
}

/// One bit per point of the board, indexed by `Position::to_index`.
#[derive(Clone, Serialize, Deserialize, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(u128);

impl Mask {
    const BOARD: u128 = (1 << Position::COUNT) - 1;

    #[inline]
    pub const fn new(val: u128) -> Self {
        Self(val & Self::BOARD)
    }

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        positions
            .into_iter()
            .map(|position| position.to_mask())
            .reduce(|m1, m2| m1 | m2)
            .unwrap_or_default()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn contains(&self, position: Position) -> bool {
        (self.0 & position.to_mask().0) != 0
    }

    #[inline]
    pub fn set(&mut self, position: Position) {
        self.0 |= position.to_mask().0;
    }

    #[inline]
    pub fn reset(&mut self, position: Position) {
        self.0 &= !position.to_mask().0;
    }

    pub fn mirror(&self) -> Self {
        Self::from_positions(self.iter().map(|position| position.mirror()))
    }

    pub fn iter(&self) -> MaskIter {
        MaskIter(self.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                let position = Position::new(file, rank);
                write!(f, "{}", if self.contains(position) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Sub<Position> for Mask {
    type Output = Self;
    fn sub(self, rhs: Position) -> Self::Output {
        Self(self.0 & !rhs.to_mask().0)
    }
}

impl BitOr for Mask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<Position> for Mask {
    fn bitor_assign(&mut self, rhs: Position) {
        self.0 |= rhs.to_mask().0;
    }
}

impl BitAnd for Mask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Yields positions in index order, i.e. rank by rank from red's home
/// rank and file `a` to `i` within a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskIter(u128);

impl Iterator for MaskIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let position = Position::from_index(self.0.trailing_zeros() as usize);
            self.0 &= !position.to_mask().0;
            return Some(position);
        }
        None
    }
}

impl DoubleEndedIterator for MaskIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let position = Position::from_index(127 - self.0.leading_zeros() as usize);
            self.0 &= !position.to_mask().0;
            return Some(position);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Position {
        name.parse().unwrap()
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(pos("a0").to_coordinate(), (0, 0));
        assert_eq!(pos("a9").to_coordinate(), (0, 9));
        assert_eq!(pos("i0").to_coordinate(), (8, 0));
        assert_eq!(pos("i9").to_coordinate(), (8, 9));
        assert_eq!(pos("h2").to_string(), "h2");
    }
    #[test]
    fn test_out_of_range_position() {
        assert!("j0".parse::<Position>().is_err());
        assert!("0a".parse::<Position>().is_err());
        assert!("a10".parse::<Position>().is_err());
        assert!("a".parse::<Position>().is_err());
        assert!("A0".parse::<Position>().is_err());
    }
    #[test]
    fn test_index_round_trip() {
        for position in Position::iter() {
            assert_eq!(Position::from_index(position.to_index()), position);
        }
        assert_eq!(Position::iter().count(), 90);
    }
    #[test]
    fn test_offset_leaves_board() {
        assert_eq!(pos("a0") + Offset::new(-1, 0), None);
        assert_eq!(pos("i9") + Offset::new(0, 1), None);
        assert_eq!(pos("e4") + Offset::new(1, 2), Some(pos("f6")));
    }
    #[test]
    fn test_mirror() {
        assert_eq!(pos("e0").mirror(), pos("e9"));
        assert_eq!(pos("c4").mirror(), pos("c5"));
    }
    #[test]
    fn test_between_on_file() {
        let mask = between(pos("e0"), pos("e9"));
        assert_eq!(mask.len(), 8);
        assert!(!mask.contains(pos("e0")));
        assert!(mask.contains(pos("e1")));
        assert!(mask.contains(pos("e8")));
        assert!(!mask.contains(pos("e9")));
    }
    #[test]
    fn test_between_on_rank() {
        let mask = between(pos("h2"), pos("b2"));
        assert_eq!(mask.len(), 5);
        assert!(mask.contains(pos("c2")));
        assert!(mask.contains(pos("g2")));
    }
    #[test]
    fn test_between_diagonal_and_off_line() {
        assert_eq!(between(pos("c0"), pos("e2")), pos("d1").to_mask());
        assert!(between(pos("b0"), pos("c2")).is_empty());
        assert!(between(pos("e4"), pos("e5")).is_empty());
    }
    #[test]
    fn test_mask_iter_order() {
        let mask = Mask::from_positions([pos("e9"), pos("e0"), pos("e3")]);
        let forward: Vec<_> = mask.iter().collect();
        assert_eq!(forward, vec![pos("e0"), pos("e3"), pos("e9")]);
        let backward: Vec<_> = mask.iter().rev().collect();
        assert_eq!(backward, vec![pos("e9"), pos("e3"), pos("e0")]);
    }
    #[test]
    fn test_file_mask() {
        let file = File::FileE.to_mask();
        assert_eq!(file.len(), 10);
        assert!(file.contains(pos("e0")));
        assert!(!file.contains(pos("d0")));
        assert_eq!((file - pos("e4")).len(), 9);
        assert!(!(file - pos("e4")).contains(pos("e4")));
    }
}
