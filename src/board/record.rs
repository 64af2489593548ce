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
use std::ops::Add;

use super::material::{Piece, Side};
use super::moves::Move;
use super::Turn;

use Side::*;

/// Ply index. Red moves on even plies, black on odd ones.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveId(u64);

impl MoveId {
    pub const START: MoveId = MoveId(0);

    /// The ply on which `turn` moves after `round_count` full rounds.
    #[inline]
    pub fn new(round_count: u32, turn: Side) -> Self {
        let base = u64::from(round_count) * 2;
        match turn {
            Red => Self(base),
            Black => Self(base + 1),
        }
    }
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
    /// Completed rounds.
    #[inline]
    pub fn round_count(&self) -> u64 {
        self.0 / 2
    }
    #[inline]
    pub fn round_number(&self) -> u64 {
        1 + self.round_count()
    }
    #[inline]
    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl Turn for MoveId {
    #[inline]
    fn turn(&self) -> Side {
        if self.0 % 2 == 0 {
            Red
        } else {
            Black
        }
    }
}

impl Add<u64> for MoveId {
    type Output = MoveId;
    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

/// One applied move and whatever it took off the board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordEntry {
    pub mv: Move,
    pub captured: Option<Piece>,
}

impl RecordEntry {
    pub fn new(mv: Move, captured: Option<Piece>) -> Self {
        Self { mv, captured }
    }
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Append-only log of applied moves, oldest first. Undo pops from the end.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MoveRecord {
    entries: Vec<RecordEntry>,
}

impl MoveRecord {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, entry: RecordEntry) {
        self.entries.push(entry);
    }
    pub fn pop(&mut self) -> Option<RecordEntry> {
        self.entries.pop()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn last(&self) -> Option<&RecordEntry> {
        self.entries.last()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, RecordEntry> {
        self.entries.iter()
    }
    /// Entries since the most recent capture, or `None` if nothing in the
    /// record captured.
    pub fn since_capture(&self) -> Option<usize> {
        self.iter().rev().position(RecordEntry::is_capture)
    }
}

impl From<Vec<RecordEntry>> for MoveRecord {
    fn from(entries: Vec<RecordEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a MoveRecord {
    type Item = &'a RecordEntry;
    type IntoIter = std::slice::Iter<'a, RecordEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
