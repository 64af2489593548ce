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
use strum_macros::Display;
use thiserror::Error;

use crate::Side;

mod play;

pub use play::*;

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchState {
    InProgress,
    Finished,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    Win(Side, WinReason),
    Draw(DrawReason),
}

impl MatchResult {
    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchResult::Win(side, _) => Some(*side),
            MatchResult::Draw(_) => None,
        }
    }
    pub fn loser(&self) -> Option<Side> {
        self.winner().map(|side| !side)
    }
    pub fn is_draw(&self) -> bool {
        matches!(self, MatchResult::Draw(_))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinReason {
    KingCaptured,
    Resigned,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Agreed,
}

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("The match is {0}")]
    InvalidState(MatchState),
}
