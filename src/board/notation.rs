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

use anyhow::Result;
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::grid::Board;
use super::material::{Material, Pair, PieceKind, Side};
use super::moves::{is_reachable, Move};
use super::position::{File, Position, Rank};
use super::record::{MoveRecord, RecordEntry};

use PieceKind::*;

/// Board part of the standard opening record.
pub const START_POSITION: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR";

#[derive(Error, Debug)]
pub enum NotationError {
    #[error("\"{0}\" is not a point on the board")]
    InvalidPosition(String),
    #[error("Malformed board \"{0}\"")]
    InvalidBoard(String),
    #[error("Impossible setup: {0}")]
    InvalidSetup(String),
    #[error("Malformed record \"{0}\"")]
    InvalidRecord(String),
    #[error("Malformed history entry \"{0}\"")]
    InvalidHistory(String),
}
use NotationError::*;

impl Material {
    pub fn to_char(&self) -> char {
        let c = match self.kind() {
            King => 'K',
            Adviser => 'A',
            Elephant => 'B',
            Horse => 'N',
            Rook => 'R',
            Cannon => 'C',
            Pawn => 'P',
        };
        match self.side() {
            Side::Red => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn try_from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_uppercase() {
            'K' => King,
            'A' => Adviser,
            'B' => Elephant,
            'N' => Horse,
            'R' => Rook,
            'C' => Cannon,
            'P' => Pawn,
            _ => return None,
        };
        let side = if c.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Black
        };
        Some(Self::new(side, kind))
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Board {
    /// Rank 9 first, files `a` to `i`, runs of empty points as digits.
    pub fn export_position(&self) -> String {
        let mut text = String::with_capacity(START_POSITION.len());
        for rank in Rank::iter().rev() {
            let mut vacant = 0;
            for file in File::iter() {
                match self[Position::new(file, rank)] {
                    Some(piece) => {
                        if vacant > 0 {
                            text.push_str(&vacant.to_string());
                            vacant = 0;
                        }
                        text.push(piece.material().to_char());
                    }
                    None => vacant += 1,
                }
            }
            if vacant > 0 {
                text.push_str(&vacant.to_string());
            }
            if rank != Rank::Rank0 {
                text.push('/');
            }
        }
        text
    }

    /// Inverse of `export_position`. Rejects boards that no game could
    /// reach: more than one king per side, or a king, adviser or elephant
    /// off its points.
    pub fn import_position(text: &str) -> Result<Self> {
        let invalid = || InvalidBoard(text.to_string());
        let rows: Vec<&str> = text.split('/').collect();
        if rows.len() != Rank::COUNT {
            return Err(invalid().into());
        }
        let mut board = Board::empty();
        let mut kings = Pair::new(0, 0);
        for (row, rank) in rows.into_iter().zip(Rank::iter().rev()) {
            let mut file = 0;
            for c in row.chars() {
                if let Some(run) = c.to_digit(10).filter(|&run| run > 0) {
                    file += run as usize;
                    continue;
                }
                let material = Material::try_from_char(c).ok_or_else(invalid)?;
                if file >= File::COUNT {
                    return Err(invalid().into());
                }
                let position = Position::new(File::from_index(file), rank);
                if !is_reachable(material, position) {
                    let reason = format!("{} cannot stand on {}", material, position);
                    return Err(InvalidSetup(reason).into());
                }
                if material.kind() == King {
                    kings[material.side()] += 1;
                }
                board.place(material.at(position));
                file += 1;
            }
            if file != File::COUNT {
                return Err(invalid().into());
            }
        }
        for side in Side::iter() {
            if kings[side] > 1 {
                let reason = format!("{} has {} kings", side, kings[side]);
                return Err(InvalidSetup(reason).into());
            }
        }
        Ok(board)
    }
}

/// A history token is `ffrr`, followed by `-` and the captured piece's
/// letter when the move captured.
impl fmt::Display for RecordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.captured {
            Some(piece) => write!(f, "{}-{}", self.mv, piece.material()),
            None => write!(f, "{}", self.mv),
        }
    }
}

impl FromStr for RecordEntry {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidHistory(s.to_string());
        let (mv, captured) = match s.split_once('-') {
            Some((mv, letter)) => {
                let mut chars = letter.chars();
                let material = match (chars.next(), chars.next()) {
                    (Some(c), None) => Material::try_from_char(c).ok_or_else(invalid)?,
                    _ => return Err(invalid()),
                };
                (mv, Some(material))
            }
            None => (s, None),
        };
        let mv: Move = mv.parse().map_err(|_| invalid())?;
        Ok(RecordEntry::new(mv, captured.map(|material| material.at(mv.to))))
    }
}

/// Space separated history tokens, oldest first.
pub fn format_history(record: &MoveRecord) -> String {
    record
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parse_history(text: &str) -> Result<MoveRecord> {
    let entries = text
        .split_whitespace()
        .map(RecordEntry::from_str)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries.into())
}
