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
use log::{debug, trace};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};

use super::{DrawReason, MatchError, MatchResult, MatchState, WinReason};
use crate::{
    format_history, parse_history, Board, Move, MoveError, MoveId, MoveRecord, NotationError,
    Piece, RecordEntry, Side, Turn,
};

use MatchState::*;

/// A game between red and black. Turn order follows the ply count,
/// including plies that happened before an imported history starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    board: Board,
    record: MoveRecord,
    state: MatchState,
    result: Option<MatchResult>,
    peaceful_moves: usize,
    // plies and peaceful moves played before the known history
    base_record_size: u64,
    base_peaceful_moves: usize,
}

impl Default for Match {
    fn default() -> Self {
        Self::initial()
    }
}

impl Match {
    pub fn initial() -> Self {
        Self::new(Board::initial())
    }

    fn new(board: Board) -> Self {
        Self {
            board,
            record: MoveRecord::new(),
            state: InProgress,
            result: None,
            peaceful_moves: 0,
            base_record_size: 0,
            base_peaceful_moves: 0,
        }
    }

    /// Rebuilds a match from `<position> <w|b> - - <peaceful> <round>` and
    /// the space separated tail of its history. Plies missing from the
    /// history count towards turn order but cannot be retracted.
    pub fn from_record(record: &str, history: &str) -> Result<Self> {
        let invalid = || NotationError::InvalidRecord(record.to_string());
        let fields: Vec<&str> = record.split_whitespace().collect();
        let &[layout, turn, "-", "-", peaceful, round] = fields.as_slice() else {
            return Err(invalid().into());
        };
        let board = Board::import_position(layout)?;
        let turn = match turn {
            "w" => Side::Red,
            "b" => Side::Black,
            _ => return Err(invalid().into()),
        };
        let peaceful_moves: usize = peaceful.parse().map_err(|_| invalid())?;
        let round_count = round
            .parse::<u32>()
            .ok()
            .and_then(|round| round.checked_sub(1))
            .ok_or_else(invalid)?;
        let record_size = MoveId::new(round_count, turn).value();
        let moves = parse_history(history)?;
        let known_size = moves.len() as u64;
        if known_size > record_size {
            return Err(invalid().into());
        }

        let mut game = Self::new(board);
        game.base_record_size = record_size - known_size;
        game.base_peaceful_moves = peaceful_moves.saturating_sub(moves.len());
        game.peaceful_moves = peaceful_moves;
        game.record = moves;

        let kings = (game.board.king(Side::Red), game.board.king(Side::Black));
        match kings {
            (Some(_), Some(_)) => {}
            (Some(_), None) => game.finish(MatchResult::Win(Side::Red, WinReason::KingCaptured)),
            (None, Some(_)) => game.finish(MatchResult::Win(Side::Black, WinReason::KingCaptured)),
            (None, None) => {
                return Err(NotationError::InvalidSetup("no king on the board".to_string()).into())
            }
        }
        debug!(
            "imported match at ply {} with {} known moves",
            game.ply().value(),
            game.record.len()
        );
        Ok(game)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
    #[inline]
    pub fn record(&self) -> &MoveRecord {
        &self.record
    }
    #[inline]
    pub fn state(&self) -> MatchState {
        self.state
    }
    #[inline]
    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }
    pub fn winner(&self) -> Option<Side> {
        self.result.and_then(|result| result.winner())
    }
    pub fn loser(&self) -> Option<Side> {
        self.result.and_then(|result| result.loser())
    }
    pub fn is_draw(&self) -> bool {
        self.result.is_some_and(|result| result.is_draw())
    }
    /// Consecutive plies without a capture.
    #[inline]
    pub fn peaceful_moves(&self) -> usize {
        self.peaceful_moves
    }
    /// The ply about to be played.
    #[inline]
    pub fn ply(&self) -> MoveId {
        MoveId::START + (self.base_record_size + self.record.len() as u64)
    }
    pub fn round_count(&self) -> u64 {
        self.ply().round_count()
    }

    /// Plays `mv` for the side to move and returns the captured piece.
    /// Nothing changes on error.
    pub fn submit_move(&mut self, mv: Move) -> Result<Option<Piece>> {
        self.require_in_progress()?;
        let piece = self.board.require_occupant(mv.from)?;
        if piece.side() != self.turn() {
            trace!("rejected {}: {} to move", mv, self.turn());
            return Err(MoveError::InvalidMove(mv).into());
        }
        let captured = match self.board.apply_move(mv) {
            Ok(captured) => captured,
            Err(err) => {
                trace!("rejected {}: {}", mv, err);
                return Err(err);
            }
        };
        self.record.push(RecordEntry::new(mv, captured));
        match captured {
            Some(_) => self.peaceful_moves = 0,
            None => self.peaceful_moves += 1,
        }
        trace!("{} played {} at ply {}", piece.side(), mv, self.ply().prev().value());
        if let Some(king) = captured.filter(Piece::is_king) {
            self.finish(MatchResult::Win(!king.side(), WinReason::KingCaptured));
        }
        Ok(captured)
    }

    pub fn try_move(&mut self, mv: Move) -> bool {
        self.submit_move(mv).is_ok()
    }

    /// Takes back the last known move. Does nothing once the known
    /// history is exhausted.
    pub fn retract(&mut self) -> Result<Option<Move>> {
        let Some(entry) = self.record.last().copied() else {
            return Ok(None);
        };
        self.require_in_progress()?;
        self.record.pop();
        self.board.undo_move(entry.mv, entry.captured);
        self.peaceful_moves = match self.peaceful_moves {
            0 => self
                .record
                .since_capture()
                .unwrap_or(self.base_peaceful_moves + self.record.len()),
            count => count - 1,
        };
        trace!("retracted {} back to ply {}", entry.mv, self.ply().value());
        Ok(Some(entry.mv))
    }

    pub fn resign(&mut self, side: Side) -> Result<()> {
        self.require_in_progress()?;
        self.finish(MatchResult::Win(!side, WinReason::Resigned));
        Ok(())
    }

    pub fn declare_draw(&mut self) -> Result<()> {
        self.require_in_progress()?;
        self.finish(MatchResult::Draw(DrawReason::Agreed));
        Ok(())
    }

    /// `<position> <w|b> - - <peaceful> <round>`
    pub fn to_record(&self) -> String {
        let turn = match self.turn() {
            Side::Red => 'w',
            Side::Black => 'b',
        };
        format!(
            "{} {} - - {} {}",
            self.board.export_position(),
            turn,
            self.peaceful_moves,
            self.ply().round_number()
        )
    }

    pub fn history(&self) -> String {
        format_history(&self.record)
    }

    fn require_in_progress(&self) -> Result<()> {
        match self.state {
            InProgress => Ok(()),
            state => Err(MatchError::InvalidState(state).into()),
        }
    }

    fn finish(&mut self, result: MatchResult) {
        debug!("match finished at ply {}: {:?}", self.ply().value(), result);
        self.state = Finished;
        self.result = Some(result);
    }
}

impl Turn for Match {
    #[inline]
    fn turn(&self) -> Side {
        self.ply().turn()
    }
}

impl AsRef<Board> for Match {
    fn as_ref(&self) -> &Board {
        &self.board
    }
}

impl Serialize for Match {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.to_record())?;
        tuple.serialize_element(&self.history())?;
        tuple.serialize_element(&self.result)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Match {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MatchVisitor;
        impl<'de> serde::de::Visitor<'de> for MatchVisitor {
            type Value = (String, String, Option<MatchResult>);
            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a Match condensed into a 3-element tuple")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let record = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::custom("Missing elements"))?;
                let history = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::custom("Missing elements"))?;
                let result = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::custom("Missing elements"))?;
                Ok((record, history, result))
            }
        }
        let (record, history, result) = deserializer.deserialize_tuple(3, MatchVisitor)?;
        let mut game = Match::from_record(&record, &history).map_err(serde::de::Error::custom)?;
        if result.is_some() {
            game.state = Finished;
            game.result = result;
        }
        Ok(game)
    }
}
