use std::collections::HashMap;

use super::movegen::legal_moves;
use super::position::Position;
use super::san::{parse_san, san_for_move};
use super::status::{self, DrawReason, GameStatus, Outcome};
use super::types::Move;
use crate::error::{ChessError, Result};

/// Occurrence count per position key. Each game owns its own table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Repetitions {
    counts: HashMap<u64, u32>,
}

impl Repetitions {
    pub fn starting_at(pos: &Position) -> Self {
        let mut r = Self::default();
        r.record(pos.key());
        r
    }

    pub fn count(&self, key: u64) -> u32 { self.counts.get(&key).copied().unwrap_or(0) }

    pub fn record(&mut self, key: u64) { *self.counts.entry(key).or_insert(0) += 1; }
}

/// A game in progress: position, repetition table, SAN history and decided result.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    repetitions: Repetitions,
    history: Vec<String>,
    legal: Vec<Move>,
    status: GameStatus,
    result: Option<Outcome>,
}

impl Default for Game {
    fn default() -> Self { Self::new() }
}

impl Game {
    pub fn new() -> Self { Self::from_position(Position::startpos()) }

    pub fn from_position(position: Position) -> Self {
        let repetitions = Repetitions::starting_at(&position);
        let mut g = Self { position, repetitions, history: Vec::new(), legal: Vec::new(), status: GameStatus::InProgress, result: None };
        g.refresh();
        g
    }

    fn refresh(&mut self) {
        self.legal = legal_moves(&self.position);
        let occurrences = self.repetitions.count(self.position.key());
        self.status = status::evaluate(&self.position, self.legal.len(), occurrences);
        if self.result.is_none() {
            self.result = self.status.outcome();
        }
    }

    #[inline]
    pub fn position(&self) -> &Position { &self.position }
    #[inline]
    pub fn repetitions(&self) -> &Repetitions { &self.repetitions }
    #[inline]
    pub fn history(&self) -> &[String] { &self.history }
    #[inline]
    pub fn legal_moves(&self) -> &[Move] { &self.legal }
    #[inline]
    pub fn status(&self) -> GameStatus { self.status }
    #[inline]
    pub fn result(&self) -> Option<Outcome> { self.result }
    #[inline]
    pub fn plies(&self) -> usize { self.history.len() }

    pub fn is_over(&self) -> bool { self.result.is_some() }

    /// How often the position reached by `mv` has already occurred in this game.
    pub fn occurrences_after(&self, mv: &Move) -> u32 { self.repetitions.count(self.position.apply(mv).key()) }

    pub fn san(&self, mv: &Move) -> String { san_for_move(&self.position, mv, &self.legal) }

    /// Applies a legal move and returns its SAN.
    pub fn play(&mut self, mv: &Move) -> Result<String> {
        if let Some(outcome) = self.result {
            return Err(ChessError::GameOver(outcome.to_string()));
        }
        let Some(mv) = self.legal.iter().find(|m| m.id() == mv.id()).copied() else {
            return Err(ChessError::InvalidMove(mv.to_string()));
        };
        let san = self.san(&mv);
        self.position = self.position.apply(&mv);
        self.repetitions.record(self.position.key());
        self.history.push(san.clone());
        self.refresh();
        Ok(san)
    }

    /// Matches free-form SAN text and plays it; the game is unchanged on error.
    pub fn play_san(&mut self, text: &str) -> Result<String> {
        if let Some(outcome) = self.result {
            return Err(ChessError::GameOver(outcome.to_string()));
        }
        let mv = parse_san(&self.position, text, &self.legal)?;
        self.play(&mv)
    }

    /// Declares the game drawn at the ply cap.
    pub fn adjudicate_ply_cap(&mut self) {
        if self.result.is_none() {
            self.result = Some(Outcome::Draw(DrawReason::PlyCap));
        }
    }

    /// Move list with move numbers followed by the result token.
    pub fn pgn_movetext(&self) -> String {
        let mut out = String::new();
        for (i, pair) in self.history.chunks(2).enumerate() {
            out.push_str(&format!("{}. {} ", i + 1, pair.join(" ")));
        }
        out.push_str(self.result.map(|r| r.result_token()).unwrap_or("*"));
        out
    }
}
