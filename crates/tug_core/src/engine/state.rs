//! Live match data.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::engine::config::MatchRules;
use crate::models::{Difficulty, Player, Question};

/// Per-player tallies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// Correct answers this match.
    pub score: u32,
    /// Running correct-answer streak.
    pub streak: u32,
    /// Running wrong-answer streak.
    pub wrong_streak: u32,
    /// Submissions are ignored while frozen.
    pub frozen: bool,
}

/// Complete state of one match.
///
/// Owned and mutated exclusively by the engine; the API layer hands out
/// read-only views. A `BTreeSet` keeps the used-id set ordered so
/// serialized states compare stably across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Rope position on the 0..=100 line; 0 is player 1's win side.
    pub rope_position: u8,
    pub current_player: Player,
    /// Indexed by [`Player::index`].
    pub players: [PlayerSlot; 2],
    /// Active question; `None` once the match has ended.
    pub current_question: Option<Question>,
    /// Whole seconds remaining for the active question.
    pub time_left: u32,
    pub game_over: bool,
    /// Set when `game_over`; `None` there means a draw.
    pub winner: Option<Player>,
    /// Tier for non-tournament questions (tournaments always serve hard).
    pub difficulty: Difficulty,
    pub tournament: bool,
    /// Questions remaining in a tournament; stays 0 otherwise.
    pub questions_left: u32,
    /// Coins banked so far; becomes the award when the match ends.
    pub coins_earned: u32,
    /// Questions resolved so far (either player, any outcome).
    pub questions_answered: u32,
    pub used_question_ids: BTreeSet<String>,
}

impl MatchState {
    /// Fresh state at the opening question (question itself not yet dealt).
    pub fn new(difficulty: Difficulty, tournament: bool, rules: &MatchRules) -> Self {
        Self {
            rope_position: rules.rope_start,
            current_player: Player::P1,
            players: [PlayerSlot::default(), PlayerSlot::default()],
            current_question: None,
            time_left: rules.question_secs,
            game_over: false,
            winner: None,
            difficulty,
            tournament,
            questions_left: if tournament { rules.tournament_questions } else { 0 },
            coins_earned: 0,
            questions_answered: 0,
            used_question_ids: BTreeSet::new(),
        }
    }

    pub fn slot(&self, player: Player) -> &PlayerSlot {
        &self.players[player.index()]
    }

    pub fn slot_mut(&mut self, player: Player) -> &mut PlayerSlot {
        &mut self.players[player.index()]
    }

    /// Tier of the next question to deal.
    pub fn question_difficulty(&self) -> Difficulty {
        if self.tournament {
            Difficulty::Hard
        } else {
            self.difficulty
        }
    }
}
