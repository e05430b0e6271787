//! Match rule configuration.

use serde::{Deserialize, Serialize};

/// Tunable match rules.
///
/// Defaults are the shipped arcade balance; tests override individual
/// fields to reach edge cases quickly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRules {
    // === Timer ===
    /// Seconds on the clock per question (default: 5)
    pub question_secs: u32,
    /// Advisory warning threshold, whole seconds remaining (default: 2)
    pub low_time_threshold: u32,

    // === Rope ===
    /// Starting rope position on the 0..=100 line (default: 50)
    pub rope_start: u8,
    /// Rope shift toward the answerer's goal on a correct answer (default: 10)
    pub correct_shift: u8,
    /// Rope shift toward the opponent's goal on a wrong answer (default: 5)
    pub incorrect_shift: u8,

    // === Streaks ===
    /// Consecutive correct answers that trigger a power move (default: 3)
    pub streak_length: u32,
    /// Rope position a player 1 power move snaps to (default: 15)
    pub power_position_p1: u8,
    /// Rope position a player 2 power move snaps to (default: 85)
    pub power_position_p2: u8,
    /// Consecutive wrong answers that freeze the player (default: 3)
    pub wrong_streak_length: u32,
    /// Freeze duration in milliseconds (default: 2000)
    pub freeze_ms: u64,

    // === Tournament ===
    /// Questions per tournament match (default: 20)
    pub tournament_questions: u32,
    /// Coins banked per correct answer in a tournament (default: 5)
    pub tournament_coins_per_correct: u32,

    // === Coins ===
    /// Minimum coin award for any finished non-tournament match (default: 5)
    pub base_win_coins: u32,
    /// Non-tournament award is `winner_score * this`, floored at
    /// `base_win_coins` (default: 2)
    pub win_coins_per_point: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            question_secs: 5,
            low_time_threshold: 2,

            rope_start: 50,
            correct_shift: 10,
            incorrect_shift: 5,

            streak_length: 3,
            power_position_p1: 15,
            power_position_p2: 85,
            wrong_streak_length: 3,
            freeze_ms: 2000,

            tournament_questions: 20,
            tournament_coins_per_correct: 5,

            base_win_coins: 5,
            win_coins_per_point: 2,
        }
    }
}
