//! JSON boundary for embedding layers.
//!
//! Request and snapshot DTOs with serde defaults, so a thin UI shell can
//! drive a session with plain JSON strings and no knowledge of the engine
//! types.

use serde::{Deserialize, Serialize};

use crate::engine::MatchEngine;
use crate::error::{GameError, Result};
use crate::models::{Difficulty, Player, Question};

/// Request to start a match. Every field has a default, so `{}` starts a
/// casual easy two-player match with a random seed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartMatchRequest {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tournament: bool,
    /// Seats a scripted opponent of this tier on player 2's side.
    #[serde(default)]
    pub opponent: Option<Difficulty>,
    /// Fixed seed for replays; omitted draws a random one.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Skin pick from the shop screen.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectSkinRequest {
    /// Player number, 1 or 2.
    pub player: u8,
    pub skin_id: String,
}

pub(crate) fn player_from_number(number: u8) -> Result<Player> {
    match number {
        1 => Ok(Player::P1),
        2 => Ok(Player::P2),
        other => {
            Err(GameError::InvalidRequest(format!("player must be 1 or 2, got {}", other)))
        }
    }
}

/// Read-only view of the live match for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub rope_position: u8,
    /// Player number whose turn it is, 1 or 2.
    pub current_player: u8,
    pub time_left: u32,
    pub game_over: bool,
    /// Winning player number; `None` while running or on a draw.
    pub winner: Option<u8>,
    pub difficulty: Difficulty,
    pub tournament: bool,
    pub questions_left: u32,
    pub questions_answered: u32,
    pub coins_earned: u32,
    /// Seed this match runs on; replaying it reproduces the match.
    pub seed: u64,
    pub players: [PlayerSnapshot; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub score: u32,
    pub streak: u32,
    pub frozen: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSnapshot {
    pub id: String,
    pub text: String,
    pub options: Vec<i64>,
    /// The right answer; the shell renders feedback locally.
    pub answer: i64,
    pub difficulty: Difficulty,
}

impl From<&Question> for QuestionSnapshot {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            text: question.text.clone(),
            options: question.options.clone(),
            answer: question.answer,
            difficulty: question.difficulty,
        }
    }
}

impl MatchSnapshot {
    pub fn from_engine(engine: &MatchEngine) -> Self {
        let state = engine.state();
        Self {
            rope_position: state.rope_position,
            current_player: state.current_player.number(),
            time_left: state.time_left,
            game_over: state.game_over,
            winner: state.winner.map(|w| w.number()),
            difficulty: state.difficulty,
            tournament: state.tournament,
            questions_left: state.questions_left,
            questions_answered: state.questions_answered,
            coins_earned: state.coins_earned,
            seed: engine.seed(),
            players: [
                PlayerSnapshot {
                    score: state.players[0].score,
                    streak: state.players[0].streak,
                    frozen: state.players[0].frozen,
                },
                PlayerSnapshot {
                    score: state.players[1].score,
                    streak: state.players[1].streak,
                    frozen: state.players[1].frozen,
                },
            ],
            question: state.current_question.as_ref().map(QuestionSnapshot::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MatchPlan, MatchRules};

    #[test]
    fn test_empty_request_uses_defaults() {
        let request: StartMatchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.difficulty, Difficulty::Easy);
        assert!(!request.tournament);
        assert_eq!(request.opponent, None);
        assert_eq!(request.seed, None);
    }

    #[test]
    fn test_full_request_parses() {
        let json = r#"{
            "difficulty": "medium",
            "tournament": true,
            "opponent": "hard",
            "seed": 99
        }"#;
        let request: StartMatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.difficulty, Difficulty::Medium);
        assert!(request.tournament);
        assert_eq!(request.opponent, Some(Difficulty::Hard));
        assert_eq!(request.seed, Some(99));
    }

    #[test]
    fn test_player_number_bounds() {
        assert_eq!(player_from_number(1).unwrap(), Player::P1);
        assert_eq!(player_from_number(2).unwrap(), Player::P2);
        assert!(matches!(player_from_number(0), Err(GameError::InvalidRequest(_))));
        assert!(matches!(player_from_number(3), Err(GameError::InvalidRequest(_))));
    }

    #[test]
    fn test_snapshot_reflects_engine_state() {
        let engine = MatchEngine::new(MatchPlan {
            tournament: true,
            seed: 7,
            rules: MatchRules::default(),
            ..MatchPlan::default()
        });
        let snapshot = MatchSnapshot::from_engine(&engine);

        assert_eq!(snapshot.rope_position, 50);
        assert_eq!(snapshot.current_player, 1);
        assert_eq!(snapshot.time_left, 5);
        assert_eq!(snapshot.winner, None);
        assert!(snapshot.tournament);
        assert_eq!(snapshot.questions_left, 20);
        assert_eq!(snapshot.seed, 7);
        let question = snapshot.question.expect("fresh match has a question");
        assert_eq!(question.options.len(), 4);
        assert!(question.options.contains(&question.answer));
    }

    #[test]
    fn test_snapshot_serializes_without_question_after_the_end() {
        let rules = MatchRules { rope_start: 5, ..MatchRules::default() };
        let mut engine = MatchEngine::new(MatchPlan { rules, seed: 8, ..MatchPlan::default() });
        let answer = engine.state().current_question.as_ref().unwrap().answer;
        engine.submit_answer(answer);

        let snapshot = MatchSnapshot::from_engine(&engine);
        assert!(snapshot.game_over);
        assert_eq!(snapshot.winner, Some(1));

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("\"question\""));
        assert!(json.contains("\"winner\":1"));
    }
}
