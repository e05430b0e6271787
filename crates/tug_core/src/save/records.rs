use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Difficulty;

/// How a match was set up, for the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum MatchMode {
    /// Two humans at one device.
    Pvp,
    /// Human versus the scripted opponent.
    Ai,
    Tournament,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Pvp => "pvp",
            MatchMode::Ai => "ai",
            MatchMode::Tournament => "tournament",
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One finished match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub mode: MatchMode,
    pub difficulty: Difficulty,
    /// Opponent tier, present only for [`MatchMode::Ai`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_difficulty: Option<Difficulty>,
    /// Player number 1 or 2; `None` records a draw.
    #[serde(default)]
    pub winner: Option<u8>,
    pub player1_score: u32,
    pub player2_score: u32,
    pub coins_earned: u32,
    pub total_questions: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn sample_record() -> MatchRecord {
        MatchRecord {
            id: "7c9e6679-7425-40de-944b-e07fc1f90ae7".to_string(),
            date: "2024-05-01T12:30:00Z".parse().unwrap(),
            mode: MatchMode::Ai,
            difficulty: Difficulty::Medium,
            opponent_difficulty: Some(Difficulty::Hard),
            winner: Some(1),
            player1_score: 7,
            player2_score: 4,
            coins_earned: 14,
            total_questions: 11,
        }
    }

    #[test]
    fn test_mode_names_are_snake_case() {
        for mode in MatchMode::iter() {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn test_record_roundtrip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: MatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_draw_and_pvp_fields_are_optional() {
        let record = MatchRecord {
            mode: MatchMode::Pvp,
            opponent_difficulty: None,
            winner: None,
            ..sample_record()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("opponent_difficulty"));

        let back: MatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.winner, None);
        assert_eq!(back.opponent_difficulty, None);
    }

    #[test]
    fn test_missing_winner_defaults_to_draw() {
        let json = r#"{
            "id": "x",
            "date": "2024-05-01T12:30:00Z",
            "mode": "tournament",
            "difficulty": "hard",
            "player1_score": 9,
            "player2_score": 9,
            "coins_earned": 90,
            "total_questions": 20
        }"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.winner, None);
        assert_eq!(record.mode, MatchMode::Tournament);
    }
}
