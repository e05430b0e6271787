//! Match notifications for the presentation layer.
//!
//! Events accumulate inside the engine and are drained by the host each
//! frame; emission never blocks and nothing in the core depends on whether
//! anyone listens. Sound and animation cues key off exactly these moments.

use serde::{Deserialize, Serialize};

use crate::models::Player;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEvent {
    /// Engine clock at emission, milliseconds since match start.
    pub timestamp_ms: u64,
    #[serde(rename = "type")]
    pub event_type: GameEventType,
    /// Acting player. For `MatchWon` this is the winning player (`None` =
    /// draw); `None` for neutral events such as `LowTimeWarning`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    /// `LowTimeWarning` only: whole seconds remaining on the clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum GameEventType {
    /// Correct answer resolved
    Correct,
    /// Wrong answer (or timeout) resolved
    Incorrect,
    /// Player froze after a wrong-answer streak
    Frozen,
    /// Power move: rope snapped to the player's power position
    StreakBonus,
    /// Match ended
    MatchWon,
    /// Question clock is running low
    LowTimeWarning,
}

impl GameEvent {
    pub fn correct(timestamp_ms: u64, player: Player) -> Self {
        Self {
            timestamp_ms,
            event_type: GameEventType::Correct,
            player: Some(player),
            time_left: None,
        }
    }

    pub fn incorrect(timestamp_ms: u64, player: Player) -> Self {
        Self {
            timestamp_ms,
            event_type: GameEventType::Incorrect,
            player: Some(player),
            time_left: None,
        }
    }

    pub fn frozen(timestamp_ms: u64, player: Player) -> Self {
        Self {
            timestamp_ms,
            event_type: GameEventType::Frozen,
            player: Some(player),
            time_left: None,
        }
    }

    pub fn streak_bonus(timestamp_ms: u64, player: Player) -> Self {
        Self {
            timestamp_ms,
            event_type: GameEventType::StreakBonus,
            player: Some(player),
            time_left: None,
        }
    }

    /// `winner = None` records a draw.
    pub fn match_won(timestamp_ms: u64, winner: Option<Player>) -> Self {
        Self { timestamp_ms, event_type: GameEventType::MatchWon, player: winner, time_left: None }
    }

    pub fn low_time_warning(timestamp_ms: u64, time_left: u32) -> Self {
        Self {
            timestamp_ms,
            event_type: GameEventType::LowTimeWarning,
            player: None,
            time_left: Some(time_left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_event_type_serde_is_snake_case() {
        for event_type in GameEventType::iter() {
            let json = serde_json::to_string(&event_type).unwrap();
            assert!(
                json.chars().all(|c| c.is_ascii_lowercase() || c == '_' || c == '"'),
                "unexpected casing: {}",
                json
            );
            let back: GameEventType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, event_type);
        }
    }

    #[test]
    fn test_match_won_draw_omits_player() {
        let event = GameEvent::match_won(1000, None);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"match_won\""));
        assert!(!json.contains("\"player\""));

        let event = GameEvent::match_won(1000, Some(Player::P2));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"p2\""));
    }

    #[test]
    fn test_low_time_warning_carries_seconds() {
        let event = GameEvent::low_time_warning(3000, 2);
        assert_eq!(event.time_left, Some(2));
        assert_eq!(event.player, None);
    }
}
