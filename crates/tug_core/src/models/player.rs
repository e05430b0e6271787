use serde::{Deserialize, Serialize};

/// One of the two rope sides.
///
/// Player 1 pulls the rope toward 0, player 2 toward 100. In matches
/// against the computer, player 2 is the scripted opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    #[default]
    P1,
    P2,
}

impl Player {
    /// The other side of the rope.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Slot index into per-player arrays (P1 = 0, P2 = 1).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    /// Display number (P1 = 1, P2 = 2), used by records and snapshots.
    #[inline]
    pub const fn number(self) -> u8 {
        match self {
            Player::P1 => 1,
            Player::P2 => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_involutive() {
        assert_eq!(Player::P1.other(), Player::P2);
        assert_eq!(Player::P2.other(), Player::P1);
        assert_eq!(Player::P1.other().other(), Player::P1);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Player::P1).unwrap(), "\"p1\"");
        assert_eq!(serde_json::to_string(&Player::P2).unwrap(), "\"p2\"");
    }
}
