use serde::{Deserialize, Serialize};
use std::fmt;

/// Question difficulty tier.
///
/// Also doubles as the scripted opponent's skill tier (accuracy and
/// response-delay tables are keyed by it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single arithmetic question as shown to the players.
///
/// `options` always holds exactly four distinct non-negative values in
/// randomized order, exactly one of which equals `answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Dedup key: `"{difficulty}_{text}"`, or a synthetic `"q_{n}_{ts}"`
    /// id once the tier's space is exhausted for the match.
    pub id: String,
    /// Display expression, e.g. `"7 × 8"` or `"9²"`.
    pub text: String,
    pub answer: i64,
    pub options: Vec<i64>,
    pub difficulty: Difficulty,
}

impl Question {
    /// Whether a submitted value answers this question correctly.
    #[inline]
    pub fn is_correct(&self, value: i64) -> bool {
        value == self.answer
    }
}
