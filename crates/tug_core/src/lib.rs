//! # tug_core - Deterministic Math Tug-of-War Match Engine
//!
//! Two players take turns answering arithmetic questions under a
//! five-second clock. Answers drag a shared rope between 0 and 100, and
//! reaching either end wins the match. This library is the complete game
//! core: question generation, the match state machine with streak and
//! freeze mechanics, the virtual-clock timer, a scripted opponent, and
//! key-value persistence for coins, skins and match history.
//!
//! ## Features
//! - 100% deterministic matches (same seed = same questions, same opponent)
//! - Virtual clock: the host replays elapsed time, no threads or timers inside
//! - JSON API for easy integration with UI shells

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod questions;
pub mod save;
pub mod state;

// Re-export main API surface
pub use api::{GameSession, MatchSnapshot, SelectSkinRequest, StartMatchRequest};
pub use error::{GameError, Result};

// Re-export engine types
pub use engine::{GameEvent, GameEventType, MatchEngine, MatchPlan, MatchRules, MatchState};

// Re-export domain models
pub use models::{find_skin, Difficulty, Player, Question, Skin, DEFAULT_SKIN_ID, SKINS};

// Re-export question generation
pub use questions::QuestionGenerator;

// Re-export save system
pub use save::{FileStore, KvStore, MatchMode, MatchRecord, MemoryStore, SaveError};

// Re-export profile state
pub use state::{PlayerStats, Profile, SelectedSkins};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SAVE_SCHEMA_VERSION: u8 = 1;
