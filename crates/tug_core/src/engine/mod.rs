pub mod config;
pub mod events;
pub mod match_engine;
pub mod opponent;
pub mod scheduler;
pub mod state;

pub use config::MatchRules;
pub use events::{GameEvent, GameEventType};
pub use match_engine::{MatchEngine, MatchPlan};
pub use opponent::{OpponentDecision, ScriptedOpponent};
pub use scheduler::{ScheduledTask, TaskKind, TaskQueue};
pub use state::{MatchState, PlayerSlot};
