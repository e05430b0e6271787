//! Game session: one player profile plus at most one live match.
//!
//! The session wires the pure pieces together. It owns the store and the
//! profile, replaces the engine on every new match, and books the coins
//! and the history record exactly once when a match completes. Storage
//! failures are logged and swallowed; play continues without persistence.

use chrono::Utc;
use uuid::Uuid;

use crate::engine::{GameEvent, MatchEngine, MatchPlan, MatchRules, MatchState};
use crate::error::{GameError, Result};
use crate::models::{Player, Skin, SKINS};
use crate::save::{KvStore, MatchMode, MatchRecord};
use crate::state::{PlayerStats, Profile};

use super::json_api::{player_from_number, MatchSnapshot, SelectSkinRequest, StartMatchRequest};

pub struct GameSession<S: KvStore> {
    store: S,
    profile: Profile,
    engine: Option<MatchEngine>,
    rules: MatchRules,
    /// Bumped per match; scheduled work stamped with an older value is dead.
    generation: u64,
    /// The current match already had its coins and record booked.
    match_recorded: bool,
}

impl<S: KvStore> GameSession<S> {
    /// Open a session with default rules, loading the profile from the store.
    pub fn new(store: S) -> Self {
        Self::with_rules(store, MatchRules::default())
    }

    pub fn with_rules(store: S, rules: MatchRules) -> Self {
        let profile = Profile::load(&store);
        log::info!(
            "session opened: {} coins, {} skins, {} matches on record",
            profile.coins,
            profile.unlocked_skins.len(),
            profile.history.len()
        );
        Self { store, profile, engine: None, rules, generation: 0, match_recorded: false }
    }

    // ========================
    // Match Lifecycle
    // ========================

    /// Start a new match, dropping any previous one on the spot.
    pub fn start_match(&mut self, request: StartMatchRequest) {
        let seed = request.seed.unwrap_or_else(rand::random);
        self.generation += 1;
        self.match_recorded = false;
        self.engine = Some(MatchEngine::new(MatchPlan {
            difficulty: request.difficulty,
            tournament: request.tournament,
            opponent: request.opponent,
            seed,
            generation: self.generation,
            rules: self.rules.clone(),
        }));
    }

    /// JSON wrapper: parses the request, starts the match, returns the
    /// opening snapshot.
    pub fn start_match_json(&mut self, request_json: &str) -> Result<String> {
        let request: StartMatchRequest = serde_json::from_str(request_json)?;
        self.start_match(request);
        self.snapshot_json()
    }

    pub fn submit_answer(&mut self, value: i64) {
        if let Some(engine) = self.engine.as_mut() {
            engine.submit_answer(value);
        }
        self.settle_if_over();
    }

    pub fn advance(&mut self, delta_ms: u64) {
        if let Some(engine) = self.engine.as_mut() {
            engine.advance(delta_ms);
        }
        self.settle_if_over();
    }

    /// Book the finished match into the profile, exactly once.
    fn settle_if_over(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        if !engine.is_over() || self.match_recorded {
            return;
        }
        self.match_recorded = true;

        let state = engine.state();
        let coins = engine.coin_award().unwrap_or(0);
        let mode = if state.tournament {
            MatchMode::Tournament
        } else if engine.opponent_difficulty().is_some() {
            MatchMode::Ai
        } else {
            MatchMode::Pvp
        };

        self.profile.award_coins(coins);
        self.profile.record_match(MatchRecord {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            mode,
            difficulty: state.difficulty,
            opponent_difficulty: engine.opponent_difficulty(),
            winner: state.winner.map(|w| w.number()),
            player1_score: state.players[0].score,
            player2_score: state.players[1].score,
            coins_earned: coins,
            total_questions: state.questions_answered,
        });

        if let Err(err) = self.profile.persist_coins(&mut self.store) {
            log::warn!("failed to persist coins: {}", err);
        }
        if let Err(err) = self.profile.persist_history(&mut self.store) {
            log::warn!("failed to persist history: {}", err);
        }
    }

    // ========================
    // Read Access
    // ========================

    pub fn match_state(&self) -> Option<&MatchState> {
        self.engine.as_ref().map(|e| e.state())
    }

    pub fn snapshot(&self) -> Result<MatchSnapshot> {
        let engine = self.engine.as_ref().ok_or(GameError::NoActiveMatch)?;
        Ok(MatchSnapshot::from_engine(engine))
    }

    pub fn snapshot_json(&self) -> Result<String> {
        let snapshot = self.snapshot()?;
        Ok(serde_json::to_string(&snapshot)?)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.engine.as_mut().map(|e| e.drain_events()).unwrap_or_default()
    }

    // ========================
    // Profile Pass-through
    // ========================

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn coins(&self) -> u32 {
        self.profile.coins
    }

    pub fn stats(&self) -> PlayerStats {
        self.profile.stats()
    }

    pub fn skin_catalog(&self) -> &'static [Skin] {
        &SKINS
    }

    pub fn buy_skin(&mut self, skin_id: &str) -> bool {
        let bought = self.profile.buy_skin(skin_id);
        if bought {
            if let Err(err) = self.profile.persist_coins(&mut self.store) {
                log::warn!("failed to persist coins: {}", err);
            }
            if let Err(err) = self.profile.persist_skins(&mut self.store) {
                log::warn!("failed to persist skins: {}", err);
            }
        }
        bought
    }

    pub fn select_skin(&mut self, player: Player, skin_id: &str) -> bool {
        let selected = self.profile.select_skin(player, skin_id);
        if selected {
            if let Err(err) = self.profile.persist_selected_skins(&mut self.store) {
                log::warn!("failed to persist skin selection: {}", err);
            }
        }
        selected
    }

    /// JSON wrapper for the shop screen; `Ok(false)` means the pick was
    /// refused because the skin is locked.
    pub fn select_skin_json(&mut self, request_json: &str) -> Result<bool> {
        let request: SelectSkinRequest = serde_json::from_str(request_json)?;
        let player = player_from_number(request.player)?;
        Ok(self.select_skin(player, &request.skin_id))
    }

    pub fn clear_history(&mut self) {
        self.profile.clear_history();
        if let Err(err) = self.profile.persist_history(&mut self.store) {
            log::warn!("failed to persist history: {}", err);
        }
    }

    /// Write the whole profile out; the explicit save button.
    pub fn save(&mut self) -> Result<()> {
        self.profile.persist_all(&mut self.store)?;
        Ok(())
    }
}
