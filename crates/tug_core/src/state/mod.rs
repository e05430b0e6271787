//! Player profile: coin balance, skin shop and match history.
//!
//! The profile is plain in-memory data loaded from a key-value store with
//! per-key fallbacks, so one corrupt record never takes the rest down.
//! Mutations are pure; callers persist the touched keys afterwards.

use serde::{Deserialize, Serialize};

use crate::models::{find_skin, Player, DEFAULT_SKIN_ID};
use crate::save::{KvStore, MatchMode, MatchRecord, SaveError};

pub const COINS_KEY: &str = "tug_war_coins";
pub const SKINS_KEY: &str = "tug_war_skins";
pub const SELECTED_SKINS_KEY: &str = "tug_war_selected_skins";
pub const LEADERBOARD_KEY: &str = "tug_war_leaderboard";

/// How many matches the stats report keeps, newest first.
const RECENT_MATCH_LIMIT: usize = 20;

/// Skin chosen for each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSkins {
    pub p1: String,
    pub p2: String,
}

impl Default for SelectedSkins {
    fn default() -> Self {
        Self { p1: DEFAULT_SKIN_ID.to_string(), p2: DEFAULT_SKIN_ID.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub coins: u32,
    pub unlocked_skins: Vec<String>,
    pub selected_skins: SelectedSkins,
    pub history: Vec<MatchRecord>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl Profile {
    pub fn new() -> Self {
        Self {
            coins: 0,
            unlocked_skins: vec![DEFAULT_SKIN_ID.to_string()],
            selected_skins: SelectedSkins::default(),
            history: Vec::new(),
        }
    }

    /// Load a profile; every key falls back independently.
    pub fn load(store: &impl KvStore) -> Self {
        let coins = load_coins(store);
        let unlocked_skins = load_unlocked_skins(store);
        let selected_skins = load_selected_skins(store, &unlocked_skins);
        let history = load_history(store);
        Self { coins, unlocked_skins, selected_skins, history }
    }

    // ========================
    // Coins & Shop
    // ========================

    pub fn award_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
        log::debug!("awarded {} coins, balance {}", amount, self.coins);
    }

    pub fn is_unlocked(&self, skin_id: &str) -> bool {
        self.unlocked_skins.iter().any(|s| s == skin_id)
    }

    /// Buy a skin. Nothing changes unless the purchase goes through.
    pub fn buy_skin(&mut self, skin_id: &str) -> bool {
        let Some(skin) = find_skin(skin_id) else {
            return false;
        };
        if self.is_unlocked(skin_id) || self.coins < skin.cost {
            return false;
        }
        self.coins -= skin.cost;
        self.unlocked_skins.push(skin_id.to_string());
        log::info!("unlocked skin {} for {} coins", skin_id, skin.cost);
        true
    }

    /// Pick a skin for one side; locked skins are refused.
    pub fn select_skin(&mut self, player: Player, skin_id: &str) -> bool {
        if !self.is_unlocked(skin_id) {
            return false;
        }
        match player {
            Player::P1 => self.selected_skins.p1 = skin_id.to_string(),
            Player::P2 => self.selected_skins.p2 = skin_id.to_string(),
        }
        true
    }

    // ========================
    // Match History
    // ========================

    pub fn record_match(&mut self, record: MatchRecord) {
        self.history.push(record);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Derived statistics over the whole history.
    pub fn stats(&self) -> PlayerStats {
        let total_games = self.history.len() as u32;
        let wins = self.history.iter().filter(|m| m.winner == Some(1)).count() as u32;
        let losses = self.history.iter().filter(|m| m.winner == Some(2)).count() as u32;
        let draws = self.history.iter().filter(|m| m.winner.is_none()).count() as u32;
        let win_rate = if total_games > 0 {
            (f64::from(wins) / f64::from(total_games) * 100.0).round() as u32
        } else {
            0
        };

        let tournament: Vec<_> =
            self.history.iter().filter(|m| m.mode == MatchMode::Tournament).collect();
        let vs_ai: Vec<_> = self.history.iter().filter(|m| m.mode == MatchMode::Ai).collect();

        PlayerStats {
            total_games,
            wins,
            losses,
            draws,
            win_rate,
            total_coins_earned: self.history.iter().map(|m| m.coins_earned).sum(),
            total_correct_answers: self.history.iter().map(|m| m.player1_score).sum(),
            tournament_games: tournament.len() as u32,
            tournament_wins: tournament.iter().filter(|m| m.winner == Some(1)).count() as u32,
            tournament_best_score: tournament.iter().map(|m| m.player1_score).max().unwrap_or(0),
            ai_games: vs_ai.len() as u32,
            ai_wins: vs_ai.iter().filter(|m| m.winner == Some(1)).count() as u32,
            recent_matches: self.history.iter().rev().take(RECENT_MATCH_LIMIT).cloned().collect(),
        }
    }

    // ========================
    // Persistence
    // ========================

    pub fn persist_coins(&self, store: &mut impl KvStore) -> Result<(), SaveError> {
        store.set(COINS_KEY, &self.coins.to_string())
    }

    pub fn persist_skins(&self, store: &mut impl KvStore) -> Result<(), SaveError> {
        let json = serde_json::to_string(&self.unlocked_skins)
            .map_err(|e| SaveError::Serialization(e.to_string()))?;
        store.set(SKINS_KEY, &json)
    }

    pub fn persist_selected_skins(&self, store: &mut impl KvStore) -> Result<(), SaveError> {
        let json = serde_json::to_string(&self.selected_skins)
            .map_err(|e| SaveError::Serialization(e.to_string()))?;
        store.set(SELECTED_SKINS_KEY, &json)
    }

    pub fn persist_history(&self, store: &mut impl KvStore) -> Result<(), SaveError> {
        let json = serde_json::to_string(&self.history)
            .map_err(|e| SaveError::Serialization(e.to_string()))?;
        store.set(LEADERBOARD_KEY, &json)
    }

    pub fn persist_all(&self, store: &mut impl KvStore) -> Result<(), SaveError> {
        self.persist_coins(store)?;
        self.persist_skins(store)?;
        self.persist_selected_skins(store)?;
        self.persist_history(store)?;
        Ok(())
    }
}

/// Derived statistics for the leaderboard page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Whole-percent win rate; 0 with no games on record.
    pub win_rate: u32,
    pub total_coins_earned: u32,
    /// Correct answers by player 1 across all matches.
    pub total_correct_answers: u32,
    pub tournament_games: u32,
    pub tournament_wins: u32,
    pub tournament_best_score: u32,
    pub ai_games: u32,
    pub ai_wins: u32,
    /// Most recent matches, newest first.
    pub recent_matches: Vec<MatchRecord>,
}

// ========================
// Per-key loaders
// ========================

fn load_coins(store: &impl KvStore) -> u32 {
    let Some(raw) = store.get(COINS_KEY) else {
        return 0;
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 0 => value.min(i64::from(u32::MAX)) as u32,
        _ => {
            log::warn!("discarding corrupt coin balance: {:?}", raw);
            0
        }
    }
}

fn load_unlocked_skins(store: &impl KvStore) -> Vec<String> {
    let fallback = || vec![DEFAULT_SKIN_ID.to_string()];
    let Some(raw) = store.get(SKINS_KEY) else {
        return fallback();
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(mut skins) => {
            // The base skin can never be lost
            if !skins.iter().any(|s| s == DEFAULT_SKIN_ID) {
                skins.insert(0, DEFAULT_SKIN_ID.to_string());
            }
            skins
        }
        Err(err) => {
            log::warn!("discarding corrupt skin list: {}", err);
            fallback()
        }
    }
}

fn load_selected_skins(store: &impl KvStore, unlocked: &[String]) -> SelectedSkins {
    let Some(raw) = store.get(SELECTED_SKINS_KEY) else {
        return SelectedSkins::default();
    };
    let mut selected = match serde_json::from_str::<SelectedSkins>(&raw) {
        Ok(selected) => selected,
        Err(err) => {
            log::warn!("discarding corrupt skin selection: {}", err);
            return SelectedSkins::default();
        }
    };
    // A selection pointing at a locked skin falls back to the base skin
    if !unlocked.iter().any(|s| *s == selected.p1) {
        selected.p1 = DEFAULT_SKIN_ID.to_string();
    }
    if !unlocked.iter().any(|s| *s == selected.p2) {
        selected.p2 = DEFAULT_SKIN_ID.to_string();
    }
    selected
}

fn load_history(store: &impl KvStore) -> Vec<MatchRecord> {
    let Some(raw) = store.get(LEADERBOARD_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(entries) => {
            let total = entries.len();
            let records: Vec<MatchRecord> =
                entries.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect();
            if records.len() < total {
                log::warn!("dropped {} malformed history entries", total - records.len());
            }
            records
        }
        Err(err) => {
            log::warn!("discarding corrupt match history: {}", err);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemoryStore;

    fn record(mode: MatchMode, winner: Option<u8>, p1_score: u32, coins: u32) -> MatchRecord {
        MatchRecord {
            id: format!("id-{}-{:?}", p1_score, winner),
            date: "2024-06-01T10:00:00Z".parse().unwrap(),
            mode,
            difficulty: crate::models::Difficulty::Easy,
            opponent_difficulty: None,
            winner,
            player1_score: p1_score,
            player2_score: 3,
            coins_earned: coins,
            total_questions: 10,
        }
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemoryStore::new();
        let profile = Profile::load(&store);
        assert_eq!(profile.coins, 0);
        assert_eq!(profile.unlocked_skins, vec![DEFAULT_SKIN_ID.to_string()]);
        assert_eq!(profile.selected_skins, SelectedSkins::default());
        assert!(profile.history.is_empty());
    }

    #[test]
    fn test_corrupt_coins_reset_to_zero() {
        let mut store = MemoryStore::new();
        store.set(COINS_KEY, "not a number").unwrap();
        assert_eq!(Profile::load(&store).coins, 0);

        store.set(COINS_KEY, "-50").unwrap();
        assert_eq!(Profile::load(&store).coins, 0);

        store.set(COINS_KEY, "120").unwrap();
        assert_eq!(Profile::load(&store).coins, 120);
    }

    #[test]
    fn test_skin_list_always_contains_default() {
        let mut store = MemoryStore::new();
        store.set(SKINS_KEY, r#"["ninja","robot"]"#).unwrap();
        let profile = Profile::load(&store);
        assert_eq!(profile.unlocked_skins, vec!["default", "ninja", "robot"]);

        store.set(SKINS_KEY, "{broken").unwrap();
        let profile = Profile::load(&store);
        assert_eq!(profile.unlocked_skins, vec![DEFAULT_SKIN_ID.to_string()]);
    }

    #[test]
    fn test_locked_selection_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set(SKINS_KEY, r#"["default","ninja"]"#).unwrap();
        store.set(SELECTED_SKINS_KEY, r#"{"p1":"ninja","p2":"wizard"}"#).unwrap();

        let profile = Profile::load(&store);
        assert_eq!(profile.selected_skins.p1, "ninja");
        assert_eq!(profile.selected_skins.p2, DEFAULT_SKIN_ID);
    }

    #[test]
    fn test_malformed_history_entries_are_filtered() {
        let mut store = MemoryStore::new();
        let good = record(MatchMode::Pvp, Some(1), 5, 10);
        let json = format!(
            "[{}, {{\"garbage\": true}}, 42]",
            serde_json::to_string(&good).unwrap()
        );
        store.set(LEADERBOARD_KEY, &json).unwrap();

        let profile = Profile::load(&store);
        assert_eq!(profile.history.len(), 1);
        assert_eq!(profile.history[0].id, good.id);

        store.set(LEADERBOARD_KEY, "not json at all").unwrap();
        assert!(Profile::load(&store).history.is_empty());
    }

    #[test]
    fn test_award_coins_saturates() {
        let mut profile = Profile::new();
        profile.award_coins(10);
        assert_eq!(profile.coins, 10);
        profile.coins = u32::MAX - 1;
        profile.award_coins(100);
        assert_eq!(profile.coins, u32::MAX);
    }

    #[test]
    fn test_buy_skin_rules() {
        let mut profile = Profile::new();
        profile.coins = 60;

        assert!(!profile.buy_skin("no_such_skin"), "unknown skins are refused");
        assert!(!profile.buy_skin("robot"), "robot costs 100, balance is 60");
        assert!(profile.buy_skin("ninja"));
        assert_eq!(profile.coins, 10);
        assert!(profile.is_unlocked("ninja"));
        assert!(!profile.buy_skin("ninja"), "owned skins cannot be bought twice");
        assert_eq!(profile.coins, 10);
    }

    #[test]
    fn test_select_skin_requires_unlock() {
        let mut profile = Profile::new();
        profile.coins = 50;
        assert!(profile.buy_skin("ninja"));

        assert!(profile.select_skin(Player::P1, "ninja"));
        assert_eq!(profile.selected_skins.p1, "ninja");

        assert!(!profile.select_skin(Player::P2, "wizard"));
        assert_eq!(profile.selected_skins.p2, DEFAULT_SKIN_ID);
    }

    #[test]
    fn test_stats_derivation() {
        let mut profile = Profile::new();
        profile.record_match(record(MatchMode::Pvp, Some(1), 5, 10));
        profile.record_match(record(MatchMode::Ai, Some(2), 3, 5));
        profile.record_match(record(MatchMode::Tournament, None, 12, 60));
        profile.record_match(record(MatchMode::Tournament, Some(1), 15, 75));

        let stats = profile.stats();
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.win_rate, 50);
        assert_eq!(stats.total_coins_earned, 150);
        assert_eq!(stats.total_correct_answers, 35);
        assert_eq!(stats.tournament_games, 2);
        assert_eq!(stats.tournament_wins, 1);
        assert_eq!(stats.tournament_best_score, 15);
        assert_eq!(stats.ai_games, 1);
        assert_eq!(stats.ai_wins, 0);
        // Newest first
        assert_eq!(stats.recent_matches[0].player1_score, 15);
    }

    #[test]
    fn test_win_rate_rounds_to_whole_percent() {
        let mut profile = Profile::new();
        profile.record_match(record(MatchMode::Pvp, Some(1), 1, 5));
        profile.record_match(record(MatchMode::Pvp, Some(2), 1, 5));
        profile.record_match(record(MatchMode::Pvp, Some(2), 1, 5));
        assert_eq!(profile.stats().win_rate, 33);
    }

    #[test]
    fn test_recent_matches_cap_at_twenty() {
        let mut profile = Profile::new();
        for i in 0..25 {
            profile.record_match(record(MatchMode::Pvp, Some(1), i, 5));
        }
        let stats = profile.stats();
        assert_eq!(stats.recent_matches.len(), 20);
        assert_eq!(stats.recent_matches[0].player1_score, 24);
        assert_eq!(stats.recent_matches[19].player1_score, 5);
    }

    #[test]
    fn test_persist_and_reload_roundtrip() {
        let mut store = MemoryStore::new();
        let mut profile = Profile::new();
        profile.award_coins(300);
        assert!(profile.buy_skin("robot"));
        assert!(profile.select_skin(Player::P2, "robot"));
        profile.record_match(record(MatchMode::Ai, Some(1), 8, 16));
        profile.persist_all(&mut store).unwrap();

        let reloaded = Profile::load(&store);
        assert_eq!(reloaded, profile);

        // Coins are stored as a plain integer string
        assert_eq!(store.get(COINS_KEY), Some("200".to_string()));
    }

    #[test]
    fn test_clear_history_persists_empty_list() {
        let mut store = MemoryStore::new();
        let mut profile = Profile::new();
        profile.record_match(record(MatchMode::Pvp, Some(1), 5, 10));
        profile.persist_history(&mut store).unwrap();

        profile.clear_history();
        profile.persist_history(&mut store).unwrap();
        assert_eq!(store.get(LEADERBOARD_KEY), Some("[]".to_string()));
        assert!(Profile::load(&store).history.is_empty());
    }
}
