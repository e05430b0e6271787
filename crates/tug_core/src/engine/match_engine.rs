//! Match engine: single authority over one match.
//!
//! The engine owns the state, the RNG, the question generator, the task
//! queue and the event buffer. The host drives it with exactly three
//! calls: `submit_answer` for the human trigger, `advance` to replay
//! elapsed wall time, and `drain_events` to collect notifications. One
//! engine instance per match; a new match means a new engine.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::engine::config::MatchRules;
use crate::engine::events::GameEvent;
use crate::engine::opponent::ScriptedOpponent;
use crate::engine::scheduler::{TaskKind, TaskQueue};
use crate::engine::state::MatchState;
use crate::models::{Difficulty, Player};
use crate::questions::QuestionGenerator;

const MS_PER_SECOND: u64 = 1000;

/// Everything needed to start a match.
#[derive(Debug, Clone, Default)]
pub struct MatchPlan {
    /// Question tier for non-tournament play.
    pub difficulty: Difficulty,
    /// Tournament mode: fixed question count, hard questions, coins banked
    /// per correct answer.
    pub tournament: bool,
    /// `Some` seats a scripted opponent on player 2's side.
    pub opponent: Option<Difficulty>,
    /// Seed for every random decision in the match.
    pub seed: u64,
    /// Session-scope token stamped onto scheduled work; a session bumps it
    /// per match so leftovers from an earlier match can never fire.
    pub generation: u64,
    pub rules: MatchRules,
}

pub struct MatchEngine {
    rng: ChaCha8Rng,
    /// Seed the RNG was built from, echoed in snapshots for replays.
    original_seed: u64,
    rules: MatchRules,
    generation: u64,
    state: MatchState,
    generator: QuestionGenerator,
    opponent: Option<ScriptedOpponent>,
    tasks: TaskQueue,
    events: Vec<GameEvent>,
    /// Virtual clock, milliseconds since match start. Stops at the instant
    /// the match ends.
    clock_ms: u64,
    /// Next whole-second boundary of the question clock.
    next_tick_ms: u64,
    /// Latch: the active question already had its forced timeout.
    timeout_fired: bool,
}

impl MatchEngine {
    pub fn new(plan: MatchPlan) -> Self {
        let original_seed = plan.seed;
        let rng = ChaCha8Rng::seed_from_u64(original_seed);
        let state = MatchState::new(plan.difficulty, plan.tournament, &plan.rules);

        let mut engine = Self {
            rng,
            original_seed,
            rules: plan.rules,
            generation: plan.generation,
            state,
            generator: QuestionGenerator::new(),
            opponent: plan.opponent.map(ScriptedOpponent::new),
            tasks: TaskQueue::new(),
            events: Vec::new(),
            clock_ms: 0,
            next_tick_ms: MS_PER_SECOND,
            timeout_fired: false,
        };

        log::info!(
            "match started: difficulty={}, tournament={}, opponent={:?}, seed={}",
            engine.state.difficulty,
            engine.state.tournament,
            plan.opponent,
            original_seed
        );
        engine.deal_question();
        engine
    }

    // ========================
    // Host-facing API
    // ========================

    /// External answer trigger for the current player.
    ///
    /// In opponent matches the scripted side funnels through the same
    /// resolution path, so the rules cannot tell the two apart.
    pub fn submit_answer(&mut self, value: i64) {
        self.resolve(Some(value));
    }

    /// Replay `delta_ms` of elapsed time.
    ///
    /// Due tasks and second boundaries fire at their exact virtual instants
    /// in chronological order, so a freeze lifting at 2.0s always lands
    /// before a timeout at 5.0s even inside a single large call. No-op once
    /// the match is over.
    pub fn advance(&mut self, delta_ms: u64) {
        if self.state.game_over {
            return;
        }
        let target = self.clock_ms + delta_ms;

        loop {
            if self.state.game_over {
                return;
            }
            let due_task = self.tasks.next_due().filter(|&due| due <= target);
            let due_tick = (self.next_tick_ms <= target).then_some(self.next_tick_ms);

            match (due_task, due_tick) {
                (None, None) => break,
                (Some(task_at), None) => {
                    self.clock_ms = task_at;
                    self.fire_due_task();
                }
                (None, Some(tick_at)) => {
                    self.clock_ms = tick_at;
                    self.timer_tick();
                }
                // Tasks fire before the clock tick at the same instant
                (Some(task_at), Some(tick_at)) => {
                    if task_at <= tick_at {
                        self.clock_ms = task_at;
                        self.fire_due_task();
                    } else {
                        self.clock_ms = tick_at;
                        self.timer_tick();
                    }
                }
            }
        }

        self.clock_ms = target;
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.original_seed
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn is_over(&self) -> bool {
        self.state.game_over
    }

    /// Opponent tier, if a scripted opponent is seated.
    pub fn opponent_difficulty(&self) -> Option<Difficulty> {
        self.opponent.map(|o| o.difficulty())
    }

    /// Final coin award; `None` while the match is still running.
    pub fn coin_award(&self) -> Option<u32> {
        self.state.game_over.then_some(self.state.coins_earned)
    }

    // ========================
    // Clock & scheduled work
    // ========================

    fn fire_due_task(&mut self) {
        let Some(task) = self.tasks.pop_due(self.clock_ms, self.generation) else {
            return;
        };
        match task.kind {
            TaskKind::Unfreeze { player } => self.apply_unfreeze(player),
            TaskKind::OpponentAnswer { question_id, value } => {
                let still_active = self
                    .state
                    .current_question
                    .as_ref()
                    .map(|q| q.id == question_id)
                    .unwrap_or(false);
                if still_active {
                    log::debug!("opponent answers {} at {} ms", value, self.clock_ms);
                    self.resolve(Some(value));
                }
            }
        }
    }

    fn apply_unfreeze(&mut self, player: Player) {
        self.state.slot_mut(player).frozen = false;
        log::debug!("{:?} unfrozen at {} ms", player, self.clock_ms);
        // An opponent that sat out its question start gets to move now
        if self.state.current_player == player {
            self.maybe_schedule_opponent();
        }
    }

    fn timer_tick(&mut self) {
        self.next_tick_ms += MS_PER_SECOND;
        if self.state.current_question.is_none() {
            return;
        }
        if self.state.time_left > 0 {
            self.state.time_left -= 1;
        }
        if self.state.time_left == 0 {
            if !self.timeout_fired {
                self.timeout_fired = true;
                log::debug!("question timed out at {} ms", self.clock_ms);
                self.resolve(None);
            }
        } else if self.state.time_left <= self.rules.low_time_threshold {
            self.events.push(GameEvent::low_time_warning(self.clock_ms, self.state.time_left));
        }
    }

    // ========================
    // Resolution
    // ========================

    /// The one entry point every submission funnels through.
    ///
    /// `None` is the no-answer sentinel used by the forced timeout; it can
    /// never equal a real answer.
    fn resolve(&mut self, submitted: Option<i64>) {
        if self.state.game_over {
            return;
        }
        let Some(answer) = self.state.current_question.as_ref().map(|q| q.answer) else {
            return;
        };
        let player = self.state.current_player;
        if self.state.slot(player).frozen {
            log::debug!("{:?} is frozen; submission ignored", player);
            return;
        }

        // Any resolution consumes the pending opponent answer
        self.tasks.cancel_opponent_answers();

        let correct = submitted == Some(answer);
        if correct {
            self.apply_correct(player);
        } else {
            self.apply_incorrect(player);
        }

        self.state.questions_answered += 1;
        if self.state.tournament {
            self.state.questions_left = self.state.questions_left.saturating_sub(1);
        }

        // Tournaments run their full count; casual play ends at the rope
        // boundary.
        let ended = if self.state.tournament {
            self.state.questions_left == 0
        } else {
            self.state.rope_position == 0 || self.state.rope_position >= 100
        };

        if ended {
            self.finish_match();
        } else {
            self.state.current_player = self.state.current_player.other();
            self.deal_question();
        }
    }

    fn apply_correct(&mut self, player: Player) {
        let slot = self.state.slot_mut(player);
        slot.score += 1;
        slot.streak += 1;
        slot.wrong_streak = 0;
        let streak = slot.streak;
        self.events.push(GameEvent::correct(self.clock_ms, player));

        if streak >= self.rules.streak_length {
            // Power move: snap beats the standard shift outright
            self.state.slot_mut(player).streak = 0;
            self.state.rope_position = match player {
                Player::P1 => self.rules.power_position_p1,
                Player::P2 => self.rules.power_position_p2,
            };
            self.events.push(GameEvent::streak_bonus(self.clock_ms, player));
            log::debug!("power move by {:?}", player);
        } else {
            self.shift_rope_toward(player, self.rules.correct_shift);
        }

        if self.state.tournament {
            self.state.coins_earned += self.rules.tournament_coins_per_correct;
        }
    }

    fn apply_incorrect(&mut self, player: Player) {
        let slot = self.state.slot_mut(player);
        slot.streak = 0;
        slot.wrong_streak += 1;
        let wrong_streak = slot.wrong_streak;
        self.events.push(GameEvent::incorrect(self.clock_ms, player));

        // A mistake hands ground to the other side
        self.shift_rope_toward(player.other(), self.rules.incorrect_shift);

        if wrong_streak >= self.rules.wrong_streak_length {
            let slot = self.state.slot_mut(player);
            slot.frozen = true;
            slot.wrong_streak = 0;
            self.events.push(GameEvent::frozen(self.clock_ms, player));
            self.tasks.schedule(
                self.clock_ms + self.rules.freeze_ms,
                self.generation,
                TaskKind::Unfreeze { player },
            );
            log::debug!("{:?} frozen for {} ms", player, self.rules.freeze_ms);
        }
    }

    fn shift_rope_toward(&mut self, player: Player, amount: u8) {
        let pos = self.state.rope_position as i16;
        let next = match player {
            Player::P1 => pos - amount as i16,
            Player::P2 => pos + amount as i16,
        };
        self.state.rope_position = next.clamp(0, 100) as u8;
    }

    fn finish_match(&mut self) {
        let winner = if self.state.tournament {
            // Winner by rope lean relative to the neutral start
            match self.state.rope_position.cmp(&self.rules.rope_start) {
                std::cmp::Ordering::Less => Some(Player::P1),
                std::cmp::Ordering::Greater => Some(Player::P2),
                std::cmp::Ordering::Equal => None,
            }
        } else if self.state.rope_position == 0 {
            Some(Player::P1)
        } else if self.state.rope_position >= 100 {
            Some(Player::P2)
        } else {
            // Boundary endings always name a winner; the draw stays
            // representable for the record format
            None
        };

        if !self.state.tournament {
            let winner_score = winner.map(|w| self.state.slot(w).score).unwrap_or(0);
            self.state.coins_earned =
                (winner_score * self.rules.win_coins_per_point).max(self.rules.base_win_coins);
        }

        self.state.game_over = true;
        self.state.winner = winner;
        self.state.current_question = None;
        self.tasks.clear();
        self.events.push(GameEvent::match_won(self.clock_ms, winner));
        log::info!(
            "match over: winner={:?}, rope={}, questions={}, coins={}",
            winner,
            self.state.rope_position,
            self.state.questions_answered,
            self.state.coins_earned
        );
    }

    // ========================
    // Question flow
    // ========================

    fn deal_question(&mut self) {
        let difficulty = self.state.question_difficulty();
        let question =
            self.generator.generate(difficulty, &self.state.used_question_ids, &mut self.rng);
        log::debug!("question {} for {:?}", question.id, self.state.current_player);

        self.state.used_question_ids.insert(question.id.clone());
        self.state.current_question = Some(question);
        self.state.time_left = self.rules.question_secs;
        self.next_tick_ms = self.clock_ms + MS_PER_SECOND;
        self.timeout_fired = false;

        self.tasks.cancel_opponent_answers();
        self.maybe_schedule_opponent();
    }

    /// Roll and queue the scripted opponent's answer, when it is the
    /// opponent's turn and it is able to act.
    fn maybe_schedule_opponent(&mut self) {
        if self.state.game_over || self.state.current_player != Player::P2 {
            return;
        }
        let Some(opponent) = self.opponent else {
            return;
        };
        if self.state.slot(Player::P2).frozen {
            return;
        }
        let Some(question) = self.state.current_question.as_ref() else {
            return;
        };

        let question_id = question.id.clone();
        let decision = opponent.decide(question, &mut self.rng);
        let due = self.clock_ms + decision.delay_ms;
        self.tasks.schedule(
            due,
            self.generation,
            TaskKind::OpponentAnswer { question_id, value: decision.value },
        );
        log::debug!("opponent move queued for {} ms", due);
    }
}
