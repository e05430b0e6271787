//! Arithmetic question generation.
//!
//! Each tier has a fixed set of expression recipes. Distractors are offsets
//! of the correct answer, so wrong options stay plausible at every tier.
//! All randomness flows through the caller's seeded RNG; the generator holds
//! only the counter for synthetic fallback ids.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::models::{Difficulty, Question};

/// Attempts to roll an unused expression before giving up on dedup.
const MAX_DEDUP_ATTEMPTS: u32 = 100;

/// Distractors are `answer ± offset` with offset in `1..=MAX_DISTRACTOR_OFFSET`.
const MAX_DISTRACTOR_OFFSET: i64 = 10;

const OPTION_COUNT: usize = 4;

/// Stateful question factory.
///
/// One generator per match; `fallback_counter` keeps synthetic ids unique
/// within the match (the timestamp suffix keeps them unique across matches).
#[derive(Debug, Default)]
pub struct QuestionGenerator {
    fallback_counter: u64,
}

impl QuestionGenerator {
    pub fn new() -> Self {
        Self { fallback_counter: 0 }
    }

    /// Generate a question whose id is not in `used`.
    ///
    /// After [`MAX_DEDUP_ATTEMPTS`] collisions the tier's expression space is
    /// considered exhausted for this match: one more expression is rolled and
    /// returned under a synthetic unique id, repeat text and all. Generation
    /// therefore never fails and never blocks.
    pub fn generate(
        &mut self,
        difficulty: Difficulty,
        used: &BTreeSet<String>,
        rng: &mut ChaCha8Rng,
    ) -> Question {
        for _ in 0..MAX_DEDUP_ATTEMPTS {
            let (text, answer) = roll_expression(difficulty, rng);
            let id = format!("{}_{}", difficulty.as_str(), text);
            if !used.contains(&id) {
                return build_question(id, text, answer, difficulty, rng);
            }
        }

        let (text, answer) = roll_expression(difficulty, rng);
        self.fallback_counter += 1;
        let id = format!(
            "q_{}_{}",
            self.fallback_counter,
            chrono::Utc::now().timestamp_millis()
        );
        build_question(id, text, answer, difficulty, rng)
    }
}

fn build_question(
    id: String,
    text: String,
    answer: i64,
    difficulty: Difficulty,
    rng: &mut ChaCha8Rng,
) -> Question {
    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(answer);
    options.extend(roll_distractors(answer, rng));
    options.shuffle(rng);
    Question { id, text, answer, options, difficulty }
}

/// Three distinct wrong options near the correct answer.
///
/// Candidates below zero are redrawn, so questions with small answers only
/// get distractors on the high side.
fn roll_distractors(answer: i64, rng: &mut ChaCha8Rng) -> Vec<i64> {
    let mut wrongs: Vec<i64> = Vec::with_capacity(OPTION_COUNT - 1);
    while wrongs.len() < OPTION_COUNT - 1 {
        let offset = rng.gen_range(1..=MAX_DISTRACTOR_OFFSET);
        let signed = if rng.gen_bool(0.5) { offset } else { -offset };
        let wrong = answer + signed;
        if wrong >= 0 && !wrongs.contains(&wrong) {
            wrongs.push(wrong);
        }
    }
    wrongs
}

fn roll_expression(difficulty: Difficulty, rng: &mut ChaCha8Rng) -> (String, i64) {
    match difficulty {
        Difficulty::Easy => roll_easy(rng),
        Difficulty::Medium => roll_medium(rng),
        Difficulty::Hard => roll_hard(rng),
    }
}

/// Easy: single-digit-friendly addition or order-normalized subtraction.
fn roll_easy(rng: &mut ChaCha8Rng) -> (String, i64) {
    let a = rng.gen_range(1..=20i64);
    let b = rng.gen_range(1..=20i64);
    if rng.gen_bool(0.5) {
        (format!("{} + {}", a, b), a + b)
    } else {
        // Subtraction keeps answers non-negative
        let (big, small) = (a.max(b), a.min(b));
        (format!("{} - {}", big, small), big - small)
    }
}

/// Medium: times tables, exact division, or two-digit addition.
fn roll_medium(rng: &mut ChaCha8Rng) -> (String, i64) {
    match rng.gen_range(0..3u8) {
        0 => {
            let a = rng.gen_range(2..=12i64);
            let b = rng.gen_range(2..=12i64);
            (format!("{} × {}", a, b), a * b)
        }
        1 => {
            // Built from the quotient so the division is always exact
            let b = rng.gen_range(2..=12i64);
            let answer = rng.gen_range(2..=12i64);
            (format!("{} ÷ {}", b * answer, b), answer)
        }
        _ => {
            let a = rng.gen_range(10..=50i64);
            let b = rng.gen_range(10..=50i64);
            (format!("{} + {}", a, b), a + b)
        }
    }
}

/// Hard: large products, squares, three-digit addition, or a two-step mix.
fn roll_hard(rng: &mut ChaCha8Rng) -> (String, i64) {
    match rng.gen_range(0..4u8) {
        0 => {
            let a = rng.gen_range(12..=25i64);
            let b = rng.gen_range(12..=25i64);
            (format!("{} × {}", a, b), a * b)
        }
        1 => {
            let a = rng.gen_range(2..=10i64);
            (format!("{}²", a), a * a)
        }
        2 => {
            let a = rng.gen_range(50..=200i64);
            let b = rng.gen_range(50..=200i64);
            (format!("{} + {}", a, b), a + b)
        }
        _ => {
            let a = rng.gen_range(10..=20i64);
            let b = rng.gen_range(2..=10i64);
            let c = rng.gen_range(1..=10i64);
            (format!("{} × {} + {}", a, b, c), a * b + c)
        }
    }
}
