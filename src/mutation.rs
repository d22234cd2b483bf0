//! Внесение ошибок «на единицу» в операторы сравнения.
//!
//! Мутация меняет ровно одну метку записи: `<` на `<=`, `>` на `>=` и
//! обратно. Рёбра записи не меняются.

use log::trace;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::walker::record::{BugKind, TrainingRecord};

/// Операторы, которые умеет мутировать [`Mutator`].
pub const RELATIONAL_OPERATORS: [&str; 4] = ["<", "<=", ">", ">="];

/// Парный оператор с ошибкой «на единицу».
pub fn off_by_one(operator: &str) -> Option<&'static str> {
    match operator {
        "<" => Some("<="),
        "<=" => Some("<"),
        ">" => Some(">="),
        ">=" => Some(">"),
        _ => None,
    }
}

/// Корректная запись и её мутант.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPair {
    pub correct: TrainingRecord,
    pub buggy: TrainingRecord,
}

#[derive(Debug, Clone)]
pub struct Mutator {
    skip_empty_records: bool,
}

impl Default for Mutator {
    fn default() -> Self {
        Self {
            skip_empty_records: true,
        }
    }
}

impl Mutator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Разрешить пары для записей без рёбер.
    pub fn keep_empty_records(mut self) -> Self {
        self.skip_empty_records = false;
        self
    }

    pub fn with_skip_empty_records(mut self, skip: bool) -> Self {
        self.skip_empty_records = skip;
        self
    }

    /// Позиции меток, которые можно мутировать.
    pub fn candidates(record: &TrainingRecord) -> Vec<usize> {
        record
            .source_tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| off_by_one(t).is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Мутант записи, если в ней есть оператор сравнения.
    ///
    /// Позиция выбирается равновероятно среди всех кандидатов.
    pub fn mutate<R: Rng + ?Sized>(&self, record: &TrainingRecord, rng: &mut R) -> Option<TrainingRecord> {
        let candidates = Self::candidates(record);
        let position = *candidates.choose(rng)?;
        let replacement = off_by_one(&record.source_tokens[position])?;

        let mut buggy = record.clone();
        trace!(
            "mutating {} -> {} at {}",
            buggy.source_tokens[position],
            replacement,
            position
        );
        buggy.source_tokens[position] = replacement.to_string();
        buggy.mark_bug(BugKind::OffByOne, position);
        Some(buggy)
    }

    /// Пара «корректная запись + мутант».
    pub fn pair<R: Rng + ?Sized>(&self, record: &TrainingRecord, rng: &mut R) -> Option<RecordPair> {
        if self.skip_empty_records && record.edges.is_empty() {
            return None;
        }
        let buggy = self.mutate(record, rng)?;
        Some(RecordPair {
            correct: record.clone(),
            buggy,
        })
    }
}

/// Решает, попадает ли мутант пары в набор данных.
#[derive(Debug, Clone, Copy)]
pub struct BugSampler {
    buggy_per_hundred: u32,
    balanced: bool,
}

impl Default for BugSampler {
    fn default() -> Self {
        Self::new(10, false)
    }
}

impl BugSampler {
    pub fn new(buggy_per_hundred: u32, balanced: bool) -> Self {
        Self {
            buggy_per_hundred,
            balanced,
        }
    }

    /// Сбалансированный режим: мутант пишется всегда.
    pub fn balanced() -> Self {
        Self::new(100, true)
    }

    pub fn keep_buggy<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.balanced || rng.random_range(0..100) < self.buggy_per_hundred
    }
}
