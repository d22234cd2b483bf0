//! Запись набора данных в формате JSON Lines и словаря токенов.

use std::io::Write;

use log::debug;
use rand::Rng;

use crate::error::GraphResult;
use crate::graph::ClassGraph;
use crate::mutation::{BugSampler, Mutator, RecordPair};
use crate::walker::{walk, RecordVisitor, TrainingRecord};

/// Пары «корректная запись + мутант» для всех методов класса.
pub fn record_pairs<R: Rng + ?Sized>(class: &ClassGraph, mutator: &Mutator, rng: &mut R) -> Vec<RecordPair> {
    let mut visitor = RecordVisitor::new();
    walk(class, &mut visitor);

    let pairs: Vec<RecordPair> = visitor
        .records()
        .iter()
        .filter_map(|record| mutator.pair(record, rng))
        .collect();
    debug!(
        "class {}: {} record(s), {} pair(s)",
        class.name(),
        visitor.records().len(),
        pairs.len()
    );
    pairs
}

/// Пишет записи по одной на строку.
#[derive(Debug)]
pub struct DatasetWriter<W: Write> {
    out: W,
    sampler: BugSampler,
    written: usize,
}

impl<W: Write> DatasetWriter<W> {
    pub fn new(out: W, sampler: BugSampler) -> Self {
        Self {
            out,
            sampler,
            written: 0,
        }
    }

    /// Сколько строк записано.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write_record(&mut self, record: &TrainingRecord) -> GraphResult<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Записать корректную запись и, если решит сэмплер, мутант.
    ///
    /// Возвращает, был ли записан мутант.
    pub fn write_pair<R: Rng + ?Sized>(&mut self, pair: &RecordPair, rng: &mut R) -> GraphResult<bool> {
        self.write_record(&pair.correct)?;
        let keep = self.sampler.keep_buggy(rng);
        if keep {
            self.write_record(&pair.buggy)?;
        }
        Ok(keep)
    }

    pub fn flush(&mut self) -> GraphResult<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Словарь класса: по четыре строки на метод (токены, символы, подслова,
/// метки нетерминалов) после пустой строки-разделителя.
pub fn write_vocabulary<W: Write>(class: &ClassGraph, mut out: W) -> GraphResult<()> {
    let words: Vec<&str> = class.vocabulary().iter().map(|v| v.word.as_str()).collect();

    for method in class.methods() {
        let tokens: Vec<&str> = method.tokens().iter().map(|t| t.text.as_str()).collect();
        let symbols: Vec<&str> = method.symbols().iter().map(|s| s.name.as_str()).collect();
        let labels: Vec<String> = method.non_terminals().iter().map(|n| n.label()).collect();

        writeln!(out)?;
        writeln!(out, "{}", tokens.join(" "))?;
        writeln!(out, "{}", symbols.join(" "))?;
        writeln!(out, "{}", words.join(" "))?;
        writeln!(out, "{}", labels.join(" "))?;
    }
    out.flush()?;
    Ok(())
}
