//! Обучающие записи в формате GREAT: метки узлов и рёбра между их позициями.

use serde::{Deserialize, Serialize};

use super::{GraphVisitor, Visit};
use crate::graph::{MethodGraph, NonTerminal, Symbol, Token, Vocabulary};
use crate::nodecodes::EdgeType;

/// Ребро записи: `(from, to, code, name)`, индексы в `source_tokens`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEdge(pub usize, pub usize, pub u8, pub String);

impl RecordEdge {
    pub fn new(from: usize, to: usize, edge: EdgeType) -> Self {
        Self(from, to, edge.code(), edge.name().to_string())
    }

    pub fn edge_type(&self) -> Option<EdgeType> {
        EdgeType::from_code(self.2)
    }
}

/// Вид внесённой ошибки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BugKind {
    None,
    OffByOne,
}

impl BugKind {
    pub fn code(self) -> u8 {
        match self {
            BugKind::None => 0,
            BugKind::OffByOne => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BugKind::None => "NONE",
            BugKind::OffByOne => "OFF_BY_ONE",
        }
    }
}

/// Одна обучающая запись: граф одного метода.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub source_tokens: Vec<String>,
    pub edges: Vec<RecordEdge>,
    pub has_bug: bool,
    pub bug_kind: u8,
    pub bug_kind_name: String,
    pub error_location: usize,
    pub repair_targets: Vec<usize>,
    pub repair_candidates: Vec<usize>,
}

impl TrainingRecord {
    /// Корректная запись без ошибки.
    pub fn correct(source_tokens: Vec<String>, edges: Vec<RecordEdge>) -> Self {
        Self {
            source_tokens,
            edges,
            has_bug: false,
            bug_kind: BugKind::None.code(),
            bug_kind_name: BugKind::None.name().to_string(),
            error_location: 0,
            repair_targets: Vec::new(),
            repair_candidates: vec![0],
        }
    }

    /// Пометить запись как содержащую ошибку `kind` в позиции `location`.
    pub fn mark_bug(&mut self, kind: BugKind, location: usize) {
        self.has_bug = kind != BugKind::None;
        self.bug_kind = kind.code();
        self.bug_kind_name = kind.name().to_string();
        self.error_location = location;
        self.repair_targets = if self.has_bug { vec![location] } else { Vec::new() };
    }
}

#[derive(Debug)]
struct PendingRecord {
    base: u32,
    labels: Vec<String>,
    edges: Vec<RecordEdge>,
}

impl PendingRecord {
    /// Позиция в записи, если идентификатор принадлежит текущему методу.
    fn local(&self, id: u32) -> Option<usize> {
        let index = id.checked_sub(self.base)? as usize;
        (index < self.labels.len()).then_some(index)
    }
}

/// Строит по одной записи на метод.
#[derive(Debug, Default)]
pub struct RecordVisitor {
    current: Option<PendingRecord>,
    records: Vec<TrainingRecord>,
}

impl RecordVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TrainingRecord> {
        self.records
    }

    fn label(&mut self, id: u32, label: String) {
        if let Some(pending) = self.current.as_mut() {
            debug_assert_eq!(id - pending.base, pending.labels.len() as u32);
            pending.labels.push(label);
        }
    }

    fn edge(&mut self, from: u32, to: u32, edge: EdgeType) {
        if let Some(pending) = self.current.as_mut() {
            if let (Some(from), Some(to)) = (pending.local(from), pending.local(to)) {
                pending.edges.push(RecordEdge::new(from, to, edge));
            }
        }
    }
}

impl GraphVisitor for RecordVisitor {
    fn method_start(&mut self, _method: &MethodGraph, root: Visit<'_, NonTerminal>) {
        self.current = Some(PendingRecord {
            base: root.id,
            labels: Vec::new(),
            edges: Vec::new(),
        });
    }

    fn method_end(&mut self, _method: &MethodGraph, _root: Visit<'_, NonTerminal>) {
        if let Some(pending) = self.current.take() {
            self.records
                .push(TrainingRecord::correct(pending.labels, pending.edges));
        }
    }

    fn non_terminal(&mut self, node: Visit<'_, NonTerminal>) {
        self.label(node.id, node.item.label());
    }

    fn token(&mut self, token: Visit<'_, Token>) {
        self.label(token.id, token.item.text.clone());
    }

    fn symbol(&mut self, symbol: Visit<'_, Symbol>) {
        self.label(symbol.id, symbol.item.name.clone());
    }

    fn vocabulary(&mut self, word: Visit<'_, Vocabulary>) {
        self.label(word.id, word.item.word.clone());
    }

    fn next_token(&mut self, from: Visit<'_, Token>, to: Visit<'_, Token>) {
        self.edge(from.id, to.id, EdgeType::NextToken);
    }

    fn child_token(&mut self, parent: Visit<'_, NonTerminal>, token: Visit<'_, Token>) {
        self.edge(parent.id, token.id, EdgeType::Child);
    }

    fn child(&mut self, parent: Visit<'_, NonTerminal>, child: Visit<'_, NonTerminal>) {
        self.edge(parent.id, child.id, EdgeType::Child);
    }

    fn occurrence_of(&mut self, token: Visit<'_, Token>, symbol: Visit<'_, Symbol>) {
        self.edge(token.id, symbol.id, EdgeType::OccurrenceOf);
    }

    fn subtoken_of(&mut self, word: Visit<'_, Vocabulary>, token: Visit<'_, Token>) {
        self.edge(word.id, token.id, EdgeType::SubtokenOf);
    }

    fn next_lexical_use(&mut self, from: Visit<'_, Token>, to: Visit<'_, Token>) {
        self.edge(from.id, to.id, EdgeType::NextLexicalUse);
    }

    fn assigned_from(&mut self, token: Visit<'_, Token>, node: Visit<'_, NonTerminal>) {
        self.edge(token.id, node.id, EdgeType::AssignedFrom);
    }

    fn returns_to(&mut self, call_site: Visit<'_, NonTerminal>, token: Visit<'_, Token>) {
        self.edge(call_site.id, token.id, EdgeType::ReturnsTo);
    }
}
