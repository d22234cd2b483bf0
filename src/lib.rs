//! # prograph
//!
//! Графы программ для машинного обучения на исходном коде.
//!
//! Граф метода соединяет синтаксические узлы, токены, символы переменных и
//! подслова идентификаторов типизированными рёбрами. Из графов строятся
//! обучающие записи, а мутация операторов сравнения даёт к ним пары с
//! ошибкой «на единицу».
//!
//! ## Основные модули
//!
//! - [`graph`] - Модель графа: нетерминалы, токены, символы, словарь
//! - [`nodecodes`] - Синтаксические категории, роли токенов и типы рёбер
//! - [`builder`] - Построение графа по событиям обхода дерева
//! - [`walker`] - Детерминированный обход и сериализация (DOT, записи)
//! - [`splitter`] - Разбиение идентификаторов на подслова
//! - [`mutation`] - Мутация операторов сравнения
//! - [`ast`] - Входное синтаксическое дерево
//! - [`dataset`] - Запись набора данных
//!
//! ## Пример
//!
//! ```rust,ignore
//! use prograph::ast::{SyntaxTree, TreeDriver};
//! use prograph::walker::{walk, DotVisitor};
//!
//! let tree = SyntaxTree::from_path("fixtures/calc.json")?;
//! if let Some(graph) = TreeDriver::drive(&tree)? {
//!     let mut dot = DotVisitor::new();
//!     walk(&graph, &mut dot);
//!     println!("{}", dot.as_str());
//! }
//! ```

// === Модель ===
pub mod error;
pub mod graph;
pub mod nodecodes;
pub mod splitter;

// === Построение и обход ===
pub mod ast;
pub mod builder;
pub mod walker;

// === Набор данных ===
pub mod config;
pub mod dataset;
pub mod mutation;

pub use ast::{SyntaxTree, TreeDriver};
pub use builder::{ClassGraphBuilder, MethodCursor};
pub use config::GeneratorConfig;
pub use error::{GraphError, GraphResult};
pub use graph::{ClassGraph, MethodGraph};
pub use mutation::{BugSampler, Mutator, RecordPair};
pub use walker::{walk, walk_with, DotVisitor, GraphVisitor, IdSequence, RecordVisitor, TrainingRecord};
