//! Построитель графа класса и связывание вызовов с возвратами.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, trace};

use super::method::MethodCursor;
use crate::graph::{CallSiteRef, ClassGraph, MethodGraph, Signature, Vocabulary, VocabularyId};
use crate::splitter::split_words;

/// Собирает методы одного типа и общий словарь.
#[derive(Debug)]
pub struct ClassGraphBuilder {
    name: String,
    methods: Vec<MethodGraph>,
    vocabulary: Vec<Vocabulary>,
    vocabulary_index: HashMap<String, VocabularyId>,
    // ключ: метод, значение: какие сигнатуры он вызывает
    invocations: BTreeMap<Signature, BTreeSet<Signature>>,
}

impl ClassGraphBuilder {
    /// Создать построитель для типа `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            vocabulary: Vec::new(),
            vocabulary_index: HashMap::new(),
            invocations: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Начать новый метод. Курсор стоит на корне `MethodDeclaration`.
    ///
    /// Курсор заимствует построитель, поэтому второй метод нельзя открыть,
    /// пока не закрыт текущий.
    pub fn open_method(&mut self, signature: impl Into<Signature>) -> MethodCursor<'_> {
        let signature = signature.into();
        self.invocations.entry(signature.clone()).or_default();
        MethodCursor::new(self, signature)
    }

    /// Добавить законченный метод.
    pub fn add_method(&mut self, method: MethodGraph) {
        debug!(
            "class {}: method {} ({} non-terminals, {} tokens)",
            self.name,
            method.signature(),
            method.non_terminals().len(),
            method.tokens().len()
        );
        self.methods.push(method);
    }

    /// Сколько методов уже добавлено.
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Разбить текст на подслова и вернуть их словарные единицы.
    ///
    /// Повторы подслов внутри одного текста схлопываются.
    pub(crate) fn add_vocabulary(&mut self, text: &str) -> Vec<VocabularyId> {
        let mut ids = Vec::new();
        for word in split_words(text) {
            let id = match self.vocabulary_index.get(&word) {
                Some(id) => *id,
                None => {
                    let id = VocabularyId(self.vocabulary.len());
                    self.vocabulary.push(Vocabulary { word: word.clone() });
                    self.vocabulary_index.insert(word, id);
                    id
                }
            };
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub(crate) fn record_invocation(&mut self, caller: &str, callee: &str) {
        self.invocations
            .entry(caller.to_string())
            .or_default()
            .insert(callee.to_string());
    }

    /// Завершить класс.
    ///
    /// Каждый `return` метода M связывается с каждым местом вызова M в
    /// классе. Вызовы сигнатур вне класса пропускаются.
    pub fn build(mut self) -> ClassGraph {
        let mut links: Vec<(usize, CallSiteRef)> = Vec::new();

        for (caller, method) in self.methods.iter().enumerate() {
            for (node, callee) in method.call_sites() {
                match self.methods.iter().position(|m| m.signature() == callee) {
                    Some(target) => links.push((target, CallSiteRef { method: caller, node })),
                    None => trace!("{}: call to {} is not in the class", method.signature(), callee),
                }
            }
        }

        let mut edges = 0;
        for (target, site) in links {
            for token in self.methods[target].tokens.iter_mut().filter(|t| t.is_return()) {
                token.returns_to.push(site);
                edges += 1;
            }
        }
        debug!(
            "class {} built: {} methods, {} vocabulary units, {} returns-to edges",
            self.name,
            self.methods.len(),
            self.vocabulary.len(),
            edges
        );

        ClassGraph {
            name: self.name,
            methods: self.methods,
            vocabulary: self.vocabulary,
            invocations: self.invocations,
        }
    }
}
