//! Основные структуры графа программы.
//!
//! Граф метода хранит сущности в аренах и ссылается на них типизированными
//! индексами. Идентификаторы для сериализации здесь не хранятся: их раздаёт
//! обходчик (см. [`crate::walker::IdSequence`]).

use std::collections::{BTreeMap, BTreeSet};

use crate::nodecodes::SyntaxKind;

/// Ключ метода внутри класса: `qualifiedName/paramCount[types]`.
pub type Signature = String;

/// Индекс нетерминала в графе метода.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminalId(pub usize);

/// Индекс токена в графе метода.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub usize);

/// Индекс символа в графе метода.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

/// Индекс словарной единицы в классе.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VocabularyId(pub usize);

/// Ссылка на место вызова, возможно в другом методе класса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSiteRef {
    /// Индекс метода в [`ClassGraph::methods`]
    pub method: usize,
    pub node: NonTerminalId,
}

/// Нетерминал: узел синтаксического дерева.
#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub kind: SyntaxKind,
    pub parent: Option<NonTerminalId>,
    pub children: Vec<NonTerminalId>,
    pub tokens: Vec<TokenId>,
    /// Сигнатура вызываемого метода; есть только у мест вызова.
    pub callee: Option<Signature>,
}

impl NonTerminal {
    pub(crate) fn new(kind: SyntaxKind, parent: Option<NonTerminalId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            tokens: Vec::new(),
            callee: None,
        }
    }

    pub(crate) fn call_site(kind: SyntaxKind, parent: NonTerminalId, callee: Signature) -> Self {
        Self {
            callee: Some(callee),
            ..Self::new(kind, Some(parent))
        }
    }

    /// Является ли узел местом вызова.
    pub fn is_call_site(&self) -> bool {
        self.callee.is_some()
    }

    /// Метка узла для выходных форматов.
    pub fn label(&self) -> String {
        match &self.callee {
            Some(callee) => format!("{}:{}", self.kind, callee),
            None => self.kind.to_string(),
        }
    }
}

/// Токен: атомарная лексическая единица.
#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub owner: NonTerminalId,
    pub symbol: Option<SymbolId>,
    pub next_lexical_use: Option<TokenId>,
    pub assigned_from: Option<NonTerminalId>,
    pub returns_to: Vec<CallSiteRef>,
    pub vocabulary: Vec<VocabularyId>,
}

impl Token {
    pub(crate) fn new(text: String, owner: NonTerminalId) -> Self {
        Self {
            text,
            owner,
            symbol: None,
            next_lexical_use: None,
            assigned_from: None,
            returns_to: Vec::new(),
            vocabulary: Vec::new(),
        }
    }

    /// Является ли токен ключевым словом `return`.
    pub fn is_return(&self) -> bool {
        self.text == "return"
    }
}

/// Символ: переменная, уникальная в методе по имени.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
}

/// Словарная единица: подслово, уникальное в классе.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub word: String,
}

/// Законченный граф одного метода.
#[derive(Debug, Clone)]
pub struct MethodGraph {
    pub(crate) signature: Signature,
    pub(crate) non_terminals: Vec<NonTerminal>,
    pub(crate) tokens: Vec<Token>,
    pub(crate) symbols: Vec<Symbol>,
}

impl MethodGraph {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Корень графа метода.
    pub fn root(&self) -> NonTerminalId {
        NonTerminalId(0)
    }

    pub fn non_terminal(&self, id: NonTerminalId) -> &NonTerminal {
        &self.non_terminals[id.0]
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.0]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    /// Нетерминалы в порядке создания.
    pub fn non_terminals(&self) -> &[NonTerminal] {
        &self.non_terminals
    }

    /// Токены в лексическом порядке.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Символы в порядке первого вхождения.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Нетерминалы в прямом порядке обхода от корня.
    pub fn preorder(&self) -> Vec<NonTerminalId> {
        let mut order = Vec::with_capacity(self.non_terminals.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.non_terminal(id).children.iter().rev().copied());
        }
        order
    }

    /// Места вызова в прямом порядке.
    pub fn call_sites(&self) -> impl Iterator<Item = (NonTerminalId, &str)> + '_ {
        self.preorder().into_iter().filter_map(move |id| {
            self.non_terminal(id)
                .callee
                .as_deref()
                .map(|callee| (id, callee))
        })
    }

    /// Токены `return` метода.
    pub fn return_tokens(&self) -> impl Iterator<Item = (TokenId, &Token)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_return())
            .map(|(i, t)| (TokenId(i), t))
    }

    /// Найти символ по имени.
    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.iter().position(|s| s.name == name).map(SymbolId)
    }

    /// Все токены с заданным текстом, в лексическом порядке.
    pub fn tokens_with_text<'a>(&'a self, text: &'a str) -> impl Iterator<Item = TokenId> + 'a {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.text == text)
            .map(|(i, _)| TokenId(i))
    }
}

/// Граф класса: методы первого объявленного типа и общий словарь.
#[derive(Debug, Clone)]
pub struct ClassGraph {
    pub(crate) name: String,
    pub(crate) methods: Vec<MethodGraph>,
    pub(crate) vocabulary: Vec<Vocabulary>,
    pub(crate) invocations: BTreeMap<Signature, BTreeSet<Signature>>,
}

impl ClassGraph {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[MethodGraph] {
        &self.methods
    }

    /// Найти метод по сигнатуре.
    pub fn method(&self, signature: &str) -> Option<&MethodGraph> {
        self.methods.iter().find(|m| m.signature == signature)
    }

    /// Словарь класса в порядке добавления.
    pub fn vocabulary(&self) -> &[Vocabulary] {
        &self.vocabulary
    }

    pub fn word(&self, id: VocabularyId) -> &str {
        &self.vocabulary[id.0].word
    }

    /// Какие сигнатуры вызывает каждый метод класса.
    pub fn invocations(&self) -> &BTreeMap<Signature, BTreeSet<Signature>> {
        &self.invocations
    }

    /// Разрешить ссылку на место вызова.
    pub fn call_site(&self, site: CallSiteRef) -> &NonTerminal {
        self.methods[site.method].non_terminal(site.node)
    }
}
