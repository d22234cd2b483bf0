//! Курсор построения графа одного метода.
//!
//! Внешний обходчик AST вызывает [`MethodCursor::descend`] при входе в узел
//! и [`MethodCursor::ascend`] при выходе, а токены эмитит в текущий узел.

use std::collections::HashMap;

use log::debug;

use super::class::ClassGraphBuilder;
use crate::error::{GraphError, GraphResult};
use crate::graph::{MethodGraph, NonTerminal, NonTerminalId, Signature, Symbol, SymbolId, Token, TokenId};
use crate::nodecodes::{SyntaxKind, TokenRole};

/// Режим присваивания.
///
/// Внешний парсер не отдаёт правую часть декларатора переменной явно,
/// поэтому она восстанавливается по порядку обхода: первый идентификатор
/// после входа в присваивание считается приёмником, а первый следующий
/// нетерминал считается корнем правой части. Если у правой части нет своего
/// нетерминала (голый литерал или имя), ребро не создаётся.
#[derive(Debug, Default)]
struct AssignmentMode {
    active: bool,
    assignee: Option<(SymbolId, TokenId)>,
}

impl AssignmentMode {
    fn clear(&mut self) {
        self.active = false;
        self.assignee = None;
    }
}

/// Открытый метод. Закрывается через [`MethodCursor::close`].
#[derive(Debug)]
pub struct MethodCursor<'c> {
    class: &'c mut ClassGraphBuilder,
    signature: Signature,
    non_terminals: Vec<NonTerminal>,
    tokens: Vec<Token>,
    symbols: Vec<Symbol>,
    symbol_index: HashMap<String, SymbolId>,
    last_occurrence: HashMap<String, TokenId>,
    // открытые узлы без корня
    stack: Vec<NonTerminalId>,
    assignment: AssignmentMode,
}

impl<'c> MethodCursor<'c> {
    pub(super) fn new(class: &'c mut ClassGraphBuilder, signature: Signature) -> Self {
        Self {
            class,
            signature,
            non_terminals: vec![NonTerminal::new(SyntaxKind::MethodDeclaration, None)],
            tokens: Vec::new(),
            symbols: Vec::new(),
            symbol_index: HashMap::new(),
            last_occurrence: HashMap::new(),
            stack: Vec::new(),
            assignment: AssignmentMode::default(),
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Текущий узел.
    pub fn current(&self) -> NonTerminalId {
        self.stack.last().copied().unwrap_or(NonTerminalId(0))
    }

    /// Глубина открытых узлов под корнем.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Создать дочерний нетерминал и сделать его текущим.
    pub fn descend(&mut self, kind: SyntaxKind) -> NonTerminalId {
        let parent = self.current();
        self.push(NonTerminal::new(kind, Some(parent)))
    }

    /// Как [`descend`](Self::descend), но создаёт место вызова `callee`.
    pub fn descend_call(&mut self, kind: SyntaxKind, callee: impl Into<Signature>) -> NonTerminalId {
        let callee = callee.into();
        self.class.record_invocation(&self.signature, &callee);
        let parent = self.current();
        self.push(NonTerminal::call_site(kind, parent, callee))
    }

    fn push(&mut self, node: NonTerminal) -> NonTerminalId {
        if node.kind.is_assignment_shaped() {
            self.assignment.active = true;
        }

        let id = NonTerminalId(self.non_terminals.len());
        let parent = self.current();
        self.non_terminals.push(node);
        self.non_terminals[parent.0].children.push(id);
        self.stack.push(id);

        // новый узел: правая часть ожидающего присваивания
        if self.assignment.active {
            if let Some((_, token)) = self.assignment.assignee {
                self.tokens[token.0].assigned_from = Some(id);
                self.assignment.clear();
            }
        }

        id
    }

    /// Вернуться к родителю текущего узла.
    ///
    /// Подъём выше корня означает рассинхронизацию обхода и построителя.
    pub fn ascend(&mut self) -> GraphResult<()> {
        let id = self
            .stack
            .pop()
            .ok_or_else(|| GraphError::AscendPastRoot(self.signature.clone()))?;

        if self.non_terminals[id.0].kind.is_assignment_shaped() {
            self.assignment.clear();
        }
        Ok(())
    }

    /// Добавить токен в текущий узел.
    pub fn emit_token(&mut self, text: impl Into<String>, role: TokenRole) -> TokenId {
        let text = text.into();
        let owner = self.current();
        let id = TokenId(self.tokens.len());

        let mut token = Token::new(text.clone(), owner);
        if role.has_vocabulary() {
            token.vocabulary = self.class.add_vocabulary(&text);
        }
        if role == TokenRole::Identifier {
            let symbol = self.symbol(&text);
            token.symbol = Some(symbol);

            if self.assignment.active && self.assignment.assignee.is_none() {
                self.assignment.assignee = Some((symbol, id));
            }
        }

        if let Some(previous) = self.last_occurrence.insert(text, id) {
            self.tokens[previous.0].next_lexical_use = Some(id);
        }
        self.tokens.push(token);
        self.non_terminals[owner.0].tokens.push(id);
        id
    }

    /// Ключевое слово, оператор или пунктуация.
    pub fn emit_plain(&mut self, text: impl Into<String>) -> TokenId {
        self.emit_token(text, TokenRole::Plain)
    }

    /// Вхождение идентификатора.
    pub fn emit_identifier(&mut self, name: impl Into<String>) -> TokenId {
        self.emit_token(name, TokenRole::Identifier)
    }

    /// Строковый или типовой литерал.
    pub fn emit_literal(&mut self, text: impl Into<String>) -> TokenId {
        self.emit_token(text, TokenRole::Literal)
    }

    fn symbol(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.symbol_index.get(name) {
            return *id;
        }
        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_string(),
        });
        self.symbol_index.insert(name.to_string(), id);
        id
    }

    /// Завершить метод. Все узлы кроме корня должны быть закрыты.
    pub fn close(self) -> GraphResult<MethodGraph> {
        if !self.stack.is_empty() {
            return Err(GraphError::UnbalancedTraversal {
                signature: self.signature,
                open: self.stack.len(),
            });
        }

        debug!(
            "method {} closed: {} non-terminals, {} tokens, {} symbols",
            self.signature,
            self.non_terminals.len(),
            self.tokens.len(),
            self.symbols.len()
        );
        Ok(MethodGraph {
            signature: self.signature,
            non_terminals: self.non_terminals,
            tokens: self.tokens,
            symbols: self.symbols,
        })
    }
}
