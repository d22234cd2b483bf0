//! Детерминированный обход готового графа класса.
//!
//! Для каждого метода обходчик выдаёт сначала узлы (нетерминалы в прямом
//! порядке, токены в лексическом, символы, словарь класса), затем рёбра в
//! порядке кодов [`EdgeType`](crate::nodecodes::EdgeType), причём рёбра
//! владения токенами идут перед рёбрами между нетерминалами. Два обхода
//! одного графа со свежими [`IdSequence`] дают одинаковые события.

pub mod dot;
pub mod record;

pub use dot::DotVisitor;
pub use record::{RecordEdge, RecordVisitor, TrainingRecord};

use log::trace;

use crate::graph::{ClassGraph, MethodGraph, NonTerminal, NonTerminalId, Symbol, Token, Vocabulary};

/// Генератор идентификаторов сериализации.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    /// Последовательность, начинающаяся с нуля.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// Выдать следующий идентификатор.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Сколько идентификаторов уже выдано от начала.
    pub fn peek(&self) -> u32 {
        self.next
    }
}

/// Посещённая сущность вместе с её идентификатором обхода.
#[derive(Debug)]
pub struct Visit<'g, T> {
    pub id: u32,
    pub item: &'g T,
}

impl<T> Clone for Visit<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Visit<'_, T> {}

/// Получатель событий обхода. Все методы по умолчанию ничего не делают.
pub trait GraphVisitor {
    fn class_start(&mut self, _class: &ClassGraph) {}
    fn class_end(&mut self, _class: &ClassGraph) {}
    fn method_start(&mut self, _method: &MethodGraph, _root: Visit<'_, NonTerminal>) {}
    fn method_end(&mut self, _method: &MethodGraph, _root: Visit<'_, NonTerminal>) {}

    // узлы
    fn non_terminal(&mut self, _node: Visit<'_, NonTerminal>) {}
    fn token(&mut self, _token: Visit<'_, Token>) {}
    fn symbol(&mut self, _symbol: Visit<'_, Symbol>) {}
    fn vocabulary(&mut self, _word: Visit<'_, Vocabulary>) {}

    // рёбра
    fn next_token(&mut self, _from: Visit<'_, Token>, _to: Visit<'_, Token>) {}
    fn child_token(&mut self, _parent: Visit<'_, NonTerminal>, _token: Visit<'_, Token>) {}
    fn child(&mut self, _parent: Visit<'_, NonTerminal>, _child: Visit<'_, NonTerminal>) {}
    fn occurrence_of(&mut self, _token: Visit<'_, Token>, _symbol: Visit<'_, Symbol>) {}
    fn subtoken_of(&mut self, _word: Visit<'_, Vocabulary>, _token: Visit<'_, Token>) {}
    fn next_lexical_use(&mut self, _from: Visit<'_, Token>, _to: Visit<'_, Token>) {}
    fn assigned_from(&mut self, _token: Visit<'_, Token>, _node: Visit<'_, NonTerminal>) {}
    fn returns_to(&mut self, _call_site: Visit<'_, NonTerminal>, _token: Visit<'_, Token>) {}
}

/// Идентификаторы всех сущностей одного метода.
#[derive(Debug)]
struct MethodIds {
    preorder: Vec<NonTerminalId>,
    non_terminals: Vec<u32>,
    tokens: Vec<u32>,
    symbols: Vec<u32>,
    vocabulary: Vec<u32>,
}

impl MethodIds {
    fn assign(method: &MethodGraph, vocabulary: usize, ids: &mut IdSequence) -> Self {
        let preorder = method.preorder();
        let mut non_terminals = vec![0; method.non_terminals().len()];
        for node in &preorder {
            non_terminals[node.0] = ids.next_id();
        }
        let tokens = (0..method.tokens().len()).map(|_| ids.next_id()).collect();
        let symbols = (0..method.symbols().len()).map(|_| ids.next_id()).collect();
        let vocabulary = (0..vocabulary).map(|_| ids.next_id()).collect();

        Self {
            preorder,
            non_terminals,
            tokens,
            symbols,
            vocabulary,
        }
    }
}

/// Обойти граф класса со свежей последовательностью идентификаторов.
pub fn walk<V: GraphVisitor + ?Sized>(class: &ClassGraph, visitor: &mut V) {
    walk_with(class, visitor, &mut IdSequence::new());
}

/// Обойти граф класса, беря идентификаторы из `ids`.
///
/// Идентификаторы раздаются всем методам до начала выдачи событий, чтобы
/// рёбра `returns to` могли ссылаться на места вызова в других методах.
pub fn walk_with<V: GraphVisitor + ?Sized>(class: &ClassGraph, visitor: &mut V, ids: &mut IdSequence) {
    let walker = Walker {
        class,
        ids: class
            .methods()
            .iter()
            .map(|m| MethodIds::assign(m, class.vocabulary().len(), ids))
            .collect(),
    };

    visitor.class_start(class);
    for index in 0..class.methods().len() {
        walker.method(index, visitor);
    }
    visitor.class_end(class);
}

struct Walker<'g> {
    class: &'g ClassGraph,
    ids: Vec<MethodIds>,
}

impl<'g> Walker<'g> {
    fn method<V: GraphVisitor + ?Sized>(&self, index: usize, visitor: &mut V) {
        let method = &self.class.methods()[index];
        let ids = &self.ids[index];
        trace!("walking method {}", method.signature());

        let nt = |id: NonTerminalId| Visit {
            id: ids.non_terminals[id.0],
            item: method.non_terminal(id),
        };
        let tok = |i: usize| Visit {
            id: ids.tokens[i],
            item: &method.tokens()[i],
        };

        let root = nt(method.root());
        visitor.method_start(method, root);

        // узлы
        for id in &ids.preorder {
            visitor.non_terminal(nt(*id));
        }
        for i in 0..method.tokens().len() {
            visitor.token(tok(i));
        }
        for (i, symbol) in method.symbols().iter().enumerate() {
            visitor.symbol(Visit {
                id: ids.symbols[i],
                item: symbol,
            });
        }
        for (i, word) in self.class.vocabulary().iter().enumerate() {
            visitor.vocabulary(Visit {
                id: ids.vocabulary[i],
                item: word,
            });
        }

        // рёбра
        for i in 1..method.tokens().len() {
            visitor.next_token(tok(i - 1), tok(i));
        }
        for id in &ids.preorder {
            for token in &method.non_terminal(*id).tokens {
                visitor.child_token(nt(*id), tok(token.0));
            }
        }
        for id in ids.preorder.iter().skip(1) {
            if let Some(parent) = method.non_terminal(*id).parent {
                visitor.child(nt(parent), nt(*id));
            }
        }
        for (i, token) in method.tokens().iter().enumerate() {
            if let Some(symbol) = token.symbol {
                visitor.occurrence_of(
                    tok(i),
                    Visit {
                        id: ids.symbols[symbol.0],
                        item: method.symbol(symbol),
                    },
                );
            }
        }
        for (i, token) in method.tokens().iter().enumerate() {
            for word in &token.vocabulary {
                visitor.subtoken_of(
                    Visit {
                        id: ids.vocabulary[word.0],
                        item: &self.class.vocabulary()[word.0],
                    },
                    tok(i),
                );
            }
        }
        for (i, token) in method.tokens().iter().enumerate() {
            if let Some(next) = token.next_lexical_use {
                visitor.next_lexical_use(tok(i), tok(next.0));
            }
        }
        for (i, token) in method.tokens().iter().enumerate() {
            if let Some(node) = token.assigned_from {
                visitor.assigned_from(tok(i), nt(node));
            }
        }
        for (i, token) in method.return_tokens() {
            for site in &token.returns_to {
                let call_site = Visit {
                    id: self.ids[site.method].non_terminals[site.node.0],
                    item: self.class.call_site(*site),
                };
                visitor.returns_to(call_site, tok(i.0));
            }
        }

        visitor.method_end(method, root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ClassGraphBuilder;
    use crate::nodecodes::SyntaxKind;

    /// Записывает события в текстовом виде.
    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
    }

    impl GraphVisitor for EventLog {
        fn method_start(&mut self, method: &MethodGraph, root: Visit<'_, NonTerminal>) {
            self.events.push(format!("method {} {}", method.signature(), root.id));
        }
        fn non_terminal(&mut self, node: Visit<'_, NonTerminal>) {
            self.events.push(format!("nt {} {}", node.id, node.item.label()));
        }
        fn token(&mut self, token: Visit<'_, Token>) {
            self.events.push(format!("t {} {}", token.id, token.item.text));
        }
        fn symbol(&mut self, symbol: Visit<'_, Symbol>) {
            self.events.push(format!("s {} {}", symbol.id, symbol.item.name));
        }
        fn vocabulary(&mut self, word: Visit<'_, Vocabulary>) {
            self.events.push(format!("v {} {}", word.id, word.item.word));
        }
        fn next_token(&mut self, from: Visit<'_, Token>, to: Visit<'_, Token>) {
            self.events.push(format!("next_token {} {}", from.id, to.id));
        }
        fn child_token(&mut self, parent: Visit<'_, NonTerminal>, token: Visit<'_, Token>) {
            self.events.push(format!("child_token {} {}", parent.id, token.id));
        }
        fn child(&mut self, parent: Visit<'_, NonTerminal>, child: Visit<'_, NonTerminal>) {
            self.events.push(format!("child {} {}", parent.id, child.id));
        }
        fn occurrence_of(&mut self, token: Visit<'_, Token>, symbol: Visit<'_, Symbol>) {
            self.events.push(format!("occurrence {} {}", token.id, symbol.id));
        }
        fn subtoken_of(&mut self, word: Visit<'_, Vocabulary>, token: Visit<'_, Token>) {
            self.events.push(format!("subtoken {} {}", word.id, token.id));
        }
        fn next_lexical_use(&mut self, from: Visit<'_, Token>, to: Visit<'_, Token>) {
            self.events.push(format!("next_use {} {}", from.id, to.id));
        }
        fn assigned_from(&mut self, token: Visit<'_, Token>, node: Visit<'_, NonTerminal>) {
            self.events.push(format!("assigned {} {}", token.id, node.id));
        }
        fn returns_to(&mut self, call_site: Visit<'_, NonTerminal>, token: Visit<'_, Token>) {
            self.events.push(format!("returns {} {}", call_site.id, token.id));
        }
    }

    /// m1: `return x;`, m2: `int y = m1(); return y;`
    fn two_methods() -> ClassGraph {
        let mut class = ClassGraphBuilder::new("Walk");

        let mut m = class.open_method("Walk.m1/0");
        m.descend(SyntaxKind::ReturnStatement);
        m.emit_plain("return");
        m.emit_identifier("x");
        m.ascend().unwrap();
        let method = m.close().unwrap();
        class.add_method(method);

        let mut m = class.open_method("Walk.m2/0");
        m.descend(SyntaxKind::VariableDeclarationStatement);
        m.descend(SyntaxKind::VariableDeclarationFragment);
        m.emit_identifier("y");
        m.descend_call(SyntaxKind::MethodInvocation, "Walk.m1/0");
        m.emit_identifier("m1");
        m.ascend().unwrap();
        m.ascend().unwrap();
        m.ascend().unwrap();
        m.descend(SyntaxKind::ReturnStatement);
        m.emit_plain("return");
        m.emit_identifier("y");
        m.ascend().unwrap();
        let method = m.close().unwrap();
        class.add_method(method);

        class.build()
    }

    #[test]
    fn test_walk_is_deterministic() {
        let graph = two_methods();
        let mut first = EventLog::default();
        let mut second = EventLog::default();
        walk(&graph, &mut first);
        walk(&graph, &mut second);
        assert_eq!(first.events, second.events);
    }

    #[test]
    fn test_node_then_edge_order() {
        let graph = two_methods();
        let mut log = EventLog::default();
        walk(&graph, &mut log);

        // m1: MethodDeclaration=0, ReturnStatement=1, return=2, x=3, S x=4,
        // словарь: x=5, y=6, m1=7
        let m1: Vec<&str> = log.events.iter().take(13).map(|e| e.as_str()).collect();
        assert_eq!(
            m1,
            vec![
                "method Walk.m1/0 0",
                "nt 0 MethodDeclaration",
                "nt 1 ReturnStatement",
                "t 2 return",
                "t 3 x",
                "s 4 x",
                "v 5 x",
                "v 6 y",
                "v 7 m1",
                "next_token 2 3",
                "child_token 1 2",
                "child_token 1 3",
                "child 0 1",
            ]
        );
        assert_eq!(log.events[13], "occurrence 3 4");
        assert_eq!(log.events[14], "subtoken 5 3");
    }

    #[test]
    fn test_returns_to_references_call_site_in_other_method() {
        let graph = two_methods();
        let mut log = EventLog::default();
        walk(&graph, &mut log);

        // m2 начинается с 8: MethodDeclaration=8, VDS=9, VDF=10, MethodInvocation=11,
        // ReturnStatement=12, токен y=13
        let returns: Vec<&String> = log.events.iter().filter(|e| e.starts_with("returns")).collect();
        assert_eq!(returns, vec!["returns 11 2"]);
        assert!(log.events.contains(&"assigned 13 11".to_string()));
    }

    #[test]
    fn test_id_sequence_continues() {
        let graph = two_methods();
        let mut ids = IdSequence::starting_at(100);
        let mut log = EventLog::default();
        walk_with(&graph, &mut log, &mut ids);

        assert_eq!(log.events[0], "method Walk.m1/0 100");
        assert!(ids.peek() > 100);
    }
}
