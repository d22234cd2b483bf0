//! Вывод графа класса в формате Graphviz DOT.

use super::{GraphVisitor, Visit};
use crate::graph::{ClassGraph, MethodGraph, NonTerminal, Symbol, Token, Vocabulary};

/// Собирает текст `digraph` по событиям обхода.
#[derive(Debug, Default)]
pub struct DotVisitor {
    out: String,
}

impl DotVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        self.out.push('\t');
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Экранирование кавычек и обратных слешей для меток DOT.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl GraphVisitor for DotVisitor {
    fn class_start(&mut self, class: &ClassGraph) {
        let name = escape(class.name());
        self.out.push_str(&format!("digraph \"{}\" {{\n", name));
        self.line(&format!("C [label=\"class {}\"];", name));
    }

    fn class_end(&mut self, _class: &ClassGraph) {
        self.out.push_str("}\n");
    }

    fn method_start(&mut self, method: &MethodGraph, root: Visit<'_, NonTerminal>) {
        let signature = escape(method.signature());
        self.out.push_str(&format!("\n\t// begin method {}\n", signature));
        self.line(&format!("M{} [label=\"M:{}\"];", root.id, signature));
        self.line(&format!("C -> M{};", root.id));
        self.line(&format!("M{} -> NT{};", root.id, root.id));
    }

    fn method_end(&mut self, method: &MethodGraph, _root: Visit<'_, NonTerminal>) {
        self.line(&format!("// end method {}", escape(method.signature())));
    }

    fn non_terminal(&mut self, node: Visit<'_, NonTerminal>) {
        self.line(&format!("NT{} [label=\"NT:{}\"];", node.id, escape(&node.item.label())));
    }

    fn token(&mut self, token: Visit<'_, Token>) {
        self.line(&format!(
            "T{} [label=\"T:{}\",shape=box,color=blue];",
            token.id,
            escape(&token.item.text)
        ));
    }

    fn symbol(&mut self, symbol: Visit<'_, Symbol>) {
        self.line(&format!(
            "S{} [label=\"S:{}\",shape=box,color=grey];",
            symbol.id,
            escape(&symbol.item.name)
        ));
    }

    fn vocabulary(&mut self, word: Visit<'_, Vocabulary>) {
        self.line(&format!(
            "V{} [label=\"V:{}\",color=green];",
            word.id,
            escape(&word.item.word)
        ));
    }

    fn next_token(&mut self, from: Visit<'_, Token>, to: Visit<'_, Token>) {
        self.line(&format!("T{} -> T{} [color=blue,label=\"next token\"];", from.id, to.id));
    }

    fn child_token(&mut self, parent: Visit<'_, NonTerminal>, token: Visit<'_, Token>) {
        self.line(&format!("NT{} -> T{} [color=red,label=\"child\"];", parent.id, token.id));
    }

    fn child(&mut self, parent: Visit<'_, NonTerminal>, child: Visit<'_, NonTerminal>) {
        self.line(&format!("NT{} -> NT{} [color=red,label=\"child\"];", parent.id, child.id));
    }

    fn occurrence_of(&mut self, token: Visit<'_, Token>, symbol: Visit<'_, Symbol>) {
        self.line(&format!(
            "T{} -> S{} [color=black,label=\"occurrence of\"];",
            token.id, symbol.id
        ));
    }

    fn subtoken_of(&mut self, word: Visit<'_, Vocabulary>, token: Visit<'_, Token>) {
        self.line(&format!(
            "V{} -> T{} [color=green,label=\"subtoken of\"];",
            word.id, token.id
        ));
    }

    fn next_lexical_use(&mut self, from: Visit<'_, Token>, to: Visit<'_, Token>) {
        self.line(&format!(
            "T{} -> T{} [color=orange,label=\"next lexical use\",style=dashed];",
            from.id, to.id
        ));
    }

    fn assigned_from(&mut self, token: Visit<'_, Token>, node: Visit<'_, NonTerminal>) {
        self.line(&format!(
            "T{} -> NT{} [color=brown,label=\"assigned from\",style=dotted];",
            token.id, node.id
        ));
    }

    fn returns_to(&mut self, call_site: Visit<'_, NonTerminal>, token: Visit<'_, Token>) {
        self.line(&format!(
            "T{} -> NT{} [color=black,label=\"returns to\",style=dotted];",
            token.id, call_site.id
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ClassGraphBuilder;
    use crate::nodecodes::SyntaxKind;
    use crate::walker::walk;

    fn sample() -> ClassGraph {
        let mut class = ClassGraphBuilder::new("Sample");
        let mut m = class.open_method("Sample.greet/0");
        m.descend(SyntaxKind::ReturnStatement);
        m.emit_plain("return");
        m.emit_literal("\"hi\"");
        m.ascend().unwrap();
        let method = m.close().unwrap();
        class.add_method(method);
        class.build()
    }

    fn render(graph: &ClassGraph) -> String {
        let mut dot = DotVisitor::new();
        walk(graph, &mut dot);
        dot.into_string()
    }

    #[test]
    fn test_dot_structure() {
        let text = render(&sample());
        assert!(text.starts_with("digraph \"Sample\" {\n"));
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\tC [label=\"class Sample\"];"));
        assert!(text.contains("\tM0 [label=\"M:Sample.greet/0\"];"));
        assert!(text.contains("\tC -> M0;"));
        assert!(text.contains("\tNT1 [label=\"NT:ReturnStatement\"];"));
        assert!(text.contains("\tT2 -> T3 [color=blue,label=\"next token\"];"));
        assert!(text.contains("\tNT0 -> NT1 [color=red,label=\"child\"];"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let text = render(&sample());
        assert!(text.contains("T3 [label=\"T:\\\"hi\\\"\",shape=box,color=blue];"));
    }

    #[test]
    fn test_dot_output_is_deterministic() {
        let graph = sample();
        assert_eq!(render(&graph), render(&graph));
    }
}
