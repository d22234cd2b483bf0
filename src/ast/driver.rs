//! Перевод входного дерева в вызовы построителя.

use std::collections::VecDeque;

use log::{debug, trace};

use super::{SyntaxElement, SyntaxNode, SyntaxTree};
use crate::builder::{ClassGraphBuilder, MethodCursor};
use crate::error::{GraphError, GraphResult};
use crate::graph::ClassGraph;
use crate::nodecodes::SyntaxKind;

// 256KB red zone, 8MB stack growth
const RED_ZONE: usize = 256 * 1024;
const STACK_GROWTH: usize = 8 * 1024 * 1024;

/// Строит граф первого объявленного типа единицы компиляции.
#[derive(Debug, Default)]
pub struct TreeDriver {
    class: Option<ClassGraphBuilder>,
    skipped_types: usize,
}

impl TreeDriver {
    /// Построить граф класса. `None`, если в дереве нет объявления типа.
    pub fn drive(tree: &SyntaxTree) -> GraphResult<Option<ClassGraph>> {
        let mut driver = TreeDriver::default();
        driver.outer(tree)?;
        if driver.skipped_types > 0 {
            debug!("skipped {} nested or secondary type(s)", driver.skipped_types);
        }
        Ok(driver.class.map(ClassGraphBuilder::build))
    }

    fn outer(&mut self, node: &SyntaxNode) -> GraphResult<()> {
        match node.kind {
            SyntaxKind::CompilationUnit => {
                for child in node.child_nodes() {
                    self.outer(child)?;
                }
                Ok(())
            }
            SyntaxKind::TypeDeclaration | SyntaxKind::EnumDeclaration if self.class.is_none() => {
                let name = node.name.clone().ok_or(GraphError::MissingClassName)?;
                debug!("building class {}", name);
                self.class = Some(ClassGraphBuilder::new(name));
                for child in node.child_nodes() {
                    self.outer(child)?;
                }
                Ok(())
            }
            kind if kind.is_type_declaration() => {
                debug!("skipping {} {}", kind, node.name.as_deref().unwrap_or("<anonymous>"));
                self.skipped_types += 1;
                Ok(())
            }
            SyntaxKind::MethodDeclaration => match self.class.as_mut() {
                Some(class) => build_methods(class, node),
                None => {
                    debug!("method outside of a type declaration skipped");
                    Ok(())
                }
            },
            _ => Ok(()),
        }
    }
}

/// Построить метод и все методы, вложенные в него.
fn build_methods(class: &mut ClassGraphBuilder, declaration: &SyntaxNode) -> GraphResult<()> {
    let mut pending = VecDeque::from([declaration]);

    while let Some(decl) = pending.pop_front() {
        let signature = decl
            .signature
            .clone()
            .ok_or(GraphError::MissingSignature { kind: decl.kind })?;

        let mut deferred = Vec::new();
        let mut cursor = class.open_method(signature);
        drive_children(&mut cursor, decl, &mut deferred)?;
        let method = cursor.close()?;
        class.add_method(method);

        pending.extend(deferred);
    }
    Ok(())
}

fn drive_children<'t>(
    cursor: &mut MethodCursor<'_>,
    node: &'t SyntaxNode,
    deferred: &mut Vec<&'t SyntaxNode>,
) -> GraphResult<()> {
    for child in &node.children {
        match child {
            SyntaxElement::Token(token) => {
                cursor.emit_token(token.text.clone(), token.role);
            }
            SyntaxElement::Node(child) => drive_node(cursor, child, deferred)?,
        }
    }
    Ok(())
}

fn drive_node<'t>(
    cursor: &mut MethodCursor<'_>,
    node: &'t SyntaxNode,
    deferred: &mut Vec<&'t SyntaxNode>,
) -> GraphResult<()> {
    if node.kind == SyntaxKind::MethodDeclaration {
        trace!("{}: deferring nested method", cursor.signature());
        deferred.push(node);
        return Ok(());
    }
    if node.kind.is_type_declaration() {
        debug!("{}: skipping {} inside method", cursor.signature(), node.kind);
        return Ok(());
    }

    match (&node.signature, node.kind) {
        (Some(callee), kind) => {
            cursor.descend_call(kind, callee.as_str());
        }
        (None, SyntaxKind::MethodInvocation) => {
            return Err(GraphError::MissingSignature { kind: node.kind });
        }
        (None, kind) => {
            cursor.descend(kind);
        }
    }

    // Предотвращаем stack overflow на глубоких выражениях
    stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || drive_children(cursor, node, deferred))?;
    cursor.ascend()
}
