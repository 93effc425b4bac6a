use std::{fmt::Write as _, iter, sync::Arc};

use id_arena::Arena;

use super::{Scope, ScopeId};
use crate::{
    extract::ProtectedSpans,
    span::{Position, Span},
    ScopeKind, ScopeKinds, SourceText,
};

/// The nested scopes of one unit, rooted at a `Source` scope spanning all of it.
pub struct ScopeTree {
    source: Arc<SourceText>,
    arena: Arena<Scope>,
    root: ScopeId,
    protected: ProtectedSpans,
}

impl ScopeTree {
    pub(crate) fn new(source: Arc<SourceText>, protected: ProtectedSpans) -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(Scope::new(
            ScopeKind::Source,
            Span::new((0, 0), source.last_position()),
            source.name().to_owned(),
        ));
        Self {
            source,
            arena,
            root,
            protected,
        }
    }

    pub(crate) fn alloc(&mut self, scope: Scope) -> ScopeId {
        self.arena.alloc(scope)
    }

    pub(crate) fn attach(&mut self, parent: ScopeId, child: ScopeId) {
        self.arena[child].parent = Some(parent);
        self.arena[parent].children.push(child);
    }

    pub(crate) fn set_kind(&mut self, id: ScopeId, kind: ScopeKind) {
        self.arena[id].kind = kind;
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() <= 1
    }

    /// Every scope below `id` in pre-order.
    pub fn descendants(&self, id: ScopeId) -> Vec<ScopeId> {
        let mut descendants = vec![];
        let mut stack = self.get(id).children.iter().rev().copied().collect::<Vec<_>>();
        while let Some(current) = stack.pop() {
            descendants.push(current);
            stack.extend(self.get(current).children.iter().rev().copied());
        }
        descendants
    }

    pub fn descendants_of_kind(&self, id: ScopeId, kinds: ScopeKinds) -> Vec<ScopeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&descendant| self.get(descendant).is_of(kinds))
            .collect()
    }

    pub fn children_of_kind(&self, id: ScopeId, kinds: ScopeKinds) -> Vec<ScopeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .filter(|&child| self.get(child).is_of(kinds))
            .collect()
    }

    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(self.get(id).parent, |&current| self.get(current).parent)
    }

    pub fn depth(&self, id: ScopeId) -> usize {
        self.ancestors(id).count()
    }

    pub fn scope_lines(&self, id: ScopeId) -> Vec<&str> {
        let span = self.get(id).span;
        self.source.slice(span.start(), span.end())
    }

    pub fn scope_text(&self, id: ScopeId) -> String {
        self.scope_lines(id).join("\n")
    }

    pub fn protected_spans(&self) -> &ProtectedSpans {
        &self.protected
    }

    pub fn string_literals(&self) -> &[Span] {
        self.protected.literals()
    }

    pub fn is_within_comment(&self, position: Position) -> bool {
        self.protected.is_within_comment(position)
    }

    pub fn is_within_string_literal(&self, position: Position) -> bool {
        self.protected.is_within_literal(position)
    }

    /// One `Kind : name` line per scope, indented by depth.
    pub fn dump(&self) -> String {
        let mut output = String::new();
        for id in iter::once(self.root).chain(self.descendants(self.root)) {
            let scope = self.get(id);
            let _ = writeln!(
                output,
                "{}{} : {}",
                "  ".repeat(self.depth(id)),
                scope.kind,
                scope.name
            );
        }
        output
    }
}
