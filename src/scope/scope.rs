use id_arena::Id;

use crate::{span::Span, ScopeKind, ScopeKinds};

pub type ScopeId = Id<Scope>;

/// A structural region of a unit, owned by the arena of its `ScopeTree`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    pub(crate) kind: ScopeKind,
    pub(crate) span: Span,
    pub(crate) name: String,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) children: Vec<ScopeId>,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, span: Span, name: String) -> Self {
        Self {
            kind,
            span,
            name,
            parent: None,
            children: vec![],
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn is_of(&self, kinds: ScopeKinds) -> bool {
        self.kind.is_of(kinds)
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without namespace/class qualifiers or a destructor tilde.
    pub fn unqualified_name(&self) -> &str {
        let name = self.name.rsplit("::").next().unwrap_or(&self.name);
        name.trim_start_matches('~')
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }
}
