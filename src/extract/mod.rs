mod defines;
mod extent;
mod patterns;
mod protected;
mod scanners;
mod tree_builder;

use std::sync::Arc;

use tracing::{debug, instrument};

pub use defines::{scan_defines, Define, MacroIndex};
pub use extent::MAX_NESTING_DEPTH;
pub use patterns::RESERVED_KEYWORDS;
pub use protected::{Comment, CommentStyle, ProtectedSpans};
use scanners::{
    scan_classes, scan_conditionals, scan_enums, scan_functions, scan_namespaces,
    scan_variables, ScanContext,
};

use crate::{scope::ScopeTree, span::Span, Result, ScopeKind, SourceText};

/// A scope found by one of the scanners, before nesting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub kind: ScopeKind,
    pub span: Span,
    pub name: String,
}

/// The flat result of scanning one unit. Turned into a tree once every
/// worker is done.
pub struct ScannedUnit {
    source: Arc<SourceText>,
    protected: ProtectedSpans,
    candidates: Vec<Candidate>,
}

impl ScannedUnit {
    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn into_tree(self) -> ScopeTree {
        tree_builder::build_tree(self.source, self.protected, self.candidates)
    }
}

#[instrument(level = "debug", skip_all, fields(unit = %source.name()))]
pub fn scan(source: Arc<SourceText>) -> Result<ScannedUnit> {
    let protected = ProtectedSpans::scan(&source);
    let defines = scan_defines(&source, &protected);
    let macros = MacroIndex::new(&defines);

    let mut candidates = protected
        .comments()
        .iter()
        .map(|comment| Candidate {
            kind: comment.style.kind(),
            span: comment.span,
            name: protected.comment_text(&source, comment),
        })
        .collect::<Vec<_>>();
    candidates.extend(defines.into_iter().map(|define| Candidate {
        kind: ScopeKind::GlobalDefine,
        span: define.span,
        name: define.text,
    }));

    let context = ScanContext::new(&source, &protected, &macros);
    let scanners: [fn(&ScanContext) -> Result<Vec<Candidate>>; 6] = [
        scan_namespaces,
        scan_enums,
        scan_classes,
        scan_functions,
        scan_variables,
        scan_conditionals,
    ];
    for scanner in scanners {
        candidates.extend(scanner(&context)?);
    }

    debug!(candidates = candidates.len(), "scanned unit");
    Ok(ScannedUnit {
        source,
        protected,
        candidates,
    })
}

pub fn extract(source: Arc<SourceText>) -> Result<ScopeTree> {
    Ok(scan(source)?.into_tree())
}
