mod scope;
mod scope_tree;

pub use scope::{Scope, ScopeId};
pub use scope_tree::ScopeTree;
