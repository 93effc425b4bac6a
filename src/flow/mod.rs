mod null_pointer;
mod uninitialized;
mod value;

use regex::Regex;
use tracing::debug;

pub use null_pointer::find_null_dereference;
pub use uninitialized::find_uninitialized_use;

use crate::{
    message::{MessageStack, RuleId, Severity},
    scope::{ScopeId, ScopeTree},
    violation, ScopeKinds,
};

pub const NULL_POINTER_CHECK: RuleId = 1;
pub const UNINITIALIZED_CHECK: RuleId = 2;

/// Report name and description of each flow check.
pub const FLOW_CHECKS: &[(RuleId, &str, &str)] = &[
    (
        NULL_POINTER_CHECK,
        "NullPointer",
        "Pointers must not be used while NULL",
    ),
    (
        UNINITIALIZED_CHECK,
        "Uninitialized",
        "Primitive variables must be initialized before use",
    ),
];

/// Runs the value-tracking checks over every variable of the unit.
pub fn verify_flow(tree: &ScopeTree, messages: &mut MessageStack) {
    let variables = tree.descendants_of_kind(tree.root(), ScopeKinds::VARIABLE);
    for &id in &variables {
        if let Some(line) = find_null_dereference(tree, id) {
            messages.push(
                NULL_POINTER_CHECK,
                violation! {
                    severity => Severity::Error,
                    content => format!("`{}` will throw a NULL pointer exception", tree.get(id).name()),
                    line => line,
                },
            );
        }
    }
    for &id in &variables {
        if let Some(line) = find_uninitialized_use(tree, id) {
            messages.push(
                UNINITIALIZED_CHECK,
                violation! {
                    severity => Severity::Error,
                    content => format!("`{}` is used before initialization", tree.get(id).name()),
                    line => line,
                },
            );
        }
    }
    debug!(unit = tree.name(), variables = variables.len(), "verified flow");
}

/// The enclosing function or conditional whose lines are tracked.
fn tracked_parent(tree: &ScopeTree, id: ScopeId) -> Option<ScopeId> {
    tree.get(id)
        .parent()
        .filter(|&parent| tree.get(parent).is_of(ScopeKinds::FUNCTION | ScopeKinds::CONDITIONAL))
}

fn usage_pattern(escaped_name: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?:^|\s)(?P<name>{escaped_name})(?:\s+|=|\(|\{{|;)")).ok()
}

/// End of the first occurrence of the variable on `line_index` that is outside
/// comments and literals.
fn find_usage(tree: &ScopeTree, usage: &Regex, line_index: usize) -> Option<usize> {
    usage
        .captures_iter(tree.source().line(line_index))
        .find(|captures| {
            captures.name("name").map_or(false, |name| {
                !tree.protected_spans().is_protected((line_index, name.start()))
            })
        })
        .and_then(|captures| captures.get(0))
        .map(|found| found.end())
}
