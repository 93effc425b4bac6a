use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{rule, rule::Rule, utils::scope_utils::code_matches, violation, ScopeKinds};

static return_pattern: Lazy<Regex> = Lazy::new(|| Regex::new(r"\breturn\b").unwrap());

pub fn single_return_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => SingleReturn,
        description => "%rs must have a single return statement",
        applies_to => ScopeKinds::FUNCTION,
        check => |context| {
            let tree = context.tree;
            for id in context.scopes() {
                let name = tree.get(id).name();
                for (line, col) in code_matches(tree, id, &return_pattern).into_iter().skip(1) {
                    context.report(violation! {
                        content => format!("`{name}` has more than one return statement"),
                        line => line,
                        column => Some(col),
                    });
                }
            }
        },
    }
}
