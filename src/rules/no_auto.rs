use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{rule, rule::Rule, utils::scope_utils::code_matches, violation, ScopeKinds};

static auto_pattern: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bauto\b").unwrap());

pub fn no_auto_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => NoAuto,
        description => "%rs must not be declared with `auto`",
        applies_to => ScopeKinds::VARIABLE,
        check => |context| {
            for id in context.scopes() {
                let tree = context.tree;
                if let Some(&(line, col)) = code_matches(tree, id, &auto_pattern).first() {
                    let content = format!("`{}` is declared with `auto`", tree.get(id).name());
                    context.report(violation! {
                        content => content,
                        line => line,
                        column => Some(col),
                    });
                }
            }
        },
    }
}
