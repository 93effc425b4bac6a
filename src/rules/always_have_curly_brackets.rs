use std::sync::Arc;

use crate::{rule, rule::Rule, utils::scope_utils::first_code_byte, violation, ScopeKinds};

pub fn always_have_curly_brackets_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => AlwaysHaveCurlyBrackets,
        description => "%rs bodies must be enclosed in curly brackets",
        applies_to => ScopeKinds::CONDITIONAL,
        check => |context| {
            let tree = context.tree;
            for id in context.scopes() {
                if first_code_byte(tree, id, b'{').is_some() {
                    continue;
                }
                let scope = tree.get(id);
                let (line, col) = scope.span().start();
                context.report(violation! {
                    content => format!("`{}` body is not enclosed in curly brackets", scope.name()),
                    line => line,
                    column => Some(col),
                });
            }
        },
    }
}
