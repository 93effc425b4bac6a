use std::sync::Arc;

use super::no_define::define_name_pattern;
use crate::{rule, rule::Rule, violation, ScopeKinds};

pub fn no_macro_functions_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => NoMacroFunctions,
        description => "Function-like macros must not be defined",
        applies_to => ScopeKinds::GLOBAL_DEFINE,
        check => |context| {
            let tree = context.tree;
            for id in context.scopes() {
                let scope = tree.get(id);
                let Some(captures) = define_name_pattern.captures(scope.name()) else {
                    continue;
                };
                if captures.name("parameters").is_none() {
                    continue;
                }
                let content = format!("Function-like macro `{}`", &captures["name"]);
                let (line, col) = scope.span().start();
                context.report(violation! {
                    content => content,
                    line => line,
                    column => Some(col),
                });
            }
        },
    }
}
