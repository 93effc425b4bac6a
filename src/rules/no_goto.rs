use std::{collections::BTreeSet, sync::Arc};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{rule, rule::Rule, utils::scope_utils::code_matches, violation, ScopeKinds};

static goto_pattern: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bgoto\b").unwrap());

pub fn no_goto_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => NoGoto,
        description => "`goto` must not be used in %rs",
        applies_to => ScopeKinds::FUNCTION,
        check => |context| {
            let tree = context.tree;
            let positions = context
                .scopes()
                .into_iter()
                .flat_map(|id| code_matches(tree, id, &goto_pattern))
                .collect::<BTreeSet<_>>();
            for (line, col) in positions {
                context.report(violation! {
                    content => "`goto` is used",
                    line => line,
                    column => Some(col),
                });
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use crate::{rule::RuleType, tests::helpers::check_rule, ScopeKinds};

    #[test]
    fn test_no_goto_rule() {
        let messages = check_rule(
            RuleType::NoGoto,
            ScopeKinds::ALL,
            None,
            &[
                "void f() {",
                "retry:",
                "  if (failed()) goto retry;",
                "  // goto done;",
                "}",
            ],
        );
        assert_that(&messages).has_length(1);
        assert_that(&messages[0].line).is_equal_to(2);
        assert_that(&messages[0].column).is_equal_to(Some(16));
    }
}
