use std::sync::Arc;

use super::{check_names, NAMED_SCOPES};
use crate::{rule, rule::Rule};

pub fn start_with_x_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => StartWithX,
        description => "%rs names must start with `%rp`",
        applies_to => NAMED_SCOPES,
        check => |context| {
            let Some(prefix) = context.parameter() else {
                return;
            };
            check_names(
                context,
                |name| name.starts_with(prefix),
                |name| format!("`{name}` does not start with `{prefix}`"),
            );
        },
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use crate::{rule::RuleType, tests::helpers::check_rule, ScopeKinds};

    #[test]
    fn test_start_with_x_rule() {
        let messages = check_rule(
            RuleType::StartWithX,
            ScopeKinds::CLASS,
            Some("C"),
            &["class CGood {", "};", "struct Bad {", "  int member;", "};"],
        );
        assert_that(&messages).has_length(1);
        assert_that(&messages[0].content).is_equal_to("`Bad` does not start with `C`".to_owned());
        assert_that(&messages[0].line).is_equal_to(2);
    }

    #[test]
    fn test_without_parameter_nothing_is_checked() {
        let messages = check_rule(RuleType::StartWithX, ScopeKinds::ALL, None, &["int bad;"]);
        assert_that(&messages).is_empty();
    }
}
