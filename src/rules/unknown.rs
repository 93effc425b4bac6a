use std::sync::Arc;

use crate::{message::Severity, rule, rule::Rule, violation, ScopeKinds};

pub fn unknown_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => Unknown,
        description => "Rule is not recognized and was ignored",
        applies_to => ScopeKinds::ALL,
        check => |context| {
            let content = format!("Unknown rule `{}`", context.configuration.name);
            context.report(violation! {
                severity => Severity::Error,
                content => content,
            });
        },
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use crate::{message::Severity, rule::RuleType, tests::helpers::check_rule, ScopeKinds};

    #[test]
    fn test_unknown_rule_flags_every_unit_once() {
        let messages = check_rule(RuleType::Unknown, ScopeKinds::ALL, None, &["int a;", "int b;"]);
        assert_that(&messages).has_length(1);
        assert_that(&messages[0].severity).is_equal_to(Severity::Error);
        assert_that(&messages[0].line).is_equal_to(0);
    }
}
