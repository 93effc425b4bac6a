use std::sync::Arc;

use super::{check_names, NAMED_SCOPES};
use crate::{rule, rule::Rule};

pub fn start_with_lower_case_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => StartWithLowerCase,
        description => "%rs names must start with a lower case letter",
        applies_to => NAMED_SCOPES,
        check => |context| {
            check_names(
                context,
                |name| !name.starts_with(char::is_uppercase),
                |name| format!("`{name}` starts with an upper case letter"),
            );
        },
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use crate::{rule::RuleType, tests::helpers::check_rule, ScopeKinds};

    #[test]
    fn test_start_with_lower_case_rule() {
        let messages = check_rule(
            RuleType::StartWithLowerCase,
            ScopeKinds::FUNCTION,
            None,
            &[
                "void goodName();",
                "void BadName();",
                "Klass::Klass() {",
                "}",
                "Klass::~Klass() {",
                "}",
                "void Klass::method() {",
                "}",
            ],
        );
        let contents = messages.iter().map(|message| message.content.as_str()).collect::<Vec<_>>();
        assert_that(&contents).is_equal_to(vec![
            "`BadName` starts with an upper case letter",
            "`Klass` starts with an upper case letter",
            "`Klass` starts with an upper case letter",
        ]);
    }
}
