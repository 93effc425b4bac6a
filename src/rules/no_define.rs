use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{rule, rule::Rule, violation, ScopeKinds};

pub(crate) static define_name_pattern: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#define\s+(?P<name>\w+)(?P<parameters>\()?").unwrap());

pub fn no_define_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => NoDefine,
        description => "Macros must not be defined",
        applies_to => ScopeKinds::GLOBAL_DEFINE,
        check => |context| {
            let tree = context.tree;
            for id in context.scopes() {
                let scope = tree.get(id);
                let name = define_name_pattern
                    .captures(scope.name())
                    .map_or("", |captures| captures.name("name").map_or("", |name| name.as_str()));
                let content = format!("Macro `{name}` is defined");
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

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use crate::{rule::RuleType, tests::helpers::check_rule, ScopeKinds};

    #[test]
    fn test_no_define_rule() {
        let messages = check_rule(
            RuleType::NoDefine,
            ScopeKinds::ALL,
            None,
            &["#define MAX 10", "// #define MIN 0", "int a;", "  #define SQUARE(x) \\", "  ((x) * (x))"],
        );
        assert_that(&messages).has_length(2);
        assert_that(&messages[0].content).is_equal_to("Macro `MAX` is defined".to_owned());
        assert_that(&messages[1].line).is_equal_to(3);
        assert_that(&messages[1].column).is_equal_to(Some(2));
    }
}
