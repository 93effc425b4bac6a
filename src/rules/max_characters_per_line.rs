use std::sync::Arc;

use crate::{rule, rule::Rule, utils::scope_utils::covered_lines, violation, ScopeKinds};

const DEFAULT_MAX: usize = 80;

pub fn max_characters_per_line_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => MaxCharactersPerLine,
        description => "Lines must not be longer than %rp characters",
        applies_to => ScopeKinds::SOURCE,
        check => |context| {
            let max = context.numeric_parameter().unwrap_or(DEFAULT_MAX);
            let source = context.source();
            for line in covered_lines(context.tree, &context.scopes()) {
                let length = source.line(line).chars().count();
                if length > max {
                    context.report(violation! {
                        content => format!("Line is {length} characters long, maximum is {max}"),
                        line => line,
                        column => Some(max),
                    });
                }
            }
        },
    }
}
