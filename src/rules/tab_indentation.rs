use std::sync::Arc;

use crate::{
    rule, rule::Rule, text::first_non_whitespace_col, utils::scope_utils::covered_lines,
    violation, ScopeKinds,
};

pub fn tab_indentation_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => TabIndentation,
        description => "%rs must be indented with tabs",
        applies_to => ScopeKinds::SOURCE,
        check => |context| {
            let tree = context.tree;
            for line_index in covered_lines(tree, &context.scopes()) {
                let line = tree.source().line(line_index);
                if line.trim().is_empty() {
                    continue;
                }
                let indent_end = first_non_whitespace_col(line);
                if tree.protected_spans().is_protected((line_index, indent_end)) {
                    continue;
                }
                let Some(space) = line[..indent_end].find(' ') else {
                    continue;
                };
                context.report(violation! {
                    content => "Line is indented with spaces",
                    line => line_index,
                    column => Some(space),
                });
            }
        },
    }
}
