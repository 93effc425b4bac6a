use std::sync::Arc;

use crate::{
    rule,
    rule::{Rule, RuleContext},
    utils::scope_utils::has_code_before,
    violation, ScopeKinds,
};

const BRACED_SCOPES: ScopeKinds = ScopeKinds::NAMESPACE
    .union(ScopeKinds::CLASS)
    .union(ScopeKinds::ENUM)
    .union(ScopeKinds::FUNCTION)
    .union(ScopeKinds::CONDITIONAL);

fn check_closing_braces(context: &mut RuleContext<'_>, same_line: bool) {
    let tree = context.tree;
    for id in context.scopes() {
        let span = tree.get(id).span();
        let end = span.end();
        if span.line_start == span.line_end || tree.source().byte_at(end) != Some(b'}') {
            continue;
        }
        if has_code_before(tree, end) == same_line {
            continue;
        }
        let name = tree.get(id).name();
        let content = if same_line {
            format!("Closing brace of `{name}` should share its line with code")
        } else {
            format!("Closing brace of `{name}` should be on its own line")
        };
        context.report(violation! {
            content => content,
            line => end.0,
            column => Some(end.1),
        });
    }
}

pub fn curly_brackets_close_same_line_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => CurlyBracketsCloseSameLine,
        description => "Closing braces of %rs must share their line with code",
        applies_to => BRACED_SCOPES,
        check => |context| {
            check_closing_braces(context, true);
        },
    }
}

pub fn curly_brackets_close_separate_line_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => CurlyBracketsCloseSeparateLine,
        description => "Closing braces of %rs must be on their own line",
        applies_to => BRACED_SCOPES,
        check => |context| {
            check_closing_braces(context, false);
        },
    }
}
