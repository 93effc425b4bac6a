use std::sync::Arc;

use crate::{
    rule,
    rule::{Rule, RuleContext},
    utils::scope_utils::{first_code_byte, has_code_before},
    violation, ScopeKinds,
};

const BRACED_SCOPES: ScopeKinds = ScopeKinds::NAMESPACE
    .union(ScopeKinds::CLASS)
    .union(ScopeKinds::ENUM)
    .union(ScopeKinds::FUNCTION)
    .union(ScopeKinds::CONDITIONAL);

fn check_opening_braces(context: &mut RuleContext<'_>, same_line: bool) {
    let tree = context.tree;
    for id in context.scopes() {
        let Some(brace) = first_code_byte(tree, id, b'{') else {
            continue;
        };
        if has_code_before(tree, brace) == same_line {
            continue;
        }
        let name = tree.get(id).name();
        let content = if same_line {
            format!("Opening brace of `{name}` should be on the same line as its declaration")
        } else {
            format!("Opening brace of `{name}` should be on its own line")
        };
        context.report(violation! {
            content => content,
            line => brace.0,
            column => Some(brace.1),
        });
    }
}

pub fn curly_brackets_open_same_line_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => CurlyBracketsOpenSameLine,
        description => "Opening braces of %rs must be on the line of their declaration",
        applies_to => BRACED_SCOPES,
        check => |context| {
            check_opening_braces(context, true);
        },
    }
}

pub fn curly_brackets_open_separate_line_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => CurlyBracketsOpenSeparateLine,
        description => "Opening braces of %rs must be on their own line",
        applies_to => BRACED_SCOPES,
        check => |context| {
            check_opening_braces(context, false);
        },
    }
}
