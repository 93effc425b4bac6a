mod always_have_curly_brackets;
mod curly_brackets_close;
mod curly_brackets_open;
mod end_with_x;
mod max_characters_per_line;
mod name_max_character;
mod no_auto;
mod no_const_cast;
mod no_define;
mod no_goto;
mod no_macro_functions;
mod single_return;
mod start_with_lower_case;
mod start_with_upper_case;
mod start_with_x;
mod tab_indentation;
mod unknown;

pub use always_have_curly_brackets::always_have_curly_brackets_rule;
pub use curly_brackets_close::{
    curly_brackets_close_same_line_rule, curly_brackets_close_separate_line_rule,
};
pub use curly_brackets_open::{
    curly_brackets_open_same_line_rule, curly_brackets_open_separate_line_rule,
};
pub use end_with_x::end_with_x_rule;
pub use max_characters_per_line::max_characters_per_line_rule;
pub use name_max_character::name_max_character_rule;
pub use no_auto::no_auto_rule;
pub use no_const_cast::no_const_cast_rule;
pub use no_define::no_define_rule;
pub use no_goto::no_goto_rule;
pub use no_macro_functions::no_macro_functions_rule;
pub use single_return::single_return_rule;
pub use start_with_lower_case::start_with_lower_case_rule;
pub use start_with_upper_case::start_with_upper_case_rule;
pub use start_with_x::start_with_x_rule;
pub use tab_indentation::tab_indentation_rule;
pub use unknown::unknown_rule;

use crate::{rule::RuleContext, violation, ScopeKinds};

pub(crate) const NAMED_SCOPES: ScopeKinds = ScopeKinds::NAMESPACE
    .union(ScopeKinds::CLASS)
    .union(ScopeKinds::ENUM)
    .union(ScopeKinds::FUNCTION)
    .union(ScopeKinds::VARIABLE);

/// Reports every applicable scope whose unqualified name fails `is_valid`.
pub(crate) fn check_names(
    context: &mut RuleContext<'_>,
    is_valid: impl Fn(&str) -> bool,
    describe: impl Fn(&str) -> String,
) {
    let tree = context.tree;
    for id in context.scopes() {
        let scope = tree.get(id);
        let name = scope.unqualified_name();
        if name.is_empty() || is_valid(name) {
            continue;
        }
        let (line, col) = scope.span().start();
        context.report(violation! {
            content => describe(name),
            line => line,
            column => Some(col),
        });
    }
}
