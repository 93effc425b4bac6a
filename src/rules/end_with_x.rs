use std::sync::Arc;

use super::{check_names, NAMED_SCOPES};
use crate::{rule, rule::Rule};

pub fn end_with_x_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => EndWithX,
        description => "%rs names must end with `%rp`",
        applies_to => NAMED_SCOPES,
        check => |context| {
            let Some(suffix) = context.parameter() else {
                return;
            };
            check_names(
                context,
                |name| name.ends_with(suffix),
                |name| format!("`{name}` does not end with `{suffix}`"),
            );
        },
    }
}
