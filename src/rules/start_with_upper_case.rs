use std::sync::Arc;

use super::{check_names, NAMED_SCOPES};
use crate::{rule, rule::Rule};

pub fn start_with_upper_case_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => StartWithUpperCase,
        description => "%rs names must start with an upper case letter",
        applies_to => NAMED_SCOPES,
        check => |context| {
            check_names(
                context,
                |name| !name.starts_with(char::is_lowercase),
                |name| format!("`{name}` starts with a lower case letter"),
            );
        },
    }
}
