use std::sync::Arc;

use super::{check_names, NAMED_SCOPES};
use crate::{rule, rule::Rule};

const DEFAULT_MAX: usize = 32;

pub fn name_max_character_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => NameMaxCharacter,
        description => "%rs names must not be longer than %rp characters",
        applies_to => NAMED_SCOPES,
        check => |context| {
            let max = context.numeric_parameter().unwrap_or(DEFAULT_MAX);
            check_names(
                context,
                |name| name.chars().count() <= max,
                |name| format!("`{name}` is longer than {max} characters"),
            );
        },
    }
}
