use std::{collections::BTreeSet, sync::Arc};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{rule, rule::Rule, utils::scope_utils::code_matches, violation, ScopeKinds};

static const_cast_pattern: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bconst_cast\b").unwrap());

pub fn no_const_cast_rule() -> Arc<dyn Rule> {
    rule! {
        rule_type => NoConstCast,
        description => "`const_cast` must not be used in %rs",
        applies_to => ScopeKinds::SOURCE,
        check => |context| {
            let tree = context.tree;
            let positions = context
                .scopes()
                .into_iter()
                .flat_map(|id| code_matches(tree, id, &const_cast_pattern))
                .collect::<BTreeSet<_>>();
            for (line, col) in positions {
                context.report(violation! {
                    content => "`const_cast` is used",
                    line => line,
                    column => Some(col),
                });
            }
        },
    }
}
