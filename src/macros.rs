#[macro_export]
macro_rules! continue_if_none {
    ($expr:expr) => {
        match $expr {
            None => continue,
            Some(value) => value,
        }
    };
}

#[macro_export]
macro_rules! violation {
    ($($field:ident => $value:expr),* $(,)?) => {
        $crate::message::Message {
            $($field: $value.into(),)*
            ..Default::default()
        }
    };
}

#[macro_export]
macro_rules! rule {
    (
        rule_type => $rule_type:ident,
        description => $description:literal,
        applies_to => $applies_to:expr,
        $(ignores => $ignores:expr,)?
        check => |$context:ident| $body:block $(,)?
    ) => {{
        struct RuleImpl;

        impl $crate::rule::Rule for RuleImpl {
            fn meta(&self) -> $crate::rule::RuleMeta {
                $crate::rule::RuleMeta {
                    rule_type: $crate::rule::RuleType::$rule_type,
                    description: $description,
                    default_applied_to: $applies_to,
                    ignored: $crate::rule!(@ignores $($ignores)?),
                }
            }

            fn check(&self, $context: &mut $crate::rule::RuleContext<'_>) $body
        }

        std::sync::Arc::new(RuleImpl) as std::sync::Arc<dyn $crate::rule::Rule>
    }};
    (@ignores) => {
        $crate::ScopeKinds::empty()
    };
    (@ignores $ignores:expr) => {
        $ignores
    };
}
