use std::{path::PathBuf, sync::Arc};

use crate::{
    extract,
    message::{Message, MessageStack},
    rule::{apply_rules, RuleConfiguration, RuleSet, RuleType},
    ScopeKinds, ScopeTree, SourceText,
};

pub fn tracing_subscribe() {
    let _ = tracing_subscriber::fmt::try_init();
}

pub fn extract_lines(lines: &[&str]) -> ScopeTree {
    extract(Arc::new(SourceText::from_lines("unit.cpp", lines))).unwrap()
}

/// Messages of a single configured rule run over `lines`.
pub fn check_rule(
    rule_type: RuleType,
    applied_to: ScopeKinds,
    parameter: Option<&str>,
    lines: &[&str],
) -> Vec<Message> {
    let tree = extract_lines(lines);
    let mut rules = RuleSet::default();
    let id = rules
        .push(RuleConfiguration::new(rule_type, applied_to, parameter))
        .unwrap();
    let mut messages = MessageStack::default();
    apply_rules(&rules, &tree, &mut messages);
    messages.get(id).to_vec()
}

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}
