use std::{collections::HashMap, fmt, fs, iter, path::Path, sync::Arc};

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    message::{Message, MessageStack, RuleId},
    scope::{ScopeId, ScopeTree},
    Error, Result, ScopeKinds, SourceText,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuleType {
    Unknown,
    NoAuto,
    NoDefine,
    NoMacroFunctions,
    StartWithX,
    EndWithX,
    MaxCharactersPerLine,
    CurlyBracketsOpenSameLine,
    CurlyBracketsOpenSeparateLine,
    CurlyBracketsCloseSameLine,
    CurlyBracketsCloseSeparateLine,
    AlwaysHaveCurlyBrackets,
    NoConstCast,
    StartWithLowerCase,
    StartWithUpperCase,
    NameMaxCharacter,
    SingleReturn,
    NoGoto,
    TabIndentation,
}

const RULE_TYPE_NAMES: &[(&str, RuleType)] = &[
    ("Unknown", RuleType::Unknown),
    ("NoAuto", RuleType::NoAuto),
    ("NoDefine", RuleType::NoDefine),
    ("NoMacroFunctions", RuleType::NoMacroFunctions),
    ("StartWithX", RuleType::StartWithX),
    ("EndWithX", RuleType::EndWithX),
    ("MaxCharactersPerLine", RuleType::MaxCharactersPerLine),
    ("CurlyBracketsOpenSameLine", RuleType::CurlyBracketsOpenSameLine),
    ("CurlyBracketsOpenSeparateLine", RuleType::CurlyBracketsOpenSeparateLine),
    ("CurlyBracketsCloseSameLine", RuleType::CurlyBracketsCloseSameLine),
    ("CurlyBracketsCloseSeparateLine", RuleType::CurlyBracketsCloseSeparateLine),
    ("AlwaysHaveCurlyBrackets", RuleType::AlwaysHaveCurlyBrackets),
    ("NoConstCast", RuleType::NoConstCast),
    ("StartWithLowerCase", RuleType::StartWithLowerCase),
    ("StartWithUpperCase", RuleType::StartWithUpperCase),
    ("NameMaxCharacter", RuleType::NameMaxCharacter),
    ("SingleReturn", RuleType::SingleReturn),
    ("NoGoto", RuleType::NoGoto),
    ("TabIndentation", RuleType::TabIndentation),
];

static rule_types_by_lowercase_name: Lazy<HashMap<String, RuleType>> = Lazy::new(|| {
    RULE_TYPE_NAMES
        .iter()
        .map(|&(name, rule_type)| (name.to_lowercase(), rule_type))
        .collect()
});

const CONFLICTS: &[(RuleType, RuleType)] = &[
    (
        RuleType::CurlyBracketsOpenSameLine,
        RuleType::CurlyBracketsOpenSeparateLine,
    ),
    (
        RuleType::CurlyBracketsCloseSameLine,
        RuleType::CurlyBracketsCloseSeparateLine,
    ),
    (RuleType::StartWithLowerCase, RuleType::StartWithUpperCase),
    (RuleType::StartWithLowerCase, RuleType::StartWithX),
    (RuleType::StartWithUpperCase, RuleType::StartWithX),
];

impl RuleType {
    pub fn from_name(name: &str) -> Option<Self> {
        rule_types_by_lowercase_name
            .get(&name.trim().to_lowercase())
            .copied()
    }

    pub fn name(self) -> &'static str {
        RULE_TYPE_NAMES
            .iter()
            .find(|(_, rule_type)| *rule_type == self)
            .map_or("Unknown", |(name, _)| name)
    }

    pub fn conflicts_with(self, other: Self) -> bool {
        CONFLICTS
            .iter()
            .any(|&(a, b)| (a, b) == (self, other) || (b, a) == (self, other))
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One configured rule: which check, where it applies, and its parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleConfiguration {
    pub id: RuleId,
    pub rule_type: RuleType,
    /// The name as written in the configuration.
    pub name: String,
    pub applied_to: ScopeKinds,
    pub parameter: Option<String>,
}

impl RuleConfiguration {
    pub fn new(rule_type: RuleType, applied_to: ScopeKinds, parameter: Option<&str>) -> Self {
        Self {
            id: 0,
            rule_type,
            name: rule_type.name().to_owned(),
            applied_to,
            parameter: parameter.map(ToOwned::to_owned),
        }
    }

    /// Same check, same parameter, same target.
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        self.rule_type == other.rule_type
            && self.parameter == other.parameter
            && self.applied_to == other.applied_to
    }

    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.rule_type.conflicts_with(other.rule_type) && self.applied_to.intersects(other.applied_to)
    }
}

impl fmt::Display for RuleConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} -> {}", self.id, self.name, self.applied_to)?;
        if let Some(parameter) = &self.parameter {
            write!(f, " ({parameter})")?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleEntry {
    rule: String,
    #[serde(default = "default_applied_to")]
    applied_to: String,
    #[serde(default)]
    parameter: Option<serde_json::Value>,
}

fn default_applied_to() -> String {
    "All".to_owned()
}

#[derive(Deserialize)]
struct RuleFile {
    rules: Vec<RuleEntry>,
}

/// The accepted rules of a run, in configuration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RuleConfiguration>,
}

impl RuleSet {
    pub fn read(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|err| Error::MalformedConfig {
            origin: origin.clone(),
            reason: err.to_string(),
        })?;
        Self::from_json(&origin, &text)
    }

    pub fn from_json(origin: &str, text: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(text).map_err(|err| Error::MalformedConfig {
            origin: origin.to_owned(),
            reason: err.to_string(),
        })?;
        let mut rule_set = Self::default();
        for entry in file.rules {
            let rule_type = RuleType::from_name(&entry.rule).unwrap_or_else(|| {
                error!(rule = %entry.rule, "unknown rule, falling back to `Unknown`");
                RuleType::Unknown
            });
            let applied_to = ScopeKinds::from_kind_name(&entry.applied_to);
            if applied_to == ScopeKinds::UNKNOWN {
                error!(applied_to = %entry.applied_to, rule = %entry.rule, "unknown scope type");
            }
            rule_set.push(RuleConfiguration {
                id: 0,
                rule_type,
                name: entry.rule,
                applied_to,
                parameter: entry.parameter.map(|parameter| match parameter {
                    serde_json::Value::String(parameter) => parameter,
                    parameter => parameter.to_string(),
                }),
            });
        }
        Ok(rule_set)
    }

    /// Accepts `configuration` unless it conflicts with an accepted rule.
    /// Ids are assigned sequentially from 1.
    pub fn push(&mut self, mut configuration: RuleConfiguration) -> Option<RuleId> {
        if let Some(existing) = self
            .rules
            .iter()
            .find(|existing| configuration.conflicts_with(existing))
        {
            error!(
                rule = %configuration.name,
                conflicting = %existing.name,
                "dropping rule conflicting with an earlier rule"
            );
            return None;
        }
        configuration.id = self.rules.len() + 1;
        let id = configuration.id;
        self.rules.push(configuration);
        Some(id)
    }

    pub fn get(&self, id: RuleId) -> Option<&RuleConfiguration> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleConfiguration> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Removes later rules duplicating an earlier one.
    pub fn deduplicate(&mut self) {
        let mut kept: Vec<RuleConfiguration> = vec![];
        for rule in self.rules.drain(..) {
            if kept.iter().any(|existing| rule.is_duplicate_of(existing)) {
                info!(rule = %rule, "removing duplicate rule");
                continue;
            }
            kept.push(rule);
        }
        self.rules = kept;
    }

    pub fn log_summary(&self, verb: &str) {
        info!("{verb} {} rules:", self.rules.len());
        for rule in &self.rules {
            info!(" {rule}");
        }
    }
}

pub struct RuleMeta {
    pub rule_type: RuleType,
    /// `%rs` stands for the applied-to scope set and `%rp` for the parameter.
    pub description: &'static str,
    pub default_applied_to: ScopeKinds,
    pub ignored: ScopeKinds,
}

pub trait Rule: Send + Sync {
    fn meta(&self) -> RuleMeta;
    fn check(&self, context: &mut RuleContext<'_>);
}

pub fn compute_applicable_scopes(
    input: ScopeKinds,
    default: ScopeKinds,
    ignored: ScopeKinds,
) -> ScopeKinds {
    let kinds = if input.contains(ScopeKinds::ALL) {
        default
    } else {
        input
    };
    kinds.difference(ignored)
}

pub struct RuleContext<'a> {
    pub tree: &'a ScopeTree,
    pub configuration: &'a RuleConfiguration,
    pub applicable: ScopeKinds,
    messages: Vec<Message>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        tree: &'a ScopeTree,
        configuration: &'a RuleConfiguration,
        applicable: ScopeKinds,
    ) -> Self {
        Self {
            tree,
            configuration,
            applicable,
            messages: vec![],
        }
    }

    pub fn source(&self) -> &'a SourceText {
        self.tree.source()
    }

    /// Applicable scopes in pre-order, the root included.
    pub fn scopes(&self) -> Vec<ScopeId> {
        let root = self.tree.root();
        iter::once(root)
            .chain(self.tree.descendants(root))
            .filter(|&id| self.tree.get(id).is_of(self.applicable))
            .collect()
    }

    pub fn parameter(&self) -> Option<&'a str> {
        self.configuration.parameter.as_deref()
    }

    pub fn numeric_parameter(&self) -> Option<usize> {
        self.parameter().and_then(|parameter| parameter.trim().parse().ok())
    }

    pub fn report(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// The rule's description with `%rs` naming the scopes it actually checks.
pub fn description(configuration: &RuleConfiguration) -> String {
    let meta = rule_for(configuration.rule_type).meta();
    let applicable =
        compute_applicable_scopes(configuration.applied_to, meta.default_applied_to, meta.ignored);
    meta.description
        .replacen("%rs", &applicable.to_string(), 1)
        .replacen("%rp", configuration.parameter.as_deref().unwrap_or(""), 1)
}

static rules_by_type: Lazy<HashMap<RuleType, Arc<dyn Rule>>> = Lazy::new(|| {
    crate::instantiate()
        .into_iter()
        .map(|rule| (rule.meta().rule_type, rule))
        .collect()
});

pub fn rule_for(rule_type: RuleType) -> Arc<dyn Rule> {
    rules_by_type
        .get(&rule_type)
        .or_else(|| rules_by_type.get(&RuleType::Unknown))
        .cloned()
        .unwrap_or_else(crate::rules::unknown_rule)
}

pub fn apply_rules(rules: &RuleSet, tree: &ScopeTree, messages: &mut MessageStack) {
    for configuration in rules.iter() {
        let rule = rule_for(configuration.rule_type);
        let meta = rule.meta();
        let applicable = compute_applicable_scopes(
            configuration.applied_to,
            meta.default_applied_to,
            meta.ignored,
        );
        let mut context = RuleContext::new(tree, configuration, applicable);
        rule.check(&mut context);
        messages.extend(configuration.id, context.into_messages());
    }
}
