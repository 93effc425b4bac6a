use std::{collections::HashMap, fmt};

use bitflags::bitflags;
use itertools::Itertools;
use once_cell::sync::Lazy;

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScopeKinds: u32 {
        const SOURCE = 0x1;
        const NAMESPACE = 0x2;
        const CLASS = 0x4;
        const ENUM = 0x8;
        const FREE_FUNCTION = 0x10;
        const CLASS_FUNCTION = 0x20;
        const CONDITIONAL = 0x40;
        const CLASS_VARIABLE = 0x80;
        const FUNCTION_VARIABLE = 0x100;
        const GLOBAL_VARIABLE = 0x200;
        const GLOBAL_DEFINE = 0x400;
        const SINGLE_LINE_COMMENT = 0x800;
        const MULTI_LINE_COMMENT = 0x1000;
        const STRING_LITERAL = 0x2000;
        const UNKNOWN = 0x4000;

        const FUNCTION = Self::FREE_FUNCTION.bits() | Self::CLASS_FUNCTION.bits();
        const VARIABLE = Self::CLASS_VARIABLE.bits()
            | Self::FUNCTION_VARIABLE.bits()
            | Self::GLOBAL_VARIABLE.bits();
        const COMMENT = Self::SINGLE_LINE_COMMENT.bits() | Self::MULTI_LINE_COMMENT.bits();
        const GLOBAL = Self::GLOBAL_VARIABLE.bits()
            | Self::GLOBAL_DEFINE.bits()
            | Self::FREE_FUNCTION.bits();
        const ALL = Self::SOURCE.bits()
            | Self::NAMESPACE.bits()
            | Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::FUNCTION.bits()
            | Self::CONDITIONAL.bits()
            | Self::VARIABLE.bits()
            | Self::GLOBAL_DEFINE.bits()
            | Self::COMMENT.bits()
            | Self::STRING_LITERAL.bits();
    }
}

/// Composites come first so that `Display` prefers them over their parts.
const SCOPE_KIND_NAMES: &[(&str, ScopeKinds)] = &[
    ("All", ScopeKinds::ALL),
    ("Global", ScopeKinds::GLOBAL),
    ("Function", ScopeKinds::FUNCTION),
    ("Variable", ScopeKinds::VARIABLE),
    ("Comment", ScopeKinds::COMMENT),
    ("Source", ScopeKinds::SOURCE),
    ("Namespace", ScopeKinds::NAMESPACE),
    ("Class", ScopeKinds::CLASS),
    ("Enum", ScopeKinds::ENUM),
    ("FreeFunction", ScopeKinds::FREE_FUNCTION),
    ("ClassFunction", ScopeKinds::CLASS_FUNCTION),
    ("Conditional", ScopeKinds::CONDITIONAL),
    ("ClassVariable", ScopeKinds::CLASS_VARIABLE),
    ("FunctionVariable", ScopeKinds::FUNCTION_VARIABLE),
    ("GlobalVariable", ScopeKinds::GLOBAL_VARIABLE),
    ("GlobalDefine", ScopeKinds::GLOBAL_DEFINE),
    ("SingleLineComment", ScopeKinds::SINGLE_LINE_COMMENT),
    ("MultiLineComment", ScopeKinds::MULTI_LINE_COMMENT),
    ("StringLiteral", ScopeKinds::STRING_LITERAL),
    ("Unknown", ScopeKinds::UNKNOWN),
];

static kinds_by_lowercase_name: Lazy<HashMap<String, ScopeKinds>> = Lazy::new(|| {
    SCOPE_KIND_NAMES
        .iter()
        .map(|&(name, kinds)| (name.to_lowercase(), kinds))
        .collect()
});

impl ScopeKinds {
    /// Case-insensitive; unrecognized names map to `UNKNOWN`.
    pub fn from_kind_name(name: &str) -> Self {
        kinds_by_lowercase_name
            .get(&name.trim().to_lowercase())
            .copied()
            .unwrap_or(Self::UNKNOWN)
    }
}

impl fmt::Display for ScopeKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((name, _)) = SCOPE_KIND_NAMES.iter().find(|(_, kinds)| kinds == self) {
            return f.write_str(name);
        }
        let mut remaining = *self;
        let mut names = vec![];
        for &(name, kinds) in SCOPE_KIND_NAMES {
            if !kinds.is_empty() && remaining.contains(kinds) {
                names.push(name);
                remaining.remove(kinds);
            }
        }
        if names.is_empty() {
            return f.write_str("None");
        }
        write!(f, "{}", names.into_iter().join("|"))
    }
}

/// The category of a single node.
///
/// `Variable` and `Function` are only produced by the scanners; the tree
/// builder resolves them to one of their concrete variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Source,
    Namespace,
    Class,
    Enum,
    Function,
    FreeFunction,
    ClassFunction,
    Conditional,
    Variable,
    ClassVariable,
    FunctionVariable,
    GlobalVariable,
    GlobalDefine,
    SingleLineComment,
    MultiLineComment,
    StringLiteral,
    Unknown,
}

impl ScopeKind {
    pub fn kinds(self) -> ScopeKinds {
        match self {
            Self::Source => ScopeKinds::SOURCE,
            Self::Namespace => ScopeKinds::NAMESPACE,
            Self::Class => ScopeKinds::CLASS,
            Self::Enum => ScopeKinds::ENUM,
            Self::Function => ScopeKinds::FUNCTION,
            Self::FreeFunction => ScopeKinds::FREE_FUNCTION,
            Self::ClassFunction => ScopeKinds::CLASS_FUNCTION,
            Self::Conditional => ScopeKinds::CONDITIONAL,
            Self::Variable => ScopeKinds::VARIABLE,
            Self::ClassVariable => ScopeKinds::CLASS_VARIABLE,
            Self::FunctionVariable => ScopeKinds::FUNCTION_VARIABLE,
            Self::GlobalVariable => ScopeKinds::GLOBAL_VARIABLE,
            Self::GlobalDefine => ScopeKinds::GLOBAL_DEFINE,
            Self::SingleLineComment => ScopeKinds::SINGLE_LINE_COMMENT,
            Self::MultiLineComment => ScopeKinds::MULTI_LINE_COMMENT,
            Self::StringLiteral => ScopeKinds::STRING_LITERAL,
            Self::Unknown => ScopeKinds::UNKNOWN,
        }
    }

    pub fn is_of(self, kinds: ScopeKinds) -> bool {
        self.kinds().intersects(kinds)
    }

    pub fn is_unresolved(self) -> bool {
        matches!(self, Self::Function | Self::Variable)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Namespace => "Namespace",
            Self::Class => "Class",
            Self::Enum => "Enum",
            Self::Function => "Function",
            Self::FreeFunction => "FreeFunction",
            Self::ClassFunction => "ClassFunction",
            Self::Conditional => "Conditional",
            Self::Variable => "Variable",
            Self::ClassVariable => "ClassVariable",
            Self::FunctionVariable => "FunctionVariable",
            Self::GlobalVariable => "GlobalVariable",
            Self::GlobalDefine => "GlobalDefine",
            Self::SingleLineComment => "SingleLineComment",
            Self::MultiLineComment => "MultiLineComment",
            Self::StringLiteral => "StringLiteral",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
