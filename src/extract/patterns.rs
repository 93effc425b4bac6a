use const_format::formatcp;
use once_cell::sync::Lazy;
use regex::Regex;

pub const RESERVED_KEYWORDS: &[&str] = &[
    "if", "else", "else if", "while", "do", "for", "switch", "new", "delete", "typedef", "try",
    "catch", "return", "public", "static", "sizeof",
];

const TYPE_MODIFIERS: &str = r"const|static|unsigned|signed|long|short|volatile|extern|mutable|constexpr|inline|struct|class|enum|union";
const STATEMENT_KEYWORDS: &str = r"return|delete|throw|goto|case|using|typedef|else";
const QUALIFIED_NAME: &str = r"(?:\w*::)*\w+";

pub static define_pattern: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\s*|\s*/\*.*\*/\s*)(?P<directive>#define)").unwrap());

pub static namespace_pattern: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*namespace\s+(?P<name>[\w:]*)\s*\{*\s*$").unwrap());

pub static enum_pattern: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:typedef\s+)?(?P<keyword>enum)(?:\s+(?:class|struct)\b)?\s*(?P<name>\w*)\s*:?[\w\s:]*\{?\s*$",
    )
    .unwrap()
});

pub static class_pattern: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:template\s*<.*>\s*)?(?P<keyword>class|struct|union)\b\s*(?P<name>\w*)\s*(?:final\s*)?:?[\w\s:,<>]*\{?\s*$",
    )
    .unwrap()
});

pub static function_pattern: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[\w:]*\s)*(?P<name>~?(?:\w|:~?)+)\s*\((?P<parameters>.*)\).*$").unwrap()
});

pub static variable_pattern: Lazy<fancy_regex::Regex> = Lazy::new(|| {
    fancy_regex::Regex::new(formatcp!(
        r"^\s*(?!(?:{STATEMENT_KEYWORDS})\b)(?P<type>(?:(?:{TYPE_MODIFIERS})\s+)*{QUALIFIED_NAME}(?:<[\w\s:,*<>]*>)?(?:\s*[*&]+\s*|\s+))(?P<name>\w+)(?:\[\w*\])*\s*(?:\(.*\)|\{{.*\}}|=[^=].*)?\s*;\s*$"
    ))
    .unwrap()
});

pub static conditional_pattern: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s};])(?P<keyword>if|else|for|switch|while|do)(?:[({\s]|$)").unwrap()
});

pub static loop_keyword_pattern: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\w])(?P<keyword>while|do)(?:[^\w]|$)").unwrap());

pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name)
}
