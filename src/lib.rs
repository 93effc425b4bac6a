#![allow(non_upper_case_globals, clippy::into_iter_on_ref)]

use std::sync::Arc;

mod config;
mod error;
pub mod extract;
pub mod flow;
mod kind;
mod macros;
pub mod message;
mod report;
pub mod rule;
mod rules;
pub mod scope;
mod sift;
pub mod span;
mod text;
mod utils;

mod tests;

pub use config::{Config, ConfigBuilder, DEFAULT_EXTENSIONS, DEFAULT_OUTPUT_PATH};
pub use error::{Error, Result};
pub use extract::extract;
pub use kind::{ScopeKind, ScopeKinds};
pub use report::Report;
use rule::Rule;
use rules::{
    always_have_curly_brackets_rule, curly_brackets_close_same_line_rule,
    curly_brackets_close_separate_line_rule, curly_brackets_open_same_line_rule,
    curly_brackets_open_separate_line_rule, end_with_x_rule, max_characters_per_line_rule,
    name_max_character_rule, no_auto_rule, no_const_cast_rule, no_define_rule, no_goto_rule,
    no_macro_functions_rule, single_return_rule, start_with_lower_case_rule,
    start_with_upper_case_rule, start_with_x_rule, tab_indentation_rule, unknown_rule,
};
pub use scope::{Scope, ScopeId, ScopeTree};
pub use sift::{ExtractionSummary, Sift};
pub use text::SourceText;

pub fn instantiate() -> Vec<Arc<dyn Rule>> {
    vec![
        unknown_rule(),
        no_auto_rule(),
        no_define_rule(),
        no_macro_functions_rule(),
        start_with_x_rule(),
        end_with_x_rule(),
        max_characters_per_line_rule(),
        curly_brackets_open_same_line_rule(),
        curly_brackets_open_separate_line_rule(),
        curly_brackets_close_same_line_rule(),
        curly_brackets_close_separate_line_rule(),
        always_have_curly_brackets_rule(),
        no_const_cast_rule(),
        start_with_lower_case_rule(),
        start_with_upper_case_rule(),
        name_max_character_rule(),
        single_return_rule(),
        no_goto_rule(),
        tab_indentation_rule(),
    ]
}
