use std::{collections::BTreeMap, fmt::Write as _, fs, path::Path, time::Duration};

use itertools::Itertools;
use tracing::info;

use crate::{
    flow::FLOW_CHECKS,
    message::{MessageStack, RuleId},
    rule::{description, RuleSet},
    Error, Result,
};

/// The messages of a run, rendered as text.
pub struct Report<'a> {
    pub rules: &'a RuleSet,
    pub syntax: &'a BTreeMap<String, MessageStack>,
    pub syntax_duration: Duration,
    pub flow: &'a BTreeMap<String, MessageStack>,
    pub flow_duration: Duration,
}

impl Report<'_> {
    pub fn render(&self) -> String {
        let mut output = String::new();
        write_section(&mut output, self.syntax, |id| {
            self.rules.get(id).map_or_else(
                || (format!("Rule {id}"), String::new()),
                |rule| (rule.name.clone(), description(rule)),
            )
        });
        let _ = writeln!(output, "Syntax Ran in {}ms", self.syntax_duration.as_millis());
        write_section(&mut output, self.flow, |id| {
            FLOW_CHECKS
                .iter()
                .find(|(check, _, _)| *check == id)
                .map_or_else(
                    || (format!("Check {id}"), String::new()),
                    |(_, name, description)| ((*name).to_owned(), (*description).to_owned()),
                )
        });
        let _ = writeln!(output, "Flow Ran in {}ms", self.flow_duration.as_millis());
        output
    }

    pub fn write(&self, path: &Path, quiet: bool) -> Result<()> {
        let output = self.render();
        if !quiet {
            for line in output.lines() {
                info!("{line}");
            }
        }
        fs::write(path, output).map_err(|source| Error::UnwritableReport {
            path: path.to_owned(),
            source,
        })
    }
}

fn write_section(
    output: &mut String,
    stacks: &BTreeMap<String, MessageStack>,
    describe: impl Fn(RuleId) -> (String, String),
) {
    for (unit, stack) in stacks
        .iter()
        .filter(|(_, stack)| !stack.is_empty())
        .sorted_by(|(a, _), (b, _)| natord::compare(a, b))
    {
        let _ = writeln!(output, "+ {unit} ----------");
        for (id, messages) in stack.iter().filter(|(_, messages)| !messages.is_empty()) {
            let (name, description) = describe(id);
            let _ = writeln!(output, "  {name} -- {description}");
            for message in messages {
                let _ = writeln!(output, "    {message}");
            }
        }
    }
}
