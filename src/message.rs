use std::{collections::BTreeMap, fmt};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    #[default]
    Warning,
    Error,
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub content: String,
    /// Lines and columns are 0-indexed and displayed 1-indexed.
    pub line: usize,
    pub column: Option<usize>,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.line + 1)?;
        if let Some(column) = self.column {
            write!(f, ", Character: {}", column + 1)?;
        }
        write!(f, ": {}", self.content)
    }
}

pub type RuleId = usize;

/// The messages produced for one unit, grouped by the id of the rule or flow
/// check that produced them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageStack {
    messages: BTreeMap<RuleId, Vec<Message>>,
}

impl MessageStack {
    pub fn push(&mut self, id: RuleId, message: Message) {
        self.messages.entry(id).or_default().push(message);
    }

    pub fn extend(&mut self, id: RuleId, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.push(id, message);
        }
    }

    pub fn get(&self, id: RuleId) -> &[Message] {
        self.messages.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &[Message])> {
        self.messages
            .iter()
            .map(|(&id, messages)| (id, messages.as_slice()))
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
