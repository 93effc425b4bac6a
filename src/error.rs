use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{unit}:{}: unbalanced structure: {reason}", line + 1)]
    UnbalancedStructure {
        unit: String,
        line: usize,
        reason: String,
    },
    #[error("could not read source unit `{}`", path.display())]
    UnreadableUnit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed rule configuration `{origin}`: {reason}")]
    MalformedConfig { origin: String, reason: String },
    #[error("could not write report to `{}`", path.display())]
    UnwritableReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn unbalanced(unit: &str, line: usize, reason: impl Into<String>) -> Self {
        Self::UnbalancedStructure {
            unit: unit.to_owned(),
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
