use std::{num::NonZeroUsize, path::PathBuf, thread};

use derive_builder::Builder;
use tracing::Level;

pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";
pub const DEFAULT_EXTENSIONS: &str = "cpp|hpp|h|c|cc|hh";

#[derive(Builder, Clone, Debug, PartialEq, Eq)]
#[builder(default, setter(into, strip_option))]
pub struct Config {
    pub quiet: bool,
    pub verbose: bool,
    pub rules_path: Option<PathBuf>,
    pub output_path: PathBuf,
    /// Defaults to the available parallelism.
    pub workers: Option<usize>,
    /// `|`-separated, without dots.
    pub extensions: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet: false,
            verbose: false,
            rules_path: None,
            output_path: DEFAULT_OUTPUT_PATH.into(),
            workers: None,
            extensions: DEFAULT_EXTENSIONS.to_owned(),
        }
    }
}

impl Config {
    pub fn workers(&self) -> usize {
        self.workers
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, NonZeroUsize::get))
            .max(1)
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .split('|')
            .any(|accepted| accepted.trim().eq_ignore_ascii_case(extension))
    }

    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose {
            Level::TRACE
        } else {
            Level::INFO
        }
    }
}
