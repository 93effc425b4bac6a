use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rayon::ThreadPoolBuilder;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::{
    extract::{scan, ScannedUnit},
    flow,
    message::MessageStack,
    report::Report,
    rule::{self, RuleSet},
    scope::ScopeTree,
    Config, Error, Result, SourceText,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub attempted: usize,
    pub failed: usize,
}

impl ExtractionSummary {
    pub fn failed_percentage(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.failed as f64 * 100.0 / self.attempted as f64
    }
}

/// Runs the read, extract, check and report phases over a batch of units.
pub struct Sift {
    config: Config,
    units: Vec<Arc<SourceText>>,
    unreadable: usize,
    rules: RuleSet,
    trees: BTreeMap<String, ScopeTree>,
    syntax_messages: BTreeMap<String, MessageStack>,
    syntax_duration: Duration,
    flow_messages: BTreeMap<String, MessageStack>,
    flow_duration: Duration,
}

impl Sift {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            units: Default::default(),
            unreadable: Default::default(),
            rules: Default::default(),
            trees: Default::default(),
            syntax_messages: Default::default(),
            syntax_duration: Default::default(),
            flow_messages: Default::default(),
            flow_duration: Default::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads a single file, or every file with an accepted extension below a
    /// directory. Returns the number of units read.
    pub fn read_path(&mut self, path: &Path) -> Result<usize> {
        if path.is_file() {
            self.units.push(Arc::new(SourceText::read(path)?));
            return Ok(1);
        }
        if !path.is_dir() {
            return Err(Error::UnreadableUnit {
                path: path.to_owned(),
                source: std::io::ErrorKind::NotFound.into(),
            });
        }
        let mut read = 0;
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    error!(%err, "skipping unreadable directory entry");
                    self.unreadable += 1;
                    continue;
                }
            };
            let accepted = entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|extension| extension.to_str())
                    .map_or(false, |extension| self.config.accepts_extension(extension));
            if !accepted {
                continue;
            }
            match SourceText::read(entry.path()) {
                Ok(source) => {
                    self.units.push(Arc::new(source));
                    read += 1;
                }
                Err(err) => {
                    error!(%err, "skipping unit");
                    self.unreadable += 1;
                }
            }
        }
        info!("Read {read} files from {}", path.display());
        Ok(read)
    }

    pub fn read_source(&mut self, source: SourceText) {
        self.units.push(Arc::new(source));
    }

    /// Loads the rule file named by the configuration, if any.
    pub fn setup_configured_rules(&mut self) -> Result<()> {
        match self.config.rules_path.clone() {
            Some(path) => self.setup_rules_from_file(&path),
            None => Ok(()),
        }
    }

    pub fn setup_rules_from_file(&mut self, path: &Path) -> Result<()> {
        self.setup_rules(RuleSet::read(path)?);
        Ok(())
    }

    pub fn setup_rules(&mut self, rules: RuleSet) {
        rules.log_summary("Loaded");
        self.rules = rules;
    }

    /// Scans every unit on a fixed-size pool, then builds the trees.
    /// Failed units are logged and counted.
    pub fn extract_scopes(&mut self) -> ExtractionSummary {
        let started = Instant::now();
        let mut units = self.units.clone();
        units.shuffle(&mut rand::rng());

        let workers = self.config.workers();
        let chunk_size = units.len() / workers + 1;
        let scanned: Mutex<HashMap<String, ScannedUnit>> = Default::default();
        let failed = AtomicUsize::new(0);
        let scan_chunk = |chunk: &[Arc<SourceText>]| {
            for unit in chunk {
                match scan(unit.clone()) {
                    Ok(scanned_unit) => {
                        scanned.lock().insert(unit.name().to_owned(), scanned_unit);
                    }
                    Err(err) => {
                        error!(%err, "skipping unit");
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        };

        match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => {
                let scan_chunk = &scan_chunk;
                pool.scope(|scope| {
                    for chunk in units.chunks(chunk_size) {
                        scope.spawn(move |_| scan_chunk(chunk));
                    }
                });
            }
            Err(err) => {
                error!(%err, "could not build worker pool, scanning sequentially");
                scan_chunk(&units);
            }
        }

        self.trees = scanned
            .into_inner()
            .into_iter()
            .map(|(name, scanned_unit)| (name, scanned_unit.into_tree()))
            .collect();

        let summary = ExtractionSummary {
            attempted: units.len() + self.unreadable,
            failed: failed.into_inner() + self.unreadable,
        };
        info!(
            ">{}/{}< unparsed files ({:.2}%)",
            summary.failed,
            summary.attempted,
            summary.failed_percentage()
        );
        debug!(workers, elapsed = ?started.elapsed(), "extracted scopes");
        summary
    }

    pub fn apply_rules(&mut self) {
        let started = Instant::now();
        self.rules.deduplicate();
        self.rules.log_summary("Applying");
        let rules = &self.rules;
        self.syntax_messages = self
            .trees
            .iter()
            .map(|(name, tree)| {
                let mut messages = MessageStack::default();
                rule::apply_rules(rules, tree, &mut messages);
                (name.clone(), messages)
            })
            .collect();
        self.syntax_duration = started.elapsed();
    }

    pub fn verify_flow(&mut self) {
        let started = Instant::now();
        self.flow_messages = self
            .trees
            .iter()
            .map(|(name, tree)| {
                let mut messages = MessageStack::default();
                flow::verify_flow(tree, &mut messages);
                (name.clone(), messages)
            })
            .collect();
        self.flow_duration = started.elapsed();
    }

    pub fn report(&self) -> Report<'_> {
        Report {
            rules: &self.rules,
            syntax: &self.syntax_messages,
            syntax_duration: self.syntax_duration,
            flow: &self.flow_messages,
            flow_duration: self.flow_duration,
        }
    }

    pub fn write_report(&self) -> Result<()> {
        self.report()
            .write(&self.config.output_path, self.config.quiet)
    }

    /// Forgets units, rules, trees and messages; keeps the configuration.
    pub fn clear_state(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
    }

    pub fn units(&self) -> &[Arc<SourceText>] {
        &self.units
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn tree(&self, unit: &str) -> Option<&ScopeTree> {
        self.trees.get(unit)
    }

    pub fn trees(&self) -> impl Iterator<Item = (&str, &ScopeTree)> {
        self.trees.iter().map(|(name, tree)| (name.as_str(), tree))
    }

    pub fn syntax_messages(&self, unit: &str) -> Option<&MessageStack> {
        self.syntax_messages.get(unit)
    }

    pub fn flow_messages(&self, unit: &str) -> Option<&MessageStack> {
        self.flow_messages.get(unit)
    }
}
