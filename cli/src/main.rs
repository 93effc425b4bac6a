use std::{fs, path::PathBuf, process, sync::Arc};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use sift::{extract, ConfigBuilder, Sift, SourceText, DEFAULT_OUTPUT_PATH};
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(version, about = "Lightweight structural analysis of C/C++ sources")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract scopes, apply the configured rules and write the report.
    Check(CheckArgs),
    /// Print the scope tree of a single unit.
    DumpTree(DumpTreeArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// File or directory to analyze.
    #[arg(default_value = ".", conflicts_with = "path_flag")]
    path: PathBuf,
    #[arg(short = 'p', long = "path", id = "path_flag", value_name = "PATH")]
    path_flag: Option<PathBuf>,
    /// Rule configuration file.
    #[arg(short, long)]
    rules: Option<PathBuf>,
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    #[arg(short, long)]
    quiet: bool,
    #[arg(short, long)]
    verbose: bool,
    /// Number of extraction workers.
    #[arg(short = 'j', long)]
    workers: Option<usize>,
}

#[derive(clap::Args)]
#[clap(group(
    ArgGroup::new("source")
        .multiple(false)
        .required(true)
        .args(&["source_text", "path"])
))]
struct DumpTreeArgs {
    source_text: Option<String>,
    #[arg(long)]
    path: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Commands::Check(args) => check(args),
        Commands::DumpTree(args) => dump_tree(args),
    };
    if let Err(err) = result {
        error!("{err:#}");
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn tracing_subscribe(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .event_format(LevelPrefix)
        .try_init();
}

/// Formats events as `LEVEL | message`.
struct LevelPrefix;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for LevelPrefix
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        context: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "{} | ", event.metadata().level())?;
        context.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn check(args: CheckArgs) -> Result<()> {
    let mut builder = ConfigBuilder::default();
    builder
        .quiet(args.quiet)
        .verbose(args.verbose)
        .output_path(args.output);
    if let Some(rules) = args.rules {
        builder.rules_path(rules);
    }
    if let Some(workers) = args.workers {
        builder.workers(workers);
    }
    let config = builder.build()?;
    tracing_subscribe(config.log_level());
    let mut sift = Sift::new(config);

    let path = args.path_flag.unwrap_or(args.path);
    sift.read_path(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    sift.setup_configured_rules()
        .context("loading rule configuration")?;

    let summary = sift.extract_scopes();
    sift.apply_rules();
    sift.verify_flow();
    sift.write_report()?;
    info!(
        "Wrote {} ({} of {} units extracted)",
        sift.config().output_path.display(),
        summary.attempted - summary.failed,
        summary.attempted
    );
    Ok(())
}

fn dump_tree(args: DumpTreeArgs) -> Result<()> {
    tracing_subscribe(Level::INFO);

    let source = match (args.source_text, args.path) {
        (Some(source_text), None) => SourceText::from_text("<source>", &source_text),
        (None, Some(path)) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            SourceText::from_text(path.display().to_string(), &text)
        }
        _ => unreachable!(),
    };
    let tree = extract(Arc::new(source))?;
    print!("{}", tree.dump());
    Ok(())
}
