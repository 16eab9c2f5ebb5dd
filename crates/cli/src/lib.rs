use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use libdocs_bundle::{
    error_document, extract_test_methods, read_text, BugReport, BundleBuilder, BundleConfig,
    BundleError, BundleSummary, LayoutProbe, ProjectLayout,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod batch;
mod defects4j;
mod flags;

use defects4j::{Defects4jExporter, DEFAULT_EXPORT_TIMEOUT};
use flags::LayoutFlag;

const BUNDLE_FILE_NAME: &str = "javadoc_bundle.txt";
const BATCH_FILE_NAME: &str = "all_javadoc_bundles.json";

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "libdocs")]
#[command(about = "Javadoc bundles for LLM-driven bug reproduction", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the Javadoc bundle for one checkout
    Build(BuildArgs),

    /// Build bundles for every representative checkout under a repos directory
    Batch(BatchArgs),

    /// Cut the first test method out of raw generated test files
    #[command(name = "extract-tests")]
    ExtractTests(ExtractTestsArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Bug report JSON with `title` and `description`
    bug_json: Option<PathBuf>,

    /// Project checkout
    #[arg(long)]
    workdir: PathBuf,

    /// Output file (default: <workdir>/javadoc_bundle.txt)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    bundle: BundleArgs,
}

#[derive(Args)]
struct BatchArgs {
    /// Directory containing one checkout per bug
    #[arg(long, default_value = "repos")]
    repos: PathBuf,

    /// Only checkouts whose directory name ends with this suffix
    #[arg(long, default_value = "_1")]
    suffix: String,

    /// Output JSON file (default: <repos>/all_javadoc_bundles.json)
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    bundle: BundleArgs,
}

#[derive(Args)]
struct ExtractTestsArgs {
    /// Directory containing the raw generated `.txt` files
    #[arg(long)]
    source_dir: PathBuf,

    /// Directory receiving one cleaned file per input
    #[arg(long)]
    dest_dir: PathBuf,
}

#[derive(Args)]
struct BundleArgs {
    /// Character ceiling for the bundle
    #[arg(long)]
    max_doc_chars: Option<usize>,

    /// Javadoc blocks quoted per class
    #[arg(long)]
    max_blocks_per_class: Option<usize>,

    /// Classes a wildcard import contributes when none is mentioned in the bug
    #[arg(long)]
    wildcard_limit: Option<usize>,

    /// Local Maven repository searched for `-sources` archives
    #[arg(long)]
    m2_repo: Option<PathBuf>,

    /// Also unpack sources archives of classpath dependencies
    #[arg(long)]
    also_external: bool,

    /// Leave java.*, javax.*, sun.* and com.sun.* classes out
    #[arg(long)]
    skip_jdk: bool,

    /// How to find source directory and classpath
    #[arg(long, value_enum, default_value_t = LayoutFlag::Defects4j)]
    layout: LayoutFlag,

    /// Extra source directories (relative to the checkout) for --layout probe
    #[arg(long = "source-candidate")]
    source_candidates: Vec<PathBuf>,

    /// defects4j executable
    #[arg(long, default_value = "defects4j")]
    defects4j_bin: PathBuf,

    /// Timeout for each `defects4j export` call
    #[arg(long, default_value_t = DEFAULT_EXPORT_TIMEOUT.as_secs())]
    export_timeout_secs: u64,
}

impl BundleArgs {
    fn config(&self, base: BundleConfig) -> BundleConfig {
        let mut config = BundleConfig {
            max_doc_chars: self.max_doc_chars.unwrap_or(base.max_doc_chars),
            max_blocks_per_class: self
                .max_blocks_per_class
                .unwrap_or(base.max_blocks_per_class),
            wildcard_limit: self.wildcard_limit.unwrap_or(base.wildcard_limit),
            m2_repo: self.m2_repo.clone().unwrap_or(base.m2_repo),
            also_external: self.also_external || base.also_external,
            excluded_prefixes: base.excluded_prefixes,
        };
        if self.skip_jdk {
            config = config.skip_jdk();
        }
        config
    }

    async fn layout(&self, workdir: &Path) -> Result<ProjectLayout, BundleError> {
        match self.layout {
            LayoutFlag::Defects4j => {
                Defects4jExporter::new(
                    &self.defects4j_bin,
                    Duration::from_secs(self.export_timeout_secs),
                )
                .layout(workdir)
                .await
            }
            LayoutFlag::Probe => self
                .source_candidates
                .iter()
                .fold(LayoutProbe::default(), |probe, c| probe.with_candidate(c))
                .probe(workdir),
        }
    }
}

/// Bundle text plus the summary when the run succeeded
struct Rendered {
    text: String,
    summary: Option<BundleSummary>,
}

async fn render(
    builder: BundleBuilder,
    layout: Result<ProjectLayout, BundleError>,
    bug: Option<BugReport>,
) -> Result<Rendered> {
    let outcome = match layout {
        Ok(layout) => {
            tokio::task::spawn_blocking(move || builder.build(&layout, bug.as_ref()))
                .await
                .context("bundle task panicked")?
        }
        Err(e) => Err(e),
    };

    Ok(match outcome {
        Ok(bundle) => Rendered {
            text: bundle.text,
            summary: Some(bundle.summary),
        },
        Err(e) => {
            log::error!("Bundle failed: {e}");
            Rendered {
                text: error_document(&e),
                summary: None,
            }
        }
    })
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Build(args) => run_build(args).await?,
        Commands::Batch(args) => run_batch(args).await?,
        Commands::ExtractTests(args) => run_extract_tests(args)?,
    }

    Ok(())
}

async fn run_build(args: BuildArgs) -> Result<()> {
    let config = args.bundle.config(BundleConfig::default());
    config.validate()?;

    let bug = match &args.bug_json {
        Some(path) if path.exists() => Some(
            BugReport::load(path)
                .with_context(|| format!("Failed to read bug report {}", path.display()))?,
        ),
        Some(path) => {
            log::warn!("Bug report {} not found, ranking without it", path.display());
            None
        }
        None => None,
    };

    log::info!(
        "Building bundle for {} (layout: {})",
        args.workdir.display(),
        args.bundle.layout.as_str()
    );
    let layout = args.bundle.layout(&args.workdir).await;
    let rendered = render(BundleBuilder::new(config), layout, bug).await?;

    let output = args
        .output
        .unwrap_or_else(|| args.workdir.join(BUNDLE_FILE_NAME));
    fs::write(&output, &rendered.text)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!(
        "Wrote {} ({} chars)",
        output.display(),
        rendered.text.chars().count()
    );

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&BuildReport {
            output: output.display().to_string(),
            ok: rendered.summary.is_some(),
            summary: rendered.summary,
        })?)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct BuildReport {
    output: String,
    ok: bool,
    summary: Option<BundleSummary>,
}

async fn run_batch(args: BatchArgs) -> Result<()> {
    let config = args.bundle.config(BundleConfig::for_batch());
    config.validate()?;

    let targets = batch::representative_checkouts(&args.repos, &args.suffix)?;
    log::info!("Target checkouts: {}", targets.len());
    if targets.is_empty() {
        log::warn!(
            "No checkouts ending in '{}' under {}",
            args.suffix,
            args.repos.display()
        );
        return Ok(());
    }

    let mut bundles = BTreeMap::new();
    for workdir in targets {
        let layout = args.bundle.layout(&workdir).await;
        let name = libdocs_bundle::project_name(&workdir);
        log::info!("Processing {name}");

        let rendered = render(BundleBuilder::new(config.clone()), layout, None).await?;
        log::info!("Finished {name}, size: {} chars", rendered.text.chars().count());
        bundles.insert(name, rendered.text);
    }

    let output = args
        .output
        .unwrap_or_else(|| args.repos.join(BATCH_FILE_NAME));
    batch::write_bundles(&output, &bundles)?;
    log::info!("Saved {} bundles to {}", bundles.len(), output.display());
    Ok(())
}

#[derive(Debug, Default, Serialize)]
struct ExtractReport {
    extracted: usize,
    skipped: usize,
    failed: usize,
}

fn run_extract_tests(args: ExtractTestsArgs) -> Result<()> {
    if !args.source_dir.is_dir() {
        anyhow::bail!("Source directory {} not found", args.source_dir.display());
    }
    fs::create_dir_all(&args.dest_dir)
        .with_context(|| format!("Failed to create {}", args.dest_dir.display()))?;

    let mut inputs: Vec<PathBuf> = fs::read_dir(&args.source_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    inputs.sort();
    log::info!("Processing {} files", inputs.len());

    let mut report = ExtractReport::default();
    for input in inputs {
        let Some(name) = input.file_name() else {
            continue;
        };
        let Some(content) = read_text(&input) else {
            report.failed += 1;
            continue;
        };

        match extract_test_methods(&content).into_iter().next() {
            Some(method) => {
                let target = args.dest_dir.join(name);
                if let Err(e) = fs::write(&target, method) {
                    log::warn!("Failed to write {}: {e}", target.display());
                    report.failed += 1;
                } else {
                    report.extracted += 1;
                }
            }
            None => {
                log::warn!("No test method found in {}", input.display());
                report.skipped += 1;
            }
        }
    }

    print_stdout(&serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
