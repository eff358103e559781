use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use crate::catalog::descriptions::GeneDescriptions;
use crate::catalog::prophages::ProphageHosts;
use crate::catalog::targets::TargetDescriptions;
use crate::cli::catalog::load_catalogue;
use crate::cli::OutputFormat;
use crate::core::events::TracingSink;
use crate::core::sample::Sample;
use crate::core::types::{AnalysisType, NOT_DETERMINED};
use crate::parsing::hits::parse_hit_file;
use crate::parsing::report::restore_prior_reports;
use crate::parsing::samples::{assemble_samples, load_sample_metadata};
use crate::report::rows::{prophage_rows, ReportEntry};
use crate::report::writer::write_reports;
use crate::resolving::engine::{Lookups, ResolverConfig, TypingEngine};

#[derive(Args)]
pub struct ResolveArgs {
    /// Hit table (TSV, or CSV by extension; gzip when ending in .gz)
    #[arg(required = true)]
    pub hits: PathBuf,

    /// Sample metadata JSON: genus assignments and scheme results
    #[arg(long)]
    pub samples: Option<PathBuf>,

    /// Path to custom expected-gene catalogue
    #[arg(long)]
    pub catalogue: Option<PathBuf>,

    /// Virulence gene descriptions (notes.txt format)
    #[arg(long)]
    pub descriptions: Option<PathBuf>,

    /// Resistance classes per gene (notes.txt format)
    #[arg(long)]
    pub resistance_classes: Option<PathBuf>,

    /// Prophage overview table with id_prophage and host columns
    #[arg(long)]
    pub prophage_hosts: Option<PathBuf>,

    /// UniVec target FASTA; header lines give report descriptions
    #[arg(long)]
    pub univec_targets: Option<PathBuf>,

    /// Directory reports are written to
    #[arg(short, long, default_value = "reports")]
    pub report_dir: PathBuf,

    /// Reuse results from reports already in the report directory
    #[arg(long)]
    pub resume: bool,

    /// Worker threads (defaults to all cores)
    #[arg(short = 't', long, value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// JSON config file; command-line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Per-sample line of the run summary
#[derive(Debug, Serialize)]
struct SampleSummary<'a> {
    sample: &'a str,
    genus: &'a str,
    core: String,
    resistance: &'a [String],
    virulence_genes: usize,
    /// Prophages written to the prophage report
    prophages: usize,
    toxin_profile: String,
}

impl<'a> SampleSummary<'a> {
    fn new(sample: &'a Sample, lookups: &Lookups) -> Self {
        let winners = |analysis| {
            sample
                .gene_calls(analysis)
                .map_or(0, |calls| calls.winners().winners.len())
        };
        Self {
            sample: &sample.name,
            genus: sample.genus(),
            core: sample
                .core_tally()
                .map_or_else(|| NOT_DETERMINED.to_string(), |t| t.core.to_string()),
            resistance: &sample.resistance_summary,
            virulence_genes: winners(AnalysisType::Virulence),
            prophages: prophage_rows(std::slice::from_ref(sample), lookups)
                .iter()
                .filter(|entry| matches!(entry, ReportEntry::Row(_)))
                .count(),
            toxin_profile: sample
                .verotoxin()
                .map_or_else(|| NOT_DETERMINED.to_string(), |p| p.summary()),
        }
    }
}

fn load_optional<T>(
    path: Option<&Path>,
    what: &str,
    load: impl FnOnce(&Path) -> anyhow::Result<T>,
) -> anyhow::Result<T>
where
    T: Default,
{
    match path {
        Some(path) => load(path).with_context(|| format!("Failed to load {what} from {}", path.display())),
        None => Ok(T::default()),
    }
}

fn load_lookups(args: &ResolveArgs) -> anyhow::Result<Lookups> {
    Ok(Lookups {
        descriptions: load_optional(args.descriptions.as_deref(), "descriptions", |p| {
            Ok(GeneDescriptions::load(p)?)
        })?,
        resistance_classes: load_optional(
            args.resistance_classes.as_deref(),
            "resistance classes",
            |p| Ok(GeneDescriptions::load(p)?),
        )?,
        prophage_hosts: load_optional(args.prophage_hosts.as_deref(), "prophage hosts", |p| {
            Ok(ProphageHosts::load(p)?)
        })?,
        univec_targets: load_optional(args.univec_targets.as_deref(), "UniVec targets", |p| {
            Ok(TargetDescriptions::load(p)?)
        })?,
    })
}

fn resolver_config(args: &ResolveArgs) -> anyhow::Result<ResolverConfig> {
    let mut config = match &args.config {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    if let Some(threads) = args.threads {
        config.threads = Some(usize::from(threads));
    }
    config.resume |= args.resume;
    Ok(config)
}

/// Execute resolve subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be read or a report cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ResolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = resolver_config(&args)?;
    let catalogue = load_catalogue(args.catalogue.clone())?;
    let lookups = load_lookups(&args)?;

    let table = parse_hit_file(&args.hits)
        .with_context(|| format!("Failed to read hit table {}", args.hits.display()))?;
    for row in &table.rejected {
        tracing::warn!(
            line = row.line,
            sample = row.sample.as_deref().unwrap_or(""),
            "Skipping hit table row: {}",
            row.reason
        );
    }
    if verbose {
        eprintln!(
            "Read {} hits ({} rows skipped) from {}",
            table.hits.len(),
            table.rejected.len(),
            args.hits.display()
        );
    }

    let metadata = match &args.samples {
        Some(path) => load_sample_metadata(path)
            .with_context(|| format!("Failed to read sample metadata {}", path.display()))?,
        None => Vec::new(),
    };
    let mut samples = assemble_samples(metadata, table);

    if config.resume {
        let restored = restore_prior_reports(&args.report_dir, &mut samples, &TracingSink);
        tracing::info!("Restored {restored} results from prior reports");
    }

    let engine = TypingEngine::with_config(&catalogue, &lookups, config);
    let samples = engine.resolve_all(samples)?;
    let written = write_reports(&args.report_dir, &samples, &lookups)
        .with_context(|| format!("Failed to write reports to {}", args.report_dir.display()))?;

    let summaries: Vec<SampleSummary<'_>> = samples
        .iter()
        .map(|sample| SampleSummary::new(sample, &lookups))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("Resolved {} samples\n", summaries.len());
            println!(
                "{:<20} {:<16} {:>10} {:>6} {:>6} {:>6}  Toxins",
                "Sample", "Genus", "Core", "AMR", "Vir", "Phage"
            );
            println!("{}", "-".repeat(80));
            for s in &summaries {
                println!(
                    "{:<20} {:<16} {:>10} {:>6} {:>6} {:>6}  {}",
                    s.sample,
                    s.genus,
                    s.core,
                    s.resistance.len(),
                    s.virulence_genes,
                    s.prophages,
                    s.toxin_profile
                );
            }
            println!();
            for path in &written {
                println!("Wrote {}", path.display());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Tsv => {
            println!("sample\tgenus\tcore\tresistance\tvirulence_genes\tprophages\ttoxin_profile");
            for s in &summaries {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    s.sample,
                    s.genus,
                    s.core,
                    s.resistance.join(";"),
                    s.virulence_genes,
                    s.prophages,
                    s.toxin_profile
                );
            }
        }
    }

    Ok(())
}
