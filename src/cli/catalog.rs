use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::ExpectedCatalogue;
use crate::cli::OutputFormat;
use crate::core::types::AnalysisType;
use crate::resolving::tally::TALLIED_SCHEMES;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all genera in the catalogue with their scheme sizes
    List {
        /// Path to custom catalogue file
        #[arg(long)]
        catalogue: Option<PathBuf>,

        /// Filter by genus (case-insensitive substring)
        #[arg(long)]
        genus: Option<String>,
    },

    /// Show the expected genes of one genus
    Show {
        /// Genus name
        #[arg(required = true)]
        genus: String,

        /// Path to custom catalogue file
        #[arg(long)]
        catalogue: Option<PathBuf>,

        /// Only show one scheme (mlst, rmlst, cgmlst)
        #[arg(long)]
        scheme: Option<AnalysisType>,
    },

    /// Export the catalogue to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalogue file to export (defaults to embedded)
        #[arg(long)]
        catalogue: Option<PathBuf>,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalogue cannot be loaded, the genus is unknown,
/// or the export cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { catalogue, genus } => {
            run_list(catalogue, genus.as_deref(), format, verbose)
        }
        CatalogCommands::Show {
            genus,
            catalogue,
            scheme,
        } => run_show(&genus, catalogue, scheme, format),
        CatalogCommands::Export { output, catalogue } => run_export(output, catalogue),
    }
}

/// Load a custom catalogue, or the embedded one
pub(crate) fn load_catalogue(path: Option<PathBuf>) -> anyhow::Result<ExpectedCatalogue> {
    let catalogue = if let Some(path) = path {
        ExpectedCatalogue::load_from_file(&path)?
    } else {
        ExpectedCatalogue::load_embedded()?
    };
    Ok(catalogue)
}

fn scheme_size(catalogue: &ExpectedCatalogue, genus: &str, scheme: AnalysisType) -> usize {
    catalogue.expected(genus, scheme).map_or(0, |genes| genes.len())
}

fn run_list(
    catalogue_path: Option<PathBuf>,
    genus_filter: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalogue = load_catalogue(catalogue_path)?;

    if verbose {
        eprintln!("Loaded catalogue with {} genera", catalogue.len());
    }

    let filtered: Vec<&String> = catalogue
        .genera
        .keys()
        .filter(|genus| {
            genus_filter.map_or(true, |filter| {
                genus.to_lowercase().contains(&filter.to_lowercase())
            })
        })
        .collect();

    match format {
        OutputFormat::Text => {
            println!("Expected Gene Catalogue ({} genera)\n", filtered.len());
            println!("{:<20} {:>6} {:>6} {:>7}", "Genus", "MLST", "rMLST", "cgMLST");
            println!("{}", "-".repeat(42));
            for genus in &filtered {
                println!(
                    "{:<20} {:>6} {:>6} {:>7}",
                    genus,
                    scheme_size(&catalogue, genus, AnalysisType::Mlst),
                    scheme_size(&catalogue, genus, AnalysisType::Rmlst),
                    scheme_size(&catalogue, genus, AnalysisType::Cgmlst),
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = filtered
                .iter()
                .map(|genus| {
                    serde_json::json!({
                        "genus": genus,
                        "mlst": scheme_size(&catalogue, genus, AnalysisType::Mlst),
                        "rmlst": scheme_size(&catalogue, genus, AnalysisType::Rmlst),
                        "cgmlst": scheme_size(&catalogue, genus, AnalysisType::Cgmlst),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("genus\tmlst\trmlst\tcgmlst");
            for genus in &filtered {
                println!(
                    "{}\t{}\t{}\t{}",
                    genus,
                    scheme_size(&catalogue, genus, AnalysisType::Mlst),
                    scheme_size(&catalogue, genus, AnalysisType::Rmlst),
                    scheme_size(&catalogue, genus, AnalysisType::Cgmlst),
                );
            }
        }
    }

    Ok(())
}

fn run_show(
    genus: &str,
    catalogue_path: Option<PathBuf>,
    scheme_filter: Option<AnalysisType>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let catalogue = load_catalogue(catalogue_path)?;

    if let Some(scheme) = scheme_filter {
        if !scheme.is_scheme() {
            anyhow::bail!("'{scheme}' is not a typing scheme (expected mlst, rmlst or cgmlst)");
        }
    }

    let schemes = catalogue
        .genera
        .get(genus)
        .ok_or_else(|| anyhow::anyhow!("Genus '{}' not found in catalogue", genus))?;

    let shown: Vec<(AnalysisType, &Vec<String>)> = TALLIED_SCHEMES
        .iter()
        .filter(|scheme| scheme_filter.map_or(true, |filter| filter == **scheme))
        .filter_map(|scheme| schemes.get(scheme).map(|genes| (*scheme, genes)))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("Genus: {genus}\n");
            for (scheme, genes) in &shown {
                println!("{} ({} genes)", scheme, genes.len());
                println!("  {}", genes.join(" "));
            }
        }
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = shown
                .iter()
                .map(|(scheme, genes)| (scheme.to_string(), serde_json::json!(genes)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("scheme\tgene");
            for (scheme, genes) in &shown {
                for gene in *genes {
                    println!("{scheme}\t{gene}");
                }
            }
        }
    }

    Ok(())
}

fn run_export(output: PathBuf, catalogue_path: Option<PathBuf>) -> anyhow::Result<()> {
    let catalogue = load_catalogue(catalogue_path)?;

    let json = catalogue.to_json()?;
    std::fs::write(&output, json)?;

    println!(
        "Exported {} genera to {}",
        catalogue.len(),
        output.display()
    );

    Ok(())
}
