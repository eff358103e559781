use clap::Args;

use crate::cli::OutputFormat;
use crate::core::hit::{HitRecord, RawHit};
use crate::core::types::AnalysisType;
use crate::resolving::verotoxin::subtype;

#[derive(Args)]
pub struct SubtypeArgs {
    /// Hits as TARGET=IDENTITY, e.g. stx2A:90:AF500190:a=98.5
    #[arg(required = true, value_parser = parse_hit_arg)]
    pub hits: Vec<RawHit>,
}

/// Parse a `TARGET=IDENTITY` argument. The identity is split at the last `=`.
fn parse_hit_arg(arg: &str) -> Result<RawHit, String> {
    let (target, identity) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("Expected TARGET=IDENTITY, got '{arg}'"))?;
    if target.trim().is_empty() {
        return Err(format!("Missing target in '{arg}'"));
    }
    Ok(RawHit::new(target, identity))
}

/// Execute subtype subcommand
///
/// # Errors
///
/// Returns an error if the profile cannot be serialized.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SubtypeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let layout = AnalysisType::Verotoxin.underscore_layout();
    let hits: Vec<HitRecord> = args
        .hits
        .iter()
        .filter_map(|raw| match HitRecord::from_raw(raw, layout) {
            Ok(hit) => Some(hit),
            Err(e) => {
                tracing::warn!("Skipping malformed hit: {e}");
                None
            }
        })
        .collect();

    if verbose {
        eprintln!("Parsed {} of {} hits", hits.len(), args.hits.len());
    }

    let profile = subtype(hits);

    match format {
        OutputFormat::Text => {
            println!("Toxin profile: {}", profile.summary());
            if !profile.subtypes.is_empty() {
                println!();
                println!("{:<10} Identities", "Subtype");
                println!("{}", "-".repeat(30));
                for (token, call) in &profile.subtypes {
                    println!("{token:<10} {call}");
                }
            }
            if verbose {
                for (category, labels) in &profile.subtype_state {
                    for (label, identity) in labels {
                        eprintln!("  {category}/{label}: {identity}");
                    }
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "profile": profile.summary(),
                "subtypes": profile.subtypes,
                "subtype_state": profile.subtype_state,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("subtype\tidentities");
            for (token, call) in &profile.subtypes {
                let identities: Vec<String> =
                    call.identities().iter().map(ToString::to_string).collect();
                println!("{token}\t{}", identities.join(","));
            }
        }
    }

    Ok(())
}
