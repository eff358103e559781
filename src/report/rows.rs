use std::collections::HashSet;

use crate::core::hit::HitRecord;
use crate::core::sample::Sample;
use crate::core::types::{AnalysisType, NOT_DETERMINED};
use crate::resolving::engine::Lookups;

/// A report row: the strain cell plus the remaining cells in column order
pub trait ReportRow {
    /// Column names, starting with `Strain`
    const HEADER: &'static [&'static str];

    fn strain(&self) -> &str;

    /// Every cell after `Strain`
    fn cells(&self) -> Vec<String>;
}

/// One line of a report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEntry<R> {
    Row(R),
    /// A sample with nothing to report
    NameOnly(String),
}

impl<R: ReportRow> ReportEntry<R> {
    #[must_use]
    pub fn strain(&self) -> &str {
        match self {
            Self::Row(row) => row.strain(),
            Self::NameOnly(name) => name,
        }
    }
}

fn or_nd(value: Option<&String>) -> String {
    value.map_or_else(|| NOT_DETERMINED.to_string(), Clone::clone)
}

/// `gdcs.csv`: one row per sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdcsRow {
    pub strain: String,
    pub genus: String,
    pub total_core: String,
    pub mlst: String,
    pub rmlst: String,
    pub cgmlst: String,
}

impl ReportRow for GdcsRow {
    const HEADER: &'static [&'static str] = &[
        "Strain",
        "Genus",
        "TotalCore",
        "MLST_genes",
        "rMLST_genes",
        "cgMLST_genes",
    ];

    fn strain(&self) -> &str {
        &self.strain
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.genus.clone(),
            self.total_core.clone(),
            self.mlst.clone(),
            self.rmlst.clone(),
            self.cgmlst.clone(),
        ]
    }
}

/// `resfinder.csv`: one row per winning hit
#[derive(Debug, Clone, PartialEq)]
pub struct ResistanceRow {
    pub strain: String,
    pub resistance: String,
    pub gene: String,
    pub allele: String,
    pub accession: String,
    pub identity: f64,
    pub length: u64,
    pub fold_coverage: f64,
}

impl ReportRow for ResistanceRow {
    const HEADER: &'static [&'static str] = &[
        "Strain",
        "Resistance",
        "Gene",
        "Allele",
        "Accession",
        "PercentIdentity",
        "Length",
        "FoldCoverage",
    ];

    fn strain(&self) -> &str {
        &self.strain
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.resistance.clone(),
            self.gene.clone(),
            self.allele.clone(),
            self.accession.clone(),
            self.identity.to_string(),
            self.length.to_string(),
            self.fold_coverage.to_string(),
        ]
    }
}

/// `virulence.csv`: one row per winning hit
#[derive(Debug, Clone, PartialEq)]
pub struct VirulenceRow {
    pub strain: String,
    pub gene: String,
    /// Subtype when the identifier carries one, otherwise the allele
    pub subtype_or_allele: String,
    pub description: String,
    pub accession: String,
    pub identity: f64,
    pub fold_coverage: f64,
}

impl ReportRow for VirulenceRow {
    const HEADER: &'static [&'static str] = &[
        "Strain",
        "Gene",
        "Subtype/Allele",
        "Description",
        "Accession",
        "PercentIdentity",
        "FoldCoverage",
    ];

    fn strain(&self) -> &str {
        &self.strain
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.gene.clone(),
            self.subtype_or_allele.clone(),
            self.description.clone(),
            self.accession.clone(),
            self.identity.to_string(),
            self.fold_coverage.to_string(),
        ]
    }
}

/// `verotoxin_summary.csv`: one row per sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToxinRow {
    pub strain: String,
    pub profile: String,
}

impl ReportRow for ToxinRow {
    const HEADER: &'static [&'static str] = &["Strain", "ToxinProfile"];

    fn strain(&self) -> &str {
        &self.strain
    }

    fn cells(&self) -> Vec<String> {
        vec![self.profile.clone()]
    }
}

/// `prophages.csv`: one row per distinct prophage
#[derive(Debug, Clone, PartialEq)]
pub struct ProphageRow {
    pub strain: String,
    pub gene: String,
    pub host: String,
    pub identity: f64,
    /// Coverage as displayed, clamped to `100.0`
    pub covered: String,
    pub contig: String,
    pub location: String,
}

impl ReportRow for ProphageRow {
    const HEADER: &'static [&'static str] = &[
        "Strain",
        "Gene",
        "Host",
        "PercentIdentity",
        "PercentCovered",
        "Contig",
        "Location",
    ];

    fn strain(&self) -> &str {
        &self.strain
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.gene.clone(),
            self.host.clone(),
            self.identity.to_string(),
            self.covered.clone(),
            self.contig.clone(),
            self.location.clone(),
        ]
    }
}

/// `univec.csv`: one row per distinct UniVec target
#[derive(Debug, Clone, PartialEq)]
pub struct UnivecRow {
    pub strain: String,
    pub gene: String,
    pub description: String,
    pub identity: f64,
    /// Coverage as displayed, clamped to `100.0`
    pub covered: String,
    pub contig: String,
    pub location: String,
}

impl ReportRow for UnivecRow {
    const HEADER: &'static [&'static str] = &[
        "Strain",
        "Gene",
        "Description",
        "PercentIdentity",
        "PercentCovered",
        "Contig",
        "Location",
    ];

    fn strain(&self) -> &str {
        &self.strain
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.gene.clone(),
            self.description.clone(),
            self.identity.to_string(),
            self.covered.clone(),
            self.contig.clone(),
            self.location.clone(),
        ]
    }
}

/// `plasmids.csv`: one row per distinct plasmid target
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmidRow {
    pub strain: String,
    pub gene: String,
    pub identity: f64,
    pub length: u64,
    pub fold_coverage: f64,
}

impl ReportRow for PlasmidRow {
    const HEADER: &'static [&'static str] =
        &["Strain", "Gene", "PercentIdentity", "Length", "FoldCoverage"];

    fn strain(&self) -> &str {
        &self.strain
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.gene.clone(),
            self.identity.to_string(),
            self.length.to_string(),
            self.fold_coverage.to_string(),
        ]
    }
}

/// One entry per row built for a sample, or a name-only entry when a sample
/// has no rows
fn per_sample<R, F>(samples: &[Sample], mut build: F) -> Vec<ReportEntry<R>>
where
    F: FnMut(&Sample) -> Vec<R>,
{
    let mut entries = Vec::new();
    for sample in samples {
        let rows = build(sample);
        if rows.is_empty() {
            entries.push(ReportEntry::NameOnly(sample.name.clone()));
        } else {
            entries.extend(rows.into_iter().map(ReportEntry::Row));
        }
    }
    entries
}

/// Build one entry per winning hit, or a name-only entry when there are none
fn per_winner<R, F>(samples: &[Sample], analysis: AnalysisType, mut build: F) -> Vec<ReportEntry<R>>
where
    F: FnMut(&Sample, &HitRecord) -> R,
{
    per_sample(samples, |sample| {
        sample
            .gene_calls(analysis)
            .map(|calls| {
                calls
                    .winners()
                    .winners
                    .into_iter()
                    .map(|hit| build(sample, hit))
                    .collect()
            })
            .unwrap_or_default()
    })
}

/// First hit of every distinct target, in input order
fn first_hits(sample: &Sample, analysis: AnalysisType) -> Vec<&HitRecord> {
    let Some(calls) = sample.gene_calls(analysis) else {
        return Vec::new();
    };
    let mut seen: HashSet<&str> = HashSet::new();
    calls
        .hits
        .iter()
        .filter(|hit| seen.insert(hit.gene()))
        .collect()
}

#[must_use]
pub fn gdcs_rows(samples: &[Sample]) -> Vec<ReportEntry<GdcsRow>> {
    samples
        .iter()
        .map(|sample| match sample.core_tally() {
            Some(tally) => ReportEntry::Row(GdcsRow {
                strain: sample.name.clone(),
                genus: sample.genus().to_string(),
                total_core: tally.core.to_string(),
                mlst: tally.mlst.to_string(),
                rmlst: tally.rmlst.to_string(),
                cgmlst: tally.cgmlst.to_string(),
            }),
            None => ReportEntry::NameOnly(sample.name.clone()),
        })
        .collect()
}

#[must_use]
pub fn resistance_rows(samples: &[Sample], lookups: &Lookups) -> Vec<ReportEntry<ResistanceRow>> {
    per_winner(samples, AnalysisType::Resfinder, |sample, hit| ResistanceRow {
        strain: sample.name.clone(),
        resistance: lookups
            .resistance_class(hit.gene())
            .unwrap_or(NOT_DETERMINED)
            .to_string(),
        gene: hit.gene().to_string(),
        allele: or_nd(hit.parts.allele.as_ref()),
        accession: or_nd(hit.parts.accession.as_ref()),
        identity: hit.identity,
        length: hit.length(),
        fold_coverage: hit.depth,
    })
}

#[must_use]
pub fn virulence_rows(samples: &[Sample], lookups: &Lookups) -> Vec<ReportEntry<VirulenceRow>> {
    per_winner(samples, AnalysisType::Virulence, |sample, hit| VirulenceRow {
        strain: sample.name.clone(),
        gene: hit.gene().to_string(),
        subtype_or_allele: or_nd(hit.parts.subtype.as_ref().or(hit.parts.allele.as_ref())),
        description: lookups.descriptions.describe(hit.gene()).to_string(),
        accession: or_nd(hit.parts.accession.as_ref()),
        identity: hit.identity,
        fold_coverage: hit.depth,
    })
}

#[must_use]
pub fn toxin_rows(samples: &[Sample]) -> Vec<ReportEntry<ToxinRow>> {
    samples
        .iter()
        .map(|sample| {
            ReportEntry::Row(ToxinRow {
                strain: sample.name.clone(),
                profile: sample
                    .verotoxin()
                    .map_or_else(|| NOT_DETERMINED.to_string(), |p| p.summary()),
            })
        })
        .collect()
}

/// Prophage rows take the first hit of each prophage in input order, and
/// only prophages listed in the host table are reported.
#[must_use]
pub fn prophage_rows(samples: &[Sample], lookups: &Lookups) -> Vec<ReportEntry<ProphageRow>> {
    per_sample(samples, |sample| {
        first_hits(sample, AnalysisType::Prophages)
            .into_iter()
            .filter_map(|hit| {
                let host = lookups.prophage_hosts.host(hit.gene())?;
                Some(ProphageRow {
                    strain: sample.name.clone(),
                    gene: hit.gene().to_string(),
                    host: host.to_string(),
                    identity: hit.identity,
                    covered: hit.display_coverage(),
                    contig: hit.contig.clone(),
                    location: hit.location(),
                })
            })
            .collect()
    })
}

/// UniVec rows: the first hit of each target, targets in sorted order. The
/// gene cell is the last `|` field of the target id.
#[must_use]
pub fn univec_rows(samples: &[Sample], lookups: &Lookups) -> Vec<ReportEntry<UnivecRow>> {
    per_sample(samples, |sample| {
        let mut hits = first_hits(sample, AnalysisType::Univec);
        hits.sort_by(|a, b| a.gene().cmp(b.gene()));
        hits.into_iter()
            .map(|hit| UnivecRow {
                strain: sample.name.clone(),
                gene: hit.gene().rsplit('|').next().unwrap_or_default().to_string(),
                description: lookups.univec_targets.describe(hit.gene()).to_string(),
                identity: hit.identity,
                covered: hit.display_coverage(),
                contig: hit.contig.clone(),
                location: hit.location(),
            })
            .collect()
    })
}

#[must_use]
pub fn plasmid_rows(samples: &[Sample]) -> Vec<ReportEntry<PlasmidRow>> {
    per_sample(samples, |sample| {
        first_hits(sample, AnalysisType::Plasmids)
            .into_iter()
            .map(|hit| PlasmidRow {
                strain: sample.name.clone(),
                gene: hit.gene().to_string(),
                identity: hit.identity,
                length: hit.length(),
                fold_coverage: hit.depth,
            })
            .collect()
    })
}
