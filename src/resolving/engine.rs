use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::catalog::descriptions::GeneDescriptions;
use crate::catalog::prophages::ProphageHosts;
use crate::catalog::store::ExpectedCatalogue;
use crate::catalog::targets::TargetDescriptions;
use crate::core::events::{EventSink, ResolutionEvent, TracingSink};
use crate::core::hit::HitRecord;
use crate::core::sample::{AnalysisResult, Sample};
use crate::core::types::{AnalysisType, NOT_DETERMINED};
use crate::resolving::best_call::{resolve, BestCalls};
use crate::resolving::tally::{tally, TALLIED_SCHEMES};
use crate::resolving::verotoxin::subtype;

/// Analyses resolved into gene presence calls
pub const GENE_ANALYSES: [AnalysisType; 5] = [
    AnalysisType::Resfinder,
    AnalysisType::Virulence,
    AnalysisType::Prophages,
    AnalysisType::Univec,
    AnalysisType::Plasmids,
];

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Run configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Worker threads for per-sample resolution. `None` uses the global
    /// rayon pool.
    pub threads: Option<usize>,

    /// Reuse results restored from prior reports instead of recomputing
    pub resume: bool,
}

impl ResolverConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ConfigRead` or `EngineError::ConfigParse`.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Annotation tables shared by every sample
#[derive(Debug, Default, Clone)]
pub struct Lookups {
    /// Virulence gene descriptions
    pub descriptions: GeneDescriptions,
    /// Resistance class per ResFinder gene
    pub resistance_classes: GeneDescriptions,
    pub prophage_hosts: ProphageHosts,
    /// UniVec target descriptions
    pub univec_targets: TargetDescriptions,
}

impl Lookups {
    /// Resistance class of a gene, trying the gene token then its hyphen root
    #[must_use]
    pub fn resistance_class(&self, gene: &str) -> Option<&str> {
        self.resistance_classes.get(gene).or_else(|| {
            gene.split_once('-')
                .and_then(|(root, _)| self.resistance_classes.get(root))
        })
    }
}

/// Drives hit parsing and resolution for every analysis of every sample
pub struct TypingEngine<'a> {
    catalogue: &'a ExpectedCatalogue,
    lookups: &'a Lookups,
    config: ResolverConfig,
    sink: &'a dyn EventSink,
}

static TRACING_SINK: TracingSink = TracingSink;

impl<'a> TypingEngine<'a> {
    /// Create an engine with default configuration that logs through `tracing`
    pub fn new(catalogue: &'a ExpectedCatalogue, lookups: &'a Lookups) -> Self {
        Self {
            catalogue,
            lookups,
            config: ResolverConfig::default(),
            sink: &TRACING_SINK,
        }
    }

    /// Create an engine with custom configuration
    pub fn with_config(
        catalogue: &'a ExpectedCatalogue,
        lookups: &'a Lookups,
        config: ResolverConfig,
    ) -> Self {
        Self {
            config,
            ..Self::new(catalogue, lookups)
        }
    }

    /// Route events to `sink` instead of `tracing`
    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Parse a sample's raw hits for one analysis, skipping malformed records
    fn parse_hits(&self, sample: &Sample, analysis: AnalysisType) -> Vec<HitRecord> {
        let layout = analysis.underscore_layout();
        sample
            .raw_hits(analysis)
            .iter()
            .filter_map(|raw| {
                let parsed = if analysis.has_structured_targets() {
                    HitRecord::from_raw(raw, layout)
                } else {
                    HitRecord::from_raw_opaque(raw)
                };
                parsed
                    .map_err(|e| {
                        self.sink.emit(ResolutionEvent::MalformedRecord {
                            sample: sample.name.clone(),
                            analysis,
                            target: raw.target.clone(),
                            reason: e.to_string(),
                        });
                    })
                    .ok()
            })
            .collect()
    }

    fn resolved(&self, sample: &Sample, analysis: AnalysisType, hits: usize, calls: usize) {
        self.sink.emit(ResolutionEvent::SampleResolved {
            sample: sample.name.clone(),
            analysis,
            hits,
            calls,
        });
    }

    /// Whether a result restored from a prior report should be kept
    fn keep_restored(&self, sample: &Sample, analysis: AnalysisType) -> bool {
        self.config.resume && sample.results.contains_key(&analysis)
    }

    fn resolve_genes(&self, sample: &Sample, analysis: AnalysisType) -> BestCalls {
        let calls = resolve(self.parse_hits(sample, analysis));
        let winners = calls.winners();
        for hit in &winners.unresolved {
            self.sink.emit(ResolutionEvent::CatalogueMiss {
                sample: sample.name.clone(),
                analysis,
                gene: hit.gene().to_string(),
            });
        }
        self.resolved(sample, analysis, calls.hits.len(), winners.winners.len());
        calls
    }

    /// `{gene} ({identity}%) {class}` for every ResFinder winner
    fn resistance_summary(&self, sample: &Sample, calls: &BestCalls) -> Vec<String> {
        calls
            .winners()
            .winners
            .iter()
            .map(|hit| {
                let class = self.lookups.resistance_class(hit.gene()).unwrap_or_else(|| {
                    self.sink.emit(ResolutionEvent::CatalogueMiss {
                        sample: sample.name.clone(),
                        analysis: AnalysisType::Resfinder,
                        gene: hit.gene().to_string(),
                    });
                    NOT_DETERMINED
                });
                format!("{} ({}%) {class}", hit.gene(), hit.identity)
            })
            .collect()
    }

    /// Resolve every analysis of one sample
    pub fn resolve_sample(&self, mut sample: Sample) -> Sample {
        for analysis in GENE_ANALYSES {
            if self.keep_restored(&sample, analysis) {
                continue;
            }
            let calls = self.resolve_genes(&sample, analysis);
            sample.results.insert(analysis, AnalysisResult::Genes(calls));
        }

        let summary = sample
            .gene_calls(AnalysisType::Resfinder)
            .map(|calls| self.resistance_summary(&sample, calls))
            .unwrap_or_default();
        sample.resistance_summary = summary;

        if !self.keep_restored(&sample, AnalysisType::Verotoxin) {
            let hits = self.parse_hits(&sample, AnalysisType::Verotoxin);
            let count = hits.len();
            let profile = subtype(hits);
            self.resolved(&sample, AnalysisType::Verotoxin, count, profile.subtypes.len());
            sample
                .results
                .insert(AnalysisType::Verotoxin, AnalysisResult::Verotoxin(profile));
        }

        if !self.keep_restored(&sample, AnalysisType::Gdcs) {
            let genus = sample.genus().to_string();
            for scheme in TALLIED_SCHEMES {
                if sample.schemes.contains_key(&scheme)
                    && self.catalogue.expected(&genus, scheme).is_none()
                {
                    self.sink.emit(ResolutionEvent::CatalogueMiss {
                        sample: sample.name.clone(),
                        analysis: scheme,
                        gene: genus.clone(),
                    });
                }
            }
            let core = tally(
                |scheme| self.catalogue.expected(&genus, scheme),
                |scheme| sample.schemes.get(&scheme),
            );
            self.resolved(&sample, AnalysisType::Gdcs, sample.schemes.len(), 1);
            sample
                .results
                .insert(AnalysisType::Gdcs, AnalysisResult::Gdcs(core));
        }

        sample
    }

    /// Resolve all samples in parallel, preserving input order
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ThreadPool` if a dedicated pool was configured
    /// and could not be built.
    pub fn resolve_all(&self, samples: Vec<Sample>) -> Result<Vec<Sample>, EngineError> {
        let run = || {
            samples
                .into_par_iter()
                .map(|sample| self.resolve_sample(sample))
                .collect::<Vec<_>>()
        };

        match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                Ok(pool.install(run))
            }
            None => Ok(run()),
        }
    }
}
