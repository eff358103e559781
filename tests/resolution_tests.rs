//! Library-level resolution tests: hit table in, reports out.

use std::collections::HashSet;

use typing_resolver::catalog::descriptions::GeneDescriptions;
use typing_resolver::core::events::CollectingSink;
use typing_resolver::core::sample::{Mismatch, SchemeResult};
use typing_resolver::parsing::hits::parse_hit_table;
use typing_resolver::parsing::samples::assemble_samples;
use typing_resolver::report::rows::{resistance_rows, toxin_rows};
use typing_resolver::report::write_report;
use typing_resolver::resolving::best_call::resolve;
use typing_resolver::resolving::tally::{tally_scheme, Ratio};
use typing_resolver::{
    AnalysisType, ExpectedCatalogue, HitRecord, Lookups, MismatchCall, RawHit, ResolutionEvent,
    Sample, TypingEngine, UnderscoreLayout,
};

fn hit(target: &str, identity: &str) -> HitRecord {
    HitRecord::from_raw(&RawHit::new(target, identity), UnderscoreLayout::AlleleAccession).unwrap()
}

fn winner_targets(hits: Vec<HitRecord>) -> Vec<String> {
    let calls = resolve(hits);
    calls
        .winners()
        .winners
        .iter()
        .map(|h| h.target.clone())
        .collect()
}

#[test]
fn test_best_identity_wins_per_family() {
    let winners = winner_targets(vec![
        hit("sul1_1_AY224185", "100.00"),
        hit("sul1_3_EU780013", "99.10"),
        hit("tet(A)_4_AJ517790", "97.5"),
    ]);
    assert_eq!(winners, ["sul1_1_AY224185", "tet(A)_4_AJ517790"]);
}

#[test]
fn test_all_exact_ties_reported() {
    let winners = winner_targets(vec![
        hit("sul1_1_AY224185", "100.00"),
        hit("sul1_2_CP002151", "100.0"),
        hit("sul1_3_EU780013", "99.99"),
    ]);
    assert_eq!(winners, ["sul1_1_AY224185", "sul1_2_CP002151"]);
}

#[test]
fn test_resolution_is_idempotent() {
    let hits = vec![
        hit("blaTEM-1B_1_AY458016", "100.0"),
        hit("blaTEM-1B_2_JF910132", "99.5"),
        hit("aadA1_3_JQ414041", "98.0"),
    ];
    let first = resolve(hits.clone());
    let second = resolve(hits);
    assert_eq!(first, second);

    let targets = |calls: &typing_resolver::resolving::best_call::BestCalls| -> Vec<String> {
        calls.winners().winners.iter().map(|h| h.target.clone()).collect()
    };
    assert_eq!(targets(&first), targets(&second));
    assert_eq!(targets(&first), ["blaTEM-1B_1_AY458016", "aadA1_3_JQ414041"]);
}

#[test]
fn test_ratio_display_round_trip() {
    for ratio in [Ratio::new(0, 0), Ratio::new(51, 52), Ratio::new(1200, 1300)] {
        assert_eq!(ratio.to_string().parse::<Ratio>().unwrap(), ratio);
    }
    assert!("51 / 52".parse::<Ratio>().is_err());
    assert!("51/".parse::<Ratio>().is_err());
}

#[test]
fn test_rmlst_tally_with_penalties() {
    let genes: Vec<String> = (1..=53).map(|i| format!("BACT{i:06}")).collect();
    let expected: HashSet<String> = genes.iter().cloned().collect();
    let result = SchemeResult {
        genes,
        mismatches: vec![
            Mismatch {
                gene: "BACT000001".to_string(),
                call: MismatchCall::parse("NA (N)"),
            },
            Mismatch {
                gene: "BACT000002".to_string(),
                call: MismatchCall::parse("NA (X)"),
            },
            Mismatch {
                gene: "BACT000002".to_string(),
                call: MismatchCall::parse("NA (N)"),
            },
        ],
    };
    assert_eq!(tally_scheme(Some(&expected), &result), Ratio::new(51, 52));
}

#[test]
fn test_malformed_identifier_skipped() {
    let catalogue = ExpectedCatalogue::new();
    let lookups = Lookups::default();
    let sink = CollectingSink::new();
    let engine = TypingEngine::new(&catalogue, &lookups).with_sink(&sink);

    let mut sample = Sample::new("2014-SEQ-0276");
    sample.add_hit(AnalysisType::Virulence, RawHit::new("garbage::::::", "99.0"));
    sample.add_hit(AnalysisType::Virulence, RawHit::new("aggR:2:Z18751", "97.0"));
    let sample = engine.resolve_sample(sample);

    let calls = sample.gene_calls(AnalysisType::Virulence).unwrap();
    assert_eq!(calls.hits.len(), 1);
    assert_eq!(calls.hits[0].gene(), "aggR");
    assert!(sink.events().iter().any(|e| matches!(
        e,
        ResolutionEvent::MalformedRecord { target, .. } if target == "garbage::::::"
    )));
}

#[test]
fn test_verotoxin_profiles() {
    let catalogue = ExpectedCatalogue::new();
    let lookups = Lookups::default();
    let sink = CollectingSink::new();
    let engine = TypingEngine::new(&catalogue, &lookups).with_sink(&sink);

    let mut paired = Sample::new("paired");
    paired.add_hit(AnalysisType::Verotoxin, RawHit::new("stx2A:90:AF500190:a", "98.5"));
    paired.add_hit(AnalysisType::Verotoxin, RawHit::new("stx2B:12:AB030484:a", "97.0"));

    let mut gap = Sample::new("gap");
    gap.add_hit(AnalysisType::Verotoxin, RawHit::new("stx2A:7:AF043627:b", "95.0"));

    let mut unpaired = Sample::new("unpaired");
    unpaired.add_hit(AnalysisType::Verotoxin, RawHit::new("stx1A:1:M19437:a", "99.0"));

    let samples: Vec<Sample> = [paired, gap, unpaired]
        .into_iter()
        .map(|s| engine.resolve_sample(s))
        .collect();

    let profiles: Vec<String> = samples
        .iter()
        .map(|s| s.verotoxin().unwrap().summary())
        .collect();
    assert_eq!(profiles, ["vtx2a", "vtx2b", "ND"]);

    let mut out = Vec::new();
    write_report(&mut out, &toxin_rows(&samples)).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Strain,ToxinProfile\npaired,vtx2a\ngap,vtx2b\nunpaired,ND\n"
    );
}

#[test]
fn test_hit_table_to_resistance_report() {
    let table = "sample\tanalysis\ttarget\tidentity\tcoverage\tdepth\tcontig\tstart\tend\n\
s1\tresfinder\tblaOXA-48_1_AY236073\t100.0\t100.0\t12.5\tcontig_1\t1\t798\n\
s1\tresfinder\tblaOXA-48_2_JN626286\t99.0\t100.0\t11.0\tcontig_1\t1\t798\n\
s2\tserosippr\tO157_1_AB602250\t100.0\t100.0\t10.0\tcontig_1\t1\t50\n";

    let table = parse_hit_table(table.as_bytes(), b'\t').unwrap();
    assert_eq!(table.hits.len(), 2);
    assert_eq!(table.rejected.len(), 1);

    let catalogue = ExpectedCatalogue::new();
    let lookups = Lookups {
        resistance_classes: GeneDescriptions::parse("blaOXA:Beta-lactam resistance:\n"),
        ..Lookups::default()
    };
    let sink = CollectingSink::new();
    let engine = TypingEngine::new(&catalogue, &lookups).with_sink(&sink);
    let samples = engine
        .resolve_all(assemble_samples(Vec::new(), table))
        .unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(
        samples[0].resistance_summary,
        ["blaOXA-48 (100%) Beta-lactam resistance"]
    );

    let mut out = Vec::new();
    write_report(&mut out, &resistance_rows(&samples, &lookups)).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Strain,Resistance,Gene,Allele,Accession,PercentIdentity,Length,FoldCoverage\n\
s1,Beta-lactam resistance,blaOXA-48,1,AY236073,100,798,12.5\n"
    );
}
