use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::hit::HitRecord;

/// Best percent identity per gene token, plus the hits it was drawn from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestCalls {
    /// Parsed hits in input order
    pub hits: Vec<HitRecord>,

    /// Gene token -> best observed percent identity
    pub best: BTreeMap<String, f64>,
}

/// Hits split by whether they are tied at their gene's best identity
#[derive(Debug, Default)]
pub struct Winners<'a> {
    /// Hits at their gene's best identity, in input order
    pub winners: Vec<&'a HitRecord>,

    /// Hits whose lookup name could not be found in the calls table
    pub unresolved: Vec<&'a HitRecord>,
}

/// Pick the best identity for every gene token in `hits`.
///
/// Gene tokens are compared as written, so `stx1Aa` and `stx1Ab` are
/// separate calls. A gene is present in the result iff a hit carries it.
#[must_use]
pub fn resolve(hits: Vec<HitRecord>) -> BestCalls {
    let mut best: BTreeMap<String, f64> = BTreeMap::new();

    for hit in &hits {
        best.entry(hit.gene().to_string())
            .and_modify(|identity| {
                if hit.identity > *identity {
                    *identity = hit.identity;
                }
            })
            .or_insert(hit.identity);
    }

    BestCalls { hits, best }
}

impl BestCalls {
    /// Build from an existing calls table, e.g. one restored from a report
    #[must_use]
    pub fn from_table(hits: Vec<HitRecord>, best: BTreeMap<String, f64>) -> Self {
        Self { hits, best }
    }

    /// Best identity for a gene or lookup name.
    ///
    /// Tries the key as given, then once more with the key cut at its first
    /// hyphen (`blaOXA-48` -> `blaOXA`).
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<f64> {
        if let Some(identity) = self.best.get(key) {
            return Some(*identity);
        }
        let (root, _) = key.split_once('-')?;
        self.best.get(root).copied()
    }

    /// Split hits into winners and unresolved hits.
    ///
    /// Each hit is looked up by [`HitRecord::lookup_name`]. A hit wins iff
    /// its identity equals the looked-up identity exactly. Ties are all
    /// winners.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn winners(&self) -> Winners<'_> {
        let mut out = Winners::default();
        for hit in &self.hits {
            match self.lookup(&hit.lookup_name()) {
                Some(best) if hit.identity == best => out.winners.push(hit),
                Some(_) => {}
                None => out.unresolved.push(hit),
            }
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hit::RawHit;
    use crate::core::types::UnderscoreLayout;

    fn hit(target: &str, identity: &str) -> HitRecord {
        HitRecord::from_raw(&RawHit::new(target, identity), UnderscoreLayout::AlleleAccession)
            .unwrap()
    }

    #[test]
    fn test_best_identity_per_family() {
        let calls = resolve(vec![
            hit("sul1_1_AY224185", "99.10"),
            hit("sul1_2_CP002151", "100.00"),
            hit("tet(A)_6_AF534183", "98.50"),
        ]);
        assert_eq!(calls.best.len(), 2);
        assert!((calls.best["sul1"] - 100.0).abs() < f64::EPSILON);
        assert!((calls.best["tet(A)"] - 98.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ties_are_all_winners() {
        let calls = resolve(vec![
            hit("sul1_1_AY224185", "100.00"),
            hit("sul1_2_CP002151", "100.00"),
            hit("sul1_3_EU780013", "99.00"),
        ]);
        let winners = calls.winners();
        assert_eq!(winners.winners.len(), 2);
        assert_eq!(winners.winners[0].parts.accession.as_deref(), Some("AY224185"));
        assert_eq!(winners.winners[1].parts.accession.as_deref(), Some("CP002151"));
        assert!(winners.unresolved.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let hits = vec![
            hit("ARR-2_1_HQ141279", "99.8"),
            hit("sul1_1_AY224185", "100.0"),
        ];
        let first = resolve(hits.clone());
        let second = resolve(hits);
        assert_eq!(first, second);
    }

    #[test]
    fn test_toxin_subunits_resolve_separately() {
        let calls = resolve(vec![
            hit("stx2A:90:ACC:a", "98.5"),
            hit("stx2B:12:ACC:a", "97.0"),
        ]);
        assert_eq!(calls.winners().winners.len(), 2);
        assert!(calls.best.contains_key("stx2A"));
        assert!(calls.best.contains_key("stx2B"));
    }

    #[test]
    fn test_lookup_hyphen_fallback() {
        let mut table = BTreeMap::new();
        table.insert("blaOXA".to_string(), 100.0);
        let hits = vec![
            hit("blaOXA-48_1_AY236073", "100.0"),
            hit("blaOXA-1_1_HQ170510", "99.0"),
            hit("catA1_1_V00622", "100.0"),
        ];
        let calls = BestCalls::from_table(hits, table);

        assert_eq!(calls.lookup("blaOXA-48"), Some(100.0));
        assert_eq!(calls.lookup("catA1"), None);

        let winners = calls.winners();
        assert_eq!(winners.winners.len(), 1);
        assert_eq!(winners.winners[0].family(), "blaOXA-48");
        assert_eq!(winners.unresolved.len(), 1);
        assert_eq!(winners.unresolved[0].family(), "catA1");
    }

    #[test]
    fn test_allele_qualified_lookup() {
        let calls = resolve(vec![
            hit("VanA_1_M97297", "100.0"),
            hit("VanA_2_FJ545640", "98.0"),
        ]);
        assert_eq!(calls.best.keys().collect::<Vec<_>>(), ["VanA"]);
        assert_eq!(calls.hits[0].lookup_name(), "VanA-1");
        assert_eq!(calls.lookup("VanA-1"), Some(100.0));

        let winners = calls.winners();
        assert_eq!(winners.winners.len(), 1);
        assert_eq!(winners.winners[0].target, "VanA_1_M97297");
        assert!(winners.unresolved.is_empty());
    }

    #[test]
    fn test_variant_letters_are_distinct_genes() {
        let calls = resolve(vec![
            hit("stx1Aa:1:M19437", "99.0"),
            hit("stx1Ab:1:AB083044", "100.0"),
        ]);
        assert_eq!(calls.best.len(), 2);
        assert!((calls.best["stx1Aa"] - 99.0).abs() < f64::EPSILON);

        let winners: Vec<&str> = calls.winners().winners.iter().map(|h| h.gene()).collect();
        assert_eq!(winners, ["stx1Aa", "stx1Ab"]);
    }

    #[test]
    fn test_empty() {
        let calls = resolve(Vec::new());
        assert!(calls.is_empty());
        assert!(calls.best.is_empty());
        assert!(calls.winners().winners.is_empty());
    }
}
