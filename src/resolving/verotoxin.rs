//! Verotoxin (Shiga toxin) subtyping by A/B subunit pairing.
//!
//! Hits are binned by toxin category (`1A`, `1B`, `2A`, `2B`, or `2` for the
//! subunit-less vtx2 reference) and subtype label, keeping the best identity
//! per bin. Subtypes are then called from the A-subunit categories:
//!
//! - `1A`, `2A`: a label is called only when the matching B subunit carries the
//!   same label, giving a paired call `(A identity, B identity)`. The single
//!   exception is [`STX2B_CATALOGUE_GAP`].
//! - `2`: each label is called on its own unless the same subtype was already
//!   confirmed by an A/B pair.
//!
//! The profile renders as the sorted `vtx<group><label>` tokens joined by `;`,
//! or `ND` when nothing was called.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::hit::HitRecord;
use crate::core::types::NOT_DETERMINED;
use crate::parsing::identifier::{parse_toxin_token, TOXIN_MARKER};

/// Categories subtypes are called from, in calling order
pub const SUBTYPED_CATEGORIES: [&str; 3] = ["1A", "2A", "2"];

/// The stx2 B-subunit reference set has no sequence for subtype `b`, so a
/// `2A` hit labelled `b` is called without its B partner. Revisit when the
/// reference database gains a 2B/b entry.
pub const STX2B_CATALOGUE_GAP: (&str, &str) = ("2A", "b");

/// A called verotoxin subtype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtypeComposite {
    /// A subunit identity with its matching B subunit identity
    Paired { a: f64, b: f64 },
    /// A single identity with no B partner
    Singleton { a: f64 },
}

impl SubtypeComposite {
    #[must_use]
    pub fn identities(&self) -> Vec<f64> {
        match *self {
            Self::Paired { a, b } => vec![a, b],
            Self::Singleton { a } => vec![a],
        }
    }
}

impl std::fmt::Display for SubtypeComposite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paired { a, b } => write!(f, "({a:?}, {b:?})"),
            Self::Singleton { a } => write!(f, "({a:?},)"),
        }
    }
}

/// Verotoxin subtyping result for one sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerotoxinProfile {
    /// Parsed hits in input order
    pub hits: Vec<HitRecord>,

    /// Category -> subtype label -> best identity
    pub subtype_state: BTreeMap<String, BTreeMap<String, f64>>,

    /// Subtype token (e.g. `vtx2a`) -> call
    pub subtypes: BTreeMap<String, SubtypeComposite>,
}

impl VerotoxinProfile {
    /// Called subtype tokens, sorted ascending
    #[must_use]
    pub fn subtype_set(&self) -> Vec<&str> {
        self.subtypes.keys().map(String::as_str).collect()
    }

    /// `vtx1a;vtx2c`, or `ND` when no subtype was called
    #[must_use]
    pub fn summary(&self) -> String {
        if self.subtypes.is_empty() {
            NOT_DETERMINED.to_string()
        } else {
            self.subtype_set().join(";")
        }
    }
}

/// Toxin category of a hit, e.g. `2A`, or `None` for non-toxin genes
fn category(hit: &HitRecord) -> Option<String> {
    if !hit.gene().contains(TOXIN_MARKER) {
        return None;
    }
    let token = parse_toxin_token(hit.gene())?;
    Some(match token.subunit {
        Some(subunit) => format!("{}{subunit}", token.group),
        None => token.group,
    })
}

/// Bin hits by category and label, keeping the best identity per bin
fn subtype_state(hits: &[HitRecord]) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut state: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for hit in hits {
        let (Some(category), Some(label)) = (category(hit), hit.parts.subtype.as_ref()) else {
            continue;
        };
        state
            .entry(category)
            .or_default()
            .entry(label.clone())
            .and_modify(|identity| {
                if hit.identity > *identity {
                    *identity = hit.identity;
                }
            })
            .or_insert(hit.identity);
    }
    state
}

/// Call verotoxin subtypes from a sample's hits
#[must_use]
pub fn subtype(hits: Vec<HitRecord>) -> VerotoxinProfile {
    let state = subtype_state(&hits);
    let mut subtypes: BTreeMap<String, SubtypeComposite> = BTreeMap::new();

    for a_category in SUBTYPED_CATEGORIES {
        let Some(labels) = state.get(a_category) else {
            continue;
        };
        let group = a_category.strip_suffix('A').unwrap_or(a_category);
        let b_category = format!("{group}B");
        let has_subunit = a_category.ends_with('A');

        for (label, &a) in labels {
            let token = format!("vtx{group}{label}");

            if has_subunit {
                let partner = state.get(&b_category).and_then(|b| b.get(label));
                if let Some(&b) = partner {
                    subtypes.insert(token, SubtypeComposite::Paired { a, b });
                } else if (a_category, label.as_str()) == STX2B_CATALOGUE_GAP {
                    subtypes.insert(token, SubtypeComposite::Singleton { a });
                }
            } else {
                subtypes
                    .entry(token)
                    .or_insert(SubtypeComposite::Singleton { a });
            }
        }
    }

    VerotoxinProfile {
        hits,
        subtype_state: state,
        subtypes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hit::RawHit;
    use crate::core::types::UnderscoreLayout;

    fn hit(target: &str, identity: &str) -> HitRecord {
        HitRecord::from_raw(&RawHit::new(target, identity), UnderscoreLayout::AccessionSubtype)
            .unwrap()
    }

    #[test]
    fn test_paired_call() {
        let profile = subtype(vec![
            hit("stx2A:90:ACC:a", "98.5"),
            hit("stx2B:12:ACC:a", "97.0"),
        ]);
        assert_eq!(
            profile.subtypes["vtx2a"],
            SubtypeComposite::Paired { a: 98.5, b: 97.0 }
        );
        assert_eq!(profile.summary(), "vtx2a");
    }

    #[test]
    fn test_stx2b_catalogue_gap() {
        let profile = subtype(vec![hit("stx2A:90:ACC:b", "95.0")]);
        assert_eq!(
            profile.subtypes["vtx2b"],
            SubtypeComposite::Singleton { a: 95.0 }
        );
        assert_eq!(profile.subtypes["vtx2b"].to_string(), "(95.0,)");
    }

    #[test]
    fn test_unpaired_label_dropped() {
        let profile = subtype(vec![
            hit("stx1A:1:ACC:a", "99.0"),
            hit("stx2A:4:ACC:c", "99.0"),
        ]);
        assert!(profile.subtypes.is_empty());
        assert_eq!(profile.summary(), "ND");
        assert_eq!(profile.subtype_state["1A"]["a"], 99.0);
    }

    #[test]
    fn test_no_hits() {
        let profile = subtype(Vec::new());
        assert_eq!(profile.summary(), "ND");
        assert!(profile.subtype_state.is_empty());
    }

    #[test]
    fn test_subunitless_does_not_double_report() {
        let profile = subtype(vec![
            hit("stx2A:1:ACC:c", "99.0"),
            hit("stx2B:2:ACC:c", "98.0"),
            hit("stx2:3:ACC:c", "100.0"),
            hit("stx2:4:ACC:e", "96.0"),
        ]);
        assert_eq!(
            profile.subtypes["vtx2c"],
            SubtypeComposite::Paired { a: 99.0, b: 98.0 }
        );
        assert_eq!(
            profile.subtypes["vtx2e"],
            SubtypeComposite::Singleton { a: 96.0 }
        );
        assert_eq!(profile.summary(), "vtx2c;vtx2e");
    }

    #[test]
    fn test_best_identity_per_label() {
        let profile = subtype(vec![
            hit("stx1A:1:ACC1:a", "97.0"),
            hit("stx1A:2:ACC2:a", "99.5"),
            hit("stx1B:3:ACC3:a", "98.0"),
            hit("stx1B:4:ACC4:a", "96.0"),
        ]);
        assert_eq!(
            profile.subtypes["vtx1a"],
            SubtypeComposite::Paired { a: 99.5, b: 98.0 }
        );
    }

    #[test]
    fn test_sorted_summary() {
        let profile = subtype(vec![
            hit("stx2A:1:ACC:d", "99.0"),
            hit("stx2B:1:ACC:d", "99.0"),
            hit("stx1A:1:ACC:a", "100.0"),
            hit("stx1B:1:ACC:a", "100.0"),
            hit("stx2A:1:ACC:b", "97.0"),
        ]);
        assert_eq!(profile.summary(), "vtx1a;vtx2b;vtx2d");
        assert_eq!(profile.subtype_set(), vec!["vtx1a", "vtx2b", "vtx2d"]);
    }

    #[test]
    fn test_underscore_identifiers_and_unlabelled_hits() {
        let profile = subtype(vec![
            hit("stx1A_M19437_a", "100.0"),
            hit("stx1B_M19437_a", "100.0"),
            hit("stx2A:1:ACC", "100.0"),
            hit("eae_AF081182_beta", "100.0"),
        ]);
        assert_eq!(profile.summary(), "vtx1a");
        assert!(!profile.subtype_state.contains_key("2A"));
    }
}
