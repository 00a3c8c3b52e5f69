//! Coverage universes and inverted indices for the minimal-ACL model.
//!
//! Given the classified requests:
//!
//! - `other` is the union of all unauthorized pattern sets;
//! - each permit candidate splits its patterns into *unique* (not in
//!   `other`, contributing to U1) and *ambiguous* (in `other`, contributing
//!   to U2);
//! - three inverted indices map a pattern to the candidates that carry it,
//!   so constraint generation never scans the candidate lists.
//!
//! U1 and U2 are disjoint by construction.

use crate::Classification;
use minacl_core::{AccessRequest, RelationPattern, RequestKey};
use std::collections::{BTreeMap, BTreeSet};

/// An authorized request considered as a permit rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermitCandidate {
    /// The request.
    pub key: RequestKey,
    /// Patterns no unauthorized request carries.
    pub unique: BTreeSet<RelationPattern>,
    /// Patterns some unauthorized request also carries.
    pub ambiguous: BTreeSet<RelationPattern>,
}

/// An unauthorized request considered as a deny rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenyCandidate {
    /// The request.
    pub key: RequestKey,
    /// Every pattern of the request.
    pub patterns: BTreeSet<RelationPattern>,
}

/// Pattern → candidate positions.
pub type PatternIndex = BTreeMap<RelationPattern, Vec<usize>>;

/// Everything the optimization model is built from.
#[derive(Clone, Debug, Default)]
pub struct CoverageModel {
    /// Permit candidates, in request order.
    pub permits: Vec<PermitCandidate>,
    /// Deny candidates, in request order.
    pub denies: Vec<DenyCandidate>,
    /// Unambiguous patterns.
    pub u1: BTreeSet<RelationPattern>,
    /// Ambiguous patterns.
    pub u2: BTreeSet<RelationPattern>,
    /// U1 pattern → permits whose unique set contains it.
    pub exact_cover: PatternIndex,
    /// U2 pattern → permits whose ambiguous set contains it.
    pub activation: PatternIndex,
    /// U2 pattern → denies whose pattern set contains it.
    pub deny_cover: PatternIndex,
}

impl CoverageModel {
    /// Builds candidates, universes, and indices from a classification.
    pub fn build(classification: &Classification) -> Self {
        let other: BTreeSet<&RelationPattern> = classification
            .unauthorized
            .iter()
            .fold(BTreeSet::new(), |mut acc, request| {
                acc.extend(request.patterns.iter());
                acc
            });

        let permits: Vec<PermitCandidate> = classification
            .authorized
            .iter()
            .map(|request| split_patterns(request, &other))
            .collect();

        let denies: Vec<DenyCandidate> = classification
            .unauthorized
            .iter()
            .map(|request| DenyCandidate {
                key: request.key.clone(),
                patterns: request.patterns.clone(),
            })
            .collect();

        let exact_cover = invert(permits.iter().map(|p| &p.unique));
        let activation = invert(permits.iter().map(|p| &p.ambiguous));
        let u1: BTreeSet<RelationPattern> = exact_cover.keys().cloned().collect();
        let u2: BTreeSet<RelationPattern> = activation.keys().cloned().collect();

        let mut deny_cover = invert(denies.iter().map(|d| &d.patterns));
        deny_cover.retain(|pattern, _| u2.contains(pattern));

        tracing::info!(
            permits = permits.len(),
            denies = denies.len(),
            u1 = u1.len(),
            u2 = u2.len(),
            "built coverage model"
        );

        Self {
            permits,
            denies,
            u1,
            u2,
            exact_cover,
            activation,
            deny_cover,
        }
    }

    /// Permit candidate positions covering a U1 pattern.
    pub fn exact_cover_of(&self, pattern: &RelationPattern) -> &[usize] {
        self.exact_cover.get(pattern).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Permit candidate positions exposing a U2 pattern.
    pub fn activators_of(&self, pattern: &RelationPattern) -> &[usize] {
        self.activation.get(pattern).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Deny candidate positions neutralizing a U2 pattern.
    pub fn deniers_of(&self, pattern: &RelationPattern) -> &[usize] {
        self.deny_cover.get(pattern).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn split_patterns(request: &AccessRequest, other: &BTreeSet<&RelationPattern>) -> PermitCandidate {
    let (ambiguous, unique): (BTreeSet<_>, BTreeSet<_>) = request
        .patterns
        .iter()
        .cloned()
        .partition(|p| other.contains(p));
    PermitCandidate {
        key: request.key.clone(),
        unique,
        ambiguous,
    }
}

fn invert<'a, I>(sets: I) -> PatternIndex
where
    I: Iterator<Item = &'a BTreeSet<RelationPattern>>,
{
    let mut index = PatternIndex::new();
    for (position, set) in sets.enumerate() {
        for pattern in set {
            index.entry(pattern.clone()).or_default().push(position);
        }
    }
    index
}
