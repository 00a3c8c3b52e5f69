//! Shared domain types for the minimal ACL pipeline.
//!
//! Every keyed collection here is ordered (`BTreeMap`/`BTreeSet`) so that
//! derived structures, solver variable numbering, and the emitted ACL are
//! deterministic for a given input.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ============================================================================
// RelationPattern
// ============================================================================

/// The ordered sequence of relation labels along one path.
///
/// # Example
///
/// ```rust
/// use minacl_core::RelationPattern;
///
/// let pattern = RelationPattern::from_labels(["owns", "member"]);
/// assert_eq!(pattern.len(), 2);
/// assert_eq!(pattern.to_string(), "owns,member");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationPattern(Vec<String>);

impl RelationPattern {
    /// Creates a pattern from owned labels.
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    /// Creates a pattern from anything yielding label strings.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Returns the labels in path order.
    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Number of hops in the pattern.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the zero-hop pattern.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new pattern extended by one label.
    pub fn extended(&self, label: &str) -> Self {
        let mut labels = Vec::with_capacity(self.0.len() + 1);
        labels.extend(self.0.iter().cloned());
        labels.push(label.to_string());
        Self(labels)
    }
}

impl fmt::Display for RelationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A (principal, resource) pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    /// Principal (path origin).
    pub source: String,
    /// Resource (path destination).
    pub target: String,
}

impl RequestKey {
    /// Creates a request key.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}

/// A request together with every relation pattern that connects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessRequest {
    /// The (source, target) pair.
    pub key: RequestKey,
    /// Distinct patterns reaching `target` from `source`.
    pub patterns: BTreeSet<RelationPattern>,
}

/// Pattern sets for every (source, target) pair that has at least one path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessPatterns {
    requests: BTreeMap<RequestKey, BTreeSet<RelationPattern>>,
}

impl AccessPatterns {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one pattern for a pair.
    pub fn insert(&mut self, key: RequestKey, pattern: RelationPattern) {
        self.requests.entry(key).or_default().insert(pattern);
    }

    /// Merges another collection into this one.
    pub fn merge(&mut self, other: AccessPatterns) {
        for (key, patterns) in other.requests {
            self.requests.entry(key).or_default().extend(patterns);
        }
    }

    /// Pattern set for a pair, if the pair has any path.
    pub fn get(&self, source: &str, target: &str) -> Option<&BTreeSet<RelationPattern>> {
        self.requests.get(&RequestKey::new(source, target))
    }

    /// Number of pairs with at least one pattern.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` when no pair has a pattern.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Total number of (pair, pattern) entries.
    pub fn pattern_count(&self) -> usize {
        self.requests.values().map(BTreeSet::len).sum()
    }

    /// Iterates pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&RequestKey, &BTreeSet<RelationPattern>)> {
        self.requests.iter()
    }

    /// Consumes the collection into owned requests, in key order.
    pub fn into_requests(self) -> Vec<AccessRequest> {
        self.requests
            .into_iter()
            .map(|(key, patterns)| AccessRequest { key, patterns })
            .collect()
    }
}

impl FromIterator<(RequestKey, RelationPattern)> for AccessPatterns {
    fn from_iter<T: IntoIterator<Item = (RequestKey, RelationPattern)>>(iter: T) -> Self {
        let mut patterns = AccessPatterns::new();
        for (key, pattern) in iter {
            patterns.insert(key, pattern);
        }
        patterns
    }
}

// ============================================================================
// Decisions and the output ACL
// ============================================================================

/// Decision attached to an explicit rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Access allowed.
    Permit,
    /// Access refused.
    Deny,
}

impl Decision {
    /// Returns the decision as written in the output table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permit => "Permit",
            Self::Deny => "Deny",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One explicit rule of the minimal ACL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclRule {
    /// Principal.
    pub source: String,
    /// Resource.
    pub target: String,
    /// Permit or deny.
    pub decision: Decision,
}

impl AclRule {
    /// Creates a rule for a request.
    pub fn new(key: &RequestKey, decision: Decision) -> Self {
        Self {
            source: key.source.clone(),
            target: key.target.clone(),
            decision,
        }
    }
}

/// Column names of the output table.
pub const ACL_HEADER: [&str; 3] = ["User", "Resource", "Decision"];

/// The derived rule set, in emission order.
///
/// An empty rule list is written as a header-only table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalAcl {
    /// Selected rules: permits first, then denies.
    pub rules: Vec<AclRule>,
}

impl MinimalAcl {
    /// A header-only ACL.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of permit rules.
    pub fn permit_count(&self) -> usize {
        self.count(Decision::Permit)
    }

    /// Number of deny rules.
    pub fn deny_count(&self) -> usize {
        self.count(Decision::Deny)
    }

    /// Returns `true` when no rule was selected.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules with the given decision.
    pub fn with_decision(&self, decision: Decision) -> impl Iterator<Item = &AclRule> {
        self.rules.iter().filter(move |r| r.decision == decision)
    }

    fn count(&self, decision: Decision) -> usize {
        self.with_decision(decision).count()
    }
}

// ============================================================================
// Solver status
// ============================================================================

/// Outcome status reported by an integer-program oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// A proven optimal assignment is available.
    Optimal,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The objective can decrease without bound.
    Unbounded,
    /// The time limit expired before optimality was proven.
    TimedOut,
}

impl SolveStatus {
    /// Returns `true` for [`SolveStatus::Optimal`].
    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => write!(f, "optimal"),
            Self::Infeasible => write!(f, "infeasible"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

// ============================================================================
// Warnings
// ============================================================================

/// Non-fatal conditions detected while processing inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Warning {
    /// The policy matches no pattern of any request, so every request is
    /// unauthorized and the minimal ACL is trivially empty.
    DegeneratePolicy {
        /// Number of requests that were classified.
        requests: usize,
        /// Number of patterns in the policy.
        policy_patterns: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegeneratePolicy {
                requests,
                policy_patterns,
            } => write!(
                f,
                "degenerate input: {policy_patterns} policy pattern(s) match none of {requests} request(s)"
            ),
        }
    }
}
