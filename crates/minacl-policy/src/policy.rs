//! ReBAC policy loading and request classification.
//!
//! A policy is a set of authorizing relation patterns, one per line:
//!
//! ```text
//! owns, member
//! admin
//! ```
//!
//! A request is authorized iff at least one of its patterns is in the
//! policy.

use minacl_core::{AccessPatterns, AccessRequest, Error, RelationPattern, Result, Warning};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

// ============================================================================
// Policy
// ============================================================================

/// The set of authorizing relation patterns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Policy {
    patterns: HashSet<RelationPattern>,
}

impl Policy {
    /// Creates a policy from patterns.
    pub fn new<I: IntoIterator<Item = RelationPattern>>(patterns: I) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    /// Parses line-delimited policy text.
    ///
    /// Blank lines are skipped; fields are comma-separated and trimmed. An
    /// empty field (e.g. `owns,,member`) is rejected.
    pub fn parse(text: &str, input: &str) -> Result<Self> {
        let mut patterns = HashSet::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let labels: Vec<&str> = line.split(',').map(str::trim).collect();
            if labels.iter().any(|l| l.is_empty()) {
                return Err(Error::parse(
                    input,
                    idx as u64 + 1,
                    format!("empty label in policy pattern '{}'", line.trim()),
                ));
            }
            patterns.insert(RelationPattern::from_labels(labels));
        }
        Ok(Self { patterns })
    }

    /// Reads a policy file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let policy = Self::parse(&text, &path.display().to_string())?;
        tracing::info!(
            input = %path.display(),
            patterns = policy.len(),
            "loaded policy"
        );
        Ok(policy)
    }

    /// Returns whether a pattern is authorizing.
    pub fn contains(&self, pattern: &RelationPattern) -> bool {
        self.patterns.contains(pattern)
    }

    /// Returns whether any pattern of a set is authorizing.
    pub fn authorizes(&self, patterns: &BTreeSet<RelationPattern>) -> bool {
        patterns.iter().any(|p| self.patterns.contains(p))
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` for a policy with no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates patterns (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &RelationPattern> {
        self.patterns.iter()
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Requests partitioned by the policy.
#[derive(Clone, Debug, Default)]
pub struct Classification {
    /// Requests with at least one authorizing pattern, in key order.
    pub authorized: Vec<AccessRequest>,
    /// All other requests, in key order.
    pub unauthorized: Vec<AccessRequest>,
    /// Non-fatal findings (e.g. a policy that matches nothing).
    pub warnings: Vec<Warning>,
}

impl Classification {
    /// Total number of classified requests.
    pub fn len(&self) -> usize {
        self.authorized.len() + self.unauthorized.len()
    }

    /// Returns `true` if no request was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits requests into authorized and unauthorized.
pub fn classify(requests: AccessPatterns, policy: &Policy) -> Classification {
    let total = requests.len();
    let (authorized, unauthorized): (Vec<_>, Vec<_>) = requests
        .into_requests()
        .into_iter()
        .partition(|r| policy.authorizes(&r.patterns));

    let mut warnings = Vec::new();
    if authorized.is_empty() {
        let warning = Warning::DegeneratePolicy {
            requests: total,
            policy_patterns: policy.len(),
        };
        tracing::warn!("{warning}");
        warnings.push(warning);
    }

    let seen: HashSet<&RelationPattern> = authorized
        .iter()
        .flat_map(|r| r.patterns.iter())
        .collect();
    for pattern in policy.iter().filter(|p| !seen.contains(p)) {
        tracing::debug!(pattern = %pattern, "policy pattern matches no request");
    }

    tracing::info!(
        authorized = authorized.len(),
        unauthorized = unauthorized.len(),
        "classified access requests"
    );

    Classification {
        authorized,
        unauthorized,
        warnings,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use minacl_core::RequestKey;

    fn pattern(labels: &[&str]) -> RelationPattern {
        RelationPattern::from_labels(labels.iter().copied())
    }

    fn requests() -> AccessPatterns {
        [
            (RequestKey::new("A", "B"), pattern(&["owns"])),
            (RequestKey::new("A", "C"), pattern(&["owns", "member"])),
            (RequestKey::new("B", "C"), pattern(&["member"])),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let policy = Policy::parse(" owns , member \n\n   \nadmin\n", "policy.txt").unwrap();
        assert_eq!(policy.len(), 2);
        assert!(policy.contains(&pattern(&["owns", "member"])));
        assert!(policy.contains(&pattern(&["admin"])));
    }

    #[test]
    fn test_parse_dedups() {
        let policy = Policy::parse("owns,member\nowns, member\n", "policy.txt").unwrap();
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_parse_empty_field_is_error() {
        let err = Policy::parse("owns\nowns,,member\n", "policy.txt").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(Policy::parse("", "policy.txt").unwrap().is_empty());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rebac_policy.txt");
        std::fs::write(&path, "owns,member\n").unwrap();
        let policy = Policy::from_path(&path).unwrap();
        assert!(policy.contains(&pattern(&["owns", "member"])));
    }

    #[test]
    fn test_classify_partitions_requests() {
        let policy = Policy::new([pattern(&["owns", "member"])]);
        let classification = classify(requests(), &policy);

        assert_eq!(classification.authorized.len(), 1);
        assert_eq!(classification.authorized[0].key, RequestKey::new("A", "C"));
        assert_eq!(classification.unauthorized.len(), 2);
        assert_eq!(classification.len(), 3);
        assert!(classification.warnings.is_empty());
    }

    #[test]
    fn test_classify_degenerate_policy() {
        let policy = Policy::new([pattern(&["nothing"])]);
        let classification = classify(requests(), &policy);

        assert!(classification.authorized.is_empty());
        assert_eq!(classification.unauthorized.len(), 3);
        assert_eq!(
            classification.warnings,
            vec![Warning::DegeneratePolicy {
                requests: 3,
                policy_patterns: 1,
            }]
        );
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        // Patterns match as whole sequences, not prefixes.
        let policy = Policy::new([pattern(&["owns"])]);
        let classification = classify(requests(), &policy);
        let keys: Vec<&RequestKey> = classification.authorized.iter().map(|r| &r.key).collect();
        assert_eq!(keys, vec![&RequestKey::new("A", "B")]);
    }
}
