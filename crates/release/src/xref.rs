//! Cross-reference extraction from free text.
//!
//! Two conventions are recognized, each as an ordered list of independent
//! extractors:
//!
//! - **closing references** such as `Fixes #12` in a pull request body or a
//!   commit message;
//! - **merge references** such as `Merge pull request #7 from ...` or the
//!   `(#9)` suffix of a squash-merge summary.
//!
//! Matching is case-insensitive and only the first match of a convention is
//! returned, even when the text references several numbers.

use regex::Regex;
use std::sync::LazyLock;

/// A single pattern extractor.
pub type Extractor = fn(&str) -> Option<u64>;

#[allow(clippy::expect_used)]
static CLOSING_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:close|closes|closed|resolve|resolves|resolved|fix|fixes|fixed) #([0-9]+)")
        .expect("closing keyword pattern is valid")
});

#[allow(clippy::expect_used)]
static MERGE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)merge pull request #([0-9]+)").expect("merge phrase pattern is valid")
});

#[allow(clippy::expect_used)]
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#([0-9]+)\)").expect("parenthesized pattern is valid"));

/// Extractors for closing references, in precedence order.
pub const CLOSING_EXTRACTORS: &[Extractor] = &[closing_keyword];

/// Extractors for merge references, in precedence order. The explicit host
/// phrase wins over a parenthesized number wherever each appears.
pub const MERGE_EXTRACTORS: &[Extractor] = &[merge_phrase, parenthesized_number];

/// Which reference convention to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `close`/`resolve`/`fix` verbs followed by `#<n>`
    Closing,
    /// `merge pull request #<n>` or `(#<n>)`
    Merge,
}

impl ReferenceKind {
    /// Extractors for this convention, in precedence order.
    #[must_use]
    pub const fn extractors(self) -> &'static [Extractor] {
        match self {
            Self::Closing => CLOSING_EXTRACTORS,
            Self::Merge => MERGE_EXTRACTORS,
        }
    }

    /// Extracts the referenced number from `text`.
    #[must_use]
    pub fn extract(self, text: &str) -> Option<u64> {
        self.extractors().iter().find_map(|extract| extract(text))
    }
}

/// Returns the number of the first closing reference in `text`.
#[must_use]
pub fn closing_reference(text: &str) -> Option<u64> {
    ReferenceKind::Closing.extract(text)
}

/// Returns the pull request number of the merge reference in `text`.
#[must_use]
pub fn merge_reference(text: &str) -> Option<u64> {
    ReferenceKind::Merge.extract(text)
}

/// `fix #1`, `Closes #2`, `resolved #3` ...
#[must_use]
pub fn closing_keyword(text: &str) -> Option<u64> {
    first_number(&CLOSING_KEYWORD, text)
}

/// `Merge pull request #7 from owner/branch`
#[must_use]
pub fn merge_phrase(text: &str) -> Option<u64> {
    first_number(&MERGE_PHRASE, text)
}

/// `Some squash commit (#9)`
#[must_use]
pub fn parenthesized_number(text: &str) -> Option<u64> {
    first_number(&PARENTHESIZED, text)
}

fn first_number(pattern: &Regex, text: &str) -> Option<u64> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}
