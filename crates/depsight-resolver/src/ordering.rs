//! Pluggable version ordering over raw version strings.
//!
//! [`VersionOrdering`] never interprets version text itself; it delegates to a
//! [`VersionParser`], a [`VersionComparator`] and a [`VersionSelectorScheme`].
//! Maven semantics ([`MavenVersionScheme`]) are the default; semantic
//! versioning ([`SemverScheme`]) is available for ecosystems that use it.

use std::cmp::Ordering;

use crate::version::{MavenSelector, MavenVersion};

/// Turns raw version text into a structured version.
pub trait VersionParser {
    type Version;

    /// `None` when the text is not a version under this scheme.
    fn parse(&self, raw: &str) -> Option<Self::Version>;
}

/// Orders structured versions.
pub trait VersionComparator<V> {
    fn compare(&self, a: &V, b: &V) -> Ordering;
}

/// A parsed requested-version expression.
pub trait VersionSelector {
    /// Whether the expression can match more than one version.
    fn is_dynamic(&self) -> bool;

    fn accept(&self, candidate: &str) -> bool;
}

/// Parses requested-version expressions into [`VersionSelector`]s.
pub trait VersionSelectorScheme {
    fn parse_selector(&self, selector: &str) -> Box<dyn VersionSelector>;
}

/// Total order over raw version strings built from the three collaborators.
#[derive(Debug, Clone, Default)]
pub struct VersionOrdering<P, C, S> {
    parser: P,
    comparator: C,
    scheme: S,
}

impl<P, C, S> VersionOrdering<P, C, S>
where
    P: VersionParser,
    C: VersionComparator<P::Version>,
    S: VersionSelectorScheme,
{
    pub fn new(parser: P, comparator: C, scheme: S) -> Self {
        Self {
            parser,
            comparator,
            scheme,
        }
    }

    /// Parse-then-compare. Parsable versions order above unparsable text, and
    /// unparsable text orders lexically, so this never fails.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.parser.parse(a), self.parser.parse(b)) {
            (Some(a), Some(b)) => self.comparator.compare(&a, &b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => a.cmp(b),
        }
    }

    /// Static selectors first, ordered as versions; dynamic ones after, lexically.
    pub fn compare_selectors(&self, a: &str, b: &str) -> Ordering {
        let a_dynamic = self.scheme.parse_selector(a).is_dynamic();
        let b_dynamic = self.scheme.parse_selector(b).is_dynamic();
        match (a_dynamic, b_dynamic) {
            (false, false) => self.compare(a, b),
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (true, true) => a.cmp(b),
        }
    }

    /// Whether `selector` accepts `candidate`. An empty selector accepts anything.
    pub fn accepts(&self, selector: &str, candidate: &str) -> bool {
        selector.trim().is_empty() || self.scheme.parse_selector(selector).accept(candidate)
    }
}

/// Object-safe view of a [`VersionOrdering`], so reports can pick the
/// version scheme at runtime.
pub trait VersionOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering;
    fn compare_selectors(&self, a: &str, b: &str) -> Ordering;
    fn accepts(&self, selector: &str, candidate: &str) -> bool;
}

impl<P, C, S> VersionOrder for VersionOrdering<P, C, S>
where
    P: VersionParser,
    C: VersionComparator<P::Version>,
    S: VersionSelectorScheme,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        VersionOrdering::compare(self, a, b)
    }

    fn compare_selectors(&self, a: &str, b: &str) -> Ordering {
        VersionOrdering::compare_selectors(self, a, b)
    }

    fn accepts(&self, selector: &str, candidate: &str) -> bool {
        VersionOrdering::accepts(self, selector, candidate)
    }
}

/// Maven version semantics for all three collaborators.
#[derive(Debug, Clone, Copy, Default)]
pub struct MavenVersionScheme;

impl VersionParser for MavenVersionScheme {
    type Version = MavenVersion;

    fn parse(&self, raw: &str) -> Option<MavenVersion> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.chars().any(|c| c.is_ascii_alphanumeric())
            && !raw.chars().any(char::is_whitespace);
        valid.then(|| MavenVersion::parse(raw))
    }
}

impl VersionComparator<MavenVersion> for MavenVersionScheme {
    fn compare(&self, a: &MavenVersion, b: &MavenVersion) -> Ordering {
        a.cmp(b)
    }
}

impl VersionSelector for MavenSelector {
    fn is_dynamic(&self) -> bool {
        MavenSelector::is_dynamic(self)
    }

    fn accept(&self, candidate: &str) -> bool {
        self.accepts(&MavenVersion::parse(candidate))
    }
}

impl VersionSelectorScheme for MavenVersionScheme {
    fn parse_selector(&self, selector: &str) -> Box<dyn VersionSelector> {
        Box::new(MavenSelector::parse(selector))
    }
}

pub type MavenOrdering = VersionOrdering<MavenVersionScheme, MavenVersionScheme, MavenVersionScheme>;

impl MavenOrdering {
    pub fn maven() -> Self {
        Self::new(MavenVersionScheme, MavenVersionScheme, MavenVersionScheme)
    }
}

/// Semantic versioning via the `semver` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverScheme;

impl VersionParser for SemverScheme {
    type Version = semver::Version;

    fn parse(&self, raw: &str) -> Option<semver::Version> {
        semver::Version::parse(raw.trim()).ok()
    }
}

impl VersionComparator<semver::Version> for SemverScheme {
    fn compare(&self, a: &semver::Version, b: &semver::Version) -> Ordering {
        a.cmp_precedence(b)
    }
}

enum SemverSelector {
    Exact(semver::Version),
    Requirement(semver::VersionReq),
    /// Not a semver expression; only the identical text is accepted.
    Literal(String),
}

impl VersionSelector for SemverSelector {
    fn is_dynamic(&self) -> bool {
        matches!(self, Self::Requirement(_))
    }

    fn accept(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(v) => semver::Version::parse(candidate).is_ok_and(|c| c == *v),
            Self::Requirement(req) => {
                semver::Version::parse(candidate).is_ok_and(|c| req.matches(&c))
            }
            Self::Literal(text) => text == candidate,
        }
    }
}

impl VersionSelectorScheme for SemverScheme {
    fn parse_selector(&self, selector: &str) -> Box<dyn VersionSelector> {
        let selector = selector.trim();
        if let Ok(version) = semver::Version::parse(selector) {
            return Box::new(SemverSelector::Exact(version));
        }
        match semver::VersionReq::parse(selector) {
            Ok(req) => Box::new(SemverSelector::Requirement(req)),
            Err(_) => Box::new(SemverSelector::Literal(selector.to_string())),
        }
    }
}

pub type SemverOrdering = VersionOrdering<SemverScheme, SemverScheme, SemverScheme>;

impl SemverOrdering {
    pub fn semver() -> Self {
        Self::new(SemverScheme, SemverScheme, SemverScheme)
    }
}
