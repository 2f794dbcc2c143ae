//! Maven version semantics: parsing, ordering and selector matching.
//!
//! Versions are split into items on `.`, `-`, `_` and on every transition
//! between digits and letters (`1.0alpha2` is `1`, `0`, `alpha`, `2`).
//! Numeric items compare as numbers. Well-known qualifiers order as
//! `alpha < beta < milestone < rc < snapshot < release < sp`. Any other text
//! sorts between the pre-release qualifiers and a release, case-insensitively.
//! Missing trailing items count as `0` / release, so `1.0 == 1.0.0`.

use std::cmp::Ordering;
use std::fmt;

/// A parsed Maven version. Equality follows the ordering, not the text.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    original: String,
    items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Number(u64),
    Qualifier(Qualifier),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            items: tokenize(version),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        (0..len)
            .map(|i| compare_items(self.items.get(i), other.items.get(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

fn tokenize(version: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut digits = false;

    for ch in version.chars() {
        if matches!(ch, '.' | '-' | '_' | '+') {
            flush(&mut current, &mut items);
            continue;
        }
        let is_digit = ch.is_ascii_digit();
        if !current.is_empty() && is_digit != digits {
            flush(&mut current, &mut items);
        }
        digits = is_digit;
        current.push(ch);
    }
    flush(&mut current, &mut items);
    items
}

fn flush(current: &mut String, items: &mut Vec<Item>) {
    if current.is_empty() {
        return;
    }
    items.push(classify(current));
    current.clear();
}

fn classify(token: &str) -> Item {
    if let Ok(n) = token.parse::<u64>() {
        return Item::Number(n);
    }
    let qualifier = match token.to_ascii_lowercase().as_str() {
        "alpha" | "a" => Qualifier::Alpha,
        "beta" | "b" => Qualifier::Beta,
        "milestone" | "m" => Qualifier::Milestone,
        "rc" | "cr" => Qualifier::Rc,
        "snapshot" => Qualifier::Snapshot,
        "ga" | "final" | "release" => Qualifier::Release,
        "sp" => Qualifier::Sp,
        _ => return Item::Text(token.to_ascii_lowercase()),
    };
    Item::Qualifier(qualifier)
}

fn compare_items(a: Option<&Item>, b: Option<&Item>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(item), None) => against_padding(item),
        (None, Some(item)) => against_padding(item).reverse(),
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

/// Compare an item with the implicit `0` / release padding of a shorter version.
fn against_padding(item: &Item) -> Ordering {
    match item {
        Item::Number(n) => n.cmp(&0),
        Item::Qualifier(q) => q.cmp(&Qualifier::Release),
        Item::Text(_) => Ordering::Less,
    }
}

fn compare_present(a: &Item, b: &Item) -> Ordering {
    match (a, b) {
        (Item::Number(a), Item::Number(b)) => a.cmp(b),
        (Item::Qualifier(a), Item::Qualifier(b)) => a.cmp(b),
        (Item::Text(a), Item::Text(b)) => a.cmp(b),
        // A zero item stands in for padding, so `1`, `1.0` and `1-sp` stay consistent.
        (Item::Number(0), other) => against_padding(other).reverse(),
        (other, Item::Number(0)) => against_padding(other),
        (Item::Number(_), _) => Ordering::Greater,
        (_, Item::Number(_)) => Ordering::Less,
        // Release and later qualifiers outrank free text; pre-releases do not.
        (Item::Qualifier(q), Item::Text(_)) => q.cmp(&Qualifier::Release).then(Ordering::Greater),
        (Item::Text(_), Item::Qualifier(q)) => Qualifier::Release.cmp(q).then(Ordering::Less),
    }
}

/// A version bound of a [`VersionRange`].
#[derive(Debug, Clone)]
pub struct Bound {
    pub version: MavenVersion,
    pub inclusive: bool,
}

/// A Maven version range: `[1.0,2.0)`, `[1.0,]`, `(,2.0)`, `[1.5]`.
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl VersionRange {
    /// Parse a range expression. Returns `None` for bare versions and for
    /// malformed ranges.
    pub fn parse(spec: &str) -> Option<Self> {
        let s = spec.trim();
        let lower_inclusive = match s.chars().next()? {
            '[' => true,
            '(' => false,
            _ => return None,
        };
        let upper_inclusive = match s.chars().last()? {
            ']' => true,
            ')' => false,
            _ => return None,
        };
        let inner = s.get(1..s.len() - 1)?;

        let bound = |text: &str, inclusive: bool| {
            let text = text.trim();
            (!text.is_empty()).then(|| Bound {
                version: MavenVersion::parse(text),
                inclusive,
            })
        };

        match inner.split_once(',') {
            Some((lower, upper)) => Some(Self {
                lower: bound(lower, lower_inclusive),
                upper: bound(upper, upper_inclusive),
            }),
            None => {
                // `[1.5]` pins exactly one version.
                if !(lower_inclusive && upper_inclusive) || inner.trim().is_empty() {
                    return None;
                }
                Some(Self {
                    lower: bound(inner, true),
                    upper: bound(inner, true),
                })
            }
        }
    }

    pub fn contains(&self, version: &MavenVersion) -> bool {
        let above_lower = self.lower.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Greater => true,
            Ordering::Equal => b.inclusive,
            Ordering::Less => false,
        });
        let below_upper = self.upper.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Less => true,
            Ordering::Equal => b.inclusive,
            Ordering::Greater => false,
        });
        above_lower && below_upper
    }
}

/// A requested version expression under Maven semantics.
#[derive(Debug, Clone)]
pub enum MavenSelector {
    /// No version requested; anything goes.
    Any,
    Exact(MavenVersion),
    Range(VersionRange),
    /// `1.+` matches every version whose text starts with `1.`.
    Prefix(String),
    /// `latest.release`, `latest.integration`, ...
    Latest(String),
}

impl MavenSelector {
    pub fn parse(selector: &str) -> Self {
        let s = selector.trim();
        if s.is_empty() {
            return Self::Any;
        }
        if let Some(status) = s.strip_prefix("latest.") {
            return Self::Latest(status.to_string());
        }
        if let Some(prefix) = s.strip_suffix('+') {
            return Self::Prefix(prefix.to_string());
        }
        match VersionRange::parse(s) {
            Some(range) => Self::Range(range),
            None => Self::Exact(MavenVersion::parse(s)),
        }
    }

    /// Whether the expression can match more than one version.
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Self::Exact(_))
    }

    pub fn accepts(&self, candidate: &MavenVersion) -> bool {
        match self {
            Self::Any | Self::Latest(_) => true,
            Self::Exact(v) => v == candidate,
            Self::Range(range) => range.contains(candidate),
            Self::Prefix(prefix) => candidate.as_str().starts_with(prefix.as_str()),
        }
    }
}
