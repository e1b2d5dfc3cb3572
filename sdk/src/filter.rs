//! Include/exclude pattern matching
//!
//! Filters are ordered lists of raw strings. A string that starts with `!`
//! is an exclusion whose literal is the text after the marker; any other
//! string is an inclusion. A candidate is selected when at least one
//! inclusion prefix-matches it and no exclusion does.
//!
//! Comparison is a byte-wise prefix test anchored at an offset into the
//! candidate, so `"com/acme"` selects `"com/acme/Foo.class"` and, at
//! offset 1, `"Lcom/acme/Foo;"`.
//!
//! # Degenerate patterns
//!
//! The literal algorithm is kept as-is for two edge cases:
//! - `""` is an inclusion that prefix-matches every candidate
//! - `"!"` is an exclusion with an empty literal and vetoes every candidate
//!
//! # Examples
//!
//! ```
//! use sdk::filter::matches;
//!
//! let prefixes = ["foo/bar", "!foo/bar/Bar"];
//! assert!(matches("foo/bar/Baz.class", &prefixes, 0));
//! assert!(!matches("foo/bar/Bar.class", &prefixes, 0));
//! assert!(matches("Lfoo/bar/Baz.class", &prefixes, 1));
//! ```

use serde::{Deserialize, Serialize};

/// Negation marker for exclusion patterns
pub const NEGATION_MARKER: char = '!';

/// Exclusion prefix that applies to the super-class of a [`ClassSource`]
pub const SUBCLASS_MARKER: &str = "!subclassOf:";

/// Separators accepted by [`PatternSet::from_option`]
const OPTION_SEPARATORS: [char; 2] = [';', ','];

/// Test whether `literal` matches `candidate` at byte `offset` for the full
/// length of `literal`.
///
/// An offset past the end of the candidate matches nothing, including the
/// empty literal.
fn region_matches(candidate: &str, offset: usize, literal: &str) -> bool {
    candidate
        .as_bytes()
        .get(offset..)
        .is_some_and(|rest| rest.starts_with(literal.as_bytes()))
}

/// Decide whether `candidate` is selected by `patterns`
///
/// `candidate` matches only if some plain pattern's literal prefix-matches it
/// at `offset` and no negated pattern's literal does. An empty pattern list
/// selects nothing.
///
/// # Examples
///
/// ```
/// use sdk::filter::matches;
///
/// assert!(matches("Foo", &["Foo"], 0));
/// assert!(!matches("Foo", &["Foo", "!Foo"], 0));
/// assert!(!matches("Foo", &[] as &[&str], 0));
/// assert!(matches("com.Foo", &["Foo"], 4));
/// ```
pub fn matches<S: AsRef<str>>(candidate: &str, patterns: &[S], offset: usize) -> bool {
    let parsed = || patterns.iter().map(|p| Pattern::parse(p.as_ref()));

    parsed().any(|p| !p.is_negated() && p.hits(candidate, offset))
        && !parsed().any(|p| p.is_negated() && p.hits(candidate, offset))
}

/// A single classified filter pattern, borrowing its literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern<'a> {
    /// Plain pattern; the whole string is the literal
    Include(&'a str),
    /// Negated pattern; the literal follows the `!` marker
    Exclude(&'a str),
}

impl<'a> Pattern<'a> {
    /// Classify a raw pattern string
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix(NEGATION_MARKER) {
            Some(literal) => Self::Exclude(literal),
            None => Self::Include(raw),
        }
    }

    /// The text compared against candidates
    pub fn literal(&self) -> &'a str {
        match self {
            Self::Include(lit) | Self::Exclude(lit) => lit,
        }
    }

    /// Whether this pattern vetoes matches
    pub fn is_negated(&self) -> bool {
        matches!(self, Self::Exclude(_))
    }

    /// Prefix test of this pattern's literal against `candidate` at `offset`
    pub fn hits(&self, candidate: &str, offset: usize) -> bool {
        region_matches(candidate, offset, self.literal())
    }
}

/// An ordered, owned collection of raw filter patterns
///
/// Deserializes from a plain list of strings, so it can sit directly in a
/// TOML or JSON configuration section.
///
/// # Examples
///
/// ```
/// use sdk::filter::PatternSet;
///
/// let set = PatternSet::from_option("com/acme;!com/acme/internal");
/// assert!(set.matches("com/acme/Service"));
/// assert!(!set.matches("com/acme/internal/Secret"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternSet {
    patterns: Vec<String>,
}

impl PatternSet {
    /// Create a set from raw pattern strings, keeping their order
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse an agent option value such as `com/acme;!com/acme/internal`
    ///
    /// Entries are separated by `;` or `,`; surrounding whitespace is trimmed
    /// and blank entries are dropped. Use [`PatternSet::new`] to keep an
    /// intentionally empty pattern.
    pub fn from_option(value: &str) -> Self {
        Self::new(
            value
                .split(OPTION_SEPARATORS)
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    /// Append a raw pattern
    pub fn push(&mut self, pattern: impl Into<String>) {
        self.patterns.push(pattern.into());
    }

    /// Iterate over the classified patterns
    pub fn iter(&self) -> impl Iterator<Item = Pattern<'_>> {
        self.patterns.iter().map(|p| Pattern::parse(p))
    }

    /// Raw pattern strings, in insertion order
    pub fn as_slice(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Match `candidate` from its first byte
    pub fn matches(&self, candidate: &str) -> bool {
        matches(candidate, self.patterns.as_slice(), 0)
    }

    /// Match `candidate` starting at byte `offset`
    pub fn matches_at(&self, candidate: &str, offset: usize) -> bool {
        matches(candidate, self.patterns.as_slice(), offset)
    }
}

impl<S: Into<String>> FromIterator<S> for PatternSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A class seen by the agent, with its direct super-class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSource {
    pub class_name: String,
    pub super_name: String,
}

impl ClassSource {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            super_name: String::new(),
        }
    }

    pub fn with_super(mut self, super_name: impl Into<String>) -> Self {
        self.super_name = super_name.into();
        self
    }

    /// Match this class against `patterns`
    ///
    /// Same rule as [`matches`] on the class name, with one additional veto:
    /// a pattern `!subclassOf:<prefix>` rejects classes whose super-class name
    /// starts with `<prefix>` at `offset`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sdk::filter::ClassSource;
    ///
    /// let patterns = ["com/acme", "!subclassOf:java/lang/Thread"];
    /// let worker = ClassSource::new("com/acme/Worker").with_super("java/lang/Thread");
    /// let service = ClassSource::new("com/acme/Service").with_super("java/lang/Object");
    /// assert!(!worker.matches(&patterns, 0));
    /// assert!(service.matches(&patterns, 0));
    /// ```
    pub fn matches<S: AsRef<str>>(&self, patterns: &[S], offset: usize) -> bool {
        let subclass_veto = patterns.iter().any(|p| {
            p.as_ref()
                .strip_prefix(SUBCLASS_MARKER)
                .is_some_and(|lit| region_matches(&self.super_name, offset, lit))
        });

        !subclass_veto && matches(&self.class_name, patterns, offset)
    }
}
