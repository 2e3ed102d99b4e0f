use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    compiler::{Compiler, Config},
    matcher::{Match, Matcher, Matches},
    nfa::NFA,
    CompileError, CompileResult,
};

/// A compiled regular expression.
///
/// A `Regex` is immutable once built. Cloning is cheap because the NFA is
/// reference counted, and a single `Regex` can be searched from many threads
/// at once: every search runs in its own [`Matcher`].
///
/// # Example
///
/// ```
/// use thompson_nfa::Regex;
///
/// let re = Regex::new("a(b|c)*d").unwrap();
/// assert!(re.is_match("abcbd"));
/// assert!(!re.is_match("abcb"));
///
/// let m = re.find("xxabdyy").unwrap();
/// assert_eq!(m.range(), 2..5);
/// ```
#[derive(Clone)]
pub struct Regex {
    pattern: Arc<str>,
    nfa: Arc<NFA>,
}

impl Regex {
    /// Compiles a pattern with the default configuration.
    ///
    /// To change the configuration, use [`RegexBuilder`].
    pub fn new(pattern: &str) -> CompileResult<Regex> {
        RegexBuilder::new(pattern).build()
    }

    /// Returns true if and only if the whole haystack matches.
    ///
    /// This allocates a fresh [`Matcher`] for each call. Use
    /// [`Regex::matcher`] to reuse buffers across many haystacks.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.matcher().is_match(haystack)
    }

    /// Returns the leftmost-longest match anywhere in the haystack.
    pub fn find<'h>(&self, haystack: &'h str) -> Option<Match<'h>> {
        self.matcher().find(haystack)
    }

    /// Returns an iterator over successive non-overlapping matches.
    ///
    /// ```
    /// use thompson_nfa::Regex;
    ///
    /// let re = Regex::new("ab+").unwrap();
    /// let found: Vec<&str> = re.find_iter("abbxabx").map(|m| m.as_str()).collect();
    /// assert_eq!(found, vec!["abb", "ab"]);
    /// ```
    pub fn find_iter<'r, 'h>(&'r self, haystack: &'h str) -> Matches<'r, 'h> {
        self.matcher().find_iter(haystack)
    }

    /// Start a new search session.
    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.nfa)
    }

    /// The pattern this regex was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The compiled NFA.
    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Regex").field(&self.as_str()).finish()
    }
}

impl FromStr for Regex {
    type Err = CompileError;

    fn from_str(s: &str) -> CompileResult<Regex> {
        Regex::new(s)
    }
}

/// A configurable builder for a [`Regex`].
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: String,
    config: Config,
}

impl RegexBuilder {
    /// Create a builder for the given pattern with the default configuration.
    pub fn new(pattern: &str) -> RegexBuilder {
        RegexBuilder { pattern: pattern.to_string(), config: Config::new() }
    }

    /// Compile the pattern.
    pub fn build(&self) -> CompileResult<Regex> {
        let mut compiler = Compiler::new();
        compiler.configure(self.config.clone());
        let nfa = compiler.compile(&self.pattern)?;
        Ok(Regex { pattern: Arc::from(self.pattern.as_str()), nfa: Arc::new(nfa) })
    }

    /// Whether `.` matches `\n`. Enabled by default.
    ///
    /// ```
    /// use thompson_nfa::RegexBuilder;
    ///
    /// let re = RegexBuilder::new("a.b").dot_matches_new_line(false).build().unwrap();
    /// assert!(re.is_match("a-b"));
    /// assert!(!re.is_match("a\nb"));
    /// ```
    pub fn dot_matches_new_line(&mut self, yes: bool) -> &mut RegexBuilder {
        self.config = self.config.clone().dot_matches_new_line(yes);
        self
    }

    /// The maximum depth to which groups may nest. Defaults to 250.
    pub fn nest_limit(&mut self, limit: u32) -> &mut RegexBuilder {
        self.config = self.config.clone().nest_limit(limit);
        self
    }
}
