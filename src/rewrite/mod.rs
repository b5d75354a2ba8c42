//! Link rewriting
//!
//! Maps recognized link patterns in free text to privacy-friendly mirror
//! domains via an ordered table of literal substitution rules.
//!
//! Rules compose left-to-right: rule *i+1* operates on the output of rule
//! *i*, not on the original text. Each rule replaces all non-overlapping
//! occurrences of its pattern. Matching is case-sensitive literal substring
//! matching; no pattern metacharacters are interpreted.

use serde::Deserialize;

/// A single literal match/replace pair.
///
/// A rule is idempotent only when its replacement does not itself contain
/// its pattern; the built-in table satisfies this, but caller-supplied
/// rules are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubstitutionRule {
    /// Literal text to match (e.g. a domain).
    pub pattern: String,
    /// Literal replacement text.
    pub replacement: String,
}

impl SubstitutionRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// An ordered list of substitution rules.
///
/// Order is significant: `mobile.twitter.com` must precede `twitter.com`
/// or the longer pattern would never match intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<SubstitutionRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<SubstitutionRule>) -> Self {
        Self { rules }
    }

    /// The built-in substitution table.
    pub fn standard() -> Self {
        Self::new(vec![
            SubstitutionRule::new("mobile.twitter.com", "nitter.net"),
            SubstitutionRule::new("twitter.com", "nitter.net"),
            SubstitutionRule::new("medium.com", "scribe.rip"),
        ])
    }

    /// Append additional rules after the existing ones.
    pub fn extend(&mut self, rules: impl IntoIterator<Item = SubstitutionRule>) {
        self.rules.extend(rules);
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    /// Apply every rule in order, replacing all occurrences of each pattern
    /// in the current text. Input with no matching pattern is returned
    /// unchanged.
    pub fn rewrite(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |text, rule| {
                text.replace(&rule.pattern, &rule.replacement)
            })
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}
