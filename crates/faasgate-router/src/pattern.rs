//! Path patterns: literal segments plus an optional trailing wildcard.

use std::fmt;

use faasgate_model::{GateError, GateResult};

/// A registered path pattern.
///
/// A pattern is a sequence of `/`-delimited literal segments, optionally
/// terminated by a single `*` wildcard segment. The wildcard matches **one or
/// more** remaining path segments, so `/files/*` matches `/files/a` and
/// `/files/a/b` but not `/files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    literals: Vec<String>,
    wildcard: bool,
    source: String,
}

impl PathPattern {
    /// Parse a pattern string. Empty segments collapse, so `/a//b` registers
    /// as `/a/b`.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] when the pattern does not start with
    /// `/` or uses `*` anywhere but as the final segment.
    pub fn parse(pattern: &str) -> GateResult<Self> {
        if !pattern.starts_with('/') {
            return Err(GateError::config(format!(
                "path pattern must start with '/': {pattern}"
            )));
        }

        let mut literals = Vec::new();
        let mut wildcard = false;
        let segments: Vec<&str> = segments_of(pattern);
        for (idx, segment) in segments.iter().enumerate() {
            if *segment == "*" {
                if idx + 1 != segments.len() {
                    return Err(GateError::config(format!(
                        "wildcard must be the final segment: {pattern}"
                    )));
                }
                wildcard = true;
            } else if segment.contains('*') {
                return Err(GateError::config(format!(
                    "'*' is only valid as a whole trailing segment: {pattern}"
                )));
            } else {
                literals.push((*segment).to_owned());
            }
        }

        Ok(Self {
            literals,
            wildcard,
            source: pattern.to_owned(),
        })
    }

    /// Whether this pattern ends in a wildcard segment.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// The pattern as it was registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern matches the given normalized request path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let segs = segments_of(path);
        if self.wildcard {
            // The wildcard consumes one or more remaining segments.
            segs.len() > self.literals.len()
                && segs[..self.literals.len()]
                    .iter()
                    .zip(&self.literals)
                    .all(|(a, b)| a == b)
        } else {
            segs.len() == self.literals.len() && segs.iter().zip(&self.literals).all(|(a, b)| a == b)
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split a path or pattern into non-empty segments.
///
/// Repeated and trailing slashes collapse, so `/a//b/` routes like `/a/b`.
fn segments_of(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
