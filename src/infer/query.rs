//! Query strings: `VARS` or `VARS|EVIDENCE`.

use std::fmt;

use crate::error::{QueryError, QueryResult};
use crate::table::{Literal, NEGATION};

/// A conditional query over literals.
///
/// Parsed queries only contain positive literals; negated ones can be built
/// directly with [`Query::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub targets: Vec<Literal>,
    pub evidence: Vec<Literal>,
}

impl Query {
    pub fn new(targets: Vec<Literal>, evidence: Vec<Literal>) -> Self {
        Self { targets, evidence }
    }

    /// Parse `"J"`, `"J|M"` or `"JM|RT"`.
    pub fn parse(expression: &str) -> QueryResult<Self> {
        let malformed = |reason: &str| QueryError::Malformed {
            query: expression.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = expression.trim();
        let mut parts = trimmed.split('|');
        let vars = parts.next().unwrap_or_default();
        let evidence = parts.next().unwrap_or_default();
        if parts.next().is_some() {
            return Err(malformed("more than one `|`"));
        }
        if vars.is_empty() {
            return Err(malformed("no query variables"));
        }

        let letters = |run: &str| -> QueryResult<Vec<Literal>> {
            run.chars()
                .map(|c| match c {
                    NEGATION => Err(malformed("negation marks are not allowed in query strings")),
                    c if c.is_ascii_alphabetic() => Ok(Literal::pos(c)),
                    c => Err(malformed(&format!("unexpected character {c:?}"))),
                })
                .collect()
        };

        Ok(Self {
            targets: letters(vars)?,
            evidence: letters(evidence)?,
        })
    }

    /// Targets followed by evidence.
    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.targets.iter().chain(self.evidence.iter())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for literal in &self.targets {
            write!(f, "{literal}")?;
        }
        if !self.evidence.is_empty() {
            f.write_str("|")?;
            for literal in &self.evidence {
                write!(f, "{literal}")?;
            }
        }
        Ok(())
    }
}
