//! Conditional probability tables.
//!
//! A table maps *row keys* to probabilities. A row key names the node's own
//! polarity and, after a `|`, one specific assignment of its parents:
//! `"A"`, `"-A"`, `"A|RT"`, `"-A|R-T"`. Parent letters appear in the order the
//! node lists its parents; the grammar never sorts them.
//!
//! Callers supply the positive rows only. [`ProbabilityTable::set`] derives the
//! complementary row for each of them, so a table built from `n` rows holds `2n`.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

static RE_TABLE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[A-Za-z](\|[A-Za-z-]+)?$").unwrap());

/// Marker prefix for a negated variable.
pub const NEGATION: char = '-';

// ---------------------------------------------------------------------------
// Literal
// ---------------------------------------------------------------------------

/// A variable name together with a polarity: `X` (true) or `-X` (false).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub name: char,
    pub positive: bool,
}

impl Literal {
    /// The variable held true.
    pub fn pos(name: char) -> Self {
        Self {
            name,
            positive: true,
        }
    }

    /// The variable held false.
    pub fn neg(name: char) -> Self {
        Self {
            name,
            positive: false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{NEGATION}{}", self.name)
        }
    }
}

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

/// Whether `key` matches the row-key grammar `-?X(|P...)?`.
pub fn is_valid_key(key: &str) -> bool {
    RE_TABLE_KEY.is_match(key)
}

/// The row key with the head polarity flipped and the parent suffix unchanged.
///
/// `"A|R-T"` becomes `"-A|R-T"` and vice versa.
pub fn complement_key(key: &str) -> String {
    match key.strip_prefix(NEGATION) {
        Some(positive) => positive.to_string(),
        None => format!("{NEGATION}{key}"),
    }
}

/// Build the row key for `head` under the given parent assignment.
pub fn row_key(head: Literal, parents: &[Literal]) -> String {
    let mut key = head.to_string();
    if !parents.is_empty() {
        key.push('|');
        for parent in parents {
            key.push_str(&parent.to_string());
        }
    }
    key
}

/// Reject values outside the open interval (0, 1).
pub fn check_probability(key: &str, value: f64) -> TableResult<()> {
    if !value.is_finite() {
        return Err(TableError::NonFiniteValue {
            key: key.to_string(),
            value,
        });
    }
    if !(0.0 < value && value < 1.0) {
        return Err(TableError::InvalidProbability {
            key: key.to_string(),
            value,
        });
    }
    Ok(())
}

fn check_key(key: &str) -> TableResult<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(TableError::MalformedKey {
            key: key.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Probability table
// ---------------------------------------------------------------------------

/// Row key → probability for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    rows: BTreeMap<String, f64>,
}

impl ProbabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from positive rows, deriving the complements.
    pub fn from_rows<I, K>(rows: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut table = Self::new();
        table.set(rows)?;
        Ok(table)
    }

    /// Replace the whole table with `rows` plus their complements.
    ///
    /// Every key and value is validated before anything is written; on failure
    /// the previous contents are retained. A row and its complement may not be
    /// supplied together, since the derived complement would contradict one of them.
    pub fn set<I, K>(&mut self, rows: I) -> TableResult<()>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let supplied: Vec<(String, f64)> = rows.into_iter().map(|(k, v)| (k.into(), v)).collect();

        for (key, _) in &supplied {
            check_key(key)?;
        }
        for (key, value) in &supplied {
            check_probability(key, *value)?;
        }

        let keys: HashSet<&str> = supplied.iter().map(|(k, _)| k.as_str()).collect();
        if let Some((key, _)) = supplied
            .iter()
            .find(|(k, _)| keys.contains(complement_key(k).as_str()))
        {
            return Err(TableError::ConflictingRows { key: key.clone() });
        }

        let mut rows: BTreeMap<String, f64> = supplied.iter().cloned().collect();
        for (key, value) in &supplied {
            rows.insert(complement_key(key), 1.0 - value);
        }

        tracing::trace!(supplied = supplied.len(), stored = rows.len(), "probability table set");
        self.rows = rows;
        Ok(())
    }

    /// Shallow-merge `additions` into the table.
    ///
    /// No complements are derived. Keys must still match the grammar and values
    /// must be finite; the probability range is left to the well-formedness check.
    pub fn merge<I, K>(&mut self, additions: I) -> TableResult<()>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let additions: Vec<(String, f64)> =
            additions.into_iter().map(|(k, v)| (k.into(), v)).collect();

        for (key, value) in &additions {
            check_key(key)?;
            if !value.is_finite() {
                return Err(TableError::NonFiniteValue {
                    key: key.clone(),
                    value: *value,
                });
            }
        }
        self.rows.extend(additions);
        Ok(())
    }

    /// Exact row lookup.
    pub fn probability_of(&self, key: &str) -> TableResult<f64> {
        self.rows
            .get(key)
            .copied()
            .ok_or_else(|| TableError::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Whether every stored value lies strictly inside (0, 1).
    pub fn all_in_range(&self) -> bool {
        self.rows.iter().all(|(k, v)| check_probability(k, *v).is_ok())
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.rows
    }
}
