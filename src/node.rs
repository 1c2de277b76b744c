//! Boolean random variables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, NetworkResult, TableResult};
use crate::table::{Literal, ProbabilityTable, row_key};

/// Whether `name` can identify a node: a single ASCII letter.
pub fn is_valid_name(name: char) -> bool {
    name.is_ascii_alphabetic()
}

/// A named boolean variable with ordered parents and its conditional table.
///
/// Nodes are identified by name alone: two nodes with the same name compare
/// equal whatever their parents or tables. The [`Network`](crate::network::Network)
/// keys them by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    name: char,
    parents: Vec<char>,
    table: ProbabilityTable,
}

impl Node {
    /// A bare node: no parents, empty table.
    pub fn new(name: char) -> NetworkResult<Self> {
        if !is_valid_name(name) {
            return Err(NetworkError::InvalidName { name });
        }
        Ok(Self {
            name,
            parents: Vec::new(),
            table: ProbabilityTable::new(),
        })
    }

    /// A node with parents and a table built from positive rows.
    pub fn with_table<I, K>(name: char, parents: Vec<char>, rows: I) -> NetworkResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut node = Self::new(name)?;
        node.parents = parents;
        node.table.set(rows)?;
        Ok(node)
    }

    pub fn name(&self) -> char {
        self.name
    }

    pub fn parents(&self) -> &[char] {
        &self.parents
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut ProbabilityTable {
        &mut self.table
    }

    /// Replace the parent list. Referential checks belong to the network.
    pub fn set_parents(&mut self, parents: Vec<char>) {
        self.parents = parents;
    }

    /// Number of rows a complete table holds: `2^|parents| * 2`.
    pub fn expected_rows(&self) -> usize {
        2usize << self.parents.len()
    }

    /// Complete and numerically valid.
    ///
    /// Under- or over-populated tables yield `false` rather than an error so
    /// networks can be assembled incrementally.
    pub fn is_well_formed(&self) -> bool {
        is_valid_name(self.name)
            && self.table.len() == self.expected_rows()
            && self.table.all_in_range()
    }

    /// Probability of `head` given the parent polarities, in parent-list order.
    pub fn conditional(&self, head: Literal, parents: &[Literal]) -> TableResult<f64> {
        self.table.probability_of(&row_key(head, parents))
    }

    /// The unconditional entry `P(name)`; only root nodes carry one.
    pub fn prior(&self) -> TableResult<f64> {
        self.conditional(Literal::pos(self.name), &[])
    }

    /// Short debugging form, `(Node X)`.
    pub fn repr(&self) -> String {
        format!("(Node {})", self.name)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Node {
    /// `P(A|RT)`, or `P(R)` for a root.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P({}", self.name)?;
        if !self.parents.is_empty() {
            f.write_str("|")?;
            for parent in &self.parents {
                write!(f, "{parent}")?;
            }
        }
        f.write_str(")")
    }
}
