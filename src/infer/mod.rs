//! Exact inference by enumeration.
//!
//! A query `P(VARS | EVIDENCE)` is answered as the ratio of two sums over the
//! full joint distribution: `P(VARS, EVIDENCE)` divided by `P(EVIDENCE)`.
//! Both sums walk the nodes in topological order and branch on every variable
//! the query does not fix.

pub mod enumerate;
pub mod query;

use serde::{Deserialize, Serialize};

pub use enumerate::Enumerator;
pub use query::Query;

/// The result of a query together with the two enumeration sums behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// The query in `VARS|EVIDENCE` notation.
    pub query: String,
    /// `P(VARS | EVIDENCE)`.
    pub probability: f64,
    /// `P(VARS, EVIDENCE)`, the numerator.
    pub joint_probability: f64,
    /// `P(EVIDENCE)`, the normalizing constant.
    pub evidence_probability: f64,
}
