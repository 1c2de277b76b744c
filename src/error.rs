//! Rich diagnostic error types for akh-bayes.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers can tell exactly which part of
//! a network definition or query is at fault, fix it, and retry.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for akh-bayes.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum BayesError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),
}

// ---------------------------------------------------------------------------
// Probability table errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum TableError {
    #[error("malformed table key: \"{key}\"")]
    #[diagnostic(
        code(akh_bayes::table::malformed_key),
        help(
            "Table keys are a single letter, optionally negated, optionally followed by \
             `|` and the parent assignment, e.g. \"A\", \"A|RT\" or \"A|R-T\". \
             The whole update was rejected; the previous table is unchanged."
        )
    )]
    MalformedKey { key: String },

    #[error("value for \"{key}\" is not a finite number: {value}")]
    #[diagnostic(
        code(akh_bayes::table::non_finite),
        help("Probabilities must be finite floating-point numbers. NaN and infinities are rejected.")
    )]
    NonFiniteValue { key: String, value: f64 },

    #[error("probability for \"{key}\" must lie strictly between 0 and 1, got {value}")]
    #[diagnostic(
        code(akh_bayes::table::invalid_probability),
        help(
            "Certain events (0 or 1) are not representable in a table. \
             Use a value such as 0.999 or 0.001 instead."
        )
    )]
    InvalidProbability { key: String, value: f64 },

    #[error("row \"{key}\" was supplied together with its complement")]
    #[diagnostic(
        code(akh_bayes::table::conflicting_rows),
        help(
            "Supply only one polarity per parent assignment; the other row is derived as 1 - p. \
             The whole update was rejected; the previous table is unchanged."
        )
    )]
    ConflictingRows { key: String },

    #[error("table key not found: \"{key}\"")]
    #[diagnostic(
        code(akh_bayes::table::key_not_found),
        help(
            "The node's table has no row for this parent assignment. \
             Check `Network::is_defined()` and supply the missing rows."
        )
    )]
    KeyNotFound { key: String },
}

/// Result type for probability table operations.
pub type TableResult<T> = std::result::Result<T, TableError>;

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum NetworkError {
    #[error("unknown parents for node {node}: {missing:?}")]
    #[diagnostic(
        code(akh_bayes::network::unknown_parent),
        help(
            "All parents must already be nodes in the network. \
             Add them first with `add_node()`; the network was left unchanged."
        )
    )]
    UnknownParent { node: char, missing: Vec<char> },

    #[error("node not found: {name}")]
    #[diagnostic(
        code(akh_bayes::network::node_not_found),
        help("No node with this name exists. Add it with `add_node()` first.")
    )]
    NodeNotFound { name: char },

    #[error("cyclic dependency among nodes: {remaining:?}")]
    #[diagnostic(
        code(akh_bayes::network::cyclic_dependency),
        help(
            "These nodes (directly or transitively) list each other as parents, \
             so no topological order exists. Remove one of the parent links."
        )
    )]
    CyclicDependency { remaining: Vec<char> },

    #[error("invalid node name: {name:?}")]
    #[diagnostic(
        code(akh_bayes::network::invalid_name),
        help("Node names are single ASCII letters (case-sensitive).")
    )]
    InvalidName { name: char },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Table(#[from] TableError),
}

/// Result type for network operations.
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum QueryError {
    #[error("malformed query \"{query}\": {reason}")]
    #[diagnostic(
        code(akh_bayes::query::malformed),
        help(
            "Queries have the form \"VARS\" or \"VARS|EVIDENCE\", where both parts are \
             runs of single-letter node names, e.g. \"J|M\" or \"JM|RT\"."
        )
    )]
    Malformed { query: String, reason: String },

    #[error("query references unknown variable: {name}")]
    #[diagnostic(
        code(akh_bayes::query::unknown_variable),
        help("Every letter in a query must name a node of the network.")
    )]
    UnknownVariable { name: char },

    #[error("evidence of \"{query}\" has zero probability")]
    #[diagnostic(
        code(akh_bayes::query::zero_evidence),
        help(
            "The conditional probability is undefined because the evidence can never occur. \
             Check the evidence for contradictory literals."
        )
    )]
    ZeroEvidence { query: String },

    #[error("network is not fully defined; ill-formed nodes: {nodes:?}")]
    #[diagnostic(
        code(akh_bayes::query::not_defined),
        help(
            "Each node needs 2^(parents+1) table rows with values in (0, 1). \
             Complete the listed tables, or disable `require_defined` to query anyway."
        )
    )]
    NotDefined { nodes: Vec<char> },

    #[error("network has {nodes} nodes, enumeration is limited to {max}")]
    #[diagnostic(
        code(akh_bayes::query::too_large),
        help(
            "Exact enumeration visits 2^n assignments. \
             Raise `NetworkConfig::max_nodes` if you really want to wait."
        )
    )]
    TooLarge { nodes: usize, max: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Table(#[from] TableError),
}

/// Result type for query operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Convenience result alias using the top-level error type.
pub type BayesResult<T> = std::result::Result<T, BayesError>;
