// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # akh-bayes
//!
//! Discrete Bayesian networks over boolean variables, with exact inference by
//! enumeration.
//!
//! ## Architecture
//!
//! - **Tables** (`table`): conditional probability rows keyed `A|R-T`, complements derived
//! - **Nodes** (`node`): single-letter variables with ordered parents
//! - **Network** (`network`): name-keyed node store, topological order, query facade
//! - **Inference** (`infer`): query parsing and enumeration-ask
//!
//! ## Library usage
//!
//! ```
//! use akh_bayes::network::Network;
//!
//! let mut net = Network::new(['R', 'A']).unwrap();
//! let _ = net.edit_node('R', &[], &[("R", 0.01)]).unwrap();
//! let _ = net.edit_node('A', &['R'], &[("A|R", 0.9), ("A|-R", 0.05)]).unwrap();
//! assert!(net.is_defined());
//!
//! let p = net.query("R|A").unwrap();
//! assert!((p - 0.009 / (0.009 + 0.0495)).abs() < 1e-9);
//! ```

pub mod error;
pub mod export;
pub mod infer;
pub mod network;
pub mod node;
pub mod seeds;
pub mod table;
