//! Export types for serializing network state.
//!
//! These types give a stable, human-readable shape to the factor dump and
//! topological order, suitable for JSON output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::NetworkResult;
use crate::network::Network;

/// One node's conditional table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorExport {
    /// Node name.
    pub name: char,
    /// Canonical notation, e.g. `P(A|RT)`.
    pub notation: String,
    /// Parent names in key order.
    pub parents: Vec<char>,
    /// Row key → probability.
    pub rows: BTreeMap<String, f64>,
    pub well_formed: bool,
}

/// A whole network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkExport {
    pub defined: bool,
    /// Node names in topological order.
    pub order: Vec<char>,
    /// Factors in insertion order.
    pub factors: Vec<FactorExport>,
}

/// Factors in insertion order.
pub fn export_factors(network: &Network) -> Vec<FactorExport> {
    network
        .nodes()
        .map(|node| FactorExport {
            name: node.name(),
            notation: node.to_string(),
            parents: node.parents().to_vec(),
            rows: node.table().as_map().clone(),
            well_formed: node.is_well_formed(),
        })
        .collect()
}

/// Factors plus topological order. Fails on cyclic networks.
pub fn export_network(network: &Network) -> NetworkResult<NetworkExport> {
    Ok(NetworkExport {
        defined: network.is_defined(),
        order: network
            .topological_order()?
            .iter()
            .map(|n| n.name())
            .collect(),
        factors: export_factors(network),
    })
}
