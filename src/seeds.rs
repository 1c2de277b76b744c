//! Built-in example networks.
//!
//! Used by the CLI, the integration tests and the benchmarks.

use std::fmt;

use crate::error::NetworkResult;
use crate::network::{EditOutcome, Network, NetworkConfig};

/// A bundled network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Seed {
    /// Burglary/earthquake alarm with two neighbours who call.
    Alarm,
    /// Three-node cloud → rain → wet-grass chain.
    Chain,
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alarm => write!(f, "alarm"),
            Self::Chain => write!(f, "chain"),
        }
    }
}

impl Seed {
    pub fn build(self, config: NetworkConfig) -> NetworkResult<Network> {
        match self {
            Self::Alarm => alarm_network(config),
            Self::Chain => chain_network(config),
        }
    }
}

/// The alarm network, built incrementally: bare nodes first, then parents
/// and tables node by node.
///
/// `R` (burglary) and `T` (earthquake) cause `A` (alarm); `J` and `M` are the
/// neighbours who call when they hear it.
pub fn alarm_network(config: NetworkConfig) -> NetworkResult<Network> {
    let mut net = alarm_without_m(config)?;
    define_alarm_m(&mut net)?;
    Ok(net)
}

/// The alarm network with every table except `M`'s, so it is not yet defined.
pub fn alarm_without_m(config: NetworkConfig) -> NetworkResult<Network> {
    let mut net = Network::with_config(['A', 'J', 'T', 'M', 'R'], config)?;
    let _ = net.edit_node('R', &[], &[("R", 0.001)])?;
    let _ = net.edit_node('T', &[], &[("T", 0.002)])?;
    let _ = net.edit_node(
        'A',
        &['R', 'T'],
        &[
            ("A|RT", 0.95),
            ("A|R-T", 0.94),
            ("A|-RT", 0.29),
            ("A|-R-T", 0.001),
        ],
    )?;
    let _ = net.edit_node('J', &['A'], &[("J|A", 0.9), ("J|-A", 0.5)])?;
    Ok(net)
}

/// Give `M` its parent and table, completing [`alarm_without_m`].
pub fn define_alarm_m(net: &mut Network) -> NetworkResult<EditOutcome> {
    net.edit_node('M', &['A'], &[("M|A", 0.7), ("M|-A", 0.01)])
}

/// `C` (cloudy) → `S` (rain) → `W` (wet grass).
pub fn chain_network(config: NetworkConfig) -> NetworkResult<Network> {
    let mut net = Network::with_config(['C'], config)?;
    let _ = net.edit_node('C', &[], &[("C", 0.5)])?;
    let _ = net.add_node('S', &['C'], &[("S|C", 0.8), ("S|-C", 0.2)])?;
    let _ = net.add_node('W', &['S'], &[("W|S", 0.9), ("W|-S", 0.1)])?;
    Ok(net)
}
