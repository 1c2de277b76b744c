//! Network facade: owns the nodes and answers queries.
//!
//! Nodes are keyed by their single-letter name. Insertion order is kept
//! alongside the map because it is the tie-breaker for topological ordering
//! and the order of factor dumps.

use std::collections::{HashMap, HashSet};

use crate::error::{NetworkError, NetworkResult, QueryError, QueryResult};
use crate::infer::enumerate::Enumerator;
use crate::infer::query::Query;
use crate::infer::QueryAnswer;
use crate::node::Node;
use crate::table::ProbabilityTable;

/// Configuration for a network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Largest network a query will enumerate.
    ///
    /// The work is 2^n, so the default of 24 deliberately refuses larger but
    /// otherwise well-defined networks. Raise it here or with `--max-nodes`.
    pub max_nodes: usize,
    /// Refuse to query while any node is ill-formed.
    pub require_defined: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_nodes: 24,
            require_defined: true,
        }
    }
}

/// What a mutating call did.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The network changed.
    Applied,
    /// Nothing to do: duplicate add, or edit of a missing node.
    Ignored,
}

/// A discrete Bayesian network over boolean variables.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    nodes: HashMap<char, Node>,
    /// Names in insertion order.
    order: Vec<char>,
}

impl Network {
    /// Create a network of bare nodes (no parents, empty tables).
    pub fn new(names: impl IntoIterator<Item = char>) -> NetworkResult<Self> {
        Self::with_config(names, NetworkConfig::default())
    }

    /// Create a network with an explicit configuration.
    pub fn with_config(
        names: impl IntoIterator<Item = char>,
        config: NetworkConfig,
    ) -> NetworkResult<Self> {
        let mut network = Self {
            config,
            nodes: HashMap::new(),
            order: Vec::new(),
        };
        for name in names {
            let _ = network.add_node(name, &[], &[])?;
        }
        Ok(network)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: char) -> bool {
        self.nodes.contains_key(&name)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|name| self.nodes.get(name))
    }

    pub fn get_node(&self, name: char) -> NetworkResult<&Node> {
        self.nodes
            .get(&name)
            .ok_or(NetworkError::NodeNotFound { name })
    }

    /// Add a node. A name already present is left untouched.
    ///
    /// An empty `table` leaves the node's table empty; otherwise the rows are
    /// routed through [`ProbabilityTable::set`].
    pub fn add_node(
        &mut self,
        name: char,
        parents: &[char],
        table: &[(&str, f64)],
    ) -> NetworkResult<EditOutcome> {
        if self.contains(name) {
            tracing::warn!(node = %name, "node already in network, not adding");
            return Ok(EditOutcome::Ignored);
        }

        self.check_parents(name, parents)?;
        let node = if table.is_empty() {
            let mut node = Node::new(name)?;
            node.set_parents(parents.to_vec());
            node
        } else {
            Node::with_table(name, parents.to_vec(), table.iter().copied())?
        };

        tracing::debug!(node = %node, "node added");
        self.nodes.insert(name, node);
        self.order.push(name);
        Ok(EditOutcome::Applied)
    }

    /// Replace a node's table and/or parents.
    ///
    /// Empty `parents` or `table` mean "leave as is". Both are validated before
    /// either is written, so a failed edit leaves the node unchanged.
    pub fn edit_node(
        &mut self,
        name: char,
        parents: &[char],
        table: &[(&str, f64)],
    ) -> NetworkResult<EditOutcome> {
        if !self.contains(name) {
            tracing::warn!(node = %name, "node not in network, use add_node() to add it");
            return Ok(EditOutcome::Ignored);
        }

        let new_table = if table.is_empty() {
            None
        } else {
            Some(ProbabilityTable::from_rows(table.iter().copied())?)
        };
        if !parents.is_empty() {
            self.check_parents(name, parents)?;
        }

        let node = self
            .nodes
            .get_mut(&name)
            .ok_or(NetworkError::NodeNotFound { name })?;
        if let Some(new_table) = new_table {
            *node.table_mut() = new_table;
        }
        if !parents.is_empty() {
            node.set_parents(parents.to_vec());
        }

        tracing::debug!(node = %node, rows = node.table().len(), "node edited");
        Ok(EditOutcome::Applied)
    }

    /// Merge extra rows into a node's table without deriving complements.
    pub fn merge_table(&mut self, name: char, additions: &[(&str, f64)]) -> NetworkResult<()> {
        let node = self
            .nodes
            .get_mut(&name)
            .ok_or(NetworkError::NodeNotFound { name })?;
        node.table_mut().merge(additions.iter().copied())?;
        Ok(())
    }

    fn check_parents(&self, node: char, parents: &[char]) -> NetworkResult<()> {
        let missing: Vec<char> = parents
            .iter()
            .copied()
            .filter(|p| !self.contains(*p))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(NetworkError::UnknownParent { node, missing })
        }
    }

    /// Every node is well-formed.
    pub fn is_defined(&self) -> bool {
        self.nodes().all(Node::is_well_formed)
    }

    /// Names of nodes that are not well-formed, in insertion order.
    pub fn ill_formed(&self) -> Vec<char> {
        self.nodes()
            .filter(|n| !n.is_well_formed())
            .map(Node::name)
            .collect()
    }

    /// Nodes ordered so that each follows all of its parents.
    ///
    /// Roots come first in insertion order; then repeated passes over the rest
    /// append every node whose parents are all placed. A pass that places
    /// nothing means the remaining nodes form (or depend on) a cycle.
    pub fn topological_order(&self) -> NetworkResult<Vec<&Node>> {
        let mut ordered: Vec<&Node> = Vec::with_capacity(self.len());
        let mut placed: HashSet<char> = HashSet::with_capacity(self.len());
        let mut remaining: Vec<&Node> = Vec::new();

        for node in self.nodes() {
            if node.parents().is_empty() {
                placed.insert(node.name());
                ordered.push(node);
            } else {
                remaining.push(node);
            }
        }

        while !remaining.is_empty() {
            let before = remaining.len();
            remaining.retain(|node| {
                if node.parents().iter().all(|p| placed.contains(p)) {
                    placed.insert(node.name());
                    ordered.push(*node);
                    false
                } else {
                    true
                }
            });
            if remaining.len() == before {
                return Err(NetworkError::CyclicDependency {
                    remaining: remaining.iter().map(|n| n.name()).collect(),
                });
            }
        }

        Ok(ordered)
    }

    /// Concatenated `P(...)` forms in topological order, e.g. `P(R)P(T)P(A|RT)`.
    pub fn topological_order_string(&self) -> NetworkResult<String> {
        Ok(self
            .topological_order()?
            .iter()
            .map(|n| n.to_string())
            .collect())
    }

    /// Every node's table, in insertion order.
    pub fn show_factors(&self) -> Vec<(char, &ProbabilityTable)> {
        self.nodes().map(|n| (n.name(), n.table())).collect()
    }

    /// `P(VARS | EVIDENCE)` for a query string such as `"J|M"`.
    pub fn query(&self, expression: &str) -> QueryResult<f64> {
        Ok(self.answer(expression)?.probability)
    }

    /// Like [`query`](Self::query), keeping the intermediate sums.
    pub fn answer(&self, expression: &str) -> QueryResult<QueryAnswer> {
        let query = Query::parse(expression)?;
        self.query_literals(&query)
    }

    /// Answer a typed query. Literals may be negated here.
    pub fn query_literals(&self, query: &Query) -> QueryResult<QueryAnswer> {
        if self.len() > self.config.max_nodes {
            return Err(QueryError::TooLarge {
                nodes: self.len(),
                max: self.config.max_nodes,
            });
        }
        if self.config.require_defined {
            let nodes = self.ill_formed();
            if !nodes.is_empty() {
                return Err(QueryError::NotDefined { nodes });
            }
        }
        if let Some(unknown) = query.literals().find(|l| !self.contains(l.name)) {
            return Err(QueryError::UnknownVariable { name: unknown.name });
        }

        let enumerator = Enumerator::new(self)?;
        let evidence_probability = enumerator.enumerate_ask(&query.evidence, &[])?;
        if evidence_probability == 0.0 {
            return Err(QueryError::ZeroEvidence {
                query: query.to_string(),
            });
        }
        let joint_probability = enumerator.enumerate_ask(&query.targets, &query.evidence)?;

        tracing::debug!(
            query = %query,
            evidence = evidence_probability,
            joint = joint_probability,
            "enumeration finished"
        );

        Ok(QueryAnswer {
            query: query.to_string(),
            probability: joint_probability / evidence_probability,
            joint_probability,
            evidence_probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;

    fn chain() -> Network {
        let mut net = Network::new(['A', 'B', 'C']).unwrap();
        let _ = net.edit_node('A', &[], &[("A", 0.3)]).unwrap();
        let _ = net.edit_node('B', &['A'], &[("B|A", 0.8), ("B|-A", 0.1)]).unwrap();
        let _ = net.edit_node('C', &['B'], &[("C|B", 0.6), ("C|-B", 0.2)]).unwrap();
        net
    }

    #[test]
    fn new_creates_bare_nodes() {
        let net = Network::new(['A', 'J', 'T']).unwrap();
        assert_eq!(net.len(), 3);
        assert!(!net.is_defined());
        assert_eq!(net.ill_formed(), vec!['A', 'J', 'T']);
        assert!(Network::new(['A', '7']).is_err());
    }

    #[test]
    fn add_duplicate_is_ignored() {
        let mut net = chain();
        let before = net.get_node('B').unwrap().table().clone();
        let outcome = net.add_node('B', &[], &[("B", 0.5)]).unwrap();
        assert_eq!(outcome, EditOutcome::Ignored);
        assert_eq!(net.len(), 3);
        assert_eq!(net.get_node('B').unwrap().table(), &before);
    }

    #[test]
    fn add_with_unknown_parent_fails() {
        let mut net = chain();
        let err = net.add_node('D', &['C', 'X', 'Y'], &[]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::UnknownParent {
                node: 'D',
                missing: vec!['X', 'Y']
            }
        );
        assert!(!net.contains('D'));
    }

    #[test]
    fn add_routes_table_through_set() {
        let mut net = chain();
        let outcome = net
            .add_node('D', &['C'], &[("D|C", 0.5), ("D|-C", 0.25)])
            .unwrap();
        assert_eq!(outcome, EditOutcome::Applied);
        assert_eq!(net.get_node('D').unwrap().table().len(), 4);
        assert!(net.is_defined());
    }

    #[test]
    fn edit_missing_node_is_ignored() {
        let mut net = chain();
        assert_eq!(net.edit_node('Z', &[], &[("Z", 0.5)]).unwrap(), EditOutcome::Ignored);
        assert_eq!(net.len(), 3);
    }

    #[test]
    fn failed_edit_leaves_node_unchanged() {
        let mut net = chain();
        let err = net.edit_node('C', &['Q'], &[("C|A", 0.5)]).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownParent { .. }));
        let node = net.get_node('C').unwrap();
        assert_eq!(node.parents(), &['B']);
        assert!(node.table().contains_key("C|B"));

        let err = net.edit_node('C', &[], &[("C||B", 0.5)]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::Table(TableError::MalformedKey { key: "C||B".into() })
        );
        assert!(net.is_defined());

        let err = net
            .edit_node('C', &['B'], &[("C|B", 0.3), ("-C|B", 0.6)])
            .unwrap_err();
        assert_eq!(
            err,
            NetworkError::Table(TableError::ConflictingRows { key: "C|B".into() })
        );
        let kept = net.get_node('C').unwrap().table().probability_of("C|B").unwrap();
        assert!((kept - 0.6).abs() < 1e-12);
    }

    #[test]
    fn edit_is_idempotent() {
        let rows = [("B|A", 0.7), ("B|-A", 0.05)];
        let mut once = chain();
        let _ = once.edit_node('B', &['A'], &rows).unwrap();
        let mut twice = chain();
        let _ = twice.edit_node('B', &['A'], &rows).unwrap();
        let _ = twice.edit_node('B', &['A'], &rows).unwrap();
        assert_eq!(
            once.get_node('B').unwrap().table(),
            twice.get_node('B').unwrap().table()
        );
    }

    #[test]
    fn merge_table_targets_existing_node() {
        let mut net = chain();
        net.merge_table('A', &[("A", 0.4)]).unwrap();
        let p = net.get_node('A').unwrap().prior().unwrap();
        assert!((p - 0.4).abs() < 1e-12);
        assert_eq!(
            net.merge_table('Z', &[("Z", 0.4)]),
            Err(NetworkError::NodeNotFound { name: 'Z' })
        );
    }

    #[test]
    fn topological_order_places_parents_first() {
        let mut net = Network::new(['C', 'B', 'A']).unwrap();
        let _ = net.edit_node('B', &['A'], &[]).unwrap();
        let _ = net.edit_node('C', &['B'], &[]).unwrap();
        assert_eq!(net.topological_order_string().unwrap(), "P(A)P(B|A)P(C|B)");
    }

    #[test]
    fn topological_order_detects_cycles() {
        let mut net = Network::new(['A', 'B', 'C', 'D']).unwrap();
        let _ = net.edit_node('A', &['B'], &[]).unwrap();
        let _ = net.edit_node('B', &['A'], &[]).unwrap();
        let _ = net.edit_node('D', &['C'], &[]).unwrap();
        assert_eq!(
            net.topological_order().map(|o| o.len()),
            Err(NetworkError::CyclicDependency {
                remaining: vec!['A', 'B']
            })
        );
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let mut net = Network::new(['A']).unwrap();
        let _ = net.edit_node('A', &['A'], &[]).unwrap();
        assert!(matches!(
            net.topological_order(),
            Err(NetworkError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn show_factors_in_insertion_order() {
        let net = chain();
        let names: Vec<char> = net.show_factors().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!['A', 'B', 'C']);
    }

    #[test]
    fn chain_marginal() {
        let net = chain();
        // P(C) = sum_b P(C|b) P(b), P(B) = 0.8*0.3 + 0.1*0.7 = 0.31
        let expected = 0.6 * 0.31 + 0.2 * 0.69;
        assert!((net.query("C").unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn query_requires_defined_network() {
        let mut net = chain();
        let _ = net.add_node('D', &['C'], &[]).unwrap();
        assert_eq!(
            net.query("C"),
            Err(QueryError::NotDefined { nodes: vec!['D'] })
        );
    }

    #[test]
    fn query_respects_max_nodes() {
        let config = NetworkConfig {
            max_nodes: 2,
            ..Default::default()
        };
        let net = Network::with_config(['A', 'B', 'C'], config).unwrap();
        assert_eq!(
            net.query("A"),
            Err(QueryError::TooLarge { nodes: 3, max: 2 })
        );
    }

    #[test]
    fn default_cap_refuses_defined_25_node_chain() {
        let names: Vec<char> = ('A'..='Y').collect();
        let mut net = Network::new([names[0]]).unwrap();
        let _ = net.edit_node(names[0], &[], &[("A", 0.5)]).unwrap();
        for pair in names.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let on = format!("{child}|{parent}");
            let off = format!("{child}|-{parent}");
            let _ = net
                .add_node(child, &[parent], &[(on.as_str(), 0.7), (off.as_str(), 0.2)])
                .unwrap();
        }

        assert_eq!(net.len(), 25);
        assert!(net.is_defined());
        assert_eq!(
            net.query("Y|A"),
            Err(QueryError::TooLarge { nodes: 25, max: 24 })
        );
    }
}
