//! Enumeration-ask over a topologically ordered network.

use std::collections::HashMap;

use crate::error::{NetworkError, QueryResult};
use crate::network::Network;
use crate::node::Node;
use crate::table::Literal;

/// Per-enumeration state: the polarity of every variable fixed so far.
///
/// Observed literals are seeded up front; unobserved variables are bound and
/// unbound as the recursion branches on them.
#[derive(Debug, Default)]
struct Assignment {
    values: HashMap<char, bool>,
}

impl Assignment {
    /// Seed with observed literals. `None` if they contradict each other.
    fn observed(literals: &[Literal]) -> Option<Self> {
        let mut values = HashMap::with_capacity(literals.len());
        for literal in literals {
            if let Some(previous) = values.insert(literal.name, literal.positive) {
                if previous != literal.positive {
                    return None;
                }
            }
        }
        Some(Self { values })
    }

    fn get(&self, name: char) -> Option<bool> {
        self.values.get(&name).copied()
    }

    fn literal(&self, name: char) -> Option<Literal> {
        self.get(name).map(|positive| Literal { name, positive })
    }
}

/// Read-only enumerator over one network snapshot.
///
/// The topological order is computed once and shared by every
/// [`enumerate_ask`](Self::enumerate_ask) call made through this value.
pub struct Enumerator<'a> {
    order: Vec<&'a Node>,
}

impl<'a> Enumerator<'a> {
    /// Order the network's nodes; fails on cyclic parent graphs.
    pub fn new(network: &'a Network) -> QueryResult<Self> {
        Ok(Self {
            order: network.topological_order()?,
        })
    }

    /// Nodes in processing order.
    pub fn order(&self) -> &[&'a Node] {
        &self.order
    }

    /// Sum of the joint distribution over every assignment in which all of
    /// `targets` and `context` hold.
    pub fn enumerate_ask(&self, targets: &[Literal], context: &[Literal]) -> QueryResult<f64> {
        let observed: Vec<Literal> = targets.iter().chain(context).copied().collect();
        let Some(mut assignment) = Assignment::observed(&observed) else {
            tracing::debug!(?observed, "contradictory literals, joint probability is zero");
            return Ok(0.0);
        };
        self.enumerate_all(0, &mut assignment)
    }

    fn enumerate_all(&self, index: usize, assignment: &mut Assignment) -> QueryResult<f64> {
        let Some(node) = self.order.get(index) else {
            return Ok(1.0);
        };
        let name = node.name();

        let parents = node
            .parents()
            .iter()
            .map(|&p| {
                assignment
                    .literal(p)
                    .ok_or(NetworkError::NodeNotFound { name: p })
            })
            .collect::<Result<Vec<Literal>, _>>()?;

        if let Some(positive) = assignment.get(name) {
            let p = node.conditional(Literal { name, positive }, &parents)?;
            return Ok(p * self.enumerate_all(index + 1, assignment)?);
        }

        let p_true = node.conditional(Literal::pos(name), &parents)?;
        let p_false = 1.0 - p_true;

        assignment.values.insert(name, true);
        let when_true = self.enumerate_all(index + 1, assignment);
        assignment.values.insert(name, false);
        let when_false = self.enumerate_all(index + 1, assignment);
        assignment.values.remove(&name);

        Ok(p_true * when_true? + p_false * when_false?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{QueryError, TableError};

    const EPS: f64 = 1e-12;

    fn pair() -> Network {
        let mut net = Network::new(['A', 'B']).unwrap();
        let _ = net.edit_node('A', &[], &[("A", 0.25)]).unwrap();
        let _ = net.edit_node('B', &['A'], &[("B|A", 0.8), ("B|-A", 0.4)]).unwrap();
        net
    }

    #[test]
    fn empty_observation_sums_to_one() {
        let net = pair();
        let e = Enumerator::new(&net).unwrap();
        assert!((e.enumerate_ask(&[], &[]).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn joint_of_observed_literals() {
        let net = pair();
        let e = Enumerator::new(&net).unwrap();
        let both = e
            .enumerate_ask(&[Literal::pos('B')], &[Literal::pos('A')])
            .unwrap();
        assert!((both - 0.25 * 0.8).abs() < EPS);

        let b = e.enumerate_ask(&[Literal::pos('B')], &[]).unwrap();
        assert!((b - (0.25 * 0.8 + 0.75 * 0.4)).abs() < EPS);
    }

    #[test]
    fn negated_literal_reads_complement_row() {
        let net = pair();
        let e = Enumerator::new(&net).unwrap();
        let p = e
            .enumerate_ask(&[Literal::neg('B')], &[Literal::neg('A')])
            .unwrap();
        assert!((p - 0.75 * 0.6).abs() < EPS);
    }

    #[test]
    fn contradiction_is_zero() {
        let net = pair();
        let e = Enumerator::new(&net).unwrap();
        let p = e
            .enumerate_ask(&[Literal::pos('A')], &[Literal::neg('A')])
            .unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn missing_row_fails_fast() {
        let mut net = pair();
        let _ = net.edit_node('B', &[], &[("B|A", 0.8)]).unwrap();
        let e = Enumerator::new(&net).unwrap();
        assert_eq!(
            e.enumerate_ask(&[Literal::pos('B')], &[]),
            Err(QueryError::Table(TableError::KeyNotFound {
                key: "B|-A".into()
            }))
        );
    }

    #[test]
    fn order_puts_roots_first() {
        let net = pair();
        let e = Enumerator::new(&net).unwrap();
        let names: Vec<char> = e.order().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!['A', 'B']);
    }
}
