//! Dependency order between railways.
//!
//! A railway that borrows from another can only be composed once its donor
//! is. The order is computed once per network and is stable: railways keep
//! their declared order unless a dependency forces one earlier.

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::models::topology::{Network, RailwayTopology, SublineSpec};
use crate::models::types::{RailmeshError, Result};

/// Railways of `network` ordered so every donor precedes its borrowers.
pub fn dependency_order(network: &Network) -> Result<Vec<&RailwayTopology>> {
    let railways = network.railways();
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(railways.len(), 0);
    let nodes: Vec<NodeIndex> = (0..railways.len()).map(|i| graph.add_node(i)).collect();
    let positions: HashMap<_, _> = railways.iter().enumerate().map(|(i, r)| (&r.id, i)).collect();

    for (borrower, railway) in railways.iter().enumerate() {
        for source in railway.sublines.iter().filter_map(SublineSpec::borrowed_from) {
            let donor = *positions
                .get(source)
                .ok_or_else(|| RailmeshError::RailwayNotFound(source.clone()))?;

            if donor == borrower {
                return Err(RailmeshError::DependencyCycle(railway.id.clone()));
            }
            graph.update_edge(nodes[donor], nodes[borrower], ());
        }
    }

    let mut in_degree: Vec<usize> = nodes
        .iter()
        .map(|n| graph.neighbors_directed(*n, Direction::Incoming).count())
        .collect();
    let mut ready: BTreeSet<usize> = (0..railways.len()).filter(|i| in_degree[*i] == 0).collect();
    let mut ordered = Vec::with_capacity(railways.len());

    while let Some(next) = ready.pop_first() {
        ordered.push(&railways[next]);

        for borrower in graph.neighbors_directed(nodes[next], Direction::Outgoing) {
            let borrower = graph[borrower];
            in_degree[borrower] -= 1;
            if in_degree[borrower] == 0 {
                ready.insert(borrower);
            }
        }
    }

    if ordered.len() < railways.len() {
        let stuck = (0..railways.len())
            .find(|i| in_degree[*i] > 0)
            .map(|i| railways[i].id.clone())
            .unwrap_or_else(|| railways[0].id.clone());
        return Err(RailmeshError::DependencyCycle(stuck));
    }

    Ok(ordered)
}
