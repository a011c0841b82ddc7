// optical-spectrum-core
// Copyright 2026 the optical-spectrum-core contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Propagation analysis
//!
//! Builds a directed propagation graph over fiber handles rooted at a synthetic "add" vertex
//! and sinking into a synthetic "drop" vertex, the way `bgpsim::types::PhysicalNetwork` models
//! the IGP graph as a `petgraph` type rather than a hand-rolled adjacency list.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::error::OsmError;
use crate::topology::Topology;

/// One vertex of the propagation graph: either a real fiber or one of the two synthetic
/// sentinels marking where the signal is added or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum PNode<F> {
    Add,
    Drop,
    Fiber(F),
}

/// The result of analysing how a lightpath's signal propagates through the optical fabric.
#[derive(Debug, Clone)]
pub struct PropagationResult<F> {
    /// Every fiber the signal reaches, legitimate path included.
    pub propagated: BTreeSet<F>,
    /// Simple directed cycles in the propagation graph — unavoidable lasing loops.
    pub cycles: Vec<Vec<F>>,
    /// Whether no fiber on the legitimate path receives the signal more than once.
    pub multipath_ok: bool,
}

/// Analyse how the signal on `links` (a contiguous unicast path, `fiber_b(links[i]) ==
/// fiber_a(links[i+1])`) propagates through the optical fabric.
///
/// Fails with [`OsmError::EmptyPath`] if `links` is empty, or
/// [`OsmError::SignalNotReachingDrop`] if the propagation graph never reaches the drop point.
pub fn propagation_of<T: Topology>(net: &T, links: &[T::Fiber]) -> Result<PropagationResult<T::Fiber>, OsmError> {
    let Some(&first) = links.first() else {
        return Err(OsmError::EmptyPath);
    };

    let all_never_wasting = net.is_never_creating_wasted_spectrum(net.fiber_a(first))
        && links.iter().all(|&f| net.is_never_creating_wasted_spectrum(net.fiber_b(f)));
    if all_never_wasting {
        return Ok(PropagationResult {
            propagated: links.iter().copied().collect(),
            cycles: Vec::new(),
            multipath_ok: true,
        });
    }

    let mut graph: DiGraphMap<PNode<T::Fiber>, ()> = DiGraphMap::new();
    graph.add_node(PNode::Add);

    let mut worklist = VecDeque::new();
    worklist.push_back(PNode::Add);
    let mut processed = HashSet::new();

    while let Some(f) = worklist.pop_front() {
        if !processed.insert(f) {
            continue;
        }
        match f {
            PNode::Add => {
                let a = net.fiber_a(first);
                for p in net.out_fibers_if_add_to_output_fiber(a, first) {
                    graph.add_edge(PNode::Add, PNode::Fiber(p), ());
                    worklist.push_back(PNode::Fiber(p));
                }
            }
            PNode::Drop => {}
            PNode::Fiber(fib) => {
                let node = net.fiber_b(fib);
                for p in net.out_fibers_unavoidable_propagation_from_input_fiber(node, fib) {
                    graph.add_edge(PNode::Fiber(fib), PNode::Fiber(p), ());
                    worklist.push_back(PNode::Fiber(p));
                }
                if let Some(i) = links.iter().position(|&x| x == fib) {
                    if i + 1 < links.len() {
                        let out = links[i + 1];
                        for p in net.out_fibers_if_express_from_input_to_output_fiber(node, fib, out) {
                            graph.add_edge(PNode::Fiber(fib), PNode::Fiber(p), ());
                            worklist.push_back(PNode::Fiber(p));
                        }
                    }
                    if i + 1 == links.len() {
                        graph.add_edge(PNode::Fiber(fib), PNode::Drop, ());
                        worklist.push_back(PNode::Drop);
                    }
                }
            }
        }
    }

    if !graph.contains_node(PNode::Drop) {
        log::warn!("propagation analysis: signal never reaches the drop point");
        return Err(OsmError::SignalNotReachingDrop);
    }

    let propagated: BTreeSet<T::Fiber> = graph
        .nodes()
        .filter_map(|n| match n {
            PNode::Fiber(f) => Some(f),
            _ => None,
        })
        .collect();

    let in_degree_one = |n: PNode<T::Fiber>| graph.neighbors_directed(n, Direction::Incoming).count() == 1;
    let multipath_ok = links.iter().all(|&f| in_degree_one(PNode::Fiber(f))) && in_degree_one(PNode::Drop);

    let raw_cycles = simple_cycles(&graph);
    let cycles: Vec<Vec<T::Fiber>> = raw_cycles
        .into_iter()
        .filter_map(|cycle| cycle.into_iter().map(|n| match n { PNode::Fiber(f) => Some(f), _ => None }).collect())
        .collect();
    if !cycles.is_empty() {
        log::warn!("propagation analysis found {} lasing loop(s)", cycles.len());
    }

    Ok(PropagationResult { propagated, cycles, multipath_ok })
}

/// Build the global fiber-to-fiber graph from every node's unavoidable propagation, and return
/// every simple cycle — the network-wide unavoidable lasing loops.
pub fn unavoidable_lasing_loops<T: Topology>(net: &T) -> Vec<Vec<T::Fiber>> {
    let mut graph: DiGraphMap<T::Fiber, ()> = DiGraphMap::new();
    for node in net.nodes() {
        for input in net.incoming_fibers(node) {
            graph.add_node(input);
            for out in net.out_fibers_unavoidable_propagation_from_input_fiber(node, input) {
                graph.add_edge(input, out, ());
            }
        }
    }
    simple_cycles(&graph)
}

/// Enumerate every simple directed cycle of `graph`.
///
/// Restricts each search to the subgraph of nodes ranked at or above the cycle's starting node
/// (in the graph's total order), the same pruning Johnson's algorithm uses to avoid reporting
/// each cycle once per rotation; a dedicated cycle-enumeration crate is absent from both the
/// teacher's and the pack's dependency graphs (`SPEC_FULL.md` §9), so this is a direct DFS.
fn simple_cycles<N: Copy + Ord + Hash>(graph: &DiGraphMap<N, ()>) -> Vec<Vec<N>> {
    let mut nodes: Vec<N> = graph.nodes().collect();
    nodes.sort();

    let mut cycles = Vec::new();
    for (i, &start) in nodes.iter().enumerate() {
        let allowed: HashSet<N> = nodes[i..].iter().copied().collect();
        let mut stack = vec![start];
        let mut on_stack = HashSet::new();
        on_stack.insert(start);
        find_cycles_from(graph, start, &allowed, &mut stack, &mut on_stack, &mut cycles);
    }
    cycles
}

fn find_cycles_from<N: Copy + Ord + Hash>(
    graph: &DiGraphMap<N, ()>,
    start: N,
    allowed: &HashSet<N>,
    stack: &mut Vec<N>,
    on_stack: &mut HashSet<N>,
    out: &mut Vec<Vec<N>>,
) {
    let current = *stack.last().unwrap();
    for succ in graph.neighbors(current) {
        if succ == start {
            out.push(stack.clone());
        } else if allowed.contains(&succ) && !on_stack.contains(&succ) {
            on_stack.insert(succ);
            stack.push(succ);
            find_cycles_from(graph, start, allowed, stack, on_stack, out);
            stack.pop();
            on_stack.remove(&succ);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::FakeNetwork;
    use pretty_assertions::assert_eq;

    #[test]
    fn never_wasting_path_shortcuts_to_exact_path_p10() {
        let mut net = FakeNetwork::new();
        let f1 = net.add_fiber(0, 1, 10, 1.0);
        let f2 = net.add_fiber(1, 2, 10, 1.0);
        net.set_never_wasting(0);
        net.set_never_wasting(1);
        net.set_never_wasting(2);

        let result = propagation_of(&net, &[f1, f2]).unwrap();
        assert_eq!(result.propagated, [f1, f2].into_iter().collect());
        assert!(result.cycles.is_empty());
        assert!(result.multipath_ok);
    }

    #[test]
    fn filterless_node_leaks_onto_extra_fiber_scenario_5() {
        let mut net = FakeNetwork::new();
        let f1 = net.add_fiber(0, 1, 10, 1.0);
        let f2 = net.add_fiber(1, 2, 10, 1.0);
        let f3 = net.add_fiber(1, 3, 10, 1.0);
        net.set_never_wasting(0);
        net.set_never_wasting(2);
        net.set_never_wasting(3);
        net.set_add_rule(0, f1, [f1]);
        net.set_unavoidable_rule(1, f1, [f2, f3]);
        net.set_express_rule(1, f1, f2, [f2]);

        let result = propagation_of(&net, &[f1, f2]).unwrap();
        assert_eq!(result.propagated, [f1, f2, f3].into_iter().collect());
        assert!(result.cycles.is_empty());
        assert!(result.multipath_ok);
    }

    #[test]
    fn empty_path_is_rejected() {
        let net = FakeNetwork::new();
        assert_eq!(propagation_of(&net, &[]).unwrap_err(), OsmError::EmptyPath);
    }

    #[test]
    fn signal_never_reaching_drop_is_an_error() {
        let mut net = FakeNetwork::new();
        let f1 = net.add_fiber(0, 1, 10, 1.0);
        // no add rule at all: the add point never illuminates f1, so it never enters the
        // propagation graph and the final-link-to-drop edge is never reached.
        let _ = f1;

        assert_eq!(propagation_of(&net, &[f1]).unwrap_err(), OsmError::SignalNotReachingDrop);
    }

    #[test]
    fn three_node_ring_has_an_unavoidable_lasing_loop_scenario_6() {
        let mut net = FakeNetwork::new();
        let ab = net.add_fiber(0, 1, 10, 1.0);
        let bc = net.add_fiber(1, 2, 10, 1.0);
        let ca = net.add_fiber(2, 0, 10, 1.0);
        net.set_unavoidable_rule(1, ab, [bc]);
        net.set_unavoidable_rule(2, bc, [ca]);
        net.set_unavoidable_rule(0, ca, [ab]);

        let cycles = unavoidable_lasing_loops(&net);
        assert!(cycles.iter().any(|c| {
            let set: std::collections::HashSet<_> = c.iter().copied().collect();
            set == [ab, bc, ca].into_iter().collect()
        }));
    }
}
