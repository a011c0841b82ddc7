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

//! The single collaborator contract this crate depends on.
//!
//! The surrounding network-design framework (topology, human-readable reports, CLI,
//! persistence) lives outside this crate. Everything the occupation index, first-fit assigner,
//! and propagation analyzer need from it is expressed as the [`Topology`] trait below, the same
//! way `bgpsim` threads its own domain through the `Prefix` trait instead of hard-coding a
//! concrete prefix type.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A directionless add- or drop-side module at a node, identified by the node handle and a
/// zero-based module index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionlessModule<N> {
    /// The node the module belongs to.
    pub node: N,
    /// The module's index at that node.
    pub index: usize,
}

impl<N> DirectionlessModule<N> {
    /// Create a new directionless module handle.
    pub fn new(node: N, index: usize) -> Self {
        Self { node, index }
    }
}

/// The waste-signal resource triple a lightpath exposes: fibers, add-modules, and drop-modules
/// that unintentionally carry its signal. Unlike the legitimate add/drop module (always at the
/// lightpath's own origin/destination), waste modules may belong to any node the optical fabric
/// leaks the signal to.
#[derive(Debug, Clone, Default)]
pub struct WasteResources<F, N> {
    /// Fibers that unintentionally carry the lightpath's signal.
    pub fibers: Vec<F>,
    /// Add-modules (anywhere in the network) that unintentionally carry it.
    pub add_modules: Vec<DirectionlessModule<N>>,
    /// Drop-modules (anywhere in the network) that unintentionally carry it.
    pub drop_modules: Vec<DirectionlessModule<N>>,
}

/// Bound satisfied by every opaque handle type (`Fiber`, `Node`, `Lightpath`) this crate
/// operates on: cheap to copy, totally ordered (for deterministic iteration, §5), hashable.
pub trait Handle: Copy + Eq + Ord + Hash + Debug {}
impl<T: Copy + Eq + Ord + Hash + Debug> Handle for T {}

/// The read-only contract the surrounding network model must satisfy. Implemented once by the
/// embedding application; every operation in this crate is generic over it.
///
/// This mirrors how `bgpsim::ospf::OspfImpl` bundles several related queries behind one trait
/// with associated types, rather than taking each query as a free-standing closure argument.
pub trait Topology {
    /// Opaque fiber handle.
    type Fiber: Handle;
    /// Opaque node handle.
    type Node: Handle;
    /// Opaque lightpath handle.
    type Lightpath: Handle;
    /// Identity used purely to reject cross-network arguments (see [`crate::OsmError::CrossNetwork`]).
    type NetworkId: Copy + Eq + Debug;

    /// This network's identity.
    fn network_id(&self) -> Self::NetworkId;

    /// All fibers known to the network.
    fn fibers(&self) -> Vec<Self::Fiber>;
    /// All nodes known to the network.
    fn nodes(&self) -> Vec<Self::Node>;
    /// All lightpaths known to the network.
    fn lightpaths(&self) -> Vec<Self::Lightpath>;

    /// The set of valid slot ids on `fiber`.
    fn fiber_valid_slot_ids(&self, fiber: Self::Fiber) -> BTreeSet<u32>;
    /// The minimum and maximum valid slot id on `fiber`.
    fn fiber_min_max_valid_slot(&self, fiber: Self::Fiber) -> (u32, u32);
    /// `fiber`'s physical length in kilometers.
    fn fiber_length_km(&self, fiber: Self::Fiber) -> f64;
    /// Whether `fiber` has a bidirectional partner.
    fn fiber_is_bidirectional(&self, fiber: Self::Fiber) -> bool;
    /// `fiber`'s bidirectional partner, if any.
    fn fiber_bidirectional_pair(&self, fiber: Self::Fiber) -> Option<Self::Fiber>;
    /// The origin node of `fiber`.
    fn fiber_a(&self, fiber: Self::Fiber) -> Self::Node;
    /// The destination node of `fiber`.
    fn fiber_b(&self, fiber: Self::Fiber) -> Self::Node;

    /// All fibers directly connecting `a` to `b` (in that direction).
    fn node_pair_fibers(&self, a: Self::Node, b: Self::Node) -> BTreeSet<Self::Fiber>;
    /// All fibers terminating at `node`.
    fn incoming_fibers(&self, node: Self::Node) -> BTreeSet<Self::Fiber>;
    /// Whether `node`'s optical switching architecture never creates wasted spectrum.
    fn is_never_creating_wasted_spectrum(&self, node: Self::Node) -> bool;
    /// Outgoing fibers an add operation at `node` towards `out` would illuminate.
    fn out_fibers_if_add_to_output_fiber(&self, node: Self::Node, out: Self::Fiber) -> BTreeSet<Self::Fiber>;
    /// Outgoing fibers an express connection at `node` from `input` to `output` would illuminate.
    fn out_fibers_if_express_from_input_to_output_fiber(
        &self,
        node: Self::Node,
        input: Self::Fiber,
        output: Self::Fiber,
    ) -> BTreeSet<Self::Fiber>;
    /// Outgoing fibers `node` unavoidably propagates the signal on `input` to, regardless of
    /// which output was intended.
    fn out_fibers_unavoidable_propagation_from_input_fiber(
        &self,
        node: Self::Node,
        input: Self::Fiber,
    ) -> BTreeSet<Self::Fiber>;

    /// The lightpath's legitimate, ordered sequence of fibers.
    fn lp_seq_fibers(&self, lp: Self::Lightpath) -> Vec<Self::Fiber>;
    /// The lightpath's occupied slot ids.
    fn lp_slot_ids(&self, lp: Self::Lightpath) -> BTreeSet<u32>;
    /// The add-module index used at the lightpath's origin, if any.
    fn lp_add_module(&self, lp: Self::Lightpath) -> Option<usize>;
    /// The drop-module index used at the lightpath's destination, if any.
    fn lp_drop_module(&self, lp: Self::Lightpath) -> Option<usize>;
    /// The waste-signal resources the lightpath exposes.
    fn lp_waste_resources(&self, lp: Self::Lightpath) -> WasteResources<Self::Fiber, Self::Node>;
    /// The lightpath's origin node.
    fn lp_a(&self, lp: Self::Lightpath) -> Self::Node;
    /// The lightpath's destination node.
    fn lp_b(&self, lp: Self::Lightpath) -> Self::Node;
}
