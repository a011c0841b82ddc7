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

//! A minimal in-memory [`Topology`] used by this crate's own tests, the same way
//! `bgpsim::test` builds small hand-rolled networks rather than pulling in topology_zoo.

use std::collections::BTreeSet;

use crate::topology::{Topology, WasteResources};

#[derive(Debug, Clone, Default)]
struct FiberData {
    a: u32,
    b: u32,
    valid_slots: BTreeSet<u32>,
    length_km: f64,
    bidi_pair: Option<u32>,
}

#[derive(Debug, Clone, Default)]
struct LightpathData {
    fibers: Vec<u32>,
    slots: BTreeSet<u32>,
    add_module: Option<usize>,
    drop_module: Option<usize>,
    waste: WasteResources<u32, u32>,
}

/// A fake network built up by hand for tests: fibers and nodes are plain `u32` handles, and
/// every switching-architecture query is answered from tables populated by the test itself.
#[derive(Debug, Clone, Default)]
pub struct FakeNetwork {
    id: u64,
    fibers: std::collections::BTreeMap<u32, FiberData>,
    lightpaths: std::collections::BTreeMap<u32, LightpathData>,
    never_wasting_nodes: BTreeSet<u32>,
    add_rules: std::collections::BTreeMap<(u32, u32), BTreeSet<u32>>,
    express_rules: std::collections::BTreeMap<(u32, u32, u32), BTreeSet<u32>>,
    unavoidable_rules: std::collections::BTreeMap<(u32, u32), BTreeSet<u32>>,
    next_fiber: u32,
    next_lp: u32,
}

impl FakeNetwork {
    /// A fresh, empty network with the given identity.
    pub fn with_id(id: u64) -> Self {
        Self { id, ..Default::default() }
    }

    /// A fresh, empty network.
    pub fn new() -> Self {
        Self::with_id(0)
    }

    /// Add a fiber `a -> b` with valid slots `0..=max_slot` and the given length, returning its
    /// handle.
    pub fn add_fiber(&mut self, a: u32, b: u32, max_slot: u32, length_km: f64) -> u32 {
        let id = self.next_fiber;
        self.next_fiber += 1;
        self.fibers.insert(
            id,
            FiberData {
                a,
                b,
                valid_slots: (0..=max_slot).collect(),
                length_km,
                bidi_pair: None,
            },
        );
        id
    }

    /// Add a bidirectional pair of fibers `a <-> b`, returning `(ab, ba)`.
    pub fn add_bidi_fiber(&mut self, a: u32, b: u32, max_slot: u32, length_km: f64) -> (u32, u32) {
        let ab = self.add_fiber(a, b, max_slot, length_km);
        let ba = self.add_fiber(b, a, max_slot, length_km);
        self.fibers.get_mut(&ab).unwrap().bidi_pair = Some(ba);
        self.fibers.get_mut(&ba).unwrap().bidi_pair = Some(ab);
        (ab, ba)
    }

    /// Mark `node`'s architecture as never creating wasted spectrum.
    pub fn set_never_wasting(&mut self, node: u32) {
        self.never_wasting_nodes.insert(node);
    }

    /// Set what `out_fibers_if_add_to_output_fiber(node, out)` returns.
    pub fn set_add_rule(&mut self, node: u32, out: u32, result: impl IntoIterator<Item = u32>) {
        self.add_rules.insert((node, out), result.into_iter().collect());
    }

    /// Set what `out_fibers_if_express_from_input_to_output_fiber(node, input, output)` returns.
    pub fn set_express_rule(&mut self, node: u32, input: u32, output: u32, result: impl IntoIterator<Item = u32>) {
        self.express_rules.insert((node, input, output), result.into_iter().collect());
    }

    /// Set what `out_fibers_unavoidable_propagation_from_input_fiber(node, input)` returns.
    pub fn set_unavoidable_rule(&mut self, node: u32, input: u32, result: impl IntoIterator<Item = u32>) {
        self.unavoidable_rules.insert((node, input), result.into_iter().collect());
    }

    /// Register a lightpath and return its handle.
    pub fn add_lightpath(
        &mut self,
        fibers: &[u32],
        slots: impl IntoIterator<Item = u32>,
        add_module: Option<usize>,
        drop_module: Option<usize>,
    ) -> u32 {
        let id = self.next_lp;
        self.next_lp += 1;
        self.lightpaths.insert(
            id,
            LightpathData {
                fibers: fibers.to_vec(),
                slots: slots.into_iter().collect(),
                add_module,
                drop_module,
                waste: WasteResources::default(),
            },
        );
        id
    }

    /// Set the waste-signal resources a lightpath exposes.
    pub fn set_waste(&mut self, lp: u32, waste: WasteResources<u32, u32>) {
        self.lightpaths.get_mut(&lp).unwrap().waste = waste;
    }

    /// Override a fiber's valid slot-id range to `lo..=hi`.
    pub fn set_valid_slot_range(&mut self, fiber: u32, lo: u32, hi: u32) {
        self.fibers.get_mut(&fiber).unwrap().valid_slots = (lo..=hi).collect();
    }
}

impl Topology for FakeNetwork {
    type Fiber = u32;
    type Node = u32;
    type Lightpath = u32;
    type NetworkId = u64;

    fn network_id(&self) -> u64 {
        self.id
    }

    fn fibers(&self) -> Vec<u32> {
        self.fibers.keys().copied().collect()
    }

    fn nodes(&self) -> Vec<u32> {
        let mut nodes: BTreeSet<u32> = BTreeSet::new();
        for f in self.fibers.values() {
            nodes.insert(f.a);
            nodes.insert(f.b);
        }
        nodes.into_iter().collect()
    }

    fn lightpaths(&self) -> Vec<u32> {
        self.lightpaths.keys().copied().collect()
    }

    fn fiber_valid_slot_ids(&self, fiber: u32) -> BTreeSet<u32> {
        self.fibers[&fiber].valid_slots.clone()
    }

    fn fiber_min_max_valid_slot(&self, fiber: u32) -> (u32, u32) {
        let slots = &self.fibers[&fiber].valid_slots;
        (*slots.iter().next().unwrap(), *slots.iter().next_back().unwrap())
    }

    fn fiber_length_km(&self, fiber: u32) -> f64 {
        self.fibers[&fiber].length_km
    }

    fn fiber_is_bidirectional(&self, fiber: u32) -> bool {
        self.fibers[&fiber].bidi_pair.is_some()
    }

    fn fiber_bidirectional_pair(&self, fiber: u32) -> Option<u32> {
        self.fibers[&fiber].bidi_pair
    }

    fn fiber_a(&self, fiber: u32) -> u32 {
        self.fibers[&fiber].a
    }

    fn fiber_b(&self, fiber: u32) -> u32 {
        self.fibers[&fiber].b
    }

    fn node_pair_fibers(&self, a: u32, b: u32) -> BTreeSet<u32> {
        self.fibers.iter().filter(|(_, f)| f.a == a && f.b == b).map(|(id, _)| *id).collect()
    }

    fn incoming_fibers(&self, node: u32) -> BTreeSet<u32> {
        self.fibers.iter().filter(|(_, f)| f.b == node).map(|(id, _)| *id).collect()
    }

    fn is_never_creating_wasted_spectrum(&self, node: u32) -> bool {
        self.never_wasting_nodes.contains(&node)
    }

    fn out_fibers_if_add_to_output_fiber(&self, node: u32, out: u32) -> BTreeSet<u32> {
        self.add_rules.get(&(node, out)).cloned().unwrap_or_default()
    }

    fn out_fibers_if_express_from_input_to_output_fiber(&self, node: u32, input: u32, output: u32) -> BTreeSet<u32> {
        self.express_rules.get(&(node, input, output)).cloned().unwrap_or_default()
    }

    fn out_fibers_unavoidable_propagation_from_input_fiber(&self, node: u32, input: u32) -> BTreeSet<u32> {
        self.unavoidable_rules.get(&(node, input)).cloned().unwrap_or_default()
    }

    fn lp_seq_fibers(&self, lp: u32) -> Vec<u32> {
        self.lightpaths[&lp].fibers.clone()
    }

    fn lp_slot_ids(&self, lp: u32) -> BTreeSet<u32> {
        self.lightpaths[&lp].slots.clone()
    }

    fn lp_add_module(&self, lp: u32) -> Option<usize> {
        self.lightpaths[&lp].add_module
    }

    fn lp_drop_module(&self, lp: u32) -> Option<usize> {
        self.lightpaths[&lp].drop_module
    }

    fn lp_waste_resources(&self, lp: u32) -> WasteResources<u32, u32> {
        self.lightpaths[&lp].waste.clone()
    }

    fn lp_a(&self, lp: u32) -> u32 {
        let fibers = &self.lightpaths[&lp].fibers;
        self.fiber_a(*fibers.first().expect("lightpath has at least one fiber"))
    }

    fn lp_b(&self, lp: u32) -> u32 {
        let fibers = &self.lightpaths[&lp].fibers;
        self.fiber_b(*fibers.last().expect("lightpath has at least one fiber"))
    }
}
