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

//! # The optical spectrum manager
//!
//! [`OpticalSpectrumManager`] owns six [`SlotIndex`] instances (signal kind × resource kind) and
//! the per-lightpath occupation records, and exposes allocation, release, availability, and
//! validity operations over them.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::OsmError;
use crate::occupation::LightpathOccupationRecord;
use crate::slot_index::SlotIndex;
use crate::topology::{DirectionlessModule, Topology};

/// Which signal a query or allocation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalKind {
    /// The intended signal on the lightpath's planned path.
    Legitimate,
    /// Unintended signal propagation caused by filterless switching.
    Waste,
}

/// Owns the six occupation indices and the per-lightpath records; the single point of mutation
/// and validity analysis for a WDM network's optical spectrum.
///
/// Instantiated per analysis (§5): it borrows nothing from the network across calls, and is
/// rebuilt from scratch with [`OpticalSpectrumManager::reset_from_lightpaths`] whenever the
/// underlying network changes.
#[derive(Debug, Clone)]
pub struct OpticalSpectrumManager<T: Topology> {
    network_id: T::NetworkId,
    legitimate_fiber: SlotIndex<T::Fiber, T::Lightpath>,
    legitimate_add: SlotIndex<DirectionlessModule<T::Node>, T::Lightpath>,
    legitimate_drop: SlotIndex<DirectionlessModule<T::Node>, T::Lightpath>,
    waste_fiber: SlotIndex<T::Fiber, T::Lightpath>,
    waste_add: SlotIndex<DirectionlessModule<T::Node>, T::Lightpath>,
    waste_drop: SlotIndex<DirectionlessModule<T::Node>, T::Lightpath>,
    records: BTreeMap<T::Lightpath, LightpathOccupationRecord<T::Fiber, T::Node>>,
}

fn has_duplicates<F: Eq + std::hash::Hash + Copy>(path: &[F]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(path.len());
    path.iter().any(|f| !seen.insert(*f))
}

impl<T: Topology> OpticalSpectrumManager<T> {
    /// Create a new, empty manager tied to `net`'s identity.
    pub fn new(net: &T) -> Self {
        Self {
            network_id: net.network_id(),
            legitimate_fiber: SlotIndex::new(),
            legitimate_add: SlotIndex::new(),
            legitimate_drop: SlotIndex::new(),
            waste_fiber: SlotIndex::new(),
            waste_add: SlotIndex::new(),
            waste_drop: SlotIndex::new(),
            records: BTreeMap::new(),
        }
    }

    fn check_network(&self, net: &T) -> Result<(), OsmError> {
        if net.network_id() == self.network_id {
            Ok(())
        } else {
            Err(OsmError::CrossNetwork)
        }
    }

    /// Clear all six indices and re-derive them from `net`'s lightpaths.
    pub fn reset_from_lightpaths(&mut self, net: &T) -> Result<(), OsmError> {
        self.check_network(net)?;
        self.legitimate_fiber.clear();
        self.legitimate_add.clear();
        self.legitimate_drop.clear();
        self.waste_fiber.clear();
        self.waste_add.clear();
        self.waste_drop.clear();
        self.records.clear();

        let lightpaths = net.lightpaths();
        log::debug!("reloading optical spectrum manager from {} lightpaths", lightpaths.len());
        for lp in lightpaths {
            let fibers = net.lp_seq_fibers(lp);
            let slots = net.lp_slot_ids(lp);
            let add_mod = net.lp_add_module(lp).map(|idx| DirectionlessModule::new(net.lp_a(lp), idx));
            let drop_mod = net
                .lp_drop_module(lp)
                .map(|idx| DirectionlessModule::new(net.lp_b(lp), idx));
            self.allocate_legitimate(lp, add_mod, drop_mod, &fibers, &slots);

            let waste = net.lp_waste_resources(lp);
            self.allocate_waste(lp, waste.add_modules, waste.drop_modules, waste.fibers, &slots);
        }
        Ok(())
    }

    /// Allocate the legitimate signal of `lp` on `fibers` (and `add_mod`/`drop_mod`, if present)
    /// at `slots`. A no-op if `slots` is empty.
    pub fn allocate_legitimate(
        &mut self,
        lp: T::Lightpath,
        add_mod: Option<DirectionlessModule<T::Node>>,
        drop_mod: Option<DirectionlessModule<T::Node>>,
        fibers: &[T::Fiber],
        slots: &BTreeSet<u32>,
    ) {
        log::debug!("allocate legitimate signal for {lp:?} on {} fibers", fibers.len());
        self.legitimate_fiber.allocate(fibers.iter().copied(), lp, slots);
        if let Some(m) = add_mod {
            self.legitimate_add.allocate([m], lp, slots);
        }
        if let Some(m) = drop_mod {
            self.legitimate_drop.allocate([m], lp, slots);
        }
        self.records.insert(
            lp,
            LightpathOccupationRecord {
                legitimate_fibers: fibers.to_vec(),
                legitimate_add_module: add_mod,
                legitimate_drop_module: drop_mod,
                slots: slots.clone(),
            },
        );
    }

    /// Allocate the waste signal of `lp` on `fibers`, `add_mods`, and `drop_mods` at `slots`.
    pub fn allocate_waste(
        &mut self,
        lp: T::Lightpath,
        add_mods: Vec<DirectionlessModule<T::Node>>,
        drop_mods: Vec<DirectionlessModule<T::Node>>,
        fibers: Vec<T::Fiber>,
        slots: &BTreeSet<u32>,
    ) {
        log::debug!("allocate waste signal for {lp:?} on {} fibers", fibers.len());
        self.waste_fiber.allocate(fibers, lp, slots);
        self.waste_add.allocate(add_mods, lp, slots);
        self.waste_drop.allocate(drop_mods, lp, slots);
    }

    /// Release every allocation (legitimate and waste) made for `lp`. A no-op if `lp` holds
    /// nothing.
    pub fn release(&mut self, lp: T::Lightpath) {
        log::debug!("releasing all occupation for {lp:?}");
        self.legitimate_fiber.release(lp);
        self.legitimate_add.release(lp);
        self.legitimate_drop.release(lp);
        self.waste_fiber.release(lp);
        self.waste_add.release(lp);
        self.waste_drop.release(lp);
        self.records.remove(&lp);
    }

    fn fiber_index(&self, kind: SignalKind) -> &SlotIndex<T::Fiber, T::Lightpath> {
        match kind {
            SignalKind::Legitimate => &self.legitimate_fiber,
            SignalKind::Waste => &self.waste_fiber,
        }
    }

    fn add_index(&self, kind: SignalKind) -> &SlotIndex<DirectionlessModule<T::Node>, T::Lightpath> {
        match kind {
            SignalKind::Legitimate => &self.legitimate_add,
            SignalKind::Waste => &self.waste_add,
        }
    }

    fn drop_index(&self, kind: SignalKind) -> &SlotIndex<DirectionlessModule<T::Node>, T::Lightpath> {
        match kind {
            SignalKind::Legitimate => &self.legitimate_drop,
            SignalKind::Waste => &self.waste_drop,
        }
    }

    /// The slot → lightpaths map on `fiber`, honouring `kind` (the source ignores this
    /// argument and always returns the legitimate index; this implementation corrects that —
    /// see `SPEC_FULL.md` §9).
    pub fn occupied_resources(&self, fiber: T::Fiber, kind: SignalKind) -> BTreeMap<u32, BTreeSet<T::Lightpath>> {
        self.fiber_index(kind).occupied_slots(fiber)
    }

    /// The slot → lightpaths map on the add-module `(node, idx)`.
    pub fn occupied_resources_in_add_module(
        &self,
        node: T::Node,
        idx: usize,
        kind: SignalKind,
    ) -> BTreeMap<u32, BTreeSet<T::Lightpath>> {
        self.add_index(kind).occupied_slots(DirectionlessModule::new(node, idx))
    }

    /// The slot → lightpaths map on the drop-module `(node, idx)`.
    pub fn occupied_resources_in_drop_module(
        &self,
        node: T::Node,
        idx: usize,
        kind: SignalKind,
    ) -> BTreeMap<u32, BTreeSet<T::Lightpath>> {
        self.drop_index(kind).occupied_slots(DirectionlessModule::new(node, idx))
    }

    /// The union of legitimate and waste occupied slot ids on `fiber`.
    pub fn occupied_slot_ids(&self, fiber: T::Fiber) -> BTreeSet<u32> {
        let mut slots = self.legitimate_fiber.occupied_slot_ids(fiber);
        slots.extend(self.waste_fiber.occupied_slot_ids(fiber));
        slots
    }

    /// The union of legitimate and waste occupied slot ids on the add-module `(node, idx)`.
    pub fn occupied_slot_ids_in_add_module(&self, node: T::Node, idx: usize) -> BTreeSet<u32> {
        let m = DirectionlessModule::new(node, idx);
        let mut slots = self.legitimate_add.occupied_slot_ids(m);
        slots.extend(self.waste_add.occupied_slot_ids(m));
        slots
    }

    /// The union of legitimate and waste occupied slot ids on the drop-module `(node, idx)`.
    pub fn occupied_slot_ids_in_drop_module(&self, node: T::Node, idx: usize) -> BTreeSet<u32> {
        let m = DirectionlessModule::new(node, idx);
        let mut slots = self.legitimate_drop.occupied_slot_ids(m);
        slots.extend(self.waste_drop.occupied_slot_ids(m));
        slots
    }

    /// `fiber`'s valid slot ids minus its occupied slot ids.
    pub fn idle_slot_ids(&self, net: &T, fiber: T::Fiber) -> Result<BTreeSet<u32>, OsmError> {
        self.check_network(net)?;
        let valid = net.fiber_valid_slot_ids(fiber);
        let occupied = self.occupied_slot_ids(fiber);
        Ok(valid.difference(&occupied).copied().collect())
    }

    /// The intersection of `idle_slot_ids` over every fiber in `fibers`, minus any slots
    /// occupied in `add_mod`/`drop_mod`. Fails with [`OsmError::EmptyFiberSet`] if `fibers` is
    /// empty.
    pub fn available_slot_ids(
        &self,
        net: &T,
        fibers: &[T::Fiber],
        add_mod: Option<DirectionlessModule<T::Node>>,
        drop_mod: Option<DirectionlessModule<T::Node>>,
    ) -> Result<BTreeSet<u32>, OsmError> {
        self.check_network(net)?;
        let mut iter = fibers.iter();
        let Some(&first) = iter.next() else {
            return Err(OsmError::EmptyFiberSet);
        };
        let mut available = self.idle_slot_ids(net, first)?;
        for &f in iter {
            let idle = self.idle_slot_ids(net, f)?;
            available.retain(|s| idle.contains(s));
        }
        if let Some(m) = add_mod {
            let occ = self.occupied_slot_ids_in_add_module(m.node, m.index);
            available.retain(|s| !occ.contains(s));
        }
        if let Some(m) = drop_mod {
            let occ = self.occupied_slot_ids_in_drop_module(m.node, m.index);
            available.retain(|s| !occ.contains(s));
        }
        Ok(available)
    }

    /// Whether `slots` could legally be allocated on `path` (and `add_mod`/`drop_mod`, if
    /// present) right now: `path` has no duplicate fiber, and every slot is valid and idle
    /// everywhere it is requested.
    pub fn is_allocatable(
        &self,
        net: &T,
        path: &[T::Fiber],
        add_mod: Option<DirectionlessModule<T::Node>>,
        drop_mod: Option<DirectionlessModule<T::Node>>,
        slots: &BTreeSet<u32>,
    ) -> Result<bool, OsmError> {
        self.check_network(net)?;
        if has_duplicates(path) {
            return Ok(false);
        }
        for &fiber in path {
            let idle = self.idle_slot_ids(net, fiber)?;
            if !slots.is_subset(&idle) {
                return Ok(false);
            }
        }
        if let Some(m) = add_mod {
            let occ = self.occupied_slot_ids_in_add_module(m.node, m.index);
            if !slots.is_disjoint(&occ) {
                return Ok(false);
            }
        }
        if let Some(m) = drop_mod {
            let occ = self.occupied_slot_ids_in_drop_module(m.node, m.index);
            if !slots.is_disjoint(&occ) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The set of initial slot ids `s` such that `[s, s+n-1]` are all idle on `fiber`.
    pub fn idle_range_initial_slots(&self, net: &T, fiber: T::Fiber, n: u32) -> Result<BTreeSet<u32>, OsmError> {
        self.check_network(net)?;
        if n == 0 {
            return Ok(BTreeSet::new());
        }
        let idle = self.idle_slot_ids(net, fiber)?;
        let mut starts = BTreeSet::new();
        for &s in &idle {
            if (s..s + n).all(|x| idle.contains(&x)) {
                starts.insert(s);
            }
        }
        Ok(starts)
    }

    /// The intersection of each fiber's valid slot-id range.
    pub fn min_max_valid_slot_across_fibers(&self, net: &T, fibers: &[T::Fiber]) -> Result<(u32, u32), OsmError> {
        self.check_network(net)?;
        let mut iter = fibers.iter();
        let Some(&first) = iter.next() else {
            return Err(OsmError::EmptyFiberSet);
        };
        let (mut lo, mut hi) = net.fiber_min_max_valid_slot(first);
        for &f in iter {
            let (flo, fhi) = net.fiber_min_max_valid_slot(f);
            lo = lo.max(flo);
            hi = hi.min(fhi);
        }
        Ok((lo, hi))
    }

    /// Slots on `fiber` where the legitimate index has more than one occupant, or exactly one
    /// occupant while the waste index is also non-empty there.
    pub fn clashing_slots_in_fiber(&self, fiber: T::Fiber) -> BTreeSet<u32> {
        let legit = self.legitimate_fiber.occupied_slots(fiber);
        let waste = self.waste_fiber.occupied_slots(fiber);
        let clashes = clashing_slots(&legit, &waste);
        if !clashes.is_empty() {
            log::warn!("clash on {} slot(s) of fiber {fiber:?}", clashes.len());
        }
        clashes
    }

    /// As [`Self::clashing_slots_in_fiber`], for the add-module `(node, idx)`.
    pub fn clashing_slots_in_add_module(&self, node: T::Node, idx: usize) -> BTreeSet<u32> {
        let m = DirectionlessModule::new(node, idx);
        let clashes = clashing_slots(&self.legitimate_add.occupied_slots(m), &self.waste_add.occupied_slots(m));
        if !clashes.is_empty() {
            log::warn!("clash on {} slot(s) of add-module {m:?}", clashes.len());
        }
        clashes
    }

    /// As [`Self::clashing_slots_in_fiber`], for the drop-module `(node, idx)`.
    pub fn clashing_slots_in_drop_module(&self, node: T::Node, idx: usize) -> BTreeSet<u32> {
        let m = DirectionlessModule::new(node, idx);
        let clashes = clashing_slots(&self.legitimate_drop.occupied_slots(m), &self.waste_drop.occupied_slots(m));
        if !clashes.is_empty() {
            log::warn!("clash on {} slot(s) of drop-module {m:?}", clashes.len());
        }
        clashes
    }

    /// Global validity: every occupied `(fiber, slot)` is valid for that fiber and has exactly
    /// one occupant per signal kind; every add/drop module slot has exactly one occupant per
    /// signal kind.
    pub fn is_spectrum_occupation_ok(&self, net: &T) -> Result<bool, OsmError> {
        self.check_network(net)?;
        for fiber in self.legitimate_fiber.elements_with_any_occupation() {
            let valid = net.fiber_valid_slot_ids(fiber);
            if !slots_unique_and_valid(&self.legitimate_fiber.occupied_slots(fiber), &valid) {
                return Ok(false);
            }
        }
        for fiber in self.waste_fiber.elements_with_any_occupation() {
            let valid = net.fiber_valid_slot_ids(fiber);
            if !slots_unique_and_valid(&self.waste_fiber.occupied_slots(fiber), &valid) {
                return Ok(false);
            }
        }
        for idx in [&self.legitimate_add, &self.waste_add, &self.legitimate_drop, &self.waste_drop] {
            for e in idx.elements_with_any_occupation() {
                if idx.occupied_slots(e).values().any(|occ| occ.len() != 1) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Per-lightpath validity: every legitimate slot of `lp` is valid on its fiber/module and
    /// held exclusively by `lp` (a clash would make the occupant set larger than `{lp}`).
    pub fn is_spectrum_occupation_ok_for(&self, net: &T, lp: T::Lightpath) -> Result<bool, OsmError> {
        self.check_network(net)?;
        let Some(record) = self.records.get(&lp) else {
            return Ok(true);
        };
        for &fiber in &record.legitimate_fibers {
            let valid = net.fiber_valid_slot_ids(fiber);
            if !record.slots.is_subset(&valid) {
                return Ok(false);
            }
            let occ = self.legitimate_fiber.occupied_slots(fiber);
            if !lp_exclusively_holds(&occ, &record.slots, lp) {
                return Ok(false);
            }
        }
        if let Some(m) = record.legitimate_add_module {
            if !lp_exclusively_holds(&self.legitimate_add.occupied_slots(m), &record.slots, lp) {
                return Ok(false);
            }
        }
        if let Some(m) = record.legitimate_drop_module {
            if !lp_exclusively_holds(&self.legitimate_drop.occupied_slots(m), &record.slots, lp) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn clashing_slots<L: Ord>(legit: &BTreeMap<u32, BTreeSet<L>>, waste: &BTreeMap<u32, BTreeSet<L>>) -> BTreeSet<u32> {
    legit
        .iter()
        .filter(|(s, occ)| occ.len() > 1 || waste.contains_key(s))
        .map(|(s, _)| *s)
        .collect()
}

fn slots_unique_and_valid<L>(occ: &BTreeMap<u32, BTreeSet<L>>, valid: &BTreeSet<u32>) -> bool {
    occ.iter().all(|(s, occupants)| valid.contains(s) && occupants.len() == 1)
}

fn lp_exclusively_holds<L: Ord + Copy>(occ: &BTreeMap<u32, BTreeSet<L>>, slots: &BTreeSet<u32>, lp: L) -> bool {
    slots.iter().all(|s| matches!(occ.get(s), Some(set) if set.len() == 1 && set.contains(&lp)))
}
