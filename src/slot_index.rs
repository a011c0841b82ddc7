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

//! # Generic bidirectional occupation index
//!
//! [`SlotIndex`] keeps a forward map (resource → slot id → lightpaths) and an inverse map
//! (lightpath → resource → slot ids), the same dual-map shape `bgpsim::forwarding_state`
//! uses for its `state`/`reversed` forwarding tables: `release` needs to find every resource a
//! lightpath touches without scanning the whole forward map.

use std::collections::{BTreeMap, BTreeSet};

use crate::topology::Handle;

/// A bidirectional occupation index between a resource type `E` and a lightpath type `L`, per
/// slot id.
///
/// The index never self-validates: `allocate` records whatever it is given, including clashes.
/// Detecting a clash is the caller's job (see [`crate::OpticalSpectrumManager::is_spectrum_occupation_ok`]).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotIndex<E: Handle, L: Handle> {
    forward: BTreeMap<E, BTreeMap<u32, BTreeSet<L>>>,
    inverse: BTreeMap<L, BTreeMap<E, BTreeSet<u32>>>,
}

impl<E: Handle, L: Handle> Default for SlotIndex<E, L> {
    fn default() -> Self {
        Self {
            forward: BTreeMap::new(),
            inverse: BTreeMap::new(),
        }
    }
}

impl<E: Handle, L: Handle> SlotIndex<E, L> {
    /// Create a new, empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `slots` on every resource in `resources` for `lp`. A no-op if `slots` is empty.
    ///
    /// Does not fail on a clash: a slot already held by another lightpath simply gains a second
    /// occupant in `forward`.
    pub fn allocate(&mut self, resources: impl IntoIterator<Item = E>, lp: L, slots: &BTreeSet<u32>) {
        if slots.is_empty() {
            return;
        }
        for e in resources {
            let leaf = self.forward.entry(e).or_default();
            for &s in slots {
                leaf.entry(s).or_default().insert(lp);
            }
            self.inverse.entry(lp).or_default().entry(e).or_default().extend(slots.iter().copied());
        }
    }

    /// Release every allocation made for `lp`. A no-op if `lp` holds nothing.
    pub fn release(&mut self, lp: L) {
        let Some(by_resource) = self.inverse.remove(&lp) else {
            return;
        };
        for (e, slots) in by_resource {
            let Some(leaf) = self.forward.get_mut(&e) else {
                continue;
            };
            for s in slots {
                if let Some(occupants) = leaf.get_mut(&s) {
                    occupants.remove(&lp);
                    if occupants.is_empty() {
                        leaf.remove(&s);
                    }
                }
            }
            if leaf.is_empty() {
                self.forward.remove(&e);
            }
        }
    }

    /// Empty both maps.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.inverse.clear();
    }

    /// The slot → lightpaths map for `e`, or an empty map if `e` has no occupation recorded.
    pub fn occupied_slots(&self, e: E) -> BTreeMap<u32, BTreeSet<L>> {
        self.forward.get(&e).cloned().unwrap_or_default()
    }

    /// The set of occupied slot ids on `e`, safe to mutate by the caller.
    pub fn occupied_slot_ids(&self, e: E) -> BTreeSet<u32> {
        self.forward
            .get(&e)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Every resource with any recorded occupation.
    pub fn elements_with_any_occupation(&self) -> BTreeSet<E> {
        self.forward.keys().copied().collect()
    }

    /// A read-only view of the forward map.
    pub fn full_map(&self) -> &BTreeMap<E, BTreeMap<u32, BTreeSet<L>>> {
        &self.forward
    }

    /// What `lp` occupies, resource by resource, or an empty map if `lp` has no allocations.
    pub fn occupation_of(&self, lp: L) -> BTreeMap<E, BTreeSet<u32>> {
        self.inverse.get(&lp).cloned().unwrap_or_default()
    }
}
