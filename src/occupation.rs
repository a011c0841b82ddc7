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

//! Per-lightpath occupation bookkeeping.

use std::collections::BTreeSet;

use crate::slot_index::SlotIndex;
use crate::topology::{DirectionlessModule, Handle};

/// The per-lightpath memo created on allocate and destroyed on release: its legitimate-signal
/// placement, plus accessors that lazily derive the waste-signal resources from the manager's
/// three waste indices.
///
/// The source keeps an `updateWasteOccupationInfo()` hook that is empty and never called; here
/// the waste resources are instead ordinary accessors computed on demand from the waste indices
/// (see `SPEC_FULL.md` §9), so there is no stale-cache bug to reproduce.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightpathOccupationRecord<F: Handle, N: Handle> {
    /// The lightpath's legitimate, ordered fiber sequence.
    pub legitimate_fibers: Vec<F>,
    /// The add-module used at the origin, if any.
    pub legitimate_add_module: Option<DirectionlessModule<N>>,
    /// The drop-module used at the destination, if any.
    pub legitimate_drop_module: Option<DirectionlessModule<N>>,
    /// The slot ids occupied by the legitimate signal.
    pub slots: BTreeSet<u32>,
}

impl<F: Handle, N: Handle> LightpathOccupationRecord<F, N> {
    /// The fibers that unintentionally carry this lightpath's waste signal, read lazily from
    /// `waste_fiber_index`.
    pub fn waste_fibers<L: Handle>(&self, waste_fiber_index: &SlotIndex<F, L>, lp: L) -> BTreeSet<F> {
        log::trace!("recomputing waste fibers for {lp:?}");
        waste_fiber_index.occupation_of(lp).into_keys().collect()
    }

    /// The add-module handles that unintentionally carry this lightpath's waste signal.
    pub fn waste_add_modules<L: Handle>(
        &self,
        waste_add_index: &SlotIndex<DirectionlessModule<N>, L>,
        lp: L,
    ) -> BTreeSet<DirectionlessModule<N>> {
        log::trace!("recomputing waste add-modules for {lp:?}");
        waste_add_index.occupation_of(lp).into_keys().collect()
    }

    /// The drop-module handles that unintentionally carry this lightpath's waste signal.
    pub fn waste_drop_modules<L: Handle>(
        &self,
        waste_drop_index: &SlotIndex<DirectionlessModule<N>, L>,
        lp: L,
    ) -> BTreeSet<DirectionlessModule<N>> {
        log::trace!("recomputing waste drop-modules for {lp:?}");
        waste_drop_index.occupation_of(lp).into_keys().collect()
    }
}
