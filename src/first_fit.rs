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

//! # First-fit spectrum assignment
//!
//! Pure functions over [`OpticalSpectrumManager`] queries that find the lowest-id contiguous
//! slot range satisfying availability constraints. None of these mutate the manager; a `None`
//! result means "no free range" or "the path repeats a fiber", never an error (§7).

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::error::OsmError;
use crate::manager::OpticalSpectrumManager;
use crate::topology::{DirectionlessModule, Topology};

/// Find the lowest contiguous range of `n` slots available on every fiber in `path` (and
/// `add_mod`/`drop_mod`, if present), optionally restricted to slot ids `>= min_slot`.
///
/// Returns `None` if `path` repeats a fiber or no such range exists.
pub fn first_fit<T: Topology>(
    manager: &OpticalSpectrumManager<T>,
    net: &T,
    path: &[T::Fiber],
    add_mod: Option<DirectionlessModule<T::Node>>,
    drop_mod: Option<DirectionlessModule<T::Node>>,
    n: u32,
    min_slot: Option<u32>,
) -> Result<Option<BTreeSet<u32>>, OsmError> {
    if n == 0 || has_duplicates(path) {
        return Ok(None);
    }
    let mut available = manager.available_slot_ids(net, path, add_mod, drop_mod)?;
    if let Some(min) = min_slot {
        available.retain(|&s| s >= min);
    }
    Ok(first_contiguous_run(&available, n))
}

/// Find the lowest pair of contiguous `n`-slot ranges, one on each of `path1`/`path2`, that
/// don't overlap on any fiber the two paths share.
///
/// If the paths share no fiber, this degenerates to independent calls to [`first_fit`] on each.
/// Otherwise every candidate pair `(s1, s2)` with `|s1 - s2| >= n` is tried in ascending
/// `(s1, s2)` order. Returns `None` if either path repeats a fiber or no pair exists.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn first_fit_two_routes<T: Topology>(
    manager: &OpticalSpectrumManager<T>,
    net: &T,
    path1: &[T::Fiber],
    add_mod1: Option<DirectionlessModule<T::Node>>,
    drop_mod1: Option<DirectionlessModule<T::Node>>,
    path2: &[T::Fiber],
    add_mod2: Option<DirectionlessModule<T::Node>>,
    drop_mod2: Option<DirectionlessModule<T::Node>>,
    n: u32,
) -> Result<Option<(BTreeSet<u32>, BTreeSet<u32>)>, OsmError> {
    if n == 0 || has_duplicates(path1) || has_duplicates(path2) {
        return Ok(None);
    }

    let shares_fiber = path1.iter().any(|f| path2.contains(f));
    if !shares_fiber {
        let r1 = first_fit(manager, net, path1, add_mod1, drop_mod1, n, None)?;
        let r2 = first_fit(manager, net, path2, add_mod2, drop_mod2, n, None)?;
        return Ok(r1.zip(r2));
    }

    let available1 = manager.available_slot_ids(net, path1, add_mod1, drop_mod1)?;
    let available2 = manager.available_slot_ids(net, path2, add_mod2, drop_mod2)?;
    let starts1 = contiguous_run_starts(&available1, n);
    let starts2 = contiguous_run_starts(&available2, n);

    for &s1 in &starts1 {
        for &s2 in &starts2 {
            if s1.abs_diff(s2) >= n {
                let range1: BTreeSet<u32> = (s1..s1 + n).collect();
                let range2: BTreeSet<u32> = (s2..s2 + n).collect();
                return Ok(Some((range1, range2)));
            }
        }
    }
    Ok(None)
}

/// A chosen fiber, one per adjacency hop, together with its bidirectional partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChosenFiberPair<F> {
    /// The fiber carrying the signal in the forward (A→B) direction.
    pub forward: F,
    /// Its bidirectional partner, carrying the signal B→A.
    pub backward: F,
}

/// Find a slot range and a concrete fiber choice, one per adjacency hop, for a bidirectional
/// path expressed as a sequence of `(A, B)` node pairs with multiple candidate fibers each.
///
/// `unusable` is excluded from every candidate range up front. Every candidate fiber for a hop
/// must be bidirectional (else [`OsmError::RequiresBidirectional`]), and no fiber (or its
/// bidirectional pair) may be offered as a candidate at more than one hop
/// (else [`OsmError::DuplicateFiberOption`]).
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn first_fit_for_adjacencies_bidi<T: Topology>(
    manager: &OpticalSpectrumManager<T>,
    net: &T,
    adjacencies: &[(T::Node, T::Node)],
    add_mod_ab: Option<DirectionlessModule<T::Node>>,
    drop_mod_ab: Option<DirectionlessModule<T::Node>>,
    add_mod_ba: Option<DirectionlessModule<T::Node>>,
    drop_mod_ba: Option<DirectionlessModule<T::Node>>,
    n: u32,
    unusable: &BTreeSet<u32>,
) -> Result<Option<(Vec<ChosenFiberPair<T::Fiber>>, BTreeSet<u32>)>, OsmError> {
    if n == 0 || adjacencies.is_empty() {
        return Ok(None);
    }

    let mut offered: BTreeSet<T::Fiber> = BTreeSet::new();
    let mut hop_candidates: Vec<Vec<(ChosenFiberPair<T::Fiber>, BTreeSet<u32>)>> = Vec::with_capacity(adjacencies.len());

    for &(a, b) in adjacencies {
        let mut this_hop = Vec::new();
        for ab in net.node_pair_fibers(a, b) {
            if !net.fiber_is_bidirectional(ab) {
                return Err(OsmError::RequiresBidirectional);
            }
            let ba = net.fiber_bidirectional_pair(ab).ok_or(OsmError::RequiresBidirectional)?;
            if offered.contains(&ab) || offered.contains(&ba) {
                return Err(OsmError::DuplicateFiberOption);
            }
            offered.insert(ab);
            offered.insert(ba);

            let mut starts = manager.idle_range_initial_slots(net, ab, n)?;
            let starts_ba = manager.idle_range_initial_slots(net, ba, n)?;
            starts.retain(|s| starts_ba.contains(s));
            starts.retain(|s| !unusable.contains(s));
            this_hop.push((ChosenFiberPair { forward: ab, backward: ba }, starts));
        }
        hop_candidates.push(this_hop);
    }

    if hop_candidates.iter().any(|hop| hop.is_empty()) {
        return Ok(None);
    }

    let mut common: BTreeSet<u32> = hop_candidates[0]
        .iter()
        .flat_map(|(_, starts)| starts.iter().copied())
        .collect();
    for hop in &hop_candidates[1..] {
        let hop_union: BTreeSet<u32> = hop.iter().flat_map(|(_, starts)| starts.iter().copied()).collect();
        common.retain(|s| hop_union.contains(s));
    }

    for s in common {
        log::trace!("adjacency-bidi scan: probing initial slot {s}");
        let modules_free = [add_mod_ab, add_mod_ba]
            .into_iter()
            .flatten()
            .all(|m| (s..s + n).all(|x| !manager.occupied_slot_ids_in_add_module(m.node, m.index).contains(&x)))
            && [drop_mod_ab, drop_mod_ba]
                .into_iter()
                .flatten()
                .all(|m| (s..s + n).all(|x| !manager.occupied_slot_ids_in_drop_module(m.node, m.index).contains(&x)));
        if !modules_free {
            continue;
        }

        let chosen: Option<Vec<ChosenFiberPair<T::Fiber>>> = hop_candidates
            .iter()
            .map(|hop| hop.iter().find(|(_, starts)| starts.contains(&s)).map(|(pair, _)| *pair))
            .collect();
        if let Some(chosen) = chosen {
            return Ok(Some((chosen, (s..s + n).collect())));
        }
    }
    Ok(None)
}

fn has_duplicates<F: Eq + std::hash::Hash + Copy>(path: &[F]) -> bool {
    path.iter().duplicates().next().is_some()
}

fn first_contiguous_run(slots: &BTreeSet<u32>, n: u32) -> Option<BTreeSet<u32>> {
    contiguous_run_starts(slots, n).into_iter().next().map(|s| (s..s + n).collect())
}

fn contiguous_run_starts(slots: &BTreeSet<u32>, n: u32) -> BTreeSet<u32> {
    let mut starts = BTreeSet::new();
    for &s in slots {
        log::trace!("first-fit scan: probing slot {s} for a run of {n}");
        if (s..s + n).all(|x| slots.contains(&x)) {
            starts.insert(s);
        }
    }
    starts
}
