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

#![deny(missing_docs, missing_debug_implementations)]

//! # Optical Spectrum Manager — core
//!
//! This crate implements the core of an optical spectrum manager for a WDM network planner: an
//! occupation index between network resources and lightpaths, first-fit spectrum assignment, and
//! propagation analysis over a filterless optical switching fabric (including the waste signal
//! and lasing loops such architectures create).
//!
//! It does not implement the surrounding network model itself: topology construction,
//! human-readable reports, a CLI, or persistence stay outside this crate. Instead every operation
//! here is generic over the [`Topology`] trait, which the embedding application implements once
//! against its own `Fiber`/`Node`/`Lightpath` types.
//!
//! ## Main concepts
//!
//! [`OpticalSpectrumManager`] is the main structure: it owns six [`SlotIndex`] instances
//! (legitimate/waste signal × fiber/add-module/drop-module resource) and a per-lightpath
//! occupation record, and exposes allocation, release, availability, and validity queries over
//! them. [`first_fit()`], [`first_fit_two_routes`], and [`first_fit_for_adjacencies_bidi`] are pure
//! functions over those queries that recommend a slot assignment without mutating anything.
//! [`propagation_of`] and [`unavoidable_lasing_loops`] analyse how a signal spreads through the
//! switching fabric beyond the lightpath's intended route, and [`regeneration_points`] partitions
//! a path into segments no longer than a regeneration distance.
//!
//! ## Example usage
//!
//! The following builds a manager for a network implementing [`Topology`], allocates a
//! lightpath's legitimate signal on one fiber, and releases it again:
//!
//! ```ignore
//! use optical_spectrum_core::*;
//!
//! let net: MyNetwork = /* ... */;
//! let mut osm = OpticalSpectrumManager::new(&net);
//!
//! let fiber = net.fibers()[0];
//! let lp = net.lightpaths()[0];
//! let slots = net.lp_slot_ids(lp);
//!
//! osm.allocate_legitimate(lp, None, None, &[fiber], &slots);
//! assert_eq!(osm.occupied_slot_ids(fiber), slots);
//!
//! osm.release(lp);
//! assert!(osm.occupied_slot_ids(fiber).is_empty());
//! ```
//!
//! ## Optional features
//!
//! - `serde`: adds `Serialize`/`Deserialize` to every public type in this crate.

pub mod error;
pub mod first_fit;
pub mod manager;
pub mod occupation;
pub mod propagation;
pub mod regeneration;
pub mod slot_index;
pub mod topology;

#[cfg(test)]
mod test;

pub use error::OsmError;
pub use first_fit::{first_fit, first_fit_for_adjacencies_bidi, first_fit_two_routes, ChosenFiberPair};
pub use manager::{OpticalSpectrumManager, SignalKind};
pub use occupation::LightpathOccupationRecord;
pub use propagation::{propagation_of, unavoidable_lasing_loops, PropagationResult};
pub use regeneration::regeneration_points;
pub use slot_index::SlotIndex;
pub use topology::{DirectionlessModule, Handle, Topology, WasteResources};

/// The centre frequency, in THz, of slot `id`: `193.1 + 0.0125 * id`.
///
/// No operation in this crate needs this conversion — slot ids are plain integers everywhere
/// above — but it is simple enough, and needed often enough by a caller formatting a report,
/// that it is provided here rather than forcing every consumer to re-derive the ITU-T fixed grid
/// constants.
pub fn slot_center_freq_thz(id: u32) -> f64 {
    193.1 + 0.0125 * id as f64
}
