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

//! Error types returned by the optical spectrum manager and its analyzers.

use thiserror::Error;

/// Errors raised by the occupation index, first-fit assigner, propagation analyzer, or
/// regeneration helper.
///
/// Non-fatal conditions (first-fit found nothing, a path repeats a fiber) are signalled by
/// returning `None`, not by this enum.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OsmError {
    /// An entity argument belongs to a network different from the one the manager was built
    /// from.
    #[error("entity does not belong to this manager's network")]
    CrossNetwork,

    /// An availability query received no fibers.
    #[error("availability query requires at least one fiber")]
    EmptyFiberSet,

    /// A bidirectional-adjacency query received a fiber without a bidirectional partner.
    #[error("fiber is not bidirectional")]
    RequiresBidirectional,

    /// The same fiber (or its bidirectional pair) appeared twice among the candidate options of
    /// a bidirectional adjacency call.
    #[error("fiber (or its bidirectional pair) was offered more than once")]
    DuplicateFiberOption,

    /// Propagation analysis received an empty link list.
    #[error("propagation analysis requires a non-empty path")]
    EmptyPath,

    /// The propagation graph does not connect the add point to the drop point.
    #[error("signal never reaches the drop point")]
    SignalNotReachingDrop,

    /// A single fiber exceeds the regeneration distance.
    #[error("fiber length {length_km} km exceeds the regeneration distance {max_km} km")]
    FiberTooLong {
        /// The fiber's actual length.
        length_km: f64,
        /// The regeneration distance it was checked against.
        max_km: f64,
    },
}
