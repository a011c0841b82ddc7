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

//! Regeneration-distance partitioning: a simple length-based packing helper, unrelated to
//! spectrum occupation but grounded on the same "pure function over a fiber path" shape as
//! [`crate::propagation`].

use crate::error::OsmError;
use crate::topology::Topology;

/// Pack `fibers` left-to-right into segments whose total length never exceeds `max_km`,
/// starting a new segment whenever the next fiber would push the running total over the limit.
///
/// Fails with [`OsmError::FiberTooLong`] if any single fiber's length already exceeds `max_km`.
pub fn regeneration_points<T: Topology>(net: &T, fibers: &[T::Fiber], max_km: f64) -> Result<Vec<Vec<T::Fiber>>, OsmError> {
    let mut segments: Vec<Vec<T::Fiber>> = Vec::new();
    let mut current: Vec<T::Fiber> = Vec::new();
    let mut current_km = 0.0;

    for &fiber in fibers {
        let length_km = net.fiber_length_km(fiber);
        if length_km > max_km {
            return Err(OsmError::FiberTooLong { length_km, max_km });
        }
        if !current.is_empty() && current_km + length_km > max_km {
            segments.push(std::mem::take(&mut current));
            current_km = 0.0;
        }
        current.push(fiber);
        current_km += length_km;
    }
    if !current.is_empty() {
        segments.push(current);
    }
    Ok(segments)
}
