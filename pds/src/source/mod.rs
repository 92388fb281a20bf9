// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The contract between event sources and the pipeline driving them.

mod container;
mod empty;
mod factory;

use crate::{
    PdsResult,
    products::{DataProduct, SlotIndex},
};
use std::time::{Duration, Instant};

pub use container::PdsSource;
pub use empty::EmptySource;
pub use factory::SourceKind;

/// A backend producing events for one processing lane.
///
/// A source is driven by a single caller. Event indices passed to
/// [`goto_event`](Self::goto_event) must not decrease over the life of the source.
pub trait Source {
    /// The products of every event, in slot order.
    fn products(&self) -> &[DataProduct];

    /// Makes event `index` the current event.
    ///
    /// Returns `false` once there are no more events. Errors mean the backing data is
    /// unusable, which is distinct from a clean end.
    fn goto_event(&mut self, index: u64) -> PdsResult<bool>;

    /// Bytes of the product in `slot` for the current event, `None` when the event holds none
    /// for it.
    fn product_bytes(&self, slot: SlotIndex) -> Option<&[u8]>;

    /// Total wall-clock time spent in [`goto_event`](Self::goto_event).
    fn accumulated_time(&self) -> Duration;

    /// Number of events, for backends that know it without reading them all.
    fn number_of_events(&self) -> Option<u64> {
        None
    }
}

/// Accumulates the duration of timed sections.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Stopwatch {
    total: Duration,
}

impl Stopwatch {
    pub(crate) fn time<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.total += start.elapsed();
        result
    }

    pub(crate) fn total(&self) -> Duration {
        self.total
    }
}
