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

use crate::{
    PdsResult,
    products::{DataProduct, SlotIndex},
    source::{Source, Stopwatch},
};
use std::time::Duration;

/// A source producing a fixed number of events without products.
#[derive(Clone, Debug)]
pub struct EmptySource {
    max_events: u64,
    stopwatch: Stopwatch,
}

impl EmptySource {
    pub fn new(max_events: u64) -> Self {
        Self {
            max_events,
            stopwatch: Stopwatch::default(),
        }
    }
}

impl Source for EmptySource {
    fn products(&self) -> &[DataProduct] {
        &[]
    }

    fn goto_event(&mut self, index: u64) -> PdsResult<bool> {
        let max_events = self.max_events;
        Ok(self.stopwatch.time(|| index < max_events))
    }

    fn product_bytes(&self, _: SlotIndex) -> Option<&[u8]> {
        None
    }

    fn accumulated_time(&self) -> Duration {
        self.stopwatch.total()
    }

    fn number_of_events(&self) -> Option<u64> {
        Some(self.max_events)
    }
}
