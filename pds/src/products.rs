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

//! Data products and the slots their bytes are stored in.

use crate::{
    PdsResult,
    error::{Details, Error},
    registry::Decoder,
    util::{self, WORD_SIZE},
};
use std::{any::Any, fmt, str::FromStr, sync::Arc};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Position of a product in the catalog, and of its bytes in the slot arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the body of an event frame maps to product slots.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab_case")]
pub enum BodyLayout {
    /// The body is a single block. With exactly one product it is that product's bytes;
    /// otherwise the slots stay empty and the body is only available as a whole.
    #[default]
    Opaque,
    /// The body is one segment per product, in catalog order. A segment is a word holding its
    /// length in bytes, followed by the bytes padded with zeros to a word boundary.
    Segmented,
}

impl BodyLayout {
    pub fn parse(name: &str) -> PdsResult<Self> {
        Self::from_str(name).map_err(|_| Details::UnknownBodyLayout(name.to_owned()).into())
    }
}

/// A product exposed by a source: where its bytes are and how to decode them.
#[derive(Clone, Debug)]
pub struct DataProduct {
    slot: SlotIndex,
    name: String,
    type_name: String,
    decoder: Arc<dyn Decoder>,
}

impl DataProduct {
    pub fn new(
        slot: SlotIndex,
        name: impl Into<String>,
        type_name: impl Into<String>,
        decoder: Arc<dyn Decoder>,
    ) -> Self {
        Self {
            slot,
            name: name.into(),
            type_name: type_name.into(),
            decoder,
        }
    }

    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn decoder(&self) -> &Arc<dyn Decoder> {
        &self.decoder
    }

    /// Runs this product's decoder over `bytes`.
    pub fn decode(&self, bytes: &[u8]) -> PdsResult<Box<dyn Any + Send>> {
        self.decoder.decode(bytes)
    }
}

/// Bytes of one product for the current event.
#[derive(Clone, Debug, Default)]
struct Slot {
    bytes: Vec<u8>,
    filled: bool,
}

impl Slot {
    fn set(&mut self, bytes: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
        self.filled = true;
    }
}

/// One reusable byte buffer per product, refilled for every event.
#[derive(Debug)]
pub(crate) struct ProductSlots {
    slots: Vec<Slot>,
    layout: BodyLayout,
}

impl ProductSlots {
    pub(crate) fn new(count: usize, layout: BodyLayout) -> Self {
        Self {
            slots: vec![Slot::default(); count],
            layout,
        }
    }

    /// Bytes of the product in `slot`, `None` when the current event holds none for it.
    pub(crate) fn get(&self, slot: SlotIndex) -> Option<&[u8]> {
        self.slots
            .get(slot.get())
            .filter(|s| s.filled)
            .map(|s| s.bytes.as_slice())
    }

    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.bytes.clear();
            slot.filled = false;
        }
    }

    /// Distributes the body of `event` over the slots. On error all slots are left empty.
    pub(crate) fn fill(&mut self, event: u64, body: &[u8]) -> PdsResult<()> {
        self.clear();
        let result = match self.layout {
            BodyLayout::Opaque => {
                self.fill_opaque(body);
                Ok(())
            }
            BodyLayout::Segmented => self.fill_segments(event, body),
        };
        if result.is_err() {
            self.clear();
        }
        result
    }

    /// Only a lone product can claim the whole body.
    fn fill_opaque(&mut self, body: &[u8]) {
        if let [only] = self.slots.as_mut_slice() {
            only.set(body);
        }
    }

    fn fill_segments(&mut self, event: u64, body: &[u8]) -> PdsResult<()> {
        let mismatch =
            |expected: usize| -> Error { Details::SegmentMismatch { event, expected }.into() };
        let expected = self.slots.len();

        let mut rest = body;
        for slot in &mut self.slots {
            let Some((len, tail)) = rest.split_first_chunk::<WORD_SIZE>() else {
                return Err(mismatch(expected));
            };
            let len = u32::from_ne_bytes(*len) as usize;
            let padded = util::bytes_to_words(len) * WORD_SIZE;
            if tail.len() < padded {
                return Err(mismatch(expected));
            }
            slot.set(&tail[..len]);
            rest = &tail[padded..];
        }

        if !rest.is_empty() {
            return Err(mismatch(expected));
        }
        Ok(())
    }
}
