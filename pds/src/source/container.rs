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
    engine::EventStream,
    error::Details,
    preamble::read_preamble,
    products::{BodyLayout, DataProduct, ProductSlots, SlotIndex},
    registry::TypeRegistry,
    schema::ContainerSchema,
    source::{Source, Stopwatch},
    words::WordReader,
};
use bon::bon;
use log::debug;
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
    time::Duration,
};

/// Source reading the events of a PDS container.
///
/// To be used as:
///
/// ```no_run
/// # use pds::{PassthroughRegistry, PdsSource};
/// # use std::io::Cursor;
/// # let input = Cursor::new(Vec::<u8>::new());
/// let mut source = PdsSource::builder(input)
///     .registry(&PassthroughRegistry)
///     .max_events(100)
///     .build()?;
/// while source.goto_event(source.next_event())? {
///     println!("event {:?}: {} bytes", source.current_event(), source.event_body().len());
/// }
/// # Ok::<(), pds::Error>(())
/// ```
#[derive(Debug)]
pub struct PdsSource<R> {
    events: EventStream<R>,
    schema: ContainerSchema,
    products: Vec<DataProduct>,
    slots: ProductSlots,
    max_events: u64,
    stopwatch: Stopwatch,
}

#[bon]
impl<R: Read + Seek> PdsSource<R> {
    /// Creates a `PdsSource` reading from the current position of `reader`.
    ///
    /// Every product of the catalog is resolved through `registry`. Events at or past
    /// `max_events` are never read.
    ///
    /// **NOTE** The preamble is read automatically upon creation of the `PdsSource`.
    #[builder(finish_fn = build)]
    pub fn builder<'r>(
        #[builder(start_fn)] reader: R,
        registry: &'r dyn TypeRegistry,
        max_events: Option<u64>,
        #[builder(default)] body_layout: BodyLayout,
    ) -> PdsResult<PdsSource<R>> {
        let mut words = WordReader::new(reader)?;
        let schema = read_preamble(&mut words)?;
        let products = resolve_products(&schema, registry)?;
        let slots = ProductSlots::new(products.len(), body_layout);

        Ok(PdsSource {
            events: EventStream::new(words),
            schema,
            products,
            slots,
            max_events: max_events.unwrap_or(u64::MAX),
            stopwatch: Stopwatch::default(),
        })
    }

    /// The schema declared by the preamble.
    pub fn schema(&self) -> &ContainerSchema {
        &self.schema
    }

    pub fn products(&self) -> &[DataProduct] {
        &self.products
    }

    pub fn product(&self, name: &str) -> Option<&DataProduct> {
        self.products.iter().find(|p| p.name() == name)
    }

    /// Bytes of the product in `slot` for the current event, `None` when the event holds none
    /// for it.
    pub fn product_bytes(&self, slot: SlotIndex) -> Option<&[u8]> {
        self.slots.get(slot)
    }

    /// The whole body of the current event, empty when there is none.
    pub fn event_body(&self) -> &[u8] {
        self.events.body()
    }

    /// Index of the event loaded by the last successful [`goto_event`](Self::goto_event).
    pub fn current_event(&self) -> Option<u64> {
        self.events.loaded_event()
    }

    /// Smallest index [`goto_event`](Self::goto_event) still accepts.
    pub fn next_event(&self) -> u64 {
        self.events.next_event()
    }

    pub fn max_events(&self) -> u64 {
        self.max_events
    }

    /// Moves to event `index`, skipping over the events in between.
    ///
    /// Returns `false` when `index` is at or past the configured maximum or past the last event
    /// of the container. Requests for an event before [`next_event`](Self::next_event) fail with
    /// [`ErrorKind::UnsupportedSeek`](crate::ErrorKind::UnsupportedSeek).
    pub fn goto_event(&mut self, index: u64) -> PdsResult<bool> {
        if index >= self.max_events {
            return Ok(false);
        }
        let Self {
            events,
            slots,
            stopwatch,
            ..
        } = self;
        stopwatch.time(|| -> PdsResult<bool> {
            if !events.goto_event(index)? {
                slots.clear();
                return Ok(false);
            }
            if let Err(e) = slots.fill(index, events.body()) {
                // the frame was read but cannot be split, so no event is current
                events.unload();
                return Err(e);
            }
            Ok(true)
        })
    }

    /// Total time spent in [`goto_event`](Self::goto_event).
    pub fn accumulated_time(&self) -> Duration {
        self.stopwatch.total()
    }
}

impl PdsSource<BufReader<File>> {
    /// Opens the container at `path` with the default options.
    pub fn open(path: impl AsRef<Path>, registry: &dyn TypeRegistry) -> PdsResult<Self> {
        PdsSource::builder(open_file(path.as_ref())?)
            .registry(registry)
            .build()
    }
}

impl<R: Read + Seek> Source for PdsSource<R> {
    fn products(&self) -> &[DataProduct] {
        PdsSource::products(self)
    }

    fn goto_event(&mut self, index: u64) -> PdsResult<bool> {
        PdsSource::goto_event(self, index)
    }

    fn product_bytes(&self, slot: SlotIndex) -> Option<&[u8]> {
        PdsSource::product_bytes(self, slot)
    }

    fn accumulated_time(&self) -> Duration {
        PdsSource::accumulated_time(self)
    }
}

pub(crate) fn open_file(path: &Path) -> PdsResult<BufReader<File>> {
    let file = File::open(path).map_err(|source| Details::OpenContainer {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn resolve_products(
    schema: &ContainerSchema,
    registry: &dyn TypeRegistry,
) -> PdsResult<Vec<DataProduct>> {
    schema
        .product_types()
        .enumerate()
        .map(|(index, (descriptor, type_name))| {
            let slot = SlotIndex::new(index);
            let decoder = registry
                .resolve(slot, descriptor.name(), type_name)
                .ok_or_else(|| Details::UnknownType {
                    product: descriptor.name().to_owned(),
                    type_name: type_name.to_owned(),
                })?;
            debug!(
                "Product {:?} in slot {slot} resolved to type {type_name:?}",
                descriptor.name()
            );
            Ok(DataProduct::new(slot, descriptor.name(), type_name, decoder))
        })
        .collect()
}
