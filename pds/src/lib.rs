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

//! Sequential and indexed access to event records stored in **PDS containers**, behind a
//! uniform [`Source`] contract that an event-processing pipeline can drive.
//!
//! A PDS container is a word-aligned binary file made of two parts:
//!
//! 1. A self-describing *preamble*: a magic header, then a buffer holding the record names, the
//!    type names and the product catalog, closed by a cross-check word.
//! 2. A dense sequence of *event frames*. Every frame carries an opaque 5-word header, its body
//!    size in words, the body itself and a cross-check word repeating the body size.
//!
//! There is no index table, so event `n` can only be reached by walking over the `n` frames
//! before it. [`PdsSource`] does this lazily and forward-only: [`Source::goto_event`] with a
//! target behind the current position is rejected with an error instead of silently reading the
//! wrong event.
//!
//! ```no_run
//! # use pds::{PassthroughRegistry, PdsSource, Source};
//! let mut source = PdsSource::open("events.pds", &PassthroughRegistry)?;
//! let mut index = 0;
//! while source.goto_event(index)? {
//!     for product in source.products() {
//!         let bytes = source.product_bytes(product.slot()).unwrap_or_default();
//!         println!("{} ({}): {} bytes", product.name(), product.type_name(), bytes.len());
//!     }
//!     index += 1;
//! }
//! # Ok::<(), pds::Error>(())
//! ```
//!
//! All integers in a container use the byte order of the machine that wrote it. The format has
//! no endianness marker, so reader and writer must agree.
//!
//! # MSRV
//!
//! The current MSRV is 1.88.0.

mod catalog;
mod engine;
mod frame;
mod preamble;
mod string_table;
mod words;

pub mod error;
pub mod products;
pub mod registry;
pub mod schema;
pub mod source;
pub mod util;

pub use error::{Error, ErrorKind};
pub use frame::EVENT_HEADER_WORDS;
pub use preamble::MAGIC;
pub use products::{BodyLayout, DataProduct, SlotIndex};
pub use registry::{Decoder, DecoderRegistry, PassthroughRegistry, RawBytesDecoder, TypeRegistry};
pub use schema::{ContainerSchema, ProductDescriptor};
pub use source::{EmptySource, PdsSource, Source, SourceKind};

/// A convenience type alias for `Result`s with `Error`s.
pub type PdsResult<T> = Result<T, Error>;
