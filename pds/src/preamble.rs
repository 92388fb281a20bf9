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

//! Reading of the container preamble.
//!
//! Layout, in words:
//!
//! | words  | content                                         |
//! |--------|-------------------------------------------------|
//! | 3      | `[MAGIC, reserved, n]`                          |
//! | n      | record names, top-level types, nested types, catalog |
//! | 1      | `n` again, as a cross-check                     |

use crate::{
    PdsResult,
    catalog::read_catalog,
    error::Details,
    schema::ContainerSchema,
    string_table::read_string_table,
    util::WORD_SIZE,
    words::{WordCursor, WordReader},
};
use log::{debug, warn};
use std::io::{Read, Seek};

/// First word of every container.
pub const MAGIC: u32 = 3_141_592 * 256 + 1;

const HEADER_WORDS: usize = 3;

/// Reads the preamble from the start of `words`, leaving the stream on the first event frame.
pub(crate) fn read_preamble<R: Read + Seek>(
    words: &mut WordReader<R>,
) -> PdsResult<ContainerSchema> {
    let magic = words.read_word()?.ok_or(Details::TruncatedRead {
        wanted: (HEADER_WORDS * WORD_SIZE) as u64,
        available: 0,
    })?;
    if magic != MAGIC {
        return Err(Details::MagicMismatch {
            expected: MAGIC,
            found: magic,
        }
        .into());
    }
    let header = words
        .read_words(HEADER_WORDS - 1)?
        .ok_or(Details::TruncatedRead {
            wanted: ((HEADER_WORDS - 1) * WORD_SIZE) as u64,
            available: 0,
        })?;

    // header[0] is reserved
    let buffer_size = header[1];
    // one word beyond the buffer is the cross-check
    let buffer = words
        .read_words(buffer_size as usize + 1)?
        .ok_or(Details::TruncatedRead {
            wanted: (buffer_size as u64 + 1) * WORD_SIZE as u64,
            available: 0,
        })?;

    parse_buffer(buffer_size, &buffer)
}

/// Decodes the preamble buffer, trailing cross-check word included.
pub(crate) fn parse_buffer(buffer_size: u32, buffer: &[u32]) -> PdsResult<ContainerSchema> {
    let mut cursor = WordCursor::new(buffer);

    let record_names = read_string_table(&mut cursor)?;
    debug!("Container records: {record_names:?}");
    let type_names = read_string_table(&mut cursor)?;
    debug!("Container top-level types: {type_names:?}");
    let nested_type_names = read_string_table(&mut cursor)?;
    if !nested_type_names.is_empty() {
        warn!(
            "Container declares {} nested types, they are not used to resolve products",
            nested_type_names.len()
        );
    }
    let products = read_catalog(&mut cursor)?;

    match cursor.rest() {
        [cross_check] if *cross_check == buffer_size => {}
        [cross_check] => {
            return Err(Details::PreambleCrossCheck {
                expected: buffer_size,
                found: *cross_check,
            }
            .into());
        }
        [] => return Err(Details::PreambleMissingCrossCheck.into()),
        rest => {
            return Err(Details::PreambleTrailingWords {
                remaining: rest.len() - 1,
            }
            .into());
        }
    }

    let schema = ContainerSchema::new(record_names, type_names, nested_type_names, products)?;
    for (product, type_name) in schema.product_types() {
        debug!(
            "Container product {:?} has type {type_name:?}",
            product.name()
        );
    }
    Ok(schema)
}
