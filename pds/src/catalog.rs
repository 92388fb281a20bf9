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

//! Decoding of the product catalog.
//!
//! The catalog is one word holding the product count, then for every product a word with its
//! index into the top-level type table followed by its NUL-terminated name, padded with zeros up
//! to the next word boundary.

use crate::{PdsResult, error::Details, schema::ProductDescriptor, words::WordCursor};

pub(crate) fn read_catalog(cursor: &mut WordCursor<'_>) -> PdsResult<Vec<ProductDescriptor>> {
    let count = cursor.next_word()? as usize;
    // a product needs at least two words, don't trust the count for the allocation
    let mut products = Vec::with_capacity(count.min(cursor.remaining() / 2));

    for _ in 0..count {
        let type_index = cursor.next_word()?;
        let offset = cursor.position();
        let Some((name, used)) = padded_c_string(cursor.rest()) else {
            return Err(Details::UnterminatedString { offset }.into());
        };
        cursor.take(used)?;
        let name = String::from_utf8(name).map_err(Details::ConvertToUtf8)?;
        products.push(ProductDescriptor::new(name, type_index));
    }

    Ok(products)
}

/// Reads a NUL-terminated string from the start of `words`, returning its bytes and the number
/// of whole words it occupies, terminator included.
fn padded_c_string(words: &[u32]) -> Option<(Vec<u8>, usize)> {
    let mut bytes = Vec::new();
    for (i, word) in words.iter().enumerate() {
        for byte in word.to_ne_bytes() {
            if byte == 0 {
                return Some((bytes, i + 1));
            }
            bytes.push(byte);
        }
    }
    None
}
