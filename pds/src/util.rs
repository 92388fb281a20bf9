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

use crate::{PdsResult, error::Details};
use std::sync::{
    Once,
    atomic::{AtomicUsize, Ordering},
};

/// Size in bytes of a word, the smallest addressable unit of a container.
pub const WORD_SIZE: usize = 4;

/// Maximum number of bytes that can be allocated for a single preamble or event body.
/// This is a protection against ill-formed containers, whose size words might be
/// interpreted as enormous.
/// See [`max_allocation_bytes`] to change this limit.
pub const DEFAULT_MAX_ALLOCATION_BYTES: usize = 512 * 1024 * 1024;
static MAX_ALLOCATION_BYTES: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_ALLOCATION_BYTES);
static MAX_ALLOCATION_BYTES_ONCE: Once = Once::new();

/// Set a new maximum number of bytes that can be allocated when reading a container.
/// Once called, the limit cannot be changed.
///
/// **NOTE** This function must be called before reading **any** container. The
/// library leverages [`std::sync::Once`](https://doc.rust-lang.org/std/sync/struct.Once.html)
/// to set the limit either when calling this method, or when reading for
/// the first time.
pub fn max_allocation_bytes(num_bytes: usize) -> usize {
    MAX_ALLOCATION_BYTES_ONCE.call_once(|| {
        MAX_ALLOCATION_BYTES.store(num_bytes, Ordering::Release);
    });
    MAX_ALLOCATION_BYTES.load(Ordering::Acquire)
}

pub fn safe_len(len: usize) -> PdsResult<usize> {
    let max_bytes = max_allocation_bytes(DEFAULT_MAX_ALLOCATION_BYTES);

    if len <= max_bytes {
        Ok(len)
    } else {
        Err(Details::MemoryAllocation {
            desired: len,
            maximum: max_bytes,
        }
        .into())
    }
}

/// Number of bytes covered by `words` words, checked against the allocation limit.
pub(crate) fn safe_word_len(words: usize) -> PdsResult<usize> {
    let bytes = words.checked_mul(WORD_SIZE).ok_or(Details::MemoryAllocation {
        desired: usize::MAX,
        maximum: max_allocation_bytes(DEFAULT_MAX_ALLOCATION_BYTES),
    })?;
    safe_len(bytes)
}

/// Number of whole words needed to hold `bytes` bytes.
pub fn bytes_to_words(bytes: usize) -> usize {
    bytes.div_ceil(WORD_SIZE)
}

/// Native-endian bytes of a run of words.
pub(crate) fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_ne_bytes()).collect()
}

/// Reads the native-endian word starting at `offset`.
pub(crate) fn word_at(bytes: &[u8], offset: usize) -> Option<u32> {
    let chunk = bytes.get(offset..offset + WORD_SIZE)?;
    Some(u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}
