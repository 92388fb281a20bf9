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

//! Decoding of the string tables in the preamble.
//!
//! A table is one word holding the size `n` of the table in words, followed by `n` words of
//! NUL-terminated strings packed back to back. The strings end at the first empty string or at
//! the end of the `n` words, whichever comes first, so a writer may pad the table with zeros.

use crate::{PdsResult, error::Details, util, words::WordCursor};

pub(crate) fn read_string_table(cursor: &mut WordCursor<'_>) -> PdsResult<Vec<String>> {
    let size = cursor.next_word()? as usize;
    if size == 0 {
        return Ok(Vec::new());
    }

    let offset = cursor.position();
    let run = util::words_to_bytes(cursor.take(size)?);

    let mut strings = Vec::with_capacity(run.iter().filter(|b| **b == 0).count());
    let mut rest = run.as_slice();
    while !rest.is_empty() {
        let Some(nul) = rest.iter().position(|b| *b == 0) else {
            return Err(Details::UnterminatedString { offset }.into());
        };
        if nul == 0 {
            break;
        }
        let string = String::from_utf8(rest[..nul].to_vec()).map_err(Details::ConvertToUtf8)?;
        strings.push(string);
        rest = &rest[nul + 1..];
    }
    Ok(strings)
}
