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

//! Writers for well-formed containers and their pieces, to be corrupted at will by the tests.

/// First word of every container.
pub const MAGIC: u32 = 3_141_592 * 256 + 1;

/// Opaque words at the start of every frame.
pub const EVENT_HEADER_WORDS: usize = 5;

const WORD_SIZE: usize = 4;

/// Builds a container in memory.
///
/// ```
/// use pds_test_helper::ContainerBuilder;
///
/// let bytes = ContainerBuilder::new()
///     .type_name("Hits")
///     .product(0, "hits")
///     .event(vec![1, 2, 3])
///     .build();
/// assert_eq!(bytes.len() % 4, 0);
/// ```
#[derive(Clone, Debug)]
pub struct ContainerBuilder {
    records: Vec<String>,
    types: Vec<String>,
    nested: Vec<String>,
    products: Vec<(u32, String)>,
    events: Vec<Vec<u32>>,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    /// A container with the single record `Events`, no types, products or events.
    pub fn new() -> Self {
        Self {
            records: vec!["Events".to_owned()],
            types: Vec::new(),
            nested: Vec::new(),
            products: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn type_name(mut self, name: &str) -> Self {
        self.types.push(name.to_owned());
        self
    }

    pub fn nested_type(mut self, name: &str) -> Self {
        self.nested.push(name.to_owned());
        self
    }

    /// Adds a catalog entry. `type_index` is not checked against the declared types.
    pub fn product(mut self, type_index: u32, name: &str) -> Self {
        self.products.push((type_index, name.to_owned()));
        self
    }

    /// Appends an event frame with `body` as its body words.
    pub fn event(mut self, body: Vec<u32>) -> Self {
        self.events.push(body);
        self
    }

    /// Appends an event whose body holds one length-prefixed segment per entry of `segments`.
    pub fn segmented_event(self, segments: &[&[u8]]) -> Self {
        self.event(segmented_body(segments))
    }

    /// The preamble buffer, without header nor cross-check word.
    pub fn preamble_buffer(&self) -> Vec<u32> {
        let mut buffer = encode_string_table(&as_strs(&self.records), 0);
        buffer.extend(encode_string_table(&as_strs(&self.types), 0));
        buffer.extend(encode_string_table(&as_strs(&self.nested), 0));
        let products: Vec<(u32, &str)> = self
            .products
            .iter()
            .map(|(index, name)| (*index, name.as_str()))
            .collect();
        buffer.extend(encode_catalog(&products));
        buffer
    }

    /// The whole preamble, header and cross-check word included.
    pub fn preamble_words(&self) -> Vec<u32> {
        let buffer = self.preamble_buffer();
        let size = buffer.len() as u32;
        let mut words = vec![MAGIC, 0, size];
        words.extend(buffer);
        words.push(size);
        words
    }

    /// Word offsets of every frame in [`build_words`](Self::build_words).
    pub fn frame_offsets(&self) -> Vec<usize> {
        let mut offset = self.preamble_words().len();
        self.events
            .iter()
            .map(|body| {
                let start = offset;
                offset += EVENT_HEADER_WORDS + body.len() + 2;
                start
            })
            .collect()
    }

    pub fn build_words(&self) -> Vec<u32> {
        let mut words = self.preamble_words();
        for body in &self.events {
            words.extend(encode_frame(body));
        }
        words
    }

    pub fn build(&self) -> Vec<u8> {
        words_to_bytes(&self.build_words())
    }
}

fn as_strs(strings: &[String]) -> Vec<&str> {
    strings.iter().map(String::as_str).collect()
}

/// A string table holding `strings`, followed by `padding_words` zero words counted in its size.
pub fn encode_string_table(strings: &[&str], padding_words: usize) -> Vec<u32> {
    let mut bytes = Vec::new();
    for s in strings {
        bytes.extend_from_slice(s.as_bytes());
        bytes.push(0);
    }
    let mut run = pack_bytes(&bytes);
    run.resize(run.len() + padding_words, 0);

    let mut table = vec![run.len() as u32];
    table.extend(run);
    table
}

/// A product catalog of `(type index, name)` entries.
pub fn encode_catalog(products: &[(u32, &str)]) -> Vec<u32> {
    let mut catalog = vec![products.len() as u32];
    for (type_index, name) in products {
        catalog.push(*type_index);
        let mut name = name.as_bytes().to_vec();
        name.push(0);
        catalog.extend(pack_bytes(&name));
    }
    catalog
}

/// A well-formed frame around `body`. The header words are arbitrary non-zero values.
pub fn encode_frame(body: &[u32]) -> Vec<u32> {
    let size = body.len() as u32;
    let mut frame: Vec<u32> = (0..EVENT_HEADER_WORDS as u32)
        .map(|i| 0xE0E0_0000 + i)
        .collect();
    frame.push(size);
    frame.extend_from_slice(body);
    frame.push(size);
    frame
}

/// A body made of one segment per entry: a length word, then the bytes padded to a word.
pub fn segmented_body(segments: &[&[u8]]) -> Vec<u32> {
    let mut body = Vec::new();
    for segment in segments {
        body.push(segment.len() as u32);
        body.extend(pack_bytes(segment));
    }
    body
}

/// Packs `bytes` into native-endian words, padding the last one with zeros.
pub fn pack_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(WORD_SIZE)
        .map(|chunk| {
            let mut word = [0u8; WORD_SIZE];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_ne_bytes(word)
        })
        .collect()
}

pub fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_ne_bytes()).collect()
}
