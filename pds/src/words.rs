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

//! Word-level access to a container, both on the stream and inside an in-memory buffer.

use crate::{
    PdsResult,
    error::{Details, Error},
    util::{self, WORD_SIZE},
};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Positional reader handing out a stream as native-endian 4-byte words.
///
/// Every read or skip returns `Ok(None)` / `Ok(false)` when it starts exactly at the end of the
/// stream. That is how the end of the event sequence is detected. A request that starts before
/// the end but cannot be satisfied fails with [`Details::TruncatedRead`].
#[derive(Debug)]
pub(crate) struct WordReader<R> {
    reader: R,
    position: u64,
    len: u64,
}

impl<R: Read + Seek> WordReader<R> {
    pub(crate) fn new(mut reader: R) -> PdsResult<Self> {
        let position = reader.stream_position().map_err(Details::Seek)?;
        let len = reader.seek(SeekFrom::End(0)).map_err(Details::Seek)?;
        reader
            .seek(SeekFrom::Start(position))
            .map_err(Details::Seek)?;
        Ok(Self {
            reader,
            position,
            len,
        })
    }

    pub(crate) fn read_word(&mut self) -> PdsResult<Option<u32>> {
        let mut word = [0u8; WORD_SIZE];
        if !self.reserve(WORD_SIZE as u64)? {
            return Ok(None);
        }
        self.fill(&mut word)?;
        Ok(Some(u32::from_ne_bytes(word)))
    }

    pub(crate) fn read_words(&mut self, count: usize) -> PdsResult<Option<Vec<u32>>> {
        let mut bytes = Vec::new();
        if !self.read_bytes(count, &mut bytes)? {
            return Ok(None);
        }
        Ok(Some(
            bytes
                .chunks_exact(WORD_SIZE)
                .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ))
    }

    /// Reads `count` words as raw bytes into `buf`, replacing its content but keeping its
    /// allocation.
    pub(crate) fn read_bytes(&mut self, count: usize, buf: &mut Vec<u8>) -> PdsResult<bool> {
        if !self.reserve(count as u64 * WORD_SIZE as u64)? {
            return Ok(false);
        }
        let len = util::safe_word_len(count)?;
        buf.clear();
        buf.resize(len, 0);
        self.fill(buf)?;
        Ok(true)
    }

    /// Moves `count` words forward without transferring them.
    pub(crate) fn skip(&mut self, count: usize) -> PdsResult<bool> {
        let len = count as u64 * WORD_SIZE as u64;
        if !self.reserve(len)? {
            return Ok(false);
        }
        // at most 4 * u32::MAX, so the cast is lossless
        self.reader
            .seek_relative(len as i64)
            .map_err(Details::Seek)?;
        self.position += len;
        Ok(true)
    }

    /// Whether `wanted` more bytes can be consumed. Empty requests always can.
    fn reserve(&self, wanted: u64) -> PdsResult<bool> {
        let available = self.remaining();
        if wanted == 0 {
            Ok(true)
        } else if available == 0 {
            Ok(false)
        } else if available < wanted {
            Err(Details::TruncatedRead { wanted, available }.into())
        } else {
            Ok(true)
        }
    }

    fn fill(&mut self, buf: &mut [u8]) -> PdsResult<()> {
        let wanted = buf.len() as u64;
        self.reader.read_exact(buf).map_err(|e| match e.kind() {
            // the stream shrank after we measured it
            ErrorKind::UnexpectedEof => Error::from(Details::TruncatedRead {
                wanted,
                available: self.remaining(),
            }),
            _ => Error::from(Details::ReadWords(e)),
        })?;
        self.position += wanted;
        Ok(())
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }
}

/// Cursor over a word buffer already loaded in memory, such as the preamble.
///
/// Reads past the end of the buffer fail with [`Details::BufferOverrun`].
#[derive(Debug)]
pub(crate) struct WordCursor<'a> {
    words: &'a [u32],
    position: usize,
}

impl<'a> WordCursor<'a> {
    pub(crate) fn new(words: &'a [u32]) -> Self {
        Self { words, position: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn remaining(&self) -> usize {
        self.words.len() - self.position
    }

    /// The words not consumed yet.
    pub(crate) fn rest(&self) -> &'a [u32] {
        &self.words[self.position..]
    }

    pub(crate) fn next_word(&mut self) -> PdsResult<u32> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn take(&mut self, count: usize) -> PdsResult<&'a [u32]> {
        let rest = self.rest();
        if count > rest.len() {
            return Err(Details::BufferOverrun {
                offset: self.position,
                needed: count,
                available: rest.len(),
            }
            .into());
        }
        self.position += count;
        Ok(&rest[..count])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pds_test_helper::{TestResult, words_to_bytes};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn reader(words: &[u32]) -> PdsResult<WordReader<Cursor<Vec<u8>>>> {
        WordReader::new(Cursor::new(words_to_bytes(words)))
    }

    #[test]
    fn test_read_word_until_end() -> TestResult {
        let mut words = reader(&[1, 2])?;
        assert_eq!(words.read_word()?, Some(1));
        assert_eq!(words.read_word()?, Some(2));
        assert_eq!(words.read_word()?, None);
        assert_eq!(words.read_word()?, None);

        Ok(())
    }

    #[test]
    fn test_read_words() -> TestResult {
        let mut words = reader(&[1, 2, 3])?;
        assert_eq!(words.read_words(2)?, Some(vec![1, 2]));
        assert_eq!(words.remaining(), 4);

        let err = words.read_words(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);
        assert_eq!(
            err.to_string(),
            "Container ended early: needed 8 bytes but only 4 remain"
        );

        Ok(())
    }

    #[test]
    fn test_partial_trailing_word_is_truncation() -> TestResult {
        let mut bytes = words_to_bytes(&[9]);
        bytes.extend_from_slice(&[1, 2]);
        let mut words = WordReader::new(Cursor::new(bytes))?;
        assert_eq!(words.read_word()?, Some(9));
        assert_eq!(
            words.read_word().unwrap_err().kind(),
            ErrorKind::TruncatedRead
        );

        Ok(())
    }

    #[test]
    fn test_skip() -> TestResult {
        let mut words = reader(&[1, 2, 3, 4])?;
        assert!(words.skip(2)?);
        assert_eq!(words.read_word()?, Some(3));
        assert!(words.skip(0)?);
        assert_eq!(words.skip(2).unwrap_err().kind(), ErrorKind::TruncatedRead);
        assert!(words.skip(1)?);
        assert!(!words.skip(1)?);
        // an empty skip succeeds even at the end
        assert!(words.skip(0)?);

        Ok(())
    }

    #[test]
    fn test_read_bytes_reuses_buffer() -> TestResult {
        let mut words = reader(&[0x0403_0201, 5])?;
        let mut buf = vec![0xFF; 16];
        assert!(words.read_bytes(1, &mut buf)?);
        assert_eq!(buf, 0x0403_0201u32.to_ne_bytes());
        assert!(words.read_bytes(1, &mut buf)?);
        assert_eq!(buf, 5u32.to_ne_bytes());
        assert!(!words.read_bytes(1, &mut buf)?);

        Ok(())
    }

    #[test]
    fn test_starts_at_current_position() -> TestResult {
        let mut cursor = Cursor::new(words_to_bytes(&[1, 2, 3]));
        cursor.set_position(4);
        let mut words = WordReader::new(cursor)?;
        assert_eq!(words.remaining(), 8);
        assert_eq!(words.read_word()?, Some(2));

        Ok(())
    }

    #[test]
    fn test_cursor() -> TestResult {
        let buffer = [10, 20, 30];
        let mut cursor = WordCursor::new(&buffer);
        assert_eq!(cursor.next_word()?, 10);
        assert_eq!(cursor.take(2)?, &[20, 30]);
        assert_eq!(cursor.remaining(), 0);

        let err = cursor.next_word().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);
        assert_eq!(
            err.to_string(),
            "Preamble entry at word 3 needs 1 words but only 0 remain"
        );

        Ok(())
    }

    #[test]
    fn test_cursor_overrun_does_not_advance() {
        let buffer = [1, 2];
        let mut cursor = WordCursor::new(&buffer);
        assert!(cursor.take(3).is_err());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.rest(), &[1, 2]);
    }
}
