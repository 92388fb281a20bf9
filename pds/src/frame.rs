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

//! Reading and skipping of event frames.
//!
//! A frame is laid out as `[header; EVENT_HEADER_WORDS] [n] [body; n] [n]`. The header is not
//! interpreted by the reader.

use crate::{
    PdsResult,
    error::Details,
    util::{self, WORD_SIZE},
    words::WordReader,
};
use log::trace;
use std::io::{Read, Seek};

/// Number of opaque words at the start of every event frame.
pub const EVENT_HEADER_WORDS: usize = 5;

/// Reads the frame of `event` and stores its body in `body`.
///
/// Returns `false` when the stream ended cleanly before the frame.
pub(crate) fn read_frame<R: Read + Seek>(
    words: &mut WordReader<R>,
    event: u64,
    body: &mut Vec<u8>,
) -> PdsResult<bool> {
    let Some(header) = words.read_words(EVENT_HEADER_WORDS + 1)? else {
        return Ok(false);
    };
    let body_size = header[EVENT_HEADER_WORDS];

    // the body is read together with its trailing cross-check word
    let words_left = body_size as usize + 1;
    if !words.read_bytes(words_left, body)? {
        return Err(truncated(words_left));
    }
    let tail = body.len() - WORD_SIZE;
    let cross_check = util::word_at(body, tail).ok_or_else(|| truncated(1))?;
    body.truncate(tail);

    check_cross(event, body_size, cross_check)?;
    trace!("Read event {event} ({body_size} words)");
    Ok(true)
}

/// Moves over the frame of `event` without loading its body.
///
/// Returns `false` when the stream ended cleanly before the frame.
pub(crate) fn skip_frame<R: Read + Seek>(words: &mut WordReader<R>, event: u64) -> PdsResult<bool> {
    if !words.skip(EVENT_HEADER_WORDS)? {
        return Ok(false);
    }
    let body_size = words.read_word()?.ok_or_else(|| truncated(1))?;
    if !words.skip(body_size as usize)? {
        return Err(truncated(body_size as usize + 1));
    }
    let cross_check = words.read_word()?.ok_or_else(|| truncated(1))?;

    check_cross(event, body_size, cross_check)?;
    trace!("Skipped event {event} ({body_size} words)");
    Ok(true)
}

fn check_cross(event: u64, body_size: u32, cross_check: u32) -> PdsResult<()> {
    if cross_check != body_size {
        return Err(Details::FrameCorrupt {
            event,
            body_size,
            cross_check,
        }
        .into());
    }
    Ok(())
}

/// The stream ended inside a frame with `words` words still expected.
fn truncated(words: usize) -> crate::Error {
    Details::TruncatedRead {
        wanted: (words * WORD_SIZE) as u64,
        available: 0,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pds_test_helper::{TestResult, encode_frame, words_to_bytes};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn frames(bodies: &[&[u32]]) -> PdsResult<WordReader<Cursor<Vec<u8>>>> {
        let words: Vec<u32> = bodies.iter().flat_map(|body| encode_frame(body)).collect();
        WordReader::new(Cursor::new(words_to_bytes(&words)))
    }

    #[test]
    fn test_read_frames() -> TestResult {
        let mut words = frames(&[&[1, 2, 3], &[], &[4]])?;
        let mut body = Vec::new();

        assert!(read_frame(&mut words, 0, &mut body)?);
        assert_eq!(body, words_to_bytes(&[1, 2, 3]));
        assert!(read_frame(&mut words, 1, &mut body)?);
        assert!(body.is_empty());
        assert!(read_frame(&mut words, 2, &mut body)?);
        assert_eq!(body, words_to_bytes(&[4]));
        assert!(!read_frame(&mut words, 3, &mut body)?);

        Ok(())
    }

    #[test]
    fn test_skip_frames() -> TestResult {
        let mut words = frames(&[&[1, 2, 3], &[], &[4]])?;
        let mut body = Vec::new();

        assert!(skip_frame(&mut words, 0)?);
        assert!(skip_frame(&mut words, 1)?);
        assert!(read_frame(&mut words, 2, &mut body)?);
        assert_eq!(body, words_to_bytes(&[4]));
        assert!(!skip_frame(&mut words, 3)?);

        Ok(())
    }

    #[test]
    fn test_read_corrupt_cross_check() -> TestResult {
        let mut raw = encode_frame(&[7, 7]);
        let last = raw.len() - 1;
        raw[last] = 3;
        let mut words = WordReader::new(Cursor::new(words_to_bytes(&raw)))?;

        let err = read_frame(&mut words, 4, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FrameCorrupt);
        assert_eq!(
            err.to_string(),
            "Event 4 is corrupt: body size is 2 words but the cross-check word is 3"
        );

        Ok(())
    }

    #[test]
    fn test_skip_corrupt_cross_check() -> TestResult {
        let mut raw = encode_frame(&[7, 7]);
        let last = raw.len() - 1;
        raw[last] = 0;
        let mut words = WordReader::new(Cursor::new(words_to_bytes(&raw)))?;

        let err = skip_frame(&mut words, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FrameCorrupt);

        Ok(())
    }

    #[test]
    fn test_truncated_inside_body() -> TestResult {
        let raw = encode_frame(&[1, 2, 3, 4]);
        let cut = &raw[..raw.len() - 2];

        let mut words = WordReader::new(Cursor::new(words_to_bytes(cut)))?;
        let err = read_frame(&mut words, 0, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);

        let mut words = WordReader::new(Cursor::new(words_to_bytes(cut)))?;
        let err = skip_frame(&mut words, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);

        Ok(())
    }

    #[test]
    fn test_truncated_after_header() -> TestResult {
        // header and size word are present, nothing else
        let raw = &encode_frame(&[1])[..EVENT_HEADER_WORDS + 1];

        let mut words = WordReader::new(Cursor::new(words_to_bytes(raw)))?;
        let err = read_frame(&mut words, 0, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);

        let mut words = WordReader::new(Cursor::new(words_to_bytes(raw)))?;
        let err = skip_frame(&mut words, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);

        Ok(())
    }

    #[test]
    fn test_empty_body_truncated_before_cross_check() -> TestResult {
        let raw = &encode_frame(&[])[..EVENT_HEADER_WORDS + 1];
        let mut words = WordReader::new(Cursor::new(words_to_bytes(raw)))?;
        let err = skip_frame(&mut words, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedRead);

        Ok(())
    }

    #[test]
    fn test_partial_header() -> TestResult {
        let raw = &encode_frame(&[1])[..3];
        let mut words = WordReader::new(Cursor::new(words_to_bytes(raw)))?;
        assert_eq!(
            read_frame(&mut words, 0, &mut Vec::new()).unwrap_err().kind(),
            ErrorKind::TruncatedRead
        );

        Ok(())
    }
}
