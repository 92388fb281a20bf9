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

//! Forward-only random access over the event frames of a container.

use crate::{
    PdsResult,
    error::Details,
    frame::{read_frame, skip_frame},
    words::WordReader,
};
use log::warn;
use std::io::{Read, Seek};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Open,
    /// The end of the container was reached, no event will ever be produced again.
    Exhausted,
    /// A read failed part-way through a frame, so the stream offset is unknown.
    Poisoned { event: u64 },
}

/// Walks the event frames following the preamble.
///
/// The stream keeps a logical cursor, the index of the next frame on the stream. Reaching event
/// `n` from the cursor costs one skip per frame in between, and requests behind the cursor are
/// rejected.
#[derive(Debug)]
pub(crate) struct EventStream<R> {
    words: WordReader<R>,
    next_event: u64,
    loaded: Option<u64>,
    body: Vec<u8>,
    state: StreamState,
}

impl<R: Read + Seek> EventStream<R> {
    /// `words` must be positioned on the first frame.
    pub(crate) fn new(words: WordReader<R>) -> Self {
        Self {
            words,
            next_event: 0,
            loaded: None,
            body: Vec::new(),
            state: StreamState::Open,
        }
    }

    /// Index of the next frame on the stream.
    pub(crate) fn next_event(&self) -> u64 {
        self.next_event
    }

    /// Index of the event whose body is currently loaded.
    pub(crate) fn loaded_event(&self) -> Option<u64> {
        self.loaded
    }

    /// Body of the loaded event, empty when none is loaded.
    pub(crate) fn body(&self) -> &[u8] {
        &self.body
    }

    /// Forgets the loaded event. The cursor stays where it is.
    pub(crate) fn unload(&mut self) {
        self.loaded = None;
        self.body.clear();
    }

    /// Loads the body of event `target`.
    ///
    /// Returns `false` when the container holds fewer than `target + 1` events.
    pub(crate) fn goto_event(&mut self, target: u64) -> PdsResult<bool> {
        if target < self.next_event {
            return Err(Details::UnsupportedSeek {
                current: self.next_event,
                requested: target,
            }
            .into());
        }
        match self.state {
            StreamState::Open => {}
            StreamState::Exhausted => return Ok(false),
            StreamState::Poisoned { event } => return Err(Details::Poisoned { event }.into()),
        }

        self.loaded = None;
        match self.advance_to(target) {
            Ok(true) => {
                self.loaded = Some(target);
                Ok(true)
            }
            Ok(false) => {
                self.body.clear();
                self.state = StreamState::Exhausted;
                Ok(false)
            }
            Err(e) => {
                warn!("Stopping the event stream at event {}: {e}", self.next_event);
                self.body.clear();
                self.state = StreamState::Poisoned {
                    event: self.next_event,
                };
                Err(e)
            }
        }
    }

    fn advance_to(&mut self, target: u64) -> PdsResult<bool> {
        while self.next_event != target {
            if !skip_frame(&mut self.words, self.next_event)? {
                return Ok(false);
            }
            self.next_event += 1;
        }
        if !read_frame(&mut self.words, self.next_event, &mut self.body)? {
            return Ok(false);
        }
        self.next_event += 1;
        Ok(true)
    }
}
