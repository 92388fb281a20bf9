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

//! Shared helpers for the tests of the `pds` crate.

pub mod builder;
pub mod logger;

pub use builder::{
    ContainerBuilder, EVENT_HEADER_WORDS, MAGIC, encode_catalog, encode_frame,
    encode_string_table, pack_bytes, segmented_body, words_to_bytes,
};
pub use logger::{assert_logged, assert_not_logged, clear_log_messages, init};

/// Return type of tests, so they can use `?`.
pub type TestResult<T = ()> = anyhow::Result<T>;
