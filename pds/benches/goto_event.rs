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

use criterion::{Criterion, criterion_group, criterion_main};
use pds::{PassthroughRegistry, PdsSource};
use pds_test_helper::ContainerBuilder;
use std::{hint::black_box, io::Cursor};

fn make_container(n_events: u32, body_words: u32) -> Vec<u8> {
    (0..n_events)
        .fold(
            ContainerBuilder::new()
                .type_name("Hits")
                .product(0, "hits"),
            |builder, i| builder.event((0..body_words).map(|w| i ^ w).collect()),
        )
        .build()
}

fn read_all(bytes: &[u8]) -> anyhow::Result<u64> {
    let mut source = PdsSource::builder(Cursor::new(bytes))
        .registry(&PassthroughRegistry)
        .build()?;
    let mut total = 0;
    while source.goto_event(source.next_event())? {
        total += source.event_body().len() as u64;
    }
    Ok(total)
}

fn skip_to_last(bytes: &[u8], n_events: u32) -> anyhow::Result<bool> {
    let mut source = PdsSource::builder(Cursor::new(bytes))
        .registry(&PassthroughRegistry)
        .build()?;
    Ok(source.goto_event(n_events as u64 - 1)?)
}

fn bench_read(c: &mut Criterion, n_events: u32, body_words: u32, name: &str) {
    let bytes = make_container(n_events, body_words);
    c.bench_function(name, |b| b.iter(|| read_all(black_box(&bytes))));
}

fn bench_skip(c: &mut Criterion, n_events: u32, body_words: u32, name: &str) {
    let bytes = make_container(n_events, body_words);
    c.bench_function(name, |b| {
        b.iter(|| skip_to_last(black_box(&bytes), n_events))
    });
}

fn bench_read_1_000_small_events(c: &mut Criterion) {
    bench_read(c, 1_000, 4, "read 1000 events of 4 words");
}

fn bench_read_100_large_events(c: &mut Criterion) {
    bench_read(c, 100, 16_384, "read 100 events of 16384 words");
}

fn bench_skip_1_000_small_events(c: &mut Criterion) {
    bench_skip(c, 1_000, 4, "skip to event 999 of 4 words each");
}

fn bench_skip_100_large_events(c: &mut Criterion) {
    bench_skip(c, 100, 16_384, "skip to event 99 of 16384 words each");
}

criterion_group!(
    benches,
    bench_read_1_000_small_events,
    bench_read_100_large_events,
    bench_skip_1_000_small_events,
    bench_skip_100_large_events,
);
criterion_main!(benches);
