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

use log::{LevelFilter, Log, Metadata, Record};
use std::{cell::RefCell, sync::Once};

thread_local! {
    static LOG_MESSAGES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Keeps every message logged on the current thread and forwards it to `env_logger`.
struct TestLogger {
    delegate: env_logger::Logger,
}

impl Log for TestLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.delegate.enabled(record.metadata()) {
            self.delegate.log(record);
        }
        LOG_MESSAGES.with(|msgs| msgs.borrow_mut().push(format!("{}", record.args())));
    }

    fn flush(&self) {
        self.delegate.flush();
    }
}

static INIT: Once = Once::new();

/// Installs the capturing logger. Safe to call from every test.
pub fn init() {
    INIT.call_once(|| {
        let logger = TestLogger {
            delegate: env_logger::Builder::from_default_env().build(),
        };
        if log::set_boxed_logger(Box::new(logger)).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

pub fn clear_log_messages() {
    LOG_MESSAGES.with(|msgs| msgs.borrow_mut().clear());
}

/// Asserts `unexpected_message` was not logged on this thread.
#[track_caller]
pub fn assert_not_logged(unexpected_message: &str) {
    LOG_MESSAGES.with(|msgs| {
        if msgs.borrow().iter().any(|m| m == unexpected_message) {
            panic!("The following log message should not have been logged: '{unexpected_message}'");
        }
    });
}

/// Asserts `expected_message` was logged on this thread and forgets it.
#[track_caller]
pub fn assert_logged(expected_message: &str) {
    let found = LOG_MESSAGES.with(|msgs| {
        let mut msgs = msgs.borrow_mut();
        match msgs.iter().position(|m| m == expected_message) {
            Some(index) => {
                msgs.remove(index);
                true
            }
            None => false,
        }
    });
    if !found {
        let logged = LOG_MESSAGES.with(|msgs| msgs.borrow().clone());
        panic!("Expected the following log message: '{expected_message}', logged: {logged:?}");
    }
}
