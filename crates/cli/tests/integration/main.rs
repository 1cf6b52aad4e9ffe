//! CLI integration tests.
//!
//! Each test drives the real binary against fake `conan`, `cmake` and `boot`
//! scripts that write the same marker files the real tools do.

#![cfg(unix)]

mod pipeline_tests;
