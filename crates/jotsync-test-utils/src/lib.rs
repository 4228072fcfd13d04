// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for jotsync integration tests.
//!
//! # Components
//!
//! - [`MemoryJournalStore`] - in-memory journal store with failure injection
//! - [`TestHarness`] - journal service over a temp SQLite file or the memory store

pub mod harness;
pub mod memory_store;

pub use harness::{TestHarness, TestHarnessBuilder, new_entry};
pub use memory_store::MemoryJournalStore;
