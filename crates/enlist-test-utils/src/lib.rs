// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Enlist integration tests.
//!
//! Provides a scripted platform client and harness infrastructure for fast,
//! deterministic tests without a live messaging account.
//!
//! # Components
//!
//! - [`MockClient`] - Scripted platform with groups, invite links, and failures
//! - [`TestHarness`] - Invite service over a temp ledger

pub mod harness;
pub mod mock_client;

pub use harness::TestHarness;
pub use mock_client::{Call, MockClient, ScriptedFailure, channel, members};
