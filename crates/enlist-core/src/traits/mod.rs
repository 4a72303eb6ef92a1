// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the messaging platform boundary.

pub mod client;

pub use client::MessagingClient;
