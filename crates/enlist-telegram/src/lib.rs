// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram platform adapter for Enlist.
//!
//! RPC error classification and reference normalization are always built.
//! The MTProto [`MessagingClient`](enlist_core::MessagingClient)
//! implementation is behind the `mtproto` feature.

#[cfg(feature = "mtproto")]
pub mod client;
pub mod link;
pub mod rpc;

#[cfg(feature = "mtproto")]
pub use client::MtprotoClient;
pub use link::{Lookup, lookup_for};
pub use rpc::{classify_message, classify_rpc};
