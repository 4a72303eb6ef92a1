// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP control surface for the Enlist invite engine.
//!
//! Exposes login, start/stop, status and history over JSON, with optional
//! bearer-token authentication and an unauthenticated `/health` probe.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
