// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Simia paper-chat backend.
//!
//! Exposes four endpoints: `POST /chat`, `POST /chat/stream`,
//! `GET /health`, and `GET /papers`. The chat endpoints sit behind an
//! origin allow-list and rolling rate limits; health and the paper
//! listing are open. Streaming answers go out as Server-Sent Events.

pub mod gate;
pub mod handlers;
pub mod server;
pub mod sse;

pub use gate::{AccessGate, Admission, GateLimits};
pub use server::{build_router, start_server, AppState, ServerConfig};
