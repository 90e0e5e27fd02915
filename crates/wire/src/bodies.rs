// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource-specific response bodies, shared by the API server (which
//! produces them) and the client library (which deserializes them).

use serde::{Deserialize, Serialize};

/// Body of `/jobs/release/waiting` and `/jobs/release/pending` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasedBody {
    pub released: bool,
}

/// Body of a `/jobs/stop` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopBody {
    pub result: String,
}

/// One line of `/jobs/tail` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailLine {
    pub text: String,
    pub is_error: bool,
}

/// Body of a `/jobs/tail` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailBody {
    pub lines: Vec<TailLine>,
}

/// Body of a `/jobs/_signal/dispatch` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispatchResultBody {
    pub waiter_found: bool,
    pub executed: bool,
}

#[cfg(test)]
#[path = "bodies_tests.rs"]
mod tests;
