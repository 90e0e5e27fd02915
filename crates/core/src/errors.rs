// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invalid-state and invalid-input error taxonomy shared by the Phaser and
//! the coordination phases.

use thiserror::Error;

/// An API was used in the wrong lifecycle position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("prime() called more than once")]
    AlreadyPrimed,
    #[error("run() called before prime()")]
    NotPrimed,
    #[error("duplicate phase name: {0}")]
    DuplicatePhaseName(String),
    #[error("phase not found: {0}")]
    PhaseNotFound(String),
    #[error("run() called after the phaser already terminated")]
    AlreadyTerminated,
}

/// An API was given malformed input (criteria, request fields).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("invalid id pattern: {0}")]
    InvalidIdPattern(String),
    #[error("invalid matching strategy: {0}")]
    InvalidStrategy(String),
    #[error("invalid run state: {0}")]
    InvalidRunState(String),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
