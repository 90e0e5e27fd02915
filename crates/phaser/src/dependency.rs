// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checks a set of other job runs once before letting this instance proceed;
//! unlike the waiting phases, a dependency is evaluated exactly once and
//! never polled.

use crate::phase::{Phase, PhaseSignal};
use async_trait::async_trait;
use oj_core::{PhaseMetadata, RunState, TerminationStatus};
use smol_str::SmolStr;
use std::sync::Arc;

/// One dependency to be evaluated before this instance may proceed.
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    async fn is_satisfied(&self) -> bool;
}

pub struct DependencyPhase {
    name: SmolStr,
    dependencies: Vec<Arc<dyn DependencyCheck>>,
}

impl DependencyPhase {
    pub fn new(name: impl Into<SmolStr>, dependencies: Vec<Arc<dyn DependencyCheck>>) -> Self {
        Self { name: name.into(), dependencies }
    }
}

#[async_trait]
impl Phase for DependencyPhase {
    fn metadata(&self) -> PhaseMetadata {
        PhaseMetadata::new(self.name.clone(), RunState::Evaluating)
    }

    fn stop_status(&self) -> TerminationStatus {
        TerminationStatus::Cancelled
    }

    async fn run(&self) -> Result<(), PhaseSignal> {
        for dependency in &self.dependencies {
            if !dependency.is_satisfied().await {
                return Err(PhaseSignal::Terminate(TerminationStatus::Unsatisfied));
            }
        }
        Ok(())
    }

    fn stop(&self) {}
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
