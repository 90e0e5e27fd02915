// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ojd` process: host lock, datagram transport, per-instance API
//! server, event fan-out, and the job instance runner that binds a Phaser
//! to all of it.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod api;
pub mod client;
pub mod config;
pub mod coordination;
pub mod env;
pub mod error;
pub mod events;
pub mod host_lock;
pub mod instance;
pub mod logging;
pub mod release;
pub mod transport;

pub use client::{ClientErrorKind, JobsClient, ServerError};
pub use config::RuntimeConfig;
pub use coordination::{PhaseReachedCondition, RemoteDependencyCheck, RuntimeOverlapGuard, RuntimeQueueAdmission};
pub use error::{ConfigError, HostLockError, RuntimeError, TransportError};
pub use events::{EventDispatcher, EventReceiver};
pub use host_lock::{HostLock, HostLockGuard};
pub use instance::{DispatchOutcome, FetchMode, InstanceRegistry, JobInstanceRunner, OutputObserver, ReleaseHandle, TransitionObserver};
pub use release::{ApprovalReleaseHandle, QueueReleaseHandle};
