// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration: every tunable named in the spec is a constructor
//! parameter with a sensible default (see [`crate::env`]), collected here so
//! an embedding application can read or override them in one place. This
//! crate never parses a CLI or discovers a config file on its own — an
//! embedding application may hand it one via [`RuntimeConfig::with_file_overrides`].

use crate::error::{ConfigError, RuntimeError};
use crate::{env, host_lock};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub state_dir: PathBuf,
    pub socket_dir: PathBuf,
    pub host_lock_path: PathBuf,
    pub ipc_timeout: Duration,
    pub host_lock_timeout: Duration,
    pub poll_interval: Duration,
    pub output_buffer_lines: usize,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, RuntimeError> {
        let state_dir = env::state_dir()?;
        let socket_dir = env::socket_dir()?;
        let host_lock_path = state_dir.join("state0.lock");
        Ok(Self {
            state_dir,
            socket_dir,
            host_lock_path,
            ipc_timeout: env::ipc_timeout(),
            host_lock_timeout: env::host_lock_timeout(),
            poll_interval: env::poll_interval(),
            output_buffer_lines: env::output_buffer_lines(),
        })
    }

    /// Overlay values from an optional TOML file. A missing file is not an
    /// error — it just means nothing is overridden.
    pub fn with_file_overrides(mut self, path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(self);
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let raw: RawOverrides = toml::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        if let Some(v) = raw.ipc_timeout_ms {
            self.ipc_timeout = Duration::from_millis(v);
        }
        if let Some(v) = raw.host_lock_timeout_ms {
            self.host_lock_timeout = Duration::from_millis(v);
        }
        if let Some(v) = raw.poll_interval_ms {
            self.poll_interval = Duration::from_millis(v);
        }
        if let Some(v) = raw.output_buffer_lines {
            self.output_buffer_lines = v;
        }
        Ok(self)
    }

    pub fn host_lock(&self) -> host_lock::HostLock {
        host_lock::HostLock::new(self.host_lock_path.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawOverrides {
    ipc_timeout_ms: Option<u64>,
    host_lock_timeout_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    output_buffer_lines: Option<usize>,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
