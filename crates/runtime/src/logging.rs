// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing` subscriber setup for the `ojd` binary. Library code in this
//! workspace never installs a subscriber itself — only the binary entry
//! point does.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install a subscriber that writes to both stderr and a daily-rolling log
/// file under `log_dir`. The returned guard must be kept alive for the
/// duration of the process — dropping it flushes and stops the writer
/// thread.
pub fn init(log_dir: &Path) -> Result<WorkerGuard, std::io::Error> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "runtime.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).with_ansi(false).init();

    Ok(guard)
}
