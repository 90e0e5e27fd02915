// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn from_env_uses_defaults_when_unset() {
    std::env::set_var("OJ_STATE_DIR", "/tmp/oj-config-test");
    std::env::remove_var("OJ_SOCKET_DIR");
    std::env::remove_var("OJ_IPC_TIMEOUT_MS");
    let config = RuntimeConfig::from_env().unwrap();
    assert_eq!(config.socket_dir, PathBuf::from("/tmp/oj-config-test/sockets"));
    assert_eq!(config.ipc_timeout, Duration::from_secs(5));
    std::env::remove_var("OJ_STATE_DIR");
}

#[test]
fn missing_override_file_leaves_config_untouched() {
    let config = RuntimeConfig {
        state_dir: PathBuf::from("/tmp/x"),
        socket_dir: PathBuf::from("/tmp/x/sockets"),
        host_lock_path: PathBuf::from("/tmp/x/state0.lock"),
        ipc_timeout: Duration::from_secs(5),
        host_lock_timeout: Duration::from_secs(10),
        poll_interval: Duration::from_millis(200),
        output_buffer_lines: 1000,
    };
    let reloaded = config.clone().with_file_overrides(Path::new("/no/such/file.toml")).unwrap();
    similar_asserts::assert_eq!(reloaded, config);
}

#[test]
fn file_overrides_apply_named_fields_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("oj.toml");
    std::fs::write(&path, "ipc_timeout_ms = 1500\noutput_buffer_lines = 50\n").unwrap();

    let config = RuntimeConfig {
        state_dir: PathBuf::from("/tmp/x"),
        socket_dir: PathBuf::from("/tmp/x/sockets"),
        host_lock_path: PathBuf::from("/tmp/x/state0.lock"),
        ipc_timeout: Duration::from_secs(5),
        host_lock_timeout: Duration::from_secs(10),
        poll_interval: Duration::from_millis(200),
        output_buffer_lines: 1000,
    }
    .with_file_overrides(&path)
    .unwrap();

    assert_eq!(config.ipc_timeout, Duration::from_millis(1500));
    assert_eq!(config.output_buffer_lines, 50);
    assert_eq!(config.poll_interval, Duration::from_millis(200));
}
