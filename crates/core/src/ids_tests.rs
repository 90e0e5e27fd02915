// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_and_run_ids_carry_distinct_prefixes() {
    assert!(JobId::new().as_str().starts_with("job-"));
    assert!(RunId::new().as_str().starts_with("run-"));
    assert!(InstanceId::new().as_str().starts_with("ist-"));
}

#[test]
fn run_id_can_be_set_equal_to_instance_id() {
    let instance = InstanceId::new();
    let run = RunId::from_string(instance.as_str().replacen("ist-", "run-", 1));
    assert_eq!(run.suffix(), instance.suffix());
}
