// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ids::{InstanceId, JobId, RunId};

fn id(job: &str, instance: &str) -> JobInstanceIdTriple {
    JobInstanceIdTriple {
        job_id: JobId::from_string(format!("job-{job}")),
        run_id: RunId::from_string(format!("run-{instance}")),
        instance_id: InstanceId::from_string(format!("ist-{instance}")),
    }
}

#[test]
fn parse_pattern_with_at_requires_both_fields() {
    let c = IdCriterion::parse_pattern("build@42", MatchingStrategy::Exact);
    assert!(c.match_both_ids);
    assert_eq!(c.job_id, "build");
    assert_eq!(c.instance_id, "42");
}

#[test]
fn parse_pattern_without_at_matches_either_field() {
    let c = IdCriterion::parse_pattern("build", MatchingStrategy::Exact);
    assert!(!c.match_both_ids);
    let matching_job = id("build", "something-else");
    assert!(c.matches(&matching_job));
}

#[test]
fn none_match_never_matches() {
    let c = IdCriterion::none_match();
    assert!(!c.matches(&id("anything", "anything")));
}

#[test]
fn fn_match_strategy_supports_globs() {
    let c = IdCriterion::new("build-*", "", true, MatchingStrategy::FnMatch);
    assert!(c.matches(&id("build-nightly", "x")));
    assert!(!c.matches(&id("deploy-nightly", "x")));
}

#[test]
fn partial_strategy_is_substring_search() {
    let c = IdCriterion::new("nightly", "", true, MatchingStrategy::Partial);
    assert!(c.matches(&id("build-nightly-job", "x")));
}

#[test]
fn interval_criterion_respects_include_to() {
    let mut lc = crate::lifecycle::Lifecycle::new();
    let ts: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
    lc.add_phase_run(crate::lifecycle::PhaseRun::new("EXEC", RunState::Executing, ts));

    let inclusive = IntervalCriterion::new(RunState::Executing, None, Some(ts), true);
    assert!(inclusive.matches(&lc));

    let exclusive = IntervalCriterion::new(RunState::Executing, None, Some(ts), false);
    assert!(!exclusive.matches(&lc));
}

#[test]
fn state_criteria_flag_group_matches_if_any_group_fully_matches() {
    use TerminationStatusFlag as F;
    let sc = StateCriteria {
        phases: vec![],
        flag_groups: vec![F::EXECUTED | F::SUCCESS, F::EXECUTED | F::FAILURE],
        warning: None,
    };
    assert!(sc.matches("EXEC", F::EXECUTED | F::SUCCESS, false));
    assert!(!sc.matches("EXEC", F::EXECUTED | F::INCOMPLETE, false));
}

#[test]
fn instance_match_criteria_ands_its_clauses() {
    let metadata = JobInstanceMetadata::builder().user_parameter("env", "prod").build();
    let lc = crate::lifecycle::Lifecycle::new();

    let criteria = InstanceMatchCriteria {
        job_ids: vec![metadata.job_id().as_str().into()],
        param_sets: vec![vec![("env".to_string(), "prod".to_string())]],
        ..Default::default()
    };
    assert!(criteria.matches(&metadata, &lc, "INIT", TerminationStatusFlag::NONE, false));

    let mismatched = InstanceMatchCriteria {
        param_sets: vec![vec![("env".to_string(), "staging".to_string())]],
        ..Default::default()
    };
    assert!(!mismatched.matches(&metadata, &lc, "INIT", TerminationStatusFlag::NONE, false));
}

#[test]
fn adding_a_criterion_never_widens_the_match_set() {
    let metadata = JobInstanceMetadata::builder().build();
    let lc = crate::lifecycle::Lifecycle::new();
    let base = InstanceMatchCriteria::default();
    let narrowed = InstanceMatchCriteria {
        job_ids: vec!["job-does-not-exist".into()],
        ..Default::default()
    };
    assert!(base.matches(&metadata, &lc, "INIT", TerminationStatusFlag::NONE, false));
    assert!(!narrowed.matches(&metadata, &lc, "INIT", TerminationStatusFlag::NONE, false));
}

proptest::proptest! {
    /// Adding a `job_ids` clause can only narrow the match set: whatever an
    /// instance's actual job id is, constraining on any non-empty list of
    /// candidate ids never matches more than leaving the clause empty does.
    #[test]
    fn job_ids_clause_is_monotone_narrowing(actual_job_id in "[a-z][a-z0-9-]{0,15}", candidates in proptest::collection::vec("[a-z][a-z0-9-]{0,15}", 0..5)) {
        let unconstrained = InstanceMatchCriteria::default();
        let constrained = InstanceMatchCriteria { job_ids: candidates.iter().map(|c| SmolStr::from(c.as_str())).collect(), ..Default::default() };

        if constrained.matches_job_ids(&actual_job_id) {
            proptest::prop_assert!(unconstrained.matches_job_ids(&actual_job_id));
        }
    }
}
