// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composable predicates over job instances, used by the API server and by
//! coordination phases querying cross-process state.

use crate::lifecycle::Lifecycle;
use crate::metadata::{JobInstanceIdTriple, JobInstanceMetadata};
use crate::run_state::RunState;
use crate::termination::TerminationStatusFlag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// How an [`IdCriterion`] compares a pattern against an actual ID value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingStrategy {
    Exact,
    FnMatch,
    Partial,
    AlwaysTrue,
    AlwaysFalse,
}

impl MatchingStrategy {
    fn matches(self, actual: &str, pattern: &str) -> bool {
        match self {
            Self::Exact => actual == pattern,
            Self::FnMatch => fnmatch(actual, pattern),
            Self::Partial => regex_contains(actual, pattern),
            Self::AlwaysTrue => true,
            Self::AlwaysFalse => false,
        }
    }
}

/// Translate a shell-style glob (`*`, `?`, `[set]`) into a regex and test it.
fn fnmatch(actual: &str, pattern: &str) -> bool {
    let mut translated = String::with_capacity(pattern.len() * 2);
    translated.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            '[' => {
                translated.push('[');
                while let Some(&next) = chars.peek() {
                    translated.push(next);
                    chars.next();
                    if next == ']' {
                        break;
                    }
                }
            }
            _ if regex_syntax::is_meta_character(c) => {
                translated.push('\\');
                translated.push(c);
            }
            _ => translated.push(c),
        }
    }
    translated.push('$');
    regex::Regex::new(&translated).map(|re| re.is_match(actual)).unwrap_or(false)
}

fn regex_contains(actual: &str, pattern: &str) -> bool {
    regex::Regex::new(pattern).map(|re| re.is_match(actual)).unwrap_or(false)
}

/// Matches a job instance's ID pair. Constructed either directly or by
/// parsing a `[job]@[instance]` pattern: with `@` both sides are required
/// (AND), without it the single token matches either field (OR).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCriterion {
    pub job_id: SmolStr,
    pub instance_id: SmolStr,
    pub match_both_ids: bool,
    pub strategy: MatchingStrategy,
}

impl IdCriterion {
    pub fn new(job_id: impl Into<SmolStr>, instance_id: impl Into<SmolStr>, match_both_ids: bool, strategy: MatchingStrategy) -> Self {
        Self { job_id: job_id.into(), instance_id: instance_id.into(), match_both_ids, strategy }
    }

    /// A criterion that never matches anything, used as an explicit
    /// always-rejecting fallback by coordination phases.
    pub fn none_match() -> Self {
        Self::new("", "", true, MatchingStrategy::AlwaysFalse)
    }

    /// Parse `[job]@[instance]`. `job@` matches only job_id, `@instance`
    /// matches only instance_id, a bare token matches either field.
    pub fn parse_pattern(pattern: &str, strategy: MatchingStrategy) -> Self {
        if let Some((job_id, instance_id)) = pattern.split_once('@') {
            Self::new(job_id, instance_id, true, strategy)
        } else {
            Self::new(pattern, pattern, false, strategy)
        }
    }

    pub fn matches(&self, id: &JobInstanceIdTriple) -> bool {
        let job_matches = self.job_id.is_empty() || self.strategy.matches(id.job_id.as_str(), &self.job_id);
        let instance_matches = self.instance_id.is_empty() || self.strategy.matches(id.instance_id.as_str(), &self.instance_id);
        if self.match_both_ids {
            job_matches && instance_matches
        } else {
            job_matches || instance_matches
        }
    }
}

/// Matches the timestamp at which `run_state` was first entered, against an
/// optional `[from, to]` window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalCriterion {
    pub run_state: RunState,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub include_to: bool,
}

impl IntervalCriterion {
    pub fn new(run_state: RunState, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>, include_to: bool) -> Self {
        Self { run_state, from, to, include_to }
    }

    pub fn matches(&self, lifecycle: &Lifecycle) -> bool {
        let Some(event_dt) = lifecycle.state_first_at(self.run_state) else { return false };
        if let Some(from) = self.from {
            if event_dt < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if self.include_to {
                if event_dt > to {
                    return false;
                }
            } else if event_dt >= to {
                return false;
            }
        }
        true
    }
}

/// Matches on phase membership, termination-status flag groups, and an
/// optional warning flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCriteria {
    pub phases: Vec<SmolStr>,
    pub flag_groups: Vec<TerminationStatusFlag>,
    pub warning: Option<bool>,
}

impl StateCriteria {
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty() && self.flag_groups.is_empty() && self.warning.is_none()
    }

    /// `current_phase`/`current_flags` describe the instance's current
    /// phase name and the flags of its most recent termination status (or
    /// `TerminationStatusFlag::NONE` while still running); `has_warning`
    /// reflects whether the instance has an active warning.
    pub fn matches(&self, current_phase: &str, current_flags: TerminationStatusFlag, has_warning: bool) -> bool {
        if !self.phases.is_empty() && !self.phases.iter().any(|p| p == current_phase) {
            return false;
        }
        if !self.flag_groups.is_empty() && !self.flag_groups.iter().any(|group| current_flags.contains(*group)) {
            return false;
        }
        if let Some(expected) = self.warning {
            if expected != has_warning {
                return false;
            }
        }
        true
    }
}

/// AND-of-all composite: an instance must satisfy every non-empty clause.
/// Within each multi-valued clause (`id_criteria`, `interval_criteria`,
/// `param_sets`), a match on any one element is sufficient (OR).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceMatchCriteria {
    #[serde(default)]
    pub id_criteria: Vec<IdCriterion>,
    #[serde(default)]
    pub interval_criteria: Vec<IntervalCriterion>,
    #[serde(default)]
    pub state_criteria: Option<StateCriteria>,
    #[serde(default)]
    pub job_ids: Vec<SmolStr>,
    #[serde(default)]
    pub param_sets: Vec<Vec<(String, String)>>,
}

impl InstanceMatchCriteria {
    pub fn parse_pattern(pattern: &str, strategy: MatchingStrategy) -> Self {
        Self { id_criteria: vec![IdCriterion::parse_pattern(pattern, strategy)], ..Default::default() }
    }

    pub fn matches_id(&self, id: &JobInstanceIdTriple) -> bool {
        self.id_criteria.is_empty() || self.id_criteria.iter().any(|c| c.matches(id))
    }

    pub fn matches_interval(&self, lifecycle: &Lifecycle) -> bool {
        self.interval_criteria.is_empty() || self.interval_criteria.iter().any(|c| c.matches(lifecycle))
    }

    pub fn matches_state(&self, current_phase: &str, current_flags: TerminationStatusFlag, has_warning: bool) -> bool {
        match &self.state_criteria {
            None => true,
            Some(sc) => sc.is_empty() || sc.matches(current_phase, current_flags, has_warning),
        }
    }

    pub fn matches_job_ids(&self, job_id: &str) -> bool {
        self.job_ids.is_empty() || self.job_ids.iter().any(|j| j == job_id)
    }

    pub fn matches_parameters(&self, metadata: &JobInstanceMetadata) -> bool {
        self.param_sets.is_empty()
            || self.param_sets.iter().any(|set| metadata.contains_parameters(set.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
    }

    /// Full match: every clause above must pass.
    pub fn matches(
        &self,
        metadata: &JobInstanceMetadata,
        lifecycle: &Lifecycle,
        current_phase: &str,
        current_flags: TerminationStatusFlag,
        has_warning: bool,
    ) -> bool {
        self.matches_id(&metadata.id)
            && self.matches_interval(lifecycle)
            && self.matches_state(current_phase, current_flags, has_warning)
            && self.matches_job_ids(metadata.job_id().as_str())
            && self.matches_parameters(metadata)
    }
}

/// A module-private shim so `fnmatch` can reuse `regex`'s metacharacter
/// escaping logic without adding a dependency on the `regex-syntax` crate
/// directly for this one helper.
mod regex_syntax {
    pub fn is_meta_character(c: char) -> bool {
        matches!(c, '.' | '+' | '(' | ')' | '|' | '^' | '$' | '\\' | '{' | '}')
    }
}

#[cfg(test)]
#[path = "criteria_tests.rs"]
mod tests;
