//! Conformance harness
//!
//! Runs the forward catalogue and every reverse test against a started
//! [`CrossCallMaster`] and collects a [`Report`].

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use xcall_sdk::{BoundaryError, BoundaryResult, MarshaledValue};

use crate::expected::{forward_cases, reverse_cases};
use crate::master::CrossCallMaster;

/// A harness failure.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The call completed but produced the wrong value
    #[error("{test}: expected {expected}, got {actual}")]
    Assertion {
        test: String,
        expected: String,
        actual: String,
    },

    /// The boundary reported a fault
    #[error("{test}: {source}")]
    Fault {
        test: String,
        #[source]
        source: BoundaryError,
    },
}

impl HarnessError {
    fn assertion(test: &str, expected: impl fmt::Debug, actual: impl fmt::Debug) -> Self {
        HarnessError::Assertion {
            test: test.to_string(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    fn fault(test: &str, source: BoundaryError) -> Self {
        HarnessError::Fault {
            test: test.to_string(),
            source,
        }
    }

    /// Name of the case that failed
    pub fn test(&self) -> &str {
        match self {
            HarnessError::Assertion { test, .. } | HarnessError::Fault { test, .. } => test,
        }
    }
}

/// Which way a case calls across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Native calls a worker entry point
    Forward,
    /// Native asks the worker to run a reverse test
    Reverse,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Reverse => f.write_str("reverse"),
        }
    }
}

enum Check {
    Forward {
        args: Vec<MarshaledValue>,
        ret: MarshaledValue,
        slots: Vec<MarshaledValue>,
    },
    Reverse {
        delivered: Option<String>,
        logged: Option<String>,
    },
}

/// One harness case.
pub struct Case {
    name: &'static str,
    check: Check,
}

impl Case {
    /// Forward call of `entry` with `args`, expecting `ret` and the final
    /// argument slots `slots`
    pub fn forward(
        entry: &'static str,
        args: Vec<MarshaledValue>,
        ret: MarshaledValue,
        slots: Vec<MarshaledValue>,
    ) -> Self {
        Self {
            name: entry,
            check: Check::Forward { args, ret, slots },
        }
    }

    /// Reverse test `test`, expecting the `delivered` result and, if set,
    /// the last call log line `logged`
    pub fn reverse(test: &'static str, delivered: Option<String>, logged: Option<String>) -> Self {
        Self {
            name: test,
            check: Check::Reverse { delivered, logged },
        }
    }

    /// Entry point or reverse test name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Direction of the case
    pub fn direction(&self) -> Direction {
        match self.check {
            Check::Forward { .. } => Direction::Forward,
            Check::Reverse { .. } => Direction::Reverse,
        }
    }

    /// Run the case against `master`.
    pub fn run(&self, master: &CrossCallMaster) -> Result<(), HarnessError> {
        let name = self.name;
        match &self.check {
            Check::Forward { args, ret, slots } => {
                let mut actual = args.clone();
                let returned = master
                    .call(name, &mut actual)
                    .map_err(|e| HarnessError::fault(name, e))?;
                if returned != *ret {
                    return Err(HarnessError::assertion(name, ret, returned));
                }
                if slots.is_empty() {
                    return Ok(());
                }
                for (i, (want, got)) in slots.iter().zip(&actual).enumerate() {
                    if want != got {
                        return Err(HarnessError::assertion(
                            &format!("{} parameter {}", name, i),
                            want,
                            got,
                        ));
                    }
                }
                Ok(())
            }
            Check::Reverse { delivered, logged } => {
                let before = master.call_log().len();
                let result = master
                    .reverse_call(name)
                    .map_err(|e| HarnessError::fault(name, e))?;
                if result != *delivered {
                    return Err(HarnessError::assertion(name, delivered, result));
                }
                if let Some(line) = logged {
                    let log = master.call_log();
                    let last = log.last();
                    if log.len() != before + 1 || last.as_deref() != Some(line.as_str()) {
                        return Err(HarnessError::assertion(name, Some(line), last));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Which cases to run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Restrict to one direction; `None` runs both
    pub direction: Option<Direction>,
    /// Only cases whose name contains this pattern
    pub filter: Option<String>,
    /// Stop at the first failure
    pub bail: bool,
}

impl RunOptions {
    fn selects(&self, case: &Case) -> bool {
        let direction = self.direction.map_or(true, |d| d == case.direction());
        let filter = self
            .filter
            .as_deref()
            .map_or(true, |pattern| case.name().contains(pattern));
        direction && filter
    }
}

/// Outcome of one case.
#[derive(Debug)]
pub struct CaseResult {
    pub name: String,
    pub direction: Direction,
    pub outcome: Result<(), HarnessError>,
    pub duration: Duration,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Outcomes of a harness run, in execution order.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<CaseResult>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &HarnessError> {
        self.results.iter().filter_map(|r| r.outcome.as_ref().err())
    }

    pub fn duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }
}

/// Every case, forward first.
pub fn all_cases() -> BoundaryResult<Vec<Case>> {
    let mut cases = forward_cases()?;
    cases.extend(reverse_cases());
    Ok(cases)
}

/// Run the cases `options` selects.
pub fn run(master: &CrossCallMaster, options: &RunOptions) -> BoundaryResult<Report> {
    let mut report = Report::default();

    for case in all_cases()? {
        if !options.selects(&case) {
            continue;
        }

        let start = Instant::now();
        let outcome = case.run(master);
        let duration = start.elapsed();

        match &outcome {
            Ok(()) => tracing::debug!(case = case.name(), "passed"),
            Err(e) => tracing::warn!(case = case.name(), error = %e, "failed"),
        }

        let failed = outcome.is_err();
        report.results.push(CaseResult {
            name: case.name().to_string(),
            direction: case.direction(),
            outcome,
            duration,
        });

        if failed && options.bail {
            break;
        }
    }

    Ok(report)
}
