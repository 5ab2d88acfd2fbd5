//! Runtime support for generated suites.
//!
//! The comparison itself (random machine states, two execution paths, state
//! diffing) lives behind [`Comparator`]. This module invokes it per function,
//! keeps one failing function from aborting the rest, and buckets the results.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("Function `{0}` is unknown to the comparator")]
    UnknownFunction(String),
    #[error("Execution failed: {0}")]
    Execution(String),
}

/// Diagnostics for one randomized initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialDiagnostics {
    pub trial_number: u32,
    pub passed: bool,
    /// Concrete state differences, e.g. `Memory[0x0010]: interpreter=0x01, generated=0x02`.
    pub differences: Vec<String>,
}

/// Result of `compare(function_name, trial_count)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub function_name: String,
    pub total_trials: u32,
    pub passed_trials: u32,
    pub failed_trials: u32,
    pub trials: Vec<TrialDiagnostics>,
}

impl ComparisonReport {
    /// Build a report from per-trial diagnostics, deriving the counts.
    pub fn from_trials(function_name: impl Into<String>, trials: Vec<TrialDiagnostics>) -> Self {
        let total_trials = trials.len() as u32;
        let passed_trials = trials.iter().filter(|t| t.passed).count() as u32;
        Self {
            function_name: function_name.into(),
            total_trials,
            passed_trials,
            failed_trials: total_trials - passed_trials,
            trials,
        }
    }

    /// Passed fraction of trials, capped at 1.0.
    pub fn pass_rate(&self) -> f64 {
        if self.total_trials > 0 {
            f64::from(self.passed_trials.min(self.total_trials)) / f64::from(self.total_trials)
        } else {
            0.0
        }
    }

    /// Per-function report text, listing at most `max_differences` per failing trial.
    pub fn render_text(&self, max_differences: usize) -> String {
        let mut out = format!(
            "{}: {}/{} passed ({:.1}%)\n",
            self.function_name,
            self.passed_trials,
            self.total_trials,
            self.pass_rate() * 100.0
        );
        if self.trials.iter().any(|t| !t.passed) {
            out.push_str("  Failed tests:\n");
            for trial in self.trials.iter().filter(|t| !t.passed) {
                out.push_str(&format!("    Test #{}:\n", trial.trial_number));
                for diff in trial.differences.iter().take(max_differences) {
                    out.push_str(&format!("      - {diff}\n"));
                }
                if trial.differences.len() > max_differences {
                    out.push_str(&format!(
                        "      ... and {} more differences\n",
                        trial.differences.len() - max_differences
                    ));
                }
            }
        }
        out
    }
}

/// The external per-function comparison procedure.
///
/// Implementations generate `trial_count` randomized initial machine states,
/// run the function through both execution paths, and report per-state
/// equality of memory, registers and flags.
pub trait Comparator {
    fn compare(
        &self,
        function_name: &str,
        trial_count: u32,
    ) -> Result<ComparisonReport, ComparisonError>;
}

impl<F> Comparator for F
where
    F: Fn(&str, u32) -> Result<ComparisonReport, ComparisonError>,
{
    fn compare(
        &self,
        function_name: &str,
        trial_count: u32,
    ) -> Result<ComparisonReport, ComparisonError> {
        self(function_name, trial_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Passed,
    Partial,
    Failed,
    Errored,
}

/// One function's entry in the aggregate summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionOutcome {
    pub function_name: String,
    pub total_trials: u32,
    pub passed_trials: u32,
    pub pass_rate: f64,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FunctionOutcome {
    /// A report claiming more passed than total trials is recorded as errored.
    pub fn from_report(report: &ComparisonReport) -> Self {
        if report.passed_trials > report.total_trials {
            return Self::errored(
                &report.function_name,
                report.total_trials,
                format!(
                    "inconsistent report: {} passed of {} trials",
                    report.passed_trials, report.total_trials
                ),
            );
        }
        let pass_rate = report.pass_rate();
        let status = if pass_rate >= 1.0 {
            OutcomeStatus::Passed
        } else if pass_rate > 0.0 {
            OutcomeStatus::Partial
        } else {
            OutcomeStatus::Failed
        };
        Self {
            function_name: report.function_name.clone(),
            total_trials: report.total_trials,
            passed_trials: report.passed_trials,
            pass_rate,
            status,
            error: None,
        }
    }

    /// An errored comparison counts every requested trial as failed.
    pub fn errored(function_name: &str, trial_count: u32, error: impl Into<String>) -> Self {
        Self {
            function_name: function_name.to_string(),
            total_trials: trial_count,
            passed_trials: 0,
            pass_rate: 0.0,
            status: OutcomeStatus::Errored,
            error: Some(error.into()),
        }
    }
}

/// Aggregate statistics over every function in a suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub outcomes: Vec<FunctionOutcome>,
    pub fully_passing: usize,
    pub partially_passing: usize,
    /// Includes errored functions.
    pub fully_failing: usize,
    pub errored: usize,
    pub total_trials: u64,
    pub passed_trials: u64,
}

impl SuiteSummary {
    pub fn from_outcomes(outcomes: Vec<FunctionOutcome>) -> Self {
        let mut summary = SuiteSummary::default();
        for outcome in &outcomes {
            match outcome.status {
                OutcomeStatus::Passed => summary.fully_passing += 1,
                OutcomeStatus::Partial => summary.partially_passing += 1,
                OutcomeStatus::Failed => summary.fully_failing += 1,
                OutcomeStatus::Errored => {
                    summary.fully_failing += 1;
                    summary.errored += 1;
                }
            }
            summary.total_trials += u64::from(outcome.total_trials);
            summary.passed_trials += u64::from(outcome.passed_trials);
        }
        summary.outcomes = outcomes;
        summary
    }

    pub fn functions_tested(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed_trials(&self) -> u64 {
        self.total_trials.saturating_sub(self.passed_trials)
    }

    pub fn overall_pass_rate(&self) -> f64 {
        if self.total_trials > 0 {
            self.passed_trials as f64 / self.total_trials as f64
        } else {
            0.0
        }
    }

    pub fn render_text(&self, suite_name: &str) -> String {
        let heavy = "=".repeat(80);
        let light = "-".repeat(80);
        let mut out = String::new();
        out.push_str(&format!("{heavy}\n{suite_name} Differential Test - Summary\n{heavy}\n"));
        for outcome in &self.outcomes {
            let line = match outcome.status {
                OutcomeStatus::Errored => format!(
                    "ERROR {:<35} {}",
                    outcome.function_name,
                    outcome.error.as_deref().unwrap_or("unknown error")
                ),
                status => format!(
                    "{} {:<35} {}/{} ({:.0}%)",
                    if status == OutcomeStatus::Passed { "PASS " } else { "FAIL " },
                    outcome.function_name,
                    outcome.passed_trials,
                    outcome.total_trials,
                    outcome.pass_rate * 100.0
                ),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&format!("\n{heavy}\nSummary:\n{light}\n"));
        out.push_str(&format!("Functions tested: {}\n", self.functions_tested()));
        out.push_str(&format!("  Fully passing (100%): {}\n", self.fully_passing));
        out.push_str(&format!("  Partially passing: {}\n", self.partially_passing));
        out.push_str(&format!("  Fully failing (0%): {}\n", self.fully_failing));
        out.push_str(&format!("  Errored: {}\n", self.errored));
        out.push('\n');
        out.push_str(&format!("Total test cases: {}\n", self.total_trials));
        out.push_str(&format!("  Passed: {}\n", self.passed_trials));
        out.push_str(&format!("  Failed: {}\n", self.failed_trials()));
        out.push_str(&format!("  Overall pass rate: {:.1}%\n", self.overall_pass_rate() * 100.0));
        out.push_str(&heavy);
        out.push('\n');
        out
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

/// Invoke the comparator once, turning an `Err` or a panic into an errored outcome.
pub fn compare_one<C: Comparator + ?Sized>(
    comparator: &C,
    function_name: &str,
    trial_count: u32,
) -> Result<ComparisonReport, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| comparator.compare(function_name, trial_count))) {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(panic_message(payload)),
    }
}

/// Per-function unit: compare, print the report, return the outcome.
pub fn run_function<C: Comparator + ?Sized>(
    comparator: &C,
    function_name: &str,
    trial_count: u32,
    max_differences: usize,
) -> FunctionOutcome {
    match compare_one(comparator, function_name, trial_count) {
        Ok(report) => {
            print!("{}", report.render_text(max_differences));
            FunctionOutcome::from_report(&report)
        }
        Err(err) => {
            println!("{function_name}: error: {err}");
            FunctionOutcome::errored(function_name, trial_count, err)
        }
    }
}

/// Aggregate unit: compare every function, never stopping on a failure.
pub fn run_aggregate<C: Comparator + ?Sized, S: AsRef<str>>(
    functions: &[S],
    trial_count: u32,
    comparator: &C,
) -> SuiteSummary {
    let outcomes = functions
        .iter()
        .map(|name| {
            let name = name.as_ref();
            match compare_one(comparator, name, trial_count) {
                Ok(report) => FunctionOutcome::from_report(&report),
                Err(err) => FunctionOutcome::errored(name, trial_count, err),
            }
        })
        .collect();
    SuiteSummary::from_outcomes(outcomes)
}
