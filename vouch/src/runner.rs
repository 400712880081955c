//! Test case execution and reporting
//!
//! The runner executes every registered case on its own, catching panics so
//! one failing case never hides another, and collects a [`SuiteReport`] that
//! integrates with `cargo test` through [`SuiteReport::assert_passed`].

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::config::{OutputFormat, RunConfig, RunOrder};
use crate::error::AssertionFailure;
use crate::group::{ExampleGroup, Expectation, TestCase};

/// Outcome of a single test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed { error: AssertionFailure },
    /// The procedure panicked instead of returning a failure
    Panicked { message: String },
}

impl CaseOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseOutcome::Passed => write!(f, "PASSED"),
            CaseOutcome::Failed { error } => write!(f, "FAILED: {}", error),
            CaseOutcome::Panicked { message } => write!(f, "PANICKED: {}", message),
        }
    }
}

/// Result of running one test case
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub description: String,
    pub expectation: Expectation,
    pub outcome: CaseOutcome,
    pub duration: Duration,
}

/// Results of running a whole group
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub reports: Vec<CaseReport>,
    /// Seed used to shuffle the cases, if they were shuffled
    pub seed: Option<u64>,
    pub duration: Duration,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Reports of every case that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.reports.iter().filter(|r| !r.outcome.is_passed())
    }

    /// Find a report by its full description
    pub fn report(&self, description: &str) -> Option<&CaseReport> {
        self.reports.iter().find(|r| r.description == description)
    }

    /// Panic listing every failing case, if any failed
    #[track_caller]
    pub fn assert_passed(&self) {
        if self.is_success() {
            return;
        }
        let mut message = format!("{} of {} cases failed:", self.failed(), self.reports.len());
        for report in self.failures() {
            message.push_str(&format!("\n  {}\n    {}", report.description, report.outcome));
        }
        if let Some(seed) = self.seed {
            message.push_str(&format!("\nSeed: {} (use this to reproduce the order)", seed));
        }
        panic!("{}", message);
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_success() { "ok" } else { "FAILED" };
        write!(
            f,
            "test result: {}. {} passed; {} failed; finished in {:?}",
            status,
            self.passed(),
            self.failed(),
            self.duration
        )?;
        if let Some(seed) = self.seed {
            write!(f, " (seed: {})", seed)?;
        }
        Ok(())
    }
}

/// Runs example groups
pub struct Runner;

impl Runner {
    /// Execute every case in `group` independently
    pub fn run(group: &ExampleGroup, config: &RunConfig) -> SuiteReport {
        let started = Instant::now();
        let mut cases = group.cases();

        let seed = match config.order {
            RunOrder::Defined => None,
            RunOrder::Random => {
                let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
                let mut rng = StdRng::seed_from_u64(seed);
                cases.shuffle(&mut rng);
                Some(seed)
            }
        };

        let formatter = Self::formatter(config.format);
        let mut reports = Vec::with_capacity(cases.len());
        for (description, case) in cases {
            if let Some(formatter) = &formatter {
                print!("{}", formatter.format_case_start(&description));
            }
            let report = Self::run_case(description, case);
            if let Some(formatter) = &formatter {
                println!("{}", formatter.format_case_result(&report));
            }
            reports.push(report);
        }

        let report = SuiteReport {
            reports,
            seed,
            duration: started.elapsed(),
        };
        info!(
            suite = group.description(),
            passed = report.passed(),
            failed = report.failed(),
            seed = ?report.seed,
            "suite finished"
        );
        report
    }

    /// Execute one case, turning a panic into a [`CaseOutcome::Panicked`]
    pub fn run_case(description: String, case: &TestCase) -> CaseReport {
        let started = Instant::now();
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| case.run())) {
            Ok(Ok(())) => CaseOutcome::Passed,
            Ok(Err(error)) => CaseOutcome::Failed { error },
            Err(payload) => CaseOutcome::Panicked {
                message: panic_message(payload.as_ref()),
            },
        };
        debug!(case = description.as_str(), outcome = %outcome, "case finished");
        CaseReport {
            description,
            expectation: case.expectation(),
            outcome,
            duration: started.elapsed(),
        }
    }

    fn formatter(format: OutputFormat) -> Option<Box<dyn CaseFormatter>> {
        match format {
            OutputFormat::Quiet => None,
            OutputFormat::Default => Some(Box::new(DefaultFormatter)),
            OutputFormat::Verbose => Some(Box::new(VerboseFormatter)),
            OutputFormat::Json => Some(Box::new(JsonFormatter)),
        }
    }

    /// Check if we're running with verbose output
    pub fn is_verbose_output() -> bool {
        std::env::args().any(|arg| arg == "--nocapture" || arg == "-v" || arg == "--verbose")
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Per-case output formatting
pub trait CaseFormatter {
    /// Text printed before the case runs
    fn format_case_start(&self, description: &str) -> String;

    /// Text printed once the case finished
    fn format_case_result(&self, report: &CaseReport) -> String;
}

/// `cargo test` style output
pub struct DefaultFormatter;

impl CaseFormatter for DefaultFormatter {
    fn format_case_start(&self, description: &str) -> String {
        format!("test {} ... ", description)
    }

    fn format_case_result(&self, report: &CaseReport) -> String {
        match report.outcome {
            CaseOutcome::Passed => "ok".to_string(),
            _ => "FAILED".to_string(),
        }
    }
}

/// Check marks with failure details
pub struct VerboseFormatter;

impl CaseFormatter for VerboseFormatter {
    fn format_case_start(&self, _description: &str) -> String {
        String::new()
    }

    fn format_case_result(&self, report: &CaseReport) -> String {
        match &report.outcome {
            CaseOutcome::Passed => format!(
                "✓ {} ({}, {:?})",
                report.description, report.expectation, report.duration
            ),
            outcome => format!("✗ {} ({})\n  {}", report.description, report.expectation, outcome),
        }
    }
}

/// One JSON object per finished case
pub struct JsonFormatter;

impl CaseFormatter for JsonFormatter {
    fn format_case_start(&self, _description: &str) -> String {
        String::new()
    }

    #[cfg(feature = "serde")]
    fn format_case_result(&self, report: &CaseReport) -> String {
        let mut event = serde_json::json!({
            "event": if report.outcome.is_passed() { "ok" } else { "failed" },
            "name": report.description,
            "expectation": report.expectation.to_string(),
            "duration_ms": report.duration.as_millis() as u64,
        });
        match &report.outcome {
            CaseOutcome::Passed => {}
            CaseOutcome::Failed { error } => {
                event["error"] = serde_json::Value::String(error.to_string());
            }
            CaseOutcome::Panicked { message } => {
                event["panic"] = serde_json::Value::String(message.clone());
            }
        }
        event.to_string()
    }

    #[cfg(not(feature = "serde"))]
    fn format_case_result(&self, report: &CaseReport) -> String {
        let detail = match &report.outcome {
            CaseOutcome::Passed => String::new(),
            CaseOutcome::Failed { error } => format!(r#","error":"{}""#, escape(&error.to_string())),
            CaseOutcome::Panicked { message } => format!(r#","panic":"{}""#, escape(message)),
        };
        format!(
            r#"{{"event":"{}","name":"{}","expectation":"{}","duration_ms":{}{}}}"#,
            if report.outcome.is_passed() { "ok" } else { "failed" },
            escape(&report.description),
            report.expectation,
            report.duration.as_millis(),
            detail
        )
    }
}

#[cfg(not(feature = "serde"))]
fn escape(text: &str) -> String {
    text.replace('\\', r"\\").replace('"', r#"\""#).replace('\n', r"\n")
}
