//! Minimal scenario runner
//!
//! Runs named checks, records failures instead of stopping at the first one
//! and prints a summary, so one run reports every broken scenario.

use std::time::Instant;

/// Outcome of one check
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub duration_us: u128,
    pub error_message: Option<String>,
}

/// Collects results of named checks
#[derive(Default)]
pub struct TestHarness {
    results: Vec<TestResult>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a single check
    pub fn run_test<F>(&mut self, name: impl Into<String>, test_fn: F)
    where
        F: FnOnce() -> Result<(), String>,
    {
        let start = Instant::now();
        let result = test_fn();
        self.results.push(TestResult {
            name: name.into(),
            passed: result.is_ok(),
            duration_us: start.elapsed().as_micros(),
            error_message: result.err(),
        });
    }

    /// True when every check passed
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Failed checks
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Print one line per check
    pub fn print_summary(&self) {
        let passed = self.results.iter().filter(|r| r.passed).count();
        println!("{}/{} scenarios passed", passed, self.results.len());
        for r in &self.results {
            match &r.error_message {
                None => println!("  ok   {} ({} µs)", r.name, r.duration_us),
                Some(msg) => println!("  FAIL {}: {}", r.name, msg),
            }
        }
    }
}

/// `Err` with a message unless the condition holds
pub fn check(cond: bool, msg: impl FnOnce() -> String) -> Result<(), String> {
    if cond {
        Ok(())
    } else {
        Err(msg())
    }
}
