//! Output Evaluator - Verdicts for sample test cases
//!
//! **Core Responsibility:**
//! Compare a program's captured output against the expected output and turn
//! run results into per-case verdicts and a pass tally.
//!
//! **Critical Properties:**
//! - Knows nothing about processes or the relay
//! - Pure functions: (expected, run output) → verdict
//!
//! **Comparison Rules:**
//! - Single left-to-right scan, no backtracking
//! - Whitespace (space, tab, `\n`, `\r`) is skipped on the actual side only
//! - Trailing whitespace is ignored on both sides
//! - Whitespace inside the expected output must be matched literally
//! - Case sensitive, byte exact otherwise

use soltest_common::types::TestCase;

use crate::engine::{ExecutionError, RunOutput};

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

/// Whitespace-tolerant comparison of expected and actual output
///
/// Mismatches are resolved only by skipping whitespace in `actual`, so
/// `compare("ab", "a b")` holds while `compare("a b", "ab")` does not.
pub fn compare(expected: &str, actual: &str) -> bool {
    let expected = expected.as_bytes();
    let actual = actual.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < expected.len() && j < actual.len() {
        if expected[i] == actual[j] {
            i += 1;
            j += 1;
        } else if is_whitespace(actual[j]) {
            j += 1;
        } else {
            return false;
        }
    }

    actual[j..].iter().copied().all(is_whitespace)
        && expected[i..].iter().copied().all(is_whitespace)
}

#[derive(Debug)]
pub enum CaseOutcome {
    Passed,
    WrongAnswer,
    /// Timeout, crash or non-zero exit; output is never compared
    Error(ExecutionError),
}

/// Verdict for one sample test, with everything needed to diagnose it
#[derive(Debug)]
pub struct CaseResult {
    /// 1-based position in the question's test list
    pub index: usize,
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub outcome: CaseOutcome,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Passed)
    }
}

/// Judge a single run against its test case
pub fn evaluate_case(index: usize, case: &TestCase, run: RunOutput) -> CaseResult {
    let outcome = match run.error {
        Some(error) => CaseOutcome::Error(error),
        None if compare(&case.output, &run.output) => CaseOutcome::Passed,
        None => CaseOutcome::WrongAnswer,
    };

    CaseResult {
        index,
        input: case.input.clone(),
        expected: case.output.clone(),
        actual: run.output,
        outcome,
    }
}

/// All sample verdicts of one session, in test order
#[derive(Debug, Default)]
pub struct SampleReport {
    pub cases: Vec<CaseResult>,
}

impl SampleReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }
}
