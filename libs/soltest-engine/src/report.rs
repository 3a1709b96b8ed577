// Terminal output for a test session
//
// Every block ends with a newline. Case verdicts are printed as they finish;
// on a runtime error the program output comes before the error, on a wrong
// answer the input, expected and actual output are all shown.

use colored::Colorize;
use soltest_common::types::Question;

use crate::evaluator::{CaseOutcome, CaseResult, SampleReport};

const WIDTH: usize = 70;

pub fn question_banner(question: Option<&Question>) {
    let Some(question) = question else {
        println!("{}", banner_line("No Question").bold());
        return;
    };

    println!("{}", "═".repeat(WIDTH));
    println!("{}", center(&question.name).bold());
    if !question.group.is_empty() {
        println!("{}", center(&question.group));
    }
    if !question.url.is_empty() {
        println!("{}", center(&question.url).bright_blue());
    }
    println!("{}", center(&limits_line(question)).dimmed());
    println!("{}", "═".repeat(WIDTH));
}

pub fn success(message: &str) {
    println!("{}", banner_line(message).green().bold());
}

pub fn failure(message: &str) {
    println!("{}", banner_line(message).red().bold());
}

pub fn notice(message: &str) {
    println!("{}", banner_line(message).yellow().bold());
}

/// Boxed block such as "Compiler Output"; nothing is printed for an empty body
pub fn section(header: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    println!("{}", boxed(header, body).red());
}

pub fn print_case(result: &CaseResult) {
    print!("{}", case_block(result));
}

/// Verdict block for one case as printed by [`print_case`]
pub fn case_block(result: &CaseResult) -> String {
    let mut out = String::new();
    match &result.outcome {
        CaseOutcome::Passed => {
            let title = banner_line(&format!("Test Case {} passed", result.index));
            out.push_str(&format!("{}\n", title.green().bold()));
        }
        CaseOutcome::WrongAnswer => {
            let title = banner_line(&format!("Test Case {} failed", result.index));
            out.push_str(&format!("{}\n", title.red().bold()));
            push_block(&mut out, "Input", &result.input);
            push_block(&mut out, "Expected Output", &result.expected);
            push_block(&mut out, "Actual Output", &result.actual);
        }
        CaseOutcome::Error(error) => {
            let title = banner_line(&format!("Test Case {} failed", result.index));
            out.push_str(&format!("{}\n", title.red().bold()));
            push_block(&mut out, "Output", &result.actual);
            out.push_str(&format!("{}\n", boxed("Runtime Error", &error.to_string()).red()));
        }
    }
    out
}

pub fn print_summary(report: &SampleReport) {
    if report.all_passed() {
        success(&summary_line(report));
    } else {
        failure(&summary_line(report));
    }
}

pub fn summary_line(report: &SampleReport) -> String {
    if report.all_passed() {
        "All Test Cases Passed ✅".to_string()
    } else {
        format!("Passed {} of {} test cases", report.passed(), report.total())
    }
}

fn push_block(out: &mut String, title: &str, text: &str) {
    out.push('\n');
    out.push_str(&format!("{}\n", format!("#  {}:", title).bold()));
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}

fn limits_line(question: &Question) -> String {
    let time = match question.time_limit() {
        Some(limit) => format!("{} ms", limit.as_millis()),
        None => "unlimited".to_string(),
    };
    let mut line = format!("time: {}", time);
    if question.memory_limit_mb > 0 {
        line.push_str(&format!(" | memory: {} MB", question.memory_limit_mb));
    }
    if question.interactive {
        line.push_str(" | interactive");
    } else {
        line.push_str(&format!(" | tests: {}", question.tests.len()));
    }
    line
}

fn banner_line(message: &str) -> String {
    format!("### {}", message)
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((WIDTH - len) / 2), text)
}

fn boxed(header: &str, body: &str) -> String {
    let title = format!("─ {} ", header);
    let fill = WIDTH.saturating_sub(title.chars().count() + 1);
    let mut out = format!("┌{}{}\n", title, "─".repeat(fill));
    for line in body.trim_end().lines() {
        out.push_str("│ ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("└{}", "─".repeat(WIDTH - 1)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ExecutionError, RunOutput};
    use crate::evaluator::evaluate_case;
    use soltest_common::types::TestCase;
    use std::time::Duration;

    fn result(index: usize, expected: &str, actual: &str) -> CaseResult {
        let case = TestCase {
            input: String::new(),
            output: expected.to_string(),
        };
        let run = RunOutput {
            output: actual.to_string(),
            elapsed: Duration::ZERO,
            error: None,
        };
        evaluate_case(index, &case, run)
    }

    #[test]
    fn test_summary_partial() {
        let report = SampleReport {
            cases: vec![result(1, "1", "1"), result(2, "2", "3")],
        };

        assert_eq!(summary_line(&report), "Passed 1 of 2 test cases");
    }

    #[test]
    fn test_summary_all_passed() {
        let report = SampleReport {
            cases: vec![result(1, "1", "1\n")],
        };

        assert_eq!(summary_line(&report), "All Test Cases Passed ✅");
    }

    #[test]
    fn test_case_block_passed() {
        let block = case_block(&result(3, "1", "1"));

        assert!(block.contains("### Test Case 3 passed"));
        assert!(!block.contains("Expected Output"));
    }

    #[test]
    fn test_case_block_wrong_answer_shows_all_sides() {
        let block = case_block(&result(2, "5\n", "4"));

        assert!(block.contains("### Test Case 2 failed"));
        assert!(block.contains("#  Input:"));
        let expected = block.find("#  Expected Output:").unwrap();
        let actual = block.find("#  Actual Output:").unwrap();
        assert!(expected < actual);
        assert!(block[expected..actual].contains("\n5\n"));
        assert!(block[actual..].contains("\n4\n"));
    }

    #[test]
    fn test_case_block_error_shows_output_then_error() {
        let case = TestCase {
            input: String::new(),
            output: "x".to_string(),
        };
        let run = RunOutput {
            output: "partial".to_string(),
            elapsed: Duration::ZERO,
            error: Some(ExecutionError::NonZeroExit { code: 3 }),
        };

        let block = case_block(&evaluate_case(1, &case, run));

        let output = block.find("partial\n").unwrap();
        let error = block.find("│ exit status 3").unwrap();
        assert!(output < error);
        assert!(block.contains("─ Runtime Error "));
    }

    #[test]
    fn test_boxed_layout() {
        let text = boxed("Runtime Error", "exit status 1\n");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("┌─ Runtime Error "));
        assert_eq!(lines[0].chars().count(), WIDTH);
        assert_eq!(lines[1], "│ exit status 1");
        assert_eq!(lines[2].chars().count(), WIDTH);
    }

    #[test]
    fn test_limits_line() {
        let mut question: Question = serde_json::from_str(
            r#"{"name":"A","timeLimit":2000,"memoryLimit":256,"tests":[{"input":"","output":""}]}"#,
        )
        .unwrap();
        assert_eq!(limits_line(&question), "time: 2000 ms | memory: 256 MB | tests: 1");

        question.time_limit_ms = -1;
        question.memory_limit_mb = 0;
        question.interactive = true;
        assert_eq!(limits_line(&question), "time: unlimited | interactive");
    }

    #[test]
    fn test_center() {
        assert_eq!(center("ab").len(), (WIDTH - 2) / 2 + 2);
        let long = "x".repeat(WIDTH + 5);
        assert_eq!(center(&long), long);
    }

    #[test]
    fn test_error_case_is_not_passed() {
        let case = TestCase {
            input: String::new(),
            output: String::new(),
        };
        let run = RunOutput {
            output: String::new(),
            elapsed: Duration::ZERO,
            error: Some(ExecutionError::NonZeroExit { code: 2 }),
        };
        let report = SampleReport {
            cases: vec![evaluate_case(1, &case, run)],
        };

        assert_eq!(summary_line(&report), "Passed 0 of 1 test cases");
    }
}
