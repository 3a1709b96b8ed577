//! Test Session - High-Level Orchestration
//!
//! **Responsibility:**
//! Drive one `soltest test` invocation from start to verdict:
//! 1. Fetch the current question from the relay (best effort)
//! 2. Compile the source with the configured command
//! 3. Pick the input source (`in.txt`, stdin or sample tests)
//! 4. Run the artifact and evaluate sample outputs
//! 5. Report per-case verdicts and the pass tally
//!
//! This module is the glue layer. How programs run lives in `engine`, how
//! outputs are judged lives in `evaluator`.

use anyhow::{bail, Context, Result};
use soltest_common::config::Config;
use soltest_common::types::Question;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::client::QuestionClient;
use crate::compiler::{CompileCommand, CompileError, Compiler};
use crate::engine::{CaseRunner, ExecutionError};
use crate::evaluator::{evaluate_case, CaseOutcome, SampleReport};
use crate::input::{read_in_txt, select_input_mode, InputMode};
use crate::report;

/// How a session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// Nothing was executed
    CompileFailed,
    /// A single stdin or `in.txt` run
    Single(Result<(), ExecutionError>),
    Samples(SampleReport),
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            SessionOutcome::CompileFailed => false,
            SessionOutcome::Single(result) => result.is_ok(),
            SessionOutcome::Samples(report) => report.all_passed(),
        }
    }
}

pub struct TestSession {
    work_dir: PathBuf,
    compiler: Compiler,
    client: QuestionClient,
}

impl TestSession {
    pub fn new(config: &Config, work_dir: impl Into<PathBuf>) -> Result<Self> {
        let work_dir = work_dir.into();
        let command =
            CompileCommand::parse(&config.compile_command).context("Invalid COMPILE_COMMAND")?;
        let client =
            QuestionClient::new(config.port).context("Failed to build relay client")?;

        Ok(Self::from_parts(Compiler::new(command, &work_dir), client, work_dir))
    }

    pub fn from_parts(
        compiler: Compiler,
        client: QuestionClient,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            compiler,
            client,
        }
    }

    pub async fn run(&self, source: &Path) -> Result<SessionOutcome> {
        info!(
            source = %source.display(),
            work_dir = %self.work_dir.display(),
            "Starting test session"
        );

        let question = self.client.fetch().await;
        report::question_banner(question.as_ref());

        match self.compiler.compile(source).await {
            Ok(compiled) => {
                report::section("Compiler Output", &compiled.output);
                report::success("Compilation Successful");
            }
            Err(CompileError::Failed { output, .. }) => {
                report::section("Compiler Output", &output);
                report::failure("Compilation Failed");
                return Ok(SessionOutcome::CompileFailed);
            }
            Err(e) => {
                report::section("Compiler Output", &e.to_string());
                report::failure("Compilation Failed");
                return Ok(SessionOutcome::CompileFailed);
            }
        }

        let in_txt = read_in_txt(&self.work_dir).await;
        let mode = select_input_mode(in_txt, question.as_ref());
        report::notice(&format!("Input Method: {}", mode.describe()));
        info!(mode = mode.describe(), "Input method selected");

        let runner = CaseRunner::new(self.compiler.artifact_path());

        let outcome = match mode {
            InputMode::Stdin { .. } => SessionOutcome::Single(run_single(&runner, None).await),
            InputMode::FileInput(contents) => {
                SessionOutcome::Single(run_single(&runner, Some(&contents)).await)
            }
            InputMode::Samples => {
                let Some(question) = question.as_ref() else {
                    bail!("sample tests selected without a question");
                };
                let samples = run_samples(&runner, question).await;
                report::print_summary(&samples);
                SessionOutcome::Samples(samples)
            }
        };

        Ok(outcome)
    }
}

async fn run_single(runner: &CaseRunner, input: Option<&str>) -> Result<(), ExecutionError> {
    let result = runner.run_attached(input).await;
    if let Err(e) = &result {
        warn!(error = %e, "Program failed");
        report::section("Runtime Error", &e.to_string());
    }
    result
}

/// Run every sample test in order
///
/// A failing case never stops the remaining ones; only Ctrl-C does.
pub async fn run_samples(runner: &CaseRunner, question: &Question) -> SampleReport {
    let limit = question.time_limit();
    let mut report = SampleReport::default();

    info!(
        tests = question.tests.len(),
        limit_ms = limit.map(|l| l.as_millis() as u64),
        "Running sample tests"
    );

    for (idx, case) in question.tests.iter().enumerate() {
        let run = runner.run(&case.input, limit).await;
        let result = evaluate_case(idx + 1, case, run);

        info!(test_num = result.index, passed = result.passed(), "Test result");
        report::print_case(&result);
        let interrupted = matches!(
            result.outcome,
            CaseOutcome::Error(ExecutionError::Interrupted)
        );
        report.cases.push(result);

        if interrupted {
            warn!(
                remaining = question.tests.len() - idx - 1,
                "Interrupted, skipping remaining tests"
            );
            break;
        }
    }

    info!(passed = report.passed(), total = report.total(), "Sample tests finished");
    report
}
