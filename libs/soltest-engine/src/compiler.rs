//! Compiler - Builds the solution into the fixed-path artifact
//!
//! Runs the configured compile command as a child process in the working
//! directory and captures its combined stdout + stderr. No timeout is applied,
//! the external toolchain is trusted to terminate.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::capture::read_combined;

/// Artifact file name, relative to the working directory
pub const ARTIFACT_NAME: &str = "temp";

const PLACEHOLDER: &str = "%s";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("compile command is empty")]
    EmptyCommand,

    #[error("failed to start compiler `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("compilation failed ({status})")]
    Failed { status: ExitStatus, output: String },
}

/// Whitespace-separated command template with `%s` placeholders
///
/// The first placeholder receives the source path and the second the
/// artifact path. Substitution happens per token, so a path containing
/// spaces stays a single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    tokens: Vec<String>,
}

impl CompileCommand {
    pub fn parse(template: &str) -> Result<Self, CompileError> {
        let tokens: Vec<String> = template.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return Err(CompileError::EmptyCommand);
        }
        Ok(Self { tokens })
    }

    /// Fill the placeholders, returning the full argv
    pub fn render(&self, source: &str, artifact: &str) -> Vec<String> {
        let mut fills = [source, artifact].into_iter();

        self.tokens
            .iter()
            .map(|token| {
                let mut rendered = String::with_capacity(token.len());
                let mut rest = token.as_str();
                while let Some(pos) = rest.find(PLACEHOLDER) {
                    rendered.push_str(&rest[..pos]);
                    rendered.push_str(fills.next().unwrap_or(PLACEHOLDER));
                    rest = &rest[pos + PLACEHOLDER.len()..];
                }
                rendered.push_str(rest);
                rendered
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Combined compiler output, usually warnings
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct Compiler {
    command: CompileCommand,
    work_dir: PathBuf,
}

impl Compiler {
    pub fn new(command: CompileCommand, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            work_dir: work_dir.into(),
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.work_dir.join(ARTIFACT_NAME)
    }

    #[instrument(skip(self), fields(source = %source.display()))]
    pub async fn compile(&self, source: &Path) -> Result<CompileOutput, CompileError> {
        let argv = self.command.render(&source.to_string_lossy(), ARTIFACT_NAME);
        let (program, args) = argv.split_first().ok_or(CompileError::EmptyCommand)?;

        debug!(program = %program, args = ?args, "Running compiler");

        let mut child = Command::new(program)
            .args(args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CompileError::Spawn {
                program: program.clone(),
                source,
            })?;

        let mut captured = Vec::new();
        let (capture, status) = tokio::join!(
            read_combined(child.stdout.take(), child.stderr.take(), &mut captured),
            child.wait()
        );

        let status = status.map_err(|source| CompileError::Spawn {
            program: program.clone(),
            source,
        })?;
        if let Err(e) = capture {
            warn!(error = %e, "Failed to capture compiler output");
        }
        let output = String::from_utf8_lossy(&captured).into_owned();

        if status.success() {
            info!(artifact = %self.artifact_path().display(), "Compilation succeeded");
            Ok(CompileOutput { output })
        } else {
            warn!(
                status = %status,
                error_preview = output.lines().next().unwrap_or(""),
                "Compilation failed"
            );
            Err(CompileError::Failed { status, output })
        }
    }
}
