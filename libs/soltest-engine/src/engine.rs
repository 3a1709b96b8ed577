//! Case Runner - Executes the compiled artifact
//!
//! **Responsibility:**
//! Run the artifact once per call, feed it input, capture combined
//! stdout + stderr and classify how it ended.
//!
//! **Process Rules:**
//! - A captured run gets its own process group, and the whole group is
//!   killed once the program is done, so nothing it forked outlives the run
//! - `None` limit: the process runs to completion
//! - `Some(limit)`: the process races a timer; on expiry it is killed and
//!   reaped before `run` returns
//! - Ctrl-C kills and reaps the run the same way
//! - Captured output is kept for every outcome, including timeouts
//!
//! The runner knows nothing about expected outputs. Verdicts belong to the
//! evaluator.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use tracing::{debug, instrument, warn};

use crate::capture::read_combined;

/// How long to keep draining pipes after the process group is gone
const DRAIN_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("time limit of {}ms exceeded", .limit.as_millis())]
    TimedOut { limit: Duration },

    #[error("exit status {code}")]
    NonZeroExit { code: i32 },

    #[error("killed by signal {signal}")]
    Signaled { signal: i32 },

    #[error("interrupted")]
    Interrupted,

    #[error("failed to run program: {0}")]
    Io(#[from] io::Error),
}

/// Result of a single captured run
#[derive(Debug)]
pub struct RunOutput {
    /// Combined stdout + stderr, lossily decoded
    pub output: String,
    pub elapsed: Duration,
    pub error: Option<ExecutionError>,
}

impl RunOutput {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct CaseRunner {
    artifact: PathBuf,
}

impl CaseRunner {
    pub fn new(artifact: impl Into<PathBuf>) -> Self {
        Self {
            artifact: artifact.into(),
        }
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Run once with `input` on stdin, capturing everything the program prints
    ///
    /// Ctrl-C during the run ends it with [`ExecutionError::Interrupted`].
    pub async fn run(&self, input: &str, limit: Option<Duration>) -> RunOutput {
        self.run_until(input, limit, interrupted()).await
    }

    /// [`run`](Self::run) with `cancel` standing in for Ctrl-C
    #[instrument(
        skip(self, input, cancel),
        fields(input_bytes = input.len(), limit_ms = limit.map(|l| l.as_millis() as u64))
    )]
    pub async fn run_until<F>(&self, input: &str, limit: Option<Duration>, cancel: F) -> RunOutput
    where
        F: Future<Output = ()>,
    {
        let start = Instant::now();

        let mut std_command = std::process::Command::new(&self.artifact);
        std_command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            std_command.process_group(0);
        }
        let mut command = Command::from(std_command);
        command.kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(artifact = %self.artifact.display(), error = %e, "Failed to spawn artifact");
                return RunOutput {
                    output: String::new(),
                    elapsed: start.elapsed(),
                    error: Some(ExecutionError::Io(e)),
                };
            }
        };

        let pid = child.id();
        let feeder = child
            .stdin
            .take()
            .map(|stdin| tokio::spawn(feed_stdin(stdin, input.as_bytes().to_vec())));
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let mut captured = Vec::new();
        let (status, elapsed) = {
            let capture = read_combined(stdout, stderr, &mut captured);
            tokio::pin!(capture);
            let exit = wait_for_exit(&mut child, limit, cancel);
            tokio::pin!(exit);

            let mut drained = false;
            let status = loop {
                tokio::select! {
                    result = &mut capture, if !drained => {
                        drained = true;
                        if let Err(e) = result {
                            warn!(error = %e, "Failed to capture output");
                        }
                    }
                    status = &mut exit => break status,
                }
            };
            let elapsed = start.elapsed();

            // Anything the program left in the background still holds the pipes
            kill_group(pid);

            if !drained {
                match tokio::time::timeout(DRAIN_GRACE, &mut capture).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!(error = %e, "Failed to capture output"),
                    Err(_) => warn!("Output pipes still open after exit, keeping partial capture"),
                }
            }

            (status, elapsed)
        };

        if let Some(feeder) = feeder {
            feeder.abort();
        }

        let output = String::from_utf8_lossy(&captured).into_owned();
        let error = match status {
            Ok(status) => exit_error(status),
            Err(e) => Some(e),
        };

        debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            output_bytes = output.len(),
            error = ?error,
            "Run finished"
        );

        RunOutput {
            output,
            elapsed,
            error,
        }
    }

    /// Run once with the terminal attached, no deadline
    ///
    /// With `input` the text is piped to stdin, otherwise the caller's stdin
    /// is inherited. stdout and stderr always go straight to the caller. The
    /// program stays in the terminal's process group, so Ctrl-C reaches it.
    #[instrument(skip(self, input), fields(piped = input.is_some()))]
    pub async fn run_attached(&self, input: Option<&str>) -> Result<(), ExecutionError> {
        let mut command = Command::new(&self.artifact);
        command
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::inherit()
            })
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = command.spawn()?;

        let feeder = match (child.stdin.take(), input) {
            (Some(stdin), Some(input)) => {
                Some(tokio::spawn(feed_stdin(stdin, input.as_bytes().to_vec())))
            }
            _ => None,
        };

        let status = child.wait().await?;
        if let Some(feeder) = feeder {
            feeder.abort();
        }

        match exit_error(status) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

enum Exit {
    Finished(io::Result<ExitStatus>),
    TimedOut(Duration),
    Interrupted,
}

/// Wait for the program, killing and reaping it on timeout or cancel
async fn wait_for_exit<F>(
    child: &mut Child,
    limit: Option<Duration>,
    cancel: F,
) -> Result<ExitStatus, ExecutionError>
where
    F: Future<Output = ()>,
{
    let deadline = async move {
        match limit {
            Some(limit) => {
                tokio::time::sleep(limit).await;
                limit
            }
            None => std::future::pending().await,
        }
    };

    let exit = tokio::select! {
        status = child.wait() => Exit::Finished(status),
        limit = deadline => Exit::TimedOut(limit),
        _ = cancel => Exit::Interrupted,
    };

    match exit {
        Exit::Finished(status) => status.map_err(ExecutionError::from),
        Exit::TimedOut(limit) => {
            warn!(limit_ms = limit.as_millis() as u64, "Time limit exceeded, killing process");
            terminate(child).await;
            Err(ExecutionError::TimedOut { limit })
        }
        Exit::Interrupted => {
            warn!("Interrupted, killing process");
            terminate(child).await;
            Err(ExecutionError::Interrupted)
        }
    }
}

/// Resolves on Ctrl-C
///
/// The listener is registered by this call rather than on first poll, so an
/// interrupt arriving right after the spawn is still seen.
#[cfg(unix)]
fn interrupted() -> impl Future<Output = ()> + Send {
    use tokio::signal::unix::{signal, SignalKind};

    let listener = signal(SignalKind::interrupt());
    async move {
        match listener {
            Ok(mut sigint) => {
                if sigint.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(not(unix))]
fn interrupted() -> impl Future<Output = ()> + Send {
    async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

async fn feed_stdin(mut stdin: ChildStdin, input: Vec<u8>) {
    let result = async {
        stdin.write_all(&input).await?;
        stdin.shutdown().await
    }
    .await;

    match result {
        Ok(()) => {}
        // The program exited without reading all of its input
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => debug!(error = %e, "Failed to write stdin"),
    }
}

/// Kill the process and its group, then reap it
async fn terminate(child: &mut Child) {
    kill_group(child.id());

    if let Err(e) = child.start_kill() {
        debug!(error = %e, "Process already gone");
    }
    if let Err(e) = child.wait().await {
        warn!(error = %e, "Failed to reap killed process");
    }
}

/// SIGKILL whatever is left in the group led by `pid`
fn kill_group(pid: Option<u32>) {
    #[cfg(unix)]
    {
        use nix::errno::Errno;
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = pid {
            match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                // Group already empty
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => debug!(pid, error = %e, "Failed to kill process group"),
            }
        }
    }

    #[cfg(not(unix))]
    let _ = pid;
}

fn exit_error(status: ExitStatus) -> Option<ExecutionError> {
    if status.success() {
        return None;
    }
    if let Some(code) = status.code() {
        return Some(ExecutionError::NonZeroExit { code });
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Some(ExecutionError::Signaled { signal });
        }
    }

    Some(ExecutionError::NonZeroExit { code: -1 })
}
