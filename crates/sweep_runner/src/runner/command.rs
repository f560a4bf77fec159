use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use sweep_core::Combination;
use tracing::debug;

use super::{ConfigurationRunner, RunError, RunHandle, RunReport, RunStatus};
use crate::statistics::PerformanceTracker;

/// Runs an external program once per combination.
///
/// Arguments may contain the placeholders `{participants}`, `{bins}`,
/// `{interval}` and `{sequence}`. The same values are exported as
/// `SWEEP_PARTICIPANTS`, `SWEEP_BINS`, `SWEEP_MAILBOX_CHECK_INTERVAL` and
/// `SWEEP_SEQUENCE`. On a successful exit the last stdout line must be a
/// JSON [`RunReport`].
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
    tracker: Arc<PerformanceTracker>,
    run_prefix: String,
}

impl CommandRunner {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        tracker: Arc<PerformanceTracker>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            tracker,
            run_prefix: "run".to_string(),
        }
    }

    /// Prefix of generated run identifiers, `<prefix>-<sequence>`.
    pub fn with_run_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.run_prefix = prefix.into();
        self
    }

    fn expand(arg: &str, sequence: usize, combination: &Combination) -> String {
        arg.replace("{participants}", &combination.participants().to_string())
            .replace("{bins}", &combination.bins().to_string())
            .replace("{interval}", &combination.mailbox_check_interval().to_string())
            .replace("{sequence}", &sequence.to_string())
    }
}

impl ConfigurationRunner for CommandRunner {
    fn prepare(&mut self) -> Result<(), RunError> {
        if self.program.trim().is_empty() {
            return Err(RunError::Prepare("no program configured".to_string()));
        }
        Ok(())
    }

    fn start(
        &mut self,
        sequence: usize,
        combination: &Combination,
    ) -> Result<Box<dyn RunHandle>, RunError> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| Self::expand(arg, sequence, combination))
            .collect();

        let mut child = Command::new(&self.program)
            .args(&args)
            .env("SWEEP_PARTICIPANTS", combination.participants().to_string())
            .env("SWEEP_BINS", combination.bins().to_string())
            .env(
                "SWEEP_MAILBOX_CHECK_INTERVAL",
                combination.mailbox_check_interval().to_string(),
            )
            .env("SWEEP_SEQUENCE", sequence.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(RunError::Spawn)?;

        // Drained on a separate thread so a chatty child never blocks on a full pipe.
        let stdout = child.stdout.take().map(|mut out| {
            thread::spawn(move || {
                let mut buffer = String::new();
                out.read_to_string(&mut buffer).map(|_| buffer)
            })
        });

        let identifier = format!("{}-{sequence}", self.run_prefix);
        debug!(pid = child.id(), %identifier, program = %self.program, ?args, "spawned run");

        Ok(Box::new(CommandRun {
            identifier,
            child,
            stdout,
            tracker: Arc::clone(&self.tracker),
            finished: false,
        }))
    }
}

struct CommandRun {
    identifier: String,
    child: Child,
    stdout: Option<JoinHandle<std::io::Result<String>>>,
    tracker: Arc<PerformanceTracker>,
    finished: bool,
}

impl CommandRun {
    fn collect_stdout(&mut self) -> Result<String, RunError> {
        let Some(reader) = self.stdout.take() else {
            return Ok(String::new());
        };
        reader
            .join()
            .map_err(|_| RunError::InvalidReport("stdout reader panicked".to_string()))?
            .map_err(|error| RunError::InvalidReport(error.to_string()))
    }
}

impl RunHandle for CommandRun {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn poll(&mut self) -> Result<RunStatus, RunError> {
        if self.finished {
            return Ok(RunStatus::Finished);
        }

        let Some(status) = self.child.try_wait().map_err(RunError::Poll)? else {
            return Ok(RunStatus::Running);
        };
        self.finished = true;

        let output = self.collect_stdout()?;
        if !status.success() {
            return Err(RunError::Failed(status.to_string()));
        }

        let report = RunReport::from_output(&output)?;
        if let Some(identifier) = &report.identifier {
            self.identifier = identifier.clone();
        }
        report.record_into(&self.tracker);
        Ok(RunStatus::Finished)
    }
}

impl Drop for CommandRun {
    fn drop(&mut self) {
        if !self.finished && matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
