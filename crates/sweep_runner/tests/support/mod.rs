#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use sweep_core::Combination;
use sweep_runner::{
    ConfigurationRunner, PerformanceSnapshot, PerformanceTracker, RunError, RunHandle, RunReport,
    RunStatus,
};

/// What a scripted run does when polled.
#[derive(Clone, Debug)]
pub enum Step {
    Running,
    TransientError,
    Finish(RunReport),
    Fail,
}

/// Everything the runner saw, shared with the test after the driver owns it.
#[derive(Debug, Default)]
pub struct RunnerLog {
    pub prepared: usize,
    pub started: Vec<(usize, Combination)>,
    /// Tracker contents at the moment each run started.
    pub snapshots_at_start: Vec<PerformanceSnapshot>,
}

/// Runner whose runs follow a fixed script of poll results.
pub struct ScriptedRunner {
    tracker: Arc<PerformanceTracker>,
    script: Box<dyn FnMut(usize, &Combination) -> Vec<Step> + Send>,
    fail_prepare: bool,
    pub log: Arc<Mutex<RunnerLog>>,
}

impl ScriptedRunner {
    pub fn new(
        tracker: Arc<PerformanceTracker>,
        script: impl FnMut(usize, &Combination) -> Vec<Step> + Send + 'static,
    ) -> Self {
        Self {
            tracker,
            script: Box::new(script),
            fail_prepare: false,
            log: Arc::new(Mutex::new(RunnerLog::default())),
        }
    }

    /// Every run finishes after one `Running` poll with a report derived from its combination.
    pub fn finishing(tracker: Arc<PerformanceTracker>) -> Self {
        Self::new(tracker, |_, combination| {
            vec![Step::Running, Step::Finish(report_for(combination))]
        })
    }

    pub fn failing_preparation(mut self) -> Self {
        self.fail_prepare = true;
        self
    }
}

pub fn report_for(combination: &Combination) -> RunReport {
    RunReport {
        identifier: None,
        processing_times_ms: vec![
            u64::from(combination.mailbox_check_interval()),
            u64::from(combination.mailbox_check_interval()) * 2,
        ],
        messages_sent: vec![u64::from(combination.bins()); combination.participants() as usize],
        messages_received: vec![1],
    }
}

impl ConfigurationRunner for ScriptedRunner {
    fn prepare(&mut self) -> Result<(), RunError> {
        self.log.lock().unwrap().prepared += 1;
        if self.fail_prepare {
            return Err(RunError::Prepare("mailbox purge failed".to_string()));
        }
        Ok(())
    }

    fn start(
        &mut self,
        sequence: usize,
        combination: &Combination,
    ) -> Result<Box<dyn RunHandle>, RunError> {
        {
            let mut log = self.log.lock().unwrap();
            log.started.push((sequence, *combination));
            log.snapshots_at_start.push(self.tracker.snapshot());
        }

        Ok(Box::new(ScriptedRun {
            identifier: format!("scripted-{sequence}"),
            steps: (self.script)(sequence, combination).into(),
            tracker: Arc::clone(&self.tracker),
        }))
    }
}

struct ScriptedRun {
    identifier: String,
    steps: VecDeque<Step>,
    tracker: Arc<PerformanceTracker>,
}

impl RunHandle for ScriptedRun {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn poll(&mut self) -> Result<RunStatus, RunError> {
        match self.steps.pop_front() {
            Some(Step::Running) => Ok(RunStatus::Running),
            Some(Step::TransientError) => Err(RunError::Poll(std::io::Error::new(
                std::io::ErrorKind::Interrupted,
                "interrupted while waiting",
            ))),
            Some(Step::Finish(report)) => {
                report.record_into(&self.tracker);
                Ok(RunStatus::Finished)
            }
            Some(Step::Fail) => Err(RunError::Failed("exit status: 1".to_string())),
            None => Err(RunError::Failed("script exhausted".to_string())),
        }
    }
}
