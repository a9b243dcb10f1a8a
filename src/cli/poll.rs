//! Run status polling used by `terminate`.

use crate::client::PraxApi;
use crate::error::ApiResult;
use crate::models::{RunSchema, WorkflowKind};
use std::time::Duration;
use tracing::debug;

/// Yields successive `get_run` results for one run, sleeping `interval`
/// between requests. The first poll happens immediately. Stops after the
/// first error or after the first status that is no longer active.
pub struct RunPoller<'a, A: PraxApi + ?Sized> {
    api: &'a A,
    kind: WorkflowKind,
    run_name: String,
    interval: Duration,
    polls: usize,
    done: bool,
}

impl<'a, A: PraxApi + ?Sized> RunPoller<'a, A> {
    pub fn new(api: &'a A, kind: WorkflowKind, run_name: impl Into<String>, interval: Duration) -> Self {
        Self {
            api,
            kind,
            run_name: run_name.into(),
            interval,
            polls: 0,
            done: false,
        }
    }

    /// Drain the poller and return the final run state.
    pub fn wait(mut self) -> ApiResult<Option<RunSchema>> {
        let mut last = None;
        for run in self.by_ref() {
            last = Some(run?);
        }
        Ok(last)
    }
}

impl<A: PraxApi + ?Sized> Iterator for RunPoller<'_, A> {
    type Item = ApiResult<RunSchema>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.polls > 0 && !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
        self.polls += 1;
        let result = self.api.get_run(self.kind, &self.run_name);
        match &result {
            Ok(run) => {
                debug!(run = %self.run_name, status = %run.status, poll = self.polls, "Polled run status");
                if !run.status.is_active() {
                    self.done = true;
                }
            }
            Err(_) => self.done = true,
        }
        Some(result)
    }
}
