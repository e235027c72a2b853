//! Children the engine started but did not wait for.
//!
//! Background jobs and the early stages of a pipeline keep running after the engine
//! returns. They are kept here so they can be reaped later instead of being left as
//! zombies for the lifetime of the interpreter.

use crate::command::ExitCode;
use crate::external::exit_code;
use std::process::Child;
use tracing::{debug, warn};

/// Identifier handed out for every background job, starting at 1.
pub type JobId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Background,
    PipelineStage,
}

#[derive(Debug)]
struct TrackedChild {
    id: JobId,
    kind: ChildKind,
    command: String,
    child: Child,
}

/// A tracked child that has exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedChild {
    pub id: JobId,
    pub kind: ChildKind,
    pub command: String,
    pub pid: u32,
    /// `None` when the exit status could not be collected.
    pub code: Option<ExitCode>,
}

#[derive(Debug, Default)]
pub struct ProcessRegistry {
    next_job: JobId,
    children: Vec<TrackedChild>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a background job and return its job number.
    pub fn track_background(&mut self, child: Child, command: impl Into<String>) -> JobId {
        self.next_job += 1;
        let id = self.next_job;
        self.push(id, ChildKind::Background, command.into(), child);
        id
    }

    /// Take ownership of a pipeline stage that is not waited on.
    pub fn track_stage(&mut self, mut child: Child, command: impl Into<String>) {
        let command = command.into();
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid = child.id(), code = exit_code(status), %command, "pipeline stage already exited");
            }
            _ => self.push(0, ChildKind::PipelineStage, command, child),
        }
    }

    fn push(&mut self, id: JobId, kind: ChildKind, command: String, child: Child) {
        debug!(id, ?kind, pid = child.id(), %command, "tracking child");
        self.children.push(TrackedChild {
            id,
            kind,
            command,
            child,
        });
    }

    /// Collect every tracked child that has exited, without blocking.
    pub fn reap(&mut self) -> Vec<FinishedChild> {
        let mut finished = Vec::new();
        self.children.retain_mut(|tracked| {
            let code = match tracked.child.try_wait() {
                Ok(None) => return true,
                Ok(Some(status)) => Some(exit_code(status)),
                Err(e) => {
                    warn!(pid = tracked.child.id(), error = %e, "failed to collect child status");
                    None
                }
            };
            finished.push(FinishedChild {
                id: tracked.id,
                kind: tracked.kind,
                command: tracked.command.clone(),
                pid: tracked.child.id(),
                code,
            });
            false
        });
        finished
    }

    /// Number of children still tracked.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Background jobs still tracked, as `(job, pid, command)`.
    #[cfg(test)]
    pub fn background_jobs(&self) -> impl Iterator<Item = (JobId, u32, &str)> {
        self.children
            .iter()
            .filter(|tracked| tracked.kind == ChildKind::Background)
            .map(|tracked| (tracked.id, tracked.child.id(), tracked.command.as_str()))
    }
}
