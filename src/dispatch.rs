//! Named background jobs with last-started-wins semantics.
//!
//! Every job runs on its own worker thread and talks to the UI loop only by
//! posting closures over a channel. Each job name carries a generation
//! counter; the UI loop drops anything posted by a job that is no longer the
//! most recently started one for its name. Non-exclusive names (commands)
//! are never superseded, so every run's outcome is applied.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::error::{FlowError, Notification};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobName {
    Connect,
    Refresh,
    LoadNode,
    LiveTail,
    Command,
    Variables,
    EditScript,
}

impl JobName {
    pub fn as_str(self) -> &'static str {
        match self {
            JobName::Connect => "connect",
            JobName::Refresh => "refresh",
            JobName::LoadNode => "load_node",
            JobName::LiveTail => "live_tail",
            JobName::Command => "command",
            JobName::Variables => "variables",
            JobName::EditScript => "edit_script",
        }
    }

    /// Whether a new run supersedes the one in flight. Commands are not
    /// exclusive: every run reports its own outcome.
    pub fn is_exclusive(self) -> bool {
        !matches!(self, JobName::Command)
    }

    /// Prefix for error toasts raised at this job's boundary.
    pub fn label(self) -> &'static str {
        match self {
            JobName::Connect => "Connection",
            JobName::Refresh => "Refresh",
            JobName::LoadNode => "Load",
            JobName::LiveTail => "Live tail",
            JobName::Command => "Command",
            JobName::Variables => "Variables",
            JobName::EditScript => "Edit",
        }
    }
}

/// State owned by the UI loop that jobs report into.
pub trait UiState: 'static {
    fn notify(&mut self, notification: Notification);
}

pub type UiUpdate<S> = Box<dyn FnOnce(&mut S) + Send>;

enum Payload<S> {
    Update(UiUpdate<S>),
    Failed(FlowError),
    Finished,
}

/// Supersession key. Exclusive names use slot 0; every run of a
/// non-exclusive name gets a slot of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct JobKey {
    name: JobName,
    slot: u64,
}

struct Envelope<S> {
    key: JobKey,
    generation: u64,
    payload: Payload<S>,
}

/// Handle a running job uses to hand results back to the UI loop.
pub struct JobContext<S> {
    key: JobKey,
    generation: u64,
    tx: Sender<Envelope<S>>,
}

impl<S> JobContext<S> {
    pub fn name(&self) -> JobName {
        self.key.name
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queue `update` to run on the UI loop. Silently discarded if a newer
    /// job with the same name has started by the time it is drained.
    pub fn post(&self, update: impl FnOnce(&mut S) + Send + 'static) {
        self.send(Payload::Update(Box::new(update)));
    }

    fn send(&self, payload: Payload<S>) {
        // The receiver only disappears at shutdown.
        let _ = self.tx.send(Envelope {
            key: self.key,
            generation: self.generation,
            payload,
        });
    }
}

pub struct Dispatcher<S> {
    tx: Sender<Envelope<S>>,
    rx: Receiver<Envelope<S>>,
    generations: HashMap<JobName, u64>,
    latest: HashMap<JobKey, u64>,
    // Keys whose latest generation has not finished yet.
    running: HashMap<JobKey, u64>,
    next_slot: u64,
    // Workers (stale ones included) that have not reported `Finished`.
    outstanding: usize,
}

impl<S: UiState> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: UiState> Dispatcher<S> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            generations: HashMap::new(),
            latest: HashMap::new(),
            running: HashMap::new(),
            next_slot: 0,
            outstanding: 0,
        }
    }

    /// Start `job` under `name`. For an exclusive name this supersedes any
    /// job of that name still in flight. Returns the new generation.
    pub fn run<F>(&mut self, name: JobName, job: F) -> u64
    where
        F: FnOnce(&JobContext<S>) -> Result<(), FlowError> + Send + 'static,
    {
        let generation = self.generations.get(&name).copied().unwrap_or(0) + 1;
        self.generations.insert(name, generation);
        let slot = if name.is_exclusive() {
            0
        } else {
            self.next_slot += 1;
            self.next_slot
        };
        let key = JobKey { name, slot };
        self.latest.insert(key, generation);
        if let Some(previous) = self.running.insert(key, generation) {
            tracing::debug!(job = name.as_str(), previous, generation, "superseding job");
        }
        self.outstanding += 1;

        let ctx = JobContext {
            key,
            generation,
            tx: self.tx.clone(),
        };
        let spawned = std::thread::Builder::new()
            .name(format!("flowtop-{}", name.as_str()))
            .spawn(move || {
                tracing::debug!(job = name.as_str(), generation, "job started");
                let result = catch_unwind(AssertUnwindSafe(|| job(&ctx)))
                    .unwrap_or_else(|panic| Err(FlowError::Unexpected(panic_message(panic))));
                if let Err(err) = result {
                    tracing::warn!(job = name.as_str(), generation, error = %err, "job failed");
                    ctx.send(Payload::Failed(err));
                }
                ctx.send(Payload::Finished);
            });

        if let Err(err) = spawned {
            tracing::error!(job = name.as_str(), error = %err, "failed to spawn worker");
            let ctx = JobContext {
                key,
                generation,
                tx: self.tx.clone(),
            };
            ctx.send(Payload::Failed(FlowError::Unexpected(format!(
                "could not start {}: {}",
                name.as_str(),
                err
            ))));
            ctx.send(Payload::Finished);
        }
        generation
    }

    /// Like [`run`](Self::run) but does nothing while a job of the same name
    /// is still in flight. Used by periodic work so ticks never overlap.
    pub fn run_if_idle<F>(&mut self, name: JobName, job: F) -> Option<u64>
    where
        F: FnOnce(&JobContext<S>) -> Result<(), FlowError> + Send + 'static,
    {
        if self.is_running(name) {
            tracing::trace!(job = name.as_str(), "skipping, previous run still in flight");
            return None;
        }
        Some(self.run(name, job))
    }

    pub fn is_running(&self, name: JobName) -> bool {
        self.running.keys().any(|key| key.name == name)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Apply everything already posted. Never blocks. Returns the number of
    /// updates applied (stale ones excluded).
    pub fn drain(&mut self, state: &mut S) -> usize {
        let mut applied = 0;
        while let Ok(envelope) = self.rx.try_recv() {
            if self.apply(envelope, state) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until no authoritative job is in flight or `timeout` elapses.
    pub fn wait_idle(&mut self, state: &mut S, timeout: Duration) -> bool {
        self.wait_until(state, timeout, |d| d.running.is_empty())
    }

    /// Block until every spawned worker, stale ones included, has finished.
    pub fn settle(&mut self, state: &mut S, timeout: Duration) -> bool {
        self.wait_until(state, timeout, |d| d.outstanding == 0)
    }

    fn wait_until(
        &mut self,
        state: &mut S,
        timeout: Duration,
        done: impl Fn(&Self) -> bool,
    ) -> bool {
        let deadline = Instant::now() + timeout;
        self.drain(state);
        while !done(&*self) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(envelope) => {
                    self.apply(envelope, state);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return done(&*self),
            }
        }
        true
    }

    fn apply(&mut self, envelope: Envelope<S>, state: &mut S) -> bool {
        let Envelope {
            key,
            generation,
            payload,
        } = envelope;
        let name = key.name;
        let current = self.latest.get(&key).copied().unwrap_or(0) == generation;

        if let Payload::Finished = payload {
            self.outstanding = self.outstanding.saturating_sub(1);
            if current {
                self.running.remove(&key);
                if key.slot != 0 {
                    self.latest.remove(&key);
                }
                tracing::debug!(job = name.as_str(), generation, "job finished");
            }
            return false;
        }

        if !current {
            tracing::debug!(job = name.as_str(), generation, "dropping stale result");
            return false;
        }

        match payload {
            Payload::Update(update) => {
                update(state);
                true
            }
            Payload::Failed(err) => {
                state.notify(err.notification(name.label()));
                false
            }
            Payload::Finished => false,
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Fixed-interval trigger polled from the UI loop.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    last: Option<Instant>,
    enabled: bool,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            enabled: false,
        }
    }

    pub fn enable(&mut self, now: Instant) {
        self.enabled = true;
        self.last = Some(now);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `true` at most once per interval while enabled.
    pub fn due(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
