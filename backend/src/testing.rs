//! Scripted in-memory process table for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::process_table::ProcessTable;
use crate::types::{ProcError, ProcessRecord};

/// How a fake process reacts to signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Exits on SIGTERM.
    ExitsOnTerm,
    /// Ignores SIGTERM, exits on SIGKILL.
    IgnoresTerm,
    /// Survives everything.
    Unkillable,
    /// Already gone by the time it is signalled.
    Vanished,
    /// Signalling fails with EPERM.
    Forbidden,
    /// Outlives the grace period, then exits just before SIGKILL arrives.
    ExitsBeforeKill,
    /// Exits on its own after being polled this many times.
    ExitsAfterPolls(u32),
    /// Exits on SIGTERM, but its pid is immediately taken by a new long-lived process.
    Replaced,
}

/// Start time every fake process is listed with.
pub const SNAPSHOT_START_TIME: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sent {
    Term(i32),
    Kill(i32),
}

#[derive(Default)]
pub struct FakeProcessTable {
    processes: Vec<ProcessRecord>,
    behaviors: HashMap<i32, Behavior>,
    alive: RefCell<HashMap<i32, bool>>,
    polls: RefCell<HashMap<i32, u32>>,
    replaced: RefCell<Vec<i32>>,
    sent: RefCell<Vec<Sent>>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pid: i32, name: &str, args: &[&str], behavior: Behavior) -> Self {
        let args = args.iter().map(|a| a.to_string()).collect();
        self.processes
            .push(ProcessRecord::new(pid, name, args).with_start_time(SNAPSHOT_START_TIME));
        self.behaviors.insert(pid, behavior);
        self.alive
            .get_mut()
            .insert(pid, behavior != Behavior::Vanished);
        self
    }

    /// Signals received so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.borrow().clone()
    }

    pub fn alive(&self, pid: i32) -> bool {
        self.alive.borrow().get(&pid).copied().unwrap_or(false)
    }

    /// How often `is_alive` was asked about `pid`.
    pub fn polls(&self, pid: i32) -> u32 {
        self.polls.borrow().get(&pid).copied().unwrap_or(0)
    }

    fn deliver(&self, pid: i32, signal: Sent) -> Result<(), ProcError> {
        let behavior = self.behaviors.get(&pid).copied().ok_or(ProcError::NotFound(pid))?;
        if behavior == Behavior::Forbidden {
            return Err(ProcError::PermissionDenied(pid));
        }
        if !self.alive(pid) {
            return Err(ProcError::NotFound(pid));
        }
        if behavior == Behavior::ExitsBeforeKill && matches!(signal, Sent::Kill(_)) {
            self.alive.borrow_mut().insert(pid, false);
            return Err(ProcError::NotFound(pid));
        }
        self.sent.borrow_mut().push(signal);
        if behavior == Behavior::Replaced && matches!(signal, Sent::Term(_)) {
            self.replaced.borrow_mut().push(pid);
            return Ok(());
        }

        let exits = match (behavior, signal) {
            (Behavior::ExitsOnTerm, _) => true,
            (Behavior::IgnoresTerm, Sent::Kill(_)) => true,
            _ => false,
        };
        if exits {
            self.alive.borrow_mut().insert(pid, false);
        }
        Ok(())
    }
}

impl ProcessTable for FakeProcessTable {
    fn snapshot(&self) -> Result<Vec<ProcessRecord>, ProcError> {
        Ok(self.processes.clone())
    }

    fn terminate(&self, pid: i32) -> Result<(), ProcError> {
        self.deliver(pid, Sent::Term(pid))
    }

    fn force_terminate(&self, pid: i32) -> Result<(), ProcError> {
        self.deliver(pid, Sent::Kill(pid))
    }

    fn is_alive(&self, pid: i32) -> Result<bool, ProcError> {
        let polls = {
            let mut polls = self.polls.borrow_mut();
            let count = polls.entry(pid).or_insert(0);
            *count += 1;
            *count
        };
        if let Some(&Behavior::ExitsAfterPolls(limit)) = self.behaviors.get(&pid) {
            if polls >= limit {
                self.alive.borrow_mut().insert(pid, false);
            }
        }
        Ok(self.alive(pid))
    }

    fn start_time(&self, pid: i32) -> Result<Option<u64>, ProcError> {
        if !self.alive(pid) {
            return Err(ProcError::NotFound(pid));
        }
        if self.replaced.borrow().contains(&pid) {
            return Ok(Some(SNAPSHOT_START_TIME + 1));
        }
        Ok(Some(SNAPSHOT_START_TIME))
    }
}
