//! Command history.
//!
//! A bounded FIFO of recent invocations, consulted by the dispatcher for
//! channel cooldowns and repeat detection. Lookups scan newest-first and
//! never look past the configured capacity.

use crate::handlers::CommandInvocation;
use parking_lot::Mutex;
use squeak_proto::CaseMapping;
use std::collections::VecDeque;
use std::sync::Arc;

/// Bounded, thread-safe invocation history.
#[derive(Debug)]
pub struct CommandHistory {
    entries: Mutex<VecDeque<Arc<CommandInvocation>>>,
    capacity: usize,
}

impl CommandHistory {
    /// Create a history holding at most `capacity` invocations (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Append an invocation, evicting and returning the oldest when full.
    pub fn push(&self, invocation: Arc<CommandInvocation>) -> Option<Arc<CommandInvocation>> {
        let mut entries = self.entries.lock();
        self.push_locked(&mut entries, invocation)
    }

    /// Admit an invocation under a single lock: flag it as a repeat, hand it
    /// and the last use of its command in the same channel to `gate`, and
    /// push it unless `gate` refuses.
    ///
    /// Two concurrent lines therefore cannot both pass a cooldown. `gate`
    /// runs with the history locked and must not call back into it.
    pub fn admit<E>(
        &self,
        mut invocation: CommandInvocation,
        window_ms: i64,
        casemapping: CaseMapping,
        gate: impl FnOnce(&CommandInvocation, Option<&CommandInvocation>) -> Result<(), E>,
    ) -> Result<Arc<CommandInvocation>, E> {
        let mut entries = self.entries.lock();

        if repeat_of(&entries, &invocation, window_ms, casemapping).is_some() {
            invocation.force_override = true;
        }
        let last = invocation
            .channel()
            .and_then(|channel| last_use(&entries, &invocation.command, channel, casemapping));
        gate(&invocation, last.as_deref())?;

        let invocation = Arc::new(invocation);
        self.push_locked(&mut entries, Arc::clone(&invocation));
        Ok(invocation)
    }

    fn push_locked(
        &self,
        entries: &mut VecDeque<Arc<CommandInvocation>>,
        invocation: Arc<CommandInvocation>,
    ) -> Option<Arc<CommandInvocation>> {
        let evicted = if entries.len() >= self.capacity {
            entries.pop_front()
        } else {
            None
        };
        entries.push_back(invocation);
        crate::metrics::set_history_entries(entries.len());
        evicted
    }

    /// All entries, newest first.
    pub fn snapshot(&self) -> Vec<Arc<CommandInvocation>> {
        self.entries.lock().iter().rev().cloned().collect()
    }

    /// The most recent use of `command` in `channel`.
    pub fn last_in_channel(
        &self,
        command: &str,
        channel: &str,
        casemapping: CaseMapping,
    ) -> Option<Arc<CommandInvocation>> {
        last_use(&self.entries.lock(), command, channel, casemapping)
    }

    /// A distinct earlier invocation by the same sender with the same
    /// command and parameters, less than `window_ms` before `invocation`.
    pub fn find_repeat(
        &self,
        invocation: &CommandInvocation,
        window_ms: i64,
        casemapping: CaseMapping,
    ) -> Option<Arc<CommandInvocation>> {
        repeat_of(&self.entries.lock(), invocation, window_ms, casemapping)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        crate::metrics::set_history_entries(0);
    }
}

fn last_use(
    entries: &VecDeque<Arc<CommandInvocation>>,
    command: &str,
    channel: &str,
    casemapping: CaseMapping,
) -> Option<Arc<CommandInvocation>> {
    entries
        .iter()
        .rev()
        .find(|entry| {
            entry.command == command
                && entry
                    .channel()
                    .is_some_and(|used_in| casemapping.equals(used_in, channel))
        })
        .cloned()
}

fn repeat_of(
    entries: &VecDeque<Arc<CommandInvocation>>,
    invocation: &CommandInvocation,
    window_ms: i64,
    casemapping: CaseMapping,
) -> Option<Arc<CommandInvocation>> {
    entries
        .iter()
        .rev()
        .find(|entry| {
            entry.id != invocation.id
                && entry.command == invocation.command
                && entry.parameters == invocation.parameters
                && casemapping.equals(&entry.sender.nickname, &invocation.sender.nickname)
                && invocation.elapsed_since_ms(entry) < window_ms
        })
        .cloned()
}
